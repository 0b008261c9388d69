//! Output formatting utilities

use colored::Colorize;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a success message
pub(crate) fn success(msg: &str) {
    println!("{} {}", "[PASS]".green().bold(), msg);
}

/// Print a failure message
pub(crate) fn fail(msg: &str) {
    println!("{} {}", "[FAIL]".red().bold(), msg);
}

/// Print a failure detail on stderr
pub(crate) fn discrepancy(msg: &str) {
    eprintln!("{} {}", "[FAIL]".red().bold(), msg);
}

/// Print an info message
pub(crate) fn info(msg: &str) {
    println!("{} {}", "[INFO]".blue(), msg);
}

/// Format a metric value; infinities print as `inf`.
pub(crate) fn format_metric(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.9}")
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metric_finite() {
        assert_eq!(format_metric(1.5), "1.500000000");
    }

    #[test]
    fn test_format_metric_non_finite() {
        assert_eq!(format_metric(f64::INFINITY), "inf");
        assert_eq!(format_metric(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_metric(f64::NAN), "NaN");
    }
}
