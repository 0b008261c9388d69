//! JSON helpers.
//!
//! JSON has no literal for infinity, and `serde_json` writes non-finite
//! floats as `null`. A Calinski-Harabasz value of `+inf` is meaningful, so
//! metric fields go through [`float`], which writes `"inf"`, `"-inf"` and
//! `"NaN"` as strings and reads them back.

/// `#[serde(with = "json::float")]` for `f64` fields.
pub mod float {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes finite values as numbers and the rest as strings.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    /// Accepts a number or one of the strings written by [`serialize`].
    ///
    /// # Errors
    ///
    /// Fails on any other string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => s
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super::float")]
        value: f64,
    }

    #[test]
    fn test_finite_is_a_number() {
        let json = serde_json::to_string(&Wrapper { value: 1.5 }).expect("serializable");
        assert_eq!(json, r#"{"value":1.5}"#);
    }

    #[test]
    fn test_non_finite_round_trip() {
        for v in [f64::INFINITY, f64::NEG_INFINITY] {
            let json = serde_json::to_string(&Wrapper { value: v }).expect("serializable");
            let back: Wrapper = serde_json::from_str(&json).expect("deserializable");
            assert_eq!(back.value, v);
        }
        let json = serde_json::to_string(&Wrapper { value: f64::NAN }).expect("serializable");
        assert_eq!(json, r#"{"value":"NaN"}"#);
    }

    #[test]
    fn test_rejects_other_text() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"lots"}"#).is_err());
    }
}
