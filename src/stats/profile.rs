//! Per-group profiles.

use super::{means_sd, ColumnMoments};
use crate::error::{EntropyMaxError, Result};
use crate::partition::Partition;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Mean composition of one group and how far it sits from the population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupProfile {
    /// 0-based group id.
    pub group: usize,
    /// Number of samples in the group.
    pub size: usize,
    /// Per-bin mean over the group's samples.
    pub means: Vec<f64>,
    /// Per-bin Z statistic, `(group_mean - total_mean) / (sd / sqrt(size))`.
    pub z_scores: Vec<f64>,
}

/// Builds a [`GroupProfile`] for every group of `partition`, in group order.
///
/// Empty groups get zero means and zero Z statistics, as do bins whose
/// population standard deviation is zero.
///
/// # Errors
///
/// Returns `DimensionMismatch` if `partition` does not cover every row of `data`.
pub fn group_profiles(data: &Matrix<f64>, partition: &Partition) -> Result<Vec<GroupProfile>> {
    if partition.n_samples() != data.n_rows() {
        return Err(EntropyMaxError::dimension_mismatch(
            "partition samples",
            data.n_rows(),
            partition.n_samples(),
        ));
    }
    let m = data.n_cols();
    let ColumnMoments { means, std_devs } = means_sd(data);

    let mut sums = vec![vec![0.0; m]; partition.k()];
    for (row, &g) in data.rows().zip(partition.labels()) {
        for (acc, &v) in sums[g].iter_mut().zip(row) {
            *acc += v;
        }
    }

    let profiles = partition
        .group_sizes()
        .into_iter()
        .zip(sums)
        .enumerate()
        .map(|(group, (size, sum))| {
            if size == 0 {
                return GroupProfile {
                    group,
                    size,
                    means: vec![0.0; m],
                    z_scores: vec![0.0; m],
                };
            }
            let n = size as f64;
            let group_means: Vec<f64> = sum.iter().map(|s| s / n).collect();
            let z_scores = group_means
                .iter()
                .zip(means.iter().zip(&std_devs))
                .map(|(&gm, (&tm, &sd))| {
                    if sd > 0.0 {
                        (gm - tm) / (sd / n.sqrt())
                    } else {
                        0.0
                    }
                })
                .collect();
            GroupProfile {
                group,
                size,
                means: group_means,
                z_scores,
            }
        })
        .collect();
    Ok(profiles)
}
