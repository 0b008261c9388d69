//! Sample-to-group assignments.
//!
//! A [`Partition`] is total: every sample carries a group id in `[0, k)`.
//! Reported pages list `(sample name, 1-based group)` pairs;
//! [`Partition::from_assignments`] turns one page into a partition aligned
//! with the table's row order.

use crate::data::SampleIndex;
use crate::error::{EntropyMaxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many unassigned sample names to carry in an [`AssignmentGap`].
const UNASSIGNED_PREVIEW: usize = 3;

/// One `(sample, group)` line of a reported page. `group` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Sample identifier as written in the page.
    pub sample: String,
    /// 1-based group number.
    pub group: usize,
}

impl Assignment {
    /// Creates an assignment.
    #[must_use]
    pub fn new(sample: impl Into<String>, group: usize) -> Self {
        Self {
            sample: sample.into(),
            group,
        }
    }
}

/// Why a page could not be turned into a total partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentGap {
    /// The page names a sample with no remaining matching row.
    Exhausted {
        /// Sample name that could not be placed
        sample: String,
    },
    /// Some rows were never referenced by the page.
    Unassigned {
        /// Number of rows left without a group
        count: usize,
        /// The first few of their names
        samples: Vec<String>,
    },
    /// A group number outside `[1, k]`.
    GroupOutOfRange {
        /// Sample the group was given for
        sample: String,
        /// The offending 1-based group number
        group: usize,
    },
    /// The page names more groups than the table has samples.
    TooManyGroups {
        /// Page K
        k: usize,
        /// Number of samples in the table
        n: usize,
    },
}

impl fmt::Display for AssignmentGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentGap::Exhausted { sample } => {
                write!(f, "sample '{sample}' not found or exhausted in input")
            }
            AssignmentGap::Unassigned { count, samples } => {
                write!(f, "missing group assignments for {count} samples (e.g. {samples:?})")
            }
            AssignmentGap::GroupOutOfRange { sample, group } => {
                write!(f, "sample '{sample}' assigned to group {group}, outside the page's range")
            }
            AssignmentGap::TooManyGroups { k, n } => {
                write!(f, "{k} groups requested for only {n} samples")
            }
        }
    }
}

/// A total assignment of samples to `k` groups.
///
/// # Examples
///
/// ```
/// use entropymax::partition::Partition;
///
/// let p = Partition::new(vec![0, 1, 0, 1], 2).unwrap();
/// assert_eq!(p.group_sizes(), vec![2, 2]);
/// assert!(Partition::new(vec![0, 2], 2).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    labels: Vec<usize>,
    k: usize,
}

impl Partition {
    /// Creates a partition from 0-based labels.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPartition` if `k == 0` or any label is `>= k`.
    pub fn new(labels: Vec<usize>, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(EntropyMaxError::invalid_partition("k must be at least 1"));
        }
        if let Some((i, &g)) = labels.iter().enumerate().find(|(_, &g)| g >= k) {
            return Err(EntropyMaxError::invalid_partition(format!(
                "sample {i} has label {g}, outside [0, {k})"
            )));
        }
        Ok(Self { labels, k })
    }

    /// Every sample in its own group.
    #[must_use]
    pub fn singletons(n: usize) -> Self {
        Self {
            labels: (0..n).collect(),
            k: n.max(1),
        }
    }

    /// Reconstructs a partition from one reported page.
    ///
    /// Pairs are consumed in page order; each takes the next unused row with
    /// the same name from `index`. Group numbers are 1-based.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssignmentGap`] found. A partition that leaves
    /// rows unassigned is rejected rather than defaulting them to a group.
    /// `k` larger than the number of rows is rejected before anything sized
    /// by `k` is allocated.
    pub fn from_assignments(
        index: &SampleIndex,
        assignments: &[Assignment],
        k: usize,
    ) -> std::result::Result<Self, AssignmentGap> {
        let n = index.n_rows();
        if k > n.max(1) {
            return Err(AssignmentGap::TooManyGroups { k, n });
        }
        let mut slots: Vec<Option<usize>> = vec![None; index.n_rows()];
        let mut cursor = index.cursor();

        for a in assignments {
            if a.group == 0 || a.group > k {
                return Err(AssignmentGap::GroupOutOfRange {
                    sample: a.sample.clone(),
                    group: a.group,
                });
            }
            let row = cursor.take(&a.sample).ok_or_else(|| AssignmentGap::Exhausted {
                sample: a.sample.clone(),
            })?;
            slots[row] = Some(a.group - 1);
        }

        let unassigned: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect();
        if !unassigned.is_empty() {
            let samples = unassigned
                .iter()
                .take(UNASSIGNED_PREVIEW)
                .filter_map(|&i| index.name(i).map(str::to_string))
                .collect();
            return Err(AssignmentGap::Unassigned {
                count: unassigned.len(),
                samples,
            });
        }

        Ok(Self {
            labels: slots.into_iter().flatten().collect(),
            k,
        })
    }

    /// Number of groups.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of samples covered.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    /// 0-based group id of every sample, in row order.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Group of sample `i`.
    #[must_use]
    pub fn label(&self, i: usize) -> usize {
        self.labels[i]
    }

    /// Number of samples in each group (may contain zeros).
    #[must_use]
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &g in &self.labels {
            sizes[g] += 1;
        }
        sizes
    }

    /// Row indices of the samples in group `g`.
    pub fn members(&self, g: usize) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, &label)| label == g)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(ids: &[&str]) -> SampleIndex {
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        SampleIndex::new(&ids)
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = Partition::new(vec![0, 1, 3], 3).unwrap_err();
        assert!(err.to_string().contains("label 3"));
    }

    #[test]
    fn test_new_rejects_zero_groups() {
        assert!(Partition::new(vec![], 0).is_err());
    }

    #[test]
    fn test_singletons() {
        let p = Partition::singletons(4);
        assert_eq!(p.k(), 4);
        assert_eq!(p.group_sizes(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_members() {
        let p = Partition::new(vec![1, 0, 1, 1], 2).expect("valid labels");
        assert_eq!(p.members(1).collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(p.members(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_from_assignments_duplicates_consumed_in_order() {
        let idx = index(&["X", "Y", "X"]);
        let page = vec![
            Assignment::new("X", 2),
            Assignment::new("Y", 1),
            Assignment::new("X", 1),
        ];
        let p = Partition::from_assignments(&idx, &page, 2).expect("complete page");
        assert_eq!(p.labels(), &[1, 0, 0]);
    }

    #[test]
    fn test_from_assignments_exhausted() {
        let idx = index(&["X", "Y"]);
        let page = vec![
            Assignment::new("X", 1),
            Assignment::new("X", 2),
            Assignment::new("Y", 2),
        ];
        let gap = Partition::from_assignments(&idx, &page, 2).unwrap_err();
        assert_eq!(gap, AssignmentGap::Exhausted { sample: "X".into() });
    }

    #[test]
    fn test_from_assignments_unknown_name() {
        let idx = index(&["X"]);
        let gap = Partition::from_assignments(&idx, &[Assignment::new("Q", 1)], 1).unwrap_err();
        assert!(matches!(gap, AssignmentGap::Exhausted { .. }));
    }

    #[test]
    fn test_from_assignments_unassigned_rows() {
        let idx = index(&["X", "Y", "Z"]);
        let gap = Partition::from_assignments(&idx, &[Assignment::new("Y", 1)], 1).unwrap_err();
        match gap {
            AssignmentGap::Unassigned { count, samples } => {
                assert_eq!(count, 2);
                assert_eq!(samples, vec!["X".to_string(), "Z".to_string()]);
            }
            other => panic!("unexpected gap {other:?}"),
        }
    }

    #[test]
    fn test_from_assignments_group_out_of_range() {
        let idx = index(&["X", "Y"]);
        let page = vec![Assignment::new("X", 1), Assignment::new("Y", 3)];
        let gap = Partition::from_assignments(&idx, &page, 2).unwrap_err();
        assert_eq!(
            gap,
            AssignmentGap::GroupOutOfRange {
                sample: "Y".into(),
                group: 3
            }
        );
        let zero = Partition::from_assignments(&idx, &[Assignment::new("X", 0)], 2).unwrap_err();
        assert!(matches!(zero, AssignmentGap::GroupOutOfRange { group: 0, .. }));
    }

    #[test]
    fn test_from_assignments_too_many_groups() {
        let idx = index(&["X", "Y"]);
        let page = vec![Assignment::new("X", 1), Assignment::new("Y", 3)];
        let gap = Partition::from_assignments(&idx, &page, 3).unwrap_err();
        assert_eq!(gap, AssignmentGap::TooManyGroups { k: 3, n: 2 });
        let huge = Partition::from_assignments(&idx, &page, usize::MAX).unwrap_err();
        assert!(matches!(huge, AssignmentGap::TooManyGroups { .. }));
        assert!(huge.to_string().contains("only 2 samples"));
    }

    #[test]
    fn test_gap_display() {
        let gap = AssignmentGap::Exhausted { sample: "S9".into() };
        assert!(gap.to_string().contains("S9"));
    }
}
