//! Algorithm selection and precondition checks.
//!
//! Every check happens here, before a [`RunHandle`] exists. The algorithms
//! themselves never fail.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algorithms::{BinarySearch, BubbleSort, LinearSearch, MergeSort, QuickSort};
use crate::error::{Result, SelectionError};
use crate::stepper::RunHandle;

/// The algorithms a run can be started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlgorithmKind {
    BubbleSort,
    QuickSort,
    MergeSort,
    LinearSearch,
    BinarySearch,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 5] = [
        AlgorithmKind::BubbleSort,
        AlgorithmKind::QuickSort,
        AlgorithmKind::MergeSort,
        AlgorithmKind::LinearSearch,
        AlgorithmKind::BinarySearch,
    ];

    /// Wire name, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::BubbleSort => "bubbleSort",
            AlgorithmKind::QuickSort => "quickSort",
            AlgorithmKind::MergeSort => "mergeSort",
            AlgorithmKind::LinearSearch => "linearSearch",
            AlgorithmKind::BinarySearch => "binarySearch",
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, AlgorithmKind::LinearSearch | AlgorithmKind::BinarySearch)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self> {
        // Short names ("bubble", "quick", ...) are accepted as well.
        let key = s.trim().to_ascii_lowercase();
        let kind = match key.as_str() {
            "bubblesort" | "bubble" => AlgorithmKind::BubbleSort,
            "quicksort" | "quick" => AlgorithmKind::QuickSort,
            "mergesort" | "merge" => AlgorithmKind::MergeSort,
            "linearsearch" | "linear" => AlgorithmKind::LinearSearch,
            "binarysearch" | "binary" => AlgorithmKind::BinarySearch,
            _ => return Err(SelectionError::UnknownAlgorithm(s.to_string())),
        };
        Ok(kind)
    }
}

/// A validated algorithm choice, ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRun<T> {
    plan: Plan<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Plan<T> {
    Bubble,
    Quick,
    Merge,
    Linear(T),
    Binary(T),
}

impl<T> PreparedRun<T> {
    pub fn kind(&self) -> AlgorithmKind {
        match self.plan {
            Plan::Bubble => AlgorithmKind::BubbleSort,
            Plan::Quick => AlgorithmKind::QuickSort,
            Plan::Merge => AlgorithmKind::MergeSort,
            Plan::Linear(_) => AlgorithmKind::LinearSearch,
            Plan::Binary(_) => AlgorithmKind::BinarySearch,
        }
    }

    pub fn target(&self) -> Option<&T> {
        match &self.plan {
            Plan::Linear(target) | Plan::Binary(target) => Some(target),
            _ => None,
        }
    }
}

impl<T: Ord + Clone + Send + Sync + 'static> PreparedRun<T> {
    /// Build the run over `sequence`, which becomes the run's private copy.
    pub fn launch(self, sequence: Vec<T>) -> RunHandle<T> {
        match self.plan {
            Plan::Bubble => RunHandle::new(BubbleSort::new(sequence)),
            Plan::Quick => RunHandle::new(QuickSort::new(sequence)),
            Plan::Merge => RunHandle::new(MergeSort::new(sequence)),
            Plan::Linear(target) => RunHandle::new(LinearSearch::new(sequence, target)),
            Plan::Binary(target) => RunHandle::new(BinarySearch::new(sequence, target)),
        }
    }
}

/// Validate a choice against the sequence it will run on.
pub fn select<T: Ord>(
    kind: AlgorithmKind,
    sequence: &[T],
    target: Option<T>,
) -> Result<PreparedRun<T>> {
    let plan = match (kind, target) {
        (AlgorithmKind::BubbleSort, _) => Plan::Bubble,
        (AlgorithmKind::QuickSort, _) => Plan::Quick,
        (AlgorithmKind::MergeSort, _) => Plan::Merge,
        (_, None) => return Err(SelectionError::MissingTarget { algorithm: kind }),
        (AlgorithmKind::LinearSearch, Some(target)) => Plan::Linear(target),
        (AlgorithmKind::BinarySearch, Some(target)) => {
            if !is_ascending(sequence) {
                return Err(SelectionError::NotSorted { algorithm: kind });
            }
            Plan::Binary(target)
        }
    };
    Ok(PreparedRun { plan })
}

/// Whether `values` is in non-decreasing order.
pub fn is_ascending<T: Ord>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// Parse user-entered search input. Empty or non-numeric input gives `None`.
pub fn parse_target(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}
