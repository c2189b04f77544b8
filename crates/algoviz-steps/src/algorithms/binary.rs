//! Binary search over an ascending sequence.

use std::cmp::Ordering;

use crate::step::{Highlight, Outcome, Progress, Step, StepSource};

/// Binary search with inclusive bounds.
///
/// A match is remembered and the search keeps narrowing to the left, so
/// the result is the first occurrence of the target. The caller guarantees
/// the sequence is ascending.
#[derive(Debug, Clone)]
pub struct BinarySearch<T> {
    values: Vec<T>,
    target: T,
    low: usize,
    /// One past the inclusive upper bound, so an empty range needs no sign.
    end: usize,
    /// Midpoint reported by the last probe and not yet compared.
    probed: Option<usize>,
    candidate: Option<usize>,
}

impl<T: Ord + Clone> BinarySearch<T> {
    pub fn new(values: Vec<T>, target: T) -> Self {
        let end = values.len();
        Self {
            values,
            target,
            low: 0,
            end,
            probed: None,
            candidate: None,
        }
    }
}

impl<T: Ord + Clone> StepSource<T> for BinarySearch<T> {
    fn resume(&mut self) -> Progress<T> {
        if let Some(mid) = self.probed.take() {
            match self.values[mid].cmp(&self.target) {
                Ordering::Less => self.low = mid + 1,
                Ordering::Greater => self.end = mid,
                Ordering::Equal => {
                    self.candidate = Some(mid);
                    self.end = mid;
                }
            }
        }

        if self.low < self.end {
            let high = self.end - 1;
            let mid = self.low + (high - self.low) / 2;
            self.probed = Some(mid);
            return Progress::Yield(Step::Probe {
                highlighted: Highlight::one(mid),
            });
        }

        match self.candidate {
            Some(index) => Progress::Complete(Outcome::Found(index)),
            None => Progress::Complete(Outcome::NotFound),
        }
    }
}
