//! Bubble sort.

use crate::step::{Highlight, Outcome, Progress, Step, StepSource};

/// Bubble sort over adjacent pairs, reporting only swaps.
///
/// Each pass shrinks the scanned range by one. The sort ends after the
/// first pass without a swap.
#[derive(Debug, Clone)]
pub struct BubbleSort<T> {
    values: Vec<T>,
    /// Length of the unsorted prefix scanned by the current pass.
    len: usize,
    /// Left index of the next pair to compare.
    cursor: usize,
    swapped: bool,
    done: bool,
}

impl<T: Ord + Clone> BubbleSort<T> {
    pub fn new(values: Vec<T>) -> Self {
        let len = values.len();
        Self {
            values,
            len,
            cursor: 0,
            swapped: false,
            done: false,
        }
    }
}

impl<T: Ord + Clone> StepSource<T> for BubbleSort<T> {
    fn resume(&mut self) -> Progress<T> {
        while !self.done {
            if self.cursor + 1 < self.len {
                let i = self.cursor;
                self.cursor += 1;
                if self.values[i] > self.values[i + 1] {
                    self.values.swap(i, i + 1);
                    self.swapped = true;
                    return Progress::Yield(Step::Mutation {
                        snapshot: self.values.clone(),
                        highlighted: Highlight::pair(i, i + 1),
                    });
                }
            } else if self.swapped {
                self.len -= 1;
                self.cursor = 0;
                self.swapped = false;
            } else {
                self.done = true;
            }
        }
        Progress::Complete(Outcome::Sorted(self.values.clone()))
    }
}
