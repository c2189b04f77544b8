//! Linear search.

use crate::step::{Highlight, Outcome, Progress, Step, StepSource};

/// Scans left to right, reporting each probe before testing it.
#[derive(Debug, Clone)]
pub struct LinearSearch<T> {
    values: Vec<T>,
    target: T,
    next: usize,
    /// Index reported by the last probe and not yet tested.
    probed: Option<usize>,
    outcome: Option<Outcome<T>>,
}

impl<T: PartialEq + Clone> LinearSearch<T> {
    pub fn new(values: Vec<T>, target: T) -> Self {
        Self {
            values,
            target,
            next: 0,
            probed: None,
            outcome: None,
        }
    }

    fn complete(&mut self, outcome: Outcome<T>) -> Progress<T> {
        self.outcome = Some(outcome.clone());
        Progress::Complete(outcome)
    }
}

impl<T: PartialEq + Clone> StepSource<T> for LinearSearch<T> {
    fn resume(&mut self) -> Progress<T> {
        if let Some(outcome) = &self.outcome {
            return Progress::Complete(outcome.clone());
        }

        if let Some(i) = self.probed.take() {
            if self.values[i] == self.target {
                return self.complete(Outcome::Found(i));
            }
            self.next = i + 1;
        }

        if self.next < self.values.len() {
            self.probed = Some(self.next);
            Progress::Yield(Step::Probe {
                highlighted: Highlight::one(self.next),
            })
        } else {
            self.complete(Outcome::NotFound)
        }
    }
}
