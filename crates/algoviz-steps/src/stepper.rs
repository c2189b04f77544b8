//! Resumable driver for one algorithm invocation.

use std::fmt;

use crate::step::{Outcome, Progress, Step, StepSource};

/// Result of advancing a [`RunHandle`] once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance<T> {
    /// The algorithm produced another step.
    Step(Step<T>),
    /// The algorithm is done. Repeated on every later call.
    Finished(Outcome<T>),
}

impl<T> Advance<T> {
    pub fn is_finished(&self) -> bool {
        matches!(self, Advance::Finished(_))
    }
}

/// The live, single-pass execution of one algorithm.
///
/// Once finished the handle never resumes its source again and always
/// reports the same outcome.
pub struct RunHandle<T> {
    source: Box<dyn StepSource<T> + Send + Sync>,
    outcome: Option<Outcome<T>>,
    steps_taken: usize,
}

impl<T: Clone> RunHandle<T> {
    pub fn new(source: impl StepSource<T> + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
            outcome: None,
            steps_taken: 0,
        }
    }

    /// Pull exactly one step, or report the cached outcome.
    pub fn advance(&mut self) -> Advance<T> {
        if let Some(outcome) = &self.outcome {
            return Advance::Finished(outcome.clone());
        }
        match self.source.resume() {
            Progress::Yield(step) => {
                self.steps_taken += 1;
                Advance::Step(step)
            }
            Progress::Complete(outcome) => {
                self.outcome = Some(outcome.clone());
                Advance::Finished(outcome)
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome<T>> {
        self.outcome.as_ref()
    }

    /// Number of steps produced so far.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }
}

impl<T> fmt::Debug for RunHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHandle")
            .field("finished", &self.outcome.is_some())
            .field("steps_taken", &self.steps_taken)
            .finish()
    }
}
