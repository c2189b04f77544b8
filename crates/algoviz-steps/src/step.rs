//! Observable units of algorithm progress.

use serde::{Deserialize, Serialize};

/// Indices a step marks as currently relevant (compared, swapped, or probed).
///
/// Holds one or two distinct indices in the order the algorithm reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Highlight(Vec<usize>);

impl Highlight {
    /// No highlighted indices.
    pub const fn none() -> Self {
        Self(Vec::new())
    }

    /// A single highlighted index.
    pub fn one(index: usize) -> Self {
        Self(vec![index])
    }

    /// Two highlighted indices. Equal indices collapse into one.
    pub fn pair(a: usize, b: usize) -> Self {
        if a == b {
            Self::one(a)
        } else {
            Self(vec![a, b])
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One unit of algorithm progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step<T> {
    /// The sequence may have changed since the previous step.
    Mutation {
        snapshot: Vec<T>,
        highlighted: Highlight,
    },
    /// A search looked at one position; the sequence is untouched.
    Probe { highlighted: Highlight },
}

impl<T> Step<T> {
    pub fn highlighted(&self) -> &Highlight {
        match self {
            Step::Mutation { highlighted, .. } => highlighted,
            Step::Probe { highlighted } => highlighted,
        }
    }

    /// The post-step sequence, if this step carries one.
    pub fn snapshot(&self) -> Option<&[T]> {
        match self {
            Step::Mutation { snapshot, .. } => Some(snapshot),
            Step::Probe { .. } => None,
        }
    }
}

/// Terminal value of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// A sort finished with this sequence.
    Sorted(Vec<T>),
    /// A search matched at this index.
    Found(usize),
    /// A search exhausted the sequence.
    NotFound,
}

impl<T> Outcome<T> {
    /// Index of the match for a successful search.
    pub fn found_index(&self) -> Option<usize> {
        match self {
            Outcome::Found(index) => Some(*index),
            _ => None,
        }
    }

    pub fn sorted(&self) -> Option<&[T]> {
        match self {
            Outcome::Sorted(values) => Some(values),
            _ => None,
        }
    }
}

/// Result of resuming a step source once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<T> {
    Yield(Step<T>),
    Complete(Outcome<T>),
}

/// A lazy, single-pass producer of steps.
///
/// Each call to [`resume`](StepSource::resume) runs the algorithm up to its
/// next observable step. Once a source returns [`Progress::Complete`] it keeps
/// returning the same outcome.
pub trait StepSource<T> {
    fn resume(&mut self) -> Progress<T>;
}

impl<T, S: StepSource<T> + ?Sized> StepSource<T> for Box<S> {
    fn resume(&mut self) -> Progress<T> {
        (**self).resume()
    }
}

/// Drain a source, collecting every step and the final outcome.
pub fn run_to_end<T, S: StepSource<T>>(mut source: S) -> (Vec<Step<T>>, Outcome<T>) {
    let mut steps = Vec::new();
    loop {
        match source.resume() {
            Progress::Yield(step) => steps.push(step),
            Progress::Complete(outcome) => return (steps, outcome),
        }
    }
}
