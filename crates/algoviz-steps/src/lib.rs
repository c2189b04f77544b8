//! Algoviz Steps
//!
//! Sorting and searching algorithms that report their progress one
//! observable step at a time.
//!
//! # Model
//!
//! - **Step**: a mutation (new snapshot plus highlighted indices) or a probe
//!   (highlighted index only, sequence unchanged)
//! - **Outcome**: the sorted sequence, a found index, or not found
//! - **StepSource**: a lazy, single-pass state machine producing steps
//! - **RunHandle**: drives one source and caches its outcome
//!
//! Preconditions (a target for searches, ascending input for binary
//! search) are checked by [`select`] before a run exists.
//!
//! # Usage
//!
//! ```
//! use algoviz_steps::{select, Advance, AlgorithmKind, Outcome};
//!
//! let input = vec![3, 1, 2];
//! let mut run = select(AlgorithmKind::BubbleSort, &input, None)
//!     .unwrap()
//!     .launch(input);
//!
//! let mut steps = 0;
//! while let Advance::Step(_) = run.advance() {
//!     steps += 1;
//! }
//! assert_eq!(steps, 2);
//! assert_eq!(run.outcome(), Some(&Outcome::Sorted(vec![1, 2, 3])));
//! ```

pub mod algorithms;
mod error;
mod generator;
mod selection;
mod step;
mod stepper;

pub use error::{Result, SelectionError};
pub use generator::{generate, generate_random, generate_seeded, ArrayConfig, MAX_LEN};
pub use selection::{is_ascending, parse_target, select, AlgorithmKind, PreparedRun};
pub use step::{run_to_end, Highlight, Outcome, Progress, Step, StepSource};
pub use stepper::{Advance, RunHandle};
