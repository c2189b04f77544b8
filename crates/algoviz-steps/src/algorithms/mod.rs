//! Step-producing sort and search algorithms.
//!
//! Each algorithm is an explicit state machine over a private copy of its
//! input. Resuming it runs exactly up to the next observable step, so a
//! caller can interleave other work between steps without threads or
//! coroutines. Output is fully deterministic for a given input.

mod binary;
mod bubble;
mod linear;
mod merge;
mod quick;

pub use binary::BinarySearch;
pub use bubble::BubbleSort;
pub use linear::LinearSearch;
pub use merge::MergeSort;
pub use quick::QuickSort;
