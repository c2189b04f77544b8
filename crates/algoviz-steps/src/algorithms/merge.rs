//! Top-down merge sort.

use crate::step::{Highlight, Outcome, Progress, Step, StepSource};

/// A range on the recursion stack. `split` marks that both halves have
/// already been queued, so the next visit merges them.
#[derive(Debug, Clone, Copy)]
struct Frame {
    start: usize,
    end: usize,
    split: bool,
}

/// An in-progress merge of `values[start..=mid]` and `values[mid+1..=end]`.
#[derive(Debug, Clone)]
struct Merge<T> {
    start: usize,
    mid: usize,
    left: Vec<T>,
    right: Vec<T>,
    i: usize,
    j: usize,
    k: usize,
}

/// Merge sort splitting at `floor((start + end) / 2)`, left half inclusive.
///
/// Every element written back during a merge is one step. While both halves
/// have elements the highlight is the pair of read cursors; while draining
/// a leftover half it is the write cursor.
#[derive(Debug, Clone)]
pub struct MergeSort<T> {
    values: Vec<T>,
    frames: Vec<Frame>,
    merge: Option<Merge<T>>,
}

impl<T: Ord + Clone> MergeSort<T> {
    pub fn new(values: Vec<T>) -> Self {
        let frames = if values.len() > 1 {
            vec![Frame {
                start: 0,
                end: values.len() - 1,
                split: false,
            }]
        } else {
            Vec::new()
        };
        Self {
            values,
            frames,
            merge: None,
        }
    }

    fn begin_merge(&mut self, start: usize, end: usize) {
        let mid = (start + end) / 2;
        self.merge = Some(Merge {
            start,
            mid,
            left: self.values[start..=mid].to_vec(),
            right: self.values[mid + 1..=end].to_vec(),
            i: 0,
            j: 0,
            k: start,
        });
    }

    /// Write the next element of the active merge, if any remain.
    fn write_next(&mut self) -> Option<Highlight> {
        let m = self.merge.as_mut()?;
        let highlighted = if m.i < m.left.len() && m.j < m.right.len() {
            if m.left[m.i] <= m.right[m.j] {
                self.values[m.k] = m.left[m.i].clone();
                m.i += 1;
            } else {
                self.values[m.k] = m.right[m.j].clone();
                m.j += 1;
            }
            m.k += 1;
            Highlight::pair(m.start + m.i, m.mid + 1 + m.j)
        } else if m.i < m.left.len() {
            self.values[m.k] = m.left[m.i].clone();
            m.i += 1;
            m.k += 1;
            Highlight::one(m.k)
        } else if m.j < m.right.len() {
            self.values[m.k] = m.right[m.j].clone();
            m.j += 1;
            m.k += 1;
            Highlight::one(m.k)
        } else {
            self.merge = None;
            return None;
        };
        Some(highlighted)
    }
}

impl<T: Ord + Clone> StepSource<T> for MergeSort<T> {
    fn resume(&mut self) -> Progress<T> {
        loop {
            if let Some(highlighted) = self.write_next() {
                return Progress::Yield(Step::Mutation {
                    snapshot: self.values.clone(),
                    highlighted,
                });
            }

            let Some(frame) = self.frames.pop() else {
                return Progress::Complete(Outcome::Sorted(self.values.clone()));
            };
            if frame.split {
                self.begin_merge(frame.start, frame.end);
                continue;
            }

            let mid = (frame.start + frame.end) / 2;
            self.frames.push(Frame { split: true, ..frame });
            if mid + 1 < frame.end {
                self.frames.push(Frame {
                    start: mid + 1,
                    end: frame.end,
                    split: false,
                });
            }
            if frame.start < mid {
                self.frames.push(Frame {
                    start: frame.start,
                    end: mid,
                    split: false,
                });
            }
        }
    }
}
