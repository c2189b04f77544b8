//! Quick sort with Lomuto partitioning.

use crate::step::{Highlight, Outcome, Progress, Step, StepSource};

/// An in-progress Lomuto partition of `values[low..=high]`.
#[derive(Debug, Clone, Copy)]
struct Partition {
    low: usize,
    high: usize,
    /// Next free slot of the "less than pivot" region.
    store: usize,
    /// Next element to compare against the pivot.
    scan: usize,
}

impl Partition {
    fn new(low: usize, high: usize) -> Self {
        Self {
            low,
            high,
            store: low,
            scan: low,
        }
    }
}

/// Quick sort using the last element of each range as pivot.
///
/// Recursion runs on an explicit stack of pending ranges; the left range of
/// a partition is always finished before the right one. Only element moves
/// are reported, the recursion itself is not.
#[derive(Debug, Clone)]
pub struct QuickSort<T> {
    values: Vec<T>,
    pending: Vec<(usize, usize)>,
    partition: Option<Partition>,
}

impl<T: Ord + Clone> QuickSort<T> {
    pub fn new(values: Vec<T>) -> Self {
        let pending = if values.len() > 1 {
            vec![(0, values.len() - 1)]
        } else {
            Vec::new()
        };
        Self {
            values,
            pending,
            partition: None,
        }
    }

    fn mutation(&self, highlighted: Highlight) -> Progress<T> {
        Progress::Yield(Step::Mutation {
            snapshot: self.values.clone(),
            highlighted,
        })
    }

    /// Queue the subranges around a placed pivot, left on top.
    fn push_subranges(&mut self, low: usize, pivot: usize, high: usize) {
        if pivot + 1 < high {
            self.pending.push((pivot + 1, high));
        }
        if pivot > low + 1 {
            self.pending.push((low, pivot - 1));
        }
    }
}

impl<T: Ord + Clone> StepSource<T> for QuickSort<T> {
    fn resume(&mut self) -> Progress<T> {
        loop {
            if let Some(part) = self.partition.as_mut() {
                if part.scan < part.high {
                    let j = part.scan;
                    part.scan += 1;
                    if self.values[j] < self.values[part.high] {
                        let i = part.store;
                        part.store += 1;
                        self.values.swap(i, j);
                        return self.mutation(Highlight::pair(i, j));
                    }
                    continue;
                }

                let Partition { low, high, store, .. } = *part;
                self.partition = None;
                self.values.swap(store, high);
                self.push_subranges(low, store, high);
                return self.mutation(Highlight::pair(store, high));
            }

            match self.pending.pop() {
                Some((low, high)) => self.partition = Some(Partition::new(low, high)),
                None => return Progress::Complete(Outcome::Sorted(self.values.clone())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::run_to_end;

    fn highlights(steps: &[Step<i64>]) -> Vec<Vec<usize>> {
        steps
            .iter()
            .map(|s| s.highlighted().indices().to_vec())
            .collect()
    }

    #[test]
    fn partition_reports_moves_then_pivot() {
        // pivot 3: 1 and 2 move into the low region, then 3 lands at index 2
        let (steps, outcome) = run_to_end(QuickSort::new(vec![1, 5, 2, 3]));

        assert_eq!(
            steps[..3],
            [
                Step::Mutation {
                    snapshot: vec![1, 5, 2, 3],
                    highlighted: Highlight::one(0),
                },
                Step::Mutation {
                    snapshot: vec![1, 2, 5, 3],
                    highlighted: Highlight::pair(1, 2),
                },
                Step::Mutation {
                    snapshot: vec![1, 2, 3, 5],
                    highlighted: Highlight::pair(2, 3),
                },
            ]
        );
        assert_eq!(outcome, Outcome::Sorted(vec![1, 2, 3, 5]));
    }

    #[test]
    fn left_range_before_right() {
        // First partition places 4 at index 3; then [2,1,3] left, then [6,5] right.
        let (steps, outcome) = run_to_end(QuickSort::new(vec![2, 6, 1, 5, 3, 4]));
        assert_eq!(
            highlights(&steps),
            vec![
                vec![0],    // 2 < 4 stays
                vec![1, 2], // 1 < 4
                vec![2, 4], // 3 < 4
                vec![3, 5], // pivot 4 placed
                // left [2,1,3] pivot 3
                vec![0],
                vec![1],
                vec![2],
                // left [2,1] pivot 1
                vec![0, 1],
                // right [6,5] pivot 5
                vec![4, 5],
            ]
        );
        assert_eq!(outcome, Outcome::Sorted(vec![1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn trivial_inputs_emit_nothing() {
        assert!(run_to_end(QuickSort::<i64>::new(vec![])).0.is_empty());
        assert!(run_to_end(QuickSort::new(vec![9])).0.is_empty());
    }

    #[test]
    fn duplicates_sort() {
        let (_, outcome) = run_to_end(QuickSort::new(vec![3, 1, 3, 1, 2, 3]));
        assert_eq!(outcome, Outcome::Sorted(vec![1, 1, 2, 3, 3, 3]));
    }
}
