//! Worklist ordering for the scheduler.
//!
//! Units are taken generation by generation so prerequisites come first;
//! inside a generation the least slack goes first. Ties keep their original
//! position, which makes the order deterministic for a given graph.

use std::cmp::Ordering;

/// Sort key for one schedulable unit (lower = scheduled earlier).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorklistKey {
    /// Earliest feasible term of the unit.
    pub generation: i32,
    pub slack: i32,
    /// Position before sorting.
    pub position: usize,
}

impl Ord for WorklistKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.generation
            .cmp(&other.generation)
            .then(self.slack.cmp(&other.slack))
            .then(self.position.cmp(&other.position))
    }
}

impl PartialOrd for WorklistKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Order `items` by generation, then slack, keeping input order on ties.
pub fn sort_worklist<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (i32, i32),
{
    let mut keyed: Vec<(WorklistKey, T)> = items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            let (generation, slack) = key(&item);
            (
                WorklistKey {
                    generation,
                    slack,
                    position,
                },
                item,
            )
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}
