//! Earliest/latest feasible terms, slack and fan-out over the prerequisite graph.

use crate::graph::{CourseGraph, GraphError, NodeIndex};
use crate::models::Term;

/// Per-node statistics, indexed by [`NodeIndex`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseStatistics {
    /// Prerequisite generations; generation `g` holds the nodes whose longest
    /// prerequisite chain has `g` links.
    pub generations: Vec<Vec<NodeIndex>>,
    pub earliest: Vec<i32>,
    pub latest: Vec<i32>,
    pub slack: Vec<i32>,
    pub fan_out: Vec<u32>,
}

impl CourseStatistics {
    /// Write the statistics onto the graph nodes. Terms are left untouched.
    pub fn apply(&self, graph: &mut CourseGraph) {
        for idx in graph.node_indices() {
            let node = graph.node_mut(idx);
            node.earliest_term = self.earliest[idx];
            node.latest_term = self.latest[idx];
            node.slack = self.slack[idx];
            node.fan_out = self.fan_out[idx];
        }
    }
}

/// Group nodes into topological generations over prerequisite edges (Kahn's algorithm).
///
/// Nodes inside a generation are in ascending index order.
///
/// # Errors
/// * `PrerequisiteCycle` listing the nodes that could not be ordered
pub fn topological_generations(graph: &CourseGraph) -> Result<Vec<Vec<NodeIndex>>, GraphError> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.prerequisites(idx).count())
        .collect();

    let mut current: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&idx| in_degree[idx] == 0)
        .collect();
    let mut generations: Vec<Vec<NodeIndex>> = Vec::new();
    let mut ordered = 0;

    while !current.is_empty() {
        ordered += current.len();
        let mut next: Vec<NodeIndex> = Vec::new();
        for &idx in &current {
            for dependent in graph.dependents(idx) {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    next.push(dependent);
                }
            }
        }
        next.sort_unstable();
        generations.push(current);
        current = next;
    }

    if ordered != graph.len() {
        let mut involved: Vec<String> = graph
            .node_indices()
            .filter(|&idx| in_degree[idx] > 0)
            .map(|idx| graph.node(idx).id.clone())
            .collect();
        involved.sort();
        return Err(GraphError::PrerequisiteCycle(involved));
    }

    Ok(generations)
}

/// Compute statistics for every node.
///
/// * earliest: 1 for courses without prerequisites, else 1 + max over prerequisites
/// * latest: `terms_to_graduate` for courses without dependents, else min over dependents - 1
/// * slack: latest - earliest
/// * fan-out: sum over direct dependents of (1 + their fan-out)
pub fn compute_statistics(
    graph: &CourseGraph,
    terms_to_graduate: Term,
) -> Result<CourseStatistics, GraphError> {
    let generations = topological_generations(graph)?;
    let n = graph.len();

    let mut earliest = vec![1i32; n];
    for generation in &generations {
        for &idx in generation {
            earliest[idx] = graph
                .prerequisites(idx)
                .map(|p| earliest[p] + 1)
                .max()
                .unwrap_or(1);
        }
    }

    let deadline = terms_to_graduate as i32;
    let mut latest = vec![deadline; n];
    let mut fan_out = vec![0u32; n];
    for generation in generations.iter().rev() {
        for &idx in generation {
            latest[idx] = graph
                .dependents(idx)
                .map(|d| latest[d] - 1)
                .min()
                .unwrap_or(deadline);
            fan_out[idx] = graph
                .dependents(idx)
                .fold(0u32, |acc, d| acc.saturating_add(fan_out[d].saturating_add(1)));
        }
    }

    let slack = (0..n).map(|idx| latest[idx] - earliest[idx]).collect();

    Ok(CourseStatistics {
        generations,
        earliest,
        latest,
        slack,
        fan_out,
    })
}

/// Longest prerequisite chain length in terms, i.e. the minimum number of
/// terms needed ignoring capacity.
pub fn critical_path_length(stats: &CourseStatistics) -> usize {
    stats.generations.len()
}
