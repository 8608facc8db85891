//! Course dependency graph.
//!
//! Nodes live in an arena addressed by [`NodeIndex`]; a hash map resolves
//! course ids to indices. Edges point from the required (or paired) course to
//! the course that needs it.

mod builder;

pub use builder::{build_graph, GraphError};

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeSet, VecDeque};

use crate::models::{CourseId, CourseRecord, RequisiteKind, Term, TrackId};

/// Position of a node in the graph arena.
pub type NodeIndex = usize;

/// A course in the plan together with its scheduling attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseNode {
    pub id: CourseId,
    pub name: String,
    pub credit_hours: f64,
    /// Tracks this course counts toward (empty for explicit requirements).
    pub tracks: BTreeSet<TrackId>,
    /// Assigned term, `None` until scheduled.
    pub term: Option<Term>,
    pub earliest_term: i32,
    pub latest_term: i32,
    pub slack: i32,
    /// Path-weighted count of transitive dependents.
    pub fan_out: u32,
}

impl CourseNode {
    fn from_record(record: &CourseRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            credit_hours: record.credit_hours,
            tracks: BTreeSet::new(),
            term: None,
            earliest_term: 0,
            latest_term: 0,
            slack: 0,
            fan_out: 0,
        }
    }
}

/// Directed, typed edge between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub kind: RequisiteKind,
}

#[derive(Clone, Debug, Default)]
pub struct CourseGraph {
    nodes: Vec<CourseNode>,
    index: FxHashMap<CourseId, NodeIndex>,
    outgoing: Vec<Vec<(NodeIndex, RequisiteKind)>>,
    incoming: Vec<Vec<(NodeIndex, RequisiteKind)>>,
}

impl CourseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for `record`, or return the existing node with the same id.
    pub fn add_course(&mut self, record: &CourseRecord) -> NodeIndex {
        if let Some(&idx) = self.index.get(&record.id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(CourseNode::from_record(record));
        self.index.insert(record.id.clone(), idx);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        idx
    }

    /// Add an edge `from -> to`. Returns false if nothing changed.
    ///
    /// A prerequisite edge replaces a corequisite edge between the same pair;
    /// a corequisite edge is ignored when the pair is already ordered.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: RequisiteKind) -> bool {
        if from == to {
            return false;
        }
        if self.has_edge(from, to, kind) {
            return false;
        }
        match kind {
            RequisiteKind::Prerequisite => {
                self.remove_edge(from, to, RequisiteKind::Corequisite);
                self.remove_edge(to, from, RequisiteKind::Corequisite);
            }
            RequisiteKind::Corequisite => {
                if self.has_edge(from, to, RequisiteKind::Prerequisite)
                    || self.has_edge(to, from, RequisiteKind::Prerequisite)
                    || self.has_edge(to, from, RequisiteKind::Corequisite)
                {
                    return false;
                }
            }
        }
        self.outgoing[from].push((to, kind));
        self.incoming[to].push((from, kind));
        true
    }

    fn has_edge(&self, from: NodeIndex, to: NodeIndex, kind: RequisiteKind) -> bool {
        self.outgoing[from].contains(&(to, kind))
    }

    fn remove_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: RequisiteKind) {
        self.outgoing[from].retain(|&e| e != (to, kind));
        self.incoming[to].retain(|&e| e != (from, kind));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    #[inline]
    pub fn node(&self, idx: NodeIndex) -> &CourseNode {
        &self.nodes[idx]
    }

    #[inline]
    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut CourseNode {
        &mut self.nodes[idx]
    }

    pub fn get(&self, id: &str) -> Option<&CourseNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CourseNode> {
        self.nodes.iter()
    }

    pub fn node_indices(&self) -> std::ops::Range<NodeIndex> {
        0..self.nodes.len()
    }

    /// Direct prerequisites of `idx`.
    pub fn prerequisites(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.incoming[idx]
            .iter()
            .filter(|(_, kind)| *kind == RequisiteKind::Prerequisite)
            .map(|&(n, _)| n)
    }

    /// Courses that list `idx` as a direct prerequisite.
    pub fn dependents(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.outgoing[idx]
            .iter()
            .filter(|(_, kind)| *kind == RequisiteKind::Prerequisite)
            .map(|&(n, _)| n)
    }

    /// Corequisite partners of `idx`, in either edge direction.
    pub fn corequisites(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.outgoing[idx]
            .iter()
            .chain(self.incoming[idx].iter())
            .filter(|(_, kind)| *kind == RequisiteKind::Corequisite)
            .map(|&(n, _)| n)
    }

    /// Every edge in the graph, grouped by source node.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.outgoing.iter().enumerate().flat_map(|(from, targets)| {
            targets.iter().map(move |&(to, kind)| Edge { from, to, kind })
        })
    }

    /// All nodes transitively linked to `idx` by corequisite edges, including
    /// `idx`, in ascending index order.
    pub fn corequisite_group(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut seen: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::from([idx]);
        seen.insert(idx);
        while let Some(current) = queue.pop_front() {
            for partner in self.corequisites(current) {
                if seen.insert(partner) {
                    queue.push_back(partner);
                }
            }
        }
        let mut group: Vec<NodeIndex> = seen.into_iter().collect();
        group.sort_unstable();
        group
    }

    /// Partition of all nodes into corequisite groups.
    ///
    /// Returns `(group_of, groups)`: `group_of[n]` is the group index of node
    /// `n`, and groups are ordered by their lowest node index.
    pub fn corequisite_groups(&self) -> (Vec<usize>, Vec<Vec<NodeIndex>>) {
        let mut group_of = vec![usize::MAX; self.nodes.len()];
        let mut groups: Vec<Vec<NodeIndex>> = Vec::new();
        for idx in self.node_indices() {
            if group_of[idx] != usize::MAX {
                continue;
            }
            let members = self.corequisite_group(idx);
            for &member in &members {
                group_of[member] = groups.len();
            }
            groups.push(members);
        }
        (group_of, groups)
    }

    /// Number of courses assigned to `term`.
    pub fn term_load(&self, term: Term) -> usize {
        self.nodes.iter().filter(|n| n.term == Some(term)).count()
    }

    /// Current `course id -> term` assignments.
    pub fn placements(&self) -> FxHashMap<CourseId, Term> {
        self.nodes
            .iter()
            .filter_map(|n| n.term.map(|t| (n.id.clone(), t)))
            .collect()
    }

    /// Highest assigned term, if any course is scheduled.
    pub fn last_term(&self) -> Option<Term> {
        self.nodes.iter().filter_map(|n| n.term).max()
    }

    /// Apply `placements` to matching nodes. Returns ids not present in the graph.
    pub fn restore_placements(&mut self, placements: &FxHashMap<CourseId, Term>) -> Vec<CourseId> {
        let mut unknown = Vec::new();
        for (id, &term) in placements {
            match self.index.get(id) {
                Some(&idx) => self.nodes[idx].term = Some(term),
                None => unknown.push(id.clone()),
            }
        }
        unknown.sort();
        unknown
    }

    pub fn clear_terms(&mut self) {
        for node in &mut self.nodes {
            node.term = None;
        }
    }
}
