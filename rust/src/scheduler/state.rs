//! Per-term occupancy tracked while scheduling.

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

use crate::graph::CourseGraph;
use crate::models::{Term, TrackId};

/// Course counts per term, overall and per track.
#[derive(Clone, Debug, Default)]
pub struct TermLoads {
    courses: FxHashMap<Term, usize>,
    tracks: FxHashMap<Term, FxHashMap<TrackId, usize>>,
}

impl TermLoads {
    /// Loads implied by the terms already assigned in `graph`.
    pub fn from_graph(graph: &CourseGraph) -> Self {
        let mut loads = Self::default();
        for node in graph.nodes() {
            if let Some(term) = node.term {
                loads.record(term, &node.tracks);
            }
        }
        loads
    }

    /// Count one course carrying `tracks` in `term`.
    pub fn record(&mut self, term: Term, tracks: &BTreeSet<TrackId>) {
        *self.courses.entry(term).or_default() += 1;
        let per_track = self.tracks.entry(term).or_default();
        for track in tracks {
            *per_track.entry(track.clone()).or_default() += 1;
        }
    }

    #[inline]
    pub fn load(&self, term: Term) -> usize {
        self.courses.get(&term).copied().unwrap_or(0)
    }

    pub fn track_load(&self, term: Term, track: &str) -> usize {
        self.tracks
            .get(&term)
            .and_then(|per_track| per_track.get(track))
            .copied()
            .unwrap_or(0)
    }
}
