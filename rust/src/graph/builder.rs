//! Graph construction from catalog records.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use thiserror::Error;

use crate::catalog::{CatalogError, CourseCatalog};
use crate::conditions::{resolve_requisites, RequisiteEdges};
use crate::models::{CourseId, CourseRecord, Profile, RequisiteKind, Term, TrackId, TrackRecord};
use crate::{log_changes, log_debug};

use super::{CourseGraph, NodeIndex};

/// Errors raised while building the course graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Course not found in catalog: {0}")]
    MissingCourse(CourseId),
    #[error("Track not found in catalog: {0}")]
    MissingTrack(TrackId),
    #[error("Prerequisite cycle detected among: {0:?}")]
    PrerequisiteCycle(Vec<CourseId>),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Build the dependency graph for a profile.
///
/// Pulls in every required course, every course required by one of the
/// profile's tracks, and all of their transitive prerequisites and
/// corequisites. Courses covered by transfer credit (and everything they
/// require) are left out. `prior_placements` are restored onto the nodes
/// afterwards.
///
/// # Errors
/// * `MissingCourse` / `MissingTrack` if the catalog lacks a referenced id
/// * `PrerequisiteCycle` if the prerequisites cannot be ordered
pub fn build_graph<C: CourseCatalog + ?Sized>(
    catalog: &C,
    profile: &Profile,
    prior_placements: &FxHashMap<CourseId, Term>,
    verbosity: u8,
) -> Result<CourseGraph, GraphError> {
    let satisfied = transfer_closure(catalog, &profile.transfer_credits, verbosity)?;

    // Seeds in deterministic order: explicit requirements, then tracks
    let mut seeds: Vec<CourseId> = Vec::new();
    let mut seed_tags: Vec<(CourseId, TrackId)> = Vec::new();
    for id in &profile.required_courses {
        seeds.push(id.clone());
    }
    for track in resolve_tracks(catalog, &profile.tracks)? {
        for id in &track.required_courses {
            seeds.push(id.clone());
            seed_tags.push((id.clone(), track.id.clone()));
        }
    }

    let mut known: FxHashSet<CourseId> = FxHashSet::default();
    let mut frontier: Vec<CourseId> = Vec::new();
    for id in seeds {
        if !satisfied.contains(&id) && known.insert(id.clone()) {
            frontier.push(id);
        }
    }

    let mut graph = CourseGraph::new();
    let mut pending_edges: Vec<(NodeIndex, RequisiteEdges)> = Vec::new();

    while !frontier.is_empty() {
        log_debug!(verbosity, "Resolving {} catalog courses", frontier.len());
        let records = index_records(catalog.resolve_courses(&frontier)?);
        let mut next: Vec<CourseId> = Vec::new();

        for id in &frontier {
            let record = records
                .get(id.as_str())
                .ok_or_else(|| GraphError::MissingCourse(id.clone()))?;
            let idx = graph.add_course(record);

            let mut edges = resolve_requisites(record);
            edges.prerequisites.retain(|c| !satisfied.contains(c));
            edges.corequisites.retain(|c| !satisfied.contains(c));
            for referenced in edges.referenced() {
                if known.insert(referenced.clone()) {
                    next.push(referenced.clone());
                }
            }
            pending_edges.push((idx, edges));
        }

        frontier = next;
    }

    for (to, edges) in &pending_edges {
        for id in &edges.prerequisites {
            if let Some(from) = graph.index_of(id) {
                graph.add_edge(from, *to, RequisiteKind::Prerequisite);
            }
        }
        for id in &edges.corequisites {
            if let Some(from) = graph.index_of(id) {
                graph.add_edge(from, *to, RequisiteKind::Corequisite);
            }
        }
    }

    propagate_tracks(&mut graph, &seed_tags);
    check_orderable(&graph)?;

    let unknown = graph.restore_placements(prior_placements);
    for id in unknown {
        log_debug!(verbosity, "Ignoring prior placement of {}: not in plan", id);
    }

    log_changes!(
        verbosity,
        "Built course graph: {} courses, {} edges",
        graph.len(),
        graph.edges().count()
    );

    Ok(graph)
}

/// Transfer courses plus everything they transitively require.
///
/// Ids the catalog does not know are still treated as satisfied.
fn transfer_closure<C: CourseCatalog + ?Sized>(
    catalog: &C,
    transfer_credits: &[CourseId],
    verbosity: u8,
) -> Result<FxHashSet<CourseId>, GraphError> {
    let mut satisfied: FxHashSet<CourseId> = FxHashSet::default();
    let mut frontier: Vec<CourseId> = Vec::new();
    for id in transfer_credits {
        if satisfied.insert(id.clone()) {
            frontier.push(id.clone());
        }
    }

    while !frontier.is_empty() {
        let records = catalog.resolve_courses(&frontier)?;
        if records.len() < frontier.len() {
            log_debug!(
                verbosity,
                "{} transfer courses not found in catalog",
                frontier.len() - records.len()
            );
        }
        let mut next = Vec::new();
        for record in &records {
            for referenced in resolve_requisites(record).referenced() {
                if satisfied.insert(referenced.clone()) {
                    next.push(referenced.clone());
                }
            }
        }
        frontier = next;
    }

    Ok(satisfied)
}

fn resolve_tracks<C: CourseCatalog + ?Sized>(
    catalog: &C,
    track_ids: &[TrackId],
) -> Result<Vec<TrackRecord>, GraphError> {
    if track_ids.is_empty() {
        return Ok(Vec::new());
    }
    let records = catalog.resolve_tracks(track_ids)?;
    let mut by_id: FxHashMap<&str, &TrackRecord> =
        records.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut ordered = Vec::with_capacity(track_ids.len());
    for id in track_ids {
        match by_id.remove(id.as_str()) {
            Some(track) => ordered.push(track.clone()),
            None if ordered.iter().any(|t| t.id == *id) => {}
            None => return Err(GraphError::MissingTrack(id.clone())),
        }
    }
    Ok(ordered)
}

fn index_records(records: Vec<CourseRecord>) -> FxHashMap<String, CourseRecord> {
    records.into_iter().map(|r| (r.id.clone(), r)).collect()
}

/// Tag every course with the tracks whose requirements pulled it in.
fn propagate_tracks(graph: &mut CourseGraph, seed_tags: &[(CourseId, TrackId)]) {
    let mut queue: VecDeque<(NodeIndex, TrackId)> = VecDeque::new();
    for (id, track) in seed_tags {
        if let Some(idx) = graph.index_of(id) {
            queue.push_back((idx, track.clone()));
        }
    }

    while let Some((idx, track)) = queue.pop_front() {
        if !graph.nodes[idx].tracks.insert(track.clone()) {
            continue;
        }
        for &(source, _) in &graph.incoming[idx] {
            if !graph.nodes[source].tracks.contains(&track) {
                queue.push_back((source, track.clone()));
            }
        }
    }
}

/// Verify prerequisites can be ordered once corequisite groups are merged.
///
/// This catches plain prerequisite cycles as well as a prerequisite chain
/// between two courses that must share a term.
fn check_orderable(graph: &CourseGraph) -> Result<(), GraphError> {
    let (group_of, groups) = graph.corequisite_groups();

    let mut in_degree = vec![0usize; groups.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); groups.len()];
    for edge in graph.edges() {
        if edge.kind != RequisiteKind::Prerequisite {
            continue;
        }
        let (from, to) = (group_of[edge.from], group_of[edge.to]);
        successors[from].push(to);
        in_degree[to] += 1;
    }

    let mut queue: VecDeque<usize> = (0..groups.len()).filter(|&g| in_degree[g] == 0).collect();
    let mut visited = 0;
    while let Some(group) = queue.pop_front() {
        visited += 1;
        for &next in &successors[group] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if visited == groups.len() {
        return Ok(());
    }

    let mut involved: Vec<CourseId> = groups
        .iter()
        .enumerate()
        .filter(|(g, _)| in_degree[*g] > 0)
        .flat_map(|(_, members)| members.iter().map(|&n| graph.node(n).id.clone()))
        .collect();
    involved.sort();
    Err(GraphError::PrerequisiteCycle(involved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use chrono::NaiveDate;

    fn course(id: &str, prereqs: &[&str]) -> CourseRecord {
        let record = CourseRecord::new(id, format!("Course {}", id), 3.0);
        if prereqs.is_empty() {
            record
        } else {
            record.with_requisite(RequisiteKind::Prerequisite, prereqs)
        }
    }

    fn profile(required: &[&str]) -> Profile {
        let mut profile = Profile::new(8, 3, NaiveDate::from_ymd_opt(2025, 8, 25).unwrap());
        profile.required_courses = required.iter().map(|c| c.to_string()).collect();
        profile
    }

    /// Catalog wrapper that records every batch it is asked for.
    struct CountingCatalog {
        inner: InMemoryCatalog,
        calls: std::cell::RefCell<Vec<Vec<CourseId>>>,
    }

    impl CourseCatalog for CountingCatalog {
        fn resolve_courses(&self, ids: &[CourseId]) -> Result<Vec<CourseRecord>, CatalogError> {
            self.calls.borrow_mut().push(ids.to_vec());
            self.inner.resolve_courses(ids)
        }

        fn resolve_tracks(&self, ids: &[TrackId]) -> Result<Vec<TrackRecord>, CatalogError> {
            self.inner.resolve_tracks(ids)
        }
    }

    #[test]
    fn test_pulls_in_transitive_prerequisites() {
        let catalog = InMemoryCatalog::new(
            vec![course("A", &[]), course("B", &["A"]), course("C", &["B"])],
            vec![],
        );
        let graph = build_graph(&catalog, &profile(&["C"]), &FxHashMap::default(), 0).unwrap();

        assert_eq!(graph.len(), 3);
        let b = graph.index_of("B").unwrap();
        let c = graph.index_of("C").unwrap();
        assert_eq!(graph.prerequisites(c).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_one_catalog_call_per_frontier() {
        let catalog = CountingCatalog {
            inner: InMemoryCatalog::new(
                vec![course("A", &[]), course("B", &["A"]), course("C", &["A", "B"])],
                vec![],
            ),
            calls: Default::default(),
        };
        build_graph(&catalog, &profile(&["C"]), &FxHashMap::default(), 0).unwrap();

        let calls = catalog.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], vec!["C".to_string()]);
        assert_eq!(calls[1], vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_missing_course_is_an_error() {
        let catalog = InMemoryCatalog::new(vec![course("B", &["GHOST"])], vec![]);
        let result = build_graph(&catalog, &profile(&["B"]), &FxHashMap::default(), 0);
        assert_eq!(result.unwrap_err(), GraphError::MissingCourse("GHOST".to_string()));
    }

    #[test]
    fn test_missing_track_is_an_error() {
        let catalog = InMemoryCatalog::new(vec![course("A", &[])], vec![]);
        let mut p = profile(&[]);
        p.tracks = vec!["math".to_string()];
        let result = build_graph(&catalog, &p, &FxHashMap::default(), 0);
        assert_eq!(result.unwrap_err(), GraphError::MissingTrack("math".to_string()));
    }

    #[test]
    fn test_cycle_fails_loudly() {
        let catalog = InMemoryCatalog::new(vec![course("A", &["B"]), course("B", &["A"])], vec![]);
        let result = build_graph(&catalog, &profile(&["A"]), &FxHashMap::default(), 0);
        assert_eq!(
            result.unwrap_err(),
            GraphError::PrerequisiteCycle(vec!["A".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn test_ordered_corequisite_group_is_a_cycle() {
        // LAB is a corequisite of C but also (via B) a prerequisite of it
        let catalog = InMemoryCatalog::new(
            vec![
                course("LAB", &[]),
                course("B", &["LAB"]),
                course("C", &["B"]).with_requisite(RequisiteKind::Corequisite, &["LAB"]),
            ],
            vec![],
        );
        let result = build_graph(&catalog, &profile(&["C"]), &FxHashMap::default(), 0);
        assert!(matches!(result, Err(GraphError::PrerequisiteCycle(_))));
    }

    #[test]
    fn test_transfer_closure_excluded() {
        let catalog = InMemoryCatalog::new(
            vec![course("A", &[]), course("B", &["A"]), course("C", &["B"])],
            vec![],
        );
        let mut p = profile(&["C"]);
        p.transfer_credits = vec!["B".to_string()];
        let graph = build_graph(&catalog, &p, &FxHashMap::default(), 0).unwrap();

        assert_eq!(graph.len(), 1);
        let c = graph.index_of("C").unwrap();
        assert_eq!(graph.prerequisites(c).count(), 0);
    }

    #[test]
    fn test_tracks_tag_pulled_in_courses() {
        let catalog = InMemoryCatalog::new(
            vec![course("A", &[]), course("B", &["A"]), course("X", &[])],
            vec![
                TrackRecord {
                    id: "cs".to_string(),
                    name: "Computer Science".to_string(),
                    required_courses: vec!["B".to_string()],
                },
                TrackRecord {
                    id: "math".to_string(),
                    name: "Mathematics".to_string(),
                    required_courses: vec!["A".to_string(), "X".to_string()],
                },
            ],
        );
        let mut p = profile(&[]);
        p.tracks = vec!["cs".to_string(), "math".to_string()];
        let graph = build_graph(&catalog, &p, &FxHashMap::default(), 0).unwrap();

        let tracks = |id: &str| -> Vec<String> {
            graph.get(id).unwrap().tracks.iter().cloned().collect()
        };
        assert_eq!(tracks("A"), vec!["cs".to_string(), "math".to_string()]);
        assert_eq!(tracks("B"), vec!["cs".to_string()]);
        assert_eq!(tracks("X"), vec!["math".to_string()]);
    }

    #[test]
    fn test_prior_placements_restored() {
        let catalog = InMemoryCatalog::new(vec![course("A", &[]), course("B", &["A"])], vec![]);
        let mut prior = FxHashMap::default();
        prior.insert("A".to_string(), 1);
        let graph = build_graph(&catalog, &profile(&["B"]), &prior, 0).unwrap();

        assert_eq!(graph.get("A").and_then(|n| n.term), Some(1));
        assert_eq!(graph.get("B").and_then(|n| n.term), None);
    }
}
