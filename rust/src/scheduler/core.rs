//! Greedy term-by-term scheduler.
//!
//! Corequisite groups are placed as single units. The worklist is ordered by
//! prerequisite generation and then slack, and every open term is filled in
//! laps over the remaining units until a lap places nothing or the term is
//! full. A second, unbalanced backfill pass picks up whatever the first pass
//! left behind.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::config::PlannerConfig;
use crate::graph::{CourseGraph, GraphError, NodeIndex};
use crate::models::{CourseId, Profile, Term, TrackId};
use crate::sorting::sort_worklist;
use crate::statistics::{compute_statistics, critical_path_length};
use crate::{log_changes, log_checks, log_debug};

use super::constraints::ConstraintSet;
use super::state::TermLoads;

/// Errors that reject a scheduling request before any placement is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
    #[error("Constraint references unknown course: {0}")]
    UnknownCourse(CourseId),
    #[error("Term {term} would hold {count} pinned courses but capacity is {capacity}")]
    ConstraintOverCapacity {
        term: Term,
        count: usize,
        capacity: usize,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result of a scheduling run. An infeasible plan is still a result.
#[derive(Clone, Debug)]
pub struct ScheduleOutcome {
    pub graph: CourseGraph,
    /// Courses without a term inside the deadline, in graph order.
    pub overflow: Vec<CourseId>,
}

impl ScheduleOutcome {
    /// Whether every course landed before the graduation deadline.
    pub fn is_complete(&self) -> bool {
        self.overflow.is_empty()
    }
}

/// A corequisite group placed atomically.
#[derive(Clone, Debug)]
struct Unit {
    members: Vec<NodeIndex>,
    generation: i32,
    slack: i32,
    tracks: BTreeSet<TrackId>,
}

/// Why a unit could not go into the current term.
#[derive(Clone, Copy, Debug)]
enum Deferral {
    Forbidden(NodeIndex),
    TermFull,
    Prerequisite {
        course: NodeIndex,
        prerequisite: NodeIndex,
    },
    Dependent {
        course: NodeIndex,
        dependent: NodeIndex,
    },
    TrackBalance,
}

impl Deferral {
    fn describe(&self, graph: &CourseGraph) -> String {
        match *self {
            Deferral::Forbidden(member) => {
                format!("{} is excluded from this term", graph.node(member).id)
            }
            Deferral::TermFull => "no room left in term".to_string(),
            Deferral::Prerequisite {
                course,
                prerequisite,
            } => format!(
                "{} waits for prerequisite {}",
                graph.node(course).id,
                graph.node(prerequisite).id
            ),
            Deferral::Dependent { course, dependent } => format!(
                "{} is already placed in or before this term and needs {} first",
                graph.node(dependent).id,
                graph.node(course).id
            ),
            Deferral::TrackBalance => "every track already holds its share of the term".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Pass {
    name: &'static str,
    balance: bool,
    enforce_deadline: bool,
}

/// Scheduler state for one run. Owns the graph it assigns terms on.
pub struct TermScheduler<'a> {
    graph: CourseGraph,
    profile: &'a Profile,
    config: &'a PlannerConfig,
    capacity: usize,
    closed_terms: FxHashSet<Term>,
    forbidden: FxHashSet<(NodeIndex, Term)>,
    loads: TermLoads,
    track_shares: FxHashMap<TrackId, f64>,
}

impl<'a> TermScheduler<'a> {
    /// Validate the request, refresh statistics and apply constraints.
    ///
    /// # Errors
    /// * `InvalidProfile` if capacity or deadline is zero
    /// * `UnknownCourse` if a constraint names a course outside the graph
    /// * `ConstraintOverCapacity` if pinned courses overfill a term
    /// * `Graph` if the prerequisite graph has a cycle
    pub fn new(
        mut graph: CourseGraph,
        profile: &'a Profile,
        constraints: &ConstraintSet,
        config: &'a PlannerConfig,
    ) -> Result<Self, SchedulerError> {
        if profile.courses_per_term == 0 {
            return Err(SchedulerError::InvalidProfile(
                "courses_per_term must be at least 1".to_string(),
            ));
        }
        if profile.terms_to_graduate == 0 {
            return Err(SchedulerError::InvalidProfile(
                "terms_to_graduate must be at least 1".to_string(),
            ));
        }

        let stats = compute_statistics(&graph, profile.terms_to_graduate)?;
        stats.apply(&mut graph);
        log_debug!(
            config.verbosity,
            "Critical path spans {} term(s)",
            critical_path_length(&stats)
        );

        let mut forbidden = FxHashSet::default();
        for constraint in &constraints.negative {
            let idx = graph
                .index_of(&constraint.course)
                .ok_or_else(|| SchedulerError::UnknownCourse(constraint.course.clone()))?;
            forbidden.insert((idx, constraint.term));
        }

        let capacity = profile.courses_per_term as usize;
        let mut pinned_terms: BTreeSet<Term> = BTreeSet::new();
        for constraint in &constraints.positive {
            for id in &constraint.courses {
                let idx = graph
                    .index_of(id)
                    .ok_or_else(|| SchedulerError::UnknownCourse(id.clone()))?;
                for member in graph.corequisite_group(idx) {
                    graph.node_mut(member).term = Some(constraint.term);
                }
            }
            pinned_terms.insert(constraint.term);
        }
        for &term in &pinned_terms {
            let count = graph.term_load(term);
            if count > capacity {
                return Err(SchedulerError::ConstraintOverCapacity {
                    term,
                    count,
                    capacity,
                });
            }
        }

        Ok(Self {
            graph,
            profile,
            config,
            capacity,
            closed_terms: constraints.closed_terms(),
            forbidden,
            loads: TermLoads::default(),
            track_shares: FxHashMap::default(),
        })
    }

    /// Place every unscheduled course and report what did not fit.
    pub fn run(mut self) -> ScheduleOutcome {
        let verbosity = self.config.verbosity;
        let (_, groups) = self.graph.corequisite_groups();

        let mut units = Vec::new();
        for members in groups {
            let placed = members.iter().filter_map(|&m| self.graph.node(m).term).min();
            if let Some(term) = placed {
                self.complete_group(&members, term);
                continue;
            }
            let unit = make_unit(&self.graph, members);
            if unit.members.len() > self.capacity {
                log_checks!(
                    verbosity,
                    "{} has {} corequisite courses, more than a term holds",
                    self.label(&unit),
                    unit.members.len()
                );
                continue;
            }
            units.push(unit);
        }

        self.loads = TermLoads::from_graph(&self.graph);
        let mut pending = sort_worklist(units, |unit| (unit.generation, unit.slack));
        self.track_shares = track_shares(&self.graph, &pending);

        log_changes!(
            verbosity,
            "Scheduling {} unit(s), {} per term, deadline before term {}",
            pending.len(),
            self.capacity,
            self.profile.terms_to_graduate
        );
        log_debug!(verbosity, "Track shares: {:?}", self.track_shares);

        self.walk(
            &mut pending,
            Pass {
                name: "first",
                balance: self.config.balance_tracks_evenly,
                enforce_deadline: true,
            },
        );
        if self.config.backfill && !pending.is_empty() {
            self.walk(
                &mut pending,
                Pass {
                    name: "backfill",
                    balance: false,
                    enforce_deadline: !self.config.backfill_past_deadline,
                },
            );
        }

        let overflow = overflow_courses(&self.graph, self.profile);
        if !overflow.is_empty() {
            log_changes!(verbosity, "Overflow: {}", overflow.join(", "));
        }

        ScheduleOutcome {
            graph: self.graph,
            overflow,
        }
    }

    /// Pull unscheduled members of a partly placed group into `term`.
    fn complete_group(&mut self, members: &[NodeIndex], term: Term) {
        for &member in members {
            let node = self.graph.node_mut(member);
            if node.term.is_none() {
                node.term = Some(term);
                log_debug!(
                    self.config.verbosity,
                    "{} follows its corequisites into term {}",
                    node.id,
                    term
                );
            }
        }
    }

    fn walk(&mut self, pending: &mut Vec<Unit>, pass: Pass) {
        let verbosity = self.config.verbosity;
        let limit = if pass.enforce_deadline {
            self.profile.terms_to_graduate
        } else {
            // Every term past the last placement can take at least one unit.
            let last = self.graph.last_term().unwrap_or(0);
            self.profile.terms_to_graduate.max(last + 1)
                + (pending.len() + self.closed_terms.len() + self.forbidden.len()) as Term
        };

        let mut term = self.next_open_term(self.profile.first_open_term());
        while !pending.is_empty() && term < limit {
            let placed = self.fill_term(pending, term, pass);
            log_changes!(
                verbosity,
                "{} pass: term {} holds {}/{} ({} unit(s) placed)",
                pass.name,
                term,
                self.loads.load(term),
                self.capacity,
                placed
            );
            term = self.next_open_term(term + 1);
        }

        if !pending.is_empty() {
            log_changes!(
                verbosity,
                "{} pass: {} unit(s) left unplaced",
                pass.name,
                pending.len()
            );
        }
    }

    /// Run laps over `pending` for one term. Placed units are removed and the
    /// rest keep their worklist order.
    fn fill_term(&mut self, pending: &mut Vec<Unit>, term: Term, pass: Pass) -> usize {
        let mut placed_total = 0;
        loop {
            let mut placed = 0;
            let mut deferred = Vec::with_capacity(pending.len());
            for unit in pending.drain(..) {
                if self.loads.load(term) >= self.capacity {
                    deferred.push(unit);
                    continue;
                }
                match self.check(&unit, term, pass) {
                    Ok(()) => {
                        self.place(&unit, term);
                        placed += 1;
                    }
                    Err(reason) => {
                        log_checks!(
                            self.config.verbosity,
                            "Deferred {} from term {}: {}",
                            self.label(&unit),
                            term,
                            reason.describe(&self.graph)
                        );
                        deferred.push(unit);
                    }
                }
            }
            *pending = deferred;
            placed_total += placed;
            if placed == 0 || pending.is_empty() || self.loads.load(term) >= self.capacity {
                return placed_total;
            }
        }
    }

    fn check(&self, unit: &Unit, term: Term, pass: Pass) -> Result<(), Deferral> {
        if let Some(&member) = unit
            .members
            .iter()
            .find(|&&m| self.forbidden.contains(&(m, term)))
        {
            return Err(Deferral::Forbidden(member));
        }
        if self.loads.load(term) + unit.members.len() > self.capacity {
            return Err(Deferral::TermFull);
        }
        for &course in &unit.members {
            for prerequisite in self.graph.prerequisites(course) {
                match self.graph.node(prerequisite).term {
                    Some(done) if done < term => {}
                    _ => {
                        return Err(Deferral::Prerequisite {
                            course,
                            prerequisite,
                        })
                    }
                }
            }
            // Pinned or previously placed dependents bound the unit from above
            for dependent in self.graph.dependents(course) {
                if self.graph.node(dependent).term.is_some_and(|t| t <= term) {
                    return Err(Deferral::Dependent { course, dependent });
                }
            }
        }
        if pass.balance && self.track_saturated(unit, term) {
            return Err(Deferral::TrackBalance);
        }
        Ok(())
    }

    /// True when the unit has tracks and each one already meets its share of `term`.
    fn track_saturated(&self, unit: &Unit, term: Term) -> bool {
        !unit.tracks.is_empty()
            && unit.tracks.iter().all(|track| {
                let share = self.track_shares.get(track).copied().unwrap_or(1.0);
                self.loads.track_load(term, track) as f64 / self.capacity as f64 >= share
            })
    }

    fn place(&mut self, unit: &Unit, term: Term) {
        for &member in &unit.members {
            let node = self.graph.node_mut(member);
            node.term = Some(term);
            self.loads.record(term, &node.tracks);
            log_changes!(self.config.verbosity, "  Placed {} in term {}", node.id, term);
        }
    }

    fn next_open_term(&self, mut term: Term) -> Term {
        while self.closed_terms.contains(&term) {
            term += 1;
        }
        term
    }

    fn label(&self, unit: &Unit) -> String {
        unit.members
            .iter()
            .map(|&m| self.graph.node(m).id.as_str())
            .collect::<Vec<_>>()
            .join("+")
    }
}

fn make_unit(graph: &CourseGraph, members: Vec<NodeIndex>) -> Unit {
    let generation = members
        .iter()
        .map(|&m| graph.node(m).earliest_term)
        .max()
        .unwrap_or(1);
    let slack = members
        .iter()
        .map(|&m| graph.node(m).slack)
        .min()
        .unwrap_or(0);
    let tracks = members
        .iter()
        .flat_map(|&m| graph.node(m).tracks.iter().cloned())
        .collect();
    Unit {
        members,
        generation,
        slack,
        tracks,
    }
}

/// Fraction of the worklist's courses carried by each track.
fn track_shares(graph: &CourseGraph, units: &[Unit]) -> FxHashMap<TrackId, f64> {
    let mut counts: FxHashMap<TrackId, usize> = FxHashMap::default();
    let mut total = 0usize;
    for unit in units {
        for &member in &unit.members {
            total += 1;
            for track in &graph.node(member).tracks {
                *counts.entry(track.clone()).or_default() += 1;
            }
        }
    }
    counts
        .into_iter()
        .map(|(track, count)| (track, count as f64 / total as f64))
        .collect()
}

/// Courses with no term, or a term at or past the deadline, in graph order.
pub fn overflow_courses(graph: &CourseGraph, profile: &Profile) -> Vec<CourseId> {
    graph
        .nodes()
        .filter(|node| !node.term.is_some_and(|t| profile.within_deadline(t)))
        .map(|node| node.id.clone())
        .collect()
}

/// Assign a term to every unscheduled course of `graph`.
///
/// Statistics are recomputed from scratch before placing. Placements already
/// on the graph (completed or previously planned courses) are kept.
///
/// # Errors
/// See [`TermScheduler::new`].
pub fn schedule_courses(
    graph: CourseGraph,
    profile: &Profile,
    constraints: &ConstraintSet,
    config: &PlannerConfig,
) -> Result<ScheduleOutcome, SchedulerError> {
    Ok(TermScheduler::new(graph, profile, constraints, config)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseRecord, RequisiteKind};
    use crate::validation::validate_schedule;
    use chrono::NaiveDate;

    fn graph_of(ids: &[&str], prereqs: &[(&str, &str)]) -> CourseGraph {
        let mut graph = CourseGraph::new();
        for id in ids {
            graph.add_course(&CourseRecord::new(*id, *id, 3.0));
        }
        for (from, to) in prereqs {
            let from = graph.index_of(from).unwrap();
            let to = graph.index_of(to).unwrap();
            graph.add_edge(from, to, RequisiteKind::Prerequisite);
        }
        graph
    }

    fn tag(graph: &mut CourseGraph, id: &str, track: &str) {
        let idx = graph.index_of(id).unwrap();
        graph.node_mut(idx).tracks.insert(track.to_string());
    }

    fn profile(terms_to_graduate: Term, courses_per_term: u32) -> Profile {
        Profile::new(
            terms_to_graduate,
            courses_per_term,
            NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(),
        )
    }

    fn unbalanced() -> PlannerConfig {
        PlannerConfig::default().with_balancing(false)
    }

    fn term_of(outcome: &ScheduleOutcome, id: &str) -> Option<Term> {
        outcome.graph.get(id).and_then(|n| n.term)
    }

    #[test]
    fn test_four_course_scenario() {
        let graph = graph_of(&["A", "B", "C", "D"], &[("A", "C"), ("B", "D"), ("C", "D")]);
        let outcome = schedule_courses(
            graph,
            &profile(4, 2),
            &ConstraintSet::new(),
            &PlannerConfig::default(),
        )
        .unwrap();

        assert_eq!(term_of(&outcome, "A"), Some(1));
        assert_eq!(term_of(&outcome, "B"), Some(1));
        assert_eq!(term_of(&outcome, "C"), Some(2));
        assert_eq!(term_of(&outcome, "D"), Some(3));
        assert!(outcome.is_complete());
        assert_eq!(outcome.graph.get("D").unwrap().earliest_term, 3);
    }

    #[test]
    fn test_capacity_and_prerequisite_order_hold() {
        let graph = graph_of(
            &["A", "B", "C", "D", "E", "F"],
            &[("A", "B"), ("B", "C"), ("D", "E")],
        );
        let outcome =
            schedule_courses(graph, &profile(10, 2), &ConstraintSet::new(), &unbalanced()).unwrap();

        for term in 1..10 {
            assert!(outcome.graph.term_load(term) <= 2);
        }
        for edge in outcome.graph.edges() {
            let from = outcome.graph.node(edge.from).term.unwrap();
            let to = outcome.graph.node(edge.to).term.unwrap();
            assert!(from < to);
        }
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_corequisites_share_a_term() {
        let mut graph = graph_of(&["A", "LAB", "B"], &[]);
        graph.add_edge(1, 0, RequisiteKind::Corequisite);
        let outcome =
            schedule_courses(graph, &profile(4, 2), &ConstraintSet::new(), &unbalanced()).unwrap();

        assert_eq!(term_of(&outcome, "A"), Some(1));
        assert_eq!(term_of(&outcome, "LAB"), Some(1));
        assert_eq!(term_of(&outcome, "B"), Some(2));
    }

    #[test]
    fn test_oversized_corequisite_group_overflows() {
        let mut graph = graph_of(&["A", "LAB"], &[]);
        graph.add_edge(1, 0, RequisiteKind::Corequisite);
        let outcome =
            schedule_courses(graph, &profile(4, 1), &ConstraintSet::new(), &unbalanced()).unwrap();

        assert_eq!(outcome.overflow, vec!["A".to_string(), "LAB".to_string()]);
        assert_eq!(term_of(&outcome, "A"), None);
    }

    #[test]
    fn test_negative_constraint_moves_course() {
        let graph = graph_of(&["A", "B"], &[]);
        let mut constraints = ConstraintSet::new();
        constraints.forbid("A", 1);
        let outcome = schedule_courses(graph, &profile(4, 2), &constraints, &unbalanced()).unwrap();

        assert_eq!(term_of(&outcome, "A"), Some(2));
        assert_eq!(term_of(&outcome, "B"), Some(1));
    }

    #[test]
    fn test_closed_term_takes_nothing_else() {
        let graph = graph_of(&["A", "B", "X"], &[]);
        let mut constraints = ConstraintSet::new();
        constraints.freeze(vec!["X".to_string()], 1);
        let outcome = schedule_courses(graph, &profile(4, 3), &constraints, &unbalanced()).unwrap();

        assert_eq!(outcome.graph.term_load(1), 1);
        assert_eq!(term_of(&outcome, "X"), Some(1));
        assert_eq!(term_of(&outcome, "A"), Some(2));
        assert_eq!(term_of(&outcome, "B"), Some(2));
    }

    #[test]
    fn test_pinned_term_stays_open() {
        let graph = graph_of(&["A", "B", "C"], &[]);
        let mut constraints = ConstraintSet::new();
        constraints.pin(vec!["C".to_string()], 2);
        let outcome = schedule_courses(graph, &profile(4, 2), &constraints, &unbalanced()).unwrap();

        assert_eq!(term_of(&outcome, "C"), Some(2));
        assert_eq!(term_of(&outcome, "A"), Some(1));
        assert_eq!(term_of(&outcome, "B"), Some(1));
    }

    #[test]
    fn test_pinning_pulls_in_corequisites() {
        let mut graph = graph_of(&["A", "LAB"], &[]);
        graph.add_edge(1, 0, RequisiteKind::Corequisite);
        let mut constraints = ConstraintSet::new();
        constraints.pin(vec!["A".to_string()], 3);
        let outcome = schedule_courses(graph, &profile(5, 2), &constraints, &unbalanced()).unwrap();

        assert_eq!(term_of(&outcome, "LAB"), Some(3));
    }

    #[test]
    fn test_pinned_dependent_keeps_prerequisite_out_of_its_term() {
        let graph = graph_of(&["A", "C"], &[("A", "C")]);
        let mut constraints = ConstraintSet::new();
        constraints.pin(vec!["C".to_string()], 1);
        let outcome = schedule_courses(graph, &profile(4, 2), &constraints, &unbalanced()).unwrap();

        assert_eq!(term_of(&outcome, "C"), Some(1));
        assert_eq!(term_of(&outcome, "A"), None);
        assert_eq!(outcome.overflow, vec!["A".to_string()]);
    }

    #[test]
    fn test_pins_respect_prerequisite_order() {
        let graph = graph_of(
            &["A", "B", "C", "D"],
            &[("A", "C"), ("B", "C"), ("C", "D")],
        );
        let mut constraints = ConstraintSet::new();
        constraints.pin(vec!["C".to_string()], 3);
        let student = profile(6, 2);
        let outcome = schedule_courses(graph, &student, &constraints, &unbalanced()).unwrap();

        assert!(outcome.is_complete());
        assert!(validate_schedule(&outcome.graph, &student, None).is_empty());
        assert_eq!(term_of(&outcome, "C"), Some(3));
        assert!(term_of(&outcome, "D").unwrap() > 3);
    }

    #[test]
    fn test_overfull_pin_rejected() {
        let graph = graph_of(&["A", "B"], &[]);
        let mut constraints = ConstraintSet::new();
        constraints.pin(vec!["A".to_string(), "B".to_string()], 1);
        let result = schedule_courses(graph, &profile(4, 1), &constraints, &unbalanced());

        assert_eq!(
            result.unwrap_err(),
            SchedulerError::ConstraintOverCapacity {
                term: 1,
                count: 2,
                capacity: 1
            }
        );
    }

    #[test]
    fn test_unknown_constraint_course_rejected() {
        let graph = graph_of(&["A"], &[]);
        let mut constraints = ConstraintSet::new();
        constraints.forbid("NOPE", 1);
        let result = schedule_courses(graph, &profile(4, 1), &constraints, &unbalanced());
        assert_eq!(
            result.unwrap_err(),
            SchedulerError::UnknownCourse("NOPE".to_string())
        );
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let graph = graph_of(&["A"], &[]);
        let result = schedule_courses(graph, &profile(4, 0), &ConstraintSet::new(), &unbalanced());
        assert!(matches!(result, Err(SchedulerError::InvalidProfile(_))));
    }

    #[test]
    fn test_infeasible_plan_reports_overflow() {
        let graph = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let outcome =
            schedule_courses(graph, &profile(3, 1), &ConstraintSet::new(), &unbalanced()).unwrap();

        assert_eq!(term_of(&outcome, "A"), Some(1));
        assert_eq!(term_of(&outcome, "B"), Some(2));
        assert_eq!(term_of(&outcome, "C"), None);
        assert_eq!(outcome.overflow, vec!["C".to_string()]);
    }

    #[test]
    fn test_backfill_past_deadline_places_but_still_overflows() {
        let graph = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let mut config = unbalanced();
        config.backfill_past_deadline = true;
        let outcome =
            schedule_courses(graph, &profile(3, 1), &ConstraintSet::new(), &config).unwrap();

        assert_eq!(term_of(&outcome, "C"), Some(3));
        assert_eq!(outcome.overflow, vec!["C".to_string()]);
    }

    #[test]
    fn test_default_config_never_places_past_deadline() {
        assert!(!PlannerConfig::default().backfill_past_deadline);

        let graph = graph_of(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C")]);
        let student = profile(3, 1);
        let outcome =
            schedule_courses(graph, &student, &ConstraintSet::new(), &PlannerConfig::default())
                .unwrap();

        assert!(outcome
            .graph
            .nodes()
            .all(|n| n.term.map_or(true, |t| t < student.terms_to_graduate)));
        assert_eq!(term_of(&outcome, "C"), None);
        assert!(outcome.overflow.contains(&"C".to_string()));
    }

    #[test]
    fn test_balancing_interleaves_tracks() {
        let mut graph = graph_of(&["X1", "X2", "Y1", "Y2"], &[]);
        tag(&mut graph, "X1", "x");
        tag(&mut graph, "X2", "x");
        tag(&mut graph, "Y1", "y");
        tag(&mut graph, "Y2", "y");

        let plain = schedule_courses(
            graph.clone(),
            &profile(10, 2),
            &ConstraintSet::new(),
            &unbalanced(),
        )
        .unwrap();
        assert_eq!(term_of(&plain, "X2"), Some(1));

        let balanced = schedule_courses(
            graph,
            &profile(10, 2),
            &ConstraintSet::new(),
            &PlannerConfig::default(),
        )
        .unwrap();
        assert_eq!(term_of(&balanced, "X1"), Some(1));
        assert_eq!(term_of(&balanced, "Y1"), Some(1));
        assert_eq!(term_of(&balanced, "X2"), Some(2));
        assert_eq!(term_of(&balanced, "Y2"), Some(2));
    }

    #[test]
    fn test_backfill_fills_gap_left_by_balancing() {
        // Balancing keeps X2 out of term 1, and term 2 is forbidden for it.
        let mut graph = graph_of(
            &["P", "Y1", "Y2", "Y3", "X1", "X2"],
            &[("P", "Y1"), ("P", "Y2"), ("P", "Y3")],
        );
        for id in ["Y1", "Y2", "Y3"] {
            tag(&mut graph, id, "y");
        }
        tag(&mut graph, "X1", "x");
        tag(&mut graph, "X2", "x");
        let mut constraints = ConstraintSet::new();
        constraints.forbid("X2", 2);

        let mut no_backfill = PlannerConfig::default();
        no_backfill.backfill = false;
        let partial =
            schedule_courses(graph.clone(), &profile(3, 3), &constraints, &no_backfill).unwrap();
        assert_eq!(partial.overflow, vec!["Y3".to_string(), "X2".to_string()]);

        let outcome =
            schedule_courses(graph, &profile(3, 3), &constraints, &PlannerConfig::default())
                .unwrap();
        assert_eq!(term_of(&outcome, "X2"), Some(1));
        assert_eq!(term_of(&outcome, "Y3"), Some(2));
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_completed_terms_are_not_reused() {
        let mut graph = graph_of(&["A", "B", "C"], &[("A", "B")]);
        graph.node_mut(0).term = Some(1);
        let mut student = profile(8, 2);
        student.current_term = 3;
        let outcome =
            schedule_courses(graph, &student, &ConstraintSet::new(), &unbalanced()).unwrap();

        assert_eq!(term_of(&outcome, "A"), Some(1));
        assert_eq!(term_of(&outcome, "B"), Some(3));
        assert_eq!(term_of(&outcome, "C"), Some(3));
    }
}
