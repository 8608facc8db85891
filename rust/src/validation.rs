//! Whole-schedule validity checks.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::graph::CourseGraph;
use crate::models::{CourseId, Profile, RequisiteKind, Term};

/// A broken scheduling rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleViolation {
    #[error("{course} is scheduled no later than its prerequisite {prerequisite}")]
    PrerequisiteOrder {
        course: CourseId,
        prerequisite: CourseId,
    },
    #[error("{course} and its corequisite {corequisite} are in different terms")]
    CorequisiteSplit {
        course: CourseId,
        corequisite: CourseId,
    },
    #[error("Term {term} holds {count} courses, capacity is {capacity}")]
    OverCapacity {
        term: Term,
        count: usize,
        capacity: usize,
    },
    #[error("{course} is in term {term}, past the graduation deadline")]
    PastDeadline { course: CourseId, term: Term },
    #[error("{course} was completed in term {completed} but now sits in {now:?}")]
    CompletedCourseMoved {
        course: CourseId,
        completed: Term,
        now: Option<Term>,
    },
}

/// List every rule the scheduled part of `graph` breaks.
///
/// Unscheduled courses are not violations by themselves; a scheduled course
/// with an unscheduled prerequisite is. `prior` holds the placements the
/// schedule was derived from, used to catch moved completed courses.
pub fn validate_schedule(
    graph: &CourseGraph,
    profile: &Profile,
    prior: Option<&FxHashMap<CourseId, Term>>,
) -> Vec<ScheduleViolation> {
    let mut violations = Vec::new();

    for edge in graph.edges() {
        let from = graph.node(edge.from);
        let to = graph.node(edge.to);
        match edge.kind {
            RequisiteKind::Prerequisite => {
                if let Some(term) = to.term {
                    if !from.term.is_some_and(|t| t < term) {
                        violations.push(ScheduleViolation::PrerequisiteOrder {
                            course: to.id.clone(),
                            prerequisite: from.id.clone(),
                        });
                    }
                }
            }
            RequisiteKind::Corequisite => {
                if from.term != to.term {
                    violations.push(ScheduleViolation::CorequisiteSplit {
                        course: to.id.clone(),
                        corequisite: from.id.clone(),
                    });
                }
            }
        }
    }

    let capacity = profile.courses_per_term as usize;
    let mut loads: BTreeMap<Term, usize> = BTreeMap::new();
    for term in graph.nodes().filter_map(|n| n.term) {
        *loads.entry(term).or_default() += 1;
    }
    for (&term, &count) in &loads {
        if count > capacity {
            violations.push(ScheduleViolation::OverCapacity {
                term,
                count,
                capacity,
            });
        }
    }

    for node in graph.nodes() {
        if let Some(term) = node.term {
            if !profile.within_deadline(term) {
                violations.push(ScheduleViolation::PastDeadline {
                    course: node.id.clone(),
                    term,
                });
            }
        }
    }

    if let Some(prior) = prior {
        for node in graph.nodes() {
            if let Some(&completed) = prior.get(&node.id) {
                if completed < profile.current_term && node.term != Some(completed) {
                    violations.push(ScheduleViolation::CompletedCourseMoved {
                        course: node.id.clone(),
                        completed,
                        now: node.term,
                    });
                }
            }
        }
    }

    violations
}
