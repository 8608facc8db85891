//! Manual schedule edits: move checks, moves, and push-with-repair.

use std::fmt;
use thiserror::Error;

use crate::config::PlannerConfig;
use crate::graph::{CourseGraph, NodeIndex};
use crate::models::{CourseId, Profile, Term};
use crate::scheduler::{overflow_courses, schedule_courses, ConstraintSet, SchedulerError};
use crate::{log_changes, log_checks};

/// Why a course cannot move to the requested term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveRejection {
    UnknownCourse(CourseId),
    NotScheduled(CourseId),
    CourseCompleted {
        course: CourseId,
        term: Term,
    },
    TermCompleted {
        term: Term,
        current_term: Term,
    },
    PastDeadline {
        term: Term,
        terms_to_graduate: Term,
    },
    TermFull {
        term: Term,
        capacity: u32,
    },
    PrerequisiteNotBefore {
        course: CourseId,
        prerequisite: CourseId,
        prerequisite_term: Option<Term>,
        term: Term,
    },
    DependentNotAfter {
        course: CourseId,
        dependent: CourseId,
        dependent_term: Term,
        term: Term,
    },
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::UnknownCourse(course) => write!(f, "{} is not in the schedule", course),
            MoveRejection::NotScheduled(course) => write!(f, "{} has no term yet", course),
            MoveRejection::CourseCompleted { course, term } => {
                write!(f, "{} was completed in term {}", course, term)
            }
            MoveRejection::TermCompleted { term, current_term } => write!(
                f,
                "term {} is already completed (current term is {})",
                term, current_term
            ),
            MoveRejection::PastDeadline {
                term,
                terms_to_graduate,
            } => write!(
                f,
                "term {} is not before the graduation deadline (term {})",
                term, terms_to_graduate
            ),
            MoveRejection::TermFull { term, capacity } => {
                write!(f, "term {} is full ({} courses)", term, capacity)
            }
            MoveRejection::PrerequisiteNotBefore {
                course,
                prerequisite,
                prerequisite_term: Some(prerequisite_term),
                term,
            } => write!(
                f,
                "{} needs prerequisite {} (term {}) to finish before term {}",
                course, prerequisite, prerequisite_term, term
            ),
            MoveRejection::PrerequisiteNotBefore {
                course,
                prerequisite,
                prerequisite_term: None,
                ..
            } => write!(
                f,
                "{} needs prerequisite {}, which is not scheduled",
                course, prerequisite
            ),
            MoveRejection::DependentNotAfter {
                course,
                dependent,
                dependent_term,
                term,
            } => write!(
                f,
                "{} (term {}) needs {} as a prerequisite before term {}",
                dependent, dependent_term, course, term
            ),
        }
    }
}

/// Outcome of a move check. A rejection is an expected answer, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveCheck {
    Allowed,
    Rejected(MoveRejection),
}

impl MoveCheck {
    pub fn can_move(&self) -> bool {
        matches!(self, MoveCheck::Allowed)
    }

    /// Human-readable reason for a rejection.
    pub fn reason(&self) -> Option<String> {
        match self {
            MoveCheck::Allowed => None,
            MoveCheck::Rejected(rejection) => Some(rejection.to_string()),
        }
    }
}

/// One course whose term changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementChange {
    pub course_id: CourseId,
    /// New term, `None` if the course fell out of the plan.
    pub term: Option<Term>,
}

/// Result of [`push_course_and_dependents`].
#[derive(Clone, Debug)]
pub struct PushOutcome {
    pub graph: CourseGraph,
    /// Differences from the input schedule, in graph order.
    pub changes: Vec<PlacementChange>,
    pub overflow: Vec<CourseId>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Course {0} is not in the schedule")]
    UnknownCourse(CourseId),
    #[error("Course {0} has no term to push from")]
    NotScheduled(CourseId),
    #[error("Course {course} was completed in term {term} and cannot be pushed")]
    CourseCompleted { course: CourseId, term: Term },
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Check whether `course_id` (with its corequisites) can move to `to_term`.
pub fn can_move_course(
    graph: &CourseGraph,
    profile: &Profile,
    course_id: &str,
    to_term: Term,
) -> MoveCheck {
    match check_move(graph, profile, course_id, to_term) {
        Ok(_) => MoveCheck::Allowed,
        Err(rejection) => MoveCheck::Rejected(rejection),
    }
}

/// Returns the corequisite unit to move.
fn check_move(
    graph: &CourseGraph,
    profile: &Profile,
    course_id: &str,
    to_term: Term,
) -> Result<Vec<NodeIndex>, MoveRejection> {
    let idx = graph
        .index_of(course_id)
        .ok_or_else(|| MoveRejection::UnknownCourse(course_id.to_string()))?;
    let node = graph.node(idx);
    let from_term = node
        .term
        .ok_or_else(|| MoveRejection::NotScheduled(node.id.clone()))?;

    if from_term < profile.current_term {
        return Err(MoveRejection::CourseCompleted {
            course: node.id.clone(),
            term: from_term,
        });
    }
    if to_term < profile.current_term {
        return Err(MoveRejection::TermCompleted {
            term: to_term,
            current_term: profile.current_term,
        });
    }
    if !profile.within_deadline(to_term) {
        return Err(MoveRejection::PastDeadline {
            term: to_term,
            terms_to_graduate: profile.terms_to_graduate,
        });
    }

    let unit = graph.corequisite_group(idx);
    let arriving = unit
        .iter()
        .filter(|&&m| graph.node(m).term != Some(to_term))
        .count();
    if graph.term_load(to_term) + arriving > profile.courses_per_term as usize {
        return Err(MoveRejection::TermFull {
            term: to_term,
            capacity: profile.courses_per_term,
        });
    }

    for &member in &unit {
        for prerequisite in graph.prerequisites(member) {
            if unit.contains(&prerequisite) {
                continue;
            }
            let prerequisite_term = graph.node(prerequisite).term;
            if !prerequisite_term.is_some_and(|t| t < to_term) {
                return Err(MoveRejection::PrerequisiteNotBefore {
                    course: graph.node(member).id.clone(),
                    prerequisite: graph.node(prerequisite).id.clone(),
                    prerequisite_term,
                    term: to_term,
                });
            }
        }
        for dependent in graph.dependents(member) {
            if unit.contains(&dependent) {
                continue;
            }
            if let Some(dependent_term) = graph.node(dependent).term {
                if dependent_term <= to_term {
                    return Err(MoveRejection::DependentNotAfter {
                        course: graph.node(member).id.clone(),
                        dependent: graph.node(dependent).id.clone(),
                        dependent_term,
                        term: to_term,
                    });
                }
            }
        }
    }

    Ok(unit)
}

/// Move `course_id` and its corequisites to `to_term` if the move is valid.
///
/// The graph is untouched when the check rejects the move.
pub fn move_course(
    graph: &mut CourseGraph,
    profile: &Profile,
    course_id: &str,
    to_term: Term,
) -> MoveCheck {
    match check_move(graph, profile, course_id, to_term) {
        Ok(unit) => {
            for member in unit {
                graph.node_mut(member).term = Some(to_term);
            }
            MoveCheck::Allowed
        }
        Err(rejection) => MoveCheck::Rejected(rejection),
    }
}

/// Push a course one term later, rescheduling whatever that displaces.
///
/// A plain move to the next term is tried first. If it is rejected, every term
/// up to the course's current term is frozen as it is (minus the course and its
/// corequisites), the course is barred from its old term, and everything else
/// is scheduled again.
///
/// # Errors
/// * `UnknownCourse`, `NotScheduled` or `CourseCompleted` for a course that cannot be pushed
/// * `Scheduler` if rescheduling rejects the frozen plan
pub fn push_course_and_dependents(
    graph: &CourseGraph,
    profile: &Profile,
    course_id: &str,
    config: &PlannerConfig,
) -> Result<PushOutcome, MutationError> {
    let verbosity = config.verbosity;
    let idx = graph
        .index_of(course_id)
        .ok_or_else(|| MutationError::UnknownCourse(course_id.to_string()))?;
    let original = graph
        .node(idx)
        .term
        .ok_or_else(|| MutationError::NotScheduled(course_id.to_string()))?;
    if original < profile.current_term {
        return Err(MutationError::CourseCompleted {
            course: course_id.to_string(),
            term: original,
        });
    }

    let mut moved = graph.clone();
    let check = move_course(&mut moved, profile, course_id, original + 1);
    if check.can_move() {
        log_changes!(verbosity, "Moved {} to term {}", course_id, original + 1);
        return Ok(finish(graph, moved, profile));
    }
    if let MoveCheck::Rejected(rejection) = &check {
        log_checks!(
            verbosity,
            "Direct move of {} rejected ({}), rescheduling",
            course_id,
            rejection
        );
    }

    let unit = graph.corequisite_group(idx);
    let mut constraints = ConstraintSet::new();
    for term in 1..=original {
        let frozen: Vec<CourseId> = graph
            .node_indices()
            .filter(|n| !unit.contains(n) && graph.node(*n).term == Some(term))
            .map(|n| graph.node(n).id.clone())
            .collect();
        constraints.freeze(frozen, term);
    }
    for &member in &unit {
        constraints.forbid(graph.node(member).id.clone(), original);
    }

    let mut cleared = graph.clone();
    cleared.clear_terms();
    let outcome = schedule_courses(cleared, profile, &constraints, config)?;
    Ok(finish(graph, outcome.graph, profile))
}

fn finish(before: &CourseGraph, after: CourseGraph, profile: &Profile) -> PushOutcome {
    let changes = placement_changes(before, &after);
    let overflow = overflow_courses(&after, profile);
    PushOutcome {
        graph: after,
        changes,
        overflow,
    }
}

/// Courses whose term differs between two versions of the same graph.
pub fn placement_changes(before: &CourseGraph, after: &CourseGraph) -> Vec<PlacementChange> {
    after
        .nodes()
        .filter(|node| before.get(&node.id).map(|old| old.term) != Some(node.term))
        .map(|node| PlacementChange {
            course_id: node.id.clone(),
            term: node.term,
        })
        .collect()
}
