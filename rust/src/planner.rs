//! Top-level planning operations.

use thiserror::Error;

use crate::blob::{parse_blob, restore_graph, BlobError, ScheduleBlob};
use crate::catalog::CourseCatalog;
use crate::config::PlannerConfig;
use crate::graph::{build_graph, CourseGraph, GraphError};
use crate::log_changes;
use crate::models::{CourseId, Profile, Term};
use crate::mutation::{push_course_and_dependents, MutationError, PushOutcome};
use crate::scheduler::{schedule_courses, ConstraintSet, ScheduleOutcome, SchedulerError};

/// Any failure of a planning request. Catalog failures arrive wrapped in
/// [`GraphError::Catalog`], since the catalog is only queried while building.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

/// Build the graph for `profile` and schedule every course.
///
/// With a `prior` schedule, courses it placed in completed terms (before
/// `profile.current_term`) keep their terms; everything else is planned anew.
///
/// # Errors
/// * `Graph` for catalog inconsistencies and prerequisite cycles
/// * `Scheduler` for an invalid profile
pub fn schedule_from_requirements<C: CourseCatalog + ?Sized>(
    catalog: &C,
    profile: &Profile,
    prior: Option<&ScheduleBlob>,
    config: &PlannerConfig,
) -> Result<ScheduleOutcome, PlannerError> {
    let completed = prior
        .map(|blob| blob.completed_placements(profile.current_term))
        .unwrap_or_default();
    let graph = build_graph(catalog, profile, &completed, config.verbosity)?;
    let outcome = schedule_courses(graph, profile, &ConstraintSet::new(), config)?;

    log_changes!(
        config.verbosity,
        "Planned {} courses over {} terms, {} overflow",
        outcome.graph.len(),
        outcome.graph.last_term().unwrap_or(0),
        outcome.overflow.len()
    );
    Ok(outcome)
}

/// Parse a stored schedule and rebuild its graph from the catalog.
///
/// # Errors
/// * `Blob` for malformed or unsupported blobs and for catalog problems
///   while rebuilding
pub fn load_schedule<C: CourseCatalog + ?Sized>(
    catalog: &C,
    blob_json: &str,
    verbosity: u8,
) -> Result<(ScheduleBlob, CourseGraph), PlannerError> {
    let blob = parse_blob(blob_json)?;
    let graph = restore_graph(catalog, &blob, verbosity)?;
    Ok((blob, graph))
}

/// Push `course_id` one term later in a stored schedule.
///
/// # Errors
/// * `Blob` if the stored schedule cannot be rebuilt
/// * `Mutation` if the course cannot be pushed
pub fn push_in_schedule<C: CourseCatalog + ?Sized>(
    catalog: &C,
    blob: &ScheduleBlob,
    course_id: &str,
    config: &PlannerConfig,
) -> Result<PushOutcome, PlannerError> {
    let graph = restore_graph(catalog, blob, config.verbosity)?;
    Ok(push_course_and_dependents(
        &graph,
        &blob.profile,
        course_id,
        config,
    )?)
}

/// Courses and credit load of one term.
#[derive(Clone, Debug, PartialEq)]
pub struct TermSummary {
    pub term: Term,
    pub courses: Vec<CourseId>,
    pub credit_hours: f64,
}

/// One summary per term from 1 to the last used term, empty terms included.
pub fn term_summaries(graph: &CourseGraph) -> Vec<TermSummary> {
    let last = graph.last_term().unwrap_or(0);
    let mut summaries: Vec<TermSummary> = (1..=last)
        .map(|term| TermSummary {
            term,
            courses: Vec::new(),
            credit_hours: 0.0,
        })
        .collect();
    for node in graph.nodes() {
        if let Some(term) = node.term.filter(|&t| t >= 1) {
            let summary = &mut summaries[term as usize - 1];
            summary.courses.push(node.id.clone());
            summary.credit_hours += node.credit_hours;
        }
    }
    summaries
}
