//! Multi-term course planning: dependency graph, term statistics, greedy
//! constrained scheduling and incremental schedule edits.
//!
//! Python bindings are available behind the `python` feature.

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

pub mod logging;

pub mod blob;
pub mod catalog;
pub mod conditions;
mod config;
pub mod graph;
mod models;
pub mod mutation;
pub mod planner;
pub mod scheduler;
pub mod sorting;
pub mod statistics;
pub mod validation;

#[cfg(feature = "python")]
mod python;

pub use blob::{create_blob, parse_blob, restore_graph, BlobError, ScheduleBlob, SCHEMA_VERSION};
pub use catalog::{CatalogError, CourseCatalog, InMemoryCatalog};
pub use conditions::{gating_requirement_count, resolve_requisites, RequisiteEdges};
pub use config::PlannerConfig;
pub use graph::{build_graph, CourseGraph, CourseNode, Edge, GraphError, NodeIndex};
pub use models::{
    Condition, ConditionGroup, CourseId, CourseRecord, LogicalOperator, Profile, RequisiteKind,
    Term, TrackId, TrackRecord,
};
pub use mutation::{
    can_move_course, move_course, placement_changes, push_course_and_dependents, MoveCheck,
    MoveRejection, MutationError, PlacementChange, PushOutcome,
};
pub use planner::{schedule_from_requirements, term_summaries, PlannerError, TermSummary};
pub use scheduler::{schedule_courses, ConstraintSet, ScheduleOutcome, SchedulerError};
pub use statistics::{compute_statistics, topological_generations, CourseStatistics};
pub use validation::{validate_schedule, ScheduleViolation};
