//! Python bindings.
//!
//! Catalogs, profiles and stored schedules cross the boundary as JSON so the
//! Python side can persist them as opaque records. Results come back as
//! typed classes.

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::blob::{create_blob, parse_blob};
use crate::catalog::InMemoryCatalog;
use crate::config::PlannerConfig;
use crate::models::{CourseId, Profile, Term};
use crate::mutation::{self, MoveCheck, PlacementChange};
use crate::planner::{load_schedule, push_in_schedule, schedule_from_requirements};
use crate::validation::validate_schedule;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_catalog(catalog_json: &str) -> PyResult<InMemoryCatalog> {
    InMemoryCatalog::from_json(catalog_json).map_err(value_error)
}

fn config(balance_tracks_evenly: bool, verbosity: u8) -> PlannerConfig {
    PlannerConfig::default()
        .with_balancing(balance_tracks_evenly)
        .with_verbosity(verbosity)
}

/// A course whose term changed (PyO3 wrapper).
#[pyclass(name = "PlacementChange")]
#[derive(Clone, Debug)]
pub struct PyPlacementChange {
    #[pyo3(get)]
    pub course_id: CourseId,
    /// `None` when the course fell out of the plan.
    #[pyo3(get)]
    pub term: Option<Term>,
}

#[pymethods]
impl PyPlacementChange {
    fn __repr__(&self) -> String {
        format!(
            "PlacementChange(course_id={:?}, term={:?})",
            self.course_id, self.term
        )
    }
}

impl From<PlacementChange> for PyPlacementChange {
    fn from(change: PlacementChange) -> Self {
        Self {
            course_id: change.course_id,
            term: change.term,
        }
    }
}

/// Answer to a move request (PyO3 wrapper).
#[pyclass(name = "MoveCheck")]
#[derive(Clone, Debug)]
pub struct PyMoveCheck {
    #[pyo3(get)]
    pub can_move: bool,
    #[pyo3(get)]
    pub reason: Option<String>,
}

#[pymethods]
impl PyMoveCheck {
    fn __bool__(&self) -> bool {
        self.can_move
    }

    fn __repr__(&self) -> String {
        format!(
            "MoveCheck(can_move={}, reason={:?})",
            self.can_move, self.reason
        )
    }
}

impl From<MoveCheck> for PyMoveCheck {
    fn from(check: MoveCheck) -> Self {
        Self {
            can_move: check.can_move(),
            reason: check.reason(),
        }
    }
}

/// Result of planning or editing a schedule.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduleResult {
    /// Stored form of the new schedule.
    #[pyo3(get)]
    pub blob_json: String,
    #[pyo3(get)]
    pub overflow: Vec<CourseId>,
    /// Empty for a fresh plan.
    #[pyo3(get)]
    pub changes: Vec<PyPlacementChange>,
}

#[pymethods]
impl ScheduleResult {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(overflow={:?}, changes={})",
            self.overflow,
            self.changes.len()
        )
    }
}

/// Plan a schedule for a profile.
///
/// # Raises
/// * ValueError for malformed input, catalog inconsistencies or cycles
#[pyfunction]
#[pyo3(signature = (catalog_json, profile_json, prior_blob_json=None, balance_tracks_evenly=true, verbosity=0))]
fn plan_schedule(
    catalog_json: &str,
    profile_json: &str,
    prior_blob_json: Option<&str>,
    balance_tracks_evenly: bool,
    verbosity: u8,
) -> PyResult<ScheduleResult> {
    let catalog = parse_catalog(catalog_json)?;
    let profile: Profile = serde_json::from_str(profile_json).map_err(value_error)?;
    let prior = prior_blob_json
        .map(parse_blob)
        .transpose()
        .map_err(value_error)?;

    let outcome = schedule_from_requirements(
        &catalog,
        &profile,
        prior.as_ref(),
        &config(balance_tracks_evenly, verbosity),
    )
    .map_err(value_error)?;
    Ok(ScheduleResult {
        blob_json: create_blob(&outcome.graph, &profile)
            .to_json()
            .map_err(value_error)?,
        overflow: outcome.overflow,
        changes: Vec::new(),
    })
}

/// Check whether a course can move to `to_term`.
#[pyfunction]
fn can_move_course(
    catalog_json: &str,
    blob_json: &str,
    course_id: &str,
    to_term: Term,
) -> PyResult<PyMoveCheck> {
    let catalog = parse_catalog(catalog_json)?;
    let (blob, graph) = load_schedule(&catalog, blob_json, 0).map_err(value_error)?;
    Ok(mutation::can_move_course(&graph, &blob.profile, course_id, to_term).into())
}

/// Move a course if allowed. Returns the (possibly unchanged) stored
/// schedule and the move check.
#[pyfunction]
fn move_course(
    catalog_json: &str,
    blob_json: &str,
    course_id: &str,
    to_term: Term,
) -> PyResult<(String, PyMoveCheck)> {
    let catalog = parse_catalog(catalog_json)?;
    let (blob, mut graph) = load_schedule(&catalog, blob_json, 0).map_err(value_error)?;
    let check = mutation::move_course(&mut graph, &blob.profile, course_id, to_term);
    let updated = create_blob(&graph, &blob.profile)
        .to_json()
        .map_err(value_error)?;
    Ok((updated, check.into()))
}

/// Push a course one term later, rescheduling what it displaces.
#[pyfunction]
#[pyo3(signature = (catalog_json, blob_json, course_id, balance_tracks_evenly=true, verbosity=0))]
fn push_course_and_dependents(
    catalog_json: &str,
    blob_json: &str,
    course_id: &str,
    balance_tracks_evenly: bool,
    verbosity: u8,
) -> PyResult<ScheduleResult> {
    let catalog = parse_catalog(catalog_json)?;
    let blob = parse_blob(blob_json).map_err(value_error)?;
    let outcome = push_in_schedule(
        &catalog,
        &blob,
        course_id,
        &config(balance_tracks_evenly, verbosity),
    )
    .map_err(value_error)?;

    Ok(ScheduleResult {
        blob_json: create_blob(&outcome.graph, &blob.profile)
            .to_json()
            .map_err(value_error)?,
        overflow: outcome.overflow,
        changes: outcome.changes.into_iter().map(Into::into).collect(),
    })
}

/// Human-readable rule violations of a stored schedule.
#[pyfunction]
fn validate_blob(catalog_json: &str, blob_json: &str) -> PyResult<Vec<String>> {
    let catalog = parse_catalog(catalog_json)?;
    let (blob, graph) = load_schedule(&catalog, blob_json, 0).map_err(value_error)?;
    Ok(validate_schedule(&graph, &blob.profile, None)
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// Display label of a term, e.g. "Fall 2025".
#[pyfunction]
#[pyo3(signature = (start_date, term, term_length_months=6))]
fn term_label(start_date: NaiveDate, term: Term, term_length_months: u32) -> String {
    let mut profile = Profile::new(term.max(1), 1, start_date);
    profile.term_length_months = term_length_months;
    profile.term_label(term)
}

/// The course_planner Python module.
#[pymodule]
fn course_planner(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("SCHEMA_VERSION", crate::blob::SCHEMA_VERSION)?;

    // Result types
    m.add_class::<PyPlacementChange>()?;
    m.add_class::<PyMoveCheck>()?;
    m.add_class::<ScheduleResult>()?;

    // Operations
    m.add_function(wrap_pyfunction!(plan_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(can_move_course, m)?)?;
    m.add_function(wrap_pyfunction!(move_course, m)?)?;
    m.add_function(wrap_pyfunction!(push_course_and_dependents, m)?)?;
    m.add_function(wrap_pyfunction!(validate_blob, m)?)?;
    m.add_function(wrap_pyfunction!(term_label, m)?)?;

    Ok(())
}
