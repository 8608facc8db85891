//! Placement constraints for a single scheduling run.

use rustc_hash::FxHashSet;

use crate::models::{CourseId, Term};

/// Courses pinned to a term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositiveConstraint {
    pub courses: Vec<CourseId>,
    pub term: Term,
    /// When set, the scheduler adds nothing else to this term.
    pub closed: bool,
}

/// A course that must not be placed in a term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NegativeConstraint {
    pub course: CourseId,
    pub term: Term,
}

/// Transient constraints handed to one scheduler invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    pub positive: Vec<PositiveConstraint>,
    pub negative: Vec<NegativeConstraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `courses` to `term`, leaving the term open for more placements.
    pub fn pin(&mut self, courses: Vec<CourseId>, term: Term) -> &mut Self {
        self.positive.push(PositiveConstraint {
            courses,
            term,
            closed: false,
        });
        self
    }

    /// Pin `courses` to `term` and close the term.
    pub fn freeze(&mut self, courses: Vec<CourseId>, term: Term) -> &mut Self {
        self.positive.push(PositiveConstraint {
            courses,
            term,
            closed: true,
        });
        self
    }

    pub fn forbid(&mut self, course: impl Into<CourseId>, term: Term) -> &mut Self {
        self.negative.push(NegativeConstraint {
            course: course.into(),
            term,
        });
        self
    }

    pub fn closed_terms(&self) -> FxHashSet<Term> {
        self.positive
            .iter()
            .filter(|c| c.closed)
            .map(|c| c.term)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}
