//! Core data types for the planning system.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Catalog identifier of a course (e.g. `"CS 101"`).
pub type CourseId = String;

/// Identifier of a degree track.
pub type TrackId = String;

/// 1-based term index. Term 1 is the first term of the plan.
pub type Term = u32;

/// Kind of a requisite condition and of the graph edge it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequisiteKind {
    /// Must be completed in a strictly earlier term.
    Prerequisite,
    /// Must be taken in the same term.
    Corequisite,
}

/// Logical operator joining the conditions of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
}

/// A single requisite condition referencing one or more courses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: RequisiteKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_grade: Option<String>,
    pub courses: Vec<CourseId>,
}

/// Conditions joined by one logical operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub operator: LogicalOperator,
    pub conditions: Vec<Condition>,
}

/// A course as returned by the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: CourseId,
    pub name: String,
    pub credit_hours: f64,
    #[serde(default)]
    pub condition_groups: Vec<ConditionGroup>,
}

impl CourseRecord {
    pub fn new(id: impl Into<CourseId>, name: impl Into<String>, credit_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            credit_hours,
            condition_groups: Vec::new(),
        }
    }

    /// Add an AND group holding a single condition over `courses`.
    pub fn with_requisite(mut self, kind: RequisiteKind, courses: &[&str]) -> Self {
        self.condition_groups.push(ConditionGroup {
            operator: LogicalOperator::And,
            conditions: vec![Condition {
                kind,
                minimum_grade: None,
                courses: courses.iter().map(|c| c.to_string()).collect(),
            }],
        });
        self
    }
}

/// A degree track and the courses it requires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: TrackId,
    pub name: String,
    pub required_courses: Vec<CourseId>,
}

fn default_current_term() -> Term {
    1
}

fn default_term_length_months() -> u32 {
    6
}

/// Immutable scheduling parameters for one student.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Explicitly required courses (not tied to a track).
    #[serde(default)]
    pub required_courses: Vec<CourseId>,
    /// Tracks whose requirements are pulled in.
    #[serde(default)]
    pub tracks: Vec<TrackId>,
    /// Courses already satisfied by transfer credit.
    #[serde(default)]
    pub transfer_credits: Vec<CourseId>,
    /// Deadline term; placements must be strictly before it.
    pub terms_to_graduate: Term,
    /// Maximum number of courses in any term.
    pub courses_per_term: u32,
    /// First term that is not yet completed.
    #[serde(default = "default_current_term")]
    pub current_term: Term,
    /// Calendar anchor of term 1, display only.
    pub start_date: NaiveDate,
    #[serde(default = "default_term_length_months")]
    pub term_length_months: u32,
}

impl Profile {
    pub fn new(terms_to_graduate: Term, courses_per_term: u32, start_date: NaiveDate) -> Self {
        Self {
            required_courses: Vec::new(),
            tracks: Vec::new(),
            transfer_credits: Vec::new(),
            terms_to_graduate,
            courses_per_term,
            current_term: default_current_term(),
            start_date,
            term_length_months: default_term_length_months(),
        }
    }

    /// First term the scheduler may place courses in.
    pub fn first_open_term(&self) -> Term {
        self.current_term.max(1)
    }

    /// Whether `term` is inside the graduation deadline.
    pub fn within_deadline(&self, term: Term) -> bool {
        term < self.terms_to_graduate
    }

    /// Calendar date on which `term` starts.
    pub fn term_start_date(&self, term: Term) -> NaiveDate {
        let offset = term.saturating_sub(1) * self.term_length_months;
        self.start_date
            .checked_add_months(Months::new(offset))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Human readable name of a term, e.g. "Fall 2025".
    pub fn term_label(&self, term: Term) -> String {
        let start = self.term_start_date(term);
        let season = match start.month() {
            1..=5 => "Spring",
            6..=7 => "Summer",
            _ => "Fall",
        };
        format!("{} {}", season, start.year())
    }
}
