//! Versioned, serialized form of a schedule.
//!
//! The blob stores the profile and the course ids of each term. It is what
//! callers persist between requests; [`restore_graph`] turns it back into a
//! graph using the catalog.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CourseCatalog;
use crate::graph::{build_graph, CourseGraph, GraphError};
use crate::models::{CourseId, Profile, Term};

/// Current blob schema version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Unsupported schedule blob version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Course {0} appears in more than one term")]
    DuplicateCourse(CourseId),
    #[error("Malformed schedule blob: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Serialized schedule: `terms[i]` holds the courses of term `i + 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlob {
    pub version: u32,
    pub profile: Profile,
    pub terms: Vec<Vec<CourseId>>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

impl ScheduleBlob {
    /// `course id -> term` for every placed course.
    pub fn placements(&self) -> FxHashMap<CourseId, Term> {
        let mut placements = FxHashMap::default();
        for (i, courses) in self.terms.iter().enumerate() {
            for id in courses {
                placements.insert(id.clone(), i as Term + 1);
            }
        }
        placements
    }

    /// Placements in terms before `current_term`.
    ///
    /// The caller passes the current term of the request at hand; the blob's
    /// own profile is the one it was planned under and may be stale.
    pub fn completed_placements(&self, current_term: Term) -> FxHashMap<CourseId, Term> {
        let mut placements = self.placements();
        placements.retain(|_, term| *term < current_term);
        placements
    }

    pub fn to_json(&self) -> Result<String, BlobError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Snapshot the placements of `graph` together with `profile`.
pub fn create_blob(graph: &CourseGraph, profile: &Profile) -> ScheduleBlob {
    let mut terms: Vec<Vec<CourseId>> = vec![Vec::new(); graph.last_term().unwrap_or(0) as usize];
    for node in graph.nodes() {
        if let Some(term) = node.term {
            if term > 0 {
                terms[term as usize - 1].push(node.id.clone());
            }
        }
    }
    ScheduleBlob {
        version: SCHEMA_VERSION,
        profile: profile.clone(),
        terms,
    }
}

/// Parse and check a blob.
///
/// # Errors
/// * `UnsupportedVersion` if the version tag is not [`SCHEMA_VERSION`]
/// * `DuplicateCourse` if a course is listed twice
/// * `Json` if the text is not a valid blob
pub fn parse_blob(json: &str) -> Result<ScheduleBlob, BlobError> {
    let header: VersionHeader = serde_json::from_str(json)?;
    if header.version != SCHEMA_VERSION {
        return Err(BlobError::UnsupportedVersion {
            found: header.version,
            expected: SCHEMA_VERSION,
        });
    }

    let blob: ScheduleBlob = serde_json::from_str(json)?;
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for id in blob.terms.iter().flatten() {
        if !seen.insert(id.as_str()) {
            return Err(BlobError::DuplicateCourse(id.clone()));
        }
    }
    Ok(blob)
}

/// Rebuild the graph a blob was taken from.
///
/// Placements for courses the profile no longer needs are dropped.
pub fn restore_graph<C: CourseCatalog + ?Sized>(
    catalog: &C,
    blob: &ScheduleBlob,
    verbosity: u8,
) -> Result<CourseGraph, BlobError> {
    Ok(build_graph(
        catalog,
        &blob.profile,
        &blob.placements(),
        verbosity,
    )?)
}
