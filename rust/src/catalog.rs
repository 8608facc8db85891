//! Catalog query interface used during graph construction.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CourseId, CourseRecord, TrackId, TrackRecord};

/// Errors raised by a catalog backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Source of course and track records.
///
/// Implementations may return records in any order and may omit ids they do
/// not know; the graph builder reports omissions as missing courses.
pub trait CourseCatalog {
    fn resolve_courses(&self, ids: &[CourseId]) -> Result<Vec<CourseRecord>, CatalogError>;
    fn resolve_tracks(&self, ids: &[TrackId]) -> Result<Vec<TrackRecord>, CatalogError>;
}

/// Catalog held entirely in memory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    courses: Vec<CourseRecord>,
    #[serde(default)]
    tracks: Vec<TrackRecord>,
    #[serde(skip)]
    course_index: FxHashMap<CourseId, usize>,
    #[serde(skip)]
    track_index: FxHashMap<TrackId, usize>,
}

impl InMemoryCatalog {
    pub fn new(courses: Vec<CourseRecord>, tracks: Vec<TrackRecord>) -> Self {
        let mut catalog = Self {
            courses,
            tracks,
            course_index: FxHashMap::default(),
            track_index: FxHashMap::default(),
        };
        catalog.reindex();
        catalog
    }

    /// Parse a catalog from JSON of the form `{"courses": [...], "tracks": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut catalog: Self = serde_json::from_str(json)?;
        catalog.reindex();
        Ok(catalog)
    }

    /// Insert or replace a course record.
    pub fn insert_course(&mut self, record: CourseRecord) {
        match self.course_index.get(&record.id) {
            Some(&idx) => self.courses[idx] = record,
            None => {
                self.course_index
                    .insert(record.id.clone(), self.courses.len());
                self.courses.push(record);
            }
        }
    }

    /// Insert or replace a track record.
    pub fn insert_track(&mut self, record: TrackRecord) {
        match self.track_index.get(&record.id) {
            Some(&idx) => self.tracks[idx] = record,
            None => {
                self.track_index.insert(record.id.clone(), self.tracks.len());
                self.tracks.push(record);
            }
        }
    }

    pub fn course(&self, id: &str) -> Option<&CourseRecord> {
        self.course_index.get(id).map(|&idx| &self.courses[idx])
    }

    fn reindex(&mut self) {
        self.course_index = self
            .courses
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id.clone(), idx))
            .collect();
        self.track_index = self
            .tracks
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.id.clone(), idx))
            .collect();
    }
}

impl CourseCatalog for InMemoryCatalog {
    fn resolve_courses(&self, ids: &[CourseId]) -> Result<Vec<CourseRecord>, CatalogError> {
        Ok(ids.iter().filter_map(|id| self.course(id)).cloned().collect())
    }

    fn resolve_tracks(&self, ids: &[TrackId]) -> Result<Vec<TrackRecord>, CatalogError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.track_index.get(id))
            .map(|&idx| self.tracks[idx].clone())
            .collect())
    }
}
