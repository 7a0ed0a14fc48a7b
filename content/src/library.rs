//! The immutable library snapshot and the reload report.
//!
//! A [`Library`] is built once per reload cycle from the file set at a
//! point in time, never mutated, and replaced wholesale. `BTreeMap` keeps
//! iteration and serialization order deterministic, so two reloads of an
//! unchanged content root produce structurally identical snapshots.

use crate::error::Error;
use crate::model::{Book, Course, Deck, Item};
use crate::{BookId, CourseId, DeckId, Generation};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

/// One rejected file or record in a reload report.
///
/// Serialized as `{"file": ..., "reason": ...}`; the typed error is kept
/// for callers that want to match on the kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub file: String,
    pub error: Error,
}

impl Serialize for ReportEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ReportEntry", 2)?;
        state.serialize_field("file", &self.file)?;
        state.serialize_field("reason", &self.error.to_string())?;
        state.end()
    }
}

/// Aggregate summary of one reload cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadReport {
    pub books_loaded: usize,
    pub courses_loaded: usize,
    pub decks_loaded: usize,
    pub errors: Vec<ReportEntry>,
}

impl ReloadReport {
    /// Entries matching a predicate on the error, e.g. to count one kind.
    pub fn errors_where<F: Fn(&Error) -> bool>(&self, predicate: F) -> Vec<&ReportEntry> {
        self.errors
            .iter()
            .filter(|entry| predicate(&entry.error))
            .collect()
    }
}

/// One immutable, fully resolved in-memory view of all content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Monotonically increasing snapshot generation. Generation zero is
    /// the empty library a store starts with.
    pub generation: Generation,
    pub books: BTreeMap<BookId, Book>,
    pub courses: BTreeMap<CourseId, Course>,
    pub decks: BTreeMap<DeckId, Deck>,
    /// Report of the reload cycle that produced this snapshot.
    pub report: ReloadReport,
}

impl Library {
    /// The empty generation-zero library.
    pub fn empty() -> Self {
        Self {
            generation: 0,
            books: BTreeMap::new(),
            courses: BTreeMap::new(),
            decks: BTreeMap::new(),
            report: ReloadReport::default(),
        }
    }

    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.get(id)
    }

    pub fn deck(&self, id: &str) -> Option<&Deck> {
        self.decks.get(id)
    }

    /// Items of a book, chasing reference chains to the embedding book.
    ///
    /// The resolver guarantees every retained chain terminates, so `None`
    /// here only means the id itself is unknown.
    pub fn book_items(&self, id: &str) -> Option<&[Item]> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = id;
        loop {
            if !seen.insert(current) {
                return None;
            }
            match &self.books.get(current)?.content {
                crate::model::BookContent::Items(items) => return Some(items),
                crate::model::BookContent::Source { id } => current = id.as_str(),
            }
        }
    }

    /// Total number of entities across all three maps.
    pub fn entity_count(&self) -> usize {
        self.books.len() + self.courses.len() + self.decks.len()
    }
}
