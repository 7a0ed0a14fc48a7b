//! Error types for the Parlo content core.

use thiserror::Error;

/// All possible errors from the content core.
///
/// Per-record errors (everything except [`Error::RootUnavailable`] and
/// [`Error::ReloadInProgress`]) are recovered locally by the pipeline and
/// aggregated into the reload report; they never abort a reload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Per-file errors
    #[error("parse error: {0}")]
    Parse(String),

    // Per-record validation errors
    #[error("invalid tag: {0}")]
    InvalidTag(String),

    #[error("invalid hint category: {0}")]
    InvalidHintCategory(String),

    #[error("difficulty out of range: {0} (expected an integer in 1-5)")]
    DifficultyOutOfRange(i64),

    #[error("tag count out of range: {0} (expected 2-4)")]
    TagCountOutOfRange(usize),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("book must have exactly one of items or source")]
    ShapeConflict,

    #[error("empty item list")]
    EmptyItems,

    // Cross-record errors
    #[error("dangling reference: {0}")]
    DanglingReference(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("duplicate alias id: {0}")]
    DuplicateAlias(String),

    // Hard failures of the reload operation as a whole
    #[error("content root unavailable: {0}")]
    RootUnavailable(String),

    #[error("reload already in progress")]
    ReloadInProgress,
}

impl Error {
    /// Whether this error aborts a reload instead of being folded into the
    /// report.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RootUnavailable(_) | Error::ReloadInProgress)
    }
}

/// Result type for content core operations.
pub type Result<T> = std::result::Result<T, Error>;
