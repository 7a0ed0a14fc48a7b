//! Document loader - scans the content root and parses raw records.
//!
//! The loader is the only stage that touches the filesystem. It produces
//! loosely typed raw records (every field optional or defaulted) so that
//! shape and taxonomy problems surface as structured validation errors
//! rather than parse failures. A file that is not even valid JSON, or whose
//! top level is not an object of the expected kind, yields a parse error
//! tagged with the filename and is excluded from further processing; it
//! never halts the scan.
//!
//! Files are processed in lexicographic path order per kind so that
//! first-seen-wins duplicate handling downstream is reproducible.

use crate::error::{Error, Result};
use crate::library::ReportEntry;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a content document, determined by its subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Book,
    Course,
    Deck,
}

impl Kind {
    /// Subdirectory of the content root holding this kind.
    pub fn subdir(self) -> &'static str {
        match self {
            Kind::Book => "books",
            Kind::Course => "courses",
            Kind::Deck => "decks",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Book => write!(f, "book"),
            Kind::Course => write!(f, "course"),
            Kind::Deck => write!(f, "deck"),
        }
    }
}

/// Raw hint as found in a file. The category is kept as a plain string so
/// an unknown value becomes a taxonomy violation, not a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawHint {
    pub category: Option<String>,
    pub text: Option<String>,
}

/// Raw suggestion as found in a file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSuggestion {
    pub text: Option<String>,
    pub category: Option<String>,
}

/// Raw practice item as found in a file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawItem {
    pub id: Option<String>,
    pub zh: Option<String>,
    pub hints: Vec<RawHint>,
    pub suggestions: Vec<RawSuggestion>,
    pub tags: Vec<String>,
    pub difficulty: Option<i64>,
}

/// Raw book reference target.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSource {
    pub id: Option<String>,
}

/// Raw book record. Also the shape of one course book slot; legacy book
/// files carry `name` where newer ones carry `title`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBook {
    pub id: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub difficulty: Option<i64>,
    pub items: Option<Vec<RawItem>>,
    pub source: Option<RawSource>,
}

/// Raw course book slot: a book shape plus an optional explicit alias id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCourseSlot {
    pub alias_id: Option<String>,
    #[serde(flatten)]
    pub book: RawBook,
}

/// Raw course record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCourse {
    pub id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub books: Vec<RawCourseSlot>,
}

/// Raw flashcard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCard {
    pub id: Option<String>,
    pub front: Option<String>,
    pub back: Option<String>,
    pub front_note: Option<String>,
    pub back_note: Option<String>,
}

/// Raw deck record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDeck {
    pub id: Option<String>,
    pub name: Option<String>,
    pub cards: Vec<RawCard>,
}

/// A parsed raw record of any kind.
#[derive(Debug, Clone)]
pub enum RawRecord {
    Book(RawBook),
    Course(RawCourse),
    Deck(RawDeck),
}

/// One successfully parsed content file.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// File name the record came from, e.g. `"a.json"`.
    pub file: String,
    /// File stem, used as the default record id.
    pub stem: String,
    pub kind: Kind,
    pub record: RawRecord,
}

/// Result of scanning a content root.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub documents: Vec<RawDocument>,
    pub errors: Vec<ReportEntry>,
    /// Number of JSON files seen, parseable or not.
    pub file_count: usize,
}

impl ScanOutcome {
    /// True when the root held no JSON files at all.
    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }
}

/// Scan the content root, parsing every JSON file under `books/`,
/// `courses/`, and `decks/`.
///
/// A missing subdirectory is treated as empty; a missing or unreadable
/// root is the hard [`Error::RootUnavailable`] failure.
pub fn scan(root: &Path) -> Result<ScanOutcome> {
    if !root.is_dir() {
        return Err(Error::RootUnavailable(format!(
            "{} is not a readable directory",
            root.display()
        )));
    }

    let mut outcome = ScanOutcome::default();
    for kind in [Kind::Book, Kind::Course, Kind::Deck] {
        for path in json_files(&root.join(kind.subdir()))? {
            outcome.file_count += 1;
            let file = file_label(&path);
            let stem = file_stem(&path);
            match parse_file(&path, kind) {
                Ok(record) => outcome.documents.push(RawDocument {
                    file,
                    stem,
                    kind,
                    record,
                }),
                Err(error) => {
                    tracing::warn!(%file, %kind, %error, "skipping unparseable content file");
                    outcome.errors.push(ReportEntry { file, error });
                }
            }
        }
    }

    Ok(outcome)
}

/// JSON files directly under `dir`, in lexicographic path order.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(Error::RootUnavailable(format!(
                "{}: {}",
                dir.display(),
                err
            )))
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
        })
        .collect();
    files.sort();
    Ok(files)
}

fn parse_file(path: &Path, kind: Kind) -> std::result::Result<RawRecord, Error> {
    let text = fs::read_to_string(path).map_err(|err| Error::Parse(err.to_string()))?;
    let record = match kind {
        Kind::Book => RawRecord::Book(parse_record(&text)?),
        Kind::Course => RawRecord::Course(parse_record(&text)?),
        Kind::Deck => RawRecord::Deck(parse_record(&text)?),
    };
    Ok(record)
}

fn parse_record<T: serde::de::DeserializeOwned>(text: &str) -> std::result::Result<T, Error> {
    serde_json::from_str(text).map_err(|err| Error::Parse(err.to_string()))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn missing_root_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let result = scan(&missing);
        assert!(matches!(result, Err(Error::RootUnavailable(_))));
    }

    #[test]
    fn missing_subdirs_are_empty() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "books/a.json",
            r#"{"id": "a", "title": "A", "items": []}"#,
        );

        let outcome = scan(tmp.path()).unwrap();
        assert_eq!(outcome.file_count, 1);
        assert_eq!(outcome.documents.len(), 1);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn malformed_file_is_isolated() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "books/bad.json", "{not json");
        write(
            tmp.path(),
            "books/good.json",
            r#"{"id": "good", "items": []}"#,
        );

        let outcome = scan(tmp.path()).unwrap();
        assert_eq!(outcome.file_count, 2);
        assert_eq!(outcome.documents.len(), 1);
        assert_eq!(outcome.documents[0].file, "good.json");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].file, "bad.json");
        assert!(matches!(outcome.errors[0].error, Error::Parse(_)));
    }

    #[test]
    fn wrong_top_level_shape_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "decks/list.json", r#"[1, 2, 3]"#);

        let outcome = scan(tmp.path()).unwrap();
        assert_eq!(outcome.documents.len(), 0);
        assert!(matches!(outcome.errors[0].error, Error::Parse(_)));
    }

    #[test]
    fn files_scanned_in_lexicographic_order() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "books/b.json", r#"{"id": "b", "items": []}"#);
        write(tmp.path(), "books/a.json", r#"{"id": "a", "items": []}"#);
        write(tmp.path(), "books/c.json", r#"{"id": "c", "items": []}"#);

        let outcome = scan(tmp.path()).unwrap();
        let files: Vec<_> = outcome.documents.iter().map(|d| d.file.as_str()).collect();
        assert_eq!(files, ["a.json", "b.json", "c.json"]);
    }

    #[test]
    fn non_json_files_ignored() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "books/readme.txt", "not content");
        write(tmp.path(), "books/a.json", r#"{"id": "a", "items": []}"#);

        let outcome = scan(tmp.path()).unwrap();
        assert_eq!(outcome.file_count, 1);
    }

    #[test]
    fn course_slot_parses_alias_and_flattened_book() {
        let json = r#"{
            "id": "course-1",
            "title": "Course",
            "books": [
                {"aliasId": "alias-1", "id": "book-1", "title": "Slot", "source": {"id": "book-1"}}
            ]
        }"#;
        let course: RawCourse = serde_json::from_str(json).unwrap();
        let slot = &course.books[0];
        assert_eq!(slot.alias_id.as_deref(), Some("alias-1"));
        assert_eq!(slot.book.id.as_deref(), Some("book-1"));
        assert_eq!(
            slot.book.source.as_ref().and_then(|s| s.id.as_deref()),
            Some("book-1")
        );
    }

    #[test]
    fn legacy_name_field_preserved() {
        let json = r#"{"id": "b", "name": "Legacy Title", "items": []}"#;
        let book: RawBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.name.as_deref(), Some("Legacy Title"));
        assert!(book.title.is_none());
    }
}
