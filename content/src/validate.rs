//! Taxonomy and schema validation.
//!
//! Turns raw records into validated domain types, or into an ordered list
//! of violations. All violations for one record are collected and reported
//! together; a failing record is dropped from the candidate set without
//! affecting any other file.

use crate::error::Error;
use crate::library::ReportEntry;
use crate::loader::{
    RawBook, RawCard, RawCourse, RawCourseSlot, RawDeck, RawDocument, RawHint, RawItem, RawRecord,
    RawSuggestion,
};
use crate::model::{Book, BookContent, Card, Deck, Hint, Item, Suggestion};
use crate::taxonomy::{self, HintCategory};
use uuid::Uuid;

/// Minimum tags per item.
const MIN_TAGS: usize = 2;

/// Maximum tags per item before the count is flagged.
const MAX_TAGS: usize = 4;

/// Difficulty bounds (inclusive).
const DIFFICULTY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Validator knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorOptions {
    /// Reject items with more than [`MAX_TAGS`] tags instead of logging a
    /// warning. Fewer than [`MIN_TAGS`] tags is always a rejection.
    pub strict_tag_limit: bool,
}

/// A validated book together with the file it came from. The file is kept
/// for attribution of cross-record errors found during resolution.
#[derive(Debug, Clone)]
pub struct SourcedBook {
    pub file: String,
    pub book: Book,
}

/// A validated deck together with the file it came from.
#[derive(Debug, Clone)]
pub struct SourcedDeck {
    pub file: String,
    pub deck: Deck,
}

/// A validated course whose book slots have not been resolved yet.
///
/// Slots reuse [`Book`]: the slot's alias id sits in the book's `id` field
/// and a referencing slot carries [`BookContent::Source`].
#[derive(Debug, Clone)]
pub struct CourseCandidate {
    pub file: String,
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub slots: Vec<Book>,
}

/// Output of the validation stage.
#[derive(Debug, Default)]
pub struct ValidatedSet {
    pub books: Vec<SourcedBook>,
    pub courses: Vec<CourseCandidate>,
    pub decks: Vec<SourcedDeck>,
    pub errors: Vec<ReportEntry>,
}

/// Validate every raw document, splitting records by kind.
pub fn validate(documents: Vec<RawDocument>, options: ValidatorOptions) -> ValidatedSet {
    let mut set = ValidatedSet::default();

    for doc in documents {
        match doc.record {
            RawRecord::Book(raw) => match validate_book(raw, &doc.stem, options) {
                Ok(book) => set.books.push(SourcedBook {
                    file: doc.file,
                    book,
                }),
                Err(errors) => reject(&mut set.errors, &doc.file, errors),
            },
            RawRecord::Course(raw) => match validate_course(raw, options) {
                Ok(mut course) => {
                    course.file = doc.file;
                    set.courses.push(course);
                }
                Err(errors) => reject(&mut set.errors, &doc.file, errors),
            },
            RawRecord::Deck(raw) => match validate_deck(raw, &doc.stem) {
                Ok(deck) => set.decks.push(SourcedDeck {
                    file: doc.file,
                    deck,
                }),
                Err(errors) => reject(&mut set.errors, &doc.file, errors),
            },
        }
    }

    set
}

fn reject(entries: &mut Vec<ReportEntry>, file: &str, errors: Vec<Error>) {
    tracing::debug!(%file, violations = errors.len(), "record rejected");
    entries.extend(errors.into_iter().map(|error| ReportEntry {
        file: file.to_string(),
        error,
    }));
}

/// Ids end up in URLs and file names; restrict them to a path-safe set.
fn is_path_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Deterministic id for an item or card that has none in the file.
/// UUIDv5 over the parent id and position keeps reloads reproducible.
fn derived_id(namespace: &str, parent: &str, index: usize) -> String {
    Uuid::new_v5(
        &Uuid::NAMESPACE_URL,
        format!("{namespace}:{parent}:{index}").as_bytes(),
    )
    .to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn validate_difficulty(value: i64, errors: &mut Vec<Error>) -> Option<u8> {
    if DIFFICULTY_RANGE.contains(&value) {
        Some(value as u8)
    } else {
        errors.push(Error::DifficultyOutOfRange(value));
        None
    }
}

fn validate_hint(raw: RawHint, errors: &mut Vec<Error>) -> Option<Hint> {
    let Some(category) = non_empty(raw.category) else {
        errors.push(Error::MissingField("category".into()));
        return None;
    };
    match HintCategory::parse(&category) {
        Some(category) => Some(Hint {
            category,
            text: raw.text.unwrap_or_default(),
        }),
        None => {
            errors.push(Error::InvalidHintCategory(category));
            None
        }
    }
}

fn validate_suggestion(raw: RawSuggestion) -> Suggestion {
    Suggestion {
        text: raw.text.unwrap_or_default(),
        category: non_empty(raw.category),
    }
}

fn validate_tags(tags: &[String], options: ValidatorOptions, errors: &mut Vec<Error>) {
    if tags.len() < MIN_TAGS {
        errors.push(Error::TagCountOutOfRange(tags.len()));
    } else if tags.len() > MAX_TAGS {
        if options.strict_tag_limit {
            errors.push(Error::TagCountOutOfRange(tags.len()));
        } else {
            tracing::warn!(count = tags.len(), "item exceeds the tag limit");
        }
    }
    for tag in tags {
        if !taxonomy::is_valid_tag(tag) {
            errors.push(Error::InvalidTag(tag.clone()));
        }
    }
}

fn validate_item(
    raw: RawItem,
    parent: &str,
    index: usize,
    options: ValidatorOptions,
    errors: &mut Vec<Error>,
) -> Option<Item> {
    let before = errors.len();

    let zh = match non_empty(raw.zh) {
        Some(zh) => zh,
        None => {
            errors.push(Error::MissingField("zh".into()));
            String::new()
        }
    };

    validate_tags(&raw.tags, options, errors);

    let difficulty = match raw.difficulty {
        Some(value) => validate_difficulty(value, errors).unwrap_or(1),
        None => 1,
    };

    let hints: Vec<Hint> = raw
        .hints
        .into_iter()
        .filter_map(|hint| validate_hint(hint, errors))
        .collect();

    if errors.len() > before {
        return None;
    }

    Some(Item {
        id: non_empty(raw.id).unwrap_or_else(|| derived_id("item", parent, index)),
        zh,
        hints,
        suggestions: raw.suggestions.into_iter().map(validate_suggestion).collect(),
        tags: raw.tags,
        difficulty,
    })
}

fn validate_items(
    raw_items: Vec<RawItem>,
    parent: &str,
    options: ValidatorOptions,
    errors: &mut Vec<Error>,
) -> Vec<Item> {
    raw_items
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| validate_item(raw, parent, index, options, errors))
        .collect()
}

/// Validate the items-XOR-source shape shared by books and course slots.
fn validate_content(
    id: &str,
    items: Option<Vec<RawItem>>,
    source: Option<crate::loader::RawSource>,
    options: ValidatorOptions,
    errors: &mut Vec<Error>,
) -> Option<BookContent> {
    match (items, source) {
        (Some(items), None) => {
            if items.is_empty() {
                errors.push(Error::EmptyItems);
                return None;
            }
            let validated = validate_items(items, id, options, errors);
            Some(BookContent::Items(validated))
        }
        (None, Some(source)) => match non_empty(source.id) {
            Some(source_id) => Some(BookContent::Source { id: source_id }),
            None => {
                errors.push(Error::MissingField("source.id".into()));
                None
            }
        },
        _ => {
            errors.push(Error::ShapeConflict);
            None
        }
    }
}

fn validate_book(
    raw: RawBook,
    stem: &str,
    options: ValidatorOptions,
) -> Result<Book, Vec<Error>> {
    let mut errors = Vec::new();

    let id = non_empty(raw.id).unwrap_or_else(|| stem.to_string());
    if !is_path_safe_id(&id) {
        errors.push(Error::InvalidId(id.clone()));
    }

    let title = non_empty(raw.title)
        .or(non_empty(raw.name))
        .unwrap_or_else(|| id.clone());

    let difficulty = raw
        .difficulty
        .and_then(|value| validate_difficulty(value, &mut errors));

    let content = validate_content(&id, raw.items, raw.source, options, &mut errors);

    // Violations anywhere in the record reject it as a whole; the snapshot
    // never carries a half-validated book.
    match (content, errors.is_empty()) {
        (Some(content), true) => Ok(Book {
            id,
            title,
            summary: non_empty(raw.summary),
            cover_image: non_empty(raw.cover_image),
            tags: raw.tags,
            difficulty,
            content,
        }),
        _ => Err(errors),
    }
}

fn validate_slot(
    raw: RawCourseSlot,
    options: ValidatorOptions,
    errors: &mut Vec<Error>,
) -> Option<Book> {
    let source_id = raw
        .book
        .source
        .as_ref()
        .and_then(|s| s.id.clone())
        .and_then(|id| non_empty(Some(id)));

    // The alias defaults to the slot's own id, then to the referenced
    // book's id.
    let alias = non_empty(raw.alias_id)
        .or(non_empty(raw.book.id.clone()))
        .or(source_id);

    let Some(alias) = alias else {
        errors.push(Error::MissingField("books[].id".into()));
        return None;
    };

    let mut slot = raw.book;
    slot.id = Some(alias);
    match validate_book(slot, "", options) {
        Ok(book) => Some(book),
        Err(slot_errors) => {
            errors.extend(slot_errors);
            None
        }
    }
}

fn validate_course(
    raw: RawCourse,
    options: ValidatorOptions,
) -> Result<CourseCandidate, Vec<Error>> {
    let mut errors = Vec::new();

    let id = match non_empty(raw.id) {
        Some(id) => {
            if !is_path_safe_id(&id) {
                errors.push(Error::InvalidId(id.clone()));
            }
            id
        }
        None => {
            errors.push(Error::MissingField("id".into()));
            String::new()
        }
    };

    let title = match non_empty(raw.title) {
        Some(title) => title,
        None => {
            errors.push(Error::MissingField("title".into()));
            String::new()
        }
    };

    if raw.books.is_empty() {
        errors.push(Error::MissingField("books".into()));
    }

    let slots: Vec<Book> = raw
        .books
        .into_iter()
        .filter_map(|slot| validate_slot(slot, options, &mut errors))
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CourseCandidate {
        file: String::new(),
        id,
        title,
        summary: non_empty(raw.summary),
        cover_image: non_empty(raw.cover_image),
        tags: raw.tags,
        slots,
    })
}

fn validate_card(
    raw: RawCard,
    deck_id: &str,
    index: usize,
    errors: &mut Vec<Error>,
) -> Option<Card> {
    let front = non_empty(raw.front);
    let back = non_empty(raw.back);

    let (Some(front), Some(back)) = (front, back) else {
        errors.push(Error::MissingField(format!("cards[{index}]")));
        return None;
    };

    Some(Card {
        id: non_empty(raw.id).unwrap_or_else(|| derived_id("deck", deck_id, index)),
        front,
        back,
        front_note: non_empty(raw.front_note),
        back_note: non_empty(raw.back_note),
    })
}

fn validate_deck(raw: RawDeck, stem: &str) -> Result<Deck, Vec<Error>> {
    let mut errors = Vec::new();

    let id = non_empty(raw.id).unwrap_or_else(|| stem.to_string());
    if !is_path_safe_id(&id) {
        errors.push(Error::InvalidId(id.clone()));
    }

    let name = non_empty(raw.name).unwrap_or_else(|| id.clone());

    let cards: Vec<Card> = raw
        .cards
        .into_iter()
        .enumerate()
        .filter_map(|(index, card)| validate_card(card, &id, index, &mut errors))
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Deck { id, name, cards })
}
