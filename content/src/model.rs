//! Validated domain types.
//!
//! Everything in this module is the *output* of the validation and
//! resolution pipeline. Raw file shapes (loosely typed, all-optional) live
//! in the loader; once a record has passed validation it is represented
//! here with its invariants encoded in the types. In particular a book's
//! items-XOR-source rule is a sum type, not a pair of optional fields.

use crate::taxonomy::HintCategory;
use crate::{BookId, CourseId, DeckId, ItemId};
use serde::{Deserialize, Serialize};

/// A hint attached to a practice item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub category: HintCategory,
    pub text: String,
}

/// A free-form suggestion attached to a practice item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A single practice item: a source sentence plus grading metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    /// The sentence to translate, in the source language.
    pub zh: String,
    pub hints: Vec<Hint>,
    pub suggestions: Vec<Suggestion>,
    pub tags: Vec<String>,
    /// Difficulty rating, always within 1..=5.
    pub difficulty: u8,
}

/// Content of a book: either inline items or a reference to another book.
///
/// Externally tagged so that the wire shape is `{"items": [...]}` or
/// `{"source": {"id": "..."}}`, matching the content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookContent {
    Items(Vec<Item>),
    Source { id: BookId },
}

/// A validated book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(flatten)]
    pub content: BookContent,
}

impl Book {
    /// Inline items, if this book embeds its own.
    pub fn inline_items(&self) -> Option<&[Item]> {
        match &self.content {
            BookContent::Items(items) => Some(items),
            BookContent::Source { .. } => None,
        }
    }

    /// Id of the referenced book, if this book is a reference.
    pub fn source_id(&self) -> Option<&str> {
        match &self.content {
            BookContent::Items(_) => None,
            BookContent::Source { id } => Some(id),
        }
    }
}

/// A fully materialized book slot inside a course.
///
/// The `id` is the slot's alias id: the identity the course presents the
/// book under, unique within the course but independent of the underlying
/// book's id. Items are always hydrated, whether the slot was inline or a
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBook {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    pub items: Vec<Item>,
}

/// A validated, fully resolved course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub books: Vec<CourseBook>,
}

impl Course {
    /// Find a book slot by its alias id.
    pub fn book(&self, alias_id: &str) -> Option<&CourseBook> {
        self.books.iter().find(|b| b.id == alias_id)
    }
}

/// One flashcard in a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_note: Option<String>,
}

/// A validated flashcard deck. Decks stand outside the book/course graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub cards: Vec<Card>,
}
