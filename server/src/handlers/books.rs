//! Book read handlers - list summaries and serve hydrated detail.

use parlo_content::{Item, Library};
use serde::Serialize;

/// One row in the book listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    pub item_count: usize,
}

/// Full book payload with items hydrated through any reference chain.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
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

/// All books in the active snapshot, in id order.
pub fn list_books(library: &Library) -> Vec<BookSummary> {
    library
        .books
        .values()
        .map(|book| BookSummary {
            id: book.id.clone(),
            title: book.title.clone(),
            summary: book.summary.clone(),
            cover_image: book.cover_image.clone(),
            tags: book.tags.clone(),
            difficulty: book.difficulty,
            item_count: library.book_items(&book.id).map_or(0, <[Item]>::len),
        })
        .collect()
}

/// One book by id. A referenced book serves the items of its resolution
/// target under its own identity.
pub fn get_book(library: &Library, id: &str) -> Option<BookDetail> {
    let book = library.book(id)?;
    let items = library.book_items(id).unwrap_or_default().to_vec();
    Some(BookDetail {
        id: book.id.clone(),
        title: book.title.clone(),
        summary: book.summary.clone(),
        cover_image: book.cover_image.clone(),
        tags: book.tags.clone(),
        difficulty: book.difficulty,
        items,
    })
}
