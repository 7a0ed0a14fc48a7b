//! Substring search across courses and their books.

use parlo_content::{CourseBook, Library};
use serde::{Deserialize, Serialize};

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Search results, split by entity kind.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub courses: Vec<CourseHit>,
    pub books: Vec<BookHit>,
}

/// A course whose title, summary, or tags matched.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseHit {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub tags: Vec<String>,
}

/// A course book whose title or item text matched. Carries the course it
/// belongs to so clients can navigate to it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookHit {
    pub course_id: String,
    pub id: String,
    pub title: String,
    pub item_count: usize,
}

/// Case-insensitive substring search over the active snapshot.
pub fn search(library: &Library, query: &str) -> SearchResponse {
    let needle = query.trim().to_lowercase();

    let mut courses = Vec::new();
    let mut books = Vec::new();

    if !needle.is_empty() {
        for course in library.courses.values() {
            if course_matches(course, &needle) {
                courses.push(CourseHit {
                    id: course.id.clone(),
                    title: course.title.clone(),
                    summary: course.summary.clone(),
                    tags: course.tags.clone(),
                });
            }
            for slot in &course.books {
                if book_matches(slot, &needle) {
                    books.push(BookHit {
                        course_id: course.id.clone(),
                        id: slot.id.clone(),
                        title: slot.title.clone(),
                        item_count: slot.items.len(),
                    });
                }
            }
        }
    }

    SearchResponse {
        query: query.to_string(),
        courses,
        books,
    }
}

fn course_matches(course: &parlo_content::Course, needle: &str) -> bool {
    course.title.to_lowercase().contains(needle)
        || course
            .summary
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(needle))
        || course.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

fn book_matches(slot: &CourseBook, needle: &str) -> bool {
    slot.title.to_lowercase().contains(needle)
        || slot
            .items
            .iter()
            .any(|item| item.zh.to_lowercase().contains(needle))
}
