//! Course read handlers.
//!
//! Courses come out of the snapshot already materialized, so these only
//! reshape them into the wire DTOs (summaries with counts, details with
//! per-slot items).

use parlo_content::{CourseBook, Library};
use serde::Serialize;

/// One row in the course listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub book_count: usize,
}

/// Full course payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub books: Vec<CourseBookDetail>,
}

/// One materialized book slot within a course detail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBookDetail {
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
    pub items: Vec<parlo_content::Item>,
}

impl From<&CourseBook> for CourseBookDetail {
    fn from(slot: &CourseBook) -> Self {
        Self {
            id: slot.id.clone(),
            title: slot.title.clone(),
            summary: slot.summary.clone(),
            cover_image: slot.cover_image.clone(),
            tags: slot.tags.clone(),
            difficulty: slot.difficulty,
            item_count: slot.items.len(),
            items: slot.items.clone(),
        }
    }
}

/// All courses in the active snapshot, in id order.
pub fn list_courses(library: &Library) -> Vec<CourseSummary> {
    library
        .courses
        .values()
        .map(|course| CourseSummary {
            id: course.id.clone(),
            title: course.title.clone(),
            summary: course.summary.clone(),
            cover_image: course.cover_image.clone(),
            tags: course.tags.clone(),
            book_count: course.books.len(),
        })
        .collect()
}

/// One course by id, with every slot's items.
pub fn get_course(library: &Library, id: &str) -> Option<CourseDetail> {
    let course = library.course(id)?;
    Some(CourseDetail {
        id: course.id.clone(),
        title: course.title.clone(),
        summary: course.summary.clone(),
        cover_image: course.cover_image.clone(),
        tags: course.tags.clone(),
        books: course.books.iter().map(CourseBookDetail::from).collect(),
    })
}

/// One book slot of a course, addressed by its alias id.
pub fn get_course_book(library: &Library, course_id: &str, book_id: &str) -> Option<CourseBookDetail> {
    library
        .course(course_id)?
        .book(book_id)
        .map(CourseBookDetail::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlo_content::{Course, Item};

    fn library() -> Library {
        let mut library = Library::empty();
        library.courses.insert(
            "c1".into(),
            Course {
                id: "c1".into(),
                title: "Course One".into(),
                summary: Some("第一門課".into()),
                cover_image: None,
                tags: vec!["demo".into()],
                books: vec![CourseBook {
                    id: "slot-a".into(),
                    title: "Slot A".into(),
                    summary: None,
                    cover_image: None,
                    tags: vec![],
                    difficulty: Some(3),
                    items: vec![Item {
                        id: "i1".into(),
                        zh: "句子".into(),
                        hints: vec![],
                        suggestions: vec![],
                        tags: vec!["food".into(), "travel".into()],
                        difficulty: 3,
                    }],
                }],
            },
        );
        library
    }

    #[test]
    fn summary_carries_book_count() {
        let summaries = list_courses(&library());
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].book_count, 1);
        let value = serde_json::to_value(&summaries[0]).unwrap();
        assert_eq!(value["bookCount"], 1);
    }

    #[test]
    fn detail_materializes_slot_items() {
        let detail = get_course(&library(), "c1").unwrap();
        assert_eq!(detail.books.len(), 1);
        assert_eq!(detail.books[0].item_count, 1);
        assert_eq!(detail.books[0].items[0].id, "i1");
    }

    #[test]
    fn slot_lookup_by_alias_id() {
        let slot = get_course_book(&library(), "c1", "slot-a").unwrap();
        assert_eq!(slot.title, "Slot A");
        assert!(get_course_book(&library(), "c1", "missing").is_none());
        assert!(get_course_book(&library(), "missing", "slot-a").is_none());
    }
}
