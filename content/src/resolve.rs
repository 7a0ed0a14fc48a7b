//! Reference resolution.
//!
//! Takes the validated record sets and produces the final entity maps:
//! duplicate ids are settled first-seen-wins (file processing order is
//! lexicographic, so the outcome is reproducible), book reference chains
//! are verified, and every course book slot is materialized into its item
//! list. Courses are all-or-nothing: one bad slot drops the course, never
//! its siblings.

use crate::error::Error;
use crate::library::ReportEntry;
use crate::model::{Book, BookContent, Course, CourseBook, Deck, Item};
use crate::validate::{CourseCandidate, SourcedBook, SourcedDeck};
use crate::{BookId, CourseId, DeckId};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Output of the resolution stage: the final entity maps plus the errors
/// accumulated while building them.
#[derive(Debug, Default)]
pub struct ResolvedSet {
    pub books: BTreeMap<BookId, Book>,
    pub courses: BTreeMap<CourseId, Course>,
    pub decks: BTreeMap<DeckId, Deck>,
    pub errors: Vec<ReportEntry>,
}

/// Resolve the validated sets into final entity maps.
pub fn resolve(
    books: Vec<SourcedBook>,
    courses: Vec<CourseCandidate>,
    decks: Vec<SourcedDeck>,
) -> ResolvedSet {
    let mut resolved = ResolvedSet::default();

    let book_files = insert_books(books, &mut resolved);
    drop_broken_chains(&book_files, &mut resolved);
    insert_decks(decks, &mut resolved);
    insert_courses(courses, &mut resolved);

    resolved
}

/// First-seen-wins insertion of books; returns id -> file for attribution.
fn insert_books(books: Vec<SourcedBook>, resolved: &mut ResolvedSet) -> HashMap<BookId, String> {
    let mut files = HashMap::new();
    for SourcedBook { file, book } in books {
        if resolved.books.contains_key(&book.id) {
            resolved.errors.push(ReportEntry {
                file,
                error: Error::DuplicateId(book.id),
            });
            continue;
        }
        files.insert(book.id.clone(), file);
        resolved.books.insert(book.id.clone(), book);
    }
    files
}

/// Drop top-level referenced books whose chain does not reach an embedding
/// book. Reachability is judged against the full deduplicated map, so both
/// members of a cycle and every book upstream of a broken link go.
fn drop_broken_chains(files: &HashMap<BookId, String>, resolved: &mut ResolvedSet) {
    let broken: Vec<(BookId, BookId)> = resolved
        .books
        .keys()
        .filter_map(|id| match chase(&resolved.books, id) {
            Ok(_) => None,
            Err(missing) => Some((id.clone(), missing)),
        })
        .collect();

    for (id, missing) in broken {
        resolved.books.remove(&id);
        let file = files.get(&id).cloned().unwrap_or_else(|| id.clone());
        resolved.errors.push(ReportEntry {
            file,
            error: Error::DanglingReference(missing),
        });
    }
}

/// Follow a reference chain to its item list, or report the id where the
/// chain breaks (a missing target, or the id closing a cycle).
fn chase<'a>(
    books: &'a BTreeMap<BookId, Book>,
    id: &str,
) -> Result<&'a [Item], BookId> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = id;
    loop {
        if !seen.insert(current) {
            return Err(current.to_string());
        }
        let Some(book) = books.get(current) else {
            return Err(current.to_string());
        };
        match &book.content {
            BookContent::Items(items) => return Ok(items),
            BookContent::Source { id } => current = id.as_str(),
        }
    }
}

fn insert_decks(decks: Vec<SourcedDeck>, resolved: &mut ResolvedSet) {
    for SourcedDeck { file, deck } in decks {
        if resolved.decks.contains_key(&deck.id) {
            resolved.errors.push(ReportEntry {
                file,
                error: Error::DuplicateId(deck.id),
            });
            continue;
        }
        resolved.decks.insert(deck.id.clone(), deck);
    }
}

fn insert_courses(courses: Vec<CourseCandidate>, resolved: &mut ResolvedSet) {
    for candidate in courses {
        if resolved.courses.contains_key(&candidate.id) {
            resolved.errors.push(ReportEntry {
                file: candidate.file,
                error: Error::DuplicateId(candidate.id),
            });
            continue;
        }

        match materialize(&candidate, &resolved.books) {
            Ok(course) => {
                resolved.courses.insert(course.id.clone(), course);
            }
            Err(errors) => {
                resolved
                    .errors
                    .extend(errors.into_iter().map(|error| ReportEntry {
                        file: candidate.file.clone(),
                        error,
                    }));
            }
        }
    }
}

/// Materialize one course, hydrating every slot. All slot problems are
/// collected before the course is rejected.
fn materialize(
    candidate: &CourseCandidate,
    books: &BTreeMap<BookId, Book>,
) -> Result<Course, Vec<Error>> {
    let mut errors = Vec::new();
    let mut aliases: HashSet<&str> = HashSet::new();
    let mut course_books = Vec::with_capacity(candidate.slots.len());

    for slot in &candidate.slots {
        if !aliases.insert(slot.id.as_str()) {
            errors.push(Error::DuplicateAlias(slot.id.clone()));
            continue;
        }

        let items: Vec<Item> = match &slot.content {
            BookContent::Items(items) => items.clone(),
            BookContent::Source { id } => match chase(books, id) {
                Ok(items) => items.to_vec(),
                Err(missing) => {
                    errors.push(Error::DanglingReference(missing));
                    continue;
                }
            },
        };

        course_books.push(CourseBook {
            id: slot.id.clone(),
            title: slot.title.clone(),
            summary: slot.summary.clone(),
            cover_image: slot.cover_image.clone(),
            tags: slot.tags.clone(),
            difficulty: slot.difficulty,
            items,
        });
    }

    if errors.is_empty() {
        Ok(Course {
            id: candidate.id.clone(),
            title: candidate.title.clone(),
            summary: candidate.summary.clone(),
            cover_image: candidate.cover_image.clone(),
            tags: candidate.tags.clone(),
            books: course_books,
        })
    } else {
        Err(errors)
    }
}
