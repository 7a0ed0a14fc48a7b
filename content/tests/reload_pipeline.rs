//! End-to-end tests for the reload pipeline.
//!
//! These exercise whole content roots on disk, from scan through swap.

use parlo_content::{Error, ReloadCoordinator, SnapshotStore};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn valid_book(id: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "title": "Book {id}",
            "summary": "簡單句型練習",
            "items": [
                {{
                    "id": "{id}-1",
                    "zh": "這是一句測試句子。",
                    "hints": [{{"category": "lexical", "text": "注意字彙搭配"}}],
                    "suggestions": [{{"text": "可加入更多細節", "category": "style"}}],
                    "tags": ["travel", "daily-life"],
                    "difficulty": 2
                }}
            ]
        }}"#
    )
}

fn setup(root: &Path) -> (Arc<SnapshotStore>, ReloadCoordinator) {
    let store = Arc::new(SnapshotStore::new());
    let coordinator = ReloadCoordinator::new(root, Arc::clone(&store));
    (store, coordinator)
}

// ============================================================================
// Counting and error reporting
// ============================================================================

#[test]
fn counts_match_valid_and_invalid_files() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "books/a.json", &valid_book("a"));
    write(tmp.path(), "books/b.json", &valid_book("b"));
    write(
        tmp.path(),
        "books/bad.json",
        r#"{"id": "bad", "items": [
            {"zh": "x", "tags": ["not-a-tag", "travel"], "difficulty": 1}
        ]}"#,
    );

    let (store, coordinator) = setup(tmp.path());
    let report = coordinator.reload().unwrap();

    assert_eq!(report.books_loaded, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].file, "bad.json");
    assert_eq!(
        report.errors[0].error,
        Error::InvalidTag("not-a-tag".into())
    );
    assert_eq!(report.errors[0].error.to_string(), "invalid tag: not-a-tag");

    let library = store.current();
    assert!(library.book("a").is_some());
    assert!(library.book("b").is_some());
    assert!(library.book("bad").is_none());
}

#[test]
fn dangling_course_reference_reported_once() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "books/a.json", &valid_book("a"));
    write(
        tmp.path(),
        "courses/broken.json",
        r#"{"id": "broken", "title": "Broken",
            "books": [{"id": "slot", "source": {"id": "missing-book"}}]}"#,
    );
    write(
        tmp.path(),
        "courses/ok.json",
        r#"{"id": "ok", "title": "OK",
            "books": [{"id": "slot", "source": {"id": "a"}}]}"#,
    );

    let (store, coordinator) = setup(tmp.path());
    let report = coordinator.reload().unwrap();

    assert_eq!(report.courses_loaded, 1);
    let dangling = report.errors_where(|e| matches!(e, Error::DanglingReference(_)));
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].file, "broken.json");

    let library = store.current();
    assert!(library.course("broken").is_none());
    assert!(library.course("ok").is_some());
    assert_eq!(library.course("ok").unwrap().books[0].items.len(), 1);
}

#[test]
fn duplicate_book_id_keeps_first_file() {
    let tmp = TempDir::new().unwrap();
    // Both define id "shared"; a.json sorts first and wins.
    write(
        tmp.path(),
        "books/a.json",
        &valid_book("shared").replace("Book shared", "From A"),
    );
    write(
        tmp.path(),
        "books/b.json",
        &valid_book("shared").replace("Book shared", "From B"),
    );

    let (store, coordinator) = setup(tmp.path());
    let report = coordinator.reload().unwrap();

    assert_eq!(report.books_loaded, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].file, "b.json");
    assert_eq!(report.errors[0].error, Error::DuplicateId("shared".into()));
    assert_eq!(store.current().book("shared").unwrap().title, "From A");
}

#[test]
fn duplicate_alias_rejects_only_that_course() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "books/a.json", &valid_book("a"));
    write(tmp.path(), "books/b.json", &valid_book("b"));
    write(
        tmp.path(),
        "courses/dup.json",
        r#"{"id": "dup", "title": "Dup", "books": [
            {"aliasId": "x", "source": {"id": "a"}},
            {"aliasId": "x", "source": {"id": "b"}}
        ]}"#,
    );
    write(
        tmp.path(),
        "courses/other.json",
        r#"{"id": "other", "title": "Other", "books": [
            {"aliasId": "x", "source": {"id": "a"}}
        ]}"#,
    );

    let (store, coordinator) = setup(tmp.path());
    let report = coordinator.reload().unwrap();

    assert_eq!(report.courses_loaded, 1);
    assert_eq!(
        report
            .errors_where(|e| matches!(e, Error::DuplicateAlias(_)))
            .len(),
        1
    );
    let library = store.current();
    assert!(library.course("dup").is_none());
    assert_eq!(library.course("other").unwrap().books[0].id, "x");
}

// ============================================================================
// Decks
// ============================================================================

#[test]
fn decks_load_independently_of_the_book_graph() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "decks/starter.json",
        r#"{"id": "starter-phrases", "name": "Starter Phrases", "cards": [
            {"front": "Hello!", "back": "你好！"},
            {"front": "Thank you.", "back": "謝謝你。", "backNote": "polite"}
        ]}"#,
    );

    let (store, coordinator) = setup(tmp.path());
    let report = coordinator.reload().unwrap();

    assert_eq!(report.decks_loaded, 1);
    assert_eq!(report.books_loaded, 0);
    let library = store.current();
    let deck = library.deck("starter-phrases").unwrap();
    assert_eq!(deck.cards.len(), 2);
    assert!(!deck.cards[0].id.is_empty());
    assert_eq!(deck.cards[1].back_note.as_deref(), Some("polite"));
}

// ============================================================================
// Idempotency and determinism
// ============================================================================

#[test]
fn reload_is_idempotent_over_an_unchanged_root() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "books/a.json", &valid_book("a"));
    write(tmp.path(), "books/dup1.json", &valid_book("shared"));
    write(tmp.path(), "books/dup2.json", &valid_book("shared"));
    write(
        tmp.path(),
        "books/noid.json",
        r#"{"items": [{"zh": "x", "tags": ["food", "travel"]}]}"#,
    );
    write(
        tmp.path(),
        "courses/c.json",
        r#"{"id": "c", "title": "C", "books": [{"id": "slot", "source": {"id": "a"}}]}"#,
    );

    let (store, coordinator) = setup(tmp.path());

    let first_report = coordinator.reload().unwrap();
    let first = store.current();
    let second_report = coordinator.reload().unwrap();
    let second = store.current();

    assert_eq!(first_report, second_report);
    // New allocation, same structure; only the generation advances.
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.books, second.books);
    assert_eq!(first.courses, second.courses);
    assert_eq!(first.decks, second.decks);
    assert_eq!(first.report, second.report);
    assert_eq!(second.generation, first.generation + 1);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn readers_never_observe_a_torn_generation() {
    let tmp = TempDir::new().unwrap();
    for i in 0..5 {
        write(
            tmp.path(),
            &format!("books/book-{i}.json"),
            &valid_book(&format!("book-{i}")),
        );
    }

    let (store, coordinator) = setup(tmp.path());
    coordinator.reload().unwrap();

    let coordinator = Arc::new(coordinator);
    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                while !stop.load(std::sync::atomic::Ordering::Relaxed) {
                    let library = store.current();
                    // Every snapshot is all-of-one-generation: the report
                    // embedded in it always describes exactly its contents.
                    assert_eq!(library.books.len(), library.report.books_loaded);
                    assert_eq!(library.books.len(), 5);
                }
            })
        })
        .collect();

    for _ in 0..20 {
        coordinator.reload().unwrap();
    }
    stop.store(true, std::sync::atomic::Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn concurrent_reload_is_rejected_not_queued() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "books/a.json", &valid_book("a"));

    let (_store, coordinator) = setup(tmp.path());
    let coordinator = Arc::new(coordinator);

    let barrier = Arc::new(std::sync::Barrier::new(2));
    let results: Vec<_> = (0..2)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                coordinator.reload()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    // Either both complete in sequence or one is turned away; a rejection
    // must be the in-progress signal, nothing else.
    for result in results {
        match result {
            Ok(report) => assert_eq!(report.books_loaded, 1),
            Err(err) => assert_eq!(err, Error::ReloadInProgress),
        }
    }
}

// ============================================================================
// Mixed course shapes (inline + referenced, matching real content files)
// ============================================================================

#[test]
fn course_with_inline_and_referenced_books() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "books/test-book.json", &valid_book("test-book"));
    write(
        tmp.path(),
        "courses/test-course.json",
        r#"{
            "id": "test-course",
            "title": "Test Course",
            "summary": "示範課程，包含引用題本與內嵌題本。",
            "tags": ["demo"],
            "books": [
                {
                    "id": "test-book",
                    "title": "Test Book",
                    "difficulty": 2,
                    "source": {"id": "test-book"}
                },
                {
                    "id": "inline-book",
                    "title": "Inline Book",
                    "difficulty": 3,
                    "items": [
                        {
                            "id": "inline-1",
                            "zh": "內嵌題目測試。",
                            "hints": [{"category": "syntactic", "text": "倒裝句"}],
                            "tags": ["inversion", "emphasis"],
                            "difficulty": 3
                        }
                    ]
                }
            ]
        }"#,
    );

    let (store, coordinator) = setup(tmp.path());
    let report = coordinator.reload().unwrap();
    assert!(report.errors.is_empty());
    assert_eq!(report.books_loaded, 1);
    assert_eq!(report.courses_loaded, 1);

    let library = store.current();
    let course = library.course("test-course").unwrap();
    assert_eq!(course.books.len(), 2);

    let referenced = course.book("test-book").unwrap();
    assert_eq!(referenced.items.len(), 1);
    assert!(referenced.items[0].zh.starts_with("這是一句"));

    let inline = course.book("inline-book").unwrap();
    assert_eq!(inline.items.len(), 1);
    assert_eq!(inline.items[0].hints[0].category.to_string(), "syntactic");
}
