//! # Parlo Content Core
//!
//! The content library manager behind the Parlo server. It turns a
//! directory of loosely structured JSON documents into one immutable,
//! fully resolved in-memory [`Library`], and atomically replaces that
//! library on operator-triggered reloads while concurrent readers keep
//! serving the previous, consistent snapshot.
//!
//! ## Design Principles
//!
//! - **Skip and log**: one bad file never aborts a reload; every rejection
//!   is recorded in the [`ReloadReport`] instead of raised.
//! - **Immutable snapshots**: a [`Library`] is built once, never mutated,
//!   and replaced wholesale; readers can hold a generation for as long as
//!   they like.
//! - **Deterministic**: files are processed in lexicographic order and
//!   generated ids are derived, so an unchanged content root reloads into
//!   a structurally identical snapshot.
//! - **Closed taxonomy**: item tags and hint categories come from fixed
//!   vocabularies; anything else is a structured validation error.
//!
//! ## Pipeline
//!
//! The [`ReloadCoordinator`] drives one cycle:
//!
//! 1. [`loader`] scans `books/`, `courses/`, `decks/` and parses raw
//!    records, isolating per-file parse errors.
//! 2. [`validate`] checks each record against the taxonomy and shape
//!    rules, collecting every violation of a record together.
//! 3. [`resolve`] settles duplicate ids first-seen-wins and materializes
//!    course book slots, rejecting a whole course on a dangling reference
//!    or duplicate alias.
//! 4. The resulting [`Library`] is swapped into the [`SnapshotStore`] and
//!    registered invalidation hooks are told to drop dependent caches.
//!
//! ## Quick Start
//!
//! ```no_run
//! use parlo_content::{ReloadCoordinator, SnapshotStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(SnapshotStore::new());
//! let coordinator = ReloadCoordinator::new("data/content", Arc::clone(&store));
//!
//! let report = coordinator.reload()?;
//! println!("{} books loaded", report.books_loaded);
//!
//! let library = store.current();
//! for (id, book) in &library.books {
//!     println!("{id}: {}", book.title);
//! }
//! # Ok::<(), parlo_content::Error>(())
//! ```

pub mod error;
pub mod library;
pub mod loader;
pub mod model;
pub mod reload;
pub mod resolve;
pub mod store;
pub mod taxonomy;
pub mod validate;

// Re-export main types at crate root
pub use error::Error;
pub use library::{Library, ReloadReport, ReportEntry};
pub use loader::Kind;
pub use model::{Book, BookContent, Card, Course, CourseBook, Deck, Hint, Item, Suggestion};
pub use reload::{InvalidationHook, ReloadCoordinator};
pub use store::SnapshotStore;
pub use taxonomy::{HintCategory, TagCategory};
pub use validate::ValidatorOptions;

/// Type aliases for clarity
pub type BookId = String;
pub type CourseId = String;
pub type DeckId = String;
pub type ItemId = String;
pub type Generation = u64;
