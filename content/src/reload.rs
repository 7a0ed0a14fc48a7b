//! Reload coordinator - drives one end-to-end reload cycle.
//!
//! load -> validate -> resolve -> build snapshot -> swap -> invalidate.
//! Per-file problems are soft failures folded into the report; only an
//! unavailable (or entirely empty) content root aborts the reload, leaving
//! the previous snapshot untouched. Reloads are single-flight: a call
//! arriving while another is in progress is rejected, not queued.

use crate::error::{Error, Result};
use crate::library::{Library, ReloadReport};
use crate::store::SnapshotStore;
use crate::validate::ValidatorOptions;
use crate::{loader, resolve, validate};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Callback run after every successful swap, used by collaborators to drop
/// caches derived from the previous snapshot.
pub type InvalidationHook = Box<dyn Fn() + Send + Sync>;

/// Orchestrates reload cycles against one content root and one store.
pub struct ReloadCoordinator {
    root: PathBuf,
    store: Arc<SnapshotStore>,
    options: ValidatorOptions,
    hooks: Vec<InvalidationHook>,
    in_flight: Mutex<()>,
}

impl ReloadCoordinator {
    pub fn new(root: impl Into<PathBuf>, store: Arc<SnapshotStore>) -> Self {
        Self {
            root: root.into(),
            store,
            options: ValidatorOptions::default(),
            hooks: Vec::new(),
            in_flight: Mutex::new(()),
        }
    }

    /// Builder-style method to set validator options.
    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a hook invoked once after each successful swap.
    pub fn on_invalidate(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// The store this coordinator installs snapshots into.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Run one full reload cycle.
    ///
    /// Returns the aggregate report on success. Fails with
    /// [`Error::ReloadInProgress`] when another reload holds the
    /// single-flight guard, and with [`Error::RootUnavailable`] when the
    /// content root is missing, unreadable, or holds no content files; in
    /// every failure case the previous snapshot stays active.
    pub fn reload(&self) -> Result<ReloadReport> {
        let Some(_guard) = self.in_flight.try_lock() else {
            return Err(Error::ReloadInProgress);
        };

        let scan = loader::scan(&self.root)?;
        if scan.is_empty() {
            return Err(Error::RootUnavailable(format!(
                "no content files under {}",
                self.root.display()
            )));
        }

        let mut errors = scan.errors;
        let validated = validate::validate(scan.documents, self.options);
        errors.extend(validated.errors);

        let resolved = resolve::resolve(validated.books, validated.courses, validated.decks);
        errors.extend(resolved.errors);

        let report = ReloadReport {
            books_loaded: resolved.books.len(),
            courses_loaded: resolved.courses.len(),
            decks_loaded: resolved.decks.len(),
            errors,
        };

        let generation = self.store.current().generation + 1;
        let library = Library {
            generation,
            books: resolved.books,
            courses: resolved.courses,
            decks: resolved.decks,
            report: report.clone(),
        };

        self.store.swap(library);
        tracing::info!(
            generation,
            books = report.books_loaded,
            courses = report.courses_loaded,
            decks = report.decks_loaded,
            errors = report.errors.len(),
            "content reloaded"
        );

        // Dependent caches are told to drop stale state only once the new
        // snapshot is live.
        for hook in &self.hooks {
            hook();
        }

        Ok(report)
    }
}

impl std::fmt::Debug for ReloadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadCoordinator")
            .field("root", &self.root)
            .field("options", &self.options)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn valid_book(id: &str) -> String {
        format!(
            r#"{{"id": "{id}", "title": "{id}", "items": [
                {{"id": "{id}-1", "zh": "句子", "tags": ["food", "travel"], "difficulty": 2}}
            ]}}"#
        )
    }

    #[test]
    fn reload_swaps_in_a_new_generation() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "books/a.json", &valid_book("a"));

        let store = Arc::new(SnapshotStore::new());
        let coordinator = ReloadCoordinator::new(tmp.path(), Arc::clone(&store));

        let report = coordinator.reload().unwrap();
        assert_eq!(report.books_loaded, 1);
        assert!(report.errors.is_empty());
        assert_eq!(store.generation(), 1);
        assert!(store.current().book("a").is_some());
    }

    #[test]
    fn missing_root_keeps_previous_snapshot() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "books/a.json", &valid_book("a"));

        let store = Arc::new(SnapshotStore::new());
        let coordinator = ReloadCoordinator::new(tmp.path(), Arc::clone(&store));
        coordinator.reload().unwrap();

        let gone = ReloadCoordinator::new(tmp.path().join("missing"), Arc::clone(&store));
        let result = gone.reload();
        assert!(matches!(result, Err(Error::RootUnavailable(_))));
        assert_eq!(store.generation(), 1);
        assert!(store.current().book("a").is_some());
    }

    #[test]
    fn empty_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("books")).unwrap();

        let store = Arc::new(SnapshotStore::new());
        let coordinator = ReloadCoordinator::new(tmp.path(), Arc::clone(&store));
        assert!(matches!(
            coordinator.reload(),
            Err(Error::RootUnavailable(_))
        ));
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn hooks_fire_once_per_successful_reload_only() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "books/a.json", &valid_book("a"));

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let store = Arc::new(SnapshotStore::new());
        let coordinator = ReloadCoordinator::new(tmp.path(), Arc::clone(&store))
            .on_invalidate(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        coordinator.reload().unwrap();
        coordinator.reload().unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        // A failing reload must not invalidate anything.
        let failing = ReloadCoordinator::new(tmp.path().join("missing"), store);
        let counter = Arc::clone(&fired);
        let failing = failing.on_invalidate(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(failing.reload().is_err());
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn bad_files_are_soft_failures() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "books/a.json", &valid_book("a"));
        write(tmp.path(), "books/b.json", "{broken");

        let store = Arc::new(SnapshotStore::new());
        let coordinator = ReloadCoordinator::new(tmp.path(), Arc::clone(&store));

        let report = coordinator.reload().unwrap();
        assert_eq!(report.books_loaded, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].file, "b.json");
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn generations_increase_monotonically() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "books/a.json", &valid_book("a"));

        let store = Arc::new(SnapshotStore::new());
        let coordinator = ReloadCoordinator::new(tmp.path(), Arc::clone(&store));

        coordinator.reload().unwrap();
        coordinator.reload().unwrap();
        coordinator.reload().unwrap();
        assert_eq!(store.generation(), 3);
    }
}
