//! Prompt template cache.
//!
//! Prompt templates live as plain text files next to the content library
//! and are read once, then served from memory. The cache is a dependent of
//! the library snapshot: the reload coordinator's invalidation hook drops
//! it wholesale so the next request re-reads from disk.

use dashmap::DashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// In-memory cache of prompt template files.
#[derive(Debug)]
pub struct PromptCache {
    dir: PathBuf,
    cache: DashMap<String, Arc<String>>,
}

impl PromptCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: DashMap::new(),
        }
    }

    /// The template with the given id, loading `<dir>/<id>.txt` on a miss.
    ///
    /// Ids that could escape the prompt directory are refused outright.
    pub fn get(&self, id: &str) -> Option<Arc<String>> {
        if !is_safe_id(id) {
            return None;
        }
        if let Some(cached) = self.cache.get(id) {
            return Some(Arc::clone(&cached));
        }

        let path = self.dir.join(format!("{id}.txt"));
        match fs::read_to_string(&path) {
            Ok(text) => {
                let text = Arc::new(text);
                self.cache.insert(id.to_string(), Arc::clone(&text));
                Some(text)
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read prompt {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    /// Drop every cached template.
    pub fn invalidate(&self) {
        let dropped = self.cache.len();
        self.cache.clear();
        tracing::debug!(dropped, "prompt cache invalidated");
    }

    /// Number of templates currently cached.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
}
