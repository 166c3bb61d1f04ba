//! Parsed path cache
//!
//! Extraction configurations name the same handful of anchor paths over and
//! over; an LRU keeps their parsed form around. Parse failures are not cached.

use super::{PathParseError, StructuralPath};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Capacity of the process-wide cache behind `StructuralPath::parse_cached`
pub const DEFAULT_CAPACITY: usize = 256;

static GLOBAL: OnceLock<PathCache> = OnceLock::new();

/// Process-wide cache
pub fn global() -> &'static PathCache {
    GLOBAL.get_or_init(|| PathCache::new(DEFAULT_CAPACITY))
}

/// Thread-safe LRU cache from path text to parsed path
#[derive(Debug)]
pub struct PathCache {
    entries: Mutex<LruCache<String, StructuralPath>>,
}

impl PathCache {
    /// Create a cache holding at most `capacity` paths (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        PathCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Parse `text`, reusing a previously parsed value when present
    pub fn parse(&self, text: &str) -> Result<StructuralPath, PathParseError> {
        if let Some(path) = self.lock().get(text) {
            return Ok(path.clone());
        }
        let path = super::parser::parse(text)?;
        self.lock().put(text.to_string(), path.clone());
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave the cache inconsistent
    fn lock(&self) -> MutexGuard<'_, LruCache<String, StructuralPath>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
