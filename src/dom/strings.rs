//! String Interning Pool
//!
//! Deduplicated storage for tag names, attribute names/values and text content.
//! All strings live in one contiguous buffer; an ID is an index into `entries`.
//!
//! Uses hash-based lookup to avoid storing duplicate string data. Tables on
//! financial pages repeat the same short strings ("TD", "n/a", "-") many times.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// String interning pool
///
/// Memory layout:
/// - `entries`: (offset, len) into `data` for each interned string ID
/// - `data`: buffer holding every distinct string once
/// - `hash_index`: hash -> list of IDs (handles rare collisions)
#[derive(Debug, Default)]
pub struct StringPool {
    entries: Vec<(u32, u32)>,
    data: String,
    hash_index: HashMap<u64, Vec<u32>>,
}

impl StringPool {
    /// Create a new pool; ID 0 is reserved for the empty string
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: String::with_capacity(4096),
            hash_index: HashMap::new(),
        };
        pool.entries.push((0, 0));
        pool
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning its ID
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get_str(id) == Some(s) {
                    return id;
                }
            }
        }

        let offset = self.data.len() as u32;
        self.data.push_str(s);

        let id = self.entries.len() as u32;
        self.entries.push((offset, s.len() as u32));
        self.hash_index.entry(hash).or_default().push(id);

        id
    }

    /// Get a string by ID
    pub fn get_str(&self, id: u32) -> Option<&str> {
        let &(offset, len) = self.entries.get(id as usize)?;
        let start = offset as usize;
        self.data.get(start..start + len as usize)
    }

    /// Get the number of unique strings stored (including the reserved empty string)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the pool holds nothing but the reserved empty string
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Get total bytes used for string storage
    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }
}
