use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dict::GeowordEntry;

/// Bounded geoword cache keyed by `geonlp_id`.
///
/// When an insert would grow the map past its capacity, the whole map is
/// cleared first.
#[derive(Debug)]
pub struct GeowordCache {
    capacity: usize,
    entries: RwLock<HashMap<String, Arc<GeowordEntry>>>,
}

impl GeowordCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, geonlp_id: &str) -> Option<Arc<GeowordEntry>> {
        let map = self.entries.read().ok()?;
        map.get(geonlp_id).cloned()
    }

    pub fn insert(&self, entry: Arc<GeowordEntry>) {
        // A poisoned cache is simply bypassed.
        let Ok(mut map) = self.entries.write() else {
            return;
        };
        if map.len() >= self.capacity && !map.contains_key(&entry.geonlp_id) {
            map.clear();
        }
        map.insert(entry.geonlp_id.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut map) = self.entries.write() {
            map.clear();
        }
    }
}
