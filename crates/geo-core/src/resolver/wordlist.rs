use std::sync::Arc;

use tracing::warn;

use super::GeowordCache;
use crate::dict::{GeoStore, GeowordEntry, StoreError, WordlistEntry};

/// Resolves wordlist ids to entries and expands candidate lists into
/// geowords, going through a shared `GeowordCache`.
#[derive(Clone)]
pub struct WordlistResolver {
    store: Arc<dyn GeoStore>,
    cache: Arc<GeowordCache>,
}

impl WordlistResolver {
    pub fn new(store: Arc<dyn GeoStore>, cache: Arc<GeowordCache>) -> Self {
        Self { store, cache }
    }

    /// Same store, different cache.
    pub fn with_cache(&self, cache: Arc<GeowordCache>) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache,
        }
    }

    pub fn store(&self) -> &dyn GeoStore {
        self.store.as_ref()
    }

    pub fn cache(&self) -> &GeowordCache {
        &self.cache
    }

    /// `None` means the index points at a wordlist the store no longer has.
    pub fn resolve(&self, id: u32) -> Result<Option<WordlistEntry>, StoreError> {
        self.store.wordlist(id)
    }

    pub fn resolve_key(&self, key: &str) -> Result<Option<WordlistEntry>, StoreError> {
        self.store.wordlist_by_key(key)
    }

    pub fn geoword(&self, geonlp_id: &str) -> Result<Option<Arc<GeowordEntry>>, StoreError> {
        if let Some(hit) = self.cache.get(geonlp_id) {
            return Ok(Some(hit));
        }
        let Some(entry) = self.store.geoword(geonlp_id)? else {
            return Ok(None);
        };
        let entry = Arc::new(entry);
        self.cache.insert(Arc::clone(&entry));
        Ok(Some(entry))
    }

    /// Geowords listed by a wordlist entry, in list order.
    ///
    /// Ids the store does not know are logged and skipped.
    pub fn expand_candidates(
        &self,
        entry: &WordlistEntry,
    ) -> Result<Vec<Arc<GeowordEntry>>, StoreError> {
        let refs = entry.candidate_refs();
        let mut out = Vec::with_capacity(refs.len());
        for r in refs {
            match self.geoword(&r.geonlp_id)? {
                Some(geo) => out.push(geo),
                None => warn!(
                    geonlp_id = %r.geonlp_id,
                    wordlist = entry.id,
                    "wordlist refers to a missing geoword"
                ),
            }
        }
        Ok(out)
    }
}
