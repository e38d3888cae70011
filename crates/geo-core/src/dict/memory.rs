//! In-memory dictionary store with a single-file binary snapshot.
//!
//! Holds dictionary metadata, geoword entries and the wordlist table built
//! by the last `rebuild_index`. Uses `RwLock` so imports can run while
//! resolvers hold a shared reference.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    build_wordlists, DictError, DictionaryMeta, GeoStore, GeowordEntry, StoreError, TrieIndex,
    WordlistEntry,
};

const MAGIC: &[u8; 4] = b"GNLS";
const VERSION: u8 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    dictionaries: BTreeMap<u32, DictionaryMeta>,
    geowords: BTreeMap<String, GeowordEntry>,
    /// Sorted by key; position equals id.
    wordlists: Vec<WordlistEntry>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreData>, StoreError> {
        self.data.read().map_err(|_| StoreError::Lock)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreData>, StoreError> {
        self.data.write().map_err(|_| StoreError::Lock)
    }

    /// Import a dictionary, replacing any earlier import with the same
    /// identifier. Returns the internal dictionary id.
    ///
    /// Entries get the dictionary id assigned; an empty `geonlp_id` falls
    /// back to `_<dictionary id>_<entry_id>`. Entries still invalid after
    /// that are skipped. The wordlist table is not touched until
    /// `rebuild_index`.
    pub fn add_dictionary(
        &self,
        mut meta: DictionaryMeta,
        geowords: impl IntoIterator<Item = GeowordEntry>,
    ) -> Result<u32, StoreError> {
        let mut data = self.write()?;
        let existing = data
            .dictionaries
            .values()
            .find(|d| d.identifier == meta.identifier)
            .map(|d| d.id);
        let id = match existing {
            Some(id) => {
                data.geowords.retain(|_, g| g.dictionary_id != id);
                id
            }
            None => data.dictionaries.keys().next_back().map_or(1, |last| last + 1),
        };
        meta.id = id;

        let mut added = 0usize;
        let mut skipped = 0usize;
        for mut geo in geowords {
            geo.dictionary_id = id;
            if geo.geonlp_id.is_empty() && !geo.entry_id.is_empty() {
                geo.geonlp_id = format!("_{id}_{}", geo.entry_id);
            }
            if !geo.is_valid() {
                skipped += 1;
                continue;
            }
            data.geowords.insert(geo.geonlp_id.clone(), geo);
            added += 1;
        }
        info!(identifier = %meta.identifier, id, added, skipped, "dictionary imported");
        data.dictionaries.insert(id, meta);
        Ok(id)
    }

    /// Remove a dictionary and its entries. Returns `false` if unknown.
    pub fn remove_dictionary(&self, identifier: &str) -> Result<bool, StoreError> {
        let mut data = self.write()?;
        let Some(id) = data
            .dictionaries
            .values()
            .find(|d| d.identifier == identifier)
            .map(|d| d.id)
        else {
            return Ok(false);
        };
        data.dictionaries.remove(&id);
        data.geowords.retain(|_, g| g.dictionary_id != id);
        Ok(true)
    }

    pub fn dictionary_by_identifier(&self, identifier: &str) -> Result<Option<DictionaryMeta>, StoreError> {
        let data = self.read()?;
        Ok(data
            .dictionaries
            .values()
            .find(|d| d.identifier == identifier)
            .cloned())
    }

    pub fn geoword_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.geowords.len())
    }

    pub fn wordlist_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.wordlists.len())
    }

    /// Regenerate the wordlist table from all geowords and build the
    /// matching trie index.
    pub fn rebuild_index(&self) -> Result<TrieIndex, StoreError> {
        let mut data = self.write()?;
        let wordlists = build_wordlists(data.geowords.values());
        let keys: Vec<&str> = wordlists.iter().map(|w| w.key.as_str()).collect();
        let index = TrieIndex::build(&keys)?;
        debug!(
            geowords = data.geowords.len(),
            keys = wordlists.len(),
            "rebuilt wordlist table"
        );
        data.wordlists = wordlists;
        Ok(index)
    }

    /// Serialize to bytes (GNLS format).
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let data = self.read()?;
        let body = bincode::serialize(&*data).map_err(DictError::Serialize)?;
        let mut buf = Vec::with_capacity(5 + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Deserialize from bytes (GNLS format).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() < 5 {
            return Err(DictError::InvalidHeader.into());
        }
        if &bytes[0..4] != MAGIC {
            return Err(DictError::InvalidMagic.into());
        }
        if bytes[4] != VERSION {
            return Err(DictError::UnsupportedVersion(bytes[4]).into());
        }
        let data: StoreData = bincode::deserialize(&bytes[5..]).map_err(DictError::Deserialize)?;
        if data
            .wordlists
            .iter()
            .enumerate()
            .any(|(i, w)| w.id as usize != i)
        {
            return Err(StoreError::Corrupt("wordlist ids out of order".to_string()));
        }
        Ok(Self {
            data: RwLock::new(data),
        })
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(DictError::Io)?;
        }
        fs::write(&tmp, &bytes).map_err(DictError::Io)?;
        fs::rename(&tmp, path).map_err(DictError::Io)?;
        Ok(())
    }

    /// Open from file, returning an empty store if the file doesn't exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        match fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(DictError::Io(e).into()),
        }
    }
}

impl GeoStore for MemoryStore {
    fn geoword(&self, geonlp_id: &str) -> Result<Option<GeowordEntry>, StoreError> {
        Ok(self.read()?.geowords.get(geonlp_id).cloned())
    }

    fn wordlist(&self, id: u32) -> Result<Option<WordlistEntry>, StoreError> {
        Ok(self.read()?.wordlists.get(id as usize).cloned())
    }

    fn wordlist_by_key(&self, key: &str) -> Result<Option<WordlistEntry>, StoreError> {
        let data = self.read()?;
        Ok(data
            .wordlists
            .binary_search_by(|w| w.key.as_str().cmp(key))
            .ok()
            .map(|i| data.wordlists[i].clone()))
    }

    fn dictionaries(&self) -> Result<BTreeMap<u32, DictionaryMeta>, StoreError> {
        Ok(self.read()?.dictionaries.clone())
    }

    fn dictionary(&self, id: u32) -> Result<Option<DictionaryMeta>, StoreError> {
        Ok(self.read()?.dictionaries.get(&id).cloned())
    }
}
