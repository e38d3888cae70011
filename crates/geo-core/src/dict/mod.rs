//! Geoword dictionary storage.
//!
//! `TrieIndex` maps normalized surface/reading keys to wordlist ids.
//! `GeoStore` is the read boundary to dictionary metadata, geoword entries
//! and the wordlist table; `MemoryStore` is the bundled implementation.

mod entry;
mod memory;
#[cfg(test)]
mod tests;
mod trie_index;
mod wordlist;

pub use entry::{DictionaryMeta, GeowordEntry, SurfaceVariant};
pub use memory::MemoryStore;
pub use trie_index::{PrefixMatch, TrieIndex};
pub use wordlist::{build_wordlists, CandidateRef, WordlistEntry};

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

/// Error type for index and store binary I/O.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected GNTX or GNLS)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("index keys must be sorted and unique (first violation at {index})")]
    UnsortedKeys { index: usize },

    #[error("the word index does not exist: {}", .0.display())]
    IndexNotFound(PathBuf),
}

/// Failure reading from a dictionary store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Dict(#[from] DictError),

    #[error("store is corrupt: {0}")]
    Corrupt(String),

    #[error("store lock poisoned")]
    Lock,
}

/// Read access to dictionaries, geowords and the wordlist table.
///
/// A `None` result means the record is absent; errors are reserved for
/// backend failures.
pub trait GeoStore: Send + Sync {
    fn geoword(&self, geonlp_id: &str) -> Result<Option<GeowordEntry>, StoreError>;
    fn wordlist(&self, id: u32) -> Result<Option<WordlistEntry>, StoreError>;
    fn wordlist_by_key(&self, key: &str) -> Result<Option<WordlistEntry>, StoreError>;
    fn dictionaries(&self) -> Result<BTreeMap<u32, DictionaryMeta>, StoreError>;

    fn dictionary(&self, id: u32) -> Result<Option<DictionaryMeta>, StoreError> {
        Ok(self.dictionaries()?.remove(&id))
    }
}
