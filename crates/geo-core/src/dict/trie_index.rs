use std::fs::{self, File};
use std::io;
use std::path::Path;

use crawdad::Trie;
use memmap2::Mmap;
use tracing::debug;

use super::DictError;

const MAGIC: &[u8; 4] = b"GNTX";
const VERSION: u8 = 2;
const HEADER_SIZE: usize = 4 + 1 + 3 + 4 + 4 + 4; // magic + version + reserved + key_count + trie_len + crc = 20

/// A key of the index that is a byte prefix of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Byte length of the matched prefix.
    pub len: usize,
    /// Wordlist id stored under the key.
    pub id: u32,
}

/// Character-wise double-array trie from normalized keys to wordlist ids.
///
/// The value of each key is its position in the sorted key list, which is
/// also the id assigned by `build_wordlists`. An index over no keys has no
/// trie and matches nothing.
pub struct TrieIndex {
    trie: Option<Trie>,
    key_count: u32,
}

impl TrieIndex {
    /// Build from keys in strictly ascending byte order. Keys must be
    /// non-empty.
    pub fn build<K: AsRef<str>>(keys: &[K]) -> Result<Self, DictError> {
        for (i, pair) in keys.windows(2).enumerate() {
            if pair[0].as_ref().as_bytes() >= pair[1].as_ref().as_bytes() {
                return Err(DictError::UnsortedKeys { index: i + 1 });
            }
        }
        let key_count: u32 = keys
            .len()
            .try_into()
            .map_err(|_| DictError::Parse("key count exceeds u32::MAX".to_string()))?;
        let trie = if keys.is_empty() {
            None
        } else {
            let records = keys.iter().zip(0u32..).map(|(k, id)| (k.as_ref(), id));
            Some(Trie::from_records(records).map_err(|e| DictError::Parse(e.to_string()))?)
        };
        debug!(key_count, "built trie index");
        Ok(Self { trie, key_count })
    }

    pub fn key_count(&self) -> u32 {
        self.key_count
    }

    /// Every indexed key that is a prefix of `key`, shortest first.
    pub fn longest_prefix_matches(&self, key: &str) -> Vec<PrefixMatch> {
        let Some(trie) = &self.trie else {
            return Vec::new();
        };
        // The trie reports lengths in chars; map them back to byte offsets.
        let ends: Vec<usize> = key.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
        trie.common_prefix_search(key.chars())
            .filter_map(|(id, chars)| {
                let len = *ends.get(chars.checked_sub(1)?)?;
                Some(PrefixMatch { len, id })
            })
            .collect()
    }

    pub fn exact_match(&self, key: &str) -> Option<u32> {
        self.trie.as_ref()?.exact_match(key.chars())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let trie_data = self.trie.as_ref().map(Trie::serialize_to_vec).unwrap_or_default();
        let trie_len: u32 = trie_data
            .len()
            .try_into()
            .map_err(|_| DictError::Parse("trie data exceeds u32::MAX".to_string()))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + trie_data.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]); // reserved
        buf.extend_from_slice(&self.key_count.to_le_bytes());
        buf.extend_from_slice(&trie_len.to_le_bytes());
        buf.extend_from_slice(&crc32fast::hash(&trie_data).to_le_bytes());
        buf.extend_from_slice(&trie_data);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        if data.len() < 5 {
            return Err(DictError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(DictError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(DictError::InvalidHeader);
        }

        let key_count = read_u32_le(data, 8);
        let trie_len = read_u32_le(data, 12) as usize;
        if data.len() < HEADER_SIZE + trie_len {
            return Err(DictError::InvalidHeader);
        }
        let body = &data[HEADER_SIZE..HEADER_SIZE + trie_len];
        // The trie decoder trusts its own length fields.
        if crc32fast::hash(body) != read_u32_le(data, 16) {
            return Err(DictError::InvalidHeader);
        }

        let trie = match (key_count, trie_len) {
            (0, 0) => None,
            (0, _) | (_, 0) => return Err(DictError::InvalidHeader),
            _ => {
                let (trie, rest) = Trie::deserialize_from_slice(body);
                if !rest.is_empty() {
                    return Err(DictError::InvalidHeader);
                }
                Some(trie)
            }
        };
        Ok(Self { trie, key_count })
    }

    /// Open an index file, using mmap to avoid doubling peak memory.
    ///
    /// A missing file is reported as `IndexNotFound` so callers can tell
    /// "never built" apart from a corrupt index.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DictError::IndexNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        // SAFETY: The file is opened read-only and the mapping is immutable.
        // The Mmap is dropped after deserialization completes below.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
