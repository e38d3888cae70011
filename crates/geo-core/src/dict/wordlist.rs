use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::GeowordEntry;
use crate::token::parse_id_list;

/// One trie key and the geowords it may denote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordlistEntry {
    /// Position of `key` in the sorted key list, also the trie value.
    pub id: u32,
    pub key: String,
    /// Surface of the first geoword registered under this key.
    pub surface: String,
    /// `geonlp_id:typical_name` pairs joined with `/`.
    pub candidates: String,
    pub reading: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRef {
    pub geonlp_id: String,
    pub typical_name: String,
}

impl WordlistEntry {
    pub fn candidate_refs(&self) -> Vec<CandidateRef> {
        parse_id_list(&self.candidates)
            .into_iter()
            .map(|(id, name)| CandidateRef {
                geonlp_id: id.to_string(),
                typical_name: name.to_string(),
            })
            .collect()
    }
}

struct Pending {
    surface: String,
    reading: String,
    ids: Vec<String>,
    candidates: String,
}

/// Expand geowords into the sorted wordlist table.
///
/// Every prefix×suffix surface and, when the body has a reading, every
/// corresponding reading becomes a key. Ids are assigned in byte order of
/// the keys so they line up with `TrieIndex::build`.
pub fn build_wordlists<'a>(geowords: impl IntoIterator<Item = &'a GeowordEntry>) -> Vec<WordlistEntry> {
    let mut table: BTreeMap<String, Pending> = BTreeMap::new();
    for geo in geowords {
        if !geo.is_valid() {
            continue;
        }
        let typical = geo.typical_name();
        for variant in geo.surface_variants() {
            let reading = variant.reading.unwrap_or_default();
            let mut keys = vec![variant.surface.clone()];
            if !reading.is_empty() && reading != variant.surface {
                keys.push(reading.clone());
            }
            for key in keys {
                let pending = table.entry(key).or_insert_with(|| Pending {
                    surface: variant.surface.clone(),
                    reading: reading.clone(),
                    ids: Vec::new(),
                    candidates: String::new(),
                });
                if pending.ids.contains(&geo.geonlp_id) {
                    continue;
                }
                if !pending.candidates.is_empty() {
                    pending.candidates.push('/');
                }
                pending.candidates.push_str(&geo.geonlp_id);
                pending.candidates.push(':');
                pending.candidates.push_str(&typical);
                pending.ids.push(geo.geonlp_id.clone());
            }
        }
    }

    table
        .into_iter()
        .enumerate()
        .map(|(i, (key, p))| WordlistEntry {
            id: i as u32,
            key,
            surface: p.surface,
            candidates: p.candidates,
            reading: p.reading,
        })
        .collect()
}
