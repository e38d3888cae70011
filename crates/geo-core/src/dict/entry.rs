use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata describing one imported dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryMeta {
    /// Internal numeric id, assigned by the store on import.
    pub id: u32,
    /// Stable external identifier (e.g. a URL or a short code).
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub keywords: Vec<String>,
}

/// A single place-name record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeowordEntry {
    pub geonlp_id: String,
    pub dictionary_id: u32,
    pub entry_id: String,
    pub body: String,
    pub body_kana: String,
    pub prefix: Vec<String>,
    pub suffix: Vec<String>,
    pub prefix_kana: Vec<String>,
    pub suffix_kana: Vec<String>,
    pub ne_class: String,
    pub hypernym: Vec<String>,
    pub priority_score: i32,
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub code: BTreeMap<String, String>,
    pub valid_from: String,
    pub valid_to: String,
    /// Columns without a dedicated field, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

/// One prefix×body×suffix combination of a geoword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceVariant {
    pub surface: String,
    /// Reading of the combination, `None` when the entry has no body reading.
    pub reading: Option<String>,
}

impl GeowordEntry {
    /// Representative name: first prefix + body + first suffix.
    pub fn typical_name(&self) -> String {
        let mut name = first(&self.prefix).to_string();
        name.push_str(&self.body);
        name.push_str(first(&self.suffix));
        name
    }

    pub fn typical_kana(&self) -> String {
        let mut kana = first(&self.prefix_kana).to_string();
        kana.push_str(&self.body_kana);
        kana.push_str(first(&self.suffix_kana));
        kana
    }

    /// Every prefix×suffix surface of the entry, with readings paired by
    /// position (a missing kana counts as empty).
    pub fn surface_variants(&self) -> Vec<SurfaceVariant> {
        let prefixes = or_empty(&self.prefix);
        let suffixes = or_empty(&self.suffix);
        let mut out = Vec::with_capacity(prefixes.len() * suffixes.len());
        for (i, prefix) in prefixes.iter().enumerate() {
            for (j, suffix) in suffixes.iter().enumerate() {
                let reading = (!self.body_kana.is_empty()).then(|| {
                    let mut r = kana_at(&self.prefix_kana, i).to_string();
                    r.push_str(&self.body_kana);
                    r.push_str(kana_at(&self.suffix_kana, j));
                    r
                });
                out.push(SurfaceVariant {
                    surface: format!("{prefix}{}{suffix}", self.body),
                    reading,
                });
            }
        }
        out
    }

    /// The `(prefix, suffix)` pair whose combination with the body spells
    /// `surface`, if any.
    pub fn parts_for_surface(&self, surface: &str) -> Option<(&str, &str)> {
        for prefix in or_empty(&self.prefix) {
            let Some(rest) = surface.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let Some(rest) = rest.strip_prefix(self.body.as_str()) else {
                continue;
            };
            for suffix in or_empty(&self.suffix) {
                if rest == suffix.as_str() {
                    return Some((prefix.as_str(), suffix.as_str()));
                }
            }
        }
        None
    }

    /// Latitude/longitude when both parse and lie in range.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat: f64 = self.latitude.trim().parse().ok()?;
        let lon: f64 = self.longitude.trim().parse().ok()?;
        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lat, lon))
    }

    /// Minimum fields required for indexing.
    pub fn is_valid(&self) -> bool {
        !self.geonlp_id.is_empty()
            && self.dictionary_id != 0
            && !self.body.is_empty()
            && !self.ne_class.is_empty()
    }
}

const EMPTY_PART: &[String] = &[String::new()];

fn or_empty(parts: &[String]) -> &[String] {
    if parts.is_empty() {
        EMPTY_PART
    } else {
        parts
    }
}

fn first(parts: &[String]) -> &str {
    parts.first().map(String::as_str).unwrap_or("")
}

fn kana_at(parts: &[String], index: usize) -> &str {
    parts.get(index).map(String::as_str).unwrap_or("")
}
