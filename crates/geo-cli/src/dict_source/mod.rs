mod csv_rows;
mod metadata;
#[cfg(test)]
mod tests;

use std::fs::File;
use std::io;
use std::path::Path;

use geo_core::dict::{DictionaryMeta, GeowordEntry};

pub use csv_rows::parse_geowords;
pub use metadata::{meta_from_csv_path, parse_metadata};

#[derive(Debug, thiserror::Error)]
pub enum DictSourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// A dictionary read from disk, ready for `MemoryStore::add_dictionary`.
#[derive(Debug)]
pub struct LoadedDictionary {
    pub meta: DictionaryMeta,
    pub geowords: Vec<GeowordEntry>,
}

/// Load a GeoNLP dictionary from its CSV file and optional JSON metadata.
///
/// Without metadata the identifier and name are derived from the CSV file
/// name.
pub fn load(csv_path: &Path, json_path: Option<&Path>) -> Result<LoadedDictionary, DictSourceError> {
    let meta = match json_path {
        Some(path) => parse_metadata(File::open(path)?)?,
        None => meta_from_csv_path(csv_path)?,
    };
    let geowords = parse_geowords(File::open(csv_path)?)?;
    Ok(LoadedDictionary { meta, geowords })
}

