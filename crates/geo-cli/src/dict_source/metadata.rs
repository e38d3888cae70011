use std::io;
use std::path::Path;

use geo_core::dict::DictionaryMeta;
use serde::Deserialize;

use super::DictSourceError;

/// Prefix marking the GeoNLP identifier among a dataset's identifiers.
const GEONLP_SCHEME: &str = "geonlp:";

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Dataset description as published alongside GeoNLP dictionaries.
#[derive(Deserialize)]
struct Dataset {
    #[serde(default)]
    identifier: OneOrMany,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    keywords: OneOrMany,
}

/// Parse dictionary metadata JSON.
///
/// `identifier` may be a string or a list; in a list the `geonlp:` entry
/// wins, otherwise the first one. Identifier and name are required.
pub fn parse_metadata<R: io::Read>(reader: R) -> Result<DictionaryMeta, DictSourceError> {
    let dataset: Dataset = serde_json::from_reader(reader)?;
    let identifiers = dataset.identifier.into_vec();
    let identifier = identifiers
        .iter()
        .find(|id| id.starts_with(GEONLP_SCHEME))
        .or_else(|| identifiers.first())
        .cloned()
        .unwrap_or_default();
    if identifier.is_empty() {
        return Err(DictSourceError::Parse(
            "dictionary metadata has no identifier".to_string(),
        ));
    }
    if dataset.name.is_empty() {
        return Err(DictSourceError::Parse(
            "dictionary metadata has no name".to_string(),
        ));
    }
    Ok(DictionaryMeta {
        id: 0,
        identifier,
        name: dataset.name,
        description: dataset.description,
        url: dataset.url,
        keywords: dataset.keywords.into_vec(),
    })
}

/// Minimal metadata for a bare CSV file: `geonlp:<stem>` named `<stem>`.
pub fn meta_from_csv_path(path: &Path) -> Result<DictionaryMeta, DictSourceError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DictSourceError::Parse(format!("no file name in {}", path.display())))?;
    Ok(DictionaryMeta {
        identifier: format!("{GEONLP_SCHEME}{stem}"),
        name: stem,
        ..DictionaryMeta::default()
    })
}
