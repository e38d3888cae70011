mod proptest_totality;

use std::sync::Arc;

use crate::dict::{DictionaryMeta, GeowordEntry, MemoryStore};
use crate::resolver::GeowordResolver;
use crate::settings::{parse_settings_toml, Settings, DEFAULT_SETTINGS_TOML};
use crate::token::Token;

pub(super) const PLACE: &str = "名詞,固有名詞,地域,一般,*,*";
pub(super) const PROPER: &str = "名詞,固有名詞,一般,*,*,*";
pub(super) const PERSON: &str = "名詞,固有名詞,人名,姓,*,*";
pub(super) const GENERAL: &str = "名詞,一般,*,*,*,*";
pub(super) const SAHEN: &str = "名詞,サ変接続,*,*,*,*";
pub(super) const REGION_SUFFIX: &str = "名詞,接尾,地域,*,*,*";
pub(super) const GENERAL_SUFFIX: &str = "名詞,接尾,一般,*,*,*";
pub(super) const PARTICLE: &str = "助詞,格助詞,一般,*,*,*";

pub(super) fn default_settings() -> Settings {
    parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap()
}

pub(super) fn tok(surface: &str, feature: &str) -> Token {
    Token::new(surface, feature)
}

pub(super) fn place(id: &str, body: &str, kana: &str) -> GeowordEntry {
    GeowordEntry {
        geonlp_id: id.to_string(),
        entry_id: id.to_string(),
        body: body.to_string(),
        body_kana: kana.to_string(),
        ne_class: "市区町村".to_string(),
        ..GeowordEntry::default()
    }
}

pub(super) fn with_suffix(mut geo: GeowordEntry, suffixes: &[&str]) -> GeowordEntry {
    geo.suffix = suffixes.iter().map(|s| s.to_string()).collect();
    geo
}

/// Store with one dictionary per group, numbered from 1 in order.
pub(super) fn build_store(dictionaries: Vec<Vec<GeowordEntry>>) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for (i, geowords) in dictionaries.into_iter().enumerate() {
        let meta = DictionaryMeta {
            identifier: format!("dict{}", i + 1),
            name: format!("Dictionary {}", i + 1),
            ..DictionaryMeta::default()
        };
        store.add_dictionary(meta, geowords).unwrap();
    }
    Arc::new(store)
}

pub(super) fn resolver_with(
    settings: &Settings,
    dictionaries: Vec<Vec<GeowordEntry>>,
) -> GeowordResolver {
    let store = build_store(dictionaries);
    let index = Arc::new(store.rebuild_index().unwrap());
    GeowordResolver::new(settings, store, Some(index)).unwrap()
}

pub(super) fn resolver(dictionaries: Vec<Vec<GeowordEntry>>) -> GeowordResolver {
    resolver_with(&default_settings(), dictionaries)
}

pub(super) fn surfaces(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.surface.as_str()).collect()
}
