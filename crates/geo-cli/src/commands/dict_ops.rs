use std::path::Path;
use std::sync::Arc;

use geo_core::dict::{GeoStore, MemoryStore};
use geo_core::settings::settings;
use geo_core::GeowordResolver;

use crate::dict_source;

pub fn import(store_path: &Path, csv_file: &str, json_file: Option<&str>) {
    let loaded = die!(
        dict_source::load(Path::new(csv_file), json_file.map(Path::new)),
        "Error reading {csv_file}: {}"
    );
    let rows = loaded.geowords.len();
    let identifier = loaded.meta.identifier.clone();
    let store = die!(MemoryStore::open(store_path), "Error opening store: {}");
    let id = die!(
        store.add_dictionary(loaded.meta, loaded.geowords),
        "Error importing dictionary: {}"
    );
    die!(store.save(store_path), "Error saving store: {}");
    println!("Imported {identifier} as #{id}: {rows} rows");
    println!("Run build-index to make the new entries searchable.");
}

pub fn remove(store_path: &Path, identifier: &str) {
    let store = die!(MemoryStore::open(store_path), "Error opening store: {}");
    if die!(store.remove_dictionary(identifier), "Error: {}") {
        die!(store.save(store_path), "Error saving store: {}");
        println!("Removed: {identifier}");
        println!("Run build-index to drop its entries from the index.");
    } else {
        println!("Not found: {identifier}");
    }
}

pub fn list(store_path: &Path) {
    let store = die!(MemoryStore::open(store_path), "Error opening store: {}");
    let dictionaries = die!(store.dictionaries(), "Error: {}");
    if dictionaries.is_empty() {
        println!("(empty)");
        return;
    }
    for meta in dictionaries.values() {
        println!("{}\t{}\t{}", meta.id, meta.identifier, meta.name);
    }
    println!("---");
    println!(
        "{} dictionaries, {} geowords, {} index keys",
        dictionaries.len(),
        die!(store.geoword_count(), "Error: {}"),
        die!(store.wordlist_count(), "Error: {}")
    );
}

pub fn build_index(store_path: &Path, index_path: &Path) {
    let store = die!(MemoryStore::open(store_path), "Error opening store: {}");
    let index = die!(store.rebuild_index(), "Error building index: {}");
    die!(index.save(index_path), "Error writing {}: {}", index_path.display());
    die!(store.save(store_path), "Error saving store: {}");
    println!(
        "Index written to {}: {} keys",
        index_path.display(),
        index.key_count()
    );
}

/// Exact lookup by surface or reading against the last built wordlist table.
pub fn lookup(store_path: &Path, key: &str) {
    let store = die!(MemoryStore::open(store_path), "Error opening store: {}");
    let resolver = die!(
        GeowordResolver::new(settings(), Arc::new(store), None),
        "Error: {}"
    );
    let geowords = die!(resolver.lookup(key), "Error: {}");
    if geowords.is_empty() {
        println!("{key}: not found");
        return;
    }
    println!("{key}: {} geowords", geowords.len());
    for g in &geowords {
        let coords = g
            .coordinates()
            .map(|(lat, lon)| format!("{lat},{lon}"))
            .unwrap_or_default();
        println!(
            "  {}\t{}\t{}\t{}\t#{}\t{}",
            g.geonlp_id,
            g.typical_name(),
            g.typical_kana(),
            g.ne_class,
            g.dictionary_id,
            coords
        );
    }
}
