use super::geo;
use crate::dict::{DictError, DictionaryMeta, GeoStore, MemoryStore, StoreError};

fn meta(identifier: &str) -> DictionaryMeta {
    DictionaryMeta {
        identifier: identifier.to_string(),
        name: identifier.to_string(),
        ..DictionaryMeta::default()
    }
}

fn sample_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .add_dictionary(
            meta("japan_city"),
            vec![
                geo("fuchu_tokyo", 0, "府中", "ふちゅう", "市区町村"),
                geo("chofu", 0, "調布", "ちょうふ", "市区町村"),
            ],
        )
        .unwrap();
    store
        .add_dictionary(
            meta("stations"),
            vec![geo("fuchu_sta", 0, "府中駅", "ふちゅうえき", "鉄道施設/駅")],
        )
        .unwrap();
    store
}

#[test]
fn add_assigns_sequential_ids() {
    let store = sample_store();
    let dicts = store.dictionaries().unwrap();
    assert_eq!(dicts.len(), 2);
    assert_eq!(dicts[&1].identifier, "japan_city");
    assert_eq!(dicts[&2].identifier, "stations");
    assert_eq!(store.geoword("fuchu_sta").unwrap().unwrap().dictionary_id, 2);
    assert_eq!(store.geoword_count().unwrap(), 3);
}

#[test]
fn reimport_replaces_entries() {
    let store = sample_store();
    let id = store
        .add_dictionary(
            meta("japan_city"),
            vec![geo("mitaka", 0, "三鷹", "みたか", "市区町村")],
        )
        .unwrap();
    assert_eq!(id, 1);
    assert!(store.geoword("fuchu_tokyo").unwrap().is_none());
    assert!(store.geoword("mitaka").unwrap().is_some());
    assert_eq!(store.geoword_count().unwrap(), 2);
}

#[test]
fn missing_geonlp_id_falls_back_to_entry_id() {
    let store = MemoryStore::new();
    let mut g = geo("", 0, "府中", "ふちゅう", "市区町村");
    g.entry_id = "42".to_string();
    let id = store.add_dictionary(meta("d"), vec![g]).unwrap();
    let expected = format!("_{id}_42");
    assert!(store.geoword(&expected).unwrap().is_some());
}

#[test]
fn invalid_entries_are_skipped() {
    let store = MemoryStore::new();
    store
        .add_dictionary(meta("d"), vec![geo("g1", 0, "", "", "市区町村")])
        .unwrap();
    assert_eq!(store.geoword_count().unwrap(), 0);
}

#[test]
fn remove_dictionary() {
    let store = sample_store();
    assert!(store.remove_dictionary("stations").unwrap());
    assert!(!store.remove_dictionary("stations").unwrap());
    assert!(store.geoword("fuchu_sta").unwrap().is_none());
    assert!(store.dictionary(2).unwrap().is_none());
}

#[test]
fn rebuild_index_lines_up_ids() {
    let store = sample_store();
    let index = store.rebuild_index().unwrap();
    assert_eq!(index.key_count() as usize, store.wordlist_count().unwrap());

    let id = index.exact_match("府中駅").unwrap();
    let entry = store.wordlist(id).unwrap().unwrap();
    assert_eq!(entry.key, "府中駅");
    assert_eq!(entry.candidates, "fuchu_sta:府中駅");

    let by_key = store.wordlist_by_key("ちょうふ").unwrap().unwrap();
    assert_eq!(by_key.surface, "調布");
    assert!(store.wordlist_by_key("大阪").unwrap().is_none());
}

#[test]
fn save_and_open_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.gnls");
    let store = sample_store();
    store.rebuild_index().unwrap();
    store.save(&path).unwrap();

    let opened = MemoryStore::open(&path).unwrap();
    assert_eq!(opened.dictionaries().unwrap(), store.dictionaries().unwrap());
    assert_eq!(opened.wordlist_count().unwrap(), store.wordlist_count().unwrap());
    assert_eq!(
        opened.dictionary_by_identifier("stations").unwrap().unwrap().id,
        2
    );
}

#[test]
fn open_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::open(&dir.path().join("nope.gnls")).unwrap();
    assert!(store.dictionaries().unwrap().is_empty());
}

#[test]
fn bad_magic_is_rejected() {
    assert!(matches!(
        MemoryStore::from_bytes(b"XXXX\x01rest"),
        Err(StoreError::Dict(DictError::InvalidMagic))
    ));
}

#[test]
fn unreadable_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory exists but cannot be read as a snapshot.
    assert!(matches!(
        MemoryStore::open(dir.path()),
        Err(StoreError::Dict(DictError::Io(_)))
    ));
}
