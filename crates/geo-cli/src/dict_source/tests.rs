use std::fs;
use std::path::Path;

use super::*;

const CSV: &str = "\
geonlp_id,entry_id,body,body_kana,suffix,suffix_kana,ne_class,latitude,longitude,code,hypernym,note
a1,1,千代田,ちよだ,区/,く/,市区町村,35.69,139.75,JISX0402:13101/LASDEC:131016,東京都,old ward
,2,府中,ふちゅう,市,し,市区町村,,,,,
a3,3,,,,,市区町村,,,,,
a4,4,新宿,しんじゅく,,,,,,,,
";

#[test]
fn test_parse_geowords_fields() {
    let geowords = parse_geowords(CSV.as_bytes()).unwrap();
    assert_eq!(geowords.len(), 2);

    let chiyoda = &geowords[0];
    assert_eq!(chiyoda.geonlp_id, "a1");
    assert_eq!(chiyoda.suffix, vec!["区".to_string(), String::new()]);
    assert_eq!(chiyoda.suffix_kana, vec!["く".to_string(), String::new()]);
    assert!(chiyoda.prefix.is_empty());
    assert_eq!(chiyoda.hypernym, vec!["東京都".to_string()]);
    assert_eq!(chiyoda.code.get("JISX0402").map(String::as_str), Some("13101"));
    assert_eq!(chiyoda.code.get("LASDEC").map(String::as_str), Some("131016"));
    assert_eq!(chiyoda.extra.get("note").map(String::as_str), Some("old ward"));
    assert_eq!(chiyoda.coordinates(), Some((35.69, 139.75)));

    // No geonlp_id: kept, the store assigns one from entry_id.
    assert_eq!(geowords[1].geonlp_id, "");
    assert_eq!(geowords[1].entry_id, "2");
}

#[test]
fn test_geolod_id_fallback() {
    let csv = "geolod_id,body,ne_class\nlod1,渋谷,市区町村\n";
    let geowords = parse_geowords(csv.as_bytes()).unwrap();
    assert_eq!(geowords[0].geonlp_id, "lod1");
    assert!(geowords[0].extra.is_empty());
}

#[test]
fn test_geonlp_id_wins_over_geolod_id() {
    let csv = "geonlp_id,geolod_id,body,ne_class\nnlp1,lod1,渋谷,市区町村\n";
    let geowords = parse_geowords(csv.as_bytes()).unwrap();
    assert_eq!(geowords[0].geonlp_id, "nlp1");
}

#[test]
fn test_no_valid_rows_is_error() {
    let csv = "geonlp_id,body,ne_class\nx,,市区町村\n";
    assert!(matches!(
        parse_geowords(csv.as_bytes()),
        Err(DictSourceError::Parse(_))
    ));
}

#[test]
fn test_parse_metadata_prefers_geonlp_identifier() {
    let json = r#"{
        "identifier": ["https://example.org/ds/1", "geonlp:ksj-station"],
        "name": "Stations",
        "description": "Railway stations",
        "keywords": ["station", "railway"]
    }"#;
    let meta = parse_metadata(json.as_bytes()).unwrap();
    assert_eq!(meta.identifier, "geonlp:ksj-station");
    assert_eq!(meta.name, "Stations");
    assert_eq!(meta.keywords, vec!["station".to_string(), "railway".to_string()]);
    assert_eq!(meta.id, 0);
}

#[test]
fn test_parse_metadata_single_identifier() {
    let json = r#"{"identifier": "tokyo", "name": "Tokyo", "keywords": "wards"}"#;
    let meta = parse_metadata(json.as_bytes()).unwrap();
    assert_eq!(meta.identifier, "tokyo");
    assert_eq!(meta.keywords, vec!["wards".to_string()]);
}

#[test]
fn test_parse_metadata_requires_identifier_and_name() {
    assert!(matches!(
        parse_metadata(r#"{"name": "x"}"#.as_bytes()),
        Err(DictSourceError::Parse(_))
    ));
    assert!(matches!(
        parse_metadata(r#"{"identifier": "x"}"#.as_bytes()),
        Err(DictSourceError::Parse(_))
    ));
    assert!(matches!(
        parse_metadata("not json".as_bytes()),
        Err(DictSourceError::Json(_))
    ));
}

#[test]
fn test_meta_from_csv_path() {
    let meta = meta_from_csv_path(Path::new("/data/tokyo_wards.csv")).unwrap();
    assert_eq!(meta.identifier, "geonlp:tokyo_wards");
    assert_eq!(meta.name, "tokyo_wards");
}

#[test]
fn test_load_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("wards.csv");
    let json_path = dir.path().join("wards.json");
    fs::write(&csv_path, CSV).unwrap();
    fs::write(&json_path, r#"{"identifier": "geonlp:wards", "name": "Wards"}"#).unwrap();

    let loaded = load(&csv_path, Some(&json_path)).unwrap();
    assert_eq!(loaded.meta.identifier, "geonlp:wards");
    assert_eq!(loaded.geowords.len(), 2);

    let bare = load(&csv_path, None).unwrap();
    assert_eq!(bare.meta.identifier, "geonlp:wards");
    assert_eq!(bare.meta.name, "wards");
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load(&dir.path().join("missing.csv"), None),
        Err(DictSourceError::Io(_))
    ));
}

#[test]
fn test_loaded_dictionary_imports_into_store() {
    use geo_core::dict::{GeoStore, MemoryStore};

    let geowords = parse_geowords(CSV.as_bytes()).unwrap();
    let meta = meta_from_csv_path(Path::new("wards.csv")).unwrap();
    let store = MemoryStore::new();
    let id = store.add_dictionary(meta, geowords).unwrap();
    assert_eq!(id, 1);
    assert_eq!(store.geoword_count().unwrap(), 2);
    // entry_id fallback assigned by the store
    assert!(store.geoword("_1_2").unwrap().is_some());

    store.rebuild_index().unwrap();
    let entry = store.wordlist_by_key("千代田区").unwrap().unwrap();
    assert_eq!(entry.candidate_refs()[0].geonlp_id, "a1");
}

#[test]
fn test_unparsable_priority_score_reads_as_zero() {
    let csv = "geonlp_id,body,ne_class,priority_score\n\
               p1,渋谷,市区町村,high\n\
               p2,新宿,市区町村,-3\n";
    let geowords = parse_geowords(csv.as_bytes()).unwrap();
    assert_eq!(geowords.len(), 2);
    assert_eq!(geowords[0].priority_score, 0);
    assert_eq!(geowords[1].priority_score, -3);
}
