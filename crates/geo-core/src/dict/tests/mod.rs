mod memory;

use crate::dict::GeowordEntry;

/// Geoword with the fields the index cares about.
pub(super) fn geo(id: &str, dictionary_id: u32, body: &str, kana: &str, ne_class: &str) -> GeowordEntry {
    GeowordEntry {
        geonlp_id: id.to_string(),
        dictionary_id,
        entry_id: id.to_string(),
        body: body.to_string(),
        body_kana: kana.to_string(),
        ne_class: ne_class.to_string(),
        ..GeowordEntry::default()
    }
}
