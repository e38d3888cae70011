use std::io;

use geo_core::dict::GeowordEntry;
use tracing::{debug, warn};

use super::DictSourceError;

/// Read geoword rows from a GeoNLP CSV file with a header row.
///
/// `prefix`, `suffix`, `prefix_kana`, `suffix_kana` and `hypernym` hold
/// `/`-separated alternatives; an empty alternative is kept (`区/` means
/// "with or without 区"). `code` holds `key:value/...`. Unknown columns
/// land in `extra`. A row without `geonlp_id` takes its `geolod_id`.
///
/// Rows lacking an id, body or class are skipped; a file with no usable
/// row is an error. An unparsable `priority_score` is logged and read as 0.
pub fn parse_geowords<R: io::Read>(reader: R) -> Result<Vec<GeowordEntry>, DictSourceError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();

    let mut geowords = Vec::new();
    let mut skipped = 0usize;
    let mut bad_scores = 0usize;
    for record in csv.records() {
        let record = record?;
        let mut geo = GeowordEntry::default();
        let mut geolod_id = String::new();
        for (name, value) in headers.iter().zip(record.iter()) {
            if value.is_empty() {
                continue;
            }
            match name.as_str() {
                "geonlp_id" => geo.geonlp_id = value.to_string(),
                "geolod_id" => geolod_id = value.to_string(),
                "entry_id" => geo.entry_id = value.to_string(),
                "body" => geo.body = value.to_string(),
                "body_kana" => geo.body_kana = value.to_string(),
                "prefix" => geo.prefix = split_list(value),
                "suffix" => geo.suffix = split_list(value),
                "prefix_kana" => geo.prefix_kana = split_list(value),
                "suffix_kana" => geo.suffix_kana = split_list(value),
                "hypernym" => geo.hypernym = split_list(value),
                "ne_class" => geo.ne_class = value.to_string(),
                "priority_score" => match value.parse() {
                    Ok(score) => geo.priority_score = score,
                    Err(_) => {
                        warn!(
                            line = record.position().map(|p| p.line()),
                            value, "priority_score is not an integer; using 0"
                        );
                        bad_scores += 1;
                    }
                },
                "latitude" => geo.latitude = value.to_string(),
                "longitude" => geo.longitude = value.to_string(),
                "address" => geo.address = value.to_string(),
                "valid_from" => geo.valid_from = value.to_string(),
                "valid_to" => geo.valid_to = value.to_string(),
                "code" => {
                    for item in value.split('/').filter(|s| !s.is_empty()) {
                        let (k, v) = item.split_once(':').unwrap_or((item, ""));
                        geo.code.insert(k.to_string(), v.to_string());
                    }
                }
                other => {
                    geo.extra.insert(other.to_string(), value.to_string());
                }
            }
        }
        if geo.geonlp_id.is_empty() {
            geo.geonlp_id = geolod_id;
        }

        let has_id = !geo.geonlp_id.is_empty() || !geo.entry_id.is_empty();
        if has_id && !geo.body.is_empty() && !geo.ne_class.is_empty() {
            geowords.push(geo);
        } else {
            skipped += 1;
        }
    }

    debug!(rows = geowords.len(), skipped, bad_scores, "parsed geoword CSV");
    if geowords.is_empty() {
        return Err(DictSourceError::Parse(
            "no geoword stored; check the CSV file format".to_string(),
        ));
    }
    Ok(geowords)
}

fn split_list(value: &str) -> Vec<String> {
    value.split('/').map(str::to_string).collect()
}
