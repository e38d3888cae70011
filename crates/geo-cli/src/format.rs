//! Rendering resolved token streams.

use clap::ValueEnum;
use geo_core::token::{CONJUGATION_TYPE, EMPTY_FIELD};
use geo_core::Token;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `surface\tfeature` per token, `EOS` after each sentence
    #[default]
    Mecab,
    /// ChaSen columns: surface, reading, base form, POS, conjugation
    Chasen,
    /// One JSON array per sentence
    Json,
}

#[derive(Serialize)]
struct JsonGeoword<'a> {
    geonlp_id: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct JsonNode<'a> {
    surface: &'a str,
    pos: &'a str,
    subclass1: &'a str,
    subclass2: &'a str,
    subclass3: &'a str,
    conjugated_form: &'a str,
    conjugation_type: &'a str,
    original_form: &'a str,
    yomi: &'a str,
    pronunciation: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    geowords: Vec<JsonGeoword<'a>>,
}

/// Render one sentence. Every format ends with a newline.
pub fn format_sentence(tokens: &[Token], format: OutputFormat) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    match format {
        OutputFormat::Mecab => {
            for t in tokens {
                out.push_str(&t.surface);
                out.push('\t');
                out.push_str(&t.feature());
                out.push('\n');
            }
            out.push_str("EOS\n");
        }
        OutputFormat::Chasen => {
            for t in tokens {
                let pos = [t.pos(), t.subclass1(), t.subclass2(), t.subclass3()]
                    .into_iter()
                    .filter(|f| *f != EMPTY_FIELD)
                    .collect::<Vec<_>>()
                    .join("-");
                let columns = [
                    t.surface.as_str(),
                    blank_if_empty(t.yomi()),
                    blank_if_empty(t.original_form()),
                    pos.as_str(),
                    blank_if_empty(t.field(CONJUGATION_TYPE)),
                    blank_if_empty(t.conjugated_form()),
                ];
                out.push_str(&columns.join("\t"));
                out.push('\n');
            }
            out.push_str("EOS\n");
        }
        OutputFormat::Json => {
            let nodes: Vec<JsonNode<'_>> = tokens.iter().map(json_node).collect();
            out.push_str(&serde_json::to_string(&nodes)?);
            out.push('\n');
        }
    }
    Ok(out)
}

fn blank_if_empty(field: &str) -> &str {
    if field == EMPTY_FIELD {
        ""
    } else {
        field
    }
}

fn json_node(t: &Token) -> JsonNode<'_> {
    JsonNode {
        surface: &t.surface,
        pos: t.pos(),
        subclass1: t.subclass1(),
        subclass2: t.subclass2(),
        subclass3: t.subclass3(),
        conjugated_form: t.conjugated_form(),
        conjugation_type: t.field(CONJUGATION_TYPE),
        original_form: t.original_form(),
        yomi: t.yomi(),
        pronunciation: t.pronunciation(),
        geowords: t
            .geoword_ids()
            .into_iter()
            .map(|(geonlp_id, name)| JsonGeoword { geonlp_id, name })
            .collect(),
    }
}
