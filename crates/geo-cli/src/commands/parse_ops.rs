use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use geo_core::dict::{MemoryStore, TrieIndex};
use geo_core::resolver::{FilterError, TemporalFilter, TemporalRelation};
use geo_core::settings::settings;
use geo_core::{GeowordResolver, ResolveError, Token};
use tracing::debug;

use crate::format::{format_sentence, OutputFormat};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct ParseOptions {
    /// Restrict resolution to these dictionary ids (empty: all).
    pub dictionaries: Vec<u32>,
    /// Class patterns replacing the configured ones (empty: keep).
    pub classes: Vec<String>,
    /// Temporal relation name (`exists`, `before`, ...); needs `date_from`.
    pub temporal: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub format: OutputFormat,
}

impl ParseOptions {
    /// The validity-period filter requested by the options, if any.
    pub fn temporal_filter(&self) -> Result<Option<TemporalFilter>, FilterError> {
        let Some(relation) = &self.temporal else {
            return Ok(None);
        };
        let relation: TemporalRelation = relation.parse()?;
        let from = self.date_from.as_deref().unwrap_or_default();
        TemporalFilter::parse(relation, from, self.date_to.as_deref()).map(Some)
    }
}

/// Resolve MeCab output read from stdin and print it in `opts.format`.
pub fn parse(store_path: &Path, index_path: &Path, opts: &ParseOptions) {
    let store = die!(MemoryStore::open(store_path), "Error opening store: {}");
    let index = die!(TrieIndex::open(index_path), "Error opening index: {}");
    let mut resolver = die!(
        GeowordResolver::new(settings(), Arc::new(store), Some(Arc::new(index))),
        "Error: {}"
    );
    if !opts.dictionaries.is_empty() {
        die!(
            resolver.set_active_dictionaries(&opts.dictionaries),
            "Error: {}"
        );
    }
    if !opts.classes.is_empty() {
        die!(resolver.set_active_classes(&opts.classes), "Error: {}");
    }
    resolver.set_temporal_filter(die!(opts.temporal_filter(), "Error: {}"));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let sentences = die!(
        resolve_stream(&resolver, stdin.lock(), stdout.lock(), opts.format),
        "Error: {}"
    );
    debug!(sentences, "parse finished");
}

/// Read MeCab text output, resolve each `EOS`-terminated sentence and write
/// it formatted. A final sentence without `EOS` is still emitted.
///
/// Returns the number of sentences written.
pub fn resolve_stream<R: BufRead, W: Write>(
    resolver: &GeowordResolver,
    input: R,
    mut output: W,
    format: OutputFormat,
) -> Result<usize, ParseError> {
    let mut sentence: Vec<Token> = Vec::new();
    let mut count = 0usize;
    let mut pending = false;
    for line in input.lines() {
        let line = line?;
        if line.trim_end() == "EOS" {
            emit(resolver, &mut sentence, &mut output, format)?;
            count += 1;
            pending = false;
            continue;
        }
        if let Some(token) = Token::from_mecab_line(&line) {
            sentence.push(token);
            pending = true;
        }
    }
    if pending {
        emit(resolver, &mut sentence, &mut output, format)?;
        count += 1;
    }
    output.flush()?;
    Ok(count)
}

fn emit<W: Write>(
    resolver: &GeowordResolver,
    sentence: &mut Vec<Token>,
    output: &mut W,
    format: OutputFormat,
) -> Result<(), ParseError> {
    let resolved = resolver.resolve(sentence)?;
    sentence.clear();
    output.write_all(format_sentence(&resolved, format)?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_core::dict::{DictionaryMeta, GeowordEntry};
    use geo_core::settings::{parse_settings_toml, DEFAULT_SETTINGS_TOML};

    fn resolver() -> GeowordResolver {
        let store = MemoryStore::new();
        let meta = DictionaryMeta {
            identifier: "geonlp:tokyo".to_string(),
            name: "Tokyo".to_string(),
            ..DictionaryMeta::default()
        };
        let geo = GeowordEntry {
            geonlp_id: "chiyoda".to_string(),
            entry_id: "1".to_string(),
            body: "千代田".to_string(),
            body_kana: "ちよだ".to_string(),
            suffix: vec!["区".to_string(), String::new()],
            ne_class: "市区町村".to_string(),
            ..GeowordEntry::default()
        };
        store.add_dictionary(meta, vec![geo]).unwrap();
        let store = Arc::new(store);
        let index = Arc::new(store.rebuild_index().unwrap());
        let settings = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        GeowordResolver::new(&settings, store, Some(index)).unwrap()
    }

    const INPUT: &str = "\
千代田\t名詞,固有名詞,地域,一般,*,*,千代田,チヨダ,チヨダ
区\t名詞,接尾,地域,*,*,*,区,ク,ク
へ\t助詞,格助詞,一般,*,*,*,へ,ヘ,エ
EOS
今日\t名詞,副詞可能,*,*,*,*,今日,キョウ,キョー
EOS
";

    #[test]
    fn test_resolve_stream_mecab() {
        let mut out = Vec::new();
        let n = resolve_stream(&resolver(), INPUT.as_bytes(), &mut out, OutputFormat::Mecab)
            .unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("千代田区\t名詞,固有名詞,地名語,chiyoda:千代田区,"));
        assert!(lines[1].starts_with("へ\t助詞"));
        assert_eq!(lines[2], "EOS");
        assert!(lines[3].starts_with("今日\t"));
        assert_eq!(lines[4], "EOS");
    }

    #[test]
    fn test_resolve_stream_without_final_eos() {
        let input = "千代田\t名詞,固有名詞,地域,一般,*,*\n";
        let mut out = Vec::new();
        let n = resolve_stream(&resolver(), input.as_bytes(), &mut out, OutputFormat::Json)
            .unwrap();
        assert_eq!(n, 1);
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["geowords"][0]["geonlp_id"], "chiyoda");
    }

    #[test]
    fn test_temporal_options() {
        assert!(ParseOptions::default().temporal_filter().unwrap().is_none());

        let opts = ParseOptions {
            temporal: Some("after".to_string()),
            date_from: Some("2001-01-22".to_string()),
            ..ParseOptions::default()
        };
        let filter = opts.temporal_filter().unwrap().unwrap();
        assert_eq!(filter.relation(), TemporalRelation::After);

        let missing_date = ParseOptions {
            temporal: Some("exists".to_string()),
            ..ParseOptions::default()
        };
        assert!(matches!(
            missing_date.temporal_filter(),
            Err(FilterError::InvalidDate(_))
        ));

        let unknown = ParseOptions {
            temporal: Some("during".to_string()),
            date_from: Some("2001-01-01".to_string()),
            ..ParseOptions::default()
        };
        assert!(matches!(
            unknown.temporal_filter(),
            Err(FilterError::InvalidRelation(_))
        ));
    }

    #[test]
    fn test_resolve_stream_temporal_filter() {
        let mut r = resolver();
        let opts = ParseOptions {
            temporal: Some("exists".to_string()),
            date_from: Some("1990-01-01".to_string()),
            ..ParseOptions::default()
        };
        r.set_temporal_filter(opts.temporal_filter().unwrap());
        // The fixture geoword has no validity dates, so it always exists.
        let mut out = Vec::new();
        resolve_stream(&r, INPUT.as_bytes(), &mut out, OutputFormat::Mecab).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("千代田区\t"));
    }

    #[test]
    fn test_resolve_stream_empty_input() {
        let mut out = Vec::new();
        let n = resolve_stream(&resolver(), "".as_bytes(), &mut out, OutputFormat::Mecab).unwrap();
        assert_eq!(n, 0);
        assert!(out.is_empty());
    }
}
