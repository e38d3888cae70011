//! Morpheme tokens as produced by an external tokenizer.
//!
//! A token is a surface string plus the nine MeCab/IPADIC feature fields.
//! Resolution rewrites tokens in place of spans but never changes the type,
//! so any formatter can consume the output.

use serde::{Deserialize, Serialize};

/// Number of feature fields carried by every token.
pub const FIELD_COUNT: usize = 9;

pub const POS: usize = 0;
pub const SUBCLASS1: usize = 1;
pub const SUBCLASS2: usize = 2;
pub const SUBCLASS3: usize = 3;
pub const CONJUGATED_FORM: usize = 4;
pub const CONJUGATION_TYPE: usize = 5;
pub const ORIGINAL_FORM: usize = 6;
pub const YOMI: usize = 7;
pub const PRONUNCIATION: usize = 8;

/// Placeholder for an empty feature field.
pub const EMPTY_FIELD: &str = "*";

/// Subclass2 value marking geoword and geoword-suffix tokens.
pub const GEOWORD_CLASS: &str = "地名語";

/// Conjugated-form tag placed on single-token geowords that modify a following noun.
pub const MODIFIER_TAG: &str = "名詞-固有名詞-地名修飾語";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub surface: String,
    fields: [String; FIELD_COUNT],
}

impl Token {
    /// Build a token from a comma-separated feature string.
    ///
    /// Missing trailing fields are filled with `*`; extra fields are joined
    /// into the last one so no input text is lost.
    pub fn new(surface: impl Into<String>, feature: &str) -> Self {
        let mut fields: [String; FIELD_COUNT] = Default::default();
        let mut parts = feature.splitn(FIELD_COUNT, ',');
        for field in fields.iter_mut() {
            *field = parts.next().unwrap_or(EMPTY_FIELD).to_string();
        }
        Self {
            surface: surface.into(),
            fields,
        }
    }

    /// Parse one line of MeCab text output (`surface\tfeature`).
    ///
    /// Returns `None` for `EOS` and blank lines.
    pub fn from_mecab_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() || line == "EOS" {
            return None;
        }
        match line.split_once('\t') {
            Some((surface, feature)) => Some(Self::new(surface, feature)),
            None => Some(Self::new(line, "")),
        }
    }

    pub fn field(&self, index: usize) -> &str {
        &self.fields[index]
    }

    pub fn set_field(&mut self, index: usize, value: impl Into<String>) {
        self.fields[index] = value.into();
    }

    pub fn fields(&self) -> &[String; FIELD_COUNT] {
        &self.fields
    }

    /// The comma-joined feature string.
    pub fn feature(&self) -> String {
        self.fields.join(",")
    }

    pub fn pos(&self) -> &str {
        &self.fields[POS]
    }

    pub fn subclass1(&self) -> &str {
        &self.fields[SUBCLASS1]
    }

    pub fn subclass2(&self) -> &str {
        &self.fields[SUBCLASS2]
    }

    pub fn subclass3(&self) -> &str {
        &self.fields[SUBCLASS3]
    }

    pub fn conjugated_form(&self) -> &str {
        &self.fields[CONJUGATED_FORM]
    }

    pub fn original_form(&self) -> &str {
        &self.fields[ORIGINAL_FORM]
    }

    pub fn yomi(&self) -> &str {
        &self.fields[YOMI]
    }

    pub fn pronunciation(&self) -> &str {
        &self.fields[PRONUNCIATION]
    }

    /// True for tokens produced by geoword resolution (not suffix fragments).
    pub fn is_geoword(&self) -> bool {
        self.fields[POS] == "名詞"
            && self.fields[SUBCLASS1] == "固有名詞"
            && self.fields[SUBCLASS2] == GEOWORD_CLASS
    }

    /// `(geonlp_id, typical_name)` pairs carried by a geoword token.
    pub fn geoword_ids(&self) -> Vec<(&str, &str)> {
        if !self.is_geoword() {
            return Vec::new();
        }
        parse_id_list(self.subclass3())
    }
}

/// Split a `id:name/id:name` list. Entries without a name keep an empty one.
pub fn parse_id_list(list: &str) -> Vec<(&str, &str)> {
    list.split('/')
        .filter(|item| !item.is_empty() && *item != EMPTY_FIELD)
        .map(|item| item.split_once(':').unwrap_or((item, "")))
        .collect()
}

/// Escape newlines so the tokenizer does not treat them as sentence breaks.
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}

/// Undo `escape_newlines` on the token stream.
///
/// A `\` token followed by a token starting with `n` becomes a single
/// control-code newline token; the `n` is stripped from the follower, which
/// is dropped if nothing remains.
pub fn restore_newlines(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        let escapes_newline = token.surface == "\\"
            && iter.peek().is_some_and(|next| next.surface.starts_with('n'));
        if !escapes_newline {
            out.push(token);
            continue;
        }
        out.push(Token::new("\n", "記号,制御コード,改行,*,*,*"));
        if let Some(mut next) = iter.next() {
            next.surface.remove(0);
            if !next.surface.is_empty() {
                out.push(next);
            }
        }
    }
    out
}
