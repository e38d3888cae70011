use crate::classify::{ClassifiedToken, Suffix};
use crate::dict::WordlistEntry;
use crate::token::{
    Token, CONJUGATED_FORM, EMPTY_FIELD, MODIFIER_TAG, ORIGINAL_FORM, PRONUNCIATION, SUBCLASS3,
    YOMI,
};

/// Append-only output of a resolution pass.
///
/// Remembers whether the most recent plain (non-geoword) token was an
/// antileader; emitting a geoword forgets it.
#[derive(Debug, Default)]
pub(crate) struct OutputBuilder {
    tokens: Vec<Token>,
    antileader_pending: bool,
}

impl OutputBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            antileader_pending: false,
        }
    }

    pub fn push_plain(&mut self, token: &ClassifiedToken) {
        self.tokens.push(token.token.clone());
        self.antileader_pending = token.roles.antileader;
    }

    pub fn push_geoword(&mut self, token: Token) {
        self.tokens.push(token);
        self.antileader_pending = false;
    }

    pub fn follows_antileader(&self) -> bool {
        self.antileader_pending
    }

    /// A modifier cannot precede a geoword; drop the tag from the last node.
    pub fn clear_trailing_modifier(&mut self) {
        if let Some(last) = self.tokens.last_mut() {
            if last.conjugated_form() == MODIFIER_TAG {
                last.set_field(CONJUGATED_FORM, EMPTY_FIELD);
            }
        }
    }

    pub fn finish(self) -> Vec<Token> {
        self.tokens
    }
}

/// Geoword node: `名詞,固有名詞,地名語,<ids>,<tag>,*,<surface>,<reading>,<reading>`.
///
/// `surface` is the input text covered by the node; the original-form field
/// carries the canonical surface from the wordlist.
pub(crate) fn geoword_token(surface: &str, ids: &str, tag: &str, entry: &WordlistEntry) -> Token {
    let reading = if entry.reading.is_empty() {
        EMPTY_FIELD
    } else {
        entry.reading.as_str()
    };
    let mut token = Token::new(surface, "名詞,固有名詞,地名語");
    token.set_field(SUBCLASS3, ids);
    token.set_field(CONJUGATED_FORM, tag);
    token.set_field(ORIGINAL_FORM, entry.surface.as_str());
    token.set_field(YOMI, reading);
    token.set_field(PRONUNCIATION, reading);
    token
}

/// Suffix node split off the end of a geoword.
pub(crate) fn suffix_token(suffix: &Suffix) -> Token {
    let mut token = Token::new(suffix.surface.as_str(), "名詞,接尾,地名語");
    token.set_field(ORIGINAL_FORM, suffix.surface.as_str());
    token.set_field(YOMI, suffix.reading.as_str());
    token.set_field(PRONUNCIATION, suffix.pronunciation.as_str());
    token
}
