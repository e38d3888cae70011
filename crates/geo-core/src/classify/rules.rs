use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::token::{Token, EMPTY_FIELD, POS, SUBCLASS3};

/// A place-name suffix such as 東 or 前 that may be split off a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suffix {
    pub surface: String,
    pub reading: String,
    pub pronunciation: String,
}

/// Rule tables consulted by the classifier.
///
/// Feature tables hold prefixes of the comma-joined feature string. The
/// non-geoword table holds surface prefixes and the spatial table whole
/// surfaces.
#[derive(Debug, Clone, Default)]
pub struct RuleTables {
    pub heads: Vec<String>,
    pub bodies: Vec<String>,
    pub ext_single: Vec<String>,
    pub alternatives: Vec<String>,
    pub stoppers: Vec<String>,
    pub antileaders: Vec<String>,
    pub prefixes: Vec<String>,
    pub sahen_symbols: Vec<String>,
    pub suffixes: Vec<Suffix>,
    pub spatials: Vec<String>,
    pub non_geowords: Vec<String>,
}

impl RuleTables {
    pub fn from_settings(settings: &Settings) -> Self {
        let rules = &settings.rules;
        let profile = &settings.profile;
        Self {
            heads: rules.heads.clone(),
            bodies: rules.bodies.clone(),
            ext_single: rules.ext_single.clone(),
            alternatives: rules.alternatives.clone(),
            stoppers: rules.stoppers.clone(),
            antileaders: rules.antileaders.clone(),
            prefixes: rules.prefixes.clone(),
            sahen_symbols: rules.sahen_symbols.clone(),
            suffixes: profile
                .suffixes
                .iter()
                .map(|s| Suffix {
                    surface: s.surface.clone(),
                    reading: s.reading.clone(),
                    pronunciation: s.pronunciation.clone(),
                })
                .collect(),
            spatials: profile.spatials.clone(),
            non_geowords: profile.non_geowords.clone(),
        }
    }

    /// First suffix the surface ends with, if the surface is longer than it.
    pub fn suffix_of(&self, surface: &str) -> Option<&Suffix> {
        self.suffixes
            .iter()
            .find(|s| surface.len() > s.surface.len() && surface.ends_with(&s.surface))
    }

    pub fn is_spatial(&self, surface: &str) -> bool {
        self.spatials.iter().any(|s| s == surface)
    }

    pub fn is_non_geoword(&self, surface: &str) -> bool {
        starts_with_any(surface, &self.non_geowords)
    }

    /// Alternative grammatical reading of a token, rendered as
    /// `pos-sub1-sub2[-sub3]`.
    ///
    /// Returns `None` when the token matches no Alternatives entry.
    pub fn alternative_tag(&self, token: &Token) -> Option<String> {
        if !starts_with_any(&token.feature(), &self.alternatives) {
            return None;
        }
        let fields = token.fields();
        let mut tag = fields[POS..SUBCLASS3].join("-");
        if !fields[SUBCLASS3].starts_with(EMPTY_FIELD) {
            tag.push('-');
            tag.push_str(&fields[SUBCLASS3]);
        }
        Some(tag)
    }
}

pub(crate) fn starts_with_any(value: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| value.starts_with(p.as_str()))
}
