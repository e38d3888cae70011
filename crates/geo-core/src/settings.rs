//! Resolver settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - `parse_settings_toml` builds an independent `Settings` for a single resolver
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

use crate::resolver::ClassPattern;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub resolver: ResolverSettings,
    pub rules: RuleSettings,
    pub profile: ProfileSettings,
    #[serde(default)]
    pub filter: FilterSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverSettings {
    /// Upper bound in bytes for a candidate span's concatenated surface.
    pub max_geoword_len: usize,
    /// Number of geoword entries kept before the cache is flushed.
    pub geoword_cache_size: usize,
}

/// Feature-prefix tables driving token classification.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSettings {
    pub heads: Vec<String>,
    pub bodies: Vec<String>,
    #[serde(default)]
    pub ext_single: Vec<String>,
    pub alternatives: Vec<String>,
    pub stoppers: Vec<String>,
    pub antileaders: Vec<String>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub sahen_symbols: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSettings {
    #[serde(default)]
    pub suffixes: Vec<SuffixSetting>,
    #[serde(default)]
    pub spatials: Vec<String>,
    #[serde(default)]
    pub non_geowords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuffixSetting {
    pub surface: String,
    pub reading: String,
    pub pronunciation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    #[serde(default)]
    pub dictionaries: Vec<u32>,
    #[serde(default)]
    pub exclude_dictionaries: Vec<u32>,
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            dictionaries: Vec::new(),
            exclude_dictionaries: Vec::new(),
            classes: default_classes(),
        }
    }
}

fn default_classes() -> Vec<String> {
    vec![".*".to_string()]
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    // An empty pattern would match every token (or every surface).
    macro_rules! check_no_empty_entries {
        ($section:ident . $field:ident) => {
            if s.$section.$field.iter().any(|p| p.is_empty()) {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "entries must not be empty".to_string(),
                });
            }
        };
    }

    check_positive_usize!(resolver.max_geoword_len);
    check_positive_usize!(resolver.geoword_cache_size);

    check_no_empty_entries!(rules.heads);
    check_no_empty_entries!(rules.bodies);
    check_no_empty_entries!(rules.ext_single);
    check_no_empty_entries!(rules.alternatives);
    check_no_empty_entries!(rules.stoppers);
    check_no_empty_entries!(rules.antileaders);
    check_no_empty_entries!(rules.prefixes);
    check_no_empty_entries!(rules.sahen_symbols);
    check_no_empty_entries!(profile.spatials);
    check_no_empty_entries!(profile.non_geowords);

    if s.profile.suffixes.iter().any(|x| x.surface.is_empty()) {
        return Err(SettingsError::InvalidValue {
            field: "profile.suffixes".to_string(),
            reason: "suffix surface must not be empty".to_string(),
        });
    }

    for pattern in &s.filter.classes {
        ClassPattern::parse(pattern).map_err(|e| SettingsError::InvalidValue {
            field: "filter.classes".to_string(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}
