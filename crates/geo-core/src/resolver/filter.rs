use std::collections::BTreeSet;

use regex::Regex;

use super::temporal::TemporalFilter;
use crate::dict::GeowordEntry;
use crate::settings::FilterSettings;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid class pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("unknown temporal relation {0:?}")]
    InvalidRelation(String),
}

/// A named-entity class pattern. A leading `-` marks an exclusion.
#[derive(Debug, Clone)]
pub struct ClassPattern {
    source: String,
    regex: Regex,
    exclude: bool,
}

impl ClassPattern {
    /// Compile a pattern; the regex must match the whole class string.
    pub fn parse(pattern: &str) -> Result<Self, FilterError> {
        let (exclude, body) = match pattern.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let regex = Regex::new(&format!("^(?:{body})$")).map_err(|source| {
            FilterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            exclude,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_exclusion(&self) -> bool {
        self.exclude
    }

    pub fn is_match(&self, ne_class: &str) -> bool {
        self.regex.is_match(ne_class)
    }
}

impl PartialEq for ClassPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Active dictionaries, named-entity classes and validity period.
///
/// An empty dictionary set means every dictionary is active. Class
/// patterns are evaluated in order: an exclusion match rejects at once,
/// and when inclusion patterns exist at least one must match. Without a
/// temporal filter the validity dates are ignored.
#[derive(Debug, Clone)]
pub struct ActiveFilter {
    dictionaries: BTreeSet<u32>,
    classes: Vec<ClassPattern>,
    temporal: Option<TemporalFilter>,
    default_dictionaries: BTreeSet<u32>,
    default_classes: Vec<ClassPattern>,
}

impl ActiveFilter {
    pub fn new(
        dictionaries: impl IntoIterator<Item = u32>,
        classes: &[String],
    ) -> Result<Self, FilterError> {
        let dictionaries: BTreeSet<u32> = dictionaries.into_iter().collect();
        let classes = compile(classes)?;
        Ok(Self {
            default_dictionaries: dictionaries.clone(),
            default_classes: classes.clone(),
            dictionaries,
            classes,
            temporal: None,
        })
    }

    /// Filter with no restriction at all.
    pub fn accept_all() -> Self {
        Self {
            dictionaries: BTreeSet::new(),
            classes: Vec::new(),
            temporal: None,
            default_dictionaries: BTreeSet::new(),
            default_classes: Vec::new(),
        }
    }

    /// Build the configured default state.
    ///
    /// `all_dictionaries` is needed only when the settings exclude
    /// dictionaries without naming an include list.
    pub fn from_settings(
        settings: &FilterSettings,
        all_dictionaries: impl IntoIterator<Item = u32>,
    ) -> Result<Self, FilterError> {
        let exclude: BTreeSet<u32> = settings.exclude_dictionaries.iter().copied().collect();
        let dictionaries: BTreeSet<u32> = if exclude.is_empty() {
            settings.dictionaries.iter().copied().collect()
        } else if settings.dictionaries.is_empty() {
            all_dictionaries
                .into_iter()
                .filter(|id| !exclude.contains(id))
                .collect()
        } else {
            settings
                .dictionaries
                .iter()
                .copied()
                .filter(|id| !exclude.contains(id))
                .collect()
        };
        Self::new(dictionaries, &settings.classes)
    }

    pub fn accepts(&self, entry: &GeowordEntry) -> bool {
        self.accepts_dictionary(entry.dictionary_id)
            && self.accepts_class(&entry.ne_class)
            && self.temporal.as_ref().map_or(true, |t| t.accepts(entry))
    }

    pub fn accepts_dictionary(&self, id: u32) -> bool {
        self.dictionaries.is_empty() || self.dictionaries.contains(&id)
    }

    pub fn accepts_class(&self, ne_class: &str) -> bool {
        let mut has_inclusion = false;
        let mut included = false;
        for pattern in &self.classes {
            if pattern.exclude {
                if pattern.is_match(ne_class) {
                    return false;
                }
            } else {
                has_inclusion = true;
                if !included && pattern.is_match(ne_class) {
                    included = true;
                }
            }
        }
        included || !has_inclusion
    }

    pub fn active_dictionaries(&self) -> &BTreeSet<u32> {
        &self.dictionaries
    }

    pub fn active_classes(&self) -> Vec<&str> {
        self.classes.iter().map(ClassPattern::as_str).collect()
    }

    pub fn set_dictionaries(&mut self, ids: impl IntoIterator<Item = u32>) {
        self.dictionaries = ids.into_iter().collect();
    }

    pub fn add_dictionaries(&mut self, ids: impl IntoIterator<Item = u32>) {
        self.dictionaries.extend(ids);
    }

    pub fn remove_dictionaries(&mut self, ids: impl IntoIterator<Item = u32>) {
        for id in ids {
            self.dictionaries.remove(&id);
        }
    }

    pub fn reset_dictionaries(&mut self) {
        self.dictionaries = self.default_dictionaries.clone();
    }

    pub fn set_classes(&mut self, patterns: &[String]) -> Result<(), FilterError> {
        self.classes = compile(patterns)?;
        Ok(())
    }

    /// Append patterns not already present.
    pub fn add_classes(&mut self, patterns: &[String]) -> Result<(), FilterError> {
        for pattern in compile(patterns)? {
            if !self.classes.contains(&pattern) {
                self.classes.push(pattern);
            }
        }
        Ok(())
    }

    pub fn remove_classes(&mut self, patterns: &[String]) {
        self.classes
            .retain(|c| !patterns.iter().any(|p| p == c.as_str()));
    }

    pub fn reset_classes(&mut self) {
        self.classes = self.default_classes.clone();
    }

    pub fn temporal(&self) -> Option<&TemporalFilter> {
        self.temporal.as_ref()
    }

    /// Install or clear (`None`) the validity-period filter.
    pub fn set_temporal(&mut self, temporal: Option<TemporalFilter>) {
        self.temporal = temporal;
    }
}

fn compile(patterns: &[String]) -> Result<Vec<ClassPattern>, FilterError> {
    patterns.iter().map(|p| ClassPattern::parse(p)).collect()
}
