//! Longest active match for a candidate span.

use tracing::{debug, warn};

use super::output::{geoword_token, suffix_token};
use super::span::{join_surface, Span};
use super::{GeowordResolver, ResolveError};
use crate::classify::ClassifiedToken;
use crate::dict::{PrefixMatch, TrieIndex};
use crate::token::{Token, EMPTY_FIELD, MODIFIER_TAG};

/// A resolved span.
pub(crate) struct Found {
    pub node: Token,
    /// Suffix node stripped off the last token; it goes back into the
    /// stream in place of `end`.
    pub fragment: Option<Token>,
    /// Last token consumed.
    pub end: usize,
}

impl GeowordResolver {
    /// Shrink `span` from the right until its surface equals the longest
    /// active trie match, or give up.
    pub(crate) fn longest_geoword(
        &self,
        index: &TrieIndex,
        stream: &[ClassifiedToken],
        span: Span,
    ) -> Result<Option<Found>, ResolveError> {
        let start = span.start;
        let mut end = span.end;
        let key = join_surface(stream, start, end);
        let Some(mut best) = self.longest_active(index, &key)? else {
            debug!(key = key.as_str(), "no active match");
            return Ok(None);
        };

        loop {
            let mut surface = join_surface(stream, start, end);
            while surface.len() > best.len {
                if end == start {
                    return Ok(None);
                }
                end -= 1;
                surface = join_surface(stream, start, end);
                if surface.len() < best.len {
                    // Overshot a token that ends with a suffix: step back
                    // onto it and try stripping the suffix instead.
                    if stream[end + 1].suffix.is_some() {
                        end += 1;
                        surface = join_surface(stream, start, end);
                        break;
                    }
                    match self.longest_active(index, &surface)? {
                        Some(m) => best = m,
                        None => return Ok(None),
                    }
                }
            }

            if end == start && !stream[start].roles.single {
                return Ok(None);
            }

            if surface.len() == best.len {
                let tag = if end == start {
                    self.single_token_tag(&stream[start], stream.get(start + 1))
                } else {
                    EMPTY_FIELD.to_string()
                };
                return Ok(self
                    .geoword_node(best.id, &surface, &tag)?
                    .map(|node| Found {
                        node,
                        fragment: None,
                        end,
                    }));
            }

            if end == start {
                return Ok(None);
            }

            if let Some(suffix) = &stream[end].suffix {
                if let Some(stem) = surface.strip_suffix(suffix.surface.as_str()) {
                    if stem.len() == best.len {
                        return Ok(self.geoword_node(best.id, stem, EMPTY_FIELD)?.map(|node| {
                            Found {
                                node,
                                fragment: Some(suffix_token(suffix)),
                                end,
                            }
                        }));
                    }
                }
            }

            end -= 1;
            let shorter = join_surface(stream, start, end);
            match self.longest_active(index, &shorter)? {
                Some(m) => best = m,
                None => return Ok(None),
            }
        }
    }

    /// Longest trie match of `key` that names at least one active geoword.
    fn longest_active(
        &self,
        index: &TrieIndex,
        key: &str,
    ) -> Result<Option<PrefixMatch>, ResolveError> {
        let mut best: Option<PrefixMatch> = None;
        for m in index.longest_prefix_matches(key) {
            if best.is_some_and(|b| b.len >= m.len) {
                continue;
            }
            let Some(matched) = key.get(..m.len) else {
                continue;
            };
            if self.has_active_candidate(m.id, matched)? {
                best = Some(m);
            }
        }
        Ok(best)
    }

    /// Whether wordlist `id` lists an active geoword spelled `surface`.
    ///
    /// Matches through a reading key alone do not count.
    fn has_active_candidate(&self, id: u32, surface: &str) -> Result<bool, ResolveError> {
        let Some(entry) = self.wordlists.resolve(id)? else {
            warn!(id, "index refers to a missing wordlist entry");
            return Ok(false);
        };
        Ok(self
            .wordlists
            .expand_candidates(&entry)?
            .iter()
            .any(|g| self.filter.accepts(g) && g.parts_for_surface(surface).is_some()))
    }

    /// Build the geoword node, listing only active candidates spelled
    /// `surface`. `None` if none remain.
    fn geoword_node(
        &self,
        id: u32,
        surface: &str,
        tag: &str,
    ) -> Result<Option<Token>, ResolveError> {
        let Some(entry) = self.wordlists.resolve(id)? else {
            warn!(id, "index refers to a missing wordlist entry");
            return Ok(None);
        };
        let ids: Vec<String> = self
            .wordlists
            .expand_candidates(&entry)?
            .iter()
            .filter(|g| self.filter.accepts(g) && g.parts_for_surface(surface).is_some())
            .map(|g| format!("{}:{}", g.geonlp_id, g.typical_name()))
            .collect();
        if ids.is_empty() {
            return Ok(None);
        }
        Ok(Some(geoword_token(surface, &ids.join("/"), tag, &entry)))
    }

    /// Conjugated-form tag for a geoword made of a single token.
    ///
    /// A personal-name reading is kept as is; any other alternative reading
    /// followed by a stopper marks the geoword as a modifier.
    fn single_token_tag(&self, token: &ClassifiedToken, next: Option<&ClassifiedToken>) -> String {
        if !token.roles.alternative {
            return EMPTY_FIELD.to_string();
        }
        let Some(alternative) = self.rules.alternative_tag(&token.token) else {
            return EMPTY_FIELD.to_string();
        };
        if is_person_name(&alternative) {
            return alternative;
        }
        if precedes_stopper(next) {
            return MODIFIER_TAG.to_string();
        }
        alternative
    }
}

fn is_person_name(tag: &str) -> bool {
    tag.contains("人名")
}

fn precedes_stopper(next: Option<&ClassifiedToken>) -> bool {
    next.is_some_and(|n| n.roles.stop)
}
