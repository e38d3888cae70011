//! Geoword span resolution.
//!
//! `GeowordResolver::resolve` rewrites a classified token stream, replacing
//! spans that spell an active dictionary entry with geoword nodes. The scan
//! is index based: a classified copy of the input is walked left to right
//! and an append-only `OutputBuilder` collects the result.

mod cache;
mod filter;
mod matcher;
mod output;
mod span;
mod temporal;
#[cfg(test)]
mod tests;
mod wordlist;

pub use cache::GeowordCache;
pub use filter::{ActiveFilter, ClassPattern, FilterError};
pub use temporal::{parse_date, TemporalFilter, TemporalRelation};
pub use wordlist::WordlistResolver;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::classify::{classify_all, ClassifiedToken, RuleTables};
use crate::dict::{DictionaryMeta, GeoStore, GeowordEntry, StoreError, TrieIndex};
use crate::settings::Settings;
use crate::token::Token;
use output::OutputBuilder;
use span::find_candidate;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No trie index has been built or opened; nothing is searchable.
    #[error("the word index does not exist")]
    IndexUnavailable,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

pub struct GeowordResolver {
    rules: Arc<RuleTables>,
    index: Option<Arc<TrieIndex>>,
    wordlists: WordlistResolver,
    filter: ActiveFilter,
    max_geoword_len: usize,
}

impl GeowordResolver {
    /// Build a resolver over `store`. Without an index, `resolve` fails
    /// with `IndexUnavailable` until one is installed.
    pub fn new(
        settings: &Settings,
        store: Arc<dyn GeoStore>,
        index: Option<Arc<TrieIndex>>,
    ) -> Result<Self, ResolveError> {
        let all_dictionaries: Vec<u32> = store.dictionaries()?.into_keys().collect();
        let filter = ActiveFilter::from_settings(&settings.filter, all_dictionaries)?;
        let cache = Arc::new(GeowordCache::new(settings.resolver.geoword_cache_size));
        Ok(Self {
            rules: Arc::new(RuleTables::from_settings(settings)),
            index,
            wordlists: WordlistResolver::new(store, cache),
            filter,
            max_geoword_len: settings.resolver.max_geoword_len,
        })
    }

    /// Share a geoword cache with other resolvers over the same store.
    pub fn with_cache(mut self, cache: Arc<GeowordCache>) -> Self {
        self.wordlists = self.wordlists.with_cache(cache);
        self
    }

    pub fn set_index(&mut self, index: Option<Arc<TrieIndex>>) {
        self.index = index;
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    pub fn filter(&self) -> &ActiveFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut ActiveFilter {
        &mut self.filter
    }

    pub fn wordlists(&self) -> &WordlistResolver {
        &self.wordlists
    }

    /// Rewrite a sentence, replacing geoword spans with geoword nodes.
    ///
    /// Every input byte ends up in exactly one output token, in order.
    pub fn resolve(&self, tokens: &[Token]) -> Result<Vec<Token>, ResolveError> {
        let index = self.index.as_deref().ok_or(ResolveError::IndexUnavailable)?;
        let _span = debug_span!("resolve", tokens = tokens.len()).entered();

        let mut stream = classify_all(tokens, &self.rules);
        let mut out = OutputBuilder::with_capacity(stream.len());
        let mut cursor = 0;
        while cursor < stream.len() {
            let Some(span) = find_candidate(&stream, cursor, self.max_geoword_len) else {
                for token in &stream[cursor..] {
                    out.push_plain(token);
                }
                break;
            };
            for token in &stream[cursor..span.start] {
                out.push_plain(token);
            }

            if out.follows_antileader() {
                debug!(surface = stream[span.start].surface(), "head follows an antileader");
                out.push_plain(&stream[span.start]);
                cursor = span.start + 1;
                continue;
            }

            match self.longest_geoword(index, &stream, span)? {
                Some(found) => {
                    debug!(surface = found.node.surface.as_str(), "geoword");
                    cursor = found.end + 1;
                    if let Some(fragment) = found.fragment {
                        stream[found.end] = ClassifiedToken::split_fragment(fragment);
                        cursor = found.end;
                    }
                    out.clear_trailing_modifier();
                    out.push_geoword(found.node);
                }
                None => {
                    out.push_plain(&stream[span.start]);
                    cursor = span.start + 1;
                }
            }
        }
        Ok(out.finish())
    }

    /// Geowords named by a resolved token's id list.
    pub fn geoword_entries(&self, token: &Token) -> Result<Vec<Arc<GeowordEntry>>, ResolveError> {
        let mut out = Vec::new();
        for (id, _) in token.geoword_ids() {
            if let Some(geo) = self.wordlists.geoword(id)? {
                out.push(geo);
            }
        }
        Ok(out)
    }

    pub fn geoword(&self, geonlp_id: &str) -> Result<Option<Arc<GeowordEntry>>, ResolveError> {
        Ok(self.wordlists.geoword(geonlp_id)?)
    }

    /// Active geowords whose surface or reading equals `key` exactly.
    pub fn lookup(&self, key: &str) -> Result<Vec<Arc<GeowordEntry>>, ResolveError> {
        let Some(entry) = self.wordlists.resolve_key(key)? else {
            return Ok(Vec::new());
        };
        let mut geowords = self.wordlists.expand_candidates(&entry)?;
        geowords.retain(|g| self.filter.accepts(g));
        Ok(geowords)
    }

    /// Active dictionaries; an empty filter means all of them.
    pub fn active_dictionaries(&self) -> Result<BTreeMap<u32, DictionaryMeta>, ResolveError> {
        let mut all = self.wordlists.store().dictionaries()?;
        let active = self.filter.active_dictionaries();
        if !active.is_empty() {
            all.retain(|id, _| active.contains(id));
        }
        Ok(all)
    }

    /// Replace the active dictionaries. Ids unknown to the store are ignored.
    pub fn set_active_dictionaries(&mut self, ids: &[u32]) -> Result<(), ResolveError> {
        let known = self.known_dictionaries(ids)?;
        self.filter.set_dictionaries(known);
        Ok(())
    }

    pub fn add_active_dictionaries(&mut self, ids: &[u32]) -> Result<(), ResolveError> {
        let known = self.known_dictionaries(ids)?;
        self.filter.add_dictionaries(known);
        Ok(())
    }

    /// Remove dictionaries from the active set, materializing "all" first.
    pub fn remove_active_dictionaries(&mut self, ids: &[u32]) -> Result<(), ResolveError> {
        if self.filter.active_dictionaries().is_empty() {
            let all: Vec<u32> = self.wordlists.store().dictionaries()?.into_keys().collect();
            self.filter.set_dictionaries(all);
        }
        self.filter.remove_dictionaries(ids.iter().copied());
        Ok(())
    }

    pub fn reset_active_dictionaries(&mut self) {
        self.filter.reset_dictionaries();
    }

    pub fn set_active_classes(&mut self, patterns: &[String]) -> Result<(), ResolveError> {
        Ok(self.filter.set_classes(patterns)?)
    }

    pub fn add_active_classes(&mut self, patterns: &[String]) -> Result<(), ResolveError> {
        Ok(self.filter.add_classes(patterns)?)
    }

    pub fn remove_active_classes(&mut self, patterns: &[String]) {
        self.filter.remove_classes(patterns);
    }

    pub fn reset_active_classes(&mut self) {
        self.filter.reset_classes();
    }

    /// Keep only geowords whose validity period satisfies `temporal`;
    /// `None` stops filtering by date.
    pub fn set_temporal_filter(&mut self, temporal: Option<TemporalFilter>) {
        self.filter.set_temporal(temporal);
    }

    pub fn temporal_filter(&self) -> Option<&TemporalFilter> {
        self.filter.temporal()
    }

    fn known_dictionaries(&self, ids: &[u32]) -> Result<Vec<u32>, ResolveError> {
        let dictionaries = self.wordlists.store().dictionaries()?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| dictionaries.contains_key(id))
            .collect())
    }
}
