//! Sentence-level entry point: tokenize, then resolve geowords.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug_span, info};

use crate::dict::{DictError, MemoryStore, StoreError, TrieIndex};
use crate::resolver::{GeowordResolver, ResolveError};
use crate::settings::Settings;
use crate::token::{escape_newlines, restore_newlines, Token};

#[derive(Debug, thiserror::Error)]
#[error("tokenizer failed: {0}")]
pub struct TokenizeError(pub String);

/// Morphological analyser producing MeCab-style tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Result<Vec<Token>, TokenizeError> + Send + Sync,
{
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        self(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Dict(#[from] DictError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Analyzer<T> {
    tokenizer: T,
    resolver: GeowordResolver,
}

impl<T: Tokenizer> Analyzer<T> {
    pub fn new(tokenizer: T, resolver: GeowordResolver) -> Self {
        Self {
            tokenizer,
            resolver,
        }
    }

    /// Open a store snapshot and its index.
    ///
    /// A missing index file is not an error here: `parse` reports
    /// `IndexUnavailable` while lookups still read the wordlist table saved
    /// with the store at its last rebuild. A corrupt index file is an error.
    pub fn open(
        tokenizer: T,
        settings: &Settings,
        store_path: &Path,
        index_path: &Path,
    ) -> Result<Self, AnalyzerError> {
        let store = Arc::new(MemoryStore::open(store_path)?);
        let index = match TrieIndex::open(index_path) {
            Ok(index) => Some(Arc::new(index)),
            Err(DictError::IndexNotFound(path)) => {
                info!(path = %path.display(), "no word index yet");
                None
            }
            Err(e) => return Err(e.into()),
        };
        let resolver = GeowordResolver::new(settings, store, index)?;
        Ok(Self::new(tokenizer, resolver))
    }

    pub fn resolver(&self) -> &GeowordResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut GeowordResolver {
        &mut self.resolver
    }

    /// Tokenize `text` and rewrite geoword spans.
    pub fn parse(&self, text: &str) -> Result<Vec<Token>, AnalyzerError> {
        let _span = debug_span!("parse", bytes = text.len()).entered();
        let tokens = self.tokenizer.tokenize(&escape_newlines(text))?;
        let tokens = restore_newlines(tokens);
        Ok(self.resolver.resolve(&tokens)?)
    }
}
