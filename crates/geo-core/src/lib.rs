//! Place-name (geoword) recognition over morphologically analysed Japanese
//! text.
//!
//! Tokens from an external tokenizer are classified by part of speech, then
//! `GeowordResolver` finds the longest spans that spell an entry of an active
//! dictionary and replaces them with geoword nodes.

pub mod analyzer;
pub mod classify;
pub mod dict;
pub mod resolver;
pub mod settings;
pub mod token;

pub use analyzer::{Analyzer, AnalyzerError, TokenizeError, Tokenizer};
pub use resolver::{GeowordResolver, ResolveError};
pub use token::Token;
