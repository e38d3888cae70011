//! Token classification.
//!
//! Each token is tagged with the roles it may play inside a geoword span.
//! Roles depend only on the token's features, the rule tables and whether
//! the following token can start a span, so classification is pure.

mod rules;

pub use rules::{RuleTables, Suffix};

use rules::starts_with_any;

use crate::token::Token;

const SAHEN_FEATURE: &str = "名詞,サ変接続";
const SYMBOL_FEATURE: &str = "記号,一般,*,*,*,*,*";

/// Roles a token may play while building a geoword span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Roles {
    pub head: bool,
    pub body: bool,
    pub prefix: bool,
    pub suffix: bool,
    pub antileader: bool,
    pub single: bool,
    pub stop: bool,
    pub alternative: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedToken {
    pub token: Token,
    pub roles: Roles,
    /// Suffix bound when `roles.suffix` is set.
    pub suffix: Option<Suffix>,
}

impl ClassifiedToken {
    /// A suffix fragment split back out of a resolved span.
    ///
    /// It may start a new span but carries no other role.
    pub fn split_fragment(token: Token) -> Self {
        Self {
            token,
            roles: Roles {
                head: true,
                ..Roles::default()
            },
            suffix: None,
        }
    }

    pub fn surface(&self) -> &str {
        &self.token.surface
    }
}

/// Classify one token given whether the next token can be a span head.
pub fn classify(token: &Token, next_is_head: bool, rules: &RuleTables) -> ClassifiedToken {
    let token = repair_symbol(token, rules);
    let feature = token.feature();
    let surface = token.surface.as_str();

    let head = starts_with_any(&feature, &rules.heads);
    let body = starts_with_any(&feature, &rules.bodies);
    let suffix = if body {
        rules.suffix_of(surface).cloned()
    } else {
        None
    };
    let roles = Roles {
        head,
        body,
        prefix: next_is_head && starts_with_any(&feature, &rules.prefixes),
        suffix: suffix.is_some(),
        antileader: starts_with_any(&feature, &rules.antileaders),
        single: head
            && !starts_with_any(&feature, &rules.ext_single)
            && !rules.is_non_geoword(surface),
        stop: starts_with_any(&feature, &rules.stoppers) && !rules.is_spatial(surface),
        alternative: starts_with_any(&feature, &rules.alternatives),
    };
    ClassifiedToken {
        token,
        roles,
        suffix,
    }
}

/// Classify a sentence right to left so each token sees its successor.
pub fn classify_all(tokens: &[Token], rules: &RuleTables) -> Vec<ClassifiedToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut next_is_head = false;
    for token in tokens.iter().rev() {
        let classified = classify(token, next_is_head, rules);
        next_is_head = classified.roles.head;
        out.push(classified);
    }
    out.reverse();
    out
}

/// Symbols the upstream tagger labels as verbal nouns become plain symbols.
fn repair_symbol(token: &Token, rules: &RuleTables) -> Token {
    let misread = token.feature().starts_with(SAHEN_FEATURE)
        && (token.surface.len() == 1 || starts_with_any(&token.surface, &rules.sahen_symbols));
    if misread {
        Token::new(token.surface.clone(), SYMBOL_FEATURE)
    } else {
        token.clone()
    }
}
