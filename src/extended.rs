//! Extended search syntax.
//!
//! A query is split on spaces into terms that must all match; `\ ` keeps a
//! literal space. A lone `|` between two terms makes them alternatives. Each
//! term can be decorated:
//!
//! | Token    | Match                                   |
//! |----------|-----------------------------------------|
//! | `foo`    | fuzzy (exact when fuzzy matching is off) |
//! | `'foo`   | exact (fuzzy when fuzzy matching is off) |
//! | `^foo`   | prefix                                  |
//! | `foo$`   | suffix                                  |
//! | `^foo$`  | whole line                              |
//! | `!foo`   | lines without `foo`, exact              |
//!
//! Smart case and normalization are resolved per term.

use std::fmt::{Display, Error, Formatter};

use crate::CaseMatching;
use crate::fuzzy_matcher::Algorithm;
use crate::pattern::Pattern;

/// How a single term is matched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TermType {
    /// Fuzzy, with the matcher's fuzzy algorithm
    Fuzzy,
    /// Literal substring
    Exact,
    /// Literal at the start of the trimmed line
    Prefix,
    /// Literal at the end of the trimmed line
    Suffix,
    /// The whole trimmed line
    Equal,
}

impl TermType {
    /// The algorithm matching this kind of term, `fuzzy` being the one used
    /// for [`TermType::Fuzzy`].
    pub fn algorithm(self, fuzzy: Algorithm) -> Algorithm {
        match self {
            TermType::Fuzzy => fuzzy,
            TermType::Exact => Algorithm::Exact,
            TermType::Prefix => Algorithm::Prefix,
            TermType::Suffix => Algorithm::Suffix,
            TermType::Equal => Algorithm::Equal,
        }
    }
}

/// One term of an extended query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    kind: TermType,
    inverse: bool,
    pattern: Pattern,
}

impl Term {
    /// How the term is matched.
    pub fn kind(&self) -> TermType {
        self.kind
    }

    /// Whether a line matches when the term does *not*.
    pub fn inverse(&self) -> bool {
        self.inverse
    }

    /// The prepared text of the term, without its decorations.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let text: String = self.pattern.runes().iter().collect();
        let inverse = if self.inverse { "!" } else { "" };
        write!(f, "({inverse}{:?}: {text})", self.kind)
    }
}

/// A parsed extended query: every set must match, a set matches when any of
/// its terms does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedPattern {
    term_sets: Vec<Vec<Term>>,
}

impl ExtendedPattern {
    /// Parses `query`.
    ///
    /// `fuzzy` selects what an undecorated term means; `'` flips it.
    pub fn new(query: &str, fuzzy: bool, case: CaseMatching, normalize: bool) -> Self {
        let query = trim_query(query).replace("\\ ", "\t");
        let plain = if fuzzy { TermType::Fuzzy } else { TermType::Exact };

        let mut term_sets = Vec::new();
        let mut set: Vec<Term> = Vec::new();
        let mut switch_set = false;
        let mut after_bar = false;
        for token in query.split(' ').filter(|token| !token.is_empty()) {
            let token = token.replace('\t', " ");
            let mut text = token.as_str();

            if !set.is_empty() && !after_bar && text == "|" {
                switch_set = false;
                after_bar = true;
                continue;
            }
            after_bar = false;

            let mut kind = plain;
            let mut inverse = false;
            if let Some(rest) = text.strip_prefix('!') {
                inverse = true;
                kind = TermType::Exact;
                text = rest;
            }
            if text != "$"
                && let Some(rest) = text.strip_suffix('$')
            {
                kind = TermType::Suffix;
                text = rest;
            }
            if let Some(rest) = text.strip_prefix('\'') {
                kind = if fuzzy && !inverse { TermType::Exact } else { TermType::Fuzzy };
                text = rest;
            } else if let Some(rest) = text.strip_prefix('^') {
                kind = if kind == TermType::Suffix {
                    TermType::Equal
                } else {
                    TermType::Prefix
                };
                text = rest;
            }

            if text.is_empty() {
                continue;
            }
            if switch_set {
                term_sets.push(std::mem::take(&mut set));
            }
            set.push(Term {
                kind,
                inverse,
                pattern: Pattern::new(text, case, normalize),
            });
            switch_set = true;
        }
        if !set.is_empty() {
            term_sets.push(set);
        }

        let pattern = Self { term_sets };
        trace!("extended query {query:?}: {pattern}");
        pattern
    }

    /// The sets of alternatives, all of which have to match.
    pub fn term_sets(&self) -> &[Vec<Term>] {
        &self.term_sets
    }

    /// Whether the query has no term, in which case every line matches.
    pub fn is_empty(&self) -> bool {
        self.term_sets.is_empty()
    }
}

impl Display for ExtendedPattern {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let sets = self
            .term_sets
            .iter()
            .map(|set| {
                let terms = set.iter().map(|t| format!("{t}")).collect::<Vec<_>>().join(", ");
                format!("(Or: {terms})")
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "(And: {sets})")
    }
}

/// Trims surrounding whitespace, keeping an escaped trailing space.
fn trim_query(query: &str) -> &str {
    let query = query.trim_start();
    let trimmed = query.trim_end();
    if trimmed.ends_with('\\') && query.len() > trimmed.len() && query[trimmed.len()..].starts_with(' ') {
        &query[..=trimmed.len()]
    } else {
        trimmed
    }
}
