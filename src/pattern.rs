//! Query preparation.
//!
//! The matching algorithms expect a pattern that is already lowercased for
//! case-insensitive matching and already folded for normalized matching.
//! [`Pattern`] does that once per query.

use unicode_normalization::UnicodeNormalization;

use crate::CaseMatching;
use crate::fuzzy_matcher::MatchParams;
use crate::normalize::{is_normalized, normalize_runes};

/// A query ready to be handed to the algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    runes: Vec<char>,
    case_sensitive: bool,
    normalize: bool,
}

impl Pattern {
    /// Prepares `query`.
    ///
    /// With [`CaseMatching::Smart`], the match is case-sensitive iff the query
    /// contains an uppercase character. Normalization is only kept when the
    /// query itself has no decorated letter: typing `é` asks for `é`.
    pub fn new(query: &str, case: CaseMatching, normalize: bool) -> Self {
        let composed: String = query.nfc().collect();
        let lower = composed.to_lowercase();
        let case_sensitive = match case {
            CaseMatching::Respect => true,
            CaseMatching::Ignore => false,
            CaseMatching::Smart => lower != composed,
        };
        let lower: Vec<char> = lower.chars().collect();
        let normalize = normalize && is_normalized(&lower);

        let runes = if case_sensitive { composed.chars().collect() } else { lower };
        let runes = if normalize { normalize_runes(&runes) } else { runes };
        trace!("pattern {query:?}: case_sensitive={case_sensitive}, normalize={normalize}");
        Self {
            runes,
            case_sensitive,
            normalize,
        }
    }

    /// The prepared characters.
    pub fn runes(&self) -> &[char] {
        &self.runes
    }

    /// Whether the match has to respect case.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether the text has to be folded to bare Latin letters.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Whether the query is empty.
    pub fn is_empty(&self) -> bool {
        self.runes.is_empty()
    }

    /// Per-call parameters for this pattern.
    pub fn params(&self, forward: bool, with_pos: bool, debug: bool) -> MatchParams {
        MatchParams {
            case_sensitive: self.case_sensitive,
            normalize: self.normalize,
            forward,
            with_pos,
            debug,
        }
    }
}
