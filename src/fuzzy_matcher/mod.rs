//! Matching algorithms and their shared types.
//!
//! Six strategies share one scoring model (see [`score`]):
//!
//! - [`Algorithm::V1`]: greedy fuzzy match, `O(n)`
//! - [`Algorithm::V2`]: optimal fuzzy match, banded `O(nm)` dynamic programming
//! - [`Algorithm::Exact`]: literal substring with the best leading bonus
//! - [`Algorithm::Prefix`] / [`Algorithm::Suffix`]: anchored literal
//! - [`Algorithm::Equal`]: the whole (trimmed) line
//!
//! All of them assume that the pattern is already lowercased when matching
//! case-insensitively and already normalized when `normalize` is set; see
//! [`crate::Pattern`].

use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::str::FromStr;

use crate::chars::Chars;
use crate::options::ParseError;
use crate::slab::Slab;

pub mod exact;
pub mod prefilter;
pub mod score;
pub mod v1;
pub mod v2;

pub use exact::{equal_match, exact_match_naive, prefix_match, suffix_match};
pub use v1::fuzzy_match_v1;
pub use v2::fuzzy_match_v2;

/// Character index in a line
pub type IndexType = usize;
/// Score reported through [`FuzzyMatcher`]
pub type ScoreType = i64;

/// Character indices of a match, one per pattern character.
///
/// Not necessarily sorted: [`fuzzy_match_v2`] emits them back to front.
pub type MatchIndices = Vec<IndexType>;

/// Span and score of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchResult {
    /// First character of the span (inclusive), `-1` when nothing matched.
    pub start: i32,
    /// End of the span (exclusive), `-1` when nothing matched.
    pub end: i32,
    /// Relevance, the greater the better.
    pub score: i32,
}

impl MatchResult {
    /// The no-match sentinel.
    pub const NONE: Self = Self {
        start: -1,
        end: -1,
        score: 0,
    };

    pub(crate) fn new(start: usize, end: usize, score: i32) -> Self {
        Self {
            start: start as i32,
            end: end as i32,
            score,
        }
    }

    /// Whether this is a match rather than [`MatchResult::NONE`].
    pub fn is_match(&self) -> bool {
        self.start >= 0
    }

    /// The matched span, if any.
    pub fn span(&self) -> Option<Range<usize>> {
        self.is_match().then(|| self.start as usize..self.end as usize)
    }
}

/// Per-call flags shared by every algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchParams {
    /// Compare characters as-is. When unset, the text is lowercased and the
    /// pattern must already be lowercase.
    pub case_sensitive: bool,
    /// Fold Latin diacritics in the text. The pattern must already be folded.
    pub normalize: bool,
    /// Prefer the leftmost match on ties; `false` prefers the rightmost.
    pub forward: bool,
    /// Compute the matched character indices.
    pub with_pos: bool,
    /// Dump the dynamic-programming matrices at `trace` level.
    pub debug: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            normalize: false,
            forward: true,
            with_pos: false,
            debug: false,
        }
    }
}

/// Signature shared by all algorithms.
///
/// The slab is only used by [`fuzzy_match_v2`]; the other algorithms ignore it.
pub type AlgoFn = fn(&MatchParams, &Chars, &[char], Option<&mut Slab>) -> (MatchResult, Option<MatchIndices>);

/// Matching strategy
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Greedy fuzzy matching, fast but not always the best alignment
    V1,
    /// Optimal fuzzy matching
    #[default]
    V2,
    /// Literal substring
    Exact,
    /// Literal prefix
    Prefix,
    /// Literal suffix
    Suffix,
    /// Whole-line equality
    Equal,
}

impl Algorithm {
    /// All strategies, in declaration order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::V1,
        Algorithm::V2,
        Algorithm::Exact,
        Algorithm::Prefix,
        Algorithm::Suffix,
        Algorithm::Equal,
    ];

    /// The function implementing this strategy.
    pub fn algo_fn(self) -> AlgoFn {
        match self {
            Algorithm::V1 => fuzzy_match_v1,
            Algorithm::V2 => fuzzy_match_v2,
            Algorithm::Exact => exact_match_naive,
            Algorithm::Prefix => prefix_match,
            Algorithm::Suffix => suffix_match,
            Algorithm::Equal => equal_match,
        }
    }

    /// Runs this strategy.
    pub fn run(
        self,
        params: &MatchParams,
        text: &Chars,
        pattern: &[char],
        slab: Option<&mut Slab>,
    ) -> (MatchResult, Option<MatchIndices>) {
        (self.algo_fn())(params, text, pattern, slab)
    }

    /// Whether the strategy matches subsequences rather than literal runs.
    pub fn is_fuzzy(self) -> bool {
        matches!(self, Algorithm::V1 | Algorithm::V2)
    }

    fn name(self) -> &'static str {
        match self {
            Algorithm::V1 => "v1",
            Algorithm::V2 => "v2",
            Algorithm::Exact => "exact",
            Algorithm::Prefix => "prefix",
            Algorithm::Suffix => "suffix",
            Algorithm::Equal => "equal",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algo| algo.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::Algorithm(s.to_string()))
    }
}

/// Trait for fuzzy matching text patterns against choices
pub trait FuzzyMatcher: Send + Sync {
    /// fuzzy match choice with pattern, and return the score & matched indices of characters
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, MatchIndices)>;

    /// fuzzy match choice with pattern, and return the score of matching
    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        self.fuzzy_indices(choice, pattern).map(|(score, _)| score)
    }

    /// Fuzzy match and return (score, begin_char_index, end_char_index) without
    /// computing per-character match indices.
    ///
    /// `begin` is the character index of the first matched pattern character,
    /// `end` is the character index of the last matched pattern character.
    ///
    /// Default implementation falls back to `fuzzy_indices`.
    fn fuzzy_match_range(&self, choice: &str, pattern: &str) -> Option<(ScoreType, usize, usize)> {
        self.fuzzy_indices(choice, pattern).map(|(score, indices)| {
            let begin = indices.iter().min().copied().unwrap_or(0);
            let end = indices.iter().max().copied().unwrap_or(0);
            (score, begin, end)
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        assert!(!MatchResult::NONE.is_match());
        assert_eq!(MatchResult::NONE.span(), None);
        let res = MatchResult::new(2, 5, 40);
        assert!(res.is_match());
        assert_eq!(res.span(), Some(2..5));
    }

    #[test]
    fn test_algorithm_from_str() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.to_string().parse::<Algorithm>(), Ok(algo));
        }
        assert_eq!("V2".parse::<Algorithm>(), Ok(Algorithm::V2));
        assert_eq!(
            "skim_v2".parse::<Algorithm>(),
            Err(ParseError::Algorithm("skim_v2".to_string()))
        );
    }

    #[test]
    fn test_dispatch() {
        let text = Chars::from("foo bar");
        let pattern: Vec<char> = "bar".chars().collect();
        let params = MatchParams::default();
        for algo in Algorithm::ALL {
            let (res, _) = algo.run(&params, &text, &pattern, None);
            match algo {
                Algorithm::Prefix | Algorithm::Equal => assert!(!res.is_match(), "{algo}"),
                _ => assert_eq!(res.span(), Some(4..7), "{algo}"),
            }
        }
    }
}
