//! This module contains the line matcher
//!
//! A [`LineMatcher`] pairs [`MatcherOptions`] with one scratch slab per worker
//! thread, so a single instance can be shared by every thread scanning the
//! candidates.

use std::cell::RefCell;

use thread_local::ThreadLocal;

use crate::chars::Chars;
use crate::extended::ExtendedPattern;
use crate::fuzzy_matcher::{Algorithm, FuzzyMatcher, MatchIndices, MatchResult, ScoreType};
use crate::options::MatcherOptions;
use crate::pattern::Pattern;
use crate::slab::Slab;

/// Matches lines against prepared patterns with the configured algorithm.
#[derive(Debug)]
pub struct LineMatcher {
    options: MatcherOptions,
    /// Reusable scratch memory (per-thread).
    slabs: ThreadLocal<RefCell<Slab>>,
}

impl Default for LineMatcher {
    fn default() -> Self {
        Self::new(MatcherOptions::default())
    }
}

impl LineMatcher {
    /// Create a new `LineMatcher` with the given options.
    pub fn new(options: MatcherOptions) -> Self {
        debug!("creating matcher for algo {} with {:?}", options.algorithm, options);
        Self {
            options,
            slabs: ThreadLocal::new(),
        }
    }

    /// The options this matcher was built with.
    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Prepares `query` with this matcher's case and normalization settings.
    pub fn pattern(&self, query: &str) -> Pattern {
        Pattern::new(query, self.options.case, self.options.normalize)
    }

    /// Parses `query` with the extended search syntax.
    ///
    /// Undecorated terms are fuzzy when the configured algorithm is.
    pub fn extended_pattern(&self, query: &str) -> ExtendedPattern {
        ExtendedPattern::new(
            query,
            self.options.algorithm.is_fuzzy(),
            self.options.case,
            self.options.normalize,
        )
    }

    fn slab(&self) -> &RefCell<Slab> {
        self.slabs
            .get_or(|| RefCell::new(Slab::new(self.options.slab16, self.options.slab32)))
    }

    /// Matches one line, returning `None` when it does not match.
    ///
    /// An empty pattern matches every line with a score of 0.
    pub fn match_chars(
        &self,
        text: &Chars,
        pattern: &Pattern,
        with_pos: bool,
    ) -> Option<(MatchResult, Option<MatchIndices>)> {
        if pattern.is_empty() {
            return Some((MatchResult::new(0, 0, 0), with_pos.then(Vec::new)));
        }

        let params = pattern.params(self.options.forward, with_pos, self.options.debug);
        let mut slab = self.slab().borrow_mut();
        let (res, pos) = self
            .options
            .algorithm
            .run(&params, text, pattern.runes(), Some(&mut *slab));
        res.is_match().then_some((res, pos))
    }

    /// Matches one line against an extended query.
    ///
    /// The score is the sum of the scores of the matching terms, the positions
    /// are their union (sorted) and the span runs from the first to the last
    /// of them. Inverse terms contribute neither. A line only excluded by
    /// inverse terms, or matched by an empty query, gets the span `0..0`.
    pub fn match_extended(&self, text: &Chars, pattern: &ExtendedPattern) -> Option<(MatchResult, MatchIndices)> {
        let fuzzy = if self.options.algorithm.is_fuzzy() {
            self.options.algorithm
        } else {
            Algorithm::V2
        };
        let mut slab = self.slab().borrow_mut();

        let mut score = 0;
        let mut positions = MatchIndices::new();
        for set in pattern.term_sets() {
            let mut set_score = None;
            for term in set {
                let params = term.pattern().params(self.options.forward, true, self.options.debug);
                let algorithm = term.kind().algorithm(fuzzy);
                let (res, pos) = algorithm.run(&params, text, term.pattern().runes(), Some(&mut *slab));
                if res.is_match() {
                    if term.inverse() {
                        continue;
                    }
                    match pos {
                        Some(pos) if !pos.is_empty() => positions.extend(pos),
                        _ => positions.extend(res.span().unwrap_or_default()),
                    }
                    set_score = Some(res.score);
                    break;
                } else if term.inverse() {
                    set_score = Some(0);
                }
            }
            score += set_score?;
        }

        positions.sort_unstable();
        positions.dedup();
        let res = match (positions.first(), positions.last()) {
            (Some(&start), Some(&last)) => MatchResult::new(start, last + 1, score),
            _ => MatchResult::new(0, 0, score),
        };
        Some((res, positions))
    }
}

impl FuzzyMatcher for LineMatcher {
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, MatchIndices)> {
        let pattern = self.pattern(pattern);
        let (res, pos) = self.match_chars(&Chars::from(choice), &pattern, true)?;
        let mut pos = pos.unwrap_or_default();
        pos.sort_unstable();
        Some((ScoreType::from(res.score), pos))
    }

    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        let pattern = self.pattern(pattern);
        let (res, _) = self.match_chars(&Chars::from(choice), &pattern, false)?;
        Some(ScoreType::from(res.score))
    }

    /// Uses the span of the match, `end` being the last matched character.
    fn fuzzy_match_range(&self, choice: &str, pattern: &str) -> Option<(ScoreType, usize, usize)> {
        let pattern = self.pattern(pattern);
        let (res, _) = self.match_chars(&Chars::from(choice), &pattern, false)?;
        let span = res.span()?;
        Some((ScoreType::from(res.score), span.start, span.end.saturating_sub(1)))
    }
}
