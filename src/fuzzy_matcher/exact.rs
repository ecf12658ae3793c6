//! Literal matching: substring, prefix, suffix and whole-line equality.

use crate::chars::Chars;
use crate::normalize::normalize_rune;
use crate::slab::Slab;

use super::prefilter::ascii_fuzzy_index;
use super::score::{
    BONUS_BOUNDARY, BONUS_FIRST_CHAR_MULTIPLIER, SCORE_MATCH, bonus_at, calculate_score, fold_char, index_at,
};
use super::{MatchIndices, MatchParams, MatchResult};

fn empty_match(params: &MatchParams, at: usize) -> (MatchResult, Option<MatchIndices>) {
    (MatchResult::new(at, at, 0), params.with_pos.then(Vec::new))
}

fn scored(params: &MatchParams, text: &Chars, pattern: &[char], sidx: usize, eidx: usize) -> (MatchResult, Option<MatchIndices>) {
    let (score, pos) = calculate_score(
        params.case_sensitive,
        params.normalize,
        text,
        pattern,
        sidx,
        eidx,
        params.with_pos,
    );
    (MatchResult::new(sidx, eidx, score), pos)
}

/// Finds `pattern` as a contiguous substring of `text`.
///
/// Among all occurrences, the one whose first character has the highest bonus
/// wins; the scan stops early at a boundary occurrence. Ties go to the first
/// occurrence in scan direction.
pub fn exact_match_naive(
    params: &MatchParams,
    text: &Chars,
    pattern: &[char],
    _slab: Option<&mut Slab>,
) -> (MatchResult, Option<MatchIndices>) {
    if pattern.is_empty() {
        return empty_match(params, 0);
    }

    let len = text.len();
    let m = pattern.len();
    if len < m || ascii_fuzzy_index(text, pattern, params.case_sensitive).is_none() {
        return (MatchResult::NONE, None);
    }

    let mut pidx = 0;
    let mut bonus = 0;
    let mut best_pos = None;
    let mut best_bonus = -1;
    let mut index = 0;
    while index < len {
        let tidx = index_at(index, len, params.forward);
        let c = fold_char(text.get(tidx), params.case_sensitive, params.normalize);
        let ppos = index_at(pidx, m, params.forward);
        if pattern[ppos] == c {
            if ppos == 0 {
                bonus = bonus_at(text, tidx);
            }
            pidx += 1;
            if pidx == m {
                if bonus > best_bonus {
                    best_pos = Some(index);
                    best_bonus = bonus;
                }
                if bonus == BONUS_BOUNDARY {
                    break;
                }
                // overlapping occurrences: resume right after this one's start
                index -= pidx - 1;
                pidx = 0;
                bonus = 0;
            }
        } else {
            index -= pidx;
            pidx = 0;
            bonus = 0;
        }
        index += 1;
    }

    let Some(best_pos) = best_pos else {
        return (MatchResult::NONE, None);
    };
    let (sidx, eidx) = if params.forward {
        (best_pos + 1 - m, best_pos + 1)
    } else {
        (len - (best_pos + 1), len - (best_pos + 1 - m))
    };
    trace!("exact match {pattern:?} in {text}: [{sidx}, {eidx})");
    scored(params, text, pattern, sidx, eidx)
}

/// Anchors `pattern` at the start of `text`, ignoring leading whitespace unless
/// the pattern itself starts with whitespace.
pub fn prefix_match(
    params: &MatchParams,
    text: &Chars,
    pattern: &[char],
    _slab: Option<&mut Slab>,
) -> (MatchResult, Option<MatchIndices>) {
    let Some(&first) = pattern.first() else {
        return empty_match(params, 0);
    };

    let trimmed = if first.is_whitespace() {
        0
    } else {
        text.leading_whitespaces()
    };
    if text.len() - trimmed < pattern.len() {
        return (MatchResult::NONE, None);
    }

    let matched = pattern
        .iter()
        .enumerate()
        .all(|(i, &pc)| fold_char(text.get(trimmed + i), params.case_sensitive, params.normalize) == pc);
    if !matched {
        return (MatchResult::NONE, None);
    }
    scored(params, text, pattern, trimmed, trimmed + pattern.len())
}

/// Anchors `pattern` at the end of `text`, ignoring trailing whitespace unless
/// the pattern itself ends with whitespace.
pub fn suffix_match(
    params: &MatchParams,
    text: &Chars,
    pattern: &[char],
    _slab: Option<&mut Slab>,
) -> (MatchResult, Option<MatchIndices>) {
    let mut trimmed_len = text.len();
    if !pattern.last().is_some_and(|c| c.is_whitespace()) {
        trimmed_len -= text.trailing_whitespaces();
    }
    if pattern.is_empty() {
        return empty_match(params, trimmed_len);
    }
    let Some(diff) = trimmed_len.checked_sub(pattern.len()) else {
        return (MatchResult::NONE, None);
    };

    let matched = pattern
        .iter()
        .enumerate()
        .all(|(i, &pc)| fold_char(text.get(diff + i), params.case_sensitive, params.normalize) == pc);
    if !matched {
        return (MatchResult::NONE, None);
    }
    scored(params, text, pattern, diff, trimmed_len)
}

/// Matches when the trimmed line equals `pattern`.
///
/// The whole line scores as one consecutive run starting on a boundary.
pub fn equal_match(
    params: &MatchParams,
    text: &Chars,
    pattern: &[char],
    _slab: Option<&mut Slab>,
) -> (MatchResult, Option<MatchIndices>) {
    let (Some(&first), Some(&last)) = (pattern.first(), pattern.last()) else {
        return (MatchResult::NONE, None);
    };

    let leading = if first.is_whitespace() {
        0
    } else {
        text.leading_whitespaces()
    };
    let trailing = if last.is_whitespace() {
        0
    } else {
        text.trailing_whitespaces()
    };
    if text.len().checked_sub(leading + trailing) != Some(pattern.len()) {
        return (MatchResult::NONE, None);
    }

    let matched = pattern.iter().enumerate().all(|(i, &pc)| {
        let pc = if params.normalize { normalize_rune(pc) } else { pc };
        fold_char(text.get(leading + i), params.case_sensitive, params.normalize) == pc
    });
    if !matched {
        return (MatchResult::NONE, None);
    }

    let m = pattern.len();
    let score = (i32::from(SCORE_MATCH) + i32::from(BONUS_BOUNDARY)) * m as i32
        + i32::from(BONUS_FIRST_CHAR_MULTIPLIER - 1) * i32::from(BONUS_BOUNDARY);
    let pos = params.with_pos.then(|| (leading..leading + m).collect());
    (MatchResult::new(leading, leading + m, score), pos)
}
