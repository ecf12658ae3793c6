//! Scoring model shared by every algorithm.

use crate::chars::Chars;
use crate::normalize::normalize_rune;

use super::MatchIndices;

/// Score of every matched character
pub const SCORE_MATCH: i16 = 16;
/// Penalty for the first character of a gap
pub const SCORE_GAP_START: i16 = -3;
/// Penalty for every further character of a gap
pub const SCORE_GAP_EXTENSION: i16 = -1;

/// Match right after a non-word character (or at the start of the line).
///
/// Chosen so that the bonus is cancelled by a gap of about 8 characters, the
/// usual length of a word.
pub const BONUS_BOUNDARY: i16 = SCORE_MATCH / 2;
/// The matched character is itself a non-word character
pub const BONUS_NON_WORD: i16 = SCORE_MATCH / 2;
/// `fooBar` and `foo123` transitions
pub const BONUS_CAMEL123: i16 = BONUS_BOUNDARY + SCORE_GAP_EXTENSION;
/// Minimum bonus of a character extending a consecutive run
pub const BONUS_CONSECUTIVE: i16 = -(SCORE_GAP_START + SCORE_GAP_EXTENSION);
/// Applied to the bonus of the first pattern character only
pub const BONUS_FIRST_CHAR_MULTIPLIER: i16 = 2;

/// Character class, used to compute transition bonuses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CharClass {
    /// Whitespace, punctuation, symbols
    NonWord,
    /// Lowercase letter
    Lower,
    /// Uppercase letter
    Upper,
    /// Letter without case
    Letter,
    /// Digit or other numeric character
    Number,
}

#[inline]
fn char_class_of_ascii(c: char) -> CharClass {
    match c {
        'a'..='z' => CharClass::Lower,
        'A'..='Z' => CharClass::Upper,
        '0'..='9' => CharClass::Number,
        _ => CharClass::NonWord,
    }
}

fn char_class_of_non_ascii(c: char) -> CharClass {
    if c.is_lowercase() {
        CharClass::Lower
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_numeric() {
        CharClass::Number
    } else if c.is_alphabetic() {
        CharClass::Letter
    } else {
        CharClass::NonWord
    }
}

/// Classifies `c`, with a fast path for ASCII.
#[inline]
pub fn char_class_of(c: char) -> CharClass {
    if c.is_ascii() {
        char_class_of_ascii(c)
    } else {
        char_class_of_non_ascii(c)
    }
}

/// Bonus for a character of class `class` preceded by one of class `prev`.
pub fn bonus_for(prev: CharClass, class: CharClass) -> i16 {
    use CharClass::*;
    match (prev, class) {
        (NonWord, cur) if cur != NonWord => BONUS_BOUNDARY,
        (Lower, Upper) => BONUS_CAMEL123,
        (prev, Number) if prev != Number => BONUS_CAMEL123,
        (_, NonWord) => BONUS_NON_WORD,
        _ => 0,
    }
}

/// Bonus of the character at `idx`; the start of the line counts as a boundary.
pub fn bonus_at(text: &Chars, idx: usize) -> i16 {
    if idx == 0 {
        return BONUS_BOUNDARY;
    }
    bonus_for(char_class_of(text.get(idx - 1)), char_class_of(text.get(idx)))
}

#[inline]
fn to_lower(c: char) -> char {
    if c.is_ascii() {
        c.to_ascii_lowercase()
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

/// Folds a text character the way the pattern was prepared.
#[inline]
pub fn fold_char(c: char, case_sensitive: bool, normalize: bool) -> char {
    let c = if case_sensitive { c } else { to_lower(c) };
    if normalize { normalize_rune(c) } else { c }
}

/// Maps a scan index to a text index, mirrored when scanning backward.
#[inline]
pub fn index_at(index: usize, max: usize, forward: bool) -> usize {
    if forward { index } else { max - index - 1 }
}

/// Scores `pattern` inside the fixed span `[sidx, eidx)` of `text`.
///
/// Pattern characters are consumed in order; every text character that does
/// not match the next one counts as a gap. Follows the same rules as the
/// dynamic programming in [`super::fuzzy_match_v2`] so that the algorithms
/// rank comparably.
pub fn calculate_score(
    case_sensitive: bool,
    normalize: bool,
    text: &Chars,
    pattern: &[char],
    sidx: usize,
    eidx: usize,
    with_pos: bool,
) -> (i32, Option<MatchIndices>) {
    let mut pidx = 0;
    let mut score: i32 = 0;
    let mut in_gap = false;
    let mut consecutive = 0;
    let mut first_bonus: i16 = 0;
    let mut pos = with_pos.then(|| Vec::with_capacity(pattern.len()));
    let mut prev_class = if sidx > 0 {
        char_class_of(text.get(sidx - 1))
    } else {
        CharClass::NonWord
    };

    for idx in sidx..eidx {
        let c = text.get(idx);
        let class = char_class_of(c);
        let c = fold_char(c, case_sensitive, normalize);
        if pattern.get(pidx) == Some(&c) {
            if let Some(pos) = pos.as_mut() {
                pos.push(idx);
            }
            score += i32::from(SCORE_MATCH);
            let mut bonus = bonus_for(prev_class, class);
            if consecutive == 0 {
                first_bonus = bonus;
            } else {
                // a boundary starts a new chunk
                if bonus == BONUS_BOUNDARY {
                    first_bonus = bonus;
                }
                bonus = bonus.max(first_bonus).max(BONUS_CONSECUTIVE);
            }
            if pidx == 0 {
                score += i32::from(bonus * BONUS_FIRST_CHAR_MULTIPLIER);
            } else {
                score += i32::from(bonus);
            }
            in_gap = false;
            consecutive += 1;
            pidx += 1;
        } else {
            score += i32::from(if in_gap { SCORE_GAP_EXTENSION } else { SCORE_GAP_START });
            in_gap = true;
            consecutive = 0;
            first_bonus = 0;
        }
        prev_class = class;
    }
    (score, pos)
}
