//! Optimal fuzzy matching.
//!
//! A Smith-Waterman style alignment restricted to a band: row `i` of the
//! score matrix only covers the columns from the first possible occurrence of
//! `pattern[i]` to the last occurrence of the last pattern character. Unlike
//! the classic algorithm, pattern characters can never be omitted.
//!
//! Scratch memory per call, with `N` characters, `M` pattern characters and
//! band width `W`:
//!
//! | buffer | cells | content |
//! |---|---|---|
//! | `H0`, `C0` | `N` (16 bit) | row 0 of the score and run-length matrices |
//! | `B` | `N` (16 bit) | bonus of every position |
//! | `F` | `M` (32 bit) | first occurrence of every pattern character |
//! | `T` | `N` (32 bit) | folded codepoints |
//! | `H`, `C` | `W * M` (16 bit) | score and run-length matrices |

use crate::chars::Chars;
use crate::slab::Slab;

use super::prefilter::ascii_fuzzy_index;
use super::score::{
    BONUS_BOUNDARY, BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER, CharClass, SCORE_GAP_EXTENSION, SCORE_GAP_START,
    SCORE_MATCH, bonus_for, char_class_of, fold_char,
};
use super::v1::fuzzy_match_v1;
use super::{MatchIndices, MatchParams, MatchResult};

/// Best-scoring fuzzy match, `O(N * M)` in time.
///
/// With a slab, candidates for which `N * M` exceeds its 16-bit capacity are
/// delegated to [`fuzzy_match_v1`]. Without one, or when the slab runs out
/// halfway, the buffers are allocated for this call only.
///
/// The start is always the first column of the best alignment, whether or not
/// positions are requested.
pub fn fuzzy_match_v2(
    params: &MatchParams,
    text: &Chars,
    pattern: &[char],
    slab: Option<&mut Slab>,
) -> (MatchResult, Option<MatchIndices>) {
    let m = pattern.len();
    if m == 0 {
        return (MatchResult::new(0, 0, 0), params.with_pos.then(Vec::new));
    }
    let n = text.len();

    if let Some(slab) = slab.as_deref()
        && n * m > slab.capacity16()
    {
        trace!("{n}x{m} exceeds the slab, falling back to v1");
        return fuzzy_match_v1(params, text, pattern, None);
    }

    let Some(idx) = ascii_fuzzy_index(text, pattern, params.case_sensitive) else {
        return (MatchResult::NONE, None);
    };

    if let Some(slab) = slab {
        if let Some(res) = align(params, text, pattern, idx, slab) {
            return res;
        }
        debug!("slab exhausted for {n}x{m}, using scratch memory");
    }
    let mut scratch = Slab::new(3 * n, n + m);
    align(params, text, pattern, idx, &mut scratch).unwrap_or((MatchResult::NONE, None))
}

/// Runs the alignment in `slab`, starting the scan at `idx`.
///
/// Returns `None` when the slab cannot hold the first row buffers. The band
/// matrices are taken from the heap when the slab runs out of room for them.
fn align(
    params: &MatchParams,
    text: &Chars,
    pattern: &[char],
    idx: usize,
    slab: &mut Slab,
) -> Option<(MatchResult, Option<MatchIndices>)> {
    let n = text.len();
    let m = pattern.len();
    let forward = params.forward;

    let mut cursor = slab.cursor();
    let h0 = cursor.alloc16(n)?;
    let c0 = cursor.alloc16(n)?;
    let bonuses = cursor.alloc16(n)?;
    let first = cursor.alloc32(m)?;
    let t = cursor.alloc32(n)?;
    text.copy_runes(t);

    // fold the text, compute the bonuses and the first row
    let pchar0 = u32::from(pattern[0]);
    let mut pchar = pchar0;
    let mut pidx = 0;
    let mut last_idx = 0;
    let mut max_score: i16 = 0;
    let mut max_score_pos = 0;
    let mut prev_h0: i16 = 0;
    let mut prev_class = CharClass::NonWord;
    let mut in_gap = false;
    for col in idx..n {
        let raw = char::from_u32(t[col]).unwrap_or(char::REPLACEMENT_CHARACTER);
        let class = char_class_of(raw);
        let c = u32::from(fold_char(raw, params.case_sensitive, params.normalize));
        t[col] = c;
        let bonus = bonus_for(prev_class, class);
        bonuses[col] = bonus;
        prev_class = class;

        if c == pchar {
            if pidx < m {
                first[pidx] = col as u32;
                pidx += 1;
                pchar = u32::from(pattern[pidx.min(m - 1)]);
            }
            last_idx = col;
        }

        if c == pchar0 {
            let score = SCORE_MATCH + bonus * BONUS_FIRST_CHAR_MULTIPLIER;
            h0[col] = score;
            c0[col] = 1;
            if m == 1 && (forward && score > max_score || !forward && score >= max_score) {
                max_score = score;
                max_score_pos = col;
                if forward && bonus == BONUS_BOUNDARY {
                    break;
                }
            }
            in_gap = false;
        } else {
            let gap = if in_gap { SCORE_GAP_EXTENSION } else { SCORE_GAP_START };
            h0[col] = (prev_h0 + gap).max(0);
            c0[col] = 0;
            in_gap = true;
        }
        prev_h0 = h0[col];
    }

    if pidx != m {
        return Some((MatchResult::NONE, None));
    }
    if m == 1 {
        let res = MatchResult::new(max_score_pos, max_score_pos + 1, i32::from(max_score));
        return Some((res, params.with_pos.then(|| vec![max_score_pos])));
    }

    // fill the band of the remaining rows
    let f0 = first[0] as usize;
    let width = last_idx - f0 + 1;
    let mut heap_band = Vec::new();
    let band: &mut [i16] = match cursor.alloc16(2 * width * m) {
        Some(band) => band,
        None => {
            debug!("slab exhausted for a {width}x{m} band, allocating it");
            heap_band.resize(2 * width * m, 0);
            heap_band.as_mut_slice()
        }
    };
    band.fill(0);
    let (h, runs) = band.split_at_mut(width * m);
    h[..width].copy_from_slice(&h0[f0..=last_idx]);
    runs[..width].copy_from_slice(&c0[f0..=last_idx]);

    for pidx in 1..m {
        let fcol = first[pidx] as usize;
        let pchar = u32::from(pattern[pidx]);
        let row = pidx * width;
        let mut in_gap = false;
        h[row + fcol - f0 - 1] = 0;
        for col in fcol..=last_idx {
            let j0 = col - f0;
            let gap = if in_gap { SCORE_GAP_EXTENSION } else { SCORE_GAP_START };
            let s2 = h[row + j0 - 1].saturating_add(gap);
            let mut s1 = 0;
            let mut consecutive = 0;

            if t[col] == pchar {
                let diag = row - width + j0 - 1;
                s1 = h[diag].saturating_add(SCORE_MATCH);
                let mut bonus = bonuses[col];
                consecutive = runs[diag] + 1;
                if bonus == BONUS_BOUNDARY {
                    // a boundary starts a new chunk
                    consecutive = 1;
                } else if consecutive > 1 {
                    let run_start = col + 1 - consecutive as usize;
                    bonus = bonus.max(BONUS_CONSECUTIVE.max(bonuses[run_start]));
                }
                if s1.saturating_add(bonus) < s2 {
                    s1 = s1.saturating_add(bonuses[col]);
                    consecutive = 0;
                } else {
                    s1 = s1.saturating_add(bonus);
                }
            }
            runs[row + j0] = consecutive;

            in_gap = s1 < s2;
            let score = s1.max(s2).max(0);
            if pidx == m - 1 && (forward && score > max_score || !forward && score >= max_score) {
                max_score = score;
                max_score_pos = col;
            }
            h[row + j0] = score;
        }
    }

    if params.debug {
        dump_matrices(t, pattern, first, last_idx, h, runs);
    }

    // walk back from the best cell to the start of the alignment
    let mut pos = params.with_pos.then(|| Vec::with_capacity(m));
    let mut i = m - 1;
    let mut j = max_score_pos;
    let mut prefer_match = true;
    loop {
        let row = i * width;
        let j0 = j - f0;
        let fi = first[i] as usize;
        let s = h[row + j0];
        let s1 = if i > 0 && j >= fi { h[row - width + j0 - 1] } else { 0 };
        let s2 = if j > fi { h[row + j0 - 1] } else { 0 };

        if s > s1 && (s > s2 || s == s2 && prefer_match) {
            if let Some(pos) = pos.as_mut() {
                pos.push(j);
            }
            if i == 0 {
                break;
            }
            i -= 1;
        }
        let below = row + width + j0 + 1;
        prefer_match = runs[row + j0] > 1 || below < runs.len() && runs[below] > 0;
        j -= 1;
    }

    let res = MatchResult::new(j, max_score_pos + 1, i32::from(max_score));
    Some((res, pos))
}

/// Logs the band of the score matrix and the run lengths.
fn dump_matrices(t: &[u32], pattern: &[char], first: &[u32], last_idx: usize, h: &[i16], runs: &[i16]) {
    let f0 = first[0] as usize;
    let width = last_idx - f0 + 1;
    let header: String = t[f0..=last_idx]
        .iter()
        .map(|&c| format!("  {}", char::from_u32(c).unwrap_or('?')))
        .collect();
    trace!("  {header}");
    for (i, (&fi, pc)) in first.iter().zip(pattern).enumerate() {
        let fi = fi as usize;
        let row = i * width;
        let mut scores = String::new();
        let mut chunks = String::new();
        for col in f0..=last_idx {
            if col < fi {
                scores.push_str("  0");
                chunks.push_str("   ");
                continue;
            }
            scores.push_str(&format!("{:3}", h[row + col - f0]));
            match runs[row + col - f0] {
                run if run > 0 => chunks.push_str(&format!("{run:3}")),
                _ => chunks.push_str("   "),
            }
        }
        trace!("{pc} {scores}");
        trace!("  {chunks}");
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;
    use crate::fuzzy_matcher::score::BONUS_CAMEL123;

    fn params(forward: bool) -> MatchParams {
        MatchParams {
            forward,
            with_pos: true,
            ..MatchParams::default()
        }
    }

    fn v2(text: &str, pattern: &str, forward: bool, slab: Option<&mut Slab>) -> (MatchResult, Option<MatchIndices>) {
        let pattern: Vec<char> = pattern.chars().collect();
        fuzzy_match_v2(&params(forward), &Chars::from(text), &pattern, slab)
    }

    #[test]
    fn test_optimal_alignment() {
        // greedy scanning settles for "axxb"
        let (res, mut pos) = v2("axxb a_b", "ab", true, None);
        pos.as_mut().unwrap().sort();
        assert_eq!(pos, Some(vec![5, 7]));
        assert_eq!(res.span(), Some(5..8));
        assert_eq!(
            res.score,
            i32::from(SCORE_MATCH * 2 + BONUS_BOUNDARY * BONUS_FIRST_CHAR_MULTIPLIER + BONUS_BOUNDARY + SCORE_GAP_START)
        );
        let (res, _) = fuzzy_match_v1(&params(true), &Chars::from("axxb a_b"), &['a', 'b'], None);
        assert_eq!(res.span(), Some(0..4));
    }

    #[test]
    fn test_positions_are_descending() {
        let (_, pos) = v2("foo bar baz", "fbb", true, None);
        assert_eq!(pos, Some(vec![8, 4, 0]));
    }

    #[test]
    fn test_single_char_tie_break() {
        let (res, _) = v2("xaxa", "a", true, None);
        assert_eq!(res.span(), Some(1..2));
        let (res, _) = v2("xaxa", "a", false, None);
        assert_eq!(res.span(), Some(3..4));
        // boundary bonus wins over position
        let (res, _) = v2("xa a", "a", true, None);
        assert_eq!(res.span(), Some(3..4));
    }

    #[test]
    fn test_start_without_positions() {
        let pattern: Vec<char> = "oBZ".to_lowercase().chars().collect();
        let text = Chars::from("fooBarbaz1");
        let (res, pos) = fuzzy_match_v2(&MatchParams::default(), &text, &pattern, None);
        assert_eq!(pos, None);
        assert_eq!(res.span(), Some(2..9));
        assert_eq!(
            res.score,
            i32::from(SCORE_MATCH * 3 + BONUS_CAMEL123 + SCORE_GAP_START + SCORE_GAP_EXTENSION * 3)
        );
        assert_eq!(res, fuzzy_match_v2(&params(true), &text, &pattern, None).0);
    }

    #[test]
    fn test_start_ignores_earlier_first_char() {
        // the lone 'a' is the first occurrence, "ab" is the alignment
        let pattern = ['a', 'b'];
        let text = Chars::from("a ab");
        let (without, _) = fuzzy_match_v2(&MatchParams::default(), &text, &pattern, None);
        let (with, pos) = fuzzy_match_v2(&params(true), &text, &pattern, None);
        assert_eq!(without.span(), Some(2..4));
        assert_eq!(without, with);
        assert_eq!(pos, Some(vec![3, 2]));
    }

    #[test]
    fn test_slab_reuse_is_stable() {
        let mut slab = Slab::default();
        let first = v2("fooBarbaz1", "obz", true, Some(&mut slab));
        let _ = v2("/usr/share/doc/some-package", "sdp", true, Some(&mut slab));
        let again = v2("fooBarbaz1", "obz", true, Some(&mut slab));
        assert_eq!(first, again);
        assert_eq!(first, v2("fooBarbaz1", "obz", true, None));
    }

    #[test]
    fn test_small_slab_falls_back_to_v1() {
        let text = "a_xab";
        let mut slab = Slab::new(4, 4);
        let (res, _) = v2(text, "ab", true, Some(&mut slab));
        let pattern = ['a', 'b'];
        let expected = fuzzy_match_v1(&params(true), &Chars::from(text), &pattern, None);
        assert_eq!(res, expected.0);
    }

    #[test]
    fn test_exhausted_slab_uses_scratch() {
        // N * M fits, but the first row buffers alone do not
        let mut slab = Slab::new(12, 64);
        let with_slab = v2("ab_ab", "ab", true, Some(&mut slab));
        assert_eq!(with_slab, v2("ab_ab", "ab", true, None));
        assert_eq!(with_slab.0.span(), Some(0..2));
    }

    #[test]
    fn test_band_outside_slab() {
        // room for the first row buffers but not for the band
        let text = "/usr/share/doc/some-package";
        let n = text.chars().count();
        let mut slab = Slab::new(3 * n, n + 3);
        let in_heap = v2(text, "sdp", true, Some(&mut slab));
        let mut large = Slab::default();
        assert_eq!(in_heap, v2(text, "sdp", true, Some(&mut large)));
        assert_eq!(in_heap, v2(text, "sdp", true, None));
        assert!(in_heap.0.is_match());
    }

    #[test]
    fn test_debug_dump_does_not_change_result() {
        let pattern: Vec<char> = "fbb".chars().collect();
        let text = Chars::from("foo bar baz");
        let debug = MatchParams {
            debug: true,
            ..params(true)
        };
        assert_eq!(
            fuzzy_match_v2(&debug, &text, &pattern, None),
            fuzzy_match_v2(&params(true), &text, &pattern, None)
        );
    }
}
