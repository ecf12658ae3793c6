//! Greedy fuzzy matching.

use crate::chars::Chars;
use crate::slab::Slab;

use super::prefilter::ascii_fuzzy_index;
use super::score::{calculate_score, fold_char, index_at};
use super::{MatchIndices, MatchParams, MatchResult};

/// Linear-time fuzzy match.
///
/// Scans in the requested direction for the first place where the whole
/// pattern appears as a subsequence, then walks back from its end to shrink
/// the span as much as possible. The alignment is not guaranteed to be the
/// best scoring one; [`super::fuzzy_match_v2`] finds that.
pub fn fuzzy_match_v1(
    params: &MatchParams,
    text: &Chars,
    pattern: &[char],
    _slab: Option<&mut Slab>,
) -> (MatchResult, Option<MatchIndices>) {
    if pattern.is_empty() {
        return (MatchResult::new(0, 0, 0), params.with_pos.then(Vec::new));
    }
    if ascii_fuzzy_index(text, pattern, params.case_sensitive).is_none() {
        return (MatchResult::NONE, None);
    }

    let len = text.len();
    let m = pattern.len();
    let char_at = |index: usize| fold_char(text.get(index_at(index, len, params.forward)), params.case_sensitive, params.normalize);
    let pchar_at = |pidx: usize| pattern[index_at(pidx, m, params.forward)];

    let mut pidx = 0;
    let mut sidx = None;
    let mut eidx = None;
    for index in 0..len {
        if char_at(index) == pchar_at(pidx) {
            sidx.get_or_insert(index);
            pidx += 1;
            if pidx == m {
                eidx = Some(index + 1);
                break;
            }
        }
    }
    let (Some(mut sidx), Some(eidx)) = (sidx, eidx) else {
        return (MatchResult::NONE, None);
    };

    let mut pidx = m - 1;
    for index in (sidx..eidx).rev() {
        if char_at(index) == pchar_at(pidx) {
            if pidx == 0 {
                sidx = index;
                break;
            }
            pidx -= 1;
        }
    }

    let (sidx, eidx) = if params.forward {
        (sidx, eidx)
    } else {
        (len - eidx, len - sidx)
    };
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
