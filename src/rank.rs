//! Sort keys for matched lines.
//!
//! A [`RankBuilder`] turns a match into a fixed-size [`Rank`] tuple that sorts
//! ascending: the best line compares lowest.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::chars::Chars;
use crate::fuzzy_matcher::MatchResult;
use crate::options::ParseError;

/// Rank tuple used for sorting match results, lower sorts first
pub type Rank = [i32; 5];

/// What a line is ranked on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum RankKey {
    /// Match score, higher first
    Score,
    /// Start of the match span, earlier first
    Begin,
    /// End of the match span, earlier first
    End,
    /// Length of the line without surrounding whitespace, shorter first
    Length,
    /// Position of the line in the input, earlier first
    Index,
}

impl RankKey {
    const ALL: [RankKey; 5] = [
        RankKey::Score,
        RankKey::Begin,
        RankKey::End,
        RankKey::Length,
        RankKey::Index,
    ];

    fn name(self) -> &'static str {
        match self {
            RankKey::Score => "score",
            RankKey::Begin => "begin",
            RankKey::End => "end",
            RankKey::Length => "length",
            RankKey::Index => "index",
        }
    }

    fn value(self, res: &MatchResult, text: &Chars) -> i32 {
        match self {
            RankKey::Score => -res.score,
            RankKey::Begin => res.start,
            RankKey::End => res.end,
            RankKey::Length => i32::from(text.trim_length()),
            RankKey::Index => text.index,
        }
    }
}

/// One tiebreak: a key and its direction.
///
/// Parsed from the key name, with a leading `-` to reverse it (`-index`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct RankCriteria {
    /// The ranked quantity
    pub key: RankKey,
    /// Whether the natural order is reversed
    pub reverse: bool,
}

impl RankCriteria {
    /// `key` in its natural order.
    pub const fn new(key: RankKey) -> Self {
        Self { key, reverse: false }
    }

    /// `key` in reverse order.
    pub const fn reversed(key: RankKey) -> Self {
        Self { key, reverse: true }
    }

    fn value(self, res: &MatchResult, text: &Chars) -> i32 {
        let value = self.key.value(res, text);
        if self.reverse { value.saturating_neg() } else { value }
    }
}

impl From<RankKey> for RankCriteria {
    fn from(key: RankKey) -> Self {
        Self::new(key)
    }
}

impl FromStr for RankCriteria {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let (reverse, name) = match name.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, name),
        };
        RankKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(name))
            .map(|key| Self { key, reverse })
            .ok_or_else(|| ParseError::RankCriteria(s.to_string()))
    }
}

impl Display for RankCriteria {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.reverse {
            f.write_str("-")?;
        }
        f.write_str(self.key.name())
    }
}

/// Builds sort keys from a list of [`RankCriteria`]
#[derive(Debug, Clone)]
pub struct RankBuilder {
    criteria: Vec<RankCriteria>,
}

impl Default for RankBuilder {
    fn default() -> Self {
        Self::new(vec![RankKey::Score.into(), RankKey::Begin.into(), RankKey::End.into()])
    }
}

impl RankBuilder {
    /// Creates a new rank builder with the given criteria
    ///
    /// The score always takes part in the ranking: it is put first when the
    /// criteria do not mention it. A key given twice keeps its first direction.
    pub fn new(criteria: Vec<RankCriteria>) -> Self {
        let mut effective: Vec<RankCriteria> = Vec::with_capacity(RankKey::ALL.len());
        if criteria.iter().all(|c| c.key != RankKey::Score) {
            effective.push(RankKey::Score.into());
        }
        for criterion in criteria {
            if effective.iter().all(|c| c.key != criterion.key) {
                effective.push(criterion);
            }
        }
        Self { criteria: effective }
    }

    /// The effective criteria, most significant first
    pub fn criteria(&self) -> &[RankCriteria] {
        &self.criteria
    }

    /// Sort key of `text` matched as `res`.
    pub fn build_rank(&self, res: &MatchResult, text: &Chars) -> Rank {
        let mut rank = [0; 5];
        for (slot, criterion) in rank.iter_mut().zip(&self.criteria) {
            *slot = criterion.value(res, text);
        }

        trace!("ranks: {rank:?}");
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(names: &str) -> Vec<RankCriteria> {
        names.split(',').map(|name| name.parse().unwrap()).collect()
    }

    #[test]
    fn test_score_is_inserted() {
        let builder = RankBuilder::new(criteria("begin"));
        assert_eq!(builder.criteria(), criteria("score,begin").as_slice());
        let builder = RankBuilder::new(criteria("length,-score"));
        assert_eq!(builder.criteria(), criteria("length,-score").as_slice());
    }

    #[test]
    fn test_repeated_key_keeps_first() {
        let builder = RankBuilder::new(criteria("index,-index,length,index"));
        assert_eq!(builder.criteria(), criteria("score,index,length").as_slice());
    }

    #[test]
    fn test_build_rank() {
        let text = Chars::from("fooBarbaz1").with_index(3);
        let res = MatchResult::new(2, 9, 56);
        assert_eq!(RankBuilder::default().build_rank(&res, &text), [-56, 2, 9, 0, 0]);

        let builder = RankBuilder::new(criteria("-length,score,-index"));
        assert_eq!(builder.build_rank(&res, &text), [-10, -56, -3, 0, 0]);
    }

    #[test]
    fn test_length_ignores_surrounding_whitespace() {
        let builder = RankBuilder::new(criteria("length"));
        let res = MatchResult::new(2, 5, 40);
        let padded = Chars::from("  foo \t");
        let bare = Chars::from("foo");
        assert_eq!(builder.build_rank(&res, &padded)[1], 3);
        assert_eq!(builder.build_rank(&res, &padded), builder.build_rank(&res, &bare));
    }

    #[test]
    fn test_higher_score_sorts_first() {
        let builder = RankBuilder::default();
        let text = Chars::from("fooBar");
        let mut ranks = [
            builder.build_rank(&MatchResult::new(0, 1, 10), &text),
            builder.build_rank(&MatchResult::new(3, 4, 40), &text),
        ];
        ranks.sort();
        assert_eq!(ranks[0][0], -40);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("score".parse::<RankCriteria>(), Ok(RankCriteria::new(RankKey::Score)));
        assert_eq!("-begin".parse::<RankCriteria>(), Ok(RankCriteria::reversed(RankKey::Begin)));
        assert_eq!(" Length".parse::<RankCriteria>(), Ok(RankCriteria::new(RankKey::Length)));
        assert_eq!(
            "pathname".parse::<RankCriteria>(),
            Err(ParseError::RankCriteria("pathname".to_string()))
        );
        assert!("--index".parse::<RankCriteria>().is_err());
        assert_eq!(RankCriteria::reversed(RankKey::Index).to_string(), "-index");
    }
}
