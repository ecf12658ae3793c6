//! skim-algo is the line-ranking engine of a fuzzy finder.
//!
//! Given a query and candidate lines, it decides whether each line matches
//! and computes a score to sort the matches by. Six strategies share one
//! scoring model: greedy and optimal fuzzy matching, literal substring,
//! prefix, suffix and whole-line equality. Queries can combine them with the
//! [extended search syntax](extended).
//!
//! # Examples
//!
//! ```
//! use skim_algo::prelude::*;
//!
//! let matcher = LineMatcher::default();
//! let pattern = matcher.pattern("fbb");
//! let line = Chars::from("foo bar baz");
//!
//! let (res, pos) = matcher.match_chars(&line, &pattern, true).unwrap();
//! assert_eq!(res.span(), Some(0..9));
//! assert_eq!(pos.map(|mut pos| { pos.sort(); pos }), Some(vec![0, 4, 8]));
//! ```
//!
//! The algorithms can also be called directly, reusing one [`Slab`] per
//! thread:
//!
//! ```
//! use skim_algo::prelude::*;
//!
//! let mut slab = Slab::default();
//! let params = MatchParams::default();
//! let pattern: Vec<char> = "obz".chars().collect();
//! let (res, _) = fuzzy_match_v2(&params, &Chars::from("fooBarbaz1"), &pattern, Some(&mut slab));
//! assert_eq!(res.end, 9);
//! ```
//!
//! Extended queries combine several terms:
//!
//! ```
//! use skim_algo::prelude::*;
//!
//! let matcher = LineMatcher::default();
//! let pattern = matcher.extended_pattern("^src rs$ !test");
//! assert!(matcher.match_extended(&Chars::from("src/main.rs"), &pattern).is_some());
//! assert!(matcher.match_extended(&Chars::from("src/test.rs"), &pattern).is_none());
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub use crate::chars::Chars;
pub use crate::extended::{ExtendedPattern, Term, TermType};
pub use crate::fuzzy_matcher::{Algorithm, FuzzyMatcher, MatchIndices, MatchParams, MatchResult};
pub use crate::matcher::LineMatcher;
pub use crate::options::{MatcherOptions, MatcherOptionsBuilder, ParseError};
pub use crate::pattern::Pattern;
pub use crate::rank::{Rank, RankBuilder, RankCriteria, RankKey};
pub use crate::slab::Slab;

pub mod chars;
pub mod extended;
pub mod fuzzy_matcher;
mod matcher;
pub mod normalize;
pub mod options;
pub mod pattern;
pub mod prelude;
pub mod rank;
pub mod slab;

#[derive(Eq, PartialEq, Debug, Copy, Clone, Default, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "cli", clap(rename_all = "snake_case"))]
/// Case sensitivity mode for matching
pub enum CaseMatching {
    /// Case-sensitive matching
    Respect,
    /// Case-insensitive matching
    Ignore,
    /// Smart case: case-insensitive unless query contains uppercase
    #[default]
    Smart,
}
