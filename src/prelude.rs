//! Convenience re-exports of commonly used types.
//!
//! This module provides a convenient way to import all the commonly used
//! skim-algo types and traits with a single `use skim_algo::prelude::*;` statement.

pub use crate::fuzzy_matcher::{
    AlgoFn, equal_match, exact_match_naive, fuzzy_match_v1, fuzzy_match_v2, prefix_match, suffix_match,
};
pub use crate::options::{MatcherOptions, MatcherOptionsBuilder};
pub use crate::*;
