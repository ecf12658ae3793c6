//! Configuration options for the matcher.
//!
//! This module provides the `MatcherOptions` struct and builder, and the
//! parsing of the user-facing option values.

use std::str::FromStr;

use derive_builder::Builder;
use thiserror::Error;

use crate::CaseMatching;
use crate::fuzzy_matcher::Algorithm;
use crate::slab::{SLAB_16_SIZE, SLAB_32_SIZE};

/// Error for option values that cannot be parsed
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown matching algorithm
    #[error("Unknown algorithm {0}, expected one of v1, v2, exact, prefix, suffix, equal")]
    Algorithm(String),
    /// Unknown case matching mode
    #[error("Unknown case matching {0}, expected one of respect, ignore, smart")]
    CaseMatching(String),
    /// Unknown tiebreak criteria
    #[error("Unknown rank criteria {0}")]
    RankCriteria(String),
}

/// Options of a [`crate::LineMatcher`]
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(default)]
pub struct MatcherOptions {
    /// Case sensitivity of the match
    pub case: CaseMatching,
    /// Match decorated Latin letters with their bare form
    pub normalize: bool,
    /// Prefer the leftmost match on ties
    pub forward: bool,
    /// Matching strategy
    pub algorithm: Algorithm,
    /// Number of 16-bit cells of each worker's slab
    pub slab16: usize,
    /// Number of 32-bit cells of each worker's slab
    pub slab32: usize,
    /// Log the score matrices of every optimal fuzzy match
    pub debug: bool,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            case: CaseMatching::default(),
            normalize: true,
            forward: true,
            algorithm: Algorithm::default(),
            slab16: SLAB_16_SIZE,
            slab32: SLAB_32_SIZE,
            debug: false,
        }
    }
}

impl FromStr for CaseMatching {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "respect" => Ok(CaseMatching::Respect),
            "ignore" => Ok(CaseMatching::Ignore),
            "smart" => Ok(CaseMatching::Smart),
            _ => Err(ParseError::CaseMatching(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = MatcherOptionsBuilder::default().build().unwrap();
        assert_eq!(opts, MatcherOptions::default());
        assert_eq!(opts.case, CaseMatching::Smart);
        assert!(opts.normalize);
        assert!(opts.forward);
        assert_eq!(opts.algorithm, Algorithm::V2);
        assert_eq!(opts.slab16, SLAB_16_SIZE);
        assert!(!opts.debug);
    }

    #[test]
    fn test_builder() {
        let opts = MatcherOptionsBuilder::default()
            .algorithm(Algorithm::Exact)
            .case(CaseMatching::Respect)
            .forward(false)
            .build()
            .unwrap();
        assert_eq!(opts.algorithm, Algorithm::Exact);
        assert_eq!(opts.case, CaseMatching::Respect);
        assert!(!opts.forward);
        assert!(opts.normalize);
    }

    #[test]
    fn test_case_matching_from_str() {
        assert_eq!("smart".parse::<CaseMatching>(), Ok(CaseMatching::Smart));
        assert_eq!("Respect".parse::<CaseMatching>(), Ok(CaseMatching::Respect));
        assert_eq!(
            "upper".parse::<CaseMatching>(),
            Err(ParseError::CaseMatching("upper".to_string()))
        );
        assert_eq!(
            ParseError::CaseMatching("upper".to_string()).to_string(),
            "Unknown case matching upper, expected one of respect, ignore, smart"
        );
    }
}
