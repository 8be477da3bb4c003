use crate::constants::*;
use crate::{PcrError, Result};

/// Search parameters.
///
/// Defaults match the classic me-PCR settings. Bounds are checked by
/// [`validate`](Self::validate), which [`MerPcr::new`](crate::MerPcr::new)
/// calls before anything else runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Seed width in bases (3..=16).
    pub wordsize: usize,
    /// Allowed deviation from the expected amplicon size (0..=10000).
    pub margin: usize,
    /// Mismatches tolerated per primer outside the 3' zone (0..=10).
    pub mismatches: usize,
    /// Number of 3'-ward primer bases in which no mismatch is allowed.
    pub three_prime_match: usize,
    /// Compare IUPAC ambiguity symbols by set intersection.
    pub iupac: bool,
    /// Amplicon size for markers whose size field is missing or unparsable (1..=10000).
    pub default_pcr_size: usize,
    /// Requested parallelism per sequence (≥ 1).
    pub threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            wordsize: DEFAULT_WORDSIZE,
            margin: DEFAULT_MARGIN,
            mismatches: DEFAULT_MISMATCHES,
            three_prime_match: DEFAULT_THREE_PRIME_MATCH,
            iupac: false,
            default_pcr_size: DEFAULT_PCR_SIZE,
            threads: DEFAULT_THREADS,
        }
    }
}

impl SearchConfig {
    /// Fails on the first out-of-bounds parameter.
    pub fn validate(&self) -> Result<()> {
        check_range!(self.wordsize, MIN_WORDSIZE, MAX_WORDSIZE, PcrError::WordSizeOutOfRange);
        check_range!(self.mismatches, MIN_MISMATCHES, MAX_MISMATCHES, PcrError::MismatchesOutOfRange);
        check_range!(self.margin, MIN_MARGIN, MAX_MARGIN, PcrError::MarginOutOfRange);
        check_range!(self.default_pcr_size, MIN_PCR_SIZE, MAX_PCR_SIZE, PcrError::DefaultPcrSizeOutOfRange);
        if self.threads == 0 {
            return Err(PcrError::NoThreads);
        }
        Ok(())
    }
}
