//! Compatibility scoring.
//!
//! The derived score is a pure function of two interest sets; the fallback
//! bands exist only so profiles without a remote score still render a
//! plausible number.  Provenance is carried in [`CompatibilityScore`] so the
//! two can never be confused downstream.

use std::collections::HashSet;

use rand::Rng;

use crate::constants::{MATCH_BAND, SUGGESTION_BAND};
use crate::types::{CompatibilityScore, Interest, ScoreSource};

/// Which fallback band to draw from when the remote omits a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackBand {
    /// Established matches read higher.
    Match,
    /// Cold suggestions read lower.
    Suggestion,
}

/// Share of `theirs` that also appears in `mine`, as an integer percentage.
///
/// Deterministic and independent of input ordering.  An empty `theirs` set
/// scores 0 (the divisor is clamped to 1, never a division by zero).
pub fn score_from_common_interests(mine: &[Interest], theirs: &[Interest]) -> u8 {
    let my_names: HashSet<&str> = mine.iter().map(|i| i.name.as_str()).collect();
    let common = theirs
        .iter()
        .filter(|t| my_names.contains(t.name.as_str()))
        .count();
    let total = theirs.len().max(1);

    let score = ((common as f64 / total as f64) * 100.0).round() as u64;
    score.min(100) as u8
}

/// Random value from the given display band, inclusive on both ends.
pub fn fallback_score(band: FallbackBand) -> u8 {
    let (lo, hi) = match band {
        FallbackBand::Match => MATCH_BAND,
        FallbackBand::Suggestion => SUGGESTION_BAND,
    };
    rand::thread_rng().gen_range(lo..=hi)
}

/// Turn an optional remote fraction into a displayable score.
///
/// A remote fraction must be strictly positive to count as supplied; the
/// service encodes "unknown" as 0.
pub fn display_score(remote: Option<f64>, band: FallbackBand) -> CompatibilityScore {
    match remote {
        Some(fraction) if fraction > 0.0 => CompatibilityScore {
            value: ((fraction * 100.0).round() as u64).min(100) as u8,
            source: ScoreSource::Remote,
        },
        _ => CompatibilityScore {
            value: fallback_score(band),
            source: ScoreSource::Fallback,
        },
    }
}
