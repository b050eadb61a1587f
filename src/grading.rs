use serde::Serialize;

use crate::error::EngineError;
use crate::policy::{EnginePolicy, GradeBand};

/// A raw score expressed against 100. `percent` is full precision;
/// rounding is a presentation concern and never happens here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedScore {
    pub percent: f64,
    /// Set when the raw score fell outside `[0, max_score]` and was pulled
    /// back in; surfaced so callers can flag the upstream data problem.
    pub clamped: bool,
}

pub fn normalize_score(score: f64, max_score: f64) -> Result<NormalizedScore, EngineError> {
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err(EngineError::invalid_score(format!(
            "max_score must be positive, got {max_score}"
        )));
    }
    if !score.is_finite() {
        return Err(EngineError::invalid_score(format!(
            "score must be finite, got {score}"
        )));
    }

    let bounded = score.clamp(0.0, max_score);
    Ok(NormalizedScore {
        percent: bounded / max_score * 100.0,
        clamped: bounded != score,
    })
}

/// Walks the policy table top-down, first band at or below `percent` wins.
/// Callers must normalize first; anything outside `[0, 100]` is refused.
pub fn letter_for_percent(
    policy: &EnginePolicy,
    percent: f64,
) -> Result<&GradeBand, EngineError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(EngineError::out_of_range(format!(
            "percent must be within [0, 100], got {percent}"
        )));
    }
    policy
        .grade_bands
        .iter()
        .find(|band| percent >= band.min_percent)
        .ok_or_else(|| {
            EngineError::malformed_record("grade band table has no catch-all band")
        })
}

pub fn points_for_letter(policy: &EnginePolicy, letter: &str) -> Result<f64, EngineError> {
    policy
        .grade_bands
        .iter()
        .find(|band| band.letter.eq_ignore_ascii_case(letter))
        .map(|band| band.points)
        .ok_or_else(|| {
            EngineError::malformed_record(format!("unknown letter grade {letter:?}"))
        })
}
