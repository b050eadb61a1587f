use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One row of the letter-grade table: a percentage at or above
/// `min_percent` earns `letter` and `points` on the 4.0 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBand {
    pub min_percent: f64,
    pub letter: String,
    pub points: f64,
}

impl GradeBand {
    fn new(min_percent: f64, letter: &str, points: f64) -> Self {
        Self {
            min_percent,
            letter: letter.to_string(),
            points,
        }
    }
}

/// Every threshold the engine consults, in one injectable struct.
/// Constructed once and passed everywhere; no call site carries its own
/// cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnginePolicy {
    /// Ordered highest cutoff first; the first band whose `min_percent`
    /// the percentage meets wins. The last band must sit at 0 so every
    /// valid percentage lands somewhere.
    pub grade_bands: Vec<GradeBand>,
    /// Whole days before the deadline still reported as `DueSoon`.
    pub due_soon_window_days: i64,
    pub deans_list_min_gpa: f64,
    pub good_standing_min_gpa: f64,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            grade_bands: vec![
                GradeBand::new(97.0, "A+", 4.0),
                GradeBand::new(93.0, "A", 4.0),
                GradeBand::new(90.0, "A-", 3.7),
                GradeBand::new(87.0, "B+", 3.3),
                GradeBand::new(83.0, "B", 3.0),
                GradeBand::new(80.0, "B-", 2.7),
                GradeBand::new(77.0, "C+", 2.3),
                GradeBand::new(73.0, "C", 2.0),
                GradeBand::new(70.0, "C-", 1.7),
                GradeBand::new(67.0, "D+", 1.3),
                GradeBand::new(63.0, "D", 1.0),
                GradeBand::new(60.0, "D-", 0.7),
                GradeBand::new(0.0, "F", 0.0),
            ],
            due_soon_window_days: 3,
            deans_list_min_gpa: 3.7,
            good_standing_min_gpa: 2.0,
        }
    }
}

impl EnginePolicy {
    /// Injected tables are checked before use: a mis-ordered or
    /// non-monotonic table would silently break the first-match walk.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.grade_bands.is_empty() {
            return Err(EngineError::malformed_record("grade band table is empty"));
        }

        for band in &self.grade_bands {
            if !band.min_percent.is_finite()
                || !(0.0..=100.0).contains(&band.min_percent)
            {
                return Err(EngineError::malformed_record(format!(
                    "band {} has min_percent {} outside [0, 100]",
                    band.letter, band.min_percent
                )));
            }
            if !band.points.is_finite() || band.points < 0.0 {
                return Err(EngineError::malformed_record(format!(
                    "band {} has negative points {}",
                    band.letter, band.points
                )));
            }
            if band.letter.trim().is_empty() {
                return Err(EngineError::malformed_record(
                    "band with empty letter label",
                ));
            }
        }

        for pair in self.grade_bands.windows(2) {
            if pair[1].min_percent >= pair[0].min_percent {
                return Err(EngineError::malformed_record(format!(
                    "bands {} and {} are not in descending cutoff order",
                    pair[0].letter, pair[1].letter
                )));
            }
            // Monotonicity: a higher percentage may never earn fewer points.
            if pair[1].points > pair[0].points {
                return Err(EngineError::malformed_record(format!(
                    "band {} awards more points than the band above it",
                    pair[1].letter
                )));
            }
        }

        match self.grade_bands.last() {
            Some(last) if last.min_percent == 0.0 => {}
            _ => {
                return Err(EngineError::malformed_record(
                    "last grade band must have min_percent 0 as the catch-all",
                ));
            }
        }

        if self.due_soon_window_days < 1 {
            return Err(EngineError::malformed_record(format!(
                "due_soon_window_days must be at least 1, got {}",
                self.due_soon_window_days
            )));
        }
        if !self.deans_list_min_gpa.is_finite()
            || !self.good_standing_min_gpa.is_finite()
            || self.deans_list_min_gpa < self.good_standing_min_gpa
        {
            return Err(EngineError::malformed_record(
                "standing cutoffs must be finite with deans_list >= good_standing",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        EnginePolicy::default()
            .validate()
            .expect("default policy validates");
    }

    #[test]
    fn rejects_out_of_order_bands() {
        let mut policy = EnginePolicy::default();
        policy.grade_bands.swap(0, 1);
        let err = policy.validate().expect_err("swapped bands");
        assert_eq!(err.code, "malformed_record");
    }

    #[test]
    fn rejects_non_monotonic_points() {
        let mut policy = EnginePolicy::default();
        // D- now out-earns D.
        policy.grade_bands[11].points = 1.5;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn rejects_missing_catch_all() {
        let mut policy = EnginePolicy::default();
        policy.grade_bands.pop();
        assert!(policy.validate().is_err());
    }

    #[test]
    fn round_trips_through_json_config() {
        let policy = EnginePolicy::default();
        let raw = serde_json::to_string(&policy).expect("serialize policy");
        let back: EnginePolicy = serde_json::from_str(&raw).expect("parse policy");
        assert_eq!(back, policy);
    }
}
