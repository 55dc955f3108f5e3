//! Retention calibration.
//!
//! A proportional controller with a dead band: every `calibration_interval`
//! reviews, the observed success rate is compared against the user's
//! target retention and the global `interval_modifier` is nudged 5% in the
//! correcting direction. The dead band (±5 points around target) keeps
//! noisy short windows from causing oscillation.

use serde::Serialize;

use crate::types::TrainingSettings;

/// Dead band around the retention target, in rate points.
pub const CALIBRATION_DEAD_BAND: f64 = 0.05;
/// Relative adjustment applied to the interval modifier per calibration.
pub const CALIBRATION_STEP: f64 = 0.05;
/// Bounds on the calibrated interval modifier.
pub const MIN_INTERVAL_MODIFIER: f64 = 0.5;
pub const MAX_INTERVAL_MODIFIER: f64 = 2.0;

/// Result of a calibration check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationOutcome {
    /// Whether the check actually ran (it was due and reviews exist).
    pub calibrated: bool,
    pub old_modifier: f64,
    pub new_modifier: f64,
    pub success_rate: f64,
    pub target_rate: f64,
}

/// True iff a full calibration window has elapsed since the last run.
pub fn should_calibrate(settings: &TrainingSettings) -> bool {
    settings.total_reviews.saturating_sub(settings.last_calibration_at)
        >= u64::from(settings.calibration_interval)
}

/// Run the calibration check, adjusting `interval_modifier` when the
/// success rate leaves the dead band. Whenever the check runs, the window
/// restarts (`last_calibration_at = total_reviews`), even if the modifier
/// was left unchanged.
pub fn calibrate(settings: &mut TrainingSettings) -> CalibrationOutcome {
    let old_modifier = settings.interval_modifier;
    let target_rate = settings.target_retention;

    if !should_calibrate(settings) || settings.total_reviews == 0 {
        return CalibrationOutcome {
            calibrated: false,
            old_modifier,
            new_modifier: old_modifier,
            success_rate: 0.0,
            target_rate,
        };
    }

    let success_rate = settings.successful_reviews as f64 / settings.total_reviews as f64;
    let new_modifier = if success_rate < target_rate - CALIBRATION_DEAD_BAND {
        // Forgetting too much: shrink intervals.
        (old_modifier * (1.0 - CALIBRATION_STEP)).max(MIN_INTERVAL_MODIFIER)
    } else if success_rate > target_rate + CALIBRATION_DEAD_BAND {
        // Retention above target: intervals can lengthen.
        (old_modifier * (1.0 + CALIBRATION_STEP)).min(MAX_INTERVAL_MODIFIER)
    } else {
        old_modifier
    };

    settings.interval_modifier = new_modifier;
    settings.last_calibration_at = settings.total_reviews;

    if (new_modifier - old_modifier).abs() > f64::EPSILON {
        tracing::info!(
            old_modifier,
            new_modifier,
            success_rate,
            target_rate,
            "calibrated interval modifier"
        );
    }

    CalibrationOutcome {
        calibrated: true,
        old_modifier,
        new_modifier,
        success_rate,
        target_rate,
    }
}
