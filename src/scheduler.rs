//! Per-card answer processing.
//!
//! Adaptive SM-2 variant with two states, learning and review. Learning
//! drills a card at short minute offsets until it graduates to long-term
//! review; a lapse in review sends it back. Every answer also feeds the
//! retention statistics and, at a cadence, the calibration controller.
//!
//! The engine is synchronous and holds no shared state: the caller loads
//! the card and the owner's settings, invokes [`process_answer`], and
//! persists both afterwards. Concurrent answers against the same card or
//! the same user's settings must be serialized by the caller (row lock,
//! compare-and-swap, or a per-user writer).

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::calibration;
use crate::error::{EngineError, Result};
use crate::types::{Answer, Card, TrainingSettings};

/// What an answer did to a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub new_interval: u32,
    pub new_ease_factor: f64,
    pub next_review: DateTime<Utc>,
    pub entered_learning_mode: bool,
    pub exited_learning_mode: bool,
    pub learning_step: i32,
    /// Whether this answer triggered a calibration run.
    pub calibrated: bool,
}

/// Process one answer, mutating the card and the owner's settings
/// statistics in place (and possibly `interval_modifier`, when the answer
/// lands on a calibration boundary).
///
/// `time_spent_ms` is carried for the caller's review log only; it does
/// not influence scheduling.
pub fn process_answer(
    card: &mut Card,
    answer: Answer,
    settings: &mut TrainingSettings,
    time_spent_ms: Option<u32>,
    now: DateTime<Utc>,
) -> AnswerOutcome {
    let mut entered_learning_mode = false;
    let mut exited_learning_mode = false;

    if card.is_in_learning_mode {
        exited_learning_mode = answer_learning(card, answer, settings, now);
    } else {
        entered_learning_mode = answer_review(card, answer, settings, now);
    }

    match answer {
        Answer::Again => {
            card.lapses += 1;
            card.consecutive_lapses += 1;
        }
        _ => card.consecutive_lapses = 0,
    }

    // A run of lapses beyond the threshold always lands in learning mode.
    // Review-Again already re-enters; this covers the forcing condition
    // explicitly.
    if lapse_threshold_reached(card, settings) && !card.is_in_learning_mode {
        card.enter_learning(settings, now);
        entered_learning_mode = true;
    }

    card.last_review = Some(now);

    settings.total_reviews += 1;
    if answer.is_successful() {
        settings.successful_reviews += 1;
    }
    let calibrated = calibration::calibrate(settings).calibrated;

    tracing::debug!(
        card_id = %card.id,
        answer = answer.to_value(),
        interval = card.interval,
        learning_step = card.learning_step,
        time_spent_ms,
        calibrated,
        "processed answer"
    );

    AnswerOutcome {
        new_interval: card.interval,
        new_ease_factor: card.ease_factor,
        next_review: card.next_review,
        entered_learning_mode,
        exited_learning_mode,
        learning_step: card.learning_step,
        calibrated,
    }
}

/// Validating entry point for callers holding a raw numeric grade.
/// Rejects grades outside 0-3 before any mutation.
pub fn process_answer_value(
    card: &mut Card,
    grade: u8,
    settings: &mut TrainingSettings,
    time_spent_ms: Option<u32>,
    now: DateTime<Utc>,
) -> Result<AnswerOutcome> {
    let answer = Answer::from_value(grade).ok_or(EngineError::InvalidAnswer(grade))?;
    Ok(process_answer(card, answer, settings, time_spent_ms, now))
}

/// Whether the card's lapse run has hit the configured threshold.
pub fn lapse_threshold_reached(card: &Card, settings: &TrainingSettings) -> bool {
    card.consecutive_lapses >= settings.lapse_threshold
}

/// Learning-mode branch. Returns whether the card graduated.
fn answer_learning(
    card: &mut Card,
    answer: Answer,
    settings: &TrainingSettings,
    now: DateTime<Utc>,
) -> bool {
    let steps = settings.effective_learning_steps();
    let current = (card.learning_step.max(0) as usize).min(steps.len() - 1);

    match answer {
        Answer::Again => {
            card.learning_step = 0;
            card.ease_factor =
                settings.clamp_ease(card.ease_factor - settings.ease_again_delta.abs());
            card.next_review = now + step_offset(steps[0]);
            false
        }
        Answer::Hard => {
            // Stays on the current step, including the final one.
            card.ease_factor = settings.clamp_ease(card.ease_factor + settings.ease_hard_delta);
            card.next_review = now + step_offset(steps[current]);
            false
        }
        Answer::Good => {
            let next = current + 1;
            if next >= steps.len() {
                graduate(card, settings.graduating_interval, now);
                true
            } else {
                card.learning_step = next as i32;
                card.next_review = now + step_offset(steps[next]);
                false
            }
        }
        Answer::Easy => {
            card.ease_factor = settings.clamp_ease(card.ease_factor + settings.ease_easy_delta);
            graduate(card, settings.easy_interval, now);
            true
        }
    }
}

/// Review-mode branch. Returns whether the card lapsed back into learning.
fn answer_review(
    card: &mut Card,
    answer: Answer,
    settings: &TrainingSettings,
    now: DateTime<Utc>,
) -> bool {
    if answer == Answer::Again {
        // Lapse: back to learning at step 0. The stored interval is left
        // untouched until the card graduates again.
        let steps = settings.effective_learning_steps();
        card.ease_factor =
            settings.clamp_ease(card.ease_factor - settings.ease_again_delta.abs());
        card.repetitions = 0;
        card.is_in_learning_mode = true;
        card.learning_step = 0;
        card.next_review = now + step_offset(steps[0]);
        return true;
    }

    let ease_delta = match answer {
        Answer::Hard => settings.ease_hard_delta,
        Answer::Easy => settings.ease_easy_delta,
        // Good; Again handled above.
        _ => settings.ease_good_delta,
    };
    card.ease_factor = settings.clamp_ease(card.ease_factor + ease_delta);

    let multiplier = match answer {
        Answer::Hard => settings.hard_interval_modifier,
        Answer::Easy => card.ease_factor * settings.easy_bonus,
        _ => card.ease_factor,
    };
    card.interval = next_review_interval(card.interval, multiplier, settings);
    if answer.is_successful() {
        card.repetitions += 1;
    }
    card.next_review = now + Duration::days(i64::from(card.interval));
    false
}

/// Ease-weighted interval with the minimum-increment floor: long-term
/// intervals grow by at least one day, and a card that was never
/// scheduled long-term starts at the graduating interval.
fn next_review_interval(previous: u32, multiplier: f64, settings: &TrainingSettings) -> u32 {
    let scaled = (f64::from(previous) * multiplier * settings.interval_modifier).floor() as u32;
    let minimum = if previous == 0 {
        settings.graduating_interval
    } else {
        previous + 1
    };
    scaled.max(minimum)
}

fn graduate(card: &mut Card, interval: u32, now: DateTime<Utc>) {
    card.is_in_learning_mode = false;
    card.learning_step = -1;
    card.interval = interval;
    card.repetitions += 1;
    card.next_review = now + Duration::days(i64::from(interval));
}

fn step_offset(minutes: u32) -> Duration {
    Duration::minutes(i64::from(minutes))
}
