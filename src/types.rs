//! Core types for the training engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Built-in learning steps (minutes), used when a user's list is empty.
pub const DEFAULT_LEARNING_STEPS: [u32; 2] = [2, 10];

/// Upper bound on any card's ease factor.
pub const MAX_EASE_FACTOR: f64 = 5.0;

/// Answer grade for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Again,
    Hard,
    Good,
    Easy,
}

impl Answer {
    /// Convert to numeric grade (0-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 1,
            Self::Good => 2,
            Self::Easy => 3,
        }
    }

    /// Create from numeric grade (0-3).
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Again),
            1 => Some(Self::Hard),
            2 => Some(Self::Good),
            3 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Whether the answer counts toward the retention statistics.
    pub fn is_successful(self) -> bool {
        matches!(self, Self::Good | Self::Easy)
    }
}

/// Trainable facet of a vocabulary item. A word may own several cards,
/// one per kind; the normal facet is created alongside its word, the
/// others on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Normal,
    Inverted,
    Cloze,
    Empty,
}

impl Default for CardKind {
    fn default() -> Self {
        Self::Normal
    }
}

/// Age bracket used to pick starting defaults for a new user's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Child,
    Adult,
}

impl Default for AgeGroup {
    fn default() -> Self {
        Self::Adult
    }
}

/// Per-user parameterization of the scheduler, plus rolling statistics.
///
/// Every field except the statistics block (`total_reviews`,
/// `successful_reviews`, `last_calibration_at`) is user-tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    pub starting_ease: f64,
    pub min_ease_factor: f64,
    pub ease_again_delta: f64,
    pub ease_hard_delta: f64,
    pub ease_good_delta: f64,
    pub ease_easy_delta: f64,
    /// Global interval multiplier, nudged by calibration within [0.5, 2.0].
    pub interval_modifier: f64,
    pub hard_interval_modifier: f64,
    pub easy_bonus: f64,
    /// Intra-session step offsets in minutes. An empty list falls back to
    /// [`DEFAULT_LEARNING_STEPS`].
    pub learning_steps: Vec<u32>,
    /// Interval (days) assigned when a card graduates via Good.
    pub graduating_interval: u32,
    /// Interval (days) assigned when a card graduates via Easy.
    pub easy_interval: u32,
    /// Consecutive lapses that force a card back into learning mode.
    pub lapse_threshold: u32,
    /// Reviews between calibration runs.
    pub calibration_interval: u32,
    /// Long-run success rate the calibration controller steers toward.
    pub target_retention: f64,
    pub total_reviews: u64,
    pub successful_reviews: u64,
    /// Value of `total_reviews` when calibration last ran.
    pub last_calibration_at: u64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self::for_age_group(AgeGroup::Adult)
    }
}

impl TrainingSettings {
    /// Starting defaults for a new user in the given age bracket.
    ///
    /// Children get gentler learning steps and a lower retention target;
    /// the algorithm parameters are otherwise shared.
    pub fn for_age_group(age_group: AgeGroup) -> Self {
        let (learning_steps, target_retention) = match age_group {
            AgeGroup::Child => (vec![1, 5, 10], 0.85),
            AgeGroup::Adult => (DEFAULT_LEARNING_STEPS.to_vec(), 0.90),
        };

        Self {
            starting_ease: 2.5,
            min_ease_factor: 1.3,
            ease_again_delta: -0.20,
            ease_hard_delta: -0.15,
            ease_good_delta: 0.0,
            ease_easy_delta: 0.15,
            interval_modifier: 1.0,
            hard_interval_modifier: 1.2,
            easy_bonus: 1.3,
            learning_steps,
            graduating_interval: 1,
            easy_interval: 4,
            lapse_threshold: 4,
            calibration_interval: 50,
            target_retention,
            total_reviews: 0,
            successful_reviews: 0,
            last_calibration_at: 0,
        }
    }

    /// Restore every tunable field to the defaults for `age_group`,
    /// preserving the statistics block.
    pub fn reset_to_defaults(&mut self, age_group: AgeGroup) {
        let mut fresh = Self::for_age_group(age_group);
        fresh.total_reviews = self.total_reviews;
        fresh.successful_reviews = self.successful_reviews;
        fresh.last_calibration_at = self.last_calibration_at;
        *self = fresh;
    }

    /// Learning steps with the empty-list fallback applied.
    pub fn effective_learning_steps(&self) -> &[u32] {
        if self.learning_steps.is_empty() {
            &DEFAULT_LEARNING_STEPS
        } else {
            &self.learning_steps
        }
    }

    /// Clamp an ease factor to `[min_ease_factor, 5.0]`.
    pub fn clamp_ease(&self, ease: f64) -> f64 {
        ease.clamp(self.min_ease_factor, MAX_EASE_FACTOR)
    }
}

/// One trainable facet of a word, carrying its full scheduling state.
///
/// A card is always in exactly one of two states: learning mode
/// (`is_in_learning_mode`, `learning_step >= 0`) or long-term review
/// (`learning_step == -1`). Mutation happens through the scheduler or the
/// explicit mode toggles; the engine never deletes a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub owner: Uuid,
    pub word_id: Uuid,
    pub kind: CardKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub ease_factor: f64,
    /// Days until the next long-term review; 0 means never scheduled
    /// long-term.
    pub interval: u32,
    pub repetitions: u32,
    pub lapses: u32,
    pub consecutive_lapses: u32,
    pub is_in_learning_mode: bool,
    /// Index into the learning steps, or -1 outside learning mode.
    pub learning_step: i32,
    pub next_review: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Fresh card in learning mode at step 0, due immediately.
    pub fn new(
        owner: Uuid,
        word_id: Uuid,
        kind: CardKind,
        settings: &TrainingSettings,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            word_id,
            kind,
            collection_id: None,
            category_id: None,
            ease_factor: settings.clamp_ease(settings.starting_ease),
            interval: 0,
            repetitions: 0,
            lapses: 0,
            consecutive_lapses: 0,
            is_in_learning_mode: true,
            learning_step: 0,
            next_review: now,
            last_review: None,
            created_at: now,
        }
    }

    /// Manually push the card into learning mode at step 0, due after the
    /// first learning step.
    pub fn enter_learning(&mut self, settings: &TrainingSettings, now: DateTime<Utc>) {
        let steps = settings.effective_learning_steps();
        self.is_in_learning_mode = true;
        self.learning_step = 0;
        self.next_review = now + Duration::minutes(i64::from(steps[0]));
    }

    /// Manually promote the card to long-term review, due after its
    /// current interval (or the graduating interval if it has none yet).
    pub fn exit_learning(&mut self, settings: &TrainingSettings, now: DateTime<Utc>) {
        if self.interval == 0 {
            self.interval = settings.graduating_interval;
        }
        self.is_in_learning_mode = false;
        self.learning_step = -1;
        self.next_review = now + Duration::days(i64::from(self.interval));
    }

    /// Whether the card is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}
