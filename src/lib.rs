//! Spaced-repetition scheduling engine for the vocabulary trainer.
//!
//! Provides:
//! - Adaptive SM-2 card scheduler (`process_answer`)
//! - Retention calibration controller (`should_calibrate` / `calibrate`)
//! - Time-budgeted session queue builder (`build_queue`)
//! - Shared types (Card, TrainingSettings, Answer, ...)
//!
//! The engine is pure computation plus in-place mutation: callers load
//! card and settings state, invoke an operation, and persist the result
//! through their own store (see [`repository`]). Nothing here blocks,
//! spawns, or talks to the network.

pub mod calibration;
pub mod error;
pub mod queue;
pub mod repository;
pub mod scheduler;
pub mod types;

pub use calibration::{calibrate, should_calibrate, CalibrationOutcome};
pub use error::{EngineError, Result, StoreError};
pub use queue::{
    build_queue, SessionQueue, SessionScope, LEARNING_CARD_MINUTES, NEW_CARD_MINUTES,
    REVIEW_CARD_MINUTES,
};
pub use repository::{CardRepository, SettingsRepository, StoreResult};
pub use scheduler::{
    lapse_threshold_reached, process_answer, process_answer_value, AnswerOutcome,
};
pub use types::{
    AgeGroup, Answer, Card, CardKind, TrainingSettings, DEFAULT_LEARNING_STEPS, MAX_EASE_FACTOR,
};
