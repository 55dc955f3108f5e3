//! Session queue assembly.
//!
//! Collects a user's due cards within a scope, orders them, and truncates
//! the list to a time budget using fixed per-card costs. Priority is
//! strict: due learning cards first, then due reviews, then new intake,
//! and the walk ends at the first card that no longer fits, so due
//! learning cards are never starved by new-card intake.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::repository::CardRepository;
use crate::types::Card;

/// Estimated minutes to work through one due learning card.
pub const LEARNING_CARD_MINUTES: f64 = 2.5;
/// Estimated minutes to work through one due review card.
pub const REVIEW_CARD_MINUTES: f64 = 0.25;
/// Estimated minutes to introduce one new card.
pub const NEW_CARD_MINUTES: f64 = 2.5;

/// What portion of a user's cards a session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum SessionScope {
    Collection(Uuid),
    Category(Uuid),
    /// Cards from active collections and categories, plus orphans when
    /// the user opted in.
    General,
}

/// Prioritized, time-bounded list of cards for one sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionQueue {
    pub cards: Vec<Card>,
    pub learning_count: usize,
    pub review_count: usize,
    pub new_count: usize,
    pub total_count: usize,
    /// Whole minutes the selected cards are expected to take.
    pub estimated_time: u32,
}

impl SessionQueue {
    /// Queue with no cards and zero counts.
    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            learning_count: 0,
            review_count: 0,
            new_count: 0,
            total_count: 0,
            estimated_time: 0,
        }
    }
}

/// Assemble the session queue for an owner.
///
/// An unknown collection/category yields an empty queue rather than an
/// error; selecting a known collection/category activates it for future
/// general queries if it was inactive.
pub fn build_queue<R: CardRepository>(
    repo: &mut R,
    owner: Uuid,
    scope: &SessionScope,
    duration_minutes: u32,
    include_new: bool,
    now: DateTime<Utc>,
) -> Result<SessionQueue> {
    if duration_minutes < 1 {
        return Err(EngineError::InvalidDuration(duration_minutes));
    }

    let Some(pool) = repo.cards_in_scope(owner, scope)? else {
        return Ok(SessionQueue::empty());
    };
    if !matches!(scope, SessionScope::General) {
        repo.activate_scope(owner, scope)?;
    }

    let mut learning = Vec::new();
    let mut review = Vec::new();
    let mut fresh = Vec::new();
    for card in pool {
        if card.is_in_learning_mode {
            if card.is_due(now) {
                learning.push(card);
            } else if include_new {
                fresh.push(card);
            }
        } else if card.is_due(now) {
            review.push(card);
        }
    }
    learning.sort_by_key(|c| (c.next_review, c.learning_step));
    review.sort_by_key(|c| c.next_review);
    fresh.sort_by_key(|c| c.created_at);

    let mut remaining = f64::from(duration_minutes);
    let mut cards = Vec::new();
    let mut taken = [0usize; 3];
    let classes = [
        (learning, LEARNING_CARD_MINUTES),
        (review, REVIEW_CARD_MINUTES),
        (fresh, NEW_CARD_MINUTES),
    ];
    'walk: for (slot, (class_cards, cost)) in classes.into_iter().enumerate() {
        for card in class_cards {
            if remaining < cost {
                break 'walk;
            }
            remaining -= cost;
            taken[slot] += 1;
            cards.push(card);
        }
    }

    let estimated_time = (taken[0] as f64 * LEARNING_CARD_MINUTES
        + taken[1] as f64 * REVIEW_CARD_MINUTES
        + taken[2] as f64 * NEW_CARD_MINUTES)
        .floor() as u32;

    tracing::debug!(
        %owner,
        learning = taken[0],
        review = taken[1],
        new = taken[2],
        estimated_time,
        duration_minutes,
        "built session queue"
    );

    Ok(SessionQueue {
        total_count: cards.len(),
        cards,
        learning_count: taken[0],
        review_count: taken[1],
        new_count: taken[2],
        estimated_time,
    })
}
