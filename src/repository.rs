//! Collaborator contracts the engine depends on but does not implement.
//!
//! Backing stores (SQL, key-value, in-memory) live with the caller; the
//! engine only needs scoped card fetches, scope activation, and per-user
//! settings access. Updates to cards and settings are persisted by the
//! caller after each engine call, under whatever transactional discipline
//! the store provides.

use uuid::Uuid;

use crate::error::StoreError;
use crate::queue::SessionScope;
use crate::types::{Card, TrainingSettings};

/// Result type alias for repository operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Card fetches and scope bookkeeping.
pub trait CardRepository {
    /// All of the owner's cards in the given scope.
    ///
    /// Returns `Ok(None)` when the scope names a collection or category
    /// the owner does not have. For [`SessionScope::General`] the store
    /// supplies cards from active collections and categories, plus orphan
    /// cards when the user opted in.
    fn cards_in_scope(
        &self,
        owner: Uuid,
        scope: &SessionScope,
    ) -> StoreResult<Option<Vec<Card>>>;

    /// Mark a collection/category scope active for future general
    /// queries. Returns whether the scope was newly activated; the
    /// general scope is always a no-op `false`.
    fn activate_scope(&mut self, owner: Uuid, scope: &SessionScope) -> StoreResult<bool>;
}

/// Per-user settings access.
pub trait SettingsRepository {
    /// Fetch the owner's settings, creating them with defaults on first
    /// access.
    fn fetch_or_create(&mut self, owner: Uuid) -> StoreResult<TrainingSettings>;

    /// Persist the owner's settings.
    fn save(&mut self, owner: Uuid, settings: &TrainingSettings) -> StoreResult<()>;
}
