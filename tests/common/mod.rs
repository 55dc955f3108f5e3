//! In-memory repositories for integration tests.

use std::collections::{HashMap, HashSet};

use trainer_core::{
    Card, CardRepository, SessionScope, SettingsRepository, StoreResult, TrainingSettings,
};
use uuid::Uuid;

/// In-memory card store with per-owner collections/categories and an
/// orphan opt-in flag, mirroring the scope rules a real store applies.
#[derive(Default)]
pub struct InMemoryCards {
    pub cards: Vec<Card>,
    /// (owner, collection) -> active
    pub collections: HashMap<(Uuid, Uuid), bool>,
    /// (owner, category) -> active
    pub categories: HashMap<(Uuid, Uuid), bool>,
    /// Owners who opted in to orphan cards in general sessions.
    pub orphan_opt_in: HashSet<Uuid>,
}

impl InMemoryCards {
    pub fn add_collection(&mut self, owner: Uuid, active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.collections.insert((owner, id), active);
        id
    }

    pub fn add_category(&mut self, owner: Uuid, active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.categories.insert((owner, id), active);
        id
    }

    fn in_general(&self, card: &Card) -> bool {
        if let Some(collection) = card.collection_id {
            if self
                .collections
                .get(&(card.owner, collection))
                .copied()
                .unwrap_or(false)
            {
                return true;
            }
        }
        if let Some(category) = card.category_id {
            if self
                .categories
                .get(&(card.owner, category))
                .copied()
                .unwrap_or(false)
            {
                return true;
            }
        }
        card.collection_id.is_none()
            && card.category_id.is_none()
            && self.orphan_opt_in.contains(&card.owner)
    }
}

impl CardRepository for InMemoryCards {
    fn cards_in_scope(
        &self,
        owner: Uuid,
        scope: &SessionScope,
    ) -> StoreResult<Option<Vec<Card>>> {
        let owned = self.cards.iter().filter(|c| c.owner == owner);
        let pool = match scope {
            SessionScope::Collection(id) => {
                if !self.collections.contains_key(&(owner, *id)) {
                    return Ok(None);
                }
                owned.filter(|c| c.collection_id == Some(*id)).cloned().collect()
            }
            SessionScope::Category(id) => {
                if !self.categories.contains_key(&(owner, *id)) {
                    return Ok(None);
                }
                owned.filter(|c| c.category_id == Some(*id)).cloned().collect()
            }
            SessionScope::General => owned.filter(|c| self.in_general(c)).cloned().collect(),
        };
        Ok(Some(pool))
    }

    fn activate_scope(&mut self, owner: Uuid, scope: &SessionScope) -> StoreResult<bool> {
        let slot = match scope {
            SessionScope::Collection(id) => self.collections.get_mut(&(owner, *id)),
            SessionScope::Category(id) => self.categories.get_mut(&(owner, *id)),
            SessionScope::General => None,
        };
        match slot {
            Some(active) if !*active => {
                *active = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// In-memory settings store with fetch-or-create semantics.
#[derive(Default)]
pub struct InMemorySettings {
    pub settings: HashMap<Uuid, TrainingSettings>,
}

impl SettingsRepository for InMemorySettings {
    fn fetch_or_create(&mut self, owner: Uuid) -> StoreResult<TrainingSettings> {
        Ok(self
            .settings
            .entry(owner)
            .or_insert_with(TrainingSettings::default)
            .clone())
    }

    fn save(&mut self, owner: Uuid, settings: &TrainingSettings) -> StoreResult<()> {
        self.settings.insert(owner, settings.clone());
        Ok(())
    }
}
