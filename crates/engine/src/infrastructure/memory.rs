//! In-memory document and table stores.
//!
//! Used by the CLI for world-scoped tables and by scenario tests as a
//! stand-in for the host's document model.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use starsign_domain::{
    CharacterId, CharacterSummary, StarsignEffect, StarsignRecord, StoredStarsign, TraitEntry,
    TraitTable,
};

use crate::infrastructure::ports::{CharacterRepo, EffectRepo, RandomPort, RepoError, TableRepo};

#[derive(Debug, Clone)]
struct CharacterDocument {
    summary: CharacterSummary,
    starsign: Option<StoredStarsign>,
    effects: Vec<StarsignEffect>,
}

/// Characters with their starsign flag and attached effects.
#[derive(Default)]
pub struct InMemoryCharacters {
    documents: DashMap<CharacterId, CharacterDocument>,
}

impl InMemoryCharacters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, summary: CharacterSummary) {
        self.documents.insert(
            summary.id,
            CharacterDocument {
                summary,
                starsign: None,
                effects: Vec::new(),
            },
        );
    }

    /// Seed a raw flag value, e.g. a legacy shape written by an older revision.
    pub fn insert_stored(&self, id: CharacterId, stored: StoredStarsign) -> Result<(), RepoError> {
        let mut doc = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        doc.starsign = Some(stored);
        Ok(())
    }

    /// Raw flag value as currently stored.
    pub fn stored(&self, id: CharacterId) -> Option<StoredStarsign> {
        self.documents.get(&id).and_then(|doc| doc.starsign.clone())
    }

    pub fn effects(&self, id: CharacterId) -> Vec<StarsignEffect> {
        self.documents
            .get(&id)
            .map(|doc| doc.effects.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacters {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSummary>, RepoError> {
        Ok(self.documents.get(&id).map(|doc| doc.summary.clone()))
    }

    async fn get_starsign(&self, id: CharacterId) -> Result<Option<StoredStarsign>, RepoError> {
        Ok(self.stored(id))
    }

    async fn set_starsign(
        &self,
        id: CharacterId,
        record: &StarsignRecord,
    ) -> Result<(), RepoError> {
        self.insert_stored(id, StoredStarsign::Current(record.clone()))
    }

    async fn clear_starsign(&self, id: CharacterId) -> Result<(), RepoError> {
        let mut doc = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))?;
        doc.starsign = None;
        Ok(())
    }
}

#[async_trait]
impl EffectRepo for InMemoryCharacters {
    async fn list_by_slug_prefix(
        &self,
        character_id: CharacterId,
        prefix: &str,
    ) -> Result<Vec<StarsignEffect>, RepoError> {
        Ok(self
            .effects(character_id)
            .into_iter()
            .filter(|effect| effect.has_prefix(prefix))
            .collect())
    }

    async fn attach(
        &self,
        character_id: CharacterId,
        effect: &StarsignEffect,
    ) -> Result<(), RepoError> {
        let mut doc = self
            .documents
            .get_mut(&character_id)
            .ok_or_else(|| RepoError::not_found("Character", character_id))?;
        doc.effects.push(effect.clone());
        Ok(())
    }

    async fn save(
        &self,
        character_id: CharacterId,
        effect: &StarsignEffect,
    ) -> Result<(), RepoError> {
        let mut doc = self
            .documents
            .get_mut(&character_id)
            .ok_or_else(|| RepoError::not_found("Character", character_id))?;
        let slot = doc
            .effects
            .iter_mut()
            .find(|existing| existing.id() == effect.id())
            .ok_or_else(|| RepoError::not_found("Effect", effect.id()))?;
        *slot = effect.clone();
        Ok(())
    }
}

/// World-scoped tables; draws are weighted by entry ranges.
pub struct InMemoryTables {
    tables: Vec<TraitTable>,
    random: Arc<dyn RandomPort>,
}

impl InMemoryTables {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self {
            tables: Vec::new(),
            random,
        }
    }

    pub fn with_table(mut self, table: TraitTable) -> Self {
        self.tables.push(table);
        self
    }
}

#[async_trait]
impl TableRepo for InMemoryTables {
    async fn find_by_name(&self, name: &str) -> Result<Option<TraitTable>, RepoError> {
        Ok(self.tables.iter().find(|t| t.name() == name).cloned())
    }

    async fn draw(&self, table: &TraitTable) -> Result<Option<TraitEntry>, RepoError> {
        let total = table.total_weight();
        if total == 0 {
            return Ok(None);
        }
        let roll = self.random.gen_range(0, total - 1);
        Ok(table.select_weighted(roll).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use starsign_domain::{CharacterKind, DocumentId, PowerCounter};

    fn constellations() -> TraitTable {
        TraitTable::new(DocumentId::new("tbl").unwrap(), "Constellations").with_entries(vec![
            TraitEntry::new("The Wolf Twins").unwrap(),
            TraitEntry::new("The Stormbreaker").unwrap(),
        ])
    }

    #[tokio::test]
    async fn draw_uses_the_random_roll() {
        let tables = InMemoryTables::new(Arc::new(FixedRandom(1))).with_table(constellations());
        let table = tables.find_by_name("Constellations").await.unwrap().unwrap();
        let entry = tables.draw(&table).await.unwrap().unwrap();
        assert_eq!(entry.name(), "The Stormbreaker");
    }

    #[tokio::test]
    async fn draw_on_empty_table_is_none() {
        let tables = InMemoryTables::new(Arc::new(FixedRandom(0)));
        let empty = TraitTable::new(DocumentId::new("e").unwrap(), "Empty");
        assert!(tables.draw(&empty).await.unwrap().is_none());
        assert!(tables.find_by_name("Empty").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn effects_are_filtered_by_prefix_and_saved_in_place() {
        let characters = InMemoryCharacters::new();
        let id = CharacterId::new();
        characters.insert(CharacterSummary::new(id, "Kaela", CharacterKind::Character));

        let effect = StarsignEffect::new(
            DocumentId::new("eff").unwrap(),
            "The Wolf Twins",
            PowerCounter::full(2),
        );
        let other = StarsignEffect::new(
            DocumentId::new("other").unwrap(),
            "Frightened",
            PowerCounter::full(1),
        )
        .with_slug("frightened");
        characters.attach(id, &effect).await.unwrap();
        characters.attach(id, &other).await.unwrap();

        let found = characters.list_by_slug_prefix(id, "starsign-").await.unwrap();
        assert_eq!(found.len(), 1);

        let mut spent = found[0].clone();
        spent.badge_mut().decrement().unwrap();
        characters.save(id, &spent).await.unwrap();
        assert_eq!(characters.effects(id)[0].badge().current(), 1);
    }

    #[tokio::test]
    async fn unknown_character_is_not_found() {
        let characters = InMemoryCharacters::new();
        let err = characters.clear_starsign(CharacterId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
