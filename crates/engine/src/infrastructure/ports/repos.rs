//! Repository port traits for document and table access.

use async_trait::async_trait;
use starsign_domain::{
    CharacterId, CharacterSummary, DocumentId, PackId, StarsignEffect, StarsignRecord,
    StoredStarsign, TraitEntry, TraitTable,
};

use super::error::RepoError;
use super::types::{IndexEntry, PackInfo, PackKind};

// =============================================================================
// Document Store
// =============================================================================

/// Character documents and their starsign flag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSummary>, RepoError>;

    /// Raw flag value, in whatever shape it was stored.
    async fn get_starsign(&self, id: CharacterId) -> Result<Option<StoredStarsign>, RepoError>;
    async fn set_starsign(&self, id: CharacterId, record: &StarsignRecord)
        -> Result<(), RepoError>;
    async fn clear_starsign(&self, id: CharacterId) -> Result<(), RepoError>;
}

/// Effect records attached to characters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EffectRepo: Send + Sync {
    /// Effects on a character whose slug starts with `prefix`.
    async fn list_by_slug_prefix(
        &self,
        character_id: CharacterId,
        prefix: &str,
    ) -> Result<Vec<StarsignEffect>, RepoError>;

    async fn attach(
        &self,
        character_id: CharacterId,
        effect: &StarsignEffect,
    ) -> Result<(), RepoError>;

    /// Persist changes to an already attached effect.
    async fn save(&self, character_id: CharacterId, effect: &StarsignEffect)
        -> Result<(), RepoError>;
}

// =============================================================================
// Table Store
// =============================================================================

/// Session/world-scoped tables and the draw capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableRepo: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<TraitTable>, RepoError>;

    /// One weighted random draw. `None` when the table yields nothing.
    async fn draw(&self, table: &TraitTable) -> Result<Option<TraitEntry>, RepoError>;
}

/// Secondary read-only collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompendiumRepo: Send + Sync {
    async fn list_packs(&self, kind: PackKind) -> Result<Vec<PackInfo>, RepoError>;
    async fn get_index(&self, pack: &PackId) -> Result<Vec<IndexEntry>, RepoError>;
    async fn get_table(
        &self,
        pack: &PackId,
        id: &DocumentId,
    ) -> Result<Option<TraitTable>, RepoError>;
    async fn get_effect(
        &self,
        pack: &PackId,
        id: &DocumentId,
    ) -> Result<Option<StarsignEffect>, RepoError>;
}
