//! Announce a starsign and attach the effect it grants.

use starsign_domain::{Announcement, CharacterId, DocumentId, StarsignEffect, StarsignRecord};

use super::PowerUseCases;
use crate::infrastructure::ports::PackKind;
use crate::use_cases::error::StarsignError;
use crate::use_cases::messages::post_announcement;

impl PowerUseCases {
    /// Announce `starsign` and attach a copy of its effect definition.
    ///
    /// # Returns
    /// * `Ok(StarsignEffect)` - The newly attached effect
    /// * `Err(AlreadyApplied)` - The character already carries the effect
    /// * `Err(NotFound)` - Effect collection or definition missing
    /// * `Err(CollectionUnavailable)` - The effect collection could not be read
    pub async fn activate_and_apply_effect(
        &self,
        character_id: CharacterId,
        starsign: &StarsignRecord,
    ) -> Result<StarsignEffect, StarsignError> {
        let character = self.character(character_id).await?;

        post_announcement(
            self.notifier.as_ref(),
            Announcement::starsign(
                character.name.as_str(),
                starsign.name(),
                starsign.description(),
                starsign.img(),
            ),
        )
        .await;

        let carried = self
            .effects
            .list_by_slug_prefix(character_id, &self.settings.effect_slug_prefix)
            .await?;
        if carried.iter().any(|e| e.is_derived_from(starsign.name())) {
            tracing::info!(
                character_id = %character_id,
                starsign = %starsign.name(),
                "Starsign effect already applied"
            );
            return Err(StarsignError::AlreadyApplied {
                effect: starsign.name().to_string(),
            });
        }

        let definition = self.find_definition(starsign.name()).await?;
        let uuid = self.random.gen_uuid().simple().to_string();
        let id = DocumentId::new(uuid)?;
        let source_id = format!(
            "Compendium.{}.{}",
            self.settings.effect_pack,
            definition.id()
        );
        let mut effect = definition.attached_copy(id, source_id);
        effect.ensure_slug_prefix(&self.settings.effect_slug_prefix);
        effect.mark_recharged(self.clock.now());

        self.effects.attach(character_id, &effect).await?;
        tracing::info!(
            character_id = %character_id,
            effect = %effect.name(),
            uses = effect.badge().max(),
            "Attached starsign effect"
        );
        Ok(effect)
    }

    /// Look up the effect definition named `name` in the effect collection.
    async fn find_definition(&self, name: &str) -> Result<StarsignEffect, StarsignError> {
        let pack_name = self.settings.effect_pack.as_str();
        let pack = self
            .compendia
            .list_packs(PackKind::Item)
            .await?
            .into_iter()
            .find(|p| p.id.as_str() == pack_name)
            .ok_or_else(|| {
                tracing::error!(pack = pack_name, "Effect collection not found");
                StarsignError::not_found("Compendium", pack_name)
            })?;

        let index = self
            .compendia
            .get_index(&pack.id)
            .await
            .map_err(|e| StarsignError::from_pack(&pack.id, e))?;
        let hit = index
            .into_iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| {
                tracing::warn!(pack = pack_name, effect = name, "No effect definition");
                StarsignError::not_found("Starsign effect", name)
            })?;

        self.compendia
            .get_effect(&pack.id, &hit.id)
            .await
            .map_err(|e| StarsignError::from_pack(&pack.id, e))?
            .ok_or_else(|| StarsignError::not_found("Starsign effect", name))
    }
}
