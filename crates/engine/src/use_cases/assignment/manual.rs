//! GM-only manual transitions: pick, reroll and reset.

use starsign_domain::{AssignmentSource, CharacterId, Notice, Requester, StarsignRecord};

use super::{AssignmentUseCases, SET_STARSIGN};
use crate::use_cases::error::StarsignError;
use crate::use_cases::messages::post_notice;
use crate::use_cases::tables::find_option;

impl AssignmentUseCases {
    /// Set the starsign to the entry named `selection`. Always overrides.
    pub async fn pick(
        &self,
        requester: &Requester,
        character_id: CharacterId,
        selection: &str,
    ) -> Result<StarsignRecord, StarsignError> {
        Self::require_gm(requester, SET_STARSIGN)?;
        self.character(character_id).await?;

        let table = self.configured_table().await?;
        let entry = find_option(&table, selection).ok_or_else(|| {
            tracing::warn!(selection, table = %table.name(), "No entry with that name");
            StarsignError::not_found("Starsign", selection.trim())
        })?;

        let record = self.record_for(&table, entry, AssignmentSource::Manual);
        self.persist(character_id, record).await
    }

    /// Draw again and overwrite whatever is stored.
    pub async fn reroll(
        &self,
        requester: &Requester,
        character_id: CharacterId,
    ) -> Result<StarsignRecord, StarsignError> {
        Self::require_gm(requester, SET_STARSIGN)?;
        self.character(character_id).await?;

        let record = self.roll(AssignmentSource::Manual).await?;
        self.persist(character_id, record).await
    }

    /// Remove the record, returning the character to unassigned.
    pub async fn reset(
        &self,
        requester: &Requester,
        character_id: CharacterId,
    ) -> Result<(), StarsignError> {
        Self::require_gm(requester, "reset the Starsign")?;
        self.character(character_id).await?;

        self.characters.clear_starsign(character_id).await?;
        tracing::info!(character_id = %character_id, "Cleared starsign");
        Ok(())
    }

    async fn persist(
        &self,
        character_id: CharacterId,
        record: StarsignRecord,
    ) -> Result<StarsignRecord, StarsignError> {
        self.characters.set_starsign(character_id, &record).await?;
        tracing::info!(
            character_id = %character_id,
            starsign = %record.name(),
            "Starsign set manually"
        );
        post_notice(
            self.notifier.as_ref(),
            Notice::info(format!("Starsign set to {}", record.name())),
        )
        .await;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::test_support::*;
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use starsign_domain::{
        AssignmentState, CharacterKind, DocumentId, TraitEntry, TraitTable, UserId,
    };

    #[tokio::test]
    async fn gm_pick_overrides_and_notifies() {
        let fx = fixture(0, settings());
        let id = add_character(&fx, CharacterKind::Character);
        fx.use_cases.ensure_assigned(id).await.unwrap();

        let gm = Requester::gm(UserId::new());
        let record = fx
            .use_cases
            .pick(&gm, id, "The Stormbreaker")
            .await
            .unwrap();

        assert_eq!(record.name(), "The Stormbreaker");
        assert_eq!(record.entry_id().unwrap().as_str(), "rowStorm");
        let current = fx.use_cases.current(id).await.unwrap();
        assert_eq!(
            AssignmentState::of(current.as_ref()),
            AssignmentState::ManualOverride
        );
        assert_eq!(
            fx.notifier.notices().await,
            vec![Notice::info("Starsign set to The Stormbreaker")]
        );
    }

    #[tokio::test]
    async fn marked_up_entry_is_stored_by_plain_name() {
        let table = TraitTable::new(DocumentId::new("tblConst").unwrap(), "Constellations")
            .with_entries(vec![TraitEntry::new("<em>The Wolf Twins</em>")
                .unwrap()
                .with_id(DocumentId::new("rowWolf").unwrap())]);
        let fx = fixture_with(Arc::new(FixedRandom(0)), table, settings());
        let id = add_character(&fx, CharacterKind::Character);
        let gm = Requester::gm(UserId::new());

        let picked = fx.use_cases.pick(&gm, id, "The Wolf Twins").await.unwrap();
        assert_eq!(picked.name(), "The Wolf Twins");
        assert_eq!(picked.entry_id().unwrap().as_str(), "rowWolf");

        let rerolled = fx.use_cases.reroll(&gm, id).await.unwrap();
        assert_eq!(rerolled.name(), "The Wolf Twins");
        assert_eq!(
            fx.notifier.notices().await,
            vec![
                Notice::info("Starsign set to The Wolf Twins"),
                Notice::info("Starsign set to The Wolf Twins"),
            ]
        );
    }

    #[tokio::test]
    async fn non_gm_pick_is_denied_and_record_unchanged() {
        let fx = fixture(0, settings());
        let id = add_character(&fx, CharacterKind::Character);
        let before = fx.use_cases.ensure_assigned(id).await.unwrap();

        let player = Requester::player(UserId::new());
        let err = fx
            .use_cases
            .pick(&player, id, "The Stormbreaker")
            .await
            .unwrap_err();

        assert!(matches!(err, StarsignError::PermissionDenied { .. }));
        assert_eq!(
            err.notice().unwrap().message,
            "Only GMs can set the Starsign."
        );
        assert_eq!(fx.use_cases.current(id).await.unwrap(), before);
        assert!(fx.notifier.notices().await.is_empty());
    }

    #[tokio::test]
    async fn pick_unknown_name_is_not_found() {
        let fx = fixture(0, settings());
        let id = add_character(&fx, CharacterKind::Character);

        let err = fx
            .use_cases
            .pick(&Requester::gm(UserId::new()), id, "The Lantern")
            .await
            .unwrap_err();
        assert!(matches!(err, StarsignError::NotFound { kind: "Starsign", .. }));
        assert!(fx.use_cases.current(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reroll_always_overwrites() {
        let fx = fixture(1, settings());
        let id = add_character(&fx, CharacterKind::Character);
        let gm = Requester::gm(UserId::new());
        fx.use_cases.pick(&gm, id, "The Wolf Twins").await.unwrap();

        let rerolled = fx.use_cases.reroll(&gm, id).await.unwrap();
        assert_eq!(rerolled.name(), "The Stormbreaker");
        assert_eq!(rerolled.source(), AssignmentSource::Manual);

        let again = fx.use_cases.reroll(&gm, id).await.unwrap();
        assert_eq!(again.name(), "The Stormbreaker");
        assert_eq!(fx.notifier.notices().await.len(), 3);
    }

    #[tokio::test]
    async fn reset_returns_to_unassigned() {
        let fx = fixture(0, settings());
        let id = add_character(&fx, CharacterKind::Character);
        fx.use_cases.ensure_assigned(id).await.unwrap();

        let player = Requester::player(UserId::new());
        assert!(fx.use_cases.reset(&player, id).await.is_err());
        assert!(fx.use_cases.current(id).await.unwrap().is_some());

        fx.use_cases
            .reset(&Requester::gm(UserId::new()), id)
            .await
            .unwrap();
        let current = fx.use_cases.current(id).await.unwrap();
        assert_eq!(AssignmentState::of(current.as_ref()), AssignmentState::Unassigned);
    }

    #[tokio::test]
    async fn manual_actions_on_unknown_character_fail() {
        let fx = fixture(0, settings());
        let err = fx
            .use_cases
            .reroll(&Requester::gm(UserId::new()), CharacterId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StarsignError::NotFound { kind: "Character", .. }));
    }
}
