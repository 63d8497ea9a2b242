//! Starsign power use cases.
//!
//! The uses counter lives on the character's attached starsign effect as its
//! badge. The token icon is shown while uses remain.

mod apply;
mod counter;

use std::sync::Arc;

use starsign_domain::{CharacterId, CharacterSummary, StarsignEffect, StoredStarsign};

use crate::infrastructure::app_settings::StarsignSettings;
use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, CompendiumRepo, EffectRepo, NotificationPort, RandomPort,
};
use crate::use_cases::error::StarsignError;

/// Container for power/badge use cases.
pub struct PowerUseCases {
    characters: Arc<dyn CharacterRepo>,
    effects: Arc<dyn EffectRepo>,
    compendia: Arc<dyn CompendiumRepo>,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    settings: Arc<StarsignSettings>,
}

impl PowerUseCases {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        effects: Arc<dyn EffectRepo>,
        compendia: Arc<dyn CompendiumRepo>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        settings: Arc<StarsignSettings>,
    ) -> Self {
        Self {
            characters,
            effects,
            compendia,
            notifier,
            clock,
            random,
            settings,
        }
    }

    /// The character's starsign effect, if one is attached.
    ///
    /// When several are attached (a reroll followed by another apply), the one
    /// derived from the current starsign wins.
    pub async fn starsign_effect(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<StarsignEffect>, StarsignError> {
        let mut carried = self
            .effects
            .list_by_slug_prefix(character_id, &self.settings.effect_slug_prefix)
            .await?;
        if carried.len() <= 1 {
            return Ok(carried.pop());
        }

        let current = self
            .characters
            .get_starsign(character_id)
            .await?
            .and_then(StoredStarsign::into_record);
        let position = current
            .as_ref()
            .and_then(|record| carried.iter().position(|e| e.is_derived_from(record.name())))
            .unwrap_or(0);
        Ok(Some(carried.swap_remove(position)))
    }

    /// Write visibility := `current > 0` when it differs from what is stored.
    ///
    /// Returns whether anything was written.
    pub async fn sync_visibility(&self, character_id: CharacterId) -> Result<bool, StarsignError> {
        let mut effect = self.require_effect(character_id).await?;
        let visible = effect.badge().is_visible();
        if effect.token_icon_visible() == visible {
            return Ok(false);
        }

        effect.set_token_icon_visible(visible);
        self.effects.save(character_id, &effect).await?;
        tracing::debug!(
            character_id = %character_id,
            effect = %effect.name(),
            visible,
            "Synced badge visibility"
        );
        Ok(true)
    }

    async fn character(&self, id: CharacterId) -> Result<CharacterSummary, StarsignError> {
        self.characters
            .get(id)
            .await?
            .ok_or_else(|| StarsignError::not_found("Character", id.to_string()))
    }

    async fn require_effect(
        &self,
        character_id: CharacterId,
    ) -> Result<StarsignEffect, StarsignError> {
        self.starsign_effect(character_id).await?.ok_or_else(|| {
            tracing::debug!(character_id = %character_id, "No starsign effect attached");
            StarsignError::not_found("Starsign effect", character_id.to_string())
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, SequenceRandom};
    use crate::infrastructure::memory::InMemoryCharacters;
    use crate::infrastructure::notifier::RecordingNotifier;
    use crate::infrastructure::packs::PackDirectory;
    use chrono::{DateTime, TimeZone, Utc};
    use starsign_domain::{CharacterKind, DocumentId, PackId, PowerCounter};

    pub const EFFECTS: &str = concat!(
        r#"{"_id":"effWolf","name":"The Wolf Twins","type":"effect","img":"icons/wolf.webp","system":{"slug":"starsign-wolf-twins","badge":{"value":3,"max":3}}}"#,
        "\n",
        r#"{"_id":"effStorm","name":"The Stormbreaker","type":"effect","system":{"badge":{"value":1,"max":1}}}"#,
        "\n"
    );

    pub struct Fixture {
        pub characters: Arc<InMemoryCharacters>,
        pub notifier: Arc<RecordingNotifier>,
        pub character_id: CharacterId,
        pub use_cases: PowerUseCases,
    }

    pub fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap()
    }

    pub fn fixture_at(now: DateTime<Utc>, packs: Vec<(PackId, Result<String, String>)>) -> Fixture {
        let characters = Arc::new(InMemoryCharacters::new());
        let character_id = CharacterId::new();
        characters.insert(CharacterSummary::new(
            character_id,
            "Kaela",
            CharacterKind::Character,
        ));
        let notifier = Arc::new(RecordingNotifier::new());
        let use_cases = PowerUseCases::new(
            characters.clone(),
            characters.clone(),
            Arc::new(PackDirectory::from_sources(packs)),
            notifier.clone(),
            Arc::new(FixedClock(now)),
            Arc::new(SequenceRandom::new([0])),
            Arc::new(StarsignSettings::default()),
        );
        Fixture {
            characters,
            notifier,
            character_id,
            use_cases,
        }
    }

    pub fn fixture() -> Fixture {
        fixture_at(
            monday(),
            vec![(PackId::new("starsign-effects").unwrap(), Ok(EFFECTS.to_string()))],
        )
    }

    /// Attach a wolf-twins effect with the given counter.
    pub async fn attach(fx: &Fixture, current: u32, max: u32) -> StarsignEffect {
        let mut effect = StarsignEffect::new(
            DocumentId::new("attached").unwrap(),
            "The Wolf Twins",
            PowerCounter::new(current, max).unwrap(),
        );
        effect.mark_recharged(monday());
        fx.characters.attach(fx.character_id, &effect).await.unwrap();
        effect
    }
}
