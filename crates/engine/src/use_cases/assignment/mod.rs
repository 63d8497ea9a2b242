//! Starsign assignment lifecycle.
//!
//! `Unassigned -> Automatic -> ManualOverride`. Automatic assignment happens
//! once, on creation or lazily on first sheet render, and never overwrites an
//! existing record. GMs may pick, reroll or reset at any time.

mod creation;
mod manual;

use std::sync::Arc;

use starsign_domain::{
    AssignmentSource, CharacterId, CharacterSummary, Requester, StarsignRecord, TraitEntry,
    TraitTable,
};

use crate::infrastructure::app_settings::StarsignSettings;
use crate::infrastructure::ports::{CharacterRepo, ClockPort, NotificationPort};
use crate::use_cases::error::StarsignError;
use crate::use_cases::tables::{clean_entry_name, DrawTrait, ResolveTable};

pub use creation::{CreationContext, CreationOutcome, CreationPayload, SkipReason};

/// Action name used in permission notices.
pub(crate) const SET_STARSIGN: &str = "set the Starsign";

/// Assignment use cases.
pub struct AssignmentUseCases {
    characters: Arc<dyn CharacterRepo>,
    resolve: Arc<ResolveTable>,
    draw: Arc<DrawTrait>,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
    settings: Arc<StarsignSettings>,
}

impl AssignmentUseCases {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        resolve: Arc<ResolveTable>,
        draw: Arc<DrawTrait>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
        settings: Arc<StarsignSettings>,
    ) -> Self {
        Self {
            characters,
            resolve,
            draw,
            notifier,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &StarsignSettings {
        &self.settings
    }

    /// The character's record in canonical shape, or `None` when unassigned.
    ///
    /// Legacy shapes are converted in memory only; see [`Self::normalize_record`].
    pub async fn current(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<StarsignRecord>, StarsignError> {
        Ok(self
            .characters
            .get_starsign(character_id)
            .await?
            .and_then(|stored| stored.into_record()))
    }

    /// Read the record and rewrite a legacy shape to the canonical one.
    pub async fn normalize_record(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<StarsignRecord>, StarsignError> {
        let Some(stored) = self.characters.get_starsign(character_id).await? else {
            return Ok(None);
        };
        if !stored.is_legacy() {
            return Ok(stored.into_record());
        }

        let Some(record) = stored.into_record() else {
            tracing::debug!(character_id = %character_id, "Legacy starsign value is empty");
            return Ok(None);
        };
        self.characters.set_starsign(character_id, &record).await?;
        tracing::info!(
            character_id = %character_id,
            starsign = %record.name(),
            "Rewrote legacy starsign record"
        );
        Ok(Some(record))
    }

    /// Lazy fill-in: roll for a player character that still has no starsign.
    ///
    /// Returns the record the character has afterwards.
    pub async fn ensure_assigned(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<StarsignRecord>, StarsignError> {
        if let Some(record) = self.normalize_record(character_id).await? {
            return Ok(Some(record));
        }

        let character = self.character(character_id).await?;
        if !character.kind.is_player_character() {
            return Ok(None);
        }

        let record = self.roll(AssignmentSource::Automatic).await?;
        self.characters.set_starsign(character_id, &record).await?;
        tracing::info!(
            character_id = %character_id,
            starsign = %record.name(),
            "Assigned missing starsign"
        );
        Ok(Some(record))
    }

    /// Picker options for the configured table.
    pub async fn options(&self) -> Result<Vec<String>, StarsignError> {
        let table = self.configured_table().await?;
        let options = super::tables::option_names(&table);
        if options.is_empty() {
            return Err(StarsignError::not_found("RollTable", self.settings.table_name()));
        }
        Ok(options)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn character(&self, id: CharacterId) -> Result<CharacterSummary, StarsignError> {
        self.characters
            .get(id)
            .await?
            .ok_or_else(|| StarsignError::not_found("Character", id.to_string()))
    }

    async fn configured_table(&self) -> Result<TraitTable, StarsignError> {
        let name = self.settings.table_name();
        self.resolve
            .execute(name)
            .await?
            .map(|resolved| resolved.table)
            .ok_or_else(|| StarsignError::not_found("RollTable", name))
    }

    async fn draw_entry(&self) -> Result<(TraitTable, TraitEntry), StarsignError> {
        let table = self.configured_table().await?;
        let entry = self
            .draw
            .execute(&table)
            .await?
            .ok_or_else(|| StarsignError::not_found("RollTable", table.name()))?;
        Ok((table, entry))
    }

    /// Resolve, draw once and build a record. Nothing is persisted.
    async fn roll(&self, source: AssignmentSource) -> Result<StarsignRecord, StarsignError> {
        let (table, entry) = self.draw_entry().await?;
        Ok(self.record_for(&table, &entry, source))
    }

    /// Record for `entry`, named by its plain-text name. The entry id stays the
    /// durable key.
    fn record_for(
        &self,
        table: &TraitTable,
        entry: &TraitEntry,
        source: AssignmentSource,
    ) -> StarsignRecord {
        let record = StarsignRecord::from_entry(table, entry, source, self.clock.now());
        match clean_entry_name(entry.name()) {
            Some(name) => record.with_name(name),
            None => record,
        }
    }

    fn require_gm(requester: &Requester, action: &'static str) -> Result<(), StarsignError> {
        if requester.is_gm() {
            return Ok(());
        }
        tracing::warn!(user_id = %requester.user_id, action, "Rejected non-GM action");
        Err(StarsignError::permission_denied(action))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::memory::{InMemoryCharacters, InMemoryTables};
    use crate::infrastructure::notifier::RecordingNotifier;
    use crate::infrastructure::packs::PackDirectory;
    use crate::infrastructure::ports::RandomPort;
    use chrono::{TimeZone, Utc};
    use starsign_domain::{CharacterKind, DocumentId};

    pub struct Fixture {
        pub characters: Arc<InMemoryCharacters>,
        pub notifier: Arc<RecordingNotifier>,
        pub use_cases: AssignmentUseCases,
    }

    pub fn constellations() -> TraitTable {
        TraitTable::new(DocumentId::new("tblConst").unwrap(), "Constellations").with_entries(vec![
            TraitEntry::new("The Wolf Twins")
                .unwrap()
                .with_id(DocumentId::new("rowWolf").unwrap())
                .with_description("Two hearts, one hunt."),
            TraitEntry::new("The Stormbreaker")
                .unwrap()
                .with_id(DocumentId::new("rowStorm").unwrap()),
        ])
    }

    pub fn fixture(roll: u64, settings: StarsignSettings) -> Fixture {
        fixture_with(Arc::new(FixedRandom(roll)), constellations(), settings)
    }

    pub fn fixture_with(
        random: Arc<dyn RandomPort>,
        table: TraitTable,
        settings: StarsignSettings,
    ) -> Fixture {
        let characters = Arc::new(InMemoryCharacters::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let tables = Arc::new(InMemoryTables::new(random).with_table(table));
        let compendia = Arc::new(PackDirectory::from_sources(vec![]));
        let use_cases = AssignmentUseCases::new(
            characters.clone(),
            Arc::new(ResolveTable::new(
                tables.clone(),
                compendia,
                settings.search_compendia,
            )),
            Arc::new(DrawTrait::new(tables)),
            notifier.clone(),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap(),
            )),
            Arc::new(settings),
        );
        Fixture {
            characters,
            notifier,
            use_cases,
        }
    }

    pub fn settings() -> StarsignSettings {
        StarsignSettings {
            table_name: "Constellations".into(),
            ..Default::default()
        }
    }

    pub fn add_character(fixture: &Fixture, kind: CharacterKind) -> CharacterId {
        let id = CharacterId::new();
        fixture
            .characters
            .insert(CharacterSummary::new(id, "Kaela", kind));
        id
    }
}
