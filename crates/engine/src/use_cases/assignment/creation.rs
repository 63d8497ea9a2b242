//! Automatic assignment while a character is being created.
//!
//! The drawn record is written into the creation payload so it lands with
//! the first save of the character.

use serde::{Deserialize, Serialize};
use starsign_domain::{
    AssignmentSource, CharacterId, CharacterKind, StarsignRecord, StoredStarsign, UserId,
};

use super::AssignmentUseCases;
use crate::use_cases::error::StarsignError;

/// Who triggered the creation and who is running this hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationContext {
    /// User whose client is handling the event
    pub current_user: UserId,
    /// User who issued the create request
    pub originating_user: UserId,
}

impl CreationContext {
    pub fn is_originator(&self) -> bool {
        self.current_user == self.originating_user
    }
}

/// The character document about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationPayload {
    /// Set when the host already knows the id (e.g. re-import)
    pub character_id: Option<CharacterId>,
    pub name: String,
    pub kind: CharacterKind,
    /// Starsign value supplied by a template or importer
    pub starsign: Option<StoredStarsign>,
}

impl CreationPayload {
    pub fn new(name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            character_id: None,
            name: name.into(),
            kind,
            starsign: None,
        }
    }

    fn has_starsign(&self) -> bool {
        self.starsign
            .clone()
            .and_then(StoredStarsign::into_record)
            .is_some()
    }
}

/// Why the creation hook left the payload alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AutoAssignDisabled,
    NotPlayerCharacter,
    OtherUser,
    AlreadyAssigned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    Assigned(StarsignRecord),
    Skipped(SkipReason),
}

impl AssignmentUseCases {
    /// Roll a starsign into a character that is being created.
    ///
    /// # Returns
    /// * `Ok(CreationOutcome::Assigned)` - The payload now carries the record
    /// * `Ok(CreationOutcome::Skipped)` - Nothing to do, payload untouched
    /// * `Err(StarsignError)` - Table missing or empty, payload untouched
    pub async fn on_character_creating(
        &self,
        context: &CreationContext,
        payload: &mut CreationPayload,
    ) -> Result<CreationOutcome, StarsignError> {
        if let Some(reason) = self.skip_reason(context, payload).await? {
            tracing::debug!(character = %payload.name, ?reason, "Skipping automatic starsign");
            return Ok(CreationOutcome::Skipped(reason));
        }

        let record = self.roll(AssignmentSource::Automatic).await?;
        payload.starsign = Some(StoredStarsign::from(record.clone()));
        tracing::info!(
            character = %payload.name,
            starsign = %record.name(),
            "Assigned starsign on creation"
        );
        Ok(CreationOutcome::Assigned(record))
    }

    async fn skip_reason(
        &self,
        context: &CreationContext,
        payload: &CreationPayload,
    ) -> Result<Option<SkipReason>, StarsignError> {
        if !self.settings.auto_assign {
            return Ok(Some(SkipReason::AutoAssignDisabled));
        }
        if !payload.kind.is_player_character() {
            return Ok(Some(SkipReason::NotPlayerCharacter));
        }
        if !context.is_originator() {
            return Ok(Some(SkipReason::OtherUser));
        }
        if payload.has_starsign() {
            return Ok(Some(SkipReason::AlreadyAssigned));
        }
        if let Some(id) = payload.character_id {
            if self.current(id).await?.is_some() {
                return Ok(Some(SkipReason::AlreadyAssigned));
            }
        }
        Ok(None)
    }
}
