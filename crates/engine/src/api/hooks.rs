//! Host entry points.
//!
//! A host adapter calls these from its own event hooks. Every failure is
//! recovered here: it is logged, its notice (if any) is posted, and the host
//! gets a plain value back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use starsign_domain::{CharacterId, Notice, Requester, StarsignEffect, StarsignRecord};

use crate::app::App;
use crate::infrastructure::ports::CharacterRepo;
use crate::use_cases::messages::post_notice;
use crate::use_cases::{CreationContext, CreationOutcome, CreationPayload, SheetView, StarsignError};

/// An explicit user action on a character's starsign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ManualAction {
    /// List the picker options
    ListOptions,
    Pick { selection: String },
    Reroll,
    Reset,
    /// Spend one use of the starsign power
    UsePower,
    /// Restore the power's uses
    RestorePower,
    /// Restore the power's uses if its schedule rolled over
    RechargeIfDue,
    /// Bring the badge icon in line with the remaining uses
    SyncBadge,
    /// Announce the starsign and attach its effect
    ApplyEffect,
}

/// What a manual action produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Options { names: Vec<String> },
    Assigned { record: StarsignRecord },
    Cleared,
    PowerUsed { remaining: u32, exhausted: bool },
    PowerRestored { restored: bool },
    BadgeSynced { changed: bool },
    EffectApplied { effect: StarsignEffect },
    Failed { notice: Option<Notice> },
}

/// Hook facade over the application.
#[derive(Clone)]
pub struct StarsignHooks {
    app: Arc<App>,
}

impl StarsignHooks {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    /// A character is about to be created.
    ///
    /// Returns `None` when the assignment failed; the payload is then untouched.
    pub async fn on_character_creating(
        &self,
        context: &CreationContext,
        payload: &mut CreationPayload,
    ) -> Option<CreationOutcome> {
        match self
            .app
            .use_cases
            .assignment
            .on_character_creating(context, payload)
            .await
        {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.recover("on_character_creating", e).await;
                None
            }
        }
    }

    /// A character sheet is being shown to `viewer`.
    ///
    /// Returns `None` for characters that carry no starsign row, such as NPCs.
    pub async fn on_sheet_rendering(
        &self,
        viewer: &Requester,
        character_id: CharacterId,
    ) -> Option<SheetView> {
        let character = match self.app.repositories.character.get(character_id).await {
            Ok(Some(character)) => character,
            Ok(None) => {
                tracing::debug!(character_id = %character_id, "Sheet for unknown character");
                return None;
            }
            Err(e) => {
                self.recover("on_sheet_rendering", e.into()).await;
                return None;
            }
        };
        if !character.kind.is_player_character() {
            return None;
        }

        let assignment = &self.app.use_cases.assignment;
        let record = if self.app.settings.fill_missing_on_render {
            assignment.ensure_assigned(character_id).await
        } else {
            assignment.normalize_record(character_id).await
        };
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                self.recover("on_sheet_rendering", e).await;
                None
            }
        };

        Some(SheetView::build(record.as_ref(), viewer))
    }

    /// A user triggered `action` on a character.
    pub async fn on_manual_action(
        &self,
        requester: &Requester,
        character_id: CharacterId,
        action: ManualAction,
    ) -> ActionOutcome {
        tracing::debug!(
            user_id = %requester.user_id,
            character_id = %character_id,
            ?action,
            "Manual starsign action"
        );
        match self.dispatch(requester, character_id, action).await {
            Ok(outcome) => outcome,
            Err(e) => ActionOutcome::Failed {
                notice: self.recover("on_manual_action", e).await,
            },
        }
    }

    async fn dispatch(
        &self,
        requester: &Requester,
        character_id: CharacterId,
        action: ManualAction,
    ) -> Result<ActionOutcome, StarsignError> {
        let assignment = &self.app.use_cases.assignment;
        let power = &self.app.use_cases.power;

        Ok(match action {
            ManualAction::ListOptions => ActionOutcome::Options {
                names: assignment.options().await?,
            },
            ManualAction::Pick { selection } => ActionOutcome::Assigned {
                record: assignment.pick(requester, character_id, &selection).await?,
            },
            ManualAction::Reroll => ActionOutcome::Assigned {
                record: assignment.reroll(requester, character_id).await?,
            },
            ManualAction::Reset => {
                assignment.reset(requester, character_id).await?;
                ActionOutcome::Cleared
            }
            ManualAction::UsePower => {
                let spent = power.decrement(character_id).await?;
                ActionOutcome::PowerUsed {
                    remaining: spent.remaining,
                    exhausted: spent.exhausted,
                }
            }
            ManualAction::RestorePower => ActionOutcome::PowerRestored {
                restored: power.reset(character_id).await?,
            },
            ManualAction::RechargeIfDue => ActionOutcome::PowerRestored {
                restored: power.reset_if_due(character_id).await?,
            },
            ManualAction::SyncBadge => ActionOutcome::BadgeSynced {
                changed: power.sync_visibility(character_id).await?,
            },
            ManualAction::ApplyEffect => {
                let record = assignment
                    .normalize_record(character_id)
                    .await?
                    .ok_or_else(|| StarsignError::not_found("Starsign", character_id.to_string()))?;
                ActionOutcome::EffectApplied {
                    effect: power
                        .activate_and_apply_effect(character_id, &record)
                        .await?,
                }
            }
        })
    }

    async fn recover(&self, operation: &'static str, err: StarsignError) -> Option<Notice> {
        let notice = err.notice();
        match &notice {
            Some(notice) => {
                tracing::warn!(operation, error = %err, "Starsign action failed");
                post_notice(self.app.notifier.as_ref(), notice.clone()).await;
            }
            None => tracing::error!(operation, error = %err, "Starsign action failed"),
        }
        notice
    }
}
