//! Spending and restoring starsign power uses.

use starsign_domain::{Announcement, CharacterId, Decremented, DomainError, Notice};

use super::PowerUseCases;
use crate::use_cases::error::StarsignError;
use crate::use_cases::messages::{post_announcement, post_notice};

impl PowerUseCases {
    /// Spend one use of the character's starsign power.
    ///
    /// At zero uses nothing changes and `AlreadyExhausted` is returned.
    /// Otherwise the badge drops by one, the icon follows `current > 0`, an
    /// activation message is posted, and reaching zero adds an exhausted notice.
    pub async fn decrement(&self, character_id: CharacterId) -> Result<Decremented, StarsignError> {
        let character = self.character(character_id).await?;
        let mut effect = self.require_effect(character_id).await?;

        let spent = match effect.badge_mut().decrement() {
            Ok(spent) => spent,
            Err(DomainError::Exhausted { .. }) => {
                tracing::warn!(
                    character_id = %character_id,
                    effect = %effect.name(),
                    "No uses remaining"
                );
                return Err(StarsignError::AlreadyExhausted {
                    effect: effect.name().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        effect.set_token_icon_visible(spent.remaining > 0);
        self.effects.save(character_id, &effect).await?;
        tracing::info!(
            character_id = %character_id,
            effect = %effect.name(),
            remaining = spent.remaining,
            "Starsign power used"
        );

        post_announcement(
            self.notifier.as_ref(),
            Announcement::activation(character.name.as_str(), effect.name()),
        )
        .await;
        if spent.exhausted {
            post_notice(
                self.notifier.as_ref(),
                Notice::info(format!("{} power exhausted for the day.", effect.name())),
            )
            .await;
        }
        Ok(spent)
    }

    /// Restore the counter to its max. A no-op when already full.
    ///
    /// Returns whether anything was restored.
    pub async fn reset(&self, character_id: CharacterId) -> Result<bool, StarsignError> {
        let mut effect = self.require_effect(character_id).await?;
        if !effect.badge_mut().reset() {
            tracing::debug!(character_id = %character_id, "Starsign power already full");
            return Ok(false);
        }

        effect.set_token_icon_visible(true);
        effect.mark_recharged(self.clock.now());
        self.effects.save(character_id, &effect).await?;
        tracing::info!(character_id = %character_id, effect = %effect.name(), "Starsign power restored");

        post_notice(
            self.notifier.as_ref(),
            Notice::info(format!("{} power restored!", effect.name())),
        )
        .await;
        Ok(true)
    }

    /// Restore the counter when its recharge schedule has rolled over.
    ///
    /// The recharge time is stamped even when the counter was already full,
    /// so the next check waits for the following boundary.
    pub async fn reset_if_due(&self, character_id: CharacterId) -> Result<bool, StarsignError> {
        let now = self.clock.now();
        let effect = self.require_effect(character_id).await?;
        if !effect.is_recharge_due(now) {
            return Ok(false);
        }

        if effect.badge().is_full() {
            let mut effect = effect;
            effect.mark_recharged(now);
            self.effects.save(character_id, &effect).await?;
            return Ok(false);
        }
        self.reset(character_id).await
    }
}
