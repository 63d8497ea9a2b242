//! Starsign effects - the status effect derived from a starsign.
//!
//! Effect definitions live in a read-only collection; a character carries an
//! attached copy whose badge is the limited-use power counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::DocumentId;
use crate::value_objects::{PowerCounter, RechargeSchedule};

/// Slug prefix shared by every starsign effect.
pub const STARSIGN_SLUG_PREFIX: &str = "starsign-";

/// A starsign-derived effect, either as a definition or attached to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarsignEffect {
    id: DocumentId,
    name: String,
    slug: String,
    description: Option<String>,
    img: Option<String>,
    badge: PowerCounter,
    /// Whether the token icon is currently shown
    token_icon_visible: bool,
    #[serde(default)]
    recharge: RechargeSchedule,
    /// When the badge was last restored (or first attached)
    #[serde(default)]
    last_recharged: Option<DateTime<Utc>>,
    /// Key of the definition this copy was made from
    source_id: Option<String>,
}

impl StarsignEffect {
    /// Create an effect with a full badge. The slug is derived from the name.
    pub fn new(id: DocumentId, name: impl Into<String>, badge: PowerCounter) -> Self {
        let name = name.into().trim().to_string();
        let slug = slugify(STARSIGN_SLUG_PREFIX, &name);
        let token_icon_visible = badge.is_visible();
        Self {
            id,
            name,
            slug,
            description: None,
            img: None,
            badge,
            token_icon_visible,
            recharge: RechargeSchedule::default(),
            last_recharged: None,
            source_id: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = Some(img.into());
        self
    }

    pub fn with_recharge(mut self, recharge: RechargeSchedule) -> Self {
        self.recharge = recharge;
        self
    }

    pub fn with_token_icon_visible(mut self, visible: bool) -> Self {
        self.token_icon_visible = visible;
        self
    }

    /// Copy of a definition ready to be attached to a character.
    ///
    /// The counter starts full and the icon visible.
    pub fn attached_copy(&self, id: DocumentId, source_id: impl Into<String>) -> Self {
        let badge = PowerCounter::full(self.badge.max());
        Self {
            id,
            badge,
            token_icon_visible: badge.is_visible(),
            source_id: Some(source_id.into()),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn img(&self) -> Option<&str> {
        self.img.as_deref()
    }

    pub fn badge(&self) -> PowerCounter {
        self.badge
    }

    pub fn badge_mut(&mut self) -> &mut PowerCounter {
        &mut self.badge
    }

    pub fn token_icon_visible(&self) -> bool {
        self.token_icon_visible
    }

    pub fn set_token_icon_visible(&mut self, visible: bool) {
        self.token_icon_visible = visible;
    }

    pub fn recharge(&self) -> RechargeSchedule {
        self.recharge
    }

    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    pub fn last_recharged(&self) -> Option<DateTime<Utc>> {
        self.last_recharged
    }

    pub fn mark_recharged(&mut self, at: DateTime<Utc>) {
        self.last_recharged = Some(at);
    }

    /// Whether the recharge schedule has rolled over since the last recharge.
    ///
    /// An effect that was never stamped is always due.
    pub fn is_recharge_due(&self, now: DateTime<Utc>) -> bool {
        self.last_recharged
            .map_or(true, |last| self.recharge.is_due(last, now))
    }

    /// Whether this effect carries the given slug prefix.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.slug.starts_with(prefix)
    }

    /// Prepend `prefix` to the slug unless it already starts with it.
    pub fn ensure_slug_prefix(&mut self, prefix: &str) {
        if !self.has_prefix(prefix) {
            self.slug = format!("{prefix}{}", self.slug);
        }
    }

    /// Whether this effect was derived from the starsign with `trait_name`.
    pub fn is_derived_from(&self, trait_name: &str) -> bool {
        self.name == trait_name.trim()
    }
}

/// Lowercase, dash-separated slug with `prefix` prepended.
pub fn slugify(prefix: &str, name: &str) -> String {
    let body = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    format!("{prefix}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> StarsignEffect {
        StarsignEffect::new(
            DocumentId::new("def01").unwrap(),
            "The Wolf Twins",
            PowerCounter::new(0, 2).unwrap(),
        )
        .with_description("Call your twin.")
    }

    #[test]
    fn slug_is_derived_from_name() {
        assert_eq!(definition().slug(), "starsign-the-wolf-twins");
        assert_eq!(slugify("starsign-", "  Storm--Breaker! "), "starsign-storm-breaker");
    }

    #[test]
    fn attached_copy_starts_full() {
        let copy = definition().attached_copy(DocumentId::new("eff01").unwrap(), "def01");
        assert_eq!(copy.badge(), PowerCounter::full(2));
        assert!(copy.token_icon_visible());
        assert_eq!(copy.source_id(), Some("def01"));
        assert_eq!(copy.id().as_str(), "eff01");
        assert_eq!(copy.description(), Some("Call your twin."));
    }

    #[test]
    fn recharge_due_follows_schedule() {
        use chrono::TimeZone;
        let monday = Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap();

        let mut effect = definition();
        assert!(effect.is_recharge_due(monday));

        effect.mark_recharged(monday);
        assert!(!effect.is_recharge_due(monday));
        assert!(effect.is_recharge_due(tuesday));

        let manual = effect.with_recharge(RechargeSchedule::Manual);
        assert!(!manual.is_recharge_due(tuesday));
    }

    #[test]
    fn slug_prefix_is_added_once() {
        let mut effect = definition().with_slug("effect-wolf-twins");
        effect.ensure_slug_prefix("starsign-");
        assert_eq!(effect.slug(), "starsign-effect-wolf-twins");

        effect.ensure_slug_prefix("starsign-");
        assert_eq!(effect.slug(), "starsign-effect-wolf-twins");
    }

    #[test]
    fn derived_match_uses_trait_name() {
        let effect = definition();
        assert!(effect.is_derived_from("The Wolf Twins"));
        assert!(!effect.is_derived_from("The Stormbreaker"));
        assert!(effect.has_prefix(STARSIGN_SLUG_PREFIX));
    }
}
