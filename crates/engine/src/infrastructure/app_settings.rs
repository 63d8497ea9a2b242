//! Starsign settings.
//!
//! One explicit settings object is built at startup (defaults, then
//! environment overrides) and handed to the use cases at construction.
//! `settings_metadata()` describes every field so a host adapter can
//! register them in its own settings UI.

use serde::{Deserialize, Serialize};

/// Table drawn from when no table name is configured.
pub const DEFAULT_TABLE_NAME: &str = "The Constellations of the Mythborn";

/// Collection searched for effect definitions.
pub const DEFAULT_EFFECT_PACK: &str = "starsign-effects";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarsignSettings {
    /// Roll a starsign once when a player character is created
    pub auto_assign: bool,
    /// Name of the draw table
    pub table_name: String,
    /// Also search read-only collections when the table is not in the world
    pub search_compendia: bool,
    /// Roll for characters that still have no starsign when their sheet is shown
    pub fill_missing_on_render: bool,
    /// Collection holding the effect definitions
    pub effect_pack: String,
    /// Slug prefix identifying starsign effects on a character
    pub effect_slug_prefix: String,
    /// Badge max used when an effect definition carries none
    pub default_uses: u32,
}

impl Default for StarsignSettings {
    fn default() -> Self {
        Self {
            auto_assign: true,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            search_compendia: true,
            fill_missing_on_render: false,
            effect_pack: DEFAULT_EFFECT_PACK.to_string(),
            effect_slug_prefix: starsign_domain::STARSIGN_SLUG_PREFIX.to_string(),
            default_uses: 1,
        }
    }
}

impl StarsignSettings {
    /// Load from `STARSIGN_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            auto_assign: bool_or(&lookup, "STARSIGN_AUTO_ASSIGN", defaults.auto_assign),
            table_name: lookup("STARSIGN_TABLE_NAME").unwrap_or(defaults.table_name),
            search_compendia: bool_or(
                &lookup,
                "STARSIGN_SEARCH_COMPENDIA",
                defaults.search_compendia,
            ),
            fill_missing_on_render: bool_or(
                &lookup,
                "STARSIGN_FILL_MISSING",
                defaults.fill_missing_on_render,
            ),
            effect_pack: lookup("STARSIGN_EFFECT_PACK").unwrap_or(defaults.effect_pack),
            effect_slug_prefix: lookup("STARSIGN_EFFECT_SLUG_PREFIX")
                .map(|v| v.trim().to_string())
                .filter(|prefix| !prefix.is_empty())
                .unwrap_or(defaults.effect_slug_prefix),
            default_uses: lookup("STARSIGN_DEFAULT_USES")
                .and_then(|v| v.trim().parse().ok())
                .filter(|uses: &u32| *uses > 0)
                .unwrap_or(defaults.default_uses),
        }
    }

    /// The configured table name, or the default when blank.
    pub fn table_name(&self) -> &str {
        let name = self.table_name.trim();
        if name.is_empty() {
            DEFAULT_TABLE_NAME
        } else {
            name
        }
    }
}

fn bool_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        other => {
            tracing::warn!(key, value = other, default, "Unrecognised boolean setting, using default");
            default
        }
    }
}

/// Settings field metadata for UI rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsFieldMetadata {
    /// Field key (matches JSON field name)
    pub key: String,
    /// Display name for UI
    pub display_name: String,
    /// Description/help text
    pub description: String,
    /// Field type: "boolean", "string", "integer"
    pub field_type: String,
    /// Default value
    pub default_value: serde_json::Value,
    /// Whether the setting is shown in the host's configuration dialog
    pub config: bool,
}

/// Get metadata for all settings fields
pub fn settings_metadata() -> Vec<SettingsFieldMetadata> {
    let defaults = StarsignSettings::default();
    vec![
        SettingsFieldMetadata {
            key: "auto_assign".into(),
            display_name: "Auto-assign on character creation".into(),
            description:
                "If enabled, new player characters will automatically roll a starsign once.".into(),
            field_type: "boolean".into(),
            default_value: serde_json::json!(defaults.auto_assign),
            config: true,
        },
        SettingsFieldMetadata {
            key: "table_name".into(),
            display_name: "RollTable name".into(),
            description: "The name of the rollable table to draw the Starsign from.".into(),
            field_type: "string".into(),
            default_value: serde_json::json!(defaults.table_name),
            config: true,
        },
        SettingsFieldMetadata {
            key: "search_compendia".into(),
            display_name: "Also search compendia for the table".into(),
            description: "If not found in world tables, also search any RollTable compendia."
                .into(),
            field_type: "boolean".into(),
            default_value: serde_json::json!(defaults.search_compendia),
            config: true,
        },
        SettingsFieldMetadata {
            key: "fill_missing_on_render".into(),
            display_name: "Assign missing starsigns when a sheet opens".into(),
            description:
                "If enabled, characters without a starsign roll one the first time their sheet is shown."
                    .into(),
            field_type: "boolean".into(),
            default_value: serde_json::json!(defaults.fill_missing_on_render),
            config: true,
        },
        SettingsFieldMetadata {
            key: "effect_pack".into(),
            display_name: "Starsign effect compendium".into(),
            description: "Compendium holding the effect granted by each starsign.".into(),
            field_type: "string".into(),
            default_value: serde_json::json!(defaults.effect_pack),
            config: true,
        },
        SettingsFieldMetadata {
            key: "effect_slug_prefix".into(),
            display_name: "Starsign effect slug prefix".into(),
            description:
                "Slug prefix marking an attached effect as a starsign power. Added to effects that lack it."
                    .into(),
            field_type: "string".into(),
            default_value: serde_json::json!(defaults.effect_slug_prefix),
            config: false,
        },
        SettingsFieldMetadata {
            key: "default_uses".into(),
            display_name: "Default daily uses".into(),
            description: "Uses per day for starsign powers whose effect sets no badge.".into(),
            field_type: "integer".into(),
            default_value: serde_json::json!(defaults.default_uses),
            config: false,
        },
    ]
}
