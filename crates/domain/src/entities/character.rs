//! Character summary - the slice of the host's actor model the starsign
//! lifecycle reads.

use serde::{Deserialize, Serialize};

use crate::ids::CharacterId;

/// Kind of actor. Only player characters receive starsigns automatically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// Player character
    Character,
    Npc,
    /// Any other host actor type, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl CharacterKind {
    pub fn is_player_character(&self) -> bool {
        matches!(self, Self::Character)
    }
}

impl std::str::FromStr for CharacterKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "character" | "pc" => Self::Character,
            "npc" => Self::Npc,
            other => Self::Other(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
    pub kind: CharacterKind,
}

impl CharacterSummary {
    pub fn new(id: CharacterId, name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }
}
