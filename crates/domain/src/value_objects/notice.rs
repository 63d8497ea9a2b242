//! User-facing messages: transient notices and chat announcements.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, human-readable notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A chat announcement posted on behalf of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Speaking character's display name
    pub speaker: String,
    /// Name of the starsign or effect being announced
    pub title: String,
    pub body: Option<String>,
    pub img: Option<String>,
}

impl Announcement {
    /// "{speaker} activates the power of {effect}!"
    pub fn activation(speaker: impl Into<String>, effect_name: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            title: effect_name.into(),
            body: None,
            img: None,
        }
    }

    /// Starsign card with its description and image.
    pub fn starsign(
        speaker: impl Into<String>,
        name: impl Into<String>,
        description: Option<&str>,
        img: Option<&str>,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            title: name.into(),
            body: description.map(str::to_string),
            img: img.map(str::to_string),
        }
    }

    /// One-line plain-text rendering.
    pub fn headline(&self) -> String {
        format!("{} activates the power of {}!", self.speaker, self.title)
    }
}
