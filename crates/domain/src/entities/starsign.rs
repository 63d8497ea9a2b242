//! Starsign records - the trait assigned to one character.
//!
//! The canonical shape stores the entry id next to denormalized display
//! fields. Older data may hold only the entry name, or a full copy of the
//! table row; [`StoredStarsign`] accepts all three shapes so callers can
//! normalize on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{TraitEntry, TraitTable};
use crate::ids::DocumentId;

/// How the current record came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// Rolled by the creation hook or the lazy fill-in on render
    #[default]
    Automatic,
    /// Picked or rerolled explicitly by a GM
    Manual,
}

/// Lifecycle state of a character's starsign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentState {
    Unassigned,
    Automatic,
    ManualOverride,
}

impl AssignmentState {
    pub fn of(record: Option<&StarsignRecord>) -> Self {
        match record.map(StarsignRecord::source) {
            None => Self::Unassigned,
            Some(AssignmentSource::Automatic) => Self::Automatic,
            Some(AssignmentSource::Manual) => Self::ManualOverride,
        }
    }
}

/// The starsign assigned to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarsignRecord {
    /// Shape marker; legacy values never carry it.
    version: u32,
    entry_id: Option<DocumentId>,
    table_id: Option<DocumentId>,
    name: String,
    description: Option<String>,
    img: Option<String>,
    #[serde(default)]
    source: AssignmentSource,
    assigned_at: Option<DateTime<Utc>>,
}

impl StarsignRecord {
    pub const CURRENT_VERSION: u32 = 2;

    /// Build a record from a drawn or picked entry.
    pub fn from_entry(
        table: &TraitTable,
        entry: &TraitEntry,
        source: AssignmentSource,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entry_id: entry.id().cloned(),
            table_id: Some(table.id().clone()),
            name: entry.name().to_string(),
            description: entry.description().map(str::to_string),
            img: entry.img().map(str::to_string),
            source,
            assigned_at: Some(assigned_at),
        }
    }

    /// Replace the display name. Blank names are ignored.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.name = name.trim().to_string();
        }
        self
    }

    pub fn entry_id(&self) -> Option<&DocumentId> {
        self.entry_id.as_ref()
    }

    pub fn table_id(&self) -> Option<&DocumentId> {
        self.table_id.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn img(&self) -> Option<&str> {
        self.img.as_deref()
    }

    pub fn source(&self) -> AssignmentSource {
        self.source
    }

    pub fn assigned_at(&self) -> Option<DateTime<Utc>> {
        self.assigned_at
    }
}

/// Table row copied verbatim into character flags by older revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyEntry {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
}

/// Any shape a starsign flag may have been persisted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredStarsign {
    Current(StarsignRecord),
    LegacyEntry(LegacyEntry),
    LegacyName(String),
}

impl StoredStarsign {
    pub fn is_legacy(&self) -> bool {
        !matches!(self, Self::Current(_))
    }

    /// Convert to the canonical record.
    ///
    /// Returns `None` when the stored value carries no usable name, which
    /// callers treat as unassigned.
    pub fn into_record(self) -> Option<StarsignRecord> {
        match self {
            Self::Current(record) => Some(record),
            Self::LegacyName(name) => legacy_record(None, Some(name), None, None),
            Self::LegacyEntry(entry) => legacy_record(
                entry.id,
                entry.name.or(entry.text),
                entry.description,
                entry.img,
            ),
        }
    }
}

impl From<StarsignRecord> for StoredStarsign {
    fn from(record: StarsignRecord) -> Self {
        Self::Current(record)
    }
}

fn legacy_record(
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    img: Option<String>,
) -> Option<StarsignRecord> {
    let name = name?.trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some(StarsignRecord {
        version: StarsignRecord::CURRENT_VERSION,
        entry_id: id.and_then(|id| DocumentId::new(id).ok()),
        table_id: None,
        name,
        description: description.filter(|d| !d.trim().is_empty()),
        img: img.filter(|i| !i.trim().is_empty()),
        source: AssignmentSource::Automatic,
        assigned_at: None,
    })
}
