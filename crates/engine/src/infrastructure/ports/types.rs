//! Helper types for port operations.

use serde::{Deserialize, Serialize};
use starsign_domain::{DocumentId, PackId};

/// Document type a read-only collection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackKind {
    /// Draw tables
    RollTable,
    /// Items: effects and conditions
    Item,
}

/// A secondary, read-only collection (compendium).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackInfo {
    pub id: PackId,
    pub label: String,
    pub kind: PackKind,
}

/// Light-weight index row of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: DocumentId,
    pub name: String,
}
