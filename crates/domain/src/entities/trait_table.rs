//! Trait tables - the authored, read-only draw tables a starsign is rolled from.
//!
//! A table is an ordered list of entries. Entries may carry a roll range
//! (`[low, high]`) which gives them an implicit weight of `high - low + 1`;
//! entries without a range weigh `weight` (default 1).

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::DocumentId;

/// Reference from a table row to a document living in some collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    /// Collection key, e.g. `Compendium.mythborn-starsigns.starsign-effects`
    pub collection: String,
    pub document_id: DocumentId,
}

/// One possible outcome of a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitEntry {
    id: Option<DocumentId>,
    name: String,
    description: Option<String>,
    img: Option<String>,
    range: Option<(u32, u32)>,
    weight: u32,
    document: Option<DocumentRef>,
}

impl TraitEntry {
    /// Create an entry with a validated, trimmed name.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Trait entry name cannot be empty"));
        }
        Ok(Self {
            id: None,
            name: trimmed.to_string(),
            description: None,
            img: None,
            range: None,
            weight: 1,
            document: None,
        })
    }

    pub fn with_id(mut self, id: DocumentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        let img = img.into();
        self.img = (!img.trim().is_empty()).then_some(img);
        self
    }

    /// Set the roll range. `low` and `high` may be given in either order.
    pub fn with_range(mut self, low: u32, high: u32) -> Self {
        self.range = Some((low.min(high), low.max(high)));
        self
    }

    /// Explicit weight, used only when no range is set. Zero is clamped to 1.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight.max(1);
        self
    }

    pub fn with_document(mut self, document: DocumentRef) -> Self {
        self.document = Some(document);
        self
    }

    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
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

    pub fn range(&self) -> Option<(u32, u32)> {
        self.range
    }

    pub fn document(&self) -> Option<&DocumentRef> {
        self.document.as_ref()
    }

    /// Implicit draw weight of this entry.
    pub fn weight(&self) -> u64 {
        match self.range {
            Some((low, high)) => u64::from(high) - u64::from(low) + 1,
            None => u64::from(self.weight),
        }
    }
}

/// A named, ordered collection of trait entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitTable {
    id: DocumentId,
    name: String,
    formula: Option<String>,
    entries: Vec<TraitEntry>,
}

impl TraitTable {
    pub fn new(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into().trim().to_string(),
            formula: None,
            entries: Vec::new(),
        }
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn with_entries(mut self, entries: impl IntoIterator<Item = TraitEntry>) -> Self {
        self.entries = entries.into_iter().collect();
        self
    }

    pub fn push(&mut self, entry: TraitEntry) {
        self.entries.push(entry);
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dice formula declared by the table, if any (e.g. `1d12`).
    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    pub fn entries(&self) -> &[TraitEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive lookup by entry name.
    pub fn find_entry(&self, name: &str) -> Option<&TraitEntry> {
        let name = name.trim();
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// Entry names in table order.
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.iter().map(TraitEntry::name).collect()
    }

    /// Sum of all entry weights.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(TraitEntry::weight).sum()
    }

    /// Select the entry covering `roll`, where `roll` is in `0..total_weight()`.
    ///
    /// Returns `None` for an empty table or an out-of-range roll.
    pub fn select_weighted(&self, roll: u64) -> Option<&TraitEntry> {
        let mut cumulative = 0u64;
        for entry in &self.entries {
            cumulative += entry.weight();
            if roll < cumulative {
                return Some(entry);
            }
        }
        None
    }
}
