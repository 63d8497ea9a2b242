//! Resolve a draw table by name.
//!
//! World tables win. When compendium search is enabled, every roll-table
//! collection is searched through its index before the matching table is
//! loaded in full. A collection that cannot be read is logged and skipped.

use std::sync::Arc;

use starsign_domain::{PackId, TraitTable};

use crate::infrastructure::ports::{CompendiumRepo, PackKind, TableRepo};
use crate::use_cases::error::StarsignError;

/// Where a resolved table was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    World,
    Compendium(PackId),
}

/// A table together with its origin.
#[derive(Debug, Clone)]
pub struct ResolvedTable {
    pub table: TraitTable,
    pub source: TableSource,
}

/// Trait table resolver.
pub struct ResolveTable {
    tables: Arc<dyn TableRepo>,
    compendia: Arc<dyn CompendiumRepo>,
    search_compendia: bool,
}

impl ResolveTable {
    pub fn new(
        tables: Arc<dyn TableRepo>,
        compendia: Arc<dyn CompendiumRepo>,
        search_compendia: bool,
    ) -> Self {
        Self {
            tables,
            compendia,
            search_compendia,
        }
    }

    /// Find the table called `name`.
    ///
    /// # Returns
    /// * `Ok(Some(ResolvedTable))` - Table found
    /// * `Ok(None)` - No world table and no readable collection holds it
    /// * `Err(StarsignError)` - The world store or the pack listing failed
    pub async fn execute(&self, name: &str) -> Result<Option<ResolvedTable>, StarsignError> {
        if let Some(table) = self.tables.find_by_name(name).await? {
            tracing::debug!(table = %name, "Resolved world table");
            return Ok(Some(ResolvedTable {
                table,
                source: TableSource::World,
            }));
        }

        if !self.search_compendia {
            tracing::debug!(table = %name, "Table not in world, compendium search disabled");
            return Ok(None);
        }

        for pack in self.compendia.list_packs(PackKind::RollTable).await? {
            let index = match self.compendia.get_index(&pack.id).await {
                Ok(index) => index,
                Err(e) => {
                    tracing::warn!(pack = %pack.id, error = %e, "Failed reading pack, skipping");
                    continue;
                }
            };

            let Some(hit) = index.into_iter().find(|entry| entry.name == name) else {
                continue;
            };

            match self.compendia.get_table(&pack.id, &hit.id).await {
                Ok(Some(table)) => {
                    tracing::debug!(table = %name, pack = %pack.id, "Resolved compendium table");
                    return Ok(Some(ResolvedTable {
                        table,
                        source: TableSource::Compendium(pack.id),
                    }));
                }
                Ok(None) => {
                    tracing::warn!(pack = %pack.id, id = %hit.id, "Indexed table is missing");
                }
                Err(e) => {
                    tracing::warn!(pack = %pack.id, error = %e, "Failed reading pack, skipping");
                }
            }
        }

        tracing::debug!(table = %name, "Table not found");
        Ok(None)
    }
}
