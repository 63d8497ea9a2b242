//! Draw one entry from a resolved table.

use std::sync::Arc;

use starsign_domain::{TraitEntry, TraitTable};

use crate::infrastructure::ports::TableRepo;
use crate::use_cases::error::StarsignError;

/// Draw engine. The weighted draw itself belongs to the table store;
/// nothing is announced.
pub struct DrawTrait {
    tables: Arc<dyn TableRepo>,
}

impl DrawTrait {
    pub fn new(tables: Arc<dyn TableRepo>) -> Self {
        Self { tables }
    }

    /// Draw exactly one entry, or `None` for an empty table.
    pub async fn execute(&self, table: &TraitTable) -> Result<Option<TraitEntry>, StarsignError> {
        if table.is_empty() {
            tracing::debug!(table = %table.name(), "Table has no entries");
            return Ok(None);
        }

        let entry = self.tables.draw(table).await?;
        match &entry {
            Some(entry) => {
                tracing::debug!(table = %table.name(), entry = %entry.name(), "Drew entry")
            }
            None => tracing::warn!(table = %table.name(), "Draw produced no result"),
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockTableRepo;
    use starsign_domain::DocumentId;

    fn constellations() -> TraitTable {
        TraitTable::new(DocumentId::new("tbl01").unwrap(), "Constellations").with_entries(vec![
            TraitEntry::new("The Wolf Twins").unwrap(),
            TraitEntry::new("The Stormbreaker").unwrap(),
        ])
    }

    #[tokio::test]
    async fn empty_table_skips_the_store() {
        let mut tables = MockTableRepo::new();
        tables.expect_draw().never();

        let draw = DrawTrait::new(Arc::new(tables));
        let empty = TraitTable::new(DocumentId::new("e").unwrap(), "Empty");
        assert!(draw.execute(&empty).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn returns_the_store_draw() {
        let mut tables = MockTableRepo::new();
        tables
            .expect_draw()
            .times(1)
            .returning(|table| Ok(table.entries().get(1).cloned()));

        let draw = DrawTrait::new(Arc::new(tables));
        let entry = draw.execute(&constellations()).await.unwrap().unwrap();
        assert_eq!(entry.name(), "The Stormbreaker");
    }
}
