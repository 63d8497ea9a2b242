//! Read-only collections loaded from newline-delimited JSON pack files.
//!
//! Every `*.db` file in a directory is one pack; the pack id is the file
//! stem. Each line holds one document. Documents with a `results` array are
//! draw tables; anything else is an item (effect or condition). A pack with
//! a malformed line stays listed but every read of it fails with
//! `RepoError::Unavailable`.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use starsign_domain::{
    DocumentId, DocumentRef, PackId, PowerCounter, StarsignEffect, TraitEntry, TraitTable,
};

use crate::infrastructure::ports::{
    CompendiumRepo, IndexEntry, PackInfo, PackKind, RepoError,
};

/// Pack file extension.
pub const PACK_EXTENSION: &str = "db";

// =============================================================================
// Raw pack records
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTableRow {
    #[serde(rename = "_id")]
    id: Option<String>,
    name: Option<String>,
    text: Option<String>,
    description: Option<String>,
    img: Option<String>,
    range: Option<[u32; 2]>,
    weight: Option<u32>,
    document_collection: Option<String>,
    document_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTable {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    formula: Option<String>,
    results: Vec<RawTableRow>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RawText {
    value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawBadge {
    value: Option<u32>,
    max: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTokenIcon {
    show: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawItemSystem {
    slug: Option<String>,
    description: Option<RawText>,
    badge: Option<RawBadge>,
    token_icon: Option<RawTokenIcon>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawItem {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    img: Option<String>,
    #[serde(default)]
    system: RawItemSystem,
}

#[derive(Debug, Clone)]
enum PackRecord {
    Table(RawTable),
    Item(RawItem),
}

impl PackRecord {
    fn parse(line: &str) -> Result<Self, String> {
        let value: serde_json::Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
        if value.get("results").is_some() {
            serde_json::from_value(value)
                .map(Self::Table)
                .map_err(|e| e.to_string())
        } else {
            serde_json::from_value(value)
                .map(Self::Item)
                .map_err(|e| e.to_string())
        }
    }

    fn id(&self) -> &str {
        match self {
            Self::Table(t) => &t.id,
            Self::Item(i) => &i.id,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Table(t) => &t.name,
            Self::Item(i) => &i.name,
        }
    }
}

struct Pack {
    info: PackInfo,
    records: Result<Vec<PackRecord>, String>,
}

// =============================================================================
// Pack directory
// =============================================================================

/// All packs found in one directory.
pub struct PackDirectory {
    packs: Vec<Pack>,
    default_uses: u32,
}

impl PackDirectory {
    /// Load every `*.db` file in `dir`, in file-name order.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, RepoError> {
        let dir = dir.as_ref();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| RepoError::unavailable(dir.display(), e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepoError::unavailable(dir.display(), e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(PACK_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();

        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let pack_id = PackId::new(stem).map_err(RepoError::serialization)?;
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => Ok(content),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read pack file");
                    Err(e.to_string())
                }
            };
            sources.push((pack_id, content));
        }

        tracing::info!(dir = %dir.display(), packs = sources.len(), "Loaded pack directory");
        Ok(Self::from_sources(sources))
    }

    /// Build from already-read pack contents (`Err` marks an unreadable pack).
    pub fn from_sources(sources: Vec<(PackId, Result<String, String>)>) -> Self {
        let packs = sources
            .into_iter()
            .map(|(id, content)| {
                let records = content.and_then(|content| parse_lines(&content));
                let kind = match &records {
                    Ok(records) => match records.first() {
                        Some(PackRecord::Table(_)) => PackKind::RollTable,
                        _ => PackKind::Item,
                    },
                    Err(_) => kind_from_name(id.as_str()),
                };
                if let Err(e) = &records {
                    tracing::warn!(pack = %id, error = %e, "Pack is unreadable");
                }
                Pack {
                    info: PackInfo {
                        label: label_from_id(id.as_str()),
                        id,
                        kind,
                    },
                    records,
                }
            })
            .collect();
        Self {
            packs,
            default_uses: 1,
        }
    }

    /// Badge max for item documents that declare none.
    pub fn with_default_uses(mut self, uses: u32) -> Self {
        self.default_uses = uses.max(1);
        self
    }

    fn pack(&self, id: &PackId) -> Result<&[PackRecord], RepoError> {
        let pack = self
            .packs
            .iter()
            .find(|p| &p.info.id == id)
            .ok_or_else(|| RepoError::not_found("Pack", id))?;
        pack.records
            .as_deref()
            .map_err(|e| RepoError::unavailable(id, e))
    }

    fn find_record(&self, pack: &PackId, id: &DocumentId) -> Result<Option<&PackRecord>, RepoError> {
        Ok(self.pack(pack)?.iter().find(|r| r.id() == id.as_str()))
    }

    /// Name of the document a table row links to, when it can be found.
    fn linked_name(&self, collection: &str, document_id: &str) -> Option<String> {
        let pack_id = collection.rsplit('.').next()?;
        let pack_id = PackId::new(pack_id).ok()?;
        let records = self.pack(&pack_id).ok()?;
        records
            .iter()
            .find(|r| r.id() == document_id)
            .map(|r| r.name().to_string())
    }

    fn to_table(&self, raw: &RawTable) -> Result<TraitTable, RepoError> {
        let id = DocumentId::new(raw.id.as_str()).map_err(RepoError::serialization)?;
        let mut table = TraitTable::new(id, raw.name.as_str());
        if let Some(formula) = &raw.formula {
            table = table.with_formula(formula.as_str());
        }
        for row in &raw.results {
            match self.to_entry(row) {
                Some(entry) => table.push(entry),
                None => tracing::debug!(
                    table = %raw.name,
                    row = ?row.id,
                    "Skipping table row without a name"
                ),
            }
        }
        Ok(table)
    }

    fn to_entry(&self, row: &RawTableRow) -> Option<TraitEntry> {
        let link = match (&row.document_collection, &row.document_id) {
            (Some(collection), Some(document_id)) => Some((collection, document_id)),
            _ => None,
        };

        let name = row
            .name
            .as_deref()
            .or(row.text.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| link.and_then(|(c, d)| self.linked_name(c, d)))?;

        let mut entry = TraitEntry::new(name).ok()?;
        if let Some(id) = row.id.as_deref().and_then(|id| DocumentId::new(id).ok()) {
            entry = entry.with_id(id);
        }
        if let Some(description) = &row.description {
            entry = entry.with_description(description.as_str());
        }
        if let Some(img) = &row.img {
            entry = entry.with_img(img.as_str());
        }
        if let Some([low, high]) = row.range {
            entry = entry.with_range(low, high);
        } else if let Some(weight) = row.weight {
            entry = entry.with_weight(weight);
        }
        if let Some((collection, document_id)) = link {
            if let Ok(document_id) = DocumentId::new(document_id.as_str()) {
                entry = entry.with_document(DocumentRef {
                    collection: collection.clone(),
                    document_id,
                });
            }
        }
        Some(entry)
    }

    fn to_effect(&self, raw: &RawItem) -> Result<StarsignEffect, RepoError> {
        let id = DocumentId::new(raw.id.as_str()).map_err(RepoError::serialization)?;
        let badge = match &raw.system.badge {
            Some(RawBadge { max: Some(max), value }) => {
                PowerCounter::new(value.unwrap_or(*max), *max).map_err(RepoError::serialization)?
            }
            _ => PowerCounter::full(self.default_uses),
        };
        let mut effect = StarsignEffect::new(id, raw.name.as_str(), badge);
        if let Some(slug) = raw.system.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            effect = effect.with_slug(slug);
        }
        if let Some(description) = raw
            .system
            .description
            .as_ref()
            .and_then(|d| d.value.as_deref())
            .filter(|d| !d.trim().is_empty())
        {
            effect = effect.with_description(description);
        }
        if let Some(img) = &raw.img {
            effect = effect.with_img(img.as_str());
        }
        if let Some(show) = raw.system.token_icon.as_ref().and_then(|t| t.show) {
            effect = effect.with_token_icon_visible(show);
        }
        Ok(effect)
    }
}

fn parse_lines(content: &str) -> Result<Vec<PackRecord>, String> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| PackRecord::parse(line).map_err(|e| format!("line {}: {e}", n + 1)))
        .collect()
}

fn kind_from_name(id: &str) -> PackKind {
    if id.contains("table") {
        PackKind::RollTable
    } else {
        PackKind::Item
    }
}

fn label_from_id(id: &str) -> String {
    id.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl CompendiumRepo for PackDirectory {
    async fn list_packs(&self, kind: PackKind) -> Result<Vec<PackInfo>, RepoError> {
        Ok(self
            .packs
            .iter()
            .filter(|p| p.info.kind == kind)
            .map(|p| p.info.clone())
            .collect())
    }

    async fn get_index(&self, pack: &PackId) -> Result<Vec<IndexEntry>, RepoError> {
        self.pack(pack)?
            .iter()
            .map(|record| {
                Ok(IndexEntry {
                    id: DocumentId::new(record.id()).map_err(RepoError::serialization)?,
                    name: record.name().to_string(),
                })
            })
            .collect()
    }

    async fn get_table(
        &self,
        pack: &PackId,
        id: &DocumentId,
    ) -> Result<Option<TraitTable>, RepoError> {
        match self.find_record(pack, id)? {
            Some(PackRecord::Table(raw)) => self.to_table(raw).map(Some),
            _ => Ok(None),
        }
    }

    async fn get_effect(
        &self,
        pack: &PackId,
        id: &DocumentId,
    ) -> Result<Option<StarsignEffect>, RepoError> {
        match self.find_record(pack, id)? {
            Some(PackRecord::Item(raw)) => self.to_effect(raw).map(Some),
            _ => Ok(None),
        }
    }
}

/// Pack ids grouped by kind, for diagnostics.
pub fn summarize(packs: &[PackInfo]) -> HashMap<PackKind, Vec<String>> {
    let mut grouped: HashMap<PackKind, Vec<String>> = HashMap::new();
    for pack in packs {
        grouped
            .entry(pack.kind)
            .or_default()
            .push(pack.id.to_string());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLES: &str = concat!(
        r#"{"_id":"tblConst0001","name":"The Constellations of the Mythborn","formula":"1d4","results":["#,
        r#"{"_id":"r1","type":0,"text":"<b>The Wolf Twins</b>","range":[1,1]},"#,
        r#"{"_id":"r2","type":2,"text":"","range":[2,4],"documentCollection":"Compendium.mythborn-starsigns.starsign-effects","documentId":"effStorm0001"},"#,
        r#"{"_id":"r3","type":0,"text":"   "}"#,
        "]}\n"
    );

    const EFFECTS: &str = concat!(
        r#"{"_id":"effWolf00001","name":"The Wolf Twins","type":"effect","img":"icons/wolf.webp","system":{"slug":"starsign-wolf-twins","description":{"value":"<p>Two hearts.</p>"},"badge":{"type":"counter","value":1,"max":1},"tokenIcon":{"show":true}}}"#,
        "\n",
        r#"{"_id":"effStorm0001","name":"The Stormbreaker","type":"effect","system":{}}"#,
        "\n"
    );

    fn pack_id(id: &str) -> PackId {
        PackId::new(id).unwrap()
    }

    fn directory() -> PackDirectory {
        PackDirectory::from_sources(vec![
            (pack_id("starsign-effects"), Ok(EFFECTS.to_string())),
            (pack_id("starsign-tables"), Ok(TABLES.to_string())),
            (pack_id("broken-tables"), Ok("{not json}\n".to_string())),
        ])
        .with_default_uses(2)
    }

    #[tokio::test]
    async fn packs_are_classified_by_content() {
        let dir = directory();
        let tables = dir.list_packs(PackKind::RollTable).await.unwrap();
        let items = dir.list_packs(PackKind::Item).await.unwrap();

        let table_ids: Vec<_> = tables.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(table_ids, vec!["starsign-tables", "broken-tables"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Starsign Effects");
    }

    #[tokio::test]
    async fn unreadable_pack_reports_unavailable() {
        let err = directory().get_index(&pack_id("broken-tables")).await.unwrap_err();
        assert!(matches!(err, RepoError::Unavailable { .. }));
        assert!(err.to_string().contains("line 1"));
    }

    #[tokio::test]
    async fn table_rows_resolve_names_and_weights() {
        let dir = directory();
        let index = dir.get_index(&pack_id("starsign-tables")).await.unwrap();
        assert_eq!(index[0].name, "The Constellations of the Mythborn");

        let table = dir
            .get_table(&pack_id("starsign-tables"), &index[0].id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(table.formula(), Some("1d4"));
        // Blank row dropped, linked row named after its document
        assert_eq!(
            table.entry_names(),
            vec!["<b>The Wolf Twins</b>", "The Stormbreaker"]
        );
        assert_eq!(table.total_weight(), 4);
        let linked = table.find_entry("The Stormbreaker").unwrap();
        assert_eq!(linked.document().unwrap().document_id.as_str(), "effStorm0001");
    }

    #[tokio::test]
    async fn full_range_row_keeps_its_weight() {
        let wide = concat!(
            r#"{"_id":"tblWide","name":"Wide","results":["#,
            r#"{"_id":"r1","type":0,"text":"The Lantern","range":[0,4294967295]},"#,
            r#"{"_id":"r2","type":0,"text":"The Wolf Twins","range":[1,1]}"#,
            "]}\n"
        );
        let dir = PackDirectory::from_sources(vec![(pack_id("wide-tables"), Ok(wide.to_string()))]);
        let table = dir
            .get_table(&pack_id("wide-tables"), &DocumentId::new("tblWide").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(table.total_weight(), (1u64 << 32) + 1);
    }

    #[tokio::test]
    async fn effects_carry_badge_and_slug() {
        let dir = directory();
        let wolf = dir
            .get_effect(&pack_id("starsign-effects"), &DocumentId::new("effWolf00001").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wolf.slug(), "starsign-wolf-twins");
        assert_eq!(wolf.badge(), PowerCounter::full(1));
        assert_eq!(wolf.description(), Some("<p>Two hearts.</p>"));

        let storm = dir
            .get_effect(&pack_id("starsign-effects"), &DocumentId::new("effStorm0001").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(storm.slug(), "starsign-the-stormbreaker");
        assert_eq!(storm.badge(), PowerCounter::full(2));
    }

    #[tokio::test]
    async fn table_lookup_in_item_pack_is_none() {
        let dir = directory();
        let found = dir
            .get_table(&pack_id("starsign-effects"), &DocumentId::new("effWolf00001").unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn open_reads_db_files_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("starsign-tables.db"), TABLES).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let dir = PackDirectory::open(tmp.path()).await.unwrap();
        let packs = dir.list_packs(PackKind::RollTable).await.unwrap();
        assert_eq!(packs.len(), 1);
        assert!(dir.list_packs(PackKind::Item).await.unwrap().is_empty());

        let grouped = summarize(&packs);
        assert_eq!(grouped[&PackKind::RollTable], vec!["starsign-tables".to_string()]);
    }

    #[tokio::test]
    async fn open_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let result = PackDirectory::open(tmp.path().join("nope")).await;
        assert!(matches!(result, Err(RepoError::Unavailable { .. })));
    }
}
