//! Pack builder: concatenates JSON fixtures into newline-delimited `.db`
//! pack files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde_json::Value;

/// Module id used in compendium references.
pub const MODULE_ID: &str = "mythborn-starsigns";

/// Effect pack referenced by table results.
pub const EFFECT_PACK: &str = "starsign-effects";

/// Result type pointing at a document rather than plain text.
const DOCUMENT_RESULT: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackTarget {
    Tables,
    Conditions,
}

impl PackTarget {
    fn source_dir(self, root: &Path) -> PathBuf {
        match self {
            Self::Tables => root.join("packs").join("tables"),
            Self::Conditions => root.join("packs").join("json"),
        }
    }

    fn output_file(self, root: &Path) -> PathBuf {
        match self {
            Self::Tables => root.join("packs").join("starsign-tables.db"),
            Self::Conditions => root.join("packs").join("starsign-conditions.db"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Tables => "table",
            Self::Conditions => "condition",
        }
    }

    /// Check one parsed fixture and apply target-specific rewrites.
    fn prepare(self, record: &mut Value, file: &str) -> anyhow::Result<()> {
        require_str(record, "_id", file)?;
        require_str(record, "name", file)?;

        match self {
            Self::Tables => {
                if let Some(results) = record.get_mut("results").and_then(Value::as_array_mut) {
                    for result in results {
                        link_effect_result(result);
                    }
                }
            }
            Self::Conditions => {
                let kind = record.get("type").and_then(Value::as_str);
                if kind != Some("condition") {
                    bail!(
                        "Invalid type in {file}: expected \"condition\", found {}",
                        kind.map_or("nothing".to_string(), |k| format!("\"{k}\""))
                    );
                }
            }
        }
        Ok(())
    }
}

/// Summary of one built pack.
#[derive(Debug)]
pub struct BuildReport {
    pub target: PackTarget,
    pub output: PathBuf,
    pub records: Vec<(String, String)>,
}

fn require_str<'a>(record: &'a Value, field: &str, file: &str) -> anyhow::Result<&'a str> {
    match record.get(field).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!("Missing {field} in {file}"),
    }
}

/// Point world-item results at the effect compendium.
fn link_effect_result(result: &mut Value) {
    let is_document = result.get("type").and_then(Value::as_u64) == Some(DOCUMENT_RESULT);
    let is_world_item = result.get("documentCollection").and_then(Value::as_str) == Some("Item");
    if is_document && is_world_item {
        result["documentCollection"] =
            Value::String(format!("Compendium.{MODULE_ID}.{EFFECT_PACK}"));
    }
}

/// Build one pack under `root`.
pub fn build(root: &Path, target: PackTarget) -> anyhow::Result<BuildReport> {
    let source_dir = target.source_dir(root);
    if !source_dir.is_dir() {
        bail!("Source directory not found: {}", source_dir.display());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(&source_dir)
        .with_context(|| format!("reading {}", source_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();

    if files.is_empty() {
        bail!("No JSON files found in {}", source_dir.display());
    }

    let mut lines = Vec::with_capacity(files.len());
    let mut records = Vec::with_capacity(files.len());
    let mut seen = HashSet::new();
    for path in &files {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut record: Value = serde_json::from_str(&content)
            .with_context(|| format!("Error parsing {file}"))?;

        target.prepare(&mut record, &file)?;

        let id = require_str(&record, "_id", &file)?.to_string();
        let name = require_str(&record, "name", &file)?.to_string();
        if !seen.insert(id.clone()) {
            bail!("Duplicate _id {id} in {file}");
        }

        lines.push(serde_json::to_string(&record)?);
        records.push((id, name));
    }

    let output = target.output_file(root);
    if output.exists() {
        fs::remove_file(&output).with_context(|| format!("removing {}", output.display()))?;
    }
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&output, content).with_context(|| format!("writing {}", output.display()))?;

    Ok(BuildReport {
        target,
        output,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_fixture(dir: &Path, name: &str, value: &Value) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    #[test]
    fn tables_are_concatenated_in_file_order() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("packs").join("tables");
        write_fixture(
            &src,
            "b.json",
            &json!({"_id": "tblB", "name": "Second", "results": []}),
        );
        write_fixture(
            &src,
            "a.json",
            &json!({
                "_id": "tblA",
                "name": "The Constellations of the Mythborn",
                "results": [
                    {"_id": "r1", "type": 2, "documentCollection": "Item", "documentId": "eff1"},
                    {"_id": "r2", "type": 0, "documentCollection": "Item", "text": "Plain"},
                    {"_id": "r3", "type": 2, "documentCollection": "Compendium.other.pack"}
                ]
            }),
        );
        fs::write(src.join("notes.txt"), "ignored").unwrap();

        let report = build(tmp.path(), PackTarget::Tables).unwrap();
        assert_eq!(
            report.records,
            vec![
                ("tblA".to_string(), "The Constellations of the Mythborn".to_string()),
                ("tblB".to_string(), "Second".to_string()),
            ]
        );

        let content = fs::read_to_string(&report.output).unwrap();
        assert!(content.ends_with('\n'));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"_id":"tblA""#));

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(
            first["results"][0]["documentCollection"],
            "Compendium.mythborn-starsigns.starsign-effects"
        );
        assert_eq!(first["results"][1]["documentCollection"], "Item");
        assert_eq!(first["results"][2]["documentCollection"], "Compendium.other.pack");
    }

    #[test]
    fn existing_output_is_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("packs").join("json");
        write_fixture(
            &src,
            "frightened.json",
            &json!({"_id": "cnd1", "name": "Frightened", "type": "condition"}),
        );
        fs::write(
            tmp.path().join("packs").join("starsign-conditions.db"),
            "stale\nstale\nstale\n",
        )
        .unwrap();

        let report = build(tmp.path(), PackTarget::Conditions).unwrap();
        let content = fs::read_to_string(report.output).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(!content.contains("stale"));
    }

    #[test]
    fn conditions_require_condition_type() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("packs").join("json");
        write_fixture(
            &src,
            "wolf.json",
            &json!({"_id": "eff1", "name": "The Wolf Twins", "type": "effect"}),
        );

        let err = build(tmp.path(), PackTarget::Conditions).unwrap_err();
        assert!(err.to_string().contains("wolf.json"));
        assert!(err.to_string().contains("\"effect\""));
    }

    #[test]
    fn missing_fields_and_bad_json_name_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("packs").join("tables");
        write_fixture(&src, "nameless.json", &json!({"_id": "tbl1", "results": []}));

        let err = build(tmp.path(), PackTarget::Tables).unwrap_err();
        assert_eq!(err.to_string(), "Missing name in nameless.json");

        fs::write(src.join("nameless.json"), "{ not json").unwrap();
        let err = build(tmp.path(), PackTarget::Tables).unwrap_err();
        assert_eq!(err.to_string(), "Error parsing nameless.json");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("packs").join("tables");
        write_fixture(&src, "a.json", &json!({"_id": "same", "name": "A"}));
        write_fixture(&src, "b.json", &json!({"_id": "same", "name": "B"}));

        let err = build(tmp.path(), PackTarget::Tables).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate _id same in b.json");
    }

    #[test]
    fn missing_or_empty_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = build(tmp.path(), PackTarget::Tables).unwrap_err();
        assert!(err.to_string().starts_with("Source directory not found"));

        fs::create_dir_all(tmp.path().join("packs").join("tables")).unwrap();
        let err = build(tmp.path(), PackTarget::Tables).unwrap_err();
        assert!(err.to_string().starts_with("No JSON files found"));
    }
}
