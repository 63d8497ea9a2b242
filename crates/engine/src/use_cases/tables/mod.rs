//! Trait table use cases: resolving a table, drawing from it, and listing
//! its entries as picker options.

mod draw;
mod resolve;

use std::sync::LazyLock;

use regex_lite::Regex;
use starsign_domain::{TraitEntry, TraitTable};

pub use draw::DrawTrait;
pub use resolve::{ResolveTable, ResolvedTable, TableSource};

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Plain-text form of an entry name: markup removed, common entities decoded.
///
/// Returns `None` when nothing readable is left.
pub fn clean_entry_name(raw: &str) -> Option<String> {
    let stripped = MARKUP_TAG.replace_all(raw, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let cleaned = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Picker options for a table, in table order.
pub fn option_names(table: &TraitTable) -> Vec<String> {
    table
        .entries()
        .iter()
        .filter_map(|entry| clean_entry_name(entry.name()))
        .collect()
}

/// The entry whose cleaned name matches a picker selection.
pub fn find_option<'a>(table: &'a TraitTable, selection: &str) -> Option<&'a TraitEntry> {
    let wanted = clean_entry_name(selection)?;
    table
        .entries()
        .iter()
        .find(|entry| clean_entry_name(entry.name()).as_deref() == Some(wanted.as_str()))
}
