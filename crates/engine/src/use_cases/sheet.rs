//! What a character sheet shows for the starsign, and which actions the
//! viewer may take. Rendering is left to the host.

use serde::Serialize;
use starsign_domain::{AssignmentState, Requester, StarsignRecord};

/// Shown when a character has no starsign.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetAction {
    /// Open the picker with every table entry
    Pick,
    /// Draw again, overwriting the current value
    Reroll,
    /// Clear the starsign
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub name: String,
    pub description: Option<String>,
    pub img: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetView {
    pub label: &'static str,
    pub display_value: String,
    #[serde(skip)]
    pub state: AssignmentState,
    pub tooltip: Option<Tooltip>,
    pub actions: Vec<SheetAction>,
}

impl SheetView {
    pub fn build(record: Option<&StarsignRecord>, viewer: &Requester) -> Self {
        let state = AssignmentState::of(record);
        let actions = if viewer.is_gm() {
            let mut actions = vec![SheetAction::Pick, SheetAction::Reroll];
            if record.is_some() {
                actions.push(SheetAction::Reset);
            }
            actions
        } else {
            Vec::new()
        };

        match record {
            Some(record) => Self {
                label: "Starsign",
                display_value: record.name().to_string(),
                state,
                tooltip: Some(Tooltip {
                    name: record.name().to_string(),
                    description: record.description().map(str::to_string),
                    img: record.img().map(str::to_string),
                }),
                actions,
            },
            None => Self {
                label: "Starsign",
                display_value: UNASSIGNED_LABEL.to_string(),
                state,
                tooltip: None,
                actions,
            },
        }
    }

    pub fn allows(&self, action: SheetAction) -> bool {
        self.actions.contains(&action)
    }
}
