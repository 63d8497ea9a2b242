//! Recharge schedule - when a spent power comes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RechargeSchedule {
    /// Restored at the first UTC day boundary after it was spent
    #[default]
    Daily,
    /// Never restored automatically (GM resets by hand)
    Manual,
}

impl RechargeSchedule {
    /// Whether a recharge boundary lies between `last` and `now`.
    pub fn is_due(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Daily => now.date_naive() > last.date_naive(),
            Self::Manual => false,
        }
    }
}
