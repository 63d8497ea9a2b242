//! Domain entities - Core business objects with identity

mod character;
mod effect;
mod starsign;
mod trait_table;

pub use character::{CharacterKind, CharacterSummary};
pub use effect::{slugify, StarsignEffect, STARSIGN_SLUG_PREFIX};
pub use starsign::{
    AssignmentSource, AssignmentState, LegacyEntry, StarsignRecord, StoredStarsign,
};
pub use trait_table::{DocumentRef, TraitEntry, TraitTable};
