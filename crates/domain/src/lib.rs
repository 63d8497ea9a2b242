extern crate self as starsign_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    slugify, AssignmentSource, AssignmentState, CharacterKind, CharacterSummary, DocumentRef,
    LegacyEntry, StarsignEffect, StarsignRecord, StoredStarsign, TraitEntry, TraitTable,
    STARSIGN_SLUG_PREFIX,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{CharacterId, DocumentId, PackId, UserId};

pub use value_objects::{
    Announcement, Decremented, Notice, NoticeLevel, PowerCounter, RechargeSchedule, Requester,
    UserRole,
};
