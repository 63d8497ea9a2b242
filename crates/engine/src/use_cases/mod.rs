//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific part of the starsign
//! lifecycle. Use cases orchestrate across ports to fulfill user stories.

pub mod assignment;
pub mod error;
pub(crate) mod messages;
pub mod power;
pub mod sheet;
pub mod tables;

pub use assignment::{
    AssignmentUseCases, CreationContext, CreationOutcome, CreationPayload, SkipReason,
};
pub use error::StarsignError;
pub use power::PowerUseCases;
pub use sheet::{SheetAction, SheetView, Tooltip};
pub use tables::{DrawTrait, ResolveTable, ResolvedTable, TableSource};
