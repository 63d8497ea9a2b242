//! API layer - entry points a host adapter calls into.

pub mod hooks;

pub use hooks::{ActionOutcome, ManualAction, StarsignHooks};
