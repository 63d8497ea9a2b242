//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Host documents (characters, attached effects)
//! - Draw tables (world scope and read-only compendia)
//! - Chat and notifications
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CharacterRepo, CompendiumRepo, EffectRepo, TableRepo};

pub use types::{IndexEntry, PackInfo, PackKind};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::NotificationPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockCharacterRepo, MockCompendiumRepo, MockEffectRepo, MockTableRepo};

#[cfg(test)]
pub use external::MockNotificationPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{NotifyError, RepoError};
