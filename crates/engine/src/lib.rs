//! Starsign engine library.
//!
//! Host-agnostic starsign lifecycle: resolving and drawing from trait
//! tables, assigning the result to characters, and tracking the limited-use
//! power granted by the starsign effect.
//!
//! ## Structure
//!
//! - `use_cases/` - Lifecycle orchestration over the ports
//! - `infrastructure/` - Port traits and their adapters
//! - `api/` - Hook entry points for host adapters
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use api::StarsignHooks;
pub use app::App;
