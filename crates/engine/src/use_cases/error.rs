//! Starsign operation errors.

use starsign_domain::{DomainError, Notice};

use crate::infrastructure::ports::RepoError;

/// Errors that can occur during starsign operations.
///
/// All of them are recovered at the hook boundary; [`StarsignError::notice`]
/// gives the user-facing message, if any.
#[derive(Debug, thiserror::Error)]
pub enum StarsignError {
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },
    #[error("Permission denied: only GMs can {action}")]
    PermissionDenied { action: &'static str },
    #[error("No uses remaining for {effect}")]
    AlreadyExhausted { effect: String },
    #[error("{effect} is already applied")]
    AlreadyApplied { effect: String },
    #[error("Collection {pack} unavailable: {message}")]
    CollectionUnavailable { pack: String, message: String },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
}

impl StarsignError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn permission_denied(action: &'static str) -> Self {
        Self::PermissionDenied { action }
    }

    /// Map a collection read failure, keeping unreadable packs distinct.
    pub fn from_pack(pack: impl ToString, err: RepoError) -> Self {
        match err {
            RepoError::Unavailable { message, .. } => Self::CollectionUnavailable {
                pack: pack.to_string(),
                message,
            },
            other => Self::Repo(other),
        }
    }

    /// User-facing notice. `None` for diagnostic-only failures.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::NotFound { kind, name } => {
                Some(Notice::warning(format!("{kind} \"{name}\" not found.")))
            }
            Self::PermissionDenied { action } => {
                Some(Notice::warning(format!("Only GMs can {action}.")))
            }
            Self::AlreadyExhausted { .. } => Some(Notice::warning(
                "No uses remaining for this starsign power.",
            )),
            Self::AlreadyApplied { effect } => {
                Some(Notice::info(format!("{effect} is already applied.")))
            }
            Self::CollectionUnavailable { pack, .. } => Some(Notice::error(format!(
                "Compendium \"{pack}\" could not be read."
            ))),
            Self::Repo(_) | Self::Domain(_) => None,
        }
    }
}
