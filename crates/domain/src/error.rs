//! Errors raised by domain invariants and value parsing.

use thiserror::Error;

/// Error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A limited-use counter has no uses left
    #[error("No uses remaining: 0/{max}")]
    Exhausted { max: u32 },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Create an exhausted counter error
    pub fn exhausted(max: u32) -> Self {
        Self::Exhausted { max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("TraitEntry", "The Wolf Twins");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("TraitEntry"));
        assert!(err.to_string().contains("The Wolf Twins"));
    }

    #[test]
    fn test_exhausted_error() {
        let err = DomainError::exhausted(3);
        assert!(matches!(err, DomainError::Exhausted { max: 3 }));
        assert_eq!(err.to_string(), "No uses remaining: 0/3");
    }
}
