//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid synthesis transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_display() {
        let error = DomainError::InvalidTransition {
            from: "idle".to_string(),
            to: "finalizing".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid synthesis transition: idle -> finalizing"
        );
    }

    #[test]
    fn test_malformed_display() {
        let error = DomainError::MalformedPayload("expected value at line 1".to_string());
        assert_eq!(
            error.to_string(),
            "Malformed payload: expected value at line 1"
        );
    }
}
