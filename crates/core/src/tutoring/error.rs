use thiserror::Error;

use super::types::SessionStatus;

/// Errors raised while validating or decoding tutoring records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TutoringError {
    #[error("Rating score must be between 1 and 5, got {0}")]
    InvalidScore(u8),
    #[error("Rating must target exactly one of tutor or student")]
    InvalidRatingTarget,
    #[error("Unknown user type: {0}")]
    UnknownUserType(String),
    #[error("Unknown session status: {0}")]
    UnknownSessionStatus(String),
    #[error("Unknown notification kind: {0}")]
    UnknownNotificationKind(String),
    #[error("Session cannot move from {from} to {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_score_display() {
        assert_eq!(
            TutoringError::InvalidScore(7).to_string(),
            "Rating score must be between 1 and 5, got 7"
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = TutoringError::InvalidTransition {
            from: SessionStatus::Cancelada,
            to: SessionStatus::Aceptada,
        };
        assert_eq!(
            error.to_string(),
            "Session cannot move from cancelada to aceptada"
        );
    }

    #[test]
    fn test_empty_field_display() {
        assert_eq!(
            TutoringError::EmptyField("email").to_string(),
            "email cannot be empty"
        );
    }
}
