use chrono::NaiveDate;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
    #[error("event period ends on {end} before it starts on {start}")]
    InvalidEventPeriod { start: NaiveDate, end: NaiveDate },
    #[error("could not parse event period `{0}` (expected `YYYY-MM-DD ~ YYYY-MM-DD`)")]
    UnparseableEventPeriod(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable machine-readable class reported by the CLI.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "validation",
            Self::Auth(_) => "authentication",
            Self::Persistence(_) => "persistence",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Domain(_) | Self::Configuration(_) => 2,
            Self::Persistence(_) => 6,
            Self::Auth(_) => 7,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(_) => "The request could not be processed. Check inputs and try again.",
            Self::Auth(_) => "Admin access was denied.",
            Self::Persistence(_) => "The deal store is temporarily unavailable. Please retry shortly.",
            Self::Configuration(_) => "The tool is misconfigured. Run `hotdeal doctor` for details.",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::AuthError;
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn domain_error_maps_to_validation_class() {
        let error = ApplicationError::from(DomainError::MissingField("product_name"));

        assert_eq!(error.error_class(), "validation");
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.to_string(), "required field `product_name` is missing");
    }

    #[test]
    fn validation_has_user_safe_message() {
        let error = ApplicationError::from(DomainError::InvariantViolation(
            "final price recomputed out of band".to_owned(),
        ));

        assert_eq!(
            error.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn persistence_error_maps_to_persistence_exit_code() {
        let error = ApplicationError::Persistence("database lock timeout".to_owned());

        assert_eq!(error.error_class(), "persistence");
        assert_eq!(error.exit_code(), 6);
    }

    #[test]
    fn auth_error_maps_to_authentication_class() {
        let error = ApplicationError::from(AuthError::Rejected);

        assert_eq!(error.error_class(), "authentication");
        assert_eq!(error.exit_code(), 7);
        assert_eq!(error.user_message(), "Admin access was denied.");
    }
}
