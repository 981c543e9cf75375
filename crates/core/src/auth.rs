//! Admin gate for mutating operations.
//!
//! An [`AdminSession`] can only be obtained from [`AdminGate::authenticate`], so any
//! function that takes one as an argument is reachable only by an authenticated caller.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AdminConfig;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("admin password is not configured (set [admin] password or HOTDEAL_ADMIN_PASSWORD)")]
    NotConfigured,
    #[error("admin password was rejected")]
    Rejected,
}

/// Proof of a successful admin login, scoped to a single request.
#[derive(Debug)]
pub struct AdminSession {
    _private: (),
}

#[derive(Clone, Debug)]
pub struct AdminGate {
    expected_digest: Option<[u8; 32]>,
}

impl AdminGate {
    pub fn new(password: Option<&SecretString>) -> Self {
        let expected_digest = password
            .map(|secret| secret.expose_secret())
            .filter(|value| !value.is_empty())
            .map(digest);
        Self { expected_digest }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.password.as_ref())
    }

    pub fn is_configured(&self) -> bool {
        self.expected_digest.is_some()
    }

    pub fn authenticate(&self, attempt: &str) -> Result<AdminSession, AuthError> {
        let Some(expected) = self.expected_digest.as_ref() else {
            warn!(event_name = "system.auth.not_configured", "admin password is not configured");
            return Err(AuthError::NotConfigured);
        };

        if !digests_match(expected, &digest(attempt)) {
            warn!(event_name = "system.auth.rejected", "admin authentication rejected");
            return Err(AuthError::Rejected);
        }

        info!(event_name = "system.auth.accepted", "admin authenticated");
        Ok(AdminSession { _private: () })
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.finalize().into()
}

fn digests_match(left: &[u8; 32], right: &[u8; 32]) -> bool {
    left.iter().zip(right.iter()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::{AdminGate, AuthError};
    use crate::config::AdminConfig;

    #[test]
    fn correct_password_opens_a_session() {
        let password = SecretString::from("hotdeal-admin".to_string());
        let gate = AdminGate::new(Some(&password));

        assert!(gate.is_configured());
        assert!(gate.authenticate("hotdeal-admin").is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let password = SecretString::from("hotdeal-admin".to_string());
        let gate = AdminGate::new(Some(&password));

        assert_eq!(gate.authenticate("hotdeal").map(|_| ()), Err(AuthError::Rejected));
        assert_eq!(gate.authenticate("").map(|_| ()), Err(AuthError::Rejected));
    }

    #[test]
    fn unset_password_rejects_everything() {
        let gate = AdminGate::from_config(&AdminConfig::default());
        assert!(!gate.is_configured());
        assert_eq!(gate.authenticate("").map(|_| ()), Err(AuthError::NotConfigured));

        let empty = SecretString::from(String::new());
        let gate = AdminGate::new(Some(&empty));
        assert_eq!(gate.authenticate("").map(|_| ()), Err(AuthError::NotConfigured));
    }
}
