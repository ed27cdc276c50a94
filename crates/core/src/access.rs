//! Bounded-attempt login check.
//!
//! Credentials are compared in plain text against the admin collection. An unknown
//! identifier and a wrong secret are reported as the same outcome.

use crate::records::Credential;

/// One identifier/secret pair entered by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempt {
    pub id: String,
    pub secret: String,
}

impl LoginAttempt {
    pub fn new(id: impl AsRef<str>, secret: impl AsRef<str>) -> Self {
        Self {
            id: id.as_ref().trim().to_string(),
            secret: secret.as_ref().trim().to_string(),
        }
    }
}

/// Supplies login attempts and receives rejections.
pub trait CredentialSource {
    /// Returns the next attempt, or `None` when no more input is available.
    /// `attempt` counts from 1.
    fn next_attempt(&mut self, attempt: u32) -> Option<LoginAttempt>;

    /// Called once for every attempt that matched no stored credential.
    fn reject(&mut self, attempt: u32);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted { admin_id: String },
    Denied,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccessGate {
    max_attempts: u32,
}

impl AccessGate {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Prompts for up to `max_attempts` credential pairs and grants access on the
    /// first exact match.
    pub fn authenticate(
        &self,
        credentials: &[Credential],
        source: &mut impl CredentialSource,
    ) -> AccessDecision {
        for attempt in 1..=self.max_attempts {
            let Some(login) = source.next_attempt(attempt) else {
                tracing::warn!(attempt, "login input closed before access was granted");
                return AccessDecision::Denied;
            };

            let matched = credentials
                .iter()
                .find(|c| c.id == login.id && c.secret == login.secret);
            if let Some(credential) = matched {
                tracing::info!(admin_id = %credential.id, attempt, "access granted");
                return AccessDecision::Granted {
                    admin_id: credential.id.clone(),
                };
            }

            tracing::warn!(attempt, "invalid credentials");
            source.reject(attempt);
        }

        tracing::warn!(max_attempts = self.max_attempts, "login attempts exhausted");
        AccessDecision::Denied
    }
}
