//! Value objects owned by the agents bounded context.

use serde::{Deserialize, Serialize};

use rightsflow_core::{DomainError, DomainResult, ValueObject};

/// Name an agent signs in with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub const MIN_LENGTH: usize = 5;
    pub const MAX_LENGTH: usize = 50;

    /// Validating constructor: trims, then enforces the length bounds.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid(
                "agent.username.empty",
                "username must not be empty",
            ));
        }

        let len = trimmed.chars().count();
        if len < Self::MIN_LENGTH || len > Self::MAX_LENGTH {
            return Err(DomainError::invalid(
                "agent.username.length",
                format!(
                    "username must be between {} and {} characters, got {len}",
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH
                ),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Username {}

impl core::fmt::Display for Username {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address an agent is reachable at.
///
/// Deliberately stricter than "anything with an @": exactly one `@`, no
/// whitespace, a `.` in the domain part at least two characters past the
/// `@`, and no trailing `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const MAX_LENGTH: usize = 100;

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid(
                "agent.email.empty",
                "email must not be empty",
            ));
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::invalid(
                "agent.email.length",
                format!("email must not exceed {} characters", Self::MAX_LENGTH),
            ));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::invalid(
                "agent.email.whitespace",
                "email must not contain whitespace",
            ));
        }
        if trimmed.matches('@').count() != 1 {
            return Err(DomainError::invalid(
                "agent.email.at-sign",
                "email must contain exactly one '@'",
            ));
        }
        if trimmed.ends_with('.') {
            return Err(DomainError::invalid(
                "agent.email.trailing-dot",
                "email must not end with '.'",
            ));
        }

        // '@' is ASCII, so slicing at its byte offset is char-safe.
        let at = trimmed.find('@').unwrap_or_default();
        let domain = &trimmed[at + 1..];
        let has_dot = domain
            .chars()
            .enumerate()
            .any(|(idx, c)| c == '.' && idx >= 2);
        if !has_dot {
            return Err(DomainError::invalid(
                "agent.email.domain",
                "email domain must contain a '.' at least two characters after the '@'",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for EmailAddress {}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
