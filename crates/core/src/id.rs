//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Identifier of an agent aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(Uuid);

/// Identifier of a product aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal, $code:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Validated constructor. The nil uuid is never a legal identifier.
            pub fn from_uuid(uuid: Uuid) -> DomainResult<Self> {
                if uuid.is_nil() {
                    return Err(DomainError::invalid(
                        $code,
                        concat!($name, " must not be the nil uuid"),
                    ));
                }
                Ok(Self(uuid))
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl TryFrom<Uuid> for $t {
            type Error = DomainError;

            fn try_from(value: Uuid) -> Result<Self, Self::Error> {
                Self::from_uuid(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid($code, format!("{}: {e}", $name)))?;
                Self::from_uuid(uuid)
            }
        }
    };
}

impl_uuid_newtype!(AgentId, "AgentId", "agent.id.invalid");
impl_uuid_newtype!(ProductId, "ProductId", "product.id.invalid");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_uuid() {
        let id = AgentId::new();
        let again = AgentId::from_uuid(id.into_uuid()).unwrap();
        assert_eq!(id, again);
    }

    #[test]
    fn round_trips_through_string() {
        let id = ProductId::new();
        let again: ProductId = id.to_string().parse().unwrap();
        assert_eq!(id, again);
    }

    #[test]
    fn rejects_nil_uuid() {
        let err = AgentId::from_uuid(Uuid::nil()).unwrap_err();
        assert!(err.has_code("agent.id.invalid"));

        let err = ProductId::from_uuid(Uuid::nil()).unwrap_err();
        assert!(err.has_code("product.id.invalid"));
    }

    #[test]
    fn rejects_malformed_string() {
        let err = "not-a-uuid".parse::<AgentId>().unwrap_err();
        assert!(err.has_code("agent.id.invalid"));
    }
}
