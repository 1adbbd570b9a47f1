//! Command contract + explicit cross-cutting metadata.

use async_trait::async_trait;

use rightsflow_auth::{AccessPolicy, ResourceClaim};
use rightsflow_core::DomainResult;

/// A command or query routed through the behavior pipeline.
///
/// Cross-cutting requirements are declared as plain data on the command type
/// and inspected by the behaviors — no runtime reflection involved.
pub trait Command: Send + Sync + core::fmt::Debug {
    /// Access requirement checked by the authorization behavior.
    fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::Authenticated
    }

    /// Owned resources checked by the resource-owner behavior.
    fn resource_claim(&self) -> Option<ResourceClaim> {
        None
    }
}

/// Handles one command type.
///
/// Handlers sequence lookups and a single domain call; the first failure
/// short-circuits and nothing is persisted.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    type Output: Send;

    async fn handle(&self, command: &C) -> DomainResult<Self::Output>;
}
