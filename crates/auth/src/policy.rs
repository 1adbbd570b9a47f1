use uuid::Uuid;

use rightsflow_core::ProductId;

use crate::Role;

/// Access requirement a command declares for the authorization behavior.
///
/// This replaces runtime attribute reflection: each command type states its
/// policy explicitly and the pipeline inspects it as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No authentication required.
    Public,
    /// A resolvable current agent is required; any role passes.
    Authenticated,
    /// The current agent's role must rank at least as strong as the given one.
    Role(Role),
}

/// Kind of resource named by a [`ResourceClaim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Product,
}

/// Resource instances a command touches that the caller must own.
///
/// Built by the command itself from its typed id fields; the resource-owner
/// behavior checks every id. An empty id set is a programmer error, not a
/// domain failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceClaim {
    pub kind: ResourceKind,
    pub ids: Vec<Uuid>,
}

impl ResourceClaim {
    pub fn new(kind: ResourceKind, ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            kind,
            ids: ids.into_iter().collect(),
        }
    }

    /// Claim over one or more products.
    pub fn products(ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self::new(ResourceKind::Product, ids.into_iter().map(Uuid::from))
    }
}
