//! Ports the application layer depends on; implemented by infrastructure.
//!
//! No storage assumptions here: trait objects keep the handlers testable
//! against in-memory fakes and swappable with real backends.

use async_trait::async_trait;
use uuid::Uuid;

use rightsflow_agents::Agent;
use rightsflow_auth::ResourceKind;
use rightsflow_core::{AgentId, DomainResult, ProductId};
use rightsflow_products::Product;

/// Repository for the Agent aggregate.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Load an agent by id. Fails `NotFound` when absent.
    async fn get(&self, id: AgentId) -> DomainResult<Agent>;

    /// Stage a new agent into the active change set.
    async fn add(&self, agent: Agent) -> DomainResult<()>;

    /// Stage an updated agent into the active change set.
    async fn save(&self, agent: Agent) -> DomainResult<()>;
}

/// Repository for the Product aggregate.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Load a product by id. Fails `NotFound` when absent.
    async fn get(&self, id: ProductId) -> DomainResult<Product>;

    /// Stage a new product into the active change set.
    async fn add(&self, product: Product) -> DomainResult<()>;

    /// Stage an updated product into the active change set.
    async fn save(&self, product: Product) -> DomainResult<()>;
}

/// Transactional boundary for one command.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Drain every staged aggregate's queued events, publish them inside the
    /// active transaction, then persist the change set. Handlers triggered by
    /// publication stage further changes into the same commit.
    async fn save_entities(&self) -> DomainResult<()>;
}

/// Shared-context transaction control.
///
/// One logical transaction per outermost command; nested invocations join
/// the active transaction instead of opening their own.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Begin a transaction, or join the active one. Returns `true` when this
    /// call started — and therefore owns — the transaction.
    async fn begin(&self) -> DomainResult<bool>;

    /// Commit the owned transaction.
    async fn commit(&self) -> DomainResult<()>;

    /// Roll the owned transaction back, discarding staged and persisted
    /// changes made since `begin`.
    async fn rollback(&self) -> DomainResult<()>;
}

/// Resolves the agent bound to the request's authenticated identity.
#[async_trait]
pub trait CurrentAgent: Send + Sync {
    /// Fails `Invalid`/`NotFound` when the identity is missing or does not
    /// resolve to a known agent.
    async fn get(&self) -> DomainResult<Agent>;
}

/// Answers ownership questions for resource-owner authorization.
#[async_trait]
pub trait ResourceOwnership: Send + Sync {
    /// Whether `owner` owns **every** one of `ids` of the given kind.
    async fn is_resource_owner(
        &self,
        owner: AgentId,
        kind: ResourceKind,
        ids: &[Uuid],
    ) -> DomainResult<bool>;
}
