//! Repository adapters over the in-memory store.
//!
//! Reads come straight from the store; writes are staged into the active
//! change set and only reach the store when the unit of work persists them.

use std::sync::Arc;

use async_trait::async_trait;

use rightsflow_agents::Agent;
use rightsflow_app::{AgentRepository, ProductRepository};
use rightsflow_core::{AgentId, DomainError, DomainResult, ProductId};
use rightsflow_products::Product;

use crate::memory::store::{ChangeSet, InMemoryStore, StagedAggregate};

pub struct InMemoryAgentRepository {
    store: Arc<InMemoryStore>,
    change_set: Arc<ChangeSet>,
}

impl InMemoryAgentRepository {
    pub fn new(store: Arc<InMemoryStore>, change_set: Arc<ChangeSet>) -> Self {
        Self { store, change_set }
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn get(&self, id: AgentId) -> DomainResult<Agent> {
        self.store.agent(id)
    }

    async fn add(&self, agent: Agent) -> DomainResult<()> {
        if self.store.contains_agent(agent.id_typed())? {
            return Err(DomainError::conflict(format!(
                "agent {} already exists",
                agent.id_typed()
            )));
        }
        self.change_set.stage(StagedAggregate::Agent(agent))
    }

    async fn save(&self, agent: Agent) -> DomainResult<()> {
        self.change_set.stage(StagedAggregate::Agent(agent))
    }
}

pub struct InMemoryProductRepository {
    store: Arc<InMemoryStore>,
    change_set: Arc<ChangeSet>,
}

impl InMemoryProductRepository {
    pub fn new(store: Arc<InMemoryStore>, change_set: Arc<ChangeSet>) -> Self {
        Self { store, change_set }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get(&self, id: ProductId) -> DomainResult<Product> {
        self.store.product(id)
    }

    async fn add(&self, product: Product) -> DomainResult<()> {
        if self.store.contains_product(product.id_typed())? {
            return Err(DomainError::conflict(format!(
                "product {} already exists",
                product.id_typed()
            )));
        }
        self.change_set.stage(StagedAggregate::Product(product))
    }

    async fn save(&self, product: Product) -> DomainResult<()> {
        self.change_set.stage(StagedAggregate::Product(product))
    }
}
