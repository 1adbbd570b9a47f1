//! Shared in-memory store + per-command change staging.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use rightsflow_agents::Agent;
use rightsflow_core::{AgentId, DomainError, DomainResult, ProductId};
use rightsflow_products::Product;

/// Point-in-time copy of the store, taken by the transaction manager at
/// `begin` and restored on rollback.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    agents: HashMap<AgentId, Agent>,
    products: HashMap<ProductId, Product>,
}

/// In-memory backing store for both aggregates.
///
/// Lock poisoning is mapped to `Critical` rather than unwrapped; a poisoned
/// store is unrecoverable for the process, not for the domain.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    agents: RwLock<HashMap<AgentId, Agent>>,
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(&self, id: AgentId) -> DomainResult<Agent> {
        self.agents
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn product(&self, id: ProductId) -> DomainResult<Product> {
        self.products
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn contains_agent(&self, id: AgentId) -> DomainResult<bool> {
        Ok(self.agents.read().map_err(|_| poisoned())?.contains_key(&id))
    }

    pub fn contains_product(&self, id: ProductId) -> DomainResult<bool> {
        Ok(self
            .products
            .read()
            .map_err(|_| poisoned())?
            .contains_key(&id))
    }

    pub(crate) fn put_agent(&self, agent: Agent) -> DomainResult<()> {
        self.agents
            .write()
            .map_err(|_| poisoned())?
            .insert(agent.id_typed(), agent);
        Ok(())
    }

    pub(crate) fn put_product(&self, product: Product) -> DomainResult<()> {
        self.products
            .write()
            .map_err(|_| poisoned())?
            .insert(product.id_typed(), product);
        Ok(())
    }

    pub fn snapshot(&self) -> DomainResult<StoreSnapshot> {
        Ok(StoreSnapshot {
            agents: self.agents.read().map_err(|_| poisoned())?.clone(),
            products: self.products.read().map_err(|_| poisoned())?.clone(),
        })
    }

    pub fn restore(&self, snapshot: StoreSnapshot) -> DomainResult<()> {
        *self.agents.write().map_err(|_| poisoned())? = snapshot.agents;
        *self.products.write().map_err(|_| poisoned())? = snapshot.products;
        Ok(())
    }
}

fn poisoned() -> DomainError {
    DomainError::critical("store lock poisoned")
}

/// An aggregate staged for persistence, queued events still attached.
#[derive(Debug, Clone)]
pub enum StagedAggregate {
    Agent(Agent),
    Product(Product),
}

/// Aggregates staged by the repositories during the active command.
///
/// Drained by the unit of work at `save_entities`; cleared by the
/// transaction manager on commit/rollback so nothing leaks across commands.
#[derive(Debug, Default)]
pub struct ChangeSet {
    staged: Mutex<Vec<StagedAggregate>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, aggregate: StagedAggregate) -> DomainResult<()> {
        self.staged.lock().map_err(|_| poisoned())?.push(aggregate);
        Ok(())
    }

    /// Atomically take everything staged so far.
    pub fn take(&self) -> DomainResult<Vec<StagedAggregate>> {
        Ok(core::mem::take(
            &mut *self.staged.lock().map_err(|_| poisoned())?,
        ))
    }

    pub fn clear(&self) -> DomainResult<()> {
        self.staged.lock().map_err(|_| poisoned())?.clear();
        Ok(())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.staged.lock().map_err(|_| poisoned())?.is_empty())
    }
}
