//! Application-level event envelope + cross-aggregate policy.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rightsflow_agents::AgentEvent;
use rightsflow_core::{AgentId, DomainResult, ProductId};
use rightsflow_events::{DomainEvent, EventHandler};
use rightsflow_products::ProductEvent;

use crate::ports::AgentRepository;

/// Union of every domain event the unit of work publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RightsEvent {
    Agent(AgentEvent),
    Product(ProductEvent),
}

impl From<AgentEvent> for RightsEvent {
    fn from(event: AgentEvent) -> Self {
        Self::Agent(event)
    }
}

impl From<ProductEvent> for RightsEvent {
    fn from(event: ProductEvent) -> Self {
        Self::Product(event)
    }
}

impl DomainEvent for RightsEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RightsEvent::Agent(e) => e.event_type(),
            RightsEvent::Product(e) => e.event_type(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RightsEvent::Agent(e) => e.occurred_at(),
            RightsEvent::Product(e) => e.occurred_at(),
        }
    }
}

/// Keeps agents' owned-product lists in sync with product-side facts.
///
/// Runs inside the same transaction as the command that queued the event: a
/// new product lands on its manager's list, assignment puts it on the
/// worker's list, unassignment takes it off. A failure here aborts the whole
/// commit.
pub struct OwnershipProjector {
    agents: Arc<dyn AgentRepository>,
}

impl OwnershipProjector {
    pub fn new(agents: Arc<dyn AgentRepository>) -> Self {
        Self { agents }
    }

    async fn add_to(&self, agent_id: AgentId, product_id: ProductId) -> DomainResult<()> {
        let mut agent = self.agents.get(agent_id).await?;
        agent.add_product(product_id)?;
        self.agents.save(agent).await
    }

    async fn remove_from(&self, agent_id: AgentId, product_id: ProductId) -> DomainResult<()> {
        let mut agent = self.agents.get(agent_id).await?;
        agent.remove_product(product_id)?;
        self.agents.save(agent).await
    }
}

#[async_trait]
impl EventHandler<RightsEvent> for OwnershipProjector {
    async fn handle(&self, event: &RightsEvent) -> DomainResult<()> {
        let RightsEvent::Product(event) = event else {
            return Ok(());
        };

        match event {
            ProductEvent::Created(e) => self.add_to(e.manager_id, e.product_id).await,
            ProductEvent::WorkerAssigned(e) => self.add_to(e.worker_id, e.product_id).await,
            ProductEvent::WorkerUnassigned(e) => self.remove_from(e.worker_id, e.product_id).await,
            _ => Ok(()),
        }
    }
}
