//! Read-side queries. Same pipeline as commands, no persistence step.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use rightsflow_agents::Agent;
use rightsflow_auth::Role;
use rightsflow_core::{AgentId, DomainResult, ProductId};
use rightsflow_products::{Currency, Product, ProductStatus};

use crate::command::{Command, CommandHandler};
use crate::ports::{AgentRepository, ProductRepository};

/// Query: fetch one agent.
#[derive(Debug, Clone)]
pub struct GetAgent {
    pub agent_id: AgentId,
}

impl Command for GetAgent {}

/// Flat read model of an agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentView {
    pub id: AgentId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub products: Vec<ProductId>,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id_typed(),
            username: agent.username().to_string(),
            email: agent.email().to_string(),
            role: agent.role(),
            products: agent.products().to_vec(),
        }
    }
}

pub struct GetAgentHandler {
    agents: Arc<dyn AgentRepository>,
}

impl GetAgentHandler {
    pub fn new(agents: Arc<dyn AgentRepository>) -> Self {
        Self { agents }
    }
}

#[async_trait]
impl CommandHandler<GetAgent> for GetAgentHandler {
    type Output = AgentView;

    async fn handle(&self, query: &GetAgent) -> DomainResult<AgentView> {
        let agent = self.agents.get(query.agent_id).await?;
        Ok(AgentView::from(&agent))
    }
}

/// Query: fetch one product.
#[derive(Debug, Clone)]
pub struct GetProduct {
    pub product_id: ProductId,
}

impl Command for GetProduct {}

/// Flat read model of a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub manager: AgentId,
    pub status: ProductStatus,
    pub workers: Vec<AgentId>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id_typed(),
            name: product.name().to_string(),
            description: product.description().as_str().to_string(),
            amount: product.price().amount(),
            currency: product.price().currency(),
            manager: product.manager(),
            status: product.status(),
            workers: product.workers().to_vec(),
        }
    }
}

pub struct GetProductHandler {
    products: Arc<dyn ProductRepository>,
}

impl GetProductHandler {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CommandHandler<GetProduct> for GetProductHandler {
    type Output = ProductView;

    async fn handle(&self, query: &GetProduct) -> DomainResult<ProductView> {
        let product = self.products.get(query.product_id).await?;
        Ok(ProductView::from(&product))
    }
}
