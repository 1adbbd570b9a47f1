//! Product use cases.
//!
//! Every mutating command on an existing product carries a resource claim:
//! the resource-owner behavior verifies the caller owns the product before
//! the handler runs, and the aggregate re-checks managing ownership where
//! the rule is manager-only.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rightsflow_auth::{AccessPolicy, ResourceClaim, Role};
use rightsflow_core::{AgentId, DomainResult, ProductId};
use rightsflow_products::{Currency, Price, Product};

use crate::command::{Command, CommandHandler};
use crate::ports::{AgentRepository, CurrentAgent, ProductRepository, UnitOfWork};

/// Command: create a new product managed by the calling agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: Currency,
}

impl Command for CreateProduct {
    fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::Role(Role::Manager)
    }
}

pub struct CreateProductHandler {
    products: Arc<dyn ProductRepository>,
    current: Arc<dyn CurrentAgent>,
    uow: Arc<dyn UnitOfWork>,
}

impl CreateProductHandler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        current: Arc<dyn CurrentAgent>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            products,
            current,
            uow,
        }
    }
}

#[async_trait]
impl CommandHandler<CreateProduct> for CreateProductHandler {
    type Output = ProductId;

    async fn handle(&self, command: &CreateProduct) -> DomainResult<ProductId> {
        let acting = self.current.get().await?;
        let price = Price::new(command.amount, command.currency)?;

        let product = Product::create(
            &command.name,
            &command.description,
            price,
            acting.id_typed(),
            None,
        )?;
        let id = product.id_typed();

        self.products.add(product).await?;
        self.uow.save_entities().await?;
        Ok(id)
    }
}

/// Command: reprice a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductPrice {
    pub product_id: ProductId,
    pub amount: Decimal,
    pub currency: Currency,
    pub reason: String,
}

impl Command for UpdateProductPrice {
    fn resource_claim(&self) -> Option<ResourceClaim> {
        Some(ResourceClaim::products([self.product_id]))
    }
}

pub struct UpdateProductPriceHandler {
    products: Arc<dyn ProductRepository>,
    current: Arc<dyn CurrentAgent>,
    uow: Arc<dyn UnitOfWork>,
}

impl UpdateProductPriceHandler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        current: Arc<dyn CurrentAgent>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            products,
            current,
            uow,
        }
    }
}

#[async_trait]
impl CommandHandler<UpdateProductPrice> for UpdateProductPriceHandler {
    type Output = ();

    async fn handle(&self, command: &UpdateProductPrice) -> DomainResult<()> {
        let acting = self.current.get().await?;
        let price = Price::new(command.amount, command.currency)?;
        let mut product = self.products.get(command.product_id).await?;

        product.update_price(acting.id_typed(), price, &command.reason)?;

        self.products.save(product).await?;
        self.uow.save_entities().await
    }
}

/// Command: rewrite a product's description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductDescription {
    pub product_id: ProductId,
    pub description: String,
}

impl Command for UpdateProductDescription {
    fn resource_claim(&self) -> Option<ResourceClaim> {
        Some(ResourceClaim::products([self.product_id]))
    }
}

pub struct UpdateProductDescriptionHandler {
    products: Arc<dyn ProductRepository>,
    current: Arc<dyn CurrentAgent>,
    uow: Arc<dyn UnitOfWork>,
}

impl UpdateProductDescriptionHandler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        current: Arc<dyn CurrentAgent>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            products,
            current,
            uow,
        }
    }
}

#[async_trait]
impl CommandHandler<UpdateProductDescription> for UpdateProductDescriptionHandler {
    type Output = ();

    async fn handle(&self, command: &UpdateProductDescription) -> DomainResult<()> {
        let acting = self.current.get().await?;
        let mut product = self.products.get(command.product_id).await?;

        product.update_description(acting.id_typed(), &command.description)?;

        self.products.save(product).await?;
        self.uow.save_entities().await
    }
}

/// Command: publish a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishProduct {
    pub product_id: ProductId,
}

impl Command for PublishProduct {
    fn resource_claim(&self) -> Option<ResourceClaim> {
        Some(ResourceClaim::products([self.product_id]))
    }
}

pub struct PublishProductHandler {
    products: Arc<dyn ProductRepository>,
    current: Arc<dyn CurrentAgent>,
    uow: Arc<dyn UnitOfWork>,
}

impl PublishProductHandler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        current: Arc<dyn CurrentAgent>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            products,
            current,
            uow,
        }
    }
}

#[async_trait]
impl CommandHandler<PublishProduct> for PublishProductHandler {
    type Output = ();

    async fn handle(&self, command: &PublishProduct) -> DomainResult<()> {
        let acting = self.current.get().await?;
        let mut product = self.products.get(command.product_id).await?;

        product.publish(acting.id_typed())?;

        self.products.save(product).await?;
        self.uow.save_entities().await
    }
}

/// Command: retire a product for good.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObsoleteProduct {
    pub product_id: ProductId,
}

impl Command for ObsoleteProduct {
    fn resource_claim(&self) -> Option<ResourceClaim> {
        Some(ResourceClaim::products([self.product_id]))
    }
}

pub struct ObsoleteProductHandler {
    products: Arc<dyn ProductRepository>,
    current: Arc<dyn CurrentAgent>,
    uow: Arc<dyn UnitOfWork>,
}

impl ObsoleteProductHandler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        current: Arc<dyn CurrentAgent>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            products,
            current,
            uow,
        }
    }
}

#[async_trait]
impl CommandHandler<ObsoleteProduct> for ObsoleteProductHandler {
    type Output = ();

    async fn handle(&self, command: &ObsoleteProduct) -> DomainResult<()> {
        let acting = self.current.get().await?;
        let mut product = self.products.get(command.product_id).await?;

        product.obsolete(acting.id_typed())?;

        self.products.save(product).await?;
        self.uow.save_entities().await
    }
}

/// Command: assign a worker to a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignWorker {
    pub product_id: ProductId,
    pub worker_id: AgentId,
}

impl Command for AssignWorker {
    fn resource_claim(&self) -> Option<ResourceClaim> {
        Some(ResourceClaim::products([self.product_id]))
    }
}

pub struct AssignWorkerHandler {
    products: Arc<dyn ProductRepository>,
    agents: Arc<dyn AgentRepository>,
    current: Arc<dyn CurrentAgent>,
    uow: Arc<dyn UnitOfWork>,
}

impl AssignWorkerHandler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        agents: Arc<dyn AgentRepository>,
        current: Arc<dyn CurrentAgent>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            products,
            agents,
            current,
            uow,
        }
    }
}

#[async_trait]
impl CommandHandler<AssignWorker> for AssignWorkerHandler {
    type Output = ();

    async fn handle(&self, command: &AssignWorker) -> DomainResult<()> {
        let acting = self.current.get().await?;
        let mut product = self.products.get(command.product_id).await?;
        // The worker must exist; the ownership projector mutates it later in
        // this same transaction.
        self.agents.get(command.worker_id).await?;

        product.assign_worker(acting.id_typed(), command.worker_id)?;

        self.products.save(product).await?;
        self.uow.save_entities().await
    }
}

/// Command: remove a worker from a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnassignWorker {
    pub product_id: ProductId,
    pub worker_id: AgentId,
}

impl Command for UnassignWorker {
    fn resource_claim(&self) -> Option<ResourceClaim> {
        Some(ResourceClaim::products([self.product_id]))
    }
}

pub struct UnassignWorkerHandler {
    products: Arc<dyn ProductRepository>,
    current: Arc<dyn CurrentAgent>,
    uow: Arc<dyn UnitOfWork>,
}

impl UnassignWorkerHandler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        current: Arc<dyn CurrentAgent>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            products,
            current,
            uow,
        }
    }
}

#[async_trait]
impl CommandHandler<UnassignWorker> for UnassignWorkerHandler {
    type Output = ();

    async fn handle(&self, command: &UnassignWorker) -> DomainResult<()> {
        let acting = self.current.get().await?;
        let mut product = self.products.get(command.product_id).await?;

        product.unassign_worker(acting.id_typed(), command.worker_id)?;

        self.products.save(product).await?;
        self.uow.save_entities().await
    }
}
