use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rightsflow_core::{AgentId, AggregateRoot, DomainError, DomainResult, Entity, ProductId, zip};
use rightsflow_events::DomainEvent;

use crate::values::{Description, Price, ProductName};

/// Product status lifecycle.
///
/// Transitions are one-directional: `Development → Published → Obsolete`,
/// with `Development → Obsolete` as a shortcut. `Obsolete` is terminal, and
/// re-entering the current status is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Development,
    Published,
    Obsolete,
}

/// Aggregate root: Product (a digital-rights product managed by one agent).
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: ProductName,
    description: Description,
    price: Price,
    manager: AgentId,
    status: ProductStatus,
    workers: Vec<AgentId>,
    events: Vec<ProductEvent>,
}

impl Product {
    /// Validating factory.
    ///
    /// Name and description are validated jointly; the price arrives already
    /// validated. New products start in `Development`. Queues
    /// [`ProductCreated`] on success.
    pub fn create(
        name: &str,
        description: &str,
        price: Price,
        manager: AgentId,
        id: Option<ProductId>,
    ) -> DomainResult<Self> {
        let (name, description) = zip(ProductName::parse(name), Description::parse(description))?;
        let id = id.unwrap_or_else(ProductId::new);

        let mut product = Self {
            id,
            name: name.clone(),
            description,
            price,
            manager,
            status: ProductStatus::Development,
            workers: Vec::new(),
            events: Vec::new(),
        };
        product.record(ProductEvent::Created(ProductCreated {
            product_id: id,
            name,
            price,
            manager_id: manager,
            occurred_at: Utc::now(),
        }));
        Ok(product)
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &ProductName {
        &self.name
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn manager(&self) -> AgentId {
        self.manager
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn workers(&self) -> &[AgentId] {
        &self.workers
    }

    /// Replace the price. Only the managing agent may reprice.
    pub fn update_price(
        &mut self,
        acting: AgentId,
        new_price: Price,
        reason: &str,
    ) -> DomainResult<()> {
        self.ensure_manager(acting)?;

        let old_price = core::mem::replace(&mut self.price, new_price);
        self.record(ProductEvent::PriceUpdated(PriceUpdated {
            product_id: self.id,
            old_price,
            new_price,
            reason: reason.to_string(),
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Replace the description, re-validating the new value.
    pub fn update_description(&mut self, acting: AgentId, new_description: &str) -> DomainResult<()> {
        self.ensure_manager(acting)?;

        let new_description = Description::parse(new_description)?;
        let old_description = core::mem::replace(&mut self.description, new_description.clone());
        self.record(ProductEvent::DescriptionUpdated(DescriptionUpdated {
            product_id: self.id,
            old_description,
            new_description,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Move the product to `Published`.
    pub fn publish(&mut self, acting: AgentId) -> DomainResult<()> {
        self.ensure_manager(acting)?;

        match self.status {
            ProductStatus::Obsolete => Err(DomainError::invalid(
                "product.status.invalid-status-change",
                "obsolete products cannot be published",
            )),
            ProductStatus::Published => Err(DomainError::invalid(
                "product.status.already-in-status",
                "product is already published",
            )),
            ProductStatus::Development => {
                self.status = ProductStatus::Published;
                self.record(ProductEvent::Published(ProductPublished {
                    product_id: self.id,
                    published_by: acting,
                    occurred_at: Utc::now(),
                }));
                Ok(())
            }
        }
    }

    /// Move the product to `Obsolete` (terminal). Legal from any non-terminal
    /// status.
    pub fn obsolete(&mut self, acting: AgentId) -> DomainResult<()> {
        self.ensure_manager(acting)?;

        if self.status == ProductStatus::Obsolete {
            return Err(DomainError::invalid(
                "product.status.already-in-status",
                "product is already obsolete",
            ));
        }

        self.status = ProductStatus::Obsolete;
        self.record(ProductEvent::Obsoleted(ProductObsoleted {
            product_id: self.id,
            obsoleted_by: acting,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Assign a worker to this product.
    pub fn assign_worker(&mut self, acting: AgentId, worker_id: AgentId) -> DomainResult<()> {
        self.ensure_manager(acting)?;

        if self.workers.contains(&worker_id) {
            return Err(DomainError::invalid(
                "product.workers.already-assigned",
                format!("agent {worker_id} is already assigned to this product"),
            ));
        }

        self.workers.push(worker_id);
        self.record(ProductEvent::WorkerAssigned(WorkerAssigned {
            product_id: self.id,
            worker_id,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Remove a worker from this product.
    pub fn unassign_worker(&mut self, acting: AgentId, worker_id: AgentId) -> DomainResult<()> {
        self.ensure_manager(acting)?;

        let Some(pos) = self.workers.iter().position(|w| *w == worker_id) else {
            return Err(DomainError::invalid(
                "product.workers.not-assigned",
                format!("agent {worker_id} is not assigned to this product"),
            ));
        };

        self.workers.remove(pos);
        self.record(ProductEvent::WorkerUnassigned(WorkerUnassigned {
            product_id: self.id,
            worker_id,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    fn ensure_manager(&self, acting: AgentId) -> DomainResult<()> {
        if acting != self.manager {
            return Err(DomainError::invalid(
                "product.manager.invalid",
                "acting agent is not the managing agent of this product",
            ));
        }
        Ok(())
    }

    fn record(&mut self, event: ProductEvent) {
        self.events.push(event);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Product {
    type Event = ProductEvent;

    fn pending_events(&self) -> &[Self::Event] {
        &self.events
    }

    fn pop_events(&mut self) -> Vec<Self::Event> {
        core::mem::take(&mut self.events)
    }
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub name: ProductName,
    pub price: Price,
    pub manager_id: AgentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PriceUpdated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdated {
    pub product_id: ProductId,
    pub old_price: Price,
    pub new_price: Price,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DescriptionUpdated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionUpdated {
    pub product_id: ProductId,
    pub old_description: Description,
    pub new_description: Description,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductPublished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPublished {
    pub product_id: ProductId,
    pub published_by: AgentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductObsoleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductObsoleted {
    pub product_id: ProductId,
    pub obsoleted_by: AgentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: WorkerAssigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerAssigned {
    pub product_id: ProductId,
    pub worker_id: AgentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: WorkerUnassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerUnassigned {
    pub product_id: ProductId,
    pub worker_id: AgentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductEvent {
    Created(ProductCreated),
    PriceUpdated(PriceUpdated),
    DescriptionUpdated(DescriptionUpdated),
    Published(ProductPublished),
    Obsoleted(ProductObsoleted),
    WorkerAssigned(WorkerAssigned),
    WorkerUnassigned(WorkerUnassigned),
}

impl DomainEvent for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::Created(_) => "products.product.created",
            ProductEvent::PriceUpdated(_) => "products.product.price-updated",
            ProductEvent::DescriptionUpdated(_) => "products.product.description-updated",
            ProductEvent::Published(_) => "products.product.published",
            ProductEvent::Obsoleted(_) => "products.product.obsoleted",
            ProductEvent::WorkerAssigned(_) => "products.product.worker-assigned",
            ProductEvent::WorkerUnassigned(_) => "products.product.worker-unassigned",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::Created(e) => e.occurred_at,
            ProductEvent::PriceUpdated(e) => e.occurred_at,
            ProductEvent::DescriptionUpdated(e) => e.occurred_at,
            ProductEvent::Published(e) => e.occurred_at,
            ProductEvent::Obsoleted(e) => e.occurred_at,
            ProductEvent::WorkerAssigned(e) => e.occurred_at,
            ProductEvent::WorkerUnassigned(e) => e.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::values::Currency;

    use super::*;

    fn euro(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2), Currency::Euro).unwrap()
    }

    fn widget(manager: AgentId) -> Product {
        let mut product = Product::create(
            "Widget Pro",
            "A widget for professionals",
            euro(999),
            manager,
            None,
        )
        .unwrap();
        product.pop_events();
        product
    }

    #[test]
    fn create_starts_in_development_and_queues_created_event() {
        let manager = AgentId::new();
        let product = Product::create(
            "Widget Pro",
            "A widget for professionals",
            euro(999),
            manager,
            None,
        )
        .unwrap();

        assert_eq!(product.status(), ProductStatus::Development);
        assert_eq!(product.manager(), manager);
        assert_eq!(product.pending_events().len(), 1);
        match &product.pending_events()[0] {
            ProductEvent::Created(e) => {
                assert_eq!(e.product_id, product.id_typed());
                assert_eq!(e.manager_id, manager);
                assert_eq!(e.name.as_str(), "Widget Pro");
            }
            other => panic!("expected ProductCreated, got {other:?}"),
        }
    }

    #[test]
    fn create_aggregates_name_and_description_errors() {
        let err = Product::create("abc", "short", euro(999), AgentId::new(), None).unwrap_err();

        let codes = err.codes();
        assert!(codes.iter().any(|c| c.contains("name")));
        assert!(codes.iter().any(|c| c.contains("description")));
    }

    #[test]
    fn update_price_by_manager_replaces_price_and_queues_event() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        product
            .update_price(manager, euro(1299), "cost increase")
            .unwrap();
        assert_eq!(product.price().amount(), Decimal::new(1299, 2));

        let events = product.pop_events();
        match &events[0] {
            ProductEvent::PriceUpdated(e) => {
                assert_eq!(e.old_price.amount(), Decimal::new(999, 2));
                assert_eq!(e.new_price.amount(), Decimal::new(1299, 2));
                assert_eq!(e.reason, "cost increase");
            }
            other => panic!("expected PriceUpdated, got {other:?}"),
        }
    }

    #[test]
    fn update_price_rejects_non_manager() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        let err = product
            .update_price(AgentId::new(), euro(1299), "cost increase")
            .unwrap_err();
        assert!(err.has_code("product.manager.invalid"));
        assert_eq!(product.price().amount(), Decimal::new(999, 2));
    }

    #[test]
    fn update_description_checks_ownership_and_revalidates() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        let err = product
            .update_description(AgentId::new(), "A new description")
            .unwrap_err();
        assert!(err.has_code("product.manager.invalid"));

        let err = product.update_description(manager, "short").unwrap_err();
        assert!(err.has_code("product.description.length"));

        product
            .update_description(manager, "A refreshed description")
            .unwrap();
        assert_eq!(product.description().as_str(), "A refreshed description");
        assert!(matches!(
            &product.pop_events()[0],
            ProductEvent::DescriptionUpdated(_)
        ));
    }

    #[test]
    fn publish_then_obsolete_walks_the_lifecycle() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        product.publish(manager).unwrap();
        assert_eq!(product.status(), ProductStatus::Published);

        product.obsolete(manager).unwrap();
        assert_eq!(product.status(), ProductStatus::Obsolete);

        let events = product.pop_events();
        assert!(matches!(&events[0], ProductEvent::Published(_)));
        assert!(matches!(&events[1], ProductEvent::Obsoleted(_)));
    }

    #[test]
    fn publish_twice_is_rejected() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        product.publish(manager).unwrap();
        let err = product.publish(manager).unwrap_err();
        assert!(err.has_code("product.status.already-in-status"));
    }

    #[test]
    fn obsolete_is_terminal() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        product.obsolete(manager).unwrap();

        let err = product.publish(manager).unwrap_err();
        assert!(err.has_code("product.status.invalid-status-change"));

        let err = product.obsolete(manager).unwrap_err();
        assert!(err.has_code("product.status.already-in-status"));
    }

    #[test]
    fn obsolete_is_reachable_straight_from_development() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        product.obsolete(manager).unwrap();
        assert_eq!(product.status(), ProductStatus::Obsolete);
    }

    #[test]
    fn publish_rejects_non_manager() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        let err = product.publish(AgentId::new()).unwrap_err();
        assert!(err.has_code("product.manager.invalid"));
        assert_eq!(product.status(), ProductStatus::Development);
    }

    #[test]
    fn assign_worker_rejects_duplicate() {
        let manager = AgentId::new();
        let worker = AgentId::new();
        let mut product = widget(manager);

        product.assign_worker(manager, worker).unwrap();
        assert_eq!(product.workers(), &[worker]);

        let err = product.assign_worker(manager, worker).unwrap_err();
        assert!(err.has_code("product.workers.already-assigned"));
    }

    #[test]
    fn assign_worker_rejects_non_manager() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        let err = product
            .assign_worker(AgentId::new(), AgentId::new())
            .unwrap_err();
        assert!(err.has_code("product.manager.invalid"));
        assert!(product.workers().is_empty());
    }

    #[test]
    fn unassign_worker_rejects_absent_assignment() {
        let manager = AgentId::new();
        let mut product = widget(manager);

        let err = product.unassign_worker(manager, AgentId::new()).unwrap_err();
        assert!(err.has_code("product.workers.not-assigned"));
    }

    #[test]
    fn unassign_worker_removes_and_queues_event() {
        let manager = AgentId::new();
        let worker = AgentId::new();
        let mut product = widget(manager);

        product.assign_worker(manager, worker).unwrap();
        product.pop_events();

        product.unassign_worker(manager, worker).unwrap();
        assert!(product.workers().is_empty());

        let events = product.pop_events();
        assert!(matches!(
            &events[0],
            ProductEvent::WorkerUnassigned(e) if e.worker_id == worker
        ));
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: once obsolete, no status transition ever succeeds.
            #[test]
            fn obsolete_is_terminal_from_any_path(via_published in any::<bool>()) {
                let manager = AgentId::new();
                let mut product = widget(manager);

                if via_published {
                    product.publish(manager).unwrap();
                }
                product.obsolete(manager).unwrap();

                prop_assert!(product.publish(manager).is_err());
                prop_assert!(product.obsolete(manager).is_err());
                prop_assert_eq!(product.status(), ProductStatus::Obsolete);
            }

            /// Property: the price sign check is exact — zero and above pass,
            /// below zero fails.
            #[test]
            fn price_sign_is_enforced(cents in -100_000i64..100_000) {
                let result = Price::new(Decimal::new(cents, 2), Currency::Dollar);
                if cents >= 0 {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert!(result.unwrap_err().has_code("product.price.negative"));
                }
            }
        }
    }
}
