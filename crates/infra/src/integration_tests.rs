//! Integration tests for the full command pipeline.
//!
//! Tests: Command → CommandBus (transaction/authorization/resource-owner) →
//! Handler → UnitOfWork → event publication → store.
//!
//! Verifies:
//! - Commands persist aggregates and fan domain events out to the projector
//! - Authorization and resource ownership deny before the handler runs
//! - A failing event handler aborts the whole commit

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use rightsflow_app::handlers::agents::{
    ChangeAgentEmail, ChangeAgentEmailHandler, ChangeAgentRole, ChangeAgentRoleHandler,
    RegisterAgent, RegisterAgentHandler,
};
use rightsflow_app::handlers::products::{
    AssignWorker, AssignWorkerHandler, CreateProduct, CreateProductHandler, ObsoleteProduct,
    ObsoleteProductHandler, PublishProduct, PublishProductHandler, UnassignWorker,
    UnassignWorkerHandler, UpdateProductPrice, UpdateProductPriceHandler,
};
use rightsflow_app::handlers::queries::{GetAgent, GetAgentHandler, GetProduct, GetProductHandler};
use rightsflow_app::{CommandBus, OwnershipProjector, RightsEvent};
use rightsflow_auth::Role;
use rightsflow_core::{AgentId, DomainError, ProductId};
use rightsflow_events::EventDispatcher;
use rightsflow_products::{Currency, ProductStatus};

use crate::current_agent::StoreCurrentAgent;
use crate::memory::{
    ChangeSet, InMemoryAgentRepository, InMemoryProductRepository, InMemoryStore,
    InMemoryTransactionManager, InMemoryUnitOfWork,
};
use crate::ownership::CachedOwnership;

struct TestApp {
    store: Arc<InMemoryStore>,
    current: Arc<StoreCurrentAgent>,
    bus: CommandBus,
    agents: Arc<InMemoryAgentRepository>,
    products: Arc<InMemoryProductRepository>,
    uow: Arc<InMemoryUnitOfWork>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let change_set = Arc::new(ChangeSet::new());
        let agents = Arc::new(InMemoryAgentRepository::new(store.clone(), change_set.clone()));
        let products = Arc::new(InMemoryProductRepository::new(
            store.clone(),
            change_set.clone(),
        ));

        let mut dispatcher: EventDispatcher<RightsEvent> = EventDispatcher::new();
        dispatcher.subscribe(Arc::new(OwnershipProjector::new(agents.clone())));
        let uow = Arc::new(InMemoryUnitOfWork::new(
            store.clone(),
            change_set.clone(),
            Arc::new(dispatcher),
        ));

        let current = Arc::new(StoreCurrentAgent::new(store.clone()));
        let ownership = Arc::new(CachedOwnership::new(store.clone(), Duration::from_secs(60)));
        let transactions = Arc::new(InMemoryTransactionManager::new(store.clone(), change_set));
        let bus = CommandBus::new(transactions, current.clone(), ownership);

        Self {
            store,
            current,
            bus,
            agents,
            products,
            uow,
        }
    }

    async fn register(&self, username: &str, email: &str, role: Role) -> AgentId {
        let handler = RegisterAgentHandler::new(self.agents.clone(), self.uow.clone());
        let command = RegisterAgent {
            username: username.to_string(),
            email: email.to_string(),
            role,
        };
        self.bus.dispatch(&command, &handler).await.unwrap()
    }

    async fn sign_in_as(&self, username: &str, email: &str, role: Role) -> AgentId {
        let id = self.register(username, email, role).await;
        self.current.sign_in(id).unwrap();
        id
    }

    async fn create_product(&self, name: &str, description: &str, cents: i64) -> ProductId {
        let handler = CreateProductHandler::new(
            self.products.clone(),
            self.current.clone(),
            self.uow.clone(),
        );
        let command = CreateProduct {
            name: name.to_string(),
            description: description.to_string(),
            amount: Decimal::new(cents, 2),
            currency: Currency::Euro,
        };
        self.bus.dispatch(&command, &handler).await.unwrap()
    }
}

#[tokio::test]
async fn register_agent_persists_and_validates() {
    let app = TestApp::new();

    let id = app
        .register("alice_m", "alice@example.com", Role::Manager)
        .await;

    let stored = app.store.agent(id).unwrap();
    assert_eq!(stored.username().as_str(), "alice_m");
    assert_eq!(stored.role(), Role::Manager);

    // The read side agrees once the new agent authenticates.
    app.current.sign_in(id).unwrap();
    let handler = GetAgentHandler::new(app.agents.clone());
    let view = app
        .bus
        .dispatch(&GetAgent { agent_id: id }, &handler)
        .await
        .unwrap();
    assert_eq!(view.email, "alice@example.com");
    assert!(view.products.is_empty());

    // Validation failures surface every error at once.
    let handler = RegisterAgentHandler::new(app.agents.clone(), app.uow.clone());
    let command = RegisterAgent {
        username: "abc".to_string(),
        email: "not-an-email".to_string(),
        role: Role::Worker,
    };
    let err = app.bus.dispatch(&command, &handler).await.unwrap_err();
    let codes = err.codes();
    assert!(codes.iter().any(|c| c.contains("username")));
    assert!(codes.iter().any(|c| c.contains("email")));
}

#[tokio::test]
async fn manager_creates_product_and_ends_up_owning_it() {
    let app = TestApp::new();
    let manager_id = app
        .sign_in_as("alice_m", "alice@example.com", Role::Manager)
        .await;

    let product_id = app
        .create_product("Widget Pro", "A widget for professionals", 999)
        .await;

    // The product persisted in Development, priced as given.
    let product = app.store.product(product_id).unwrap();
    assert_eq!(product.status(), ProductStatus::Development);
    assert_eq!(product.manager(), manager_id);
    assert_eq!(product.price().amount(), Decimal::new(999, 2));

    // The ownership projector ran inside the same commit.
    let manager = app.store.agent(manager_id).unwrap();
    assert_eq!(manager.products(), &[product_id]);

    // And the read side sees the same thing.
    let handler = GetProductHandler::new(app.products.clone());
    let view = app
        .bus
        .dispatch(&GetProduct { product_id }, &handler)
        .await
        .unwrap();
    assert_eq!(view.name, "Widget Pro");
    assert_eq!(view.currency, Currency::Euro);
}

#[tokio::test]
async fn worker_cannot_create_products() {
    let app = TestApp::new();
    let worker_id = app
        .sign_in_as("bob_worker", "bob@example.com", Role::Worker)
        .await;

    let handler = CreateProductHandler::new(
        app.products.clone(),
        app.current.clone(),
        app.uow.clone(),
    );
    let command = CreateProduct {
        name: "Widget Pro".to_string(),
        description: "A widget for professionals".to_string(),
        amount: Decimal::new(999, 2),
        currency: Currency::Euro,
    };

    let err = app.bus.dispatch(&command, &handler).await.unwrap_err();
    assert_eq!(err, DomainError::Unauthorized);
    assert!(app.store.agent(worker_id).unwrap().products().is_empty());
}

#[tokio::test]
async fn anonymous_callers_are_rejected_before_the_handler() {
    let app = TestApp::new();

    let handler = UpdateProductPriceHandler::new(
        app.products.clone(),
        app.current.clone(),
        app.uow.clone(),
    );
    let command = UpdateProductPrice {
        product_id: ProductId::new(),
        amount: Decimal::new(100, 2),
        currency: Currency::Euro,
        reason: "test".to_string(),
    };

    let err = app.bus.dispatch(&command, &handler).await.unwrap_err();
    assert!(err.has_code("auth.identity.missing"));
}

#[tokio::test]
async fn only_the_owning_manager_may_reprice() {
    let app = TestApp::new();
    app.sign_in_as("alice_m", "alice@example.com", Role::Manager)
        .await;
    let product_id = app
        .create_product("Widget Pro", "A widget for professionals", 999)
        .await;

    let handler = UpdateProductPriceHandler::new(
        app.products.clone(),
        app.current.clone(),
        app.uow.clone(),
    );

    // Owner reprices.
    let command = UpdateProductPrice {
        product_id,
        amount: Decimal::new(1299, 2),
        currency: Currency::Euro,
        reason: "cost increase".to_string(),
    };
    app.bus.dispatch(&command, &handler).await.unwrap();
    assert_eq!(
        app.store.product(product_id).unwrap().price().amount(),
        Decimal::new(1299, 2)
    );

    // A different manager is stopped by the resource-owner behavior.
    app.sign_in_as("carol_m", "carol@example.com", Role::Manager)
        .await;
    let err = app.bus.dispatch(&command, &handler).await.unwrap_err();
    assert_eq!(err, DomainError::Unauthorized);
    assert_eq!(
        app.store.product(product_id).unwrap().price().amount(),
        Decimal::new(1299, 2)
    );
}

#[tokio::test]
async fn product_lifecycle_is_one_directional() {
    let app = TestApp::new();
    app.sign_in_as("alice_m", "alice@example.com", Role::Manager)
        .await;
    let product_id = app
        .create_product("Widget Pro", "A widget for professionals", 999)
        .await;

    let publish = PublishProductHandler::new(
        app.products.clone(),
        app.current.clone(),
        app.uow.clone(),
    );
    let obsolete = ObsoleteProductHandler::new(
        app.products.clone(),
        app.current.clone(),
        app.uow.clone(),
    );

    app.bus
        .dispatch(&PublishProduct { product_id }, &publish)
        .await
        .unwrap();
    assert_eq!(
        app.store.product(product_id).unwrap().status(),
        ProductStatus::Published
    );

    app.bus
        .dispatch(&ObsoleteProduct { product_id }, &obsolete)
        .await
        .unwrap();
    assert_eq!(
        app.store.product(product_id).unwrap().status(),
        ProductStatus::Obsolete
    );

    // Terminal: publishing again is an invalid transition.
    let err = app
        .bus
        .dispatch(&PublishProduct { product_id }, &publish)
        .await
        .unwrap_err();
    assert!(err.has_code("product.status.invalid-status-change"));
}

#[tokio::test]
async fn worker_assignment_syncs_the_workers_product_list() {
    let app = TestApp::new();
    let worker_id = app
        .register("bob_worker", "bob@example.com", Role::Worker)
        .await;
    app.sign_in_as("alice_m", "alice@example.com", Role::Manager)
        .await;
    let product_id = app
        .create_product("Widget Pro", "A widget for professionals", 999)
        .await;

    let assign = AssignWorkerHandler::new(
        app.products.clone(),
        app.agents.clone(),
        app.current.clone(),
        app.uow.clone(),
    );
    let command = AssignWorker {
        product_id,
        worker_id,
    };
    app.bus.dispatch(&command, &assign).await.unwrap();

    assert_eq!(app.store.product(product_id).unwrap().workers(), &[worker_id]);
    assert_eq!(app.store.agent(worker_id).unwrap().products(), &[product_id]);

    // Assigning the same worker twice is rejected.
    let err = app.bus.dispatch(&command, &assign).await.unwrap_err();
    assert!(err.has_code("product.workers.already-assigned"));

    // Unassigning reverses both sides.
    let unassign = UnassignWorkerHandler::new(
        app.products.clone(),
        app.current.clone(),
        app.uow.clone(),
    );
    app.bus
        .dispatch(
            &UnassignWorker {
                product_id,
                worker_id,
            },
            &unassign,
        )
        .await
        .unwrap();
    assert!(app.store.product(product_id).unwrap().workers().is_empty());
    assert!(app.store.agent(worker_id).unwrap().products().is_empty());
}

#[tokio::test]
async fn assigning_an_admin_rolls_the_whole_command_back() {
    let app = TestApp::new();
    let admin_id = app
        .register("root_admin", "root@example.com", Role::Admin)
        .await;
    app.sign_in_as("alice_m", "alice@example.com", Role::Manager)
        .await;
    let product_id = app
        .create_product("Widget Pro", "A widget for professionals", 999)
        .await;

    let assign = AssignWorkerHandler::new(
        app.products.clone(),
        app.agents.clone(),
        app.current.clone(),
        app.uow.clone(),
    );

    // The ownership projector refuses to put a product on an admin's list,
    // which aborts the commit mid-flight.
    let err = app
        .bus
        .dispatch(
            &AssignWorker {
                product_id,
                worker_id: admin_id,
            },
            &assign,
        )
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Unauthorized);

    // Nothing from the command survived the rollback.
    assert!(app.store.product(product_id).unwrap().workers().is_empty());
    assert!(app.store.agent(admin_id).unwrap().products().is_empty());
}

#[tokio::test]
async fn role_changes_require_an_admin_actor() {
    let app = TestApp::new();
    let target_id = app
        .register("bob_worker", "bob@example.com", Role::Worker)
        .await;
    let admin_id = app
        .register("root_admin", "root@example.com", Role::Admin)
        .await;

    let handler = ChangeAgentRoleHandler::new(
        app.agents.clone(),
        app.current.clone(),
        app.uow.clone(),
    );
    let command = ChangeAgentRole {
        agent_id: target_id,
        new_role: Role::Manager,
    };

    // A manager actor is rejected by the aggregate.
    app.sign_in_as("alice_m", "alice@example.com", Role::Manager)
        .await;
    let err = app.bus.dispatch(&command, &handler).await.unwrap_err();
    assert_eq!(err, DomainError::Unauthorized);
    assert_eq!(app.store.agent(target_id).unwrap().role(), Role::Worker);

    // An admin actor succeeds.
    app.current.sign_in(admin_id).unwrap();
    app.bus.dispatch(&command, &handler).await.unwrap();
    assert_eq!(app.store.agent(target_id).unwrap().role(), Role::Manager);
}

#[tokio::test]
async fn email_change_revalidates_through_the_pipeline() {
    let app = TestApp::new();
    let agent_id = app
        .sign_in_as("alice_m", "alice@example.com", Role::Manager)
        .await;

    let handler = ChangeAgentEmailHandler::new(app.agents.clone(), app.uow.clone());

    let err = app
        .bus
        .dispatch(
            &ChangeAgentEmail {
                agent_id,
                new_email: "broken".to_string(),
            },
            &handler,
        )
        .await
        .unwrap_err();
    assert!(err.codes().iter().any(|c| c.contains("email")));

    app.bus
        .dispatch(
            &ChangeAgentEmail {
                agent_id,
                new_email: "alice.new@example.com".to_string(),
            },
            &handler,
        )
        .await
        .unwrap();
    assert_eq!(
        app.store.agent(agent_id).unwrap().email().as_str(),
        "alice.new@example.com"
    );
}

#[tokio::test]
async fn unknown_targets_fail_not_found() {
    let app = TestApp::new();
    app.sign_in_as("alice_m", "alice@example.com", Role::Manager)
        .await;

    let handler = GetProductHandler::new(app.products.clone());
    let err = app
        .bus
        .dispatch(
            &GetProduct {
                product_id: ProductId::new(),
            },
            &handler,
        )
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}
