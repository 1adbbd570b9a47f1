//! In-memory store, repositories, unit of work, and transaction manager.

pub mod repository;
pub mod store;
pub mod transaction;
pub mod unit_of_work;

pub use repository::{InMemoryAgentRepository, InMemoryProductRepository};
pub use store::{ChangeSet, InMemoryStore, StagedAggregate, StoreSnapshot};
pub use transaction::InMemoryTransactionManager;
pub use unit_of_work::InMemoryUnitOfWork;
