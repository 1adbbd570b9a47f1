//! `rightsflow-infra` — in-memory infrastructure behind the application ports.
//!
//! SQL backends are intentionally out of scope; everything here is backed by
//! an in-process store with the same transactional discipline a database
//! adapter would provide (staged change sets, snapshots, rollback).

pub mod current_agent;
pub mod memory;
pub mod ownership;

#[cfg(test)]
mod integration_tests;

pub use current_agent::StoreCurrentAgent;
pub use memory::{
    ChangeSet, InMemoryAgentRepository, InMemoryProductRepository, InMemoryStore,
    InMemoryTransactionManager, InMemoryUnitOfWork, StagedAggregate,
};
pub use ownership::CachedOwnership;
