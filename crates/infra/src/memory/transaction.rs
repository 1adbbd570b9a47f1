//! Nested-aware transaction manager over the in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use rightsflow_app::TransactionManager;
use rightsflow_core::{DomainError, DomainResult};

use crate::memory::store::{ChangeSet, InMemoryStore, StoreSnapshot};

/// Transaction manager backed by store snapshots.
///
/// The outermost `begin` snapshots the store and owns the transaction;
/// nested `begin` calls join it. Rollback restores the snapshot and discards
/// anything still staged, giving all-or-nothing semantics per command.
pub struct InMemoryTransactionManager {
    store: Arc<InMemoryStore>,
    change_set: Arc<ChangeSet>,
    active: Mutex<Option<StoreSnapshot>>,
}

impl InMemoryTransactionManager {
    pub fn new(store: Arc<InMemoryStore>, change_set: Arc<ChangeSet>) -> Self {
        Self {
            store,
            change_set,
            active: Mutex::new(None),
        }
    }

    pub fn is_active(&self) -> DomainResult<bool> {
        Ok(self
            .active
            .lock()
            .map_err(|_| DomainError::critical("transaction lock poisoned"))?
            .is_some())
    }
}

#[async_trait]
impl TransactionManager for InMemoryTransactionManager {
    async fn begin(&self) -> DomainResult<bool> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| DomainError::critical("transaction lock poisoned"))?;

        if active.is_some() {
            // Nested invocation: reuse the active transaction.
            return Ok(false);
        }

        *active = Some(self.store.snapshot()?);
        Ok(true)
    }

    async fn commit(&self) -> DomainResult<()> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| DomainError::critical("transaction lock poisoned"))?;

        if active.take().is_none() {
            return Err(DomainError::critical("commit without an active transaction"));
        }

        // Anything still staged was never saved; it does not survive the
        // command.
        self.change_set.clear()?;
        tracing::info!("transaction committed");
        Ok(())
    }

    async fn rollback(&self) -> DomainResult<()> {
        let snapshot = {
            let mut active = self
                .active
                .lock()
                .map_err(|_| DomainError::critical("transaction lock poisoned"))?;
            active
                .take()
                .ok_or_else(|| DomainError::critical("rollback without an active transaction"))?
        };

        self.store.restore(snapshot)?;
        self.change_set.clear()?;
        tracing::warn!("transaction rolled back");
        Ok(())
    }
}
