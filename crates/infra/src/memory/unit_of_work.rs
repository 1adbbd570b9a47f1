//! Unit of work: drain queued events, publish, persist — in that order.

use std::sync::Arc;

use async_trait::async_trait;

use rightsflow_app::{RightsEvent, UnitOfWork};
use rightsflow_core::{AggregateRoot, DomainResult};
use rightsflow_events::{DomainEvent, EventDispatcher};

use crate::memory::store::{ChangeSet, InMemoryStore, StagedAggregate};

/// In-memory unit of work.
///
/// `save_entities` runs in rounds: take everything staged, drain each
/// aggregate's queued events, publish them through the dispatcher (event
/// handlers may stage further aggregates), then persist the batch. Rounds
/// repeat until a publication stages nothing new, so every side effect lands
/// in the same commit. Publication failures propagate before the failing
/// round persists anything.
pub struct InMemoryUnitOfWork {
    store: Arc<InMemoryStore>,
    change_set: Arc<ChangeSet>,
    dispatcher: Arc<EventDispatcher<RightsEvent>>,
}

impl InMemoryUnitOfWork {
    pub fn new(
        store: Arc<InMemoryStore>,
        change_set: Arc<ChangeSet>,
        dispatcher: Arc<EventDispatcher<RightsEvent>>,
    ) -> Self {
        Self {
            store,
            change_set,
            dispatcher,
        }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn save_entities(&self) -> DomainResult<()> {
        let mut rounds = 0usize;
        loop {
            let staged = self.change_set.take()?;
            if staged.is_empty() {
                break;
            }
            rounds += 1;

            let mut events: Vec<RightsEvent> = Vec::new();
            let mut batch = Vec::with_capacity(staged.len());
            for mut aggregate in staged {
                match &mut aggregate {
                    StagedAggregate::Agent(agent) => {
                        events.extend(agent.pop_events().into_iter().map(RightsEvent::from));
                    }
                    StagedAggregate::Product(product) => {
                        events.extend(product.pop_events().into_iter().map(RightsEvent::from));
                    }
                }
                batch.push(aggregate);
            }

            for event in &events {
                tracing::debug!(event_type = event.event_type(), "publishing domain event");
                self.dispatcher.publish(event).await?;
            }

            for aggregate in batch {
                match aggregate {
                    StagedAggregate::Agent(agent) => self.store.put_agent(agent)?,
                    StagedAggregate::Product(product) => self.store.put_product(product)?,
                }
            }
        }

        tracing::info!(rounds, "change set persisted");
        Ok(())
    }
}
