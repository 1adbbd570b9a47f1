//! Event publishing/subscription (in-transaction dispatch).
//!
//! Unlike a broker-backed bus, this dispatcher runs **inside** the owning
//! transaction: events are published synchronously and sequentially, and a
//! failing handler aborts the whole commit. Handlers therefore never observe
//! a partially-applied command.

use std::sync::Arc;

use async_trait::async_trait;

use rightsflow_core::DomainResult;

/// Handles one published event.
///
/// Registered handlers receive every event published to the dispatcher and
/// pick out the variants they care about. Returning an error propagates to
/// the unit of work and aborts the surrounding commit.
#[async_trait]
pub trait EventHandler<E>: Send + Sync
where
    E: Send + Sync,
{
    async fn handle(&self, event: &E) -> DomainResult<()>;
}

#[async_trait]
impl<E, H> EventHandler<E> for Arc<H>
where
    E: Send + Sync,
    H: EventHandler<E> + ?Sized,
{
    async fn handle(&self, event: &E) -> DomainResult<()> {
        (**self).handle(event).await
    }
}

/// Routes each published event to every registered handler, in registration
/// order.
///
/// Registration happens at wiring time (before the dispatcher is shared);
/// publication is fail-fast: the first handler error stops the sequence.
pub struct EventDispatcher<E> {
    handlers: Vec<Arc<dyn EventHandler<E>>>,
}

impl<E> EventDispatcher<E>
where
    E: Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Zero registered handlers is fine — publishing is
    /// then a no-op.
    pub fn subscribe(&mut self, handler: Arc<dyn EventHandler<E>>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Publish one event to every handler, sequentially and fail-fast.
    pub async fn publish(&self, event: &E) -> DomainResult<()> {
        for handler in &self.handlers {
            handler.handle(event).await?;
        }
        Ok(())
    }
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}
