//! Aggregate root contract: consistency boundary + queued domain events.

use crate::entity::Entity;

/// Aggregate root marker + minimal interface.
///
/// An aggregate mutates through its own domain methods, which validate the
/// requested change and append a domain event to an internal buffer. The
/// buffer is exposed only through [`AggregateRoot::pop_events`], which the
/// unit of work calls at commit time to publish everything that happened in
/// the current transaction.
pub trait AggregateRoot: Entity {
    /// Domain event type queued by this aggregate.
    type Event: Clone + core::fmt::Debug;

    /// Events queued since the last drain, in occurrence order.
    fn pending_events(&self) -> &[Self::Event];

    /// Atomically return and clear the queued events.
    ///
    /// Implementations use `std::mem::take` so the queue is empty afterwards;
    /// a second call right away yields nothing.
    fn pop_events(&mut self) -> Vec<Self::Event>;
}
