//! Domain event contract.

use chrono::{DateTime, Utc};

/// A domain event: an immutable fact describing something that happened
/// inside an aggregate.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **timestamped at construction** (business time)
/// - queued on the aggregate until the unit of work drains and publishes them
pub trait DomainEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "products.product.published").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (fixed when the event was created).
    fn occurred_at(&self) -> DateTime<Utc>;
}
