//! `rightsflow-events` — domain event contract + in-transaction dispatch.

pub mod dispatcher;
pub mod event;

pub use dispatcher::{EventDispatcher, EventHandler};
pub use event::DomainEvent;
