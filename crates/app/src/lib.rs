//! `rightsflow-app` — application layer: ports, behavior pipeline, handlers.
//!
//! Handlers are stateless orchestrators; business rules live in the
//! aggregates. Every command runs through the same explicit behavior chain:
//! Transaction → Authorization → ResourceOwner → Handler.

pub mod command;
pub mod events;
pub mod handlers;
pub mod pipeline;
pub mod ports;

pub use command::{Command, CommandHandler};
pub use events::{OwnershipProjector, RightsEvent};
pub use pipeline::CommandBus;
pub use ports::{
    AgentRepository, CurrentAgent, ProductRepository, ResourceOwnership, TransactionManager,
    UnitOfWork,
};
