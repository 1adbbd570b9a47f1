//! `rightsflow-agents` — the Agent aggregate and its value objects.

pub mod agent;
pub mod values;

pub use agent::{
    Agent, AgentCreated, AgentEvent, AgentPromoted, EmailUpdated, ProductAdded, ProductRemoved,
};
pub use values::{EmailAddress, Username};
