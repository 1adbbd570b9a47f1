//! Command and query handlers, one per use case.

pub mod agents;
pub mod products;
pub mod queries;
