//! `rightsflow-auth` — pure authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod policy;
pub mod roles;

pub use authorize::{AuthzError, authorize};
pub use policy::{AccessPolicy, ResourceClaim, ResourceKind};
pub use roles::Role;
