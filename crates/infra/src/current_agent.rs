//! Request-identity resolution against the store.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use rightsflow_agents::Agent;
use rightsflow_app::CurrentAgent;
use rightsflow_core::{AgentId, DomainError, DomainResult};

use crate::memory::InMemoryStore;

/// Resolves the authenticated agent for the current request.
///
/// The authenticated id is bound by whatever fronts this process (an HTTP
/// layer, a test); resolution always goes through the store so a revoked or
/// deleted agent stops authenticating immediately.
pub struct StoreCurrentAgent {
    store: Arc<InMemoryStore>,
    authenticated: RwLock<Option<AgentId>>,
}

impl StoreCurrentAgent {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            authenticated: RwLock::new(None),
        }
    }

    /// Bind the authenticated identity.
    pub fn sign_in(&self, id: AgentId) -> DomainResult<()> {
        *self
            .authenticated
            .write()
            .map_err(|_| DomainError::critical("identity lock poisoned"))? = Some(id);
        Ok(())
    }

    pub fn sign_out(&self) -> DomainResult<()> {
        *self
            .authenticated
            .write()
            .map_err(|_| DomainError::critical("identity lock poisoned"))? = None;
        Ok(())
    }
}

#[async_trait]
impl CurrentAgent for StoreCurrentAgent {
    async fn get(&self) -> DomainResult<Agent> {
        let id = self
            .authenticated
            .read()
            .map_err(|_| DomainError::critical("identity lock poisoned"))?
            .ok_or_else(|| {
                DomainError::invalid(
                    "auth.identity.missing",
                    "no authenticated agent bound to this request",
                )
            })?;

        self.store.agent(id)
    }
}

#[cfg(test)]
mod tests {
    use rightsflow_auth::Role;
    use rightsflow_core::AggregateRoot;

    use super::*;

    #[tokio::test]
    async fn resolves_the_signed_in_agent() {
        let store = Arc::new(InMemoryStore::new());
        let mut agent = Agent::create("alice_m", "alice@example.com", Role::Manager, None).unwrap();
        agent.pop_events();
        let id = agent.id_typed();
        store.put_agent(agent).unwrap();

        let current = StoreCurrentAgent::new(store);
        current.sign_in(id).unwrap();

        let resolved = current.get().await.unwrap();
        assert_eq!(resolved.id_typed(), id);

        current.sign_out().unwrap();
        assert!(current.get().await.is_err());
    }

    #[tokio::test]
    async fn missing_identity_is_invalid() {
        let current = StoreCurrentAgent::new(Arc::new(InMemoryStore::new()));
        let err = current.get().await.unwrap_err();
        assert!(err.has_code("auth.identity.missing"));
    }

    #[tokio::test]
    async fn unknown_identity_is_not_found() {
        let current = StoreCurrentAgent::new(Arc::new(InMemoryStore::new()));
        current.sign_in(AgentId::new()).unwrap();

        assert_eq!(current.get().await.unwrap_err(), DomainError::NotFound);
    }
}
