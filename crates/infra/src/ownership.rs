//! Ownership query service with a small TTL cache.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use uuid::Uuid;

use rightsflow_app::ResourceOwnership;
use rightsflow_auth::ResourceKind;
use rightsflow_core::{AgentId, DomainError, DomainResult, ProductId};

use crate::memory::InMemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OwnershipKey {
    owner: AgentId,
    kind: ResourceKind,
    ids_hash: u64,
}

#[derive(Debug, Clone, Copy)]
struct CachedAnswer {
    owned: bool,
    cached_at: Instant,
}

/// Answers "does this agent own all of these resources?" from the owner's
/// product list, memoizing each answer per (owner, kind, id-set) for a TTL.
///
/// Id order does not affect the cache key.
pub struct CachedOwnership {
    store: Arc<InMemoryStore>,
    ttl: Duration,
    cache: Mutex<HashMap<OwnershipKey, CachedAnswer>>,
}

impl CachedOwnership {
    pub fn new(store: Arc<InMemoryStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn key(owner: AgentId, kind: ResourceKind, ids: &[Uuid]) -> OwnershipKey {
        let mut sorted: Vec<Uuid> = ids.to_vec();
        sorted.sort();

        let mut hasher = DefaultHasher::new();
        sorted.hash(&mut hasher);
        OwnershipKey {
            owner,
            kind,
            ids_hash: hasher.finish(),
        }
    }

    fn cached(&self, key: &OwnershipKey) -> DomainResult<Option<bool>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| DomainError::critical("ownership cache lock poisoned"))?;

        match cache.get(key) {
            Some(answer) if answer.cached_at.elapsed() < self.ttl => Ok(Some(answer.owned)),
            Some(_) => {
                cache.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn remember(&self, key: OwnershipKey, owned: bool) -> DomainResult<()> {
        self.cache
            .lock()
            .map_err(|_| DomainError::critical("ownership cache lock poisoned"))?
            .insert(
                key,
                CachedAnswer {
                    owned,
                    cached_at: Instant::now(),
                },
            );
        Ok(())
    }
}

#[async_trait]
impl ResourceOwnership for CachedOwnership {
    async fn is_resource_owner(
        &self,
        owner: AgentId,
        kind: ResourceKind,
        ids: &[Uuid],
    ) -> DomainResult<bool> {
        let key = Self::key(owner, kind, ids);
        if let Some(hit) = self.cached(&key)? {
            return Ok(hit);
        }

        let owned = match kind {
            ResourceKind::Product => {
                let agent = self.store.agent(owner)?;
                ids.iter().all(|id| {
                    ProductId::from_uuid(*id)
                        .map(|product_id| agent.owns_product(product_id))
                        .unwrap_or(false)
                })
            }
        };

        self.remember(key, owned)?;
        Ok(owned)
    }
}
