use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rightsflow_auth::Role;
use rightsflow_core::{AgentId, AggregateRoot, DomainError, DomainResult, Entity, ProductId, zip};
use rightsflow_events::DomainEvent;

use crate::values::{EmailAddress, Username};

/// Aggregate root: Agent (a person holding a role and owning products).
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: AgentId,
    username: Username,
    email: EmailAddress,
    role: Role,
    products: Vec<ProductId>,
    events: Vec<AgentEvent>,
}

impl Agent {
    /// Validating factory.
    ///
    /// Username and email are validated jointly so the caller sees every
    /// validation error at once instead of one per attempt. Queues
    /// [`AgentCreated`] on success.
    pub fn create(
        username: &str,
        email: &str,
        role: Role,
        id: Option<AgentId>,
    ) -> DomainResult<Self> {
        let (username, email) = zip(Username::parse(username), EmailAddress::parse(email))?;
        let id = id.unwrap_or_else(AgentId::new);

        let mut agent = Self {
            id,
            username: username.clone(),
            email: email.clone(),
            role,
            products: Vec::new(),
            events: Vec::new(),
        };
        agent.record(AgentEvent::Created(AgentCreated {
            agent_id: id,
            username,
            email,
            role,
            occurred_at: Utc::now(),
        }));
        Ok(agent)
    }

    pub fn id_typed(&self) -> AgentId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    pub fn owns_product(&self, product_id: ProductId) -> bool {
        self.products.contains(&product_id)
    }

    /// Change this agent's role.
    ///
    /// Only admins may change roles, and the new role must differ from the
    /// current one. Queues [`AgentPromoted`] on success.
    pub fn change_role(&mut self, acting: &Agent, new_role: Role) -> DomainResult<()> {
        if new_role == self.role {
            return Err(DomainError::invalid(
                "agent.role.already-in-role",
                format!("agent already holds role '{new_role}'"),
            ));
        }
        if acting.role != Role::Admin {
            return Err(DomainError::Unauthorized);
        }

        let old_role = self.role;
        self.role = new_role;
        self.record(AgentEvent::Promoted(AgentPromoted {
            agent_id: self.id,
            old_role,
            new_role,
            changed_by: acting.id,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Replace the email address, re-validating the new value.
    pub fn change_email(&mut self, new_email: &str) -> DomainResult<()> {
        let new_email = EmailAddress::parse(new_email)?;
        let old_email = core::mem::replace(&mut self.email, new_email.clone());
        self.record(AgentEvent::EmailUpdated(EmailUpdated {
            agent_id: self.id,
            old_email,
            new_email,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Add a product to this agent's owned list.
    ///
    /// Admins never own products; duplicates are rejected.
    pub fn add_product(&mut self, product_id: ProductId) -> DomainResult<()> {
        if !self.role.can_own_products() {
            return Err(DomainError::Unauthorized);
        }
        if self.products.contains(&product_id) {
            return Err(DomainError::invalid(
                "agent.products.already-assigned",
                format!("product {product_id} is already assigned to this agent"),
            ));
        }

        self.products.push(product_id);
        self.record(AgentEvent::ProductAdded(ProductAdded {
            agent_id: self.id,
            product_id,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Batched [`Agent::add_product`].
    ///
    /// Already-owned ids (and duplicates within the batch) are excluded
    /// first; an empty net-new set is rejected. Queues one [`ProductAdded`]
    /// per net-new id.
    pub fn add_products(&mut self, product_ids: &[ProductId]) -> DomainResult<()> {
        if !self.role.can_own_products() {
            return Err(DomainError::Unauthorized);
        }

        let mut net_new: Vec<ProductId> = Vec::new();
        for id in product_ids {
            if !self.products.contains(id) && !net_new.contains(id) {
                net_new.push(*id);
            }
        }
        if net_new.is_empty() {
            return Err(DomainError::invalid(
                "agent.products.nothing-to-add",
                "every given product is already assigned to this agent",
            ));
        }

        for product_id in net_new {
            self.products.push(product_id);
            self.record(AgentEvent::ProductAdded(ProductAdded {
                agent_id: self.id,
                product_id,
                occurred_at: Utc::now(),
            }));
        }
        Ok(())
    }

    /// Remove a product from the owned list. Idempotent: removing an absent
    /// product succeeds without queueing anything.
    pub fn remove_product(&mut self, product_id: ProductId) -> DomainResult<()> {
        let Some(pos) = self.products.iter().position(|p| *p == product_id) else {
            return Ok(());
        };

        self.products.remove(pos);
        self.record(AgentEvent::ProductRemoved(ProductRemoved {
            agent_id: self.id,
            product_id,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    fn record(&mut self, event: AgentEvent) {
        self.events.push(event);
    }
}

impl Entity for Agent {
    type Id = AgentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Agent {
    type Event = AgentEvent;

    fn pending_events(&self) -> &[Self::Event] {
        &self.events
    }

    fn pop_events(&mut self) -> Vec<Self::Event> {
        core::mem::take(&mut self.events)
    }
}

/// Event: AgentCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCreated {
    pub agent_id: AgentId,
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AgentPromoted (role changed by an admin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPromoted {
    pub agent_id: AgentId,
    pub old_role: Role,
    pub new_role: Role,
    pub changed_by: AgentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EmailUpdated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailUpdated {
    pub agent_id: AgentId,
    pub old_email: EmailAddress,
    pub new_email: EmailAddress,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductAdded (to the agent's owned list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub agent_id: AgentId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductRemoved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRemoved {
    pub agent_id: AgentId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentEvent {
    Created(AgentCreated),
    Promoted(AgentPromoted),
    EmailUpdated(EmailUpdated),
    ProductAdded(ProductAdded),
    ProductRemoved(ProductRemoved),
}

impl DomainEvent for AgentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AgentEvent::Created(_) => "agents.agent.created",
            AgentEvent::Promoted(_) => "agents.agent.promoted",
            AgentEvent::EmailUpdated(_) => "agents.agent.email-updated",
            AgentEvent::ProductAdded(_) => "agents.agent.product-added",
            AgentEvent::ProductRemoved(_) => "agents.agent.product-removed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AgentEvent::Created(e) => e.occurred_at,
            AgentEvent::Promoted(e) => e.occurred_at,
            AgentEvent::EmailUpdated(e) => e.occurred_at,
            AgentEvent::ProductAdded(e) => e.occurred_at,
            AgentEvent::ProductRemoved(e) => e.occurred_at,
        }
    }
}
