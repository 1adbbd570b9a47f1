//! Agent use cases.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rightsflow_agents::Agent;
use rightsflow_auth::{AccessPolicy, Role};
use rightsflow_core::{AgentId, DomainResult};

use crate::command::{Command, CommandHandler};
use crate::ports::{AgentRepository, CurrentAgent, UnitOfWork};

/// Command: register a new agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAgent {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Command for RegisterAgent {
    fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::Public
    }
}

pub struct RegisterAgentHandler {
    agents: Arc<dyn AgentRepository>,
    uow: Arc<dyn UnitOfWork>,
}

impl RegisterAgentHandler {
    pub fn new(agents: Arc<dyn AgentRepository>, uow: Arc<dyn UnitOfWork>) -> Self {
        Self { agents, uow }
    }
}

#[async_trait]
impl CommandHandler<RegisterAgent> for RegisterAgentHandler {
    type Output = AgentId;

    async fn handle(&self, command: &RegisterAgent) -> DomainResult<AgentId> {
        let agent = Agent::create(&command.username, &command.email, command.role, None)?;
        let id = agent.id_typed();

        self.agents.add(agent).await?;
        self.uow.save_entities().await?;
        Ok(id)
    }
}

/// Command: change another agent's role (admin action, enforced by the
/// aggregate against the acting agent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeAgentRole {
    pub agent_id: AgentId,
    pub new_role: Role,
}

impl Command for ChangeAgentRole {}

pub struct ChangeAgentRoleHandler {
    agents: Arc<dyn AgentRepository>,
    current: Arc<dyn CurrentAgent>,
    uow: Arc<dyn UnitOfWork>,
}

impl ChangeAgentRoleHandler {
    pub fn new(
        agents: Arc<dyn AgentRepository>,
        current: Arc<dyn CurrentAgent>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            agents,
            current,
            uow,
        }
    }
}

#[async_trait]
impl CommandHandler<ChangeAgentRole> for ChangeAgentRoleHandler {
    type Output = ();

    async fn handle(&self, command: &ChangeAgentRole) -> DomainResult<()> {
        let acting = self.current.get().await?;
        let mut agent = self.agents.get(command.agent_id).await?;

        agent.change_role(&acting, command.new_role)?;

        self.agents.save(agent).await?;
        self.uow.save_entities().await
    }
}

/// Command: change an agent's email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeAgentEmail {
    pub agent_id: AgentId,
    pub new_email: String,
}

impl Command for ChangeAgentEmail {}

pub struct ChangeAgentEmailHandler {
    agents: Arc<dyn AgentRepository>,
    uow: Arc<dyn UnitOfWork>,
}

impl ChangeAgentEmailHandler {
    pub fn new(agents: Arc<dyn AgentRepository>, uow: Arc<dyn UnitOfWork>) -> Self {
        Self { agents, uow }
    }
}

#[async_trait]
impl CommandHandler<ChangeAgentEmail> for ChangeAgentEmailHandler {
    type Output = ();

    async fn handle(&self, command: &ChangeAgentEmail) -> DomainResult<()> {
        let mut agent = self.agents.get(command.agent_id).await?;

        agent.change_email(&command.new_email)?;

        self.agents.save(agent).await?;
        self.uow.save_entities().await
    }
}
