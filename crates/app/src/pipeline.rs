//! Behavior pipeline wrapping every command execution.
//!
//! The pipeline is an explicit, ordered chain — Transaction → Authorization
//! → ResourceOwner → Handler — composed by function wrapping. Each behavior
//! receives the command plus a `next` continuation and decides whether to
//! call it.

use std::future::Future;
use std::sync::Arc;

use rightsflow_auth::{AccessPolicy, authorize};
use rightsflow_core::{DomainError, DomainResult};

use crate::command::{Command, CommandHandler};
use crate::ports::{CurrentAgent, ResourceOwnership, TransactionManager};

/// Runs the handler chain inside a single database transaction.
///
/// Nested invocations join the active transaction; only the outermost owner
/// commits or rolls back. Any error rolls the owned transaction back —
/// commits are all-or-nothing per command.
pub struct TransactionBehavior {
    manager: Arc<dyn TransactionManager>,
}

impl TransactionBehavior {
    pub fn new(manager: Arc<dyn TransactionManager>) -> Self {
        Self { manager }
    }

    pub async fn handle<C, R, Fut>(
        &self,
        command: &C,
        next: impl FnOnce() -> Fut,
    ) -> DomainResult<R>
    where
        C: Command,
        Fut: Future<Output = DomainResult<R>>,
    {
        let owns = self.manager.begin().await?;
        let result = next().await;

        if !owns {
            // Joined an active transaction: the outermost owner decides.
            return result;
        }

        match &result {
            Ok(_) => self.manager.commit().await?,
            Err(err) => {
                tracing::error!(error = %err, command = ?command, "command failed, rolling back");
                self.manager.rollback().await?;
            }
        }
        result
    }
}

/// Enforces the command's declared access policy before the handler runs.
pub struct AuthorizationBehavior {
    current: Arc<dyn CurrentAgent>,
}

impl AuthorizationBehavior {
    pub fn new(current: Arc<dyn CurrentAgent>) -> Self {
        Self { current }
    }

    pub async fn handle<C, R, Fut>(
        &self,
        command: &C,
        next: impl FnOnce() -> Fut,
    ) -> DomainResult<R>
    where
        C: Command,
        Fut: Future<Output = DomainResult<R>>,
    {
        match command.access_policy() {
            AccessPolicy::Public => next().await,
            AccessPolicy::Authenticated => {
                self.current.get().await?;
                next().await
            }
            AccessPolicy::Role(required) => {
                let agent = self.current.get().await?;
                if let Err(err) = authorize(agent.role(), required) {
                    tracing::debug!(error = %err, command = ?command, "authorization denied");
                    return Err(DomainError::Unauthorized);
                }
                next().await
            }
        }
    }
}

/// Enforces that the caller owns every resource the command claims.
pub struct ResourceOwnerBehavior {
    current: Arc<dyn CurrentAgent>,
    ownership: Arc<dyn ResourceOwnership>,
}

impl ResourceOwnerBehavior {
    pub fn new(current: Arc<dyn CurrentAgent>, ownership: Arc<dyn ResourceOwnership>) -> Self {
        Self { current, ownership }
    }

    pub async fn handle<C, R, Fut>(
        &self,
        command: &C,
        next: impl FnOnce() -> Fut,
    ) -> DomainResult<R>
    where
        C: Command,
        Fut: Future<Output = DomainResult<R>>,
    {
        let Some(claim) = command.resource_claim() else {
            return next().await;
        };

        // A claim without ids is a bug in the command definition, not a
        // domain failure.
        if claim.ids.is_empty() {
            return Err(DomainError::critical(
                "resource-owner policy declared without resource ids",
            ));
        }

        let agent = self.current.get().await?;
        let owns = self
            .ownership
            .is_resource_owner(agent.id_typed(), claim.kind, &claim.ids)
            .await?;
        if !owns {
            tracing::debug!(command = ?command, "resource ownership denied");
            return Err(DomainError::Unauthorized);
        }
        next().await
    }
}

/// Entry point: routes a command through the full behavior chain.
pub struct CommandBus {
    transaction: TransactionBehavior,
    authorization: AuthorizationBehavior,
    resource_owner: ResourceOwnerBehavior,
}

impl CommandBus {
    pub fn new(
        manager: Arc<dyn TransactionManager>,
        current: Arc<dyn CurrentAgent>,
        ownership: Arc<dyn ResourceOwnership>,
    ) -> Self {
        Self {
            transaction: TransactionBehavior::new(manager),
            authorization: AuthorizationBehavior::new(current.clone()),
            resource_owner: ResourceOwnerBehavior::new(current, ownership),
        }
    }

    pub async fn dispatch<C, H>(&self, command: &C, handler: &H) -> DomainResult<H::Output>
    where
        C: Command,
        H: CommandHandler<C>,
    {
        tracing::debug!(command = ?command, "dispatching command");
        self.transaction
            .handle(command, || {
                self.authorization.handle(command, || {
                    self.resource_owner
                        .handle(command, || handler.handle(command))
                })
            })
            .await
    }
}
