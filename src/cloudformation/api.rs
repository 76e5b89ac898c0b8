//! Capability interface over the CloudFormation control plane.
//!
//! This module defines the narrow set of remote operations a preview needs,
//! so that the orchestration logic can run against the real service or a
//! test double.

use async_trait::async_trait;

use crate::error::Result;

use super::types::{ChangesetDescription, ChangesetHandle, ChangesetRequest, StackDescription};

/// Remote operations consumed by a preview.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudFormationApi: Send + Sync {
    /// Creates a changeset and returns its handle.
    async fn create_change_set(&self, request: &ChangesetRequest) -> Result<ChangesetHandle>;

    /// Describes a changeset, including every change record.
    async fn describe_change_set(&self, handle: &ChangesetHandle) -> Result<ChangesetDescription>;

    /// Describes the stacks matching a name.
    ///
    /// The service normally returns exactly one stack; callers decide what
    /// to do with zero or several.
    async fn describe_stacks(&self, stack_name: &str) -> Result<Vec<StackDescription>>;

    /// Deletes a changeset.
    async fn delete_change_set(&self, handle: &ChangesetHandle) -> Result<()>;

    /// Fetches the template body the stack was last deployed with.
    async fn get_deployed_template(&self, stack_name: &str) -> Result<String>;
}
