//! Changeset preview orchestration.
//!
//! The preview runs strictly in sequence: parameters are resolved, a changeset
//! is submitted, polled until it settles, and its change records classified.
//! Cleanup is a separate step so the caller can render before deleting.

use tracing::{debug, info};

use crate::changeset::{
    ChangesetPoller, ChangesetSubmitter, NormalizedChange, ParameterInput, PollEvent, Sleeper,
    TokioSleeper, classify, default_description, resolve_parameters,
};
use crate::cloudformation::{
    ChangesetDescription, ChangesetHandle, ChangesetStatus, CloudFormationApi, Tag,
};
use crate::error::Result;

/// Result of inspecting a settled changeset.
#[derive(Debug, Clone)]
pub struct PreviewOutcome {
    /// Changeset that was inspected.
    pub handle: ChangesetHandle,
    /// Full description as returned by the service.
    pub description: ChangesetDescription,
    /// Resource changes in service order.
    pub changes: Vec<NormalizedChange>,
}

impl PreviewOutcome {
    /// Returns the failure reason worth reporting, if any.
    ///
    /// A changeset that failed only because the template carries no changes
    /// is an ordinary empty preview and yields `None`.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        if self.description.status != ChangesetStatus::Failed || self.description.is_empty_failure() {
            return None;
        }
        Some(
            self.description
                .status_reason
                .as_deref()
                .unwrap_or("changeset creation failed"),
        )
    }
}

/// Drives a changeset through its lifecycle.
pub struct ChangesetPreview<'a, A: CloudFormationApi + ?Sized, S: Sleeper = TokioSleeper> {
    /// CloudFormation API.
    api: &'a A,
    /// Sleep implementation for the poll loop.
    sleeper: S,
    /// Description attached to created changesets.
    description: Option<String>,
}

impl<'a, A: CloudFormationApi + ?Sized> ChangesetPreview<'a, A, TokioSleeper> {
    /// Creates a new preview orchestrator.
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            sleeper: TokioSleeper,
            description: Some(default_description()),
        }
    }
}

impl<'a, A: CloudFormationApi + ?Sized, S: Sleeper + Clone> ChangesetPreview<'a, A, S> {
    /// Replaces the sleep implementation used while polling.
    #[must_use]
    pub fn with_sleeper<T: Sleeper + Clone>(self, sleeper: T) -> ChangesetPreview<'a, A, T> {
        ChangesetPreview {
            api: self.api,
            sleeper,
            description: self.description,
        }
    }

    /// Sets the description attached to created changesets.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Resolves parameters and submits a changeset for an existing stack.
    ///
    /// # Errors
    ///
    /// Returns a lookup error when the stack's parameters cannot be
    /// resolved, or a submission error when the service rejects the request.
    pub async fn submit(
        &self,
        stack_name: &str,
        template_body: &str,
        parameters: &ParameterInput,
        tags: Vec<Tag>,
    ) -> Result<ChangesetHandle> {
        let parameters = resolve_parameters(self.api, stack_name, parameters).await?;
        debug!("Resolved {} parameters for {stack_name}", parameters.len());

        ChangesetSubmitter::new(self.api)
            .with_description(self.description.clone())
            .submit(stack_name, template_body, parameters, tags)
            .await
    }

    /// Waits for a changeset to settle and classifies its changes.
    ///
    /// # Errors
    ///
    /// Returns a poll timeout or forwards the query error.
    pub async fn inspect(
        &self,
        handle: &ChangesetHandle,
        notify: &mut (dyn FnMut(PollEvent) + Send),
    ) -> Result<PreviewOutcome> {
        let description = ChangesetPoller::new(self.api)
            .with_sleeper(self.sleeper.clone())
            .await_completion(handle, notify)
            .await?;

        let changes = classify(&description);
        info!("Changeset {handle} carries {} resource changes", changes.len());

        Ok(PreviewOutcome {
            handle: handle.clone(),
            description,
            changes,
        })
    }

    /// Deletes a changeset created by this run.
    ///
    /// # Errors
    ///
    /// Forwards the delete error; callers treat it as a warning.
    pub async fn cleanup(&self, handle: &ChangesetHandle) -> Result<()> {
        debug!("Deleting changeset {handle}");
        self.api.delete_change_set(handle).await?;
        info!("Deleted changeset {handle}");
        Ok(())
    }
}
