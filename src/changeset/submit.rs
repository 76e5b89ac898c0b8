//! Changeset submission.
//!
//! Builds a changeset request with a collision-resistant name and hands it to
//! the service.

use tracing::{debug, info};
use uuid::Uuid;

use crate::cloudformation::{
    Capability, ChangesetHandle, ChangesetRequest, ChangesetType, CloudFormationApi, ParameterSet,
    Tag,
};
use crate::error::{ChangesetError, Result};

/// Prefix of every changeset name created by giff.
pub const CHANGESET_NAME_PREFIX: &str = "giff";

/// Generates a unique changeset name.
///
/// The random suffix keeps concurrent previews against the same stack from
/// colliding.
#[must_use]
pub fn generate_changeset_name() -> String {
    format!("{CHANGESET_NAME_PREFIX}-{}", Uuid::new_v4().simple())
}

/// Default changeset description naming the host that created it.
#[must_use]
pub fn default_description() -> String {
    let host = hostname::get().map_or_else(
        |_| String::from("unknown host"),
        |h| h.to_string_lossy().to_string(),
    );
    format!("Preview created by giff on {host}")
}

/// Submits changesets for existing stacks.
pub struct ChangesetSubmitter<'a, A: CloudFormationApi + ?Sized> {
    /// CloudFormation API.
    api: &'a A,
    /// Description attached to created changesets.
    description: Option<String>,
}

impl<'a, A: CloudFormationApi + ?Sized> ChangesetSubmitter<'a, A> {
    /// Creates a new submitter.
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            description: Some(default_description()),
        }
    }

    /// Sets the description attached to created changesets.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Builds the request for a stack update preview.
    #[must_use]
    pub fn build_request(
        &self,
        stack_name: &str,
        template_body: &str,
        parameters: ParameterSet,
        tags: Vec<Tag>,
    ) -> ChangesetRequest {
        ChangesetRequest {
            stack_name: stack_name.to_string(),
            changeset_name: generate_changeset_name(),
            template_body: template_body.to_string(),
            parameters,
            tags,
            capabilities: vec![Capability::NamedIam],
            changeset_type: ChangesetType::Update,
            description: self.description.clone(),
        }
    }

    /// Creates a changeset and returns its handle.
    ///
    /// There is no retry: a second attempt could leave a duplicate changeset
    /// behind.
    ///
    /// # Errors
    ///
    /// Returns a submission error wrapping the service error.
    pub async fn submit(
        &self,
        stack_name: &str,
        template_body: &str,
        parameters: ParameterSet,
        tags: Vec<Tag>,
    ) -> Result<ChangesetHandle> {
        let request = self.build_request(stack_name, template_body, parameters, tags);
        debug!(
            "Submitting changeset {} with {} parameters and {} tags",
            request.changeset_name,
            request.parameters.len(),
            request.tags.len()
        );

        let handle = self
            .api
            .create_change_set(&request)
            .await
            .map_err(|e| ChangesetError::SubmissionFailed {
                stack_name: stack_name.to_string(),
                source: Box::new(e),
            })?;

        info!("Submitted changeset {handle}");
        Ok(handle)
    }
}
