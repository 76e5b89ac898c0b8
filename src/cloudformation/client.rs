//! AWS SDK backed CloudFormation client.
//!
//! This module adapts `aws-sdk-cloudformation` to the [`CloudFormationApi`]
//! capability trait, converting SDK types to the crate's wire types.

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::DisplayErrorContext;
use aws_sdk_cloudformation::types::{
    Capability as SdkCapability, Change, ChangeSetType, Parameter as SdkParameter, Stack, Tag as SdkTag,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, trace};

use crate::error::{CloudFormationError, GiffError, Result};

use super::api::CloudFormationApi;
use super::types::{
    ChangesetDescription, ChangesetHandle, ChangesetRequest, ChangesetStatus, Parameter,
    ParameterSet, RawChangeRecord, StackDescription, Tag,
};

/// CloudFormation client backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct CloudFormationClient {
    /// SDK client.
    client: Client,
}

impl CloudFormationClient {
    /// Creates a client from the AWS default configuration chain.
    ///
    /// An explicit region or profile overrides what the environment and the
    /// shared config files provide.
    pub async fn new(region: Option<&str>, profile: Option<&str>) -> Self {
        let mut loader = aws_config::from_env();

        if let Some(region_str) = region {
            debug!("Using AWS region: {region_str}");
            loader = loader.region(aws_config::Region::new(region_str.to_string()));
        }

        if let Some(profile_name) = profile {
            debug!("Using AWS profile: {profile_name}");
            loader = loader.profile_name(profile_name);
        }

        let config = loader.load().await;

        Self {
            client: Client::new(&config),
        }
    }

    /// Converts a parameter to its SDK representation.
    fn to_sdk_parameter(parameter: &Parameter) -> SdkParameter {
        SdkParameter::builder()
            .parameter_key(&parameter.key)
            .set_parameter_value(parameter.value.clone())
            .set_use_previous_value(parameter.use_previous_value)
            .build()
    }

    /// Converts a tag to its SDK representation.
    fn to_sdk_tag(tag: &Tag) -> SdkTag {
        SdkTag::builder().key(&tag.key).value(&tag.value).build()
    }

    /// Converts an SDK parameter.
    fn from_sdk_parameter(parameter: &SdkParameter) -> Option<Parameter> {
        parameter.parameter_key().map(|key| Parameter {
            key: key.to_string(),
            value: parameter.parameter_value().map(String::from),
            use_previous_value: parameter.use_previous_value(),
        })
    }

    /// Converts an SDK stack, falling back to the requested name.
    fn from_sdk_stack(stack: &Stack, requested: &str) -> StackDescription {
        StackDescription {
            stack_name: stack.stack_name().unwrap_or(requested).to_string(),
            stack_id: stack.stack_id().map(String::from),
            parameters: stack
                .parameters()
                .iter()
                .filter_map(Self::from_sdk_parameter)
                .collect::<ParameterSet>(),
        }
    }

    /// Converts an SDK change record.
    fn from_sdk_change(change: &Change) -> RawChangeRecord {
        let change_type = change.r#type().map(|t| t.as_str().to_string());

        change.resource_change().map_or_else(
            || RawChangeRecord {
                change_type: change_type.clone(),
                ..RawChangeRecord::default()
            },
            |rc| RawChangeRecord {
                change_type: change_type.clone(),
                action: rc.action().map(|a| a.as_str().to_string()),
                logical_resource_id: rc.logical_resource_id().map(String::from),
                physical_resource_id: rc.physical_resource_id().map(String::from),
                resource_type: rc.resource_type().map(String::from),
                replacement: rc.replacement().map(|r| r.as_str().to_string()),
                scope: rc.scope().iter().map(|s| s.as_str().to_string()).collect(),
            },
        )
    }

    /// Formats an SDK error with its full context.
    fn sdk_error<E: std::error::Error>(operation: &'static str, err: E) -> GiffError {
        GiffError::CloudFormation(CloudFormationError::request(
            operation,
            DisplayErrorContext(err).to_string(),
        ))
    }
}

#[async_trait]
impl CloudFormationApi for CloudFormationClient {
    async fn create_change_set(&self, request: &ChangesetRequest) -> Result<ChangesetHandle> {
        info!(
            "Creating changeset {} for stack {}",
            request.changeset_name, request.stack_name
        );

        let parameters = if request.parameters.is_empty() {
            None
        } else {
            Some(
                request
                    .parameters
                    .iter()
                    .map(Self::to_sdk_parameter)
                    .collect::<Vec<_>>(),
            )
        };

        let tags = if request.tags.is_empty() {
            None
        } else {
            Some(
                request
                    .tags
                    .iter()
                    .map(Self::to_sdk_tag)
                    .collect::<Vec<_>>(),
            )
        };

        let capabilities = request
            .capabilities
            .iter()
            .map(|c| SdkCapability::from(c.as_str()))
            .collect::<Vec<_>>();

        let output = self
            .client
            .create_change_set()
            .stack_name(&request.stack_name)
            .change_set_name(&request.changeset_name)
            .change_set_type(ChangeSetType::from(request.changeset_type.as_str()))
            .template_body(&request.template_body)
            .set_parameters(parameters)
            .set_tags(tags)
            .set_capabilities(Some(capabilities))
            .set_description(request.description.clone())
            .send()
            .await
            .map_err(|e| Self::sdk_error("CreateChangeSet", e))?;

        let id = output.id().ok_or_else(|| {
            GiffError::CloudFormation(CloudFormationError::invalid_response(
                "CreateChangeSet",
                "response carried no changeset id",
            ))
        })?;

        debug!("Changeset created: {id}");
        Ok(ChangesetHandle::new(id))
    }

    async fn describe_change_set(&self, handle: &ChangesetHandle) -> Result<ChangesetDescription> {
        trace!("Describing changeset {handle}");

        let mut next_token: Option<String> = None;
        let mut description: Option<ChangesetDescription> = None;

        loop {
            let output = self
                .client
                .describe_change_set()
                .change_set_name(handle.as_str())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| Self::sdk_error("DescribeChangeSet", e))?;

            let changes = output.changes().iter().map(Self::from_sdk_change);

            if let Some(current) = description.as_mut() {
                current.changes.extend(changes);
            } else {
                let raw_status = output.status().map(|s| s.as_str().to_string());
                let status = raw_status
                    .as_deref()
                    .map_or(ChangesetStatus::Pending, ChangesetStatus::from_service);

                description = Some(ChangesetDescription {
                    change_set_id: output.change_set_id().map(String::from),
                    change_set_name: output.change_set_name().map(String::from),
                    stack_id: output.stack_id().map(String::from),
                    stack_name: output.stack_name().map(String::from),
                    status,
                    raw_status,
                    status_reason: output.status_reason().map(String::from),
                    execution_status: output.execution_status().map(|s| s.as_str().to_string()),
                    creation_time: output.creation_time().and_then(|t| {
                        DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos())
                    }),
                    parameters: output
                        .parameters()
                        .iter()
                        .filter_map(Self::from_sdk_parameter)
                        .collect(),
                    changes: changes.collect(),
                });
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => {
                    debug!("Fetching next page of changeset {handle}");
                    next_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        description.ok_or_else(|| {
            GiffError::CloudFormation(CloudFormationError::invalid_response(
                "DescribeChangeSet",
                "no pages returned",
            ))
        })
    }

    async fn describe_stacks(&self, stack_name: &str) -> Result<Vec<StackDescription>> {
        debug!("Describing stack {stack_name}");

        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| Self::sdk_error("DescribeStacks", e))?;

        let stacks = output
            .stacks()
            .iter()
            .map(|stack| Self::from_sdk_stack(stack, stack_name))
            .collect();

        Ok(stacks)
    }

    async fn delete_change_set(&self, handle: &ChangesetHandle) -> Result<()> {
        info!("Deleting changeset {handle}");

        self.client
            .delete_change_set()
            .change_set_name(handle.as_str())
            .send()
            .await
            .map_err(|e| Self::sdk_error("DeleteChangeSet", e))?;

        Ok(())
    }

    async fn get_deployed_template(&self, stack_name: &str) -> Result<String> {
        debug!("Fetching deployed template for {stack_name}");

        let output = self
            .client
            .get_template()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| Self::sdk_error("GetTemplate", e))?;

        output.template_body().map(String::from).ok_or_else(|| {
            GiffError::Lookup(crate::error::LookupError::TemplateUnavailable {
                stack_name: stack_name.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudformation::RESOURCE_CHANGE_TYPE;
    use aws_sdk_cloudformation::types::{
        ChangeAction, ChangeType, Replacement, ResourceAttribute, ResourceChange,
    };

    const STACK_ARN: &str = "arn:aws:cloudformation:us-east-1:123456789012:stack/my-stack/1a2b";

    fn sdk_parameter(key: &str, value: &str) -> SdkParameter {
        SdkParameter::builder()
            .parameter_key(key)
            .parameter_value(value)
            .build()
    }

    #[test]
    fn test_resource_change_is_copied_through() {
        let change = Change::builder()
            .r#type(ChangeType::Resource)
            .resource_change(
                ResourceChange::builder()
                    .action(ChangeAction::Modify)
                    .logical_resource_id("MyEC2Instance")
                    .physical_resource_id("i-1abc23d4")
                    .resource_type("AWS::EC2::Instance")
                    .replacement(Replacement::Conditional)
                    .scope(ResourceAttribute::Properties)
                    .scope(ResourceAttribute::Tags)
                    .build(),
            )
            .build();

        let record = CloudFormationClient::from_sdk_change(&change);

        assert_eq!(record.change_type.as_deref(), Some(RESOURCE_CHANGE_TYPE));
        assert_eq!(record.action.as_deref(), Some("Modify"));
        assert_eq!(record.logical_resource_id.as_deref(), Some("MyEC2Instance"));
        assert_eq!(record.physical_resource_id.as_deref(), Some("i-1abc23d4"));
        assert_eq!(record.resource_type.as_deref(), Some("AWS::EC2::Instance"));
        assert_eq!(record.replacement.as_deref(), Some("Conditional"));
        assert_eq!(record.scope, vec![String::from("Properties"), String::from("Tags")]);
    }

    #[test]
    fn test_added_resource_has_no_physical_id() {
        let change = Change::builder()
            .r#type(ChangeType::Resource)
            .resource_change(
                ResourceChange::builder()
                    .action(ChangeAction::Add)
                    .logical_resource_id("SampleRole2")
                    .resource_type("AWS::IAM::Role")
                    .build(),
            )
            .build();

        let record = CloudFormationClient::from_sdk_change(&change);

        assert_eq!(record.action.as_deref(), Some("Add"));
        assert_eq!(record.physical_resource_id, None);
        assert_eq!(record.replacement, None);
        assert!(record.scope.is_empty());
    }

    #[test]
    fn test_change_without_resource_detail() {
        let change = Change::builder().r#type(ChangeType::Resource).build();

        let record = CloudFormationClient::from_sdk_change(&change);

        assert_eq!(
            record,
            RawChangeRecord {
                change_type: Some(String::from(RESOURCE_CHANGE_TYPE)),
                ..RawChangeRecord::default()
            }
        );
    }

    #[test]
    fn test_parameter_conversion() {
        assert_eq!(
            CloudFormationClient::from_sdk_parameter(&sdk_parameter("Size", "m4.tiny")),
            Some(Parameter::new("Size", "m4.tiny"))
        );

        let keyless = SdkParameter::builder().parameter_value("orphan").build();
        assert_eq!(CloudFormationClient::from_sdk_parameter(&keyless), None);

        let previous = CloudFormationClient::to_sdk_parameter(&Parameter::previous("Size"));
        assert_eq!(previous.parameter_key(), Some("Size"));
        assert_eq!(previous.parameter_value(), None);
        assert_eq!(previous.use_previous_value(), Some(true));
    }

    #[test]
    fn test_tag_conversion() {
        let tag = CloudFormationClient::to_sdk_tag(&Tag::new("env", "prod"));

        assert_eq!(tag.key(), Some("env"));
        assert_eq!(tag.value(), Some("prod"));
    }

    #[test]
    fn test_stack_prefers_service_name() {
        let stack = Stack::builder()
            .stack_name("my-stack")
            .stack_id(STACK_ARN)
            .parameters(sdk_parameter("Size", "m4.tiny"))
            .build();

        let description = CloudFormationClient::from_sdk_stack(&stack, STACK_ARN);

        assert_eq!(description.stack_name, "my-stack");
        assert_eq!(description.stack_id.as_deref(), Some(STACK_ARN));
        assert_eq!(description.parameters.len(), 1);
    }

    #[test]
    fn test_stack_without_name_uses_requested() {
        let stack = Stack::builder().stack_id(STACK_ARN).build();

        let description = CloudFormationClient::from_sdk_stack(&stack, "my-stack");

        assert_eq!(description.stack_name, "my-stack");
        assert!(description.parameters.is_empty());
    }
}
