//! CloudFormation wire types.
//!
//! These types mirror the subset of the CloudFormation control plane that a
//! preview touches, decoupled from the AWS SDK so the rest of the crate can be
//! tested against plain values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Change type value for resource-level changes.
pub const RESOURCE_CHANGE_TYPE: &str = "Resource";

/// A stack parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    /// Parameter key.
    #[serde(rename = "ParameterKey")]
    pub key: String,
    /// Explicit value, absent when the previous value is reused.
    #[serde(rename = "ParameterValue", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether the service should keep the stack's current value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_previous_value: Option<bool>,
}

impl Parameter {
    /// Creates a parameter with an explicit value and no previous-value flag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            use_previous_value: None,
        }
    }

    /// Creates a parameter that keeps the stack's current value.
    #[must_use]
    pub fn previous(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            use_previous_value: Some(true),
        }
    }
}

/// Ordered parameter list with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(Vec<Parameter>);

impl ParameterSet {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts a parameter.
    ///
    /// A parameter whose key is already present replaces the existing entry
    /// in place; otherwise it is appended.
    pub fn insert(&mut self, parameter: Parameter) {
        if let Some(existing) = self.0.iter_mut().find(|p| p.key == parameter.key) {
            *existing = parameter;
        } else {
            self.0.push(parameter);
        }
    }

    /// Looks a parameter up by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.0.iter().find(|p| p.key == key)
    }

    /// Returns an iterator over the parameters in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.0.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the parameters as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Parameter] {
        &self.0
    }
}

impl FromIterator<Parameter> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut set = Self::new();
        for parameter in iter {
            set.insert(parameter);
        }
        set
    }
}

impl IntoIterator for ParameterSet {
    type Item = Parameter;
    type IntoIter = std::vec::IntoIter<Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A stack tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Capabilities acknowledged when creating a changeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// `CAPABILITY_NAMED_IAM`.
    #[serde(rename = "CAPABILITY_NAMED_IAM")]
    NamedIam,
}

impl Capability {
    /// Returns the service representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NamedIam => "CAPABILITY_NAMED_IAM",
        }
    }
}

/// Kind of changeset being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangesetType {
    /// Update an existing stack.
    Update,
}

impl ChangesetType {
    /// Returns the service representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "UPDATE",
        }
    }
}

/// Everything needed to create a changeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesetRequest {
    /// Target stack.
    pub stack_name: String,
    /// Generated changeset name.
    pub changeset_name: String,
    /// Template body sent inline.
    pub template_body: String,
    /// Parameters to submit.
    pub parameters: ParameterSet,
    /// Tags to apply.
    pub tags: Vec<Tag>,
    /// Acknowledged capabilities.
    pub capabilities: Vec<Capability>,
    /// Changeset type.
    pub changeset_type: ChangesetType,
    /// Free-form description.
    pub description: Option<String>,
}

/// Opaque changeset identifier (ARN or name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangesetHandle(String);

impl ChangesetHandle {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChangesetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Changeset computation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangesetStatus {
    /// Still being computed, or any other non-terminal state.
    Pending,
    /// Computation finished.
    CreateComplete,
    /// Computation failed (including "no changes").
    Failed,
}

impl ChangesetStatus {
    /// Maps a service status string.
    ///
    /// Only `CREATE_COMPLETE` and `FAILED` are terminal; every other value
    /// is treated as pending.
    #[must_use]
    pub fn from_service(status: &str) -> Self {
        match status {
            "CREATE_COMPLETE" => Self::CreateComplete,
            "FAILED" => Self::Failed,
            _ => Self::Pending,
        }
    }

    /// Returns true for terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::CreateComplete | Self::Failed)
    }
}

impl std::fmt::Display for ChangesetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::CreateComplete => "create complete",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// A raw change record as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawChangeRecord {
    /// Change category (`Resource` for resource changes).
    #[serde(rename = "Type")]
    pub change_type: Option<String>,
    /// Action kind (`Add`, `Modify`, ...).
    pub action: Option<String>,
    /// Logical resource id.
    pub logical_resource_id: Option<String>,
    /// Physical resource id, absent for resources not created yet.
    pub physical_resource_id: Option<String>,
    /// Resource type.
    pub resource_type: Option<String>,
    /// Replacement indicator (`True`, `False`, `Conditional`).
    pub replacement: Option<String>,
    /// Attributes touched by the change.
    #[serde(default)]
    pub scope: Vec<String>,
}

/// Description of a changeset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangesetDescription {
    /// Changeset ARN.
    pub change_set_id: Option<String>,
    /// Changeset name.
    pub change_set_name: Option<String>,
    /// Stack ARN.
    pub stack_id: Option<String>,
    /// Stack name.
    pub stack_name: Option<String>,
    /// Computation status.
    pub status: ChangesetStatus,
    /// Raw status string as reported by the service.
    pub raw_status: Option<String>,
    /// Reason for the status.
    pub status_reason: Option<String>,
    /// Execution status.
    pub execution_status: Option<String>,
    /// When the changeset was created.
    pub creation_time: Option<DateTime<Utc>>,
    /// Parameters the changeset was computed with.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Raw change records, in service order.
    #[serde(default)]
    pub changes: Vec<RawChangeRecord>,
}

impl ChangesetDescription {
    /// Creates a description with only a status set.
    #[must_use]
    pub const fn with_status(status: ChangesetStatus) -> Self {
        Self {
            change_set_id: None,
            change_set_name: None,
            stack_id: None,
            stack_name: None,
            status,
            raw_status: None,
            status_reason: None,
            execution_status: None,
            creation_time: None,
            parameters: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Returns true if the changeset failed only because there was nothing to change.
    #[must_use]
    pub fn is_empty_failure(&self) -> bool {
        self.status == ChangesetStatus::Failed
            && self.status_reason.as_deref().is_some_and(|reason| {
                reason.contains("didn't contain changes") || reason.contains("No updates are to be performed")
            })
    }
}

/// Description of a deployed stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackDescription {
    /// Stack name.
    pub stack_name: String,
    /// Stack ARN.
    pub stack_id: Option<String>,
    /// Current parameter values.
    pub parameters: ParameterSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_set_insert_replaces_in_place() {
        let mut set = ParameterSet::new();
        set.insert(Parameter::new("a", "1"));
        set.insert(Parameter::new("b", "2"));
        set.insert(Parameter::new("a", "3"));

        let keys: Vec<&str> = set.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(set.get("a").and_then(|p| p.value.as_deref()), Some("3"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ChangesetStatus::from_service("CREATE_COMPLETE"), ChangesetStatus::CreateComplete);
        assert_eq!(ChangesetStatus::from_service("FAILED"), ChangesetStatus::Failed);
        assert_eq!(ChangesetStatus::from_service("CREATE_IN_PROGRESS"), ChangesetStatus::Pending);
        assert_eq!(ChangesetStatus::from_service("CREATE_PENDING"), ChangesetStatus::Pending);
        assert!(!ChangesetStatus::Pending.is_terminal());
        assert!(ChangesetStatus::Failed.is_terminal());
    }

    #[test]
    fn test_empty_failure_detection() {
        let mut description = ChangesetDescription::with_status(ChangesetStatus::Failed);
        description.status_reason = Some(String::from(
            "The submitted information didn't contain changes. Submit different information to create a change set.",
        ));
        assert!(description.is_empty_failure());

        description.status_reason = Some(String::from("Template error: unresolved resource dependencies"));
        assert!(!description.is_empty_failure());
    }

    #[test]
    fn test_raw_record_from_service_json() {
        let json = r#"{
            "Type": "Resource",
            "Action": "Modify",
            "LogicalResourceId": "MyEC2Instance",
            "PhysicalResourceId": "i-1abc23d4",
            "ResourceType": "AWS::EC2::Instance",
            "Replacement": "False",
            "Scope": ["Tags"]
        }"#;
        let record: RawChangeRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(record.change_type.as_deref(), Some(RESOURCE_CHANGE_TYPE));
        assert_eq!(record.physical_resource_id.as_deref(), Some("i-1abc23d4"));
        assert_eq!(record.scope, vec![String::from("Tags")]);
    }
}
