//! Normalized change types.
//!
//! These types are the stable, read-only shape a changeset description is
//! reduced to before rendering.

use serde::{Serialize, Serializer};

/// Action a change would perform on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    /// Resource is added.
    Add,
    /// Resource is removed.
    Remove,
    /// Resource is modified.
    Modify,
    /// Change is resolved at execution time.
    Dynamic,
    /// Resource is imported.
    Import,
    /// Any other value, kept verbatim.
    Unknown(String),
}

impl ChangeAction {
    /// Maps a service action value.
    #[must_use]
    pub fn from_service(action: Option<&str>) -> Self {
        match action {
            Some("Add") => Self::Add,
            Some("Remove") => Self::Remove,
            Some("Modify") => Self::Modify,
            Some("Dynamic") => Self::Dynamic,
            Some("Import") => Self::Import,
            other => Self::Unknown(other.unwrap_or_default().to_string()),
        }
    }

    /// Returns the service representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Modify => "Modify",
            Self::Dynamic => "Dynamic",
            Self::Import => "Import",
            Self::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChangeAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Whether applying a change replaces the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementState {
    /// The resource is recreated.
    True,
    /// The resource is updated in place.
    False,
    /// Replacement depends on a value resolved at execution time.
    Conditional,
    /// The service did not say.
    Unknown,
}

impl ReplacementState {
    /// Maps a service replacement value.
    #[must_use]
    pub fn from_service(replacement: Option<&str>) -> Self {
        match replacement {
            Some("True") => Self::True,
            Some("False") => Self::False,
            Some("Conditional") => Self::Conditional,
            _ => Self::Unknown,
        }
    }

    /// Returns the service representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Conditional => "Conditional",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ReplacementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReplacementState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A resource-level change in normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedChange {
    /// Action kind.
    pub action: ChangeAction,
    /// Logical resource id.
    pub logical_id: String,
    /// Physical resource id, absent before creation.
    pub physical_id: Option<String>,
    /// Resource type.
    pub resource_type: String,
    /// Replacement indicator.
    pub replacement: ReplacementState,
    /// Attributes touched by the change.
    pub scope: Vec<String>,
}
