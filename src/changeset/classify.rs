//! Change classification.
//!
//! Reduces a raw changeset description to the resource-level changes it
//! carries, in the order the service returned them.

use tracing::debug;

use crate::cloudformation::{ChangesetDescription, RESOURCE_CHANGE_TYPE, RawChangeRecord};

use super::types::{ChangeAction, NormalizedChange, ReplacementState};

/// Extracts the resource changes of a changeset description.
///
/// Records of any other category are skipped. Field values are copied
/// through without validation, so an unrecognized action survives as
/// [`ChangeAction::Unknown`]. This never fails: a description without
/// changes yields an empty list.
#[must_use]
pub fn classify(description: &ChangesetDescription) -> Vec<NormalizedChange> {
    let changes: Vec<NormalizedChange> = description
        .changes
        .iter()
        .filter(|record| record.change_type.as_deref() == Some(RESOURCE_CHANGE_TYPE))
        .map(normalize)
        .collect();

    debug!(
        "Classified {} of {} change records",
        changes.len(),
        description.changes.len()
    );

    changes
}

fn normalize(record: &RawChangeRecord) -> NormalizedChange {
    NormalizedChange {
        action: ChangeAction::from_service(record.action.as_deref()),
        logical_id: record.logical_resource_id.clone().unwrap_or_default(),
        physical_id: record.physical_resource_id.clone(),
        resource_type: record.resource_type.clone().unwrap_or_default(),
        replacement: ReplacementState::from_service(record.replacement.as_deref()),
        scope: record.scope.clone(),
    }
}
