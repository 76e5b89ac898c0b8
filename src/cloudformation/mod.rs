//! CloudFormation integration module.
//!
//! This module provides the capability trait consumed by the changeset
//! lifecycle, the wire types it exchanges, and the AWS SDK implementation.

mod api;
mod client;
mod types;

pub use api::CloudFormationApi;
#[cfg(test)]
pub use api::MockCloudFormationApi;
pub use client::CloudFormationClient;
pub use types::{
    Capability, ChangesetDescription, ChangesetHandle, ChangesetRequest, ChangesetStatus,
    ChangesetType, Parameter, ParameterSet, RawChangeRecord, RESOURCE_CHANGE_TYPE,
    StackDescription, Tag,
};
