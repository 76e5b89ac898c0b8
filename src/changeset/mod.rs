//! Changeset lifecycle.
//!
//! This module covers everything between a local template and a list of
//! resource changes:
//!
//! - Parameter reconciliation against the deployed stack
//! - Changeset submission
//! - Status polling with a fixed retry budget
//! - Classification of the resulting change records

mod classify;
mod poller;
mod reconcile;
mod submit;
mod types;

pub use classify::classify;
pub use poller::{ChangesetPoller, MAX_POLL_ATTEMPTS, POLL_INTERVAL, PollEvent, Sleeper, TokioSleeper};
pub use reconcile::{ParameterInput, reconcile, resolve_parameters, stack_parameters};
pub use submit::{CHANGESET_NAME_PREFIX, ChangesetSubmitter, default_description, generate_changeset_name};
pub use types::{ChangeAction, NormalizedChange, ReplacementState};
