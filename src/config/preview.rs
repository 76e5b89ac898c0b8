//! Immutable per-invocation configuration.
//!
//! Command-line flags are resolved once into these types and threaded through
//! the command runners; nothing is kept in process-wide state.

use std::path::PathBuf;

use crate::changeset::ParameterInput;
use crate::cloudformation::{ChangesetHandle, Tag};

/// What a preview operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewTarget {
    /// Create a changeset for a stack from a local template.
    NewChangeset {
        /// Stack to update.
        stack_name: String,
        /// Local template path.
        template_path: PathBuf,
        /// Parameters to submit.
        parameters: ParameterInput,
        /// Tags attached to the changeset.
        tags: Vec<Tag>,
        /// Keep the changeset after rendering.
        keep_changeset: bool,
    },
    /// Inspect a changeset that already exists.
    Existing {
        /// Changeset ARN or name.
        handle: ChangesetHandle,
    },
}

/// Configuration of a `changes` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Changeset source.
    pub target: PreviewTarget,
    /// Print the full description after the changes.
    pub dump: bool,
    /// Print progress markers.
    pub verbose: bool,
}

impl PreviewConfig {
    /// Whether the run deletes the changeset once rendered.
    ///
    /// Only changesets created by the run itself are ever deleted.
    #[must_use]
    pub const fn deletes_changeset(&self) -> bool {
        matches!(
            self.target,
            PreviewTarget::NewChangeset {
                keep_changeset: false,
                ..
            }
        )
    }
}

/// Configuration of a `diff` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    /// Deployed stack.
    pub stack_name: String,
    /// Local template path.
    pub template_path: PathBuf,
    /// Diff command line.
    pub command: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudformation::ParameterSet;

    fn new_changeset(keep_changeset: bool) -> PreviewConfig {
        PreviewConfig {
            target: PreviewTarget::NewChangeset {
                stack_name: String::from("stack"),
                template_path: PathBuf::from("template.yaml"),
                parameters: ParameterInput::Overrides(ParameterSet::new()),
                tags: vec![],
                keep_changeset,
            },
            dump: false,
            verbose: false,
        }
    }

    #[test]
    fn test_only_created_changesets_are_deleted() {
        assert!(new_changeset(false).deletes_changeset());
        assert!(!new_changeset(true).deletes_changeset());

        let existing = PreviewConfig {
            target: PreviewTarget::Existing {
                handle: ChangesetHandle::new("arn:aws:cloudformation:us-east-1:1:changeSet/x/y"),
            },
            dump: true,
            verbose: false,
        };
        assert!(!existing.deletes_changeset());
    }
}
