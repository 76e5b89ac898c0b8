// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # giff
//!
//! Previews CloudFormation stack updates before they are applied.
//!
//! ## Overview
//!
//! giff asks CloudFormation to compute a changeset for a local template,
//! waits for the computation to finish, and reports the resource changes in
//! a compact, stable form:
//!
//! - Reconcile parameter overrides with the stack's deployed parameters
//! - Submit a uniquely named changeset
//! - Poll until the changeset settles, with a fixed retry budget
//! - Classify the change records and render them as one line each
//! - Delete the changeset unless asked to keep it
//!
//! It can also diff a local template against the last deployed body with an
//! external diff program.
//!
//! ## Modules
//!
//! - [`config`]: Settings file, environment overrides, run configuration
//! - [`cloudformation`]: Wire types, API trait, and AWS SDK client
//! - [`changeset`]: Reconciliation, submission, polling, classification
//! - [`preview`]: Changeset lifecycle orchestration
//! - [`template`]: Template reading and raw diff
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```text
//! $ giff changes my-stack template.yaml -p "InstanceType=t3.small"
//! *  modify: WebServer (i-0abc12de) - AWS::EC2::Instance / replacement: True
//! +     add: WebServerRole - AWS::IAM::Role
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod changeset;
pub mod cli;
pub mod cloudformation;
pub mod config;
pub mod error;
pub mod preview;
pub mod template;

// ============================================================================
// Re-exports
// ============================================================================

pub use changeset::{ChangeAction, NormalizedChange, ParameterInput, ReplacementState, classify, reconcile};
pub use cli::{Cli, Commands, OutputFormatter};
pub use cloudformation::{CloudFormationApi, CloudFormationClient};
pub use config::{DiffConfig, PreviewConfig, PreviewTarget, Settings, SettingsLoader};
pub use error::{GiffError, Result};
pub use preview::{ChangesetPreview, PreviewOutcome};
pub use template::{TemplateDiffer, read_template};
