//! Parameter reconciliation.
//!
//! Merges user-supplied overrides into the stack's current parameters so that
//! everything the user did not mention keeps its deployed value.

use tracing::debug;

use crate::cloudformation::{CloudFormationApi, Parameter, ParameterSet};
use crate::error::{LookupError, Result};

/// How the caller supplied parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterInput {
    /// Overrides merged into the stack's existing parameters.
    Overrides(ParameterSet),
    /// A complete list used verbatim.
    Complete(ParameterSet),
}

/// Reconciles overrides against the stack's existing parameters.
///
/// Overridden keys carry the override value with `use_previous_value`
/// set to false, keys only present in the overrides are appended in
/// override order, and every other existing key is sent with
/// `use_previous_value` set to true and no value.
#[must_use]
pub fn reconcile(existing: &ParameterSet, overrides: &ParameterSet) -> ParameterSet {
    let mut merged: Vec<Parameter> = existing.iter().cloned().collect();
    let mut touched = vec![false; merged.len()];

    for parameter in overrides {
        let replacement = Parameter {
            key: parameter.key.clone(),
            value: parameter.value.clone(),
            use_previous_value: Some(false),
        };

        if let Some(index) = merged.iter().position(|p| p.key == parameter.key) {
            merged[index] = replacement;
            touched[index] = true;
        } else {
            // parameters added in the template but not in the stack
            debug!("Parameter {} is not set on the stack, adding it", parameter.key);
            merged.push(replacement);
            touched.push(true);
        }
    }

    merged
        .into_iter()
        .zip(touched)
        .map(|(parameter, touched)| {
            if touched {
                parameter
            } else {
                Parameter::previous(parameter.key)
            }
        })
        .collect()
}

/// Reads the current parameters of a stack.
///
/// # Errors
///
/// Returns a lookup error unless exactly one stack matches, or forwards
/// the API error.
pub async fn stack_parameters<A>(api: &A, stack_name: &str) -> Result<ParameterSet>
where
    A: CloudFormationApi + ?Sized,
{
    let mut stacks = api.describe_stacks(stack_name).await?;

    match stacks.len() {
        0 => Err(LookupError::StackNotFound {
            stack_name: stack_name.to_string(),
        }
        .into()),
        1 => {
            let stack = stacks.remove(0);
            debug!(
                "Stack {stack_name} has {} parameters",
                stack.parameters.len()
            );
            Ok(stack.parameters)
        }
        count => Err(LookupError::AmbiguousStack {
            stack_name: stack_name.to_string(),
            count,
        }
        .into()),
    }
}

/// Produces the parameter list to submit.
///
/// A complete list is returned as-is without contacting the service.
///
/// # Errors
///
/// Returns an error if the stack's parameters cannot be read.
pub async fn resolve_parameters<A>(
    api: &A,
    stack_name: &str,
    input: &ParameterInput,
) -> Result<ParameterSet>
where
    A: CloudFormationApi + ?Sized,
{
    match input {
        ParameterInput::Complete(parameters) => Ok(parameters.clone()),
        ParameterInput::Overrides(overrides) => {
            let existing = stack_parameters(api, stack_name).await?;
            Ok(reconcile(&existing, overrides))
        }
    }
}
