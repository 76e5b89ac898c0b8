//! Template handling.
//!
//! This module reads local template bodies and compares them against the
//! template a stack was last deployed with.

mod diff;

pub use diff::{DEFAULT_DIFF_COMMAND, DiffOutput, TemplateDiffer};

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TemplateError};

/// Largest template body accepted inline by CloudFormation.
pub const MAX_TEMPLATE_BODY_SIZE: usize = 51_200;

/// Reads a template body from disk.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or larger than
/// [`MAX_TEMPLATE_BODY_SIZE`].
pub fn read_template(path: &Path) -> Result<String> {
    let body = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            TemplateError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TemplateError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if body.len() > MAX_TEMPLATE_BODY_SIZE {
        return Err(TemplateError::TooLarge {
            path: path.to_path_buf(),
            size: body.len(),
            limit: MAX_TEMPLATE_BODY_SIZE,
        }
        .into());
    }

    debug!("Read template {} ({} bytes)", path.display(), body.len());
    Ok(body)
}
