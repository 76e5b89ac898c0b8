//! Command runners.
//!
//! Each runner takes its resolved configuration and writes primary output to
//! `out` and advisory output (progress, warnings) to `err`.

use std::io::Write;

use tracing::{debug, info, warn};

use crate::changeset::{PollEvent, Sleeper};
use crate::cloudformation::CloudFormationApi;
use crate::config::{DiffConfig, PreviewConfig, PreviewTarget};
use crate::error::{Result, TemplateError};
use crate::preview::ChangesetPreview;
use crate::template::{TemplateDiffer, read_template};

use super::output::OutputFormatter;

/// Runs `giff changes`.
///
/// # Errors
///
/// Returns an error if the template cannot be read, the changeset cannot
/// be created or does not settle, or output cannot be written. A failed
/// cleanup is only reported as a warning.
pub async fn run_changes<A, S>(
    preview: &ChangesetPreview<'_, A, S>,
    config: &PreviewConfig,
    formatter: &OutputFormatter,
    out: &mut dyn Write,
    err: &mut (dyn Write + Send),
) -> Result<()>
where
    A: CloudFormationApi + ?Sized,
    S: Sleeper + Clone,
{
    let verbose = config.verbose;

    let handle = match &config.target {
        PreviewTarget::NewChangeset {
            stack_name,
            template_path,
            parameters,
            tags,
            keep_changeset,
        } => {
            let body = read_template(template_path)?;

            progress(err, verbose, "Creating changeset...");
            let handle = match preview.submit(stack_name, &body, parameters, tags.clone()).await {
                Ok(handle) => handle,
                Err(e) => {
                    progress(err, verbose, "\n");
                    return Err(e);
                }
            };
            progress(err, verbose, &format!("{}\n", OutputFormatter::ok_marker()));

            if *keep_changeset {
                writeln!(out, "changeset arn: {handle}")?;
            }
            handle
        }
        PreviewTarget::Existing { handle } => handle.clone(),
    };

    let mut notify = |event: PollEvent| {
        let marker = match event {
            PollEvent::Started => String::from("Reading changeset..."),
            PollEvent::Waiting { .. } => String::from("."),
            PollEvent::Finished { .. } => format!("{}\n", OutputFormatter::ok_marker()),
            PollEvent::TimedOut => String::from("\n"),
        };
        progress(err, verbose, &marker);
    };
    let outcome = preview.inspect(&handle, &mut notify).await?;
    let handle = &outcome.handle;

    if let Some(reason) = outcome.failure_reason() {
        warn!("Changeset {handle} failed: {reason}");
        writeln!(
            err,
            "{}",
            OutputFormatter::warning(&format!("changeset {handle} failed: {reason}"))
        )?;
    }

    formatter.write_changes(&outcome.changes, out, err)?;

    if config.dump {
        writeln!(out, "{}", OutputFormatter::format_description(&outcome.description)?)?;
    }

    if config.deletes_changeset() {
        progress(err, verbose, "Deleting changeset...");
        match preview.cleanup(handle).await {
            Ok(()) => progress(err, verbose, &format!("{}\n", OutputFormatter::ok_marker())),
            Err(e) => {
                progress(err, verbose, "\n");
                warn!("Failed to delete changeset {handle}: {e}");
                writeln!(
                    err,
                    "{}",
                    OutputFormatter::warning(&format!("failed to delete changeset {handle}: {e}"))
                )?;
            }
        }
    }

    Ok(())
}

/// Runs `giff diff`.
///
/// # Errors
///
/// Returns an error if the local template is missing, the deployed template
/// cannot be fetched, or the diff program fails.
pub async fn run_diff<A>(api: &A, config: &DiffConfig, out: &mut dyn Write) -> Result<()>
where
    A: CloudFormationApi + ?Sized,
{
    if !config.template_path.is_file() {
        return Err(TemplateError::NotFound {
            path: config.template_path.clone(),
        }
        .into());
    }

    let output = TemplateDiffer::new(&config.command)
        .diff_stack(api, &config.stack_name, &config.template_path)
        .await?;
    info!(
        "Deployed template of {} {}",
        config.stack_name,
        if output.differs { "differs" } else { "matches" }
    );

    if !output.stdout.is_empty() {
        writeln!(out, "{}", output.stdout)?;
    }
    Ok(())
}

/// Runs `giff version`.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn run_version(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "giff {}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

/// Writes a progress marker in verbose mode.
///
/// Markers are best-effort: a closed stderr does not fail the run.
fn progress(err: &mut dyn Write, verbose: bool, marker: &str) {
    if verbose && write!(err, "{marker}").is_err() {
        debug!("Dropped progress marker {marker:?}");
    }
}
