//! Raw template diff against the deployed body.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use crate::cloudformation::CloudFormationApi;
use crate::error::{GiffError, Result, TemplateError};

/// Diff program used when none is configured.
pub const DEFAULT_DIFF_COMMAND: &str = "diff";

/// Output of a diff run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Whether the program reported differences.
    pub differs: bool,
}

/// Runs an external line-diff program.
#[derive(Debug, Clone)]
pub struct TemplateDiffer {
    /// Program followed by its leading arguments.
    command: Vec<String>,
}

impl Default for TemplateDiffer {
    fn default() -> Self {
        Self::new(DEFAULT_DIFF_COMMAND)
    }
}

impl TemplateDiffer {
    /// Creates a differ from a command line such as `"diff -u"`.
    ///
    /// A blank command falls back to [`DEFAULT_DIFF_COMMAND`].
    #[must_use]
    pub fn new(command: &str) -> Self {
        let mut parts: Vec<String> = command.split_whitespace().map(String::from).collect();
        if parts.is_empty() {
            parts.push(String::from(DEFAULT_DIFF_COMMAND));
        }
        Self { command: parts }
    }

    /// Name of the program that will be run.
    #[must_use]
    pub fn program(&self) -> &str {
        self.command.first().map_or(DEFAULT_DIFF_COMMAND, String::as_str)
    }

    /// Compares the deployed template of a stack with a local body.
    ///
    /// The deployed body is written to a temporary file named after the
    /// stack, carrying the local file's extension so that diff tools can
    /// pick a syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if the deployed template cannot be fetched or the
    /// diff program fails.
    pub async fn diff_stack<A>(&self, api: &A, stack_name: &str, local: &Path) -> Result<DiffOutput>
    where
        A: CloudFormationApi + ?Sized,
    {
        let deployed = api.get_deployed_template(stack_name).await?;

        let dir = TempDir::new()?;
        let deployed_path = deployed_file_path(dir.path(), stack_name, local);
        tokio::fs::write(&deployed_path, deployed).await?;
        debug!("Wrote deployed template to {}", deployed_path.display());

        self.run(&deployed_path, local).await
    }

    /// Runs the diff program on two files.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is missing or exits with a status
    /// other than 0 or 1.
    pub async fn run(&self, left: &Path, right: &Path) -> Result<DiffOutput> {
        let program = self.program();
        info!("Running {} on {} and {}", program, left.display(), right.display());

        let output = Command::new(program)
            .args(self.command.iter().skip(1))
            .arg(left)
            .arg(right)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| -> GiffError {
                if e.kind() == ErrorKind::NotFound {
                    TemplateError::DiffCommandNotFound {
                        command: program.to_string(),
                    }
                    .into()
                } else {
                    e.into()
                }
            })?;

        match output.status.code() {
            Some(code @ (0 | 1)) => Ok(DiffOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                differs: code == 1,
            }),
            _ => Err(TemplateError::DiffFailed {
                command: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }
}

/// File stem for a stack name or stack ARN.
///
/// For an ARN the stack name segment after `stack/` is used; any remaining
/// `/` or `:` is replaced so the result stays a single path component.
fn file_stem(stack_name: &str) -> String {
    let name = stack_name
        .split_once(":stack/")
        .and_then(|(_, rest)| rest.split('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(stack_name);

    name.replace(['/', ':'], "-")
}

fn deployed_file_path(dir: &Path, stack_name: &str, local: &Path) -> PathBuf {
    let stack_name = file_stem(stack_name);
    let name = match local.extension() {
        Some(ext) => format!("{stack_name}.deployed.{}", ext.to_string_lossy()),
        None => format!("{stack_name}.deployed"),
    };
    dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudformation::MockCloudFormationApi;
    use crate::error::LookupError;

    const STACK_ARN: &str = "arn:aws:cloudformation:us-east-1:123456789012:stack/my-stack/1a2b";

    #[test]
    fn test_command_line_is_split() {
        let differ = TemplateDiffer::new("git diff --no-index");
        assert_eq!(differ.program(), "git");
        assert_eq!(differ.command, vec!["git", "diff", "--no-index"]);

        assert_eq!(TemplateDiffer::new("  ").program(), DEFAULT_DIFF_COMMAND);
    }

    #[test]
    fn test_deployed_file_keeps_extension() {
        let dir = Path::new("/tmp/x");
        assert_eq!(
            deployed_file_path(dir, "stack", Path::new("t/template.yaml")),
            dir.join("stack.deployed.yaml")
        );
        assert_eq!(
            deployed_file_path(dir, "stack", Path::new("template")),
            dir.join("stack.deployed")
        );
    }

    #[test]
    fn test_deployed_file_from_stack_arn() {
        let dir = Path::new("/tmp/x");
        assert_eq!(
            deployed_file_path(dir, STACK_ARN, Path::new("template.yaml")),
            dir.join("my-stack.deployed.yaml")
        );
        assert_eq!(
            deployed_file_path(dir, "odd/name:1", Path::new("template.json")),
            dir.join("odd-name-1.deployed.json")
        );
    }

    #[tokio::test]
    async fn test_missing_program() {
        let differ = TemplateDiffer::new("giff-no-such-diff-program");

        let err = differ
            .run(Path::new("a"), Path::new("b"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GiffError::Template(TemplateError::DiffCommandNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_diff_stack_passes_deployed_then_local() {
        let dir = TempDir::new().expect("temp dir");
        let local = dir.path().join("template.yaml");
        std::fs::write(&local, "local\n").expect("write");

        let mut api = MockCloudFormationApi::new();
        api.expect_get_deployed_template()
            .times(1)
            .returning(|_| Ok(String::from("deployed\n")));

        let output = TemplateDiffer::new("cat")
            .diff_stack(&api, "stack", &local)
            .await
            .expect("cat succeeds");

        assert_eq!(output.stdout, "deployed\nlocal\n");
        assert!(!output.differs);
    }

    #[tokio::test]
    async fn test_diff_stack_by_arn() {
        let dir = TempDir::new().expect("temp dir");
        let local = dir.path().join("template.yaml");
        std::fs::write(&local, "local\n").expect("write");

        let mut api = MockCloudFormationApi::new();
        api.expect_get_deployed_template()
            .times(1)
            .returning(|_| Ok(String::from("deployed\n")));

        let output = TemplateDiffer::new("cat")
            .diff_stack(&api, STACK_ARN, &local)
            .await
            .expect("cat succeeds");

        assert_eq!(output.stdout, "deployed\nlocal\n");
    }

    #[tokio::test]
    async fn test_missing_deployed_template() {
        let mut api = MockCloudFormationApi::new();
        api.expect_get_deployed_template().returning(|name| {
            Err(LookupError::TemplateUnavailable {
                stack_name: name.to_string(),
            }
            .into())
        });

        let err = TemplateDiffer::default()
            .diff_stack(&api, "stack", Path::new("template.yaml"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GiffError::Lookup(LookupError::TemplateUnavailable { .. })
        ));
    }
}
