//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::changeset::ParameterInput;
use crate::cloudformation::ChangesetHandle;
use crate::config::{
    DiffConfig, PreviewConfig, PreviewTarget, Settings, merge_tags, parse_parameters, parse_tags,
};
use crate::error::{ConfigError, Result};
use crate::template::DEFAULT_DIFF_COMMAND;

/// giff - Preview CloudFormation stack changes before applying them.
#[derive(Parser, Debug)]
#[command(name = "giff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(short, long, global = true, env = "GIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, table).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// AWS region.
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// AWS shared config profile.
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resource changes a template would make to a stack.
    Changes(ChangesArgs),

    /// Diff a local template against the deployed one.
    Diff(DiffArgs),

    /// Print the version.
    Version,
}

/// Arguments of `giff changes`.
#[derive(Args, Debug)]
pub struct ChangesArgs {
    /// `<stack> <template>` to create a changeset, or an existing changeset ARN.
    #[arg(value_name = "TARGET", required = true, num_args = 1..=2)]
    pub targets: Vec<String>,

    /// Parameters to override, as "key=value key=value".
    #[arg(short = 'p', long = "parameters-overrides", conflicts_with = "all_parameters")]
    pub parameters_overrides: Option<String>,

    /// Complete parameter list used as-is, as "key=value key=value".
    #[arg(short = 'a', long = "all-parameters")]
    pub all_parameters: Option<String>,

    /// Tags for the changeset, as "key=value key=value".
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Keep the changeset instead of deleting it.
    #[arg(long)]
    pub no_delete_changeset: bool,

    /// Dump the full changeset description as JSON.
    #[arg(short, long)]
    pub dump: bool,
}

impl ChangesArgs {
    /// Resolves the arguments into a run configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for flags that do not apply to the
    /// target or for malformed `key=value` lists.
    pub fn to_config(&self, settings: &Settings, verbose: bool) -> Result<PreviewConfig> {
        let target = match self.targets.as_slice() {
            [handle] => {
                if self.parameters_overrides.is_some()
                    || self.all_parameters.is_some()
                    || self.tags.is_some()
                    || self.no_delete_changeset
                {
                    return Err(ConfigError::invalid_arguments("unaccepted flag").into());
                }
                PreviewTarget::Existing {
                    handle: ChangesetHandle::new(handle.as_str()),
                }
            }
            [stack_name, template] => PreviewTarget::NewChangeset {
                stack_name: stack_name.clone(),
                template_path: PathBuf::from(template),
                parameters: self.parameter_input()?,
                tags: merge_tags(&settings.tags, parse_tags(self.tags.as_deref().unwrap_or_default())?),
                keep_changeset: self.no_delete_changeset,
            },
            _ => {
                return Err(
                    ConfigError::invalid_arguments("expected <stack> <template> or <changeset>").into(),
                );
            }
        };

        Ok(PreviewConfig {
            target,
            dump: self.dump,
            verbose,
        })
    }

    fn parameter_input(&self) -> Result<ParameterInput> {
        match self.all_parameters.as_deref() {
            Some(all) if !all.trim().is_empty() => Ok(ParameterInput::Complete(parse_parameters(all)?)),
            _ => Ok(ParameterInput::Overrides(parse_parameters(
                self.parameters_overrides.as_deref().unwrap_or_default(),
            )?)),
        }
    }
}

/// Arguments of `giff diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Deployed stack name.
    pub stack: String,

    /// Local template path.
    pub template: PathBuf,

    /// Diff command line, e.g. "diff -u".
    #[arg(short = 'd', long)]
    pub diff_command: Option<String>,
}

impl DiffArgs {
    /// Resolves the arguments into a run configuration.
    #[must_use]
    pub fn to_config(&self, settings: &Settings) -> DiffConfig {
        DiffConfig {
            stack_name: self.stack.clone(),
            template_path: self.template.clone(),
            command: self
                .diff_command
                .clone()
                .or_else(|| settings.diff_command.clone())
                .unwrap_or_else(|| String::from(DEFAULT_DIFF_COMMAND)),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
    /// Table output.
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudformation::{Parameter, Tag};
    use crate::error::GiffError;
    use std::collections::BTreeMap;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid arguments")
    }

    fn changes(cli: Cli) -> ChangesArgs {
        match cli.command {
            Commands::Changes(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_changes_with_overrides_and_tags() {
        let cli = parse(&[
            "giff", "-v", "changes", "stack", "template.yaml", "-p", "Size=m4.tiny", "-t", "env=prod",
        ]);
        assert!(cli.verbose);
        let settings = Settings {
            tags: BTreeMap::from([(String::from("team"), String::from("platform"))]),
            ..Settings::default()
        };

        let config = changes(cli).to_config(&settings, true).expect("valid");

        assert!(config.deletes_changeset());
        match config.target {
            PreviewTarget::NewChangeset {
                stack_name,
                parameters,
                tags,
                ..
            } => {
                assert_eq!(stack_name, "stack");
                assert_eq!(
                    parameters,
                    ParameterInput::Overrides(std::iter::once(Parameter::new("Size", "m4.tiny")).collect())
                );
                assert_eq!(tags, vec![Tag::new("team", "platform"), Tag::new("env", "prod")]);
            }
            PreviewTarget::Existing { .. } => panic!("expected a new changeset"),
        }
    }

    #[test]
    fn test_all_parameters_are_complete() {
        let cli = parse(&["giff", "changes", "stack", "t.json", "-a", "A=1 B=2"]);

        let config = changes(cli).to_config(&Settings::default(), false).expect("valid");

        assert!(matches!(
            config.target,
            PreviewTarget::NewChangeset {
                parameters: ParameterInput::Complete(_),
                ..
            }
        ));
    }

    #[test]
    fn test_empty_all_parameters_falls_back_to_overrides() {
        let cli = parse(&["giff", "changes", "stack", "t.json", "-a", ""]);

        let config = changes(cli).to_config(&Settings::default(), false).expect("valid");

        assert!(matches!(
            config.target,
            PreviewTarget::NewChangeset {
                parameters: ParameterInput::Overrides(_),
                ..
            }
        ));
    }

    #[test]
    fn test_overrides_conflict_with_all_parameters() {
        let result = Cli::try_parse_from(["giff", "changes", "s", "t", "-p", "a=1", "-a", "b=2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_too_many_targets_rejected() {
        assert!(Cli::try_parse_from(["giff", "changes", "a", "b", "c"]).is_err());
        assert!(Cli::try_parse_from(["giff", "changes"]).is_err());
    }

    #[test]
    fn test_existing_changeset_with_dump() {
        let cli = parse(&["giff", "changes", "arn:cs", "--dump"]);

        let config = changes(cli).to_config(&Settings::default(), false).expect("valid");

        assert!(config.dump);
        assert!(!config.deletes_changeset());
        assert_eq!(
            config.target,
            PreviewTarget::Existing {
                handle: ChangesetHandle::new("arn:cs")
            }
        );
    }

    #[test]
    fn test_existing_changeset_rejects_creation_flags() {
        for extra in [["-t", "a=b"], ["-p", "a=b"], ["-a", "a=b"]] {
            let mut args = vec!["giff", "changes", "arn:cs"];
            args.extend(extra);
            let err = changes(parse(&args))
                .to_config(&Settings::default(), false)
                .unwrap_err();
            assert_eq!(err.to_string(), "Configuration error: unaccepted flag");
        }

        let err = changes(parse(&["giff", "changes", "arn:cs", "--no-delete-changeset"]))
            .to_config(&Settings::default(), false)
            .unwrap_err();
        assert!(matches!(err, GiffError::Config(ConfigError::InvalidArguments { .. })));
    }

    #[test]
    fn test_malformed_parameters_fail_fast() {
        let cli = parse(&["giff", "changes", "stack", "t.json", "-p", "nokey"]);

        let err = changes(cli).to_config(&Settings::default(), false).unwrap_err();

        assert!(matches!(err, GiffError::Config(ConfigError::InvalidKeyValue { .. })));
    }

    #[test]
    fn test_diff_command_precedence() {
        let settings = Settings {
            diff_command: Some(String::from("colordiff")),
            ..Settings::default()
        };

        let cli = parse(&["giff", "diff", "stack", "t.yaml"]);
        let Commands::Diff(args) = cli.command else {
            panic!("expected diff");
        };
        assert_eq!(args.to_config(&settings).command, "colordiff");
        assert_eq!(args.to_config(&Settings::default()).command, DEFAULT_DIFF_COMMAND);

        let cli = parse(&["giff", "diff", "stack", "t.yaml", "-d", "diff -u"]);
        let Commands::Diff(args) = cli.command else {
            panic!("expected diff");
        };
        assert_eq!(args.to_config(&settings).command, "diff -u");
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["giff", "--output", "table", "--region", "eu-west-1", "version"]);

        assert_eq!(cli.output, OutputFormat::Table);
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert!(matches!(cli.command, Commands::Version));
    }
}
