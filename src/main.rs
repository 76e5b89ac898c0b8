//! giff CLI entrypoint.
//!
//! This is the main entrypoint for the giff command-line tool.

use std::path::Path;
use std::process::ExitCode;

use giff::cli::{Cli, Commands, OutputFormatter, run_changes, run_diff, run_version};
use giff::cloudformation::CloudFormationClient;
use giff::config::{Settings, SettingsLoader, find_settings_file};
use giff::error::Result;
use giff::preview::ChangesetPreview;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// Logs go to stderr so that stdout only carries command output.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,giff=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    match &cli.command {
        Commands::Version => run_version(&mut stdout),
        Commands::Changes(args) => {
            let settings = load_settings(&cli)?;
            let config = args.to_config(&settings, cli.verbose)?;
            let client = create_client(&settings).await;
            let preview = ChangesetPreview::new(&client);

            run_changes(&preview, &config, &formatter, &mut stdout, &mut stderr).await
        }
        Commands::Diff(args) => {
            let settings = load_settings(&cli)?;
            let config = args.to_config(&settings);
            let client = create_client(&settings).await;

            run_diff(&client, &config, &mut stdout).await
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads `.env`, the settings file and environment overrides, then applies
/// command-line values on top.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let settings_file = cli.config.clone().or_else(|| find_settings_file(&cwd));

    let loader = SettingsLoader::new().with_base_path(
        settings_file
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&cwd),
    );
    loader.load_dotenv()?;

    let settings = loader.load(settings_file.as_deref(), &cwd)?;
    debug!(
        "Using region {:?}, profile {:?}",
        settings.region, settings.profile
    );

    Ok(settings.with_cli(cli.region.clone(), cli.profile.clone()))
}

/// Creates a CloudFormation client from the resolved settings.
async fn create_client(settings: &Settings) -> CloudFormationClient {
    CloudFormationClient::new(settings.region.as_deref(), settings.profile.as_deref()).await
}
