//! Configuration module for giff.
//!
//! This module handles all configuration-related functionality:
//! - Loading the optional `giff.yaml` settings file and `.env`
//! - Environment variable overrides
//! - Parsing `key=value` lists for parameters and tags
//! - The immutable configuration handed to each command

mod params;
mod preview;
mod settings;

pub use params::{merge_tags, parse_parameters, parse_tags};
pub use preview::{DiffConfig, PreviewConfig, PreviewTarget};
pub use settings::{
    DEFAULT_SETTINGS_FILES, ENV_DIFF_COMMAND, ENV_PROFILE, ENV_REGION, Settings, SettingsLoader,
    apply_env_overrides, find_settings_file,
};
