//! Settings file loading.
//!
//! Settings come from an optional YAML file, then environment variables, then
//! command-line flags, each layer overriding the previous one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, GiffError, Result};

/// Environment variable overriding the AWS region.
pub const ENV_REGION: &str = "GIFF_REGION";

/// Environment variable overriding the AWS profile.
pub const ENV_PROFILE: &str = "GIFF_PROFILE";

/// Environment variable overriding the diff command.
pub const ENV_DIFF_COMMAND: &str = "GIFF_DIFF_COMMAND";

/// Settings file names searched from the working directory upwards.
pub const DEFAULT_SETTINGS_FILES: &[&str] = &["giff.yaml", "giff.yml", ".giff.yaml", ".giff.yml"];

/// User-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// AWS region.
    #[serde(default)]
    pub region: Option<String>,

    /// AWS shared config profile.
    #[serde(default)]
    pub profile: Option<String>,

    /// Command used by `giff diff`.
    #[serde(default)]
    pub diff_command: Option<String>,

    /// Tags added to every changeset.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Settings {
    /// Applies command-line values, which take precedence over everything.
    #[must_use]
    pub fn with_cli(mut self, region: Option<String>, profile: Option<String>) -> Self {
        if region.is_some() {
            self.region = region;
        }
        if profile.is_some() {
            self.profile = profile;
        }
        self
    }
}

/// Loads settings files.
#[derive(Debug, Default)]
pub struct SettingsLoader {
    /// Directory holding the `.env` file.
    base_path: Option<PathBuf>,
}

impl SettingsLoader {
    /// Creates a new settings loader.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the directory the `.env` file is loaded from.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads settings for a run.
    ///
    /// An explicit path must exist. Without one, the settings file is
    /// searched for and missing settings are not an error. Environment
    /// overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be read or parsed.
    pub fn load(&self, explicit: Option<&Path>, start_dir: &Path) -> Result<Settings> {
        let mut settings = match explicit {
            Some(path) => self.load_file(path)?,
            None => match find_settings_file(start_dir) {
                Some(path) => self.load_file(path)?,
                None => {
                    debug!("No settings file found, using defaults");
                    Settings::default()
                }
            },
        };

        apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());

        if !path.exists() {
            return Err(GiffError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            GiffError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses settings from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or has unknown fields.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<Settings> {
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            GiffError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                GiffError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Applies environment overrides through a variable lookup.
pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(region) = lookup(ENV_REGION) {
        debug!("Overriding region from environment");
        settings.region = Some(region);
    }

    if let Some(profile) = lookup(ENV_PROFILE) {
        debug!("Overriding profile from environment");
        settings.profile = Some(profile);
    }

    if let Some(command) = lookup(ENV_DIFF_COMMAND) {
        debug!("Overriding diff_command from environment");
        settings.diff_command = Some(command);
    }
}

/// Finds the settings file in the given directory, its parents, or the user
/// config directory.
#[must_use]
pub fn find_settings_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DEFAULT_SETTINGS_FILES {
            let path = current.join(filename);
            if path.is_file() {
                info!("Found settings file: {}", path.display());
                return Some(path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("giff").join("config.yaml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_settings() {
        let yaml = r"
region: eu-west-1
profile: staging
diff_command: diff -u
tags:
  team: platform
  cost-center: '42'
";
        let settings = SettingsLoader::new().parse_yaml(yaml, None).expect("valid");

        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
        assert_eq!(settings.profile.as_deref(), Some("staging"));
        assert_eq!(settings.diff_command.as_deref(), Some("diff -u"));
        assert_eq!(settings.tags.get("cost-center").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_empty_settings_are_defaults() {
        let settings = SettingsLoader::new().parse_yaml("\n", None).expect("valid");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = SettingsLoader::new()
            .parse_yaml("regoin: us-east-1\n", None)
            .unwrap_err();
        assert!(matches!(err, GiffError::Config(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_explicit_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("missing.yaml");

        let err = SettingsLoader::new()
            .load(Some(&missing), dir.path())
            .unwrap_err();
        assert!(matches!(err, GiffError::Config(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_settings_file_found_in_parent() {
        let dir = TempDir::new().expect("temp dir");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(dir.path().join(".giff.yaml"), "region: us-east-2\n").expect("write");

        let found = find_settings_file(&nested).expect("found");
        assert_eq!(found, dir.path().join(".giff.yaml"));
    }

    #[test]
    fn test_precedence_env_over_file_and_cli_over_env() {
        let mut settings = Settings {
            region: Some(String::from("from-file")),
            profile: Some(String::from("file-profile")),
            ..Settings::default()
        };
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_REGION, "from-env"),
            (ENV_DIFF_COMMAND, "colordiff"),
        ]);

        apply_env_overrides(&mut settings, |name| env.get(name).map(|v| (*v).to_string()));
        assert_eq!(settings.region.as_deref(), Some("from-env"));
        assert_eq!(settings.profile.as_deref(), Some("file-profile"));
        assert_eq!(settings.diff_command.as_deref(), Some("colordiff"));

        let settings = settings.with_cli(Some(String::from("from-cli")), None);
        assert_eq!(settings.region.as_deref(), Some("from-cli"));
        assert_eq!(settings.profile.as_deref(), Some("file-profile"));
    }

    #[test]
    fn test_dotenv_missing_is_fine() {
        let dir = TempDir::new().expect("temp dir");
        let loader = SettingsLoader::new().with_base_path(dir.path());
        tokio_test::assert_ok!(loader.load_dotenv());
    }
}
