//! Configuration management for nicdecode.
//!
//! This module provides configuration loading and validation using figment,
//! supporting a TOML config file, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::OutputFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "nicdecode";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "NICDECODE_";

/// Upper bound for either shell delay.
pub const MAX_DELAY_MS: u64 = 10_000;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `NICDECODE_`, sections split on `__`)
/// 2. TOML config file at `~/.config/nicdecode/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interactive shell configuration.
    pub shell: ShellConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Interactive shell configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Pause between submitting a NIC and revealing the result.
    pub reveal_delay_ms: u64,
    /// Pause when switching between the landing and verification screens.
    pub transition_delay_ms: u64,
    /// Show emoji icons on result cards and messages.
    pub show_icons: bool,
}

/// Output configuration for one-shot commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used by `check` when `--format` is not given.
    pub format: OutputFormat,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 1000,
            transition_delay_ms: 400,
            show_icons: true,
        }
    }
}

impl Config {
    /// Load configuration, from `config_path` or the default location.
    ///
    /// A missing file is not an error; defaults and environment apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        tracing::debug!(path = %config_file.display(), "loading configuration");

        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either shell delay exceeds [`MAX_DELAY_MS`].
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("reveal_delay_ms", self.shell.reveal_delay_ms),
            ("transition_delay_ms", self.shell.transition_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(Error::config_validation(format!(
                    "{name} ({value}) cannot be greater than {MAX_DELAY_MS}"
                )));
            }
        }
        Ok(())
    }

    /// Get the reveal delay as a Duration.
    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.shell.reveal_delay_ms)
    }

    /// Get the screen transition delay as a Duration.
    #[must_use]
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.shell.transition_delay_ms)
    }
}
