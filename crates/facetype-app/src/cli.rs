//! CLI argument definitions for the Facetype binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use facetype_core::types::Channel;

/// Facetype - hands-free text entry driven by facial-expression intensities.
#[derive(Parser, Debug)]
#[command(name = "facetype", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory holding persisted calibration.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Feed a JSON-lines frame script through the engine ("-" reads stdin).
    Replay {
        input: PathBuf,
    },
    /// Print the ranked completions of a prefix.
    Suggest {
        prefix: String,
        /// Maximum completions to print (defaults to the configured count).
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,
    },
    /// Set and persist one channel's calibrated maximum.
    Calibrate {
        #[arg(value_parser = parse_channel)]
        channel: Channel,
        value: f32,
    },
    /// Print the stored calibration.
    ShowCalibration,
}

fn parse_channel(name: &str) -> Result<Channel, String> {
    Channel::parse(name).ok_or_else(|| format!("unknown channel '{}' (expected left, right or back)", name))
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > FACETYPE_CONFIG env var > ~/.facetype/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("FACETYPE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory, `None` if not overridden.
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".facetype").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".facetype").join("config.toml");
    }
    PathBuf::from("config.toml")
}
