//! CLI argument definitions for the Lumina application.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

use lumina_core::config::LuminaConfig;

/// Lumina: pick beauty products and chat with an assistant about routines.
#[derive(Parser, Debug)]
#[command(name = "lumina", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Product catalog JSON file.
    #[arg(long = "catalog")]
    pub catalog: Option<PathBuf>,

    /// Data directory for the selection database.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Chat completion endpoint URL.
    #[arg(short = 'e', long = "endpoint")]
    pub endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Keep the selection in memory only.
    #[arg(long = "ephemeral")]
    pub ephemeral: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > LUMINA_CONFIG env var > ~/.lumina/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("LUMINA_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut LuminaConfig) {
        if let Some(ref p) = self.catalog {
            config.catalog.path = p.to_string_lossy().to_string();
        }
        if let Some(ref p) = self.data_dir {
            config.general.data_dir = p.to_string_lossy().to_string();
        }
        if let Some(ref url) = self.endpoint {
            config.chat.endpoint = url.clone();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        return home_dir().join(rest);
    }
    PathBuf::from(path)
}

fn home_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."))
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    let home = home_dir();
    if home == Path::new(".") {
        return PathBuf::from("config.toml");
    }
    home.join(".lumina").join("config.toml")
}
