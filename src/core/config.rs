//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.flashdeck/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::session::{DEFAULT_FONT_SIZE, clamp_font_size};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FlashdeckConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub front_first: Option<bool>,
    pub font_size: Option<u32>,
    pub resume: Option<bool>,
    pub snapshot_dir: Option<String>,
    pub export_dir: Option<String>,
    pub log_level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub front_first: bool,
    pub font_size: u32,
    pub resume: bool,
    pub snapshot_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_level: LevelFilter,
}

/// Values given on the command line. `None` / `false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub back_first: bool,
    pub no_resume: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.flashdeck`.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".flashdeck"))
}

/// Returns the path to `~/.flashdeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    home_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.flashdeck/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FlashdeckConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FlashdeckConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FlashdeckConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(FlashdeckConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<FlashdeckConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FlashdeckConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# flashdeck configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# front_first = true                 # show the term first; --back-first flips it
# font_size = 30                     # 8..=96, saved with each session
# resume = true                      # pick up where you left off; --no-resume
# snapshot_dir = "~/.flashdeck/snapshots"   # or FLASHDECK_SNAPSHOT_DIR
# export_dir = "."                   # where `e` writes exported snapshots
# log_level = "debug"                # or FLASHDECK_LOG
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &FlashdeckConfig, cli: &CliOverrides) -> ResolvedConfig {
    let general = &config.general;

    // Face: CLI → config → default
    let front_first = !cli.back_first && general.front_first.unwrap_or(true);

    let font_size = clamp_font_size(general.font_size.unwrap_or(DEFAULT_FONT_SIZE));

    // Resume: CLI → config → default
    let resume = !cli.no_resume && general.resume.unwrap_or(true);

    // Snapshot dir: env → config → default
    let snapshot_dir = std::env::var("FLASHDECK_SNAPSHOT_DIR")
        .ok()
        .or_else(|| general.snapshot_dir.clone())
        .map(|d| expand_home(&d))
        .or_else(|| home_dir().map(|h| h.join("snapshots")))
        .unwrap_or_else(|| PathBuf::from(".flashdeck-snapshots"));

    let export_dir = general
        .export_dir
        .as_deref()
        .map(expand_home)
        .unwrap_or_else(|| PathBuf::from("."));

    // Log level: env → config → default
    let log_level = std::env::var("FLASHDECK_LOG")
        .ok()
        .or_else(|| general.log_level.clone())
        .and_then(|level| match level.parse::<LevelFilter>() {
            Ok(filter) => Some(filter),
            Err(_) => {
                warn!("Unknown log level {level:?}, using default");
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        front_first,
        font_size,
        resume,
        snapshot_dir,
        export_dir,
        log_level,
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
