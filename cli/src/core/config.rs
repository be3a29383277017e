//! # Bunny Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges, and validates Bunny's configuration. Everything
//! has a sensible default, so running without any configuration file is the
//! normal case.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file given with `--config` or `BUNNY_CONFIG` (used alone)
//! 2. Project-specific `.bunny.toml` in current directory or ancestors
//! 3. User-specific `<config dir>/bunny/config.toml`
//! 4. Default values defined in the code
//!
//! Paths are expanded (`~` to the home directory) and the merged result is
//! validated before any command runs.
//!
//! ## Examples
//!
//! ```toml
//! [engine]
//! farewell_path = true
//! tables_file = "~/.config/bunny/tables.toml"
//!
//! [chat]
//! bot_name = "Bunny"
//! exit_words = ["exit", "quit"]
//!
//! [server]
//! host = "0.0.0.0"
//! port = 9000
//! enable_cors = false
//! session_ttl_secs = 600
//! ```
//!
use crate::core::error::{BunnyError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::IpAddr;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub server: ServerSection,
}

/// Settings for the response engine.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Enables the exit-trigger and farewell recommendation branches.
    /// Unset means off.
    #[serde(default)]
    pub farewell_path: Option<bool>,
    /// Optional TOML file replacing the built-in tables (can use ~).
    #[serde(default)]
    pub tables_file: Option<String>,
}

impl EngineConfig {
    pub fn farewell_enabled(&self) -> bool {
        self.farewell_path.unwrap_or(false)
    }
}

/// Settings for the interactive `bunny chat` loop.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Name used in the introduction and as the reply label.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    /// Raw lines (lowercased) that leave the loop before reaching the engine.
    #[serde(default = "default_exit_words")]
    pub exit_words: Vec<String>,
    /// Printed when an exit word ends the loop.
    #[serde(default = "default_exit_message")]
    pub exit_message: String,
}

/// Settings for the `bunny serve` HTTP adapter.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Unset means enabled.
    #[serde(default)]
    pub enable_cors: Option<bool>,
    /// Sessions idle for longer than this are discarded.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl ServerSection {
    pub fn cors_enabled(&self) -> bool {
        self.enable_cors.unwrap_or(true)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            exit_words: default_exit_words(),
            exit_message: default_exit_message(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: None,
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_bot_name() -> String {
    "Bunny".to_string()
}
fn default_exit_words() -> Vec<String> {
    ["exit", "quit", "bye", "i'm done, bye"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}
fn default_exit_message() -> String {
    "Take care! I'm always here if you need me. 🐰💖".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_session_ttl_secs() -> u64 {
    30 * 60
}

const PROJECT_CONFIG_FILENAME: &str = ".bunny.toml";

/// Loads the effective configuration.
///
/// With `explicit` set, only that file is read (it must exist). Otherwise the
/// user and project files are discovered and merged over the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    expand_config_paths(&mut config).context("Failed to expand paths in configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Bunny", "bunny") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.bunny.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root looking for `.bunny.toml`,
/// stopping at the first directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Merges the project file over the user file.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let defaults = Config::default();
    let mut merged = Config::default();

    // Optional fields: the project value wins whenever the project file sets it.
    merged.engine.farewell_path = project_cfg.engine.farewell_path.or(user.engine.farewell_path);
    merged.engine.tables_file = project_cfg.engine.tables_file.or(user.engine.tables_file);
    merged.server.enable_cors = project_cfg.server.enable_cors.or(user.server.enable_cors);

    // Plain fields: the project value wins when it differs from the default.
    merged.chat.bot_name = if project_cfg.chat.bot_name != defaults.chat.bot_name {
        project_cfg.chat.bot_name
    } else {
        user.chat.bot_name
    };
    merged.chat.exit_words = if project_cfg.chat.exit_words != defaults.chat.exit_words {
        project_cfg.chat.exit_words
    } else {
        user.chat.exit_words
    };
    merged.chat.exit_message = if project_cfg.chat.exit_message != defaults.chat.exit_message {
        project_cfg.chat.exit_message
    } else {
        user.chat.exit_message
    };

    merged.server.host = if project_cfg.server.host != defaults.server.host {
        project_cfg.server.host
    } else {
        user.server.host
    };
    merged.server.port = if project_cfg.server.port != defaults.server.port {
        project_cfg.server.port
    } else {
        user.server.port
    };
    merged.server.session_ttl_secs =
        if project_cfg.server.session_ttl_secs != defaults.server.session_ttl_secs {
            project_cfg.server.session_ttl_secs
        } else {
            user.server.session_ttl_secs
        };
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(tables_file) = config.engine.tables_file.as_mut() {
        *tables_file = shellexpand::tilde(tables_file.as_str()).into_owned();
        debug!("Expanded tables file path: {}", tables_file);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if let Some(tables_file) = &config.engine.tables_file {
        let path = PathBuf::from(tables_file);
        if !path.exists() {
            return Err(anyhow!(BunnyError::Config(format!(
                "Configured tables file '{}' does not exist.",
                path.display()
            ))));
        }
        if !path.is_file() {
            return Err(anyhow!(BunnyError::Config(format!(
                "Configured tables path '{}' exists but is not a file.",
                path.display()
            ))));
        }
    }
    if config.chat.exit_words.is_empty() {
        return Err(anyhow!(BunnyError::Config(
            "At least one chat exit word is required.".to_string()
        )));
    }
    if config.chat.bot_name.trim().is_empty() {
        return Err(anyhow!(BunnyError::Config(
            "The bot name cannot be empty.".to_string()
        )));
    }
    if config.server.session_ttl_secs == 0 {
        return Err(anyhow!(BunnyError::Config(
            "server.session_ttl_secs must be greater than zero.".to_string()
        )));
    }
    if config.server.host.parse::<IpAddr>().is_err() {
        return Err(anyhow!(BunnyError::Config(format!(
            "Invalid server host '{}'. Expected an IP address.",
            config.server.host
        ))));
    }
    info!("Configuration validation successful.");
    Ok(())
}
