//! Configuration module for solo-serve.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values.

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Verbosity used when neither `-v` nor the config file says otherwise.
pub const DEFAULT_VERBOSITY: u8 = 1;

/// Verbosity selected by `-v`.
pub const VERBOSE_VERBOSITY: u8 = 2;

/// Connection handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Echo every read back to the client until CLOSE or QUIT.
    Echo,
    /// Serve whitelisted files over a single HTTP/1.1 GET per connection.
    Http,
}

/// Command-line arguments for the server
#[derive(Parser, Debug)]
#[command(name = "solo-serve")]
#[command(author = "solo-serve authors")]
#[command(version = "0.1.0")]
#[command(about = "A single-connection echo / HTTP file server", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Connection handling mode
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Raise message verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory served files are read from (defaults to the working directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server-related configuration
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Connection handling mode
    #[serde(default = "default_mode")]
    pub mode: Mode,
    /// Message verbosity threshold
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            verbosity: default_verbosity(),
        }
    }
}

/// HTTP mode configuration
#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    /// Directory served files are read from
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_mode() -> Mode {
    Mode::Http
}

fn default_verbosity() -> u8 {
    DEFAULT_VERBOSITY
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub verbosity: u8,
    pub root: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Load configuration from CLI args and optional TOML file.
    /// CLI arguments take precedence over TOML file values.
    pub fn load() -> Result<Self, ConfigError> {
        let cli = CliArgs::parse();

        let toml_config = if let Some(ref config_path) = cli.config {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))?
        } else {
            TomlConfig::default()
        };

        Ok(Self::merge(cli, toml_config))
    }

    fn merge(cli: CliArgs, toml_config: TomlConfig) -> Self {
        Config {
            mode: cli.mode.unwrap_or(toml_config.server.mode),
            verbosity: if cli.verbose {
                VERBOSE_VERBOSITY
            } else {
                toml_config.server.verbosity
            },
            root: cli.root.unwrap_or(toml_config.http.root),
            log_level: if cli.log_level != "info" {
                cli.log_level
            } else {
                toml_config.logging.level
            },
        }
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    TomlParse(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::TomlParse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
