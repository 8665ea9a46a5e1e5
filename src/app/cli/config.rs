//! TOML configuration file parsing and loading
//!
//! A configuration file describes the queue and the demo workload:
//!
//! ```toml
//! log_level = "debug"
//!
//! [queue]
//! capacity = 4
//!
//! [[producers]]
//! name = "T1"
//! messages = 10
//! interval_ms = 3000
//!
//! [[subscribers]]
//! name = "T2"
//! receive = 5
//! interval_ms = 2000
//! ```
//!
//! Omitted sections fall back to the built-in workload. Command line flags
//! override values read from the file.

use crate::app::cli::args::Args;
use crate::core::logging::LogSettings;
use crate::queue::api::QueueConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How long a subscriber waits on an empty queue before giving up on a receive
pub const DEFAULT_RECEIVE_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { .. } => {
                Some("The specified configuration file does not exist")
            }
            ConfigError::Parse { .. } => Some("The configuration file is not valid TOML"),
            ConfigError::Invalid { message } => Some(message.as_str()),
            ConfigError::Read { .. } => None,
        }
    }
}

/// One producer thread: sleeps `interval_ms`, then publishes, `messages` times
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProducerConfig {
    pub name: String,
    pub messages: usize,
    #[serde(default)]
    pub interval_ms: u64,
    /// Message text is the prefix followed by a per-producer counter
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

/// One subscriber thread: receives, then sleeps `interval_ms`, `receive` times
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriberConfig {
    pub name: String,
    pub receive: usize,
    #[serde(default)]
    pub interval_ms: u64,
}

fn default_prefix() -> String {
    "m".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<String>,
    pub color: Option<bool>,
    pub receive_timeout_ms: u64,
    pub queue: QueueConfig,
    pub producers: Vec<ProducerConfig>,
    pub subscribers: Vec<SubscriberConfig>,
}

impl Default for DemoConfig {
    /// One producer and three subscribers over a queue of two slots
    fn default() -> Self {
        let subscriber = |name: &str, receive: usize, interval_ms: u64| SubscriberConfig {
            name: name.to_string(),
            receive,
            interval_ms,
        };
        Self {
            log_level: None,
            log_format: None,
            log_file: None,
            color: None,
            receive_timeout_ms: DEFAULT_RECEIVE_TIMEOUT_MS,
            queue: QueueConfig::default(),
            producers: vec![ProducerConfig {
                name: "T1".to_string(),
                messages: 10,
                interval_ms: 3000,
                prefix: default_prefix(),
            }],
            subscribers: vec![
                subscriber("T2", 5, 2000),
                subscriber("T3", 5, 4000),
                subscriber("T4", 1, 1000),
            ],
        }
    }
}

/// Default location: `<config dir>/Pubqueue/pubqueue.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Pubqueue").join("pubqueue.toml"))
}

impl DemoConfig {
    /// Load the configuration file
    ///
    /// An explicitly named file must exist. Without one, the default path is
    /// used when present, otherwise the built-in defaults.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("no configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply command line overrides on top of the file values
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(capacity) = args.capacity {
            self.queue.capacity = capacity;
        }
        if let Some(level) = &args.log_level {
            self.log_level = Some(level.clone());
        }
        if let Some(format) = &args.log_format {
            self.log_format = Some(format.clone());
        }
        if let Some(file) = &args.log_file {
            // "none" and "-" disable a file configured in the config file
            if file.as_os_str().eq_ignore_ascii_case("none") || file.as_os_str() == "-" {
                self.log_file = None;
            } else {
                self.log_file = Some(file.to_string_lossy().to_string());
            }
        }
        if let Some(color) = args.color_override() {
            self.color = Some(color);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.queue
            .validate()
            .map_err(|e| ConfigError::invalid(e.to_string()))?;
        if self.producers.is_empty() {
            return Err(ConfigError::invalid("at least one producer is required"));
        }
        let names = self
            .producers
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.subscribers.iter().map(|s| s.name.as_str()));
        for (index, name) in names.clone().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid("producer and subscriber names must not be empty"));
            }
            if names.clone().skip(index + 1).any(|other| other == name) {
                return Err(ConfigError::invalid(format!("duplicate worker name '{}'", name)));
            }
        }
        if self.receive_timeout_ms == 0 {
            return Err(ConfigError::invalid("receive_timeout_ms must be greater than 0"));
        }
        Ok(())
    }

    /// Logger settings; colour defaults to whether stdout is a terminal
    pub fn log_settings(&self) -> LogSettings {
        use std::io::IsTerminal;

        LogSettings {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            file: self.log_file.clone(),
            color: self
                .color
                .unwrap_or_else(|| std::io::stdout().is_terminal()),
        }
    }
}
