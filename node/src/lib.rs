use naocoin_types::casino::RESPONSE_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::Level;

pub mod commands;
pub mod coordinator;
pub mod engine;
pub mod games;
pub mod platform;

/// Configuration for the [engine::Engine].
#[derive(Deserialize, Serialize)]
pub struct Config {
    pub directory: String,
    pub worker_threads: usize,
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    pub metrics_port: u16,

    pub mailbox_size: usize,
    #[serde(default = "default_partition_prefix")]
    pub partition_prefix: String,
    /// Keep accounts in memory only (lost on restart).
    #[serde(default)]
    pub ephemeral: bool,

    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

pub struct ValidatedConfig {
    pub directory: PathBuf,
    pub worker_threads: usize,
    pub log_level: Level,
    pub log_json: bool,
    pub metrics_port: u16,

    pub mailbox_size: usize,
    pub partition_prefix: String,
    pub ephemeral: bool,

    pub command_prefix: String,
    pub response_timeout: Duration,
}

fn default_partition_prefix() -> String {
    "naocoin".to_string()
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_response_timeout_ms() -> u64 {
    RESPONSE_TIMEOUT_SECS * 1_000
}

fn non_zero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(())
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        non_zero("worker_threads", self.worker_threads as u64)?;
        non_zero("mailbox_size", self.mailbox_size as u64)?;
        non_zero("response_timeout_ms", self.response_timeout_ms)?;
        if self.command_prefix.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "command_prefix",
            });
        }
        if self.partition_prefix.is_empty() {
            return Err(ConfigError::Empty {
                field: "partition_prefix",
            });
        }

        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        Ok(ValidatedConfig {
            directory: PathBuf::from(self.directory),
            worker_threads: self.worker_threads,
            log_level,
            log_json: self.log_json,
            metrics_port: self.metrics_port,
            mailbox_size: self.mailbox_size,
            partition_prefix: self.partition_prefix,
            ephemeral: self.ephemeral,
            command_prefix: self.command_prefix.trim().to_string(),
            response_timeout: Duration::from_millis(self.response_timeout_ms),
        })
    }
}
