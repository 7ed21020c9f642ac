use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::board::BoardError;

/// Main configuration structure for board-sweep
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardSweepConfig {
    /// Board API settings
    pub board: BoardConfig,
    /// Retry behaviour for board API calls
    pub retry: RetryConfig,
    /// Client-side rate limiting
    pub rate_limit: RateLimitConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Board API token (can be set via MONDAY_TOKEN)
    pub token: Option<String>,
    /// Board to sweep (can be set via BOARD_ID)
    pub board_id: Option<u64>,
    /// Numbers column summed across duplicates (can be set via NUMBER_COLUMN_ID)
    pub column_id: String,
    /// GraphQL endpoint
    pub api_url: String,
    /// Value for the API-Version header, if pinned
    pub api_version: Option<String>,
    /// Items requested per page when listing a group
    pub page_size: u32,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Retry transient failures instead of aborting the sweep
    pub enabled: bool,
    /// Total attempts per call, first one included
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

pub const DEFAULT_COLUMN_ID: &str = "numbers";
pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            jitter: true,
        }
    }
}

impl Default for BoardSweepConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                token: None, // Will be read from env var or .env
                board_id: None,
                column_id: DEFAULT_COLUMN_ID.to_string(),
                api_url: DEFAULT_API_URL.to_string(),
                api_version: None,
                page_size: 500,
                timeout_seconds: 30,
            },
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig {
                requests_per_minute: 120,
                burst_capacity: 20,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl BoardSweepConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (board-sweep.toml, or the given path)
    /// 3. Environment variables (prefixed with BOARD_SWEEP__)
    /// 4. MONDAY_TOKEN, BOARD_ID and NUMBER_COLUMN_ID
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(config_file, &env)
    }

    /// Same as [`BoardSweepConfig::load`] with an explicit environment
    pub fn load_from(config_file: Option<&Path>, env: &HashMap<String, String>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path));
            }
            None if Path::new("board-sweep.toml").exists() => {
                builder = builder.add_source(File::with_name("board-sweep"));
            }
            None => {}
        }

        builder = builder.add_source(
            Environment::with_prefix("BOARD_SWEEP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone().into_iter().collect())),
        );

        let mut board_sweep_config: BoardSweepConfig = builder.build()?.try_deserialize()?;
        board_sweep_config.apply_plain_env(|key| env.get(key).cloned())?;

        Ok(board_sweep_config)
    }

    /// Fill unset values from the plain variables the tool has always read
    fn apply_plain_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if self.board.token.is_none() {
            self.board.token = lookup("MONDAY_TOKEN").filter(|token| !token.trim().is_empty());
        }

        if self.board.board_id.is_none() {
            if let Some(raw) = lookup("BOARD_ID").filter(|raw| !raw.trim().is_empty()) {
                let board_id = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| BoardError::ConfigNotFound(format!("BOARD_ID must be a number, got '{raw}'")))?;
                self.board.board_id = Some(board_id);
            }
        }

        if self.board.column_id == DEFAULT_COLUMN_ID {
            if let Some(column_id) = lookup("NUMBER_COLUMN_ID").filter(|c| !c.trim().is_empty()) {
                self.board.column_id = column_id;
            }
        }

        Ok(())
    }

    /// Check that everything needed to talk to the board is present
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.board.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(BoardError::TokenNotFound(
                "Board API token not found. Please set the MONDAY_TOKEN environment variable."
                    .to_string(),
            ));
        }
        if self.board.board_id.is_none() {
            return Err(BoardError::ConfigNotFound(
                "Board id not configured. Please set the BOARD_ID environment variable."
                    .to_string(),
            ));
        }
        if self.board.column_id.trim().is_empty() {
            return Err(BoardError::ConfigNotFound(
                "Numeric column id is empty. Please set NUMBER_COLUMN_ID.".to_string(),
            ));
        }
        Ok(())
    }

    /// Render as TOML with the token masked
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.board.token.is_some() {
            shown.board.token = Some("********".to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
