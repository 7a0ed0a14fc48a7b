//! Configuration management for the server.

use std::env;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Root directory of the content library (books/, courses/, decks/)
    pub content_dir: PathBuf,
    /// Directory holding prompt template files
    pub prompt_dir: PathBuf,
    /// Token required on admin endpoints; open when unset (development mode)
    pub admin_token: Option<String>,
    /// Reject items carrying more than four tags instead of logging them
    pub strict_tag_limit: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let content_dir = env::var("CONTENT_DIR")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::MissingContentDir)?;

        let prompt_dir = env::var("PROMPT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("prompts"));

        let admin_token = env::var("CONTENT_ADMIN_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let strict_tag_limit = env::var("STRICT_TAG_LIMIT")
            .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            content_dir,
            prompt_dir,
            admin_token,
            strict_tag_limit,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CONTENT_DIR environment variable is required")]
    MissingContentDir,

    #[error("Invalid PORT value")]
    InvalidPort,
}
