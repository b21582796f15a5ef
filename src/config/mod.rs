//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `REPORT_ASSISTANT`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use report_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.port);
//! ```

mod ai;
mod backend;
mod error;
mod features;
mod poller;
mod server;
mod upload;

pub use ai::{AiConfig, AiProvider};
pub use backend::BackendConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use poller::PollerConfig;
pub use server::{Environment, ServerConfig};
pub use upload::UploadConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults; only the OpenAI key is required when the
/// OpenAI provider is selected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ai: AiConfig,

    /// Ingestion backend (upload, report fetch, retrieval)
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub poller: PollerConfig,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables with the
    /// `REPORT_ASSISTANT` prefix:
    ///
    /// - `REPORT_ASSISTANT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `REPORT_ASSISTANT__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REPORT_ASSISTANT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.backend.validate()?;
        self.upload.validate()?;
        self.poller.validate()?;
        self.validate_turn_budget()
    }

    /// A chat turn makes one AI call and at most one backend call; the
    /// request timeout has to outlast both.
    fn validate_turn_budget(&self) -> Result<(), ValidationError> {
        let turn_secs = self
            .ai
            .timeout_secs
            .saturating_add(self.backend.timeout_secs);
        if self.server.request_timeout_secs <= turn_secs {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_secs: self.server.request_timeout_secs,
                turn_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
