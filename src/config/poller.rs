//! Report availability polling configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::availability::{PollState, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_DELAY};

#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    /// Delay between fetch attempts, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl PollerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Fresh poll state with these settings.
    pub fn poll_state(&self) -> Result<PollState, ValidationError> {
        self.validate()?;
        PollState::new(self.max_attempts, self.delay())
            .map_err(|_| ValidationError::InvalidPoller("max_attempts"))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.delay_ms == 0 {
            return Err(ValidationError::InvalidPoller("delay_ms"));
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidPoller("max_attempts"));
        }
        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_delay_ms() -> u64 {
    DEFAULT_POLL_DELAY.as_millis() as u64
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
