//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Expose `POST /api/chat/:id/stream`
    #[serde(default = "default_enable_streaming")]
    pub enable_streaming: bool,

    /// Show detailed error messages (disable in production!)
    #[serde(default)]
    pub verbose_errors: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_streaming: default_enable_streaming(),
            verbose_errors: false,
        }
    }
}

fn default_enable_streaming() -> bool {
    true
}
