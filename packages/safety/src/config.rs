use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::common::pii::PiiOptions;

/// Deployment environment. Production ignores the fail-open override no
/// matter what the environment variables say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
    Development,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" => Environment::Staging,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }
}

/// Safety pipeline configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct SafetyConfig {
    pub environment: Environment,
    /// Outer deadline for each remote classifier call, in milliseconds.
    pub ai_timeout_ms: u64,
    pub toxicity_enabled: bool,
    /// Scores at or above this block the content.
    pub toxicity_threshold: f64,
    pub block_social_handles: bool,
    pub block_self_identification: bool,
    /// Raw value of SAFETY_FAIL_OPEN. Read it through [`Self::fail_open`],
    /// which applies the environment gate.
    pub fail_open_requested: bool,
    pub openai_api_key: Option<String>,
    pub perspective_api_key: Option<String>,
}

impl SafetyConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            environment: Environment::parse(
                &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            ),
            ai_timeout_ms: env::var("SAFETY_AI_TIMEOUT_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .context("SAFETY_AI_TIMEOUT_MS must be a valid number")?,
            toxicity_enabled: env_flag("SAFETY_TOXICITY_ENABLED", false),
            toxicity_threshold: env::var("SAFETY_TOXICITY_THRESHOLD")
                .unwrap_or_else(|_| "0.8".to_string())
                .parse()
                .context("SAFETY_TOXICITY_THRESHOLD must be a valid number")?,
            block_social_handles: env_flag("SAFETY_BLOCK_SOCIAL_HANDLES", true),
            block_self_identification: env_flag("SAFETY_BLOCK_SELF_IDENTIFICATION", true),
            fail_open_requested: env_flag("SAFETY_FAIL_OPEN", false),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            perspective_api_key: env::var("PERSPECTIVE_API_KEY").ok(),
        })
    }

    /// Whether a failed dependency may be skipped instead of rejecting.
    ///
    /// Only honored outside production. This is the single place the gate
    /// is applied; individual layers never consult the flag.
    pub fn fail_open(&self) -> bool {
        self.fail_open_requested && self.environment != Environment::Production
    }

    /// Category toggles handed to the PII detector.
    pub fn pii_options(&self) -> PiiOptions {
        PiiOptions {
            block_social_handles: self.block_social_handles,
            block_self_identification: self.block_self_identification,
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            ai_timeout_ms: 2000,
            toxicity_enabled: false,
            toxicity_threshold: 0.8,
            block_social_handles: true,
            block_self_identification: true,
            fail_open_requested: false,
            openai_api_key: None,
            perspective_api_key: None,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
