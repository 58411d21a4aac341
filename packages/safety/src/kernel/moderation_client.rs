use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::kernel::traits::{BaseContentClassifier, ClassifierVerdict, SafetyError};
use crate::kernel::MODERATION_MODEL;

/// OpenAI moderation endpoint client
///
/// The remote general-purpose content classifier behind the
/// `BaseContentClassifier` seam. The HTTP client carries its own timeout
/// in addition to the pipeline's outer deadline, so a stuck connection
/// can never hang a request.
pub struct OpenAiModerationClient {
    api_key: String,
    client: reqwest::Client,
}

const MODERATION_API_URL: &str = "https://api.openai.com/v1/moderations";

/// Moderation API request
#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Moderation API response
#[derive(Debug, Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResult>,
}

/// Single classification result
#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
    #[serde(default)]
    categories: HashMap<String, bool>,
}

impl OpenAiModerationClient {
    /// Create a new moderation client with the given request timeout.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { api_key, client })
    }
}

#[async_trait]
impl BaseContentClassifier for OpenAiModerationClient {
    async fn classify(&self, text: &str) -> Result<ClassifierVerdict> {
        let request = ModerationRequest {
            model: MODERATION_MODEL,
            input: text,
        };

        let response = self
            .client
            .post(MODERATION_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SafetyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SafetyError::Transport(format!(
                "moderation endpoint returned {}",
                response.status()
            ))
            .into());
        }

        let body: ModerationResponse = response
            .json()
            .await
            .map_err(|e| SafetyError::MalformedResponse(e.to_string()))?;

        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SafetyError::MalformedResponse("empty results array".to_string()))?;

        let categories = result
            .categories
            .into_iter()
            .filter_map(|(name, hit)| hit.then_some(name))
            .collect();

        Ok(ClassifierVerdict {
            allowed: !result.flagged,
            categories,
        })
    }
}
