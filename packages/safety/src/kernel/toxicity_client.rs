use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::kernel::traits::{BaseToxicityScorer, SafetyError};

/// Perspective API client for toxicity scoring
///
/// Optional supplementary layer. Scores text instead of classifying it;
/// the pipeline applies the configured threshold.
pub struct PerspectiveClient {
    api_key: String,
    client: reqwest::Client,
}

const ANALYZE_URL: &str = "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    comment: Comment<'a>,
    requested_attributes: RequestedAttributes,
    do_not_store: bool,
}

#[derive(Debug, Serialize)]
struct Comment<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct RequestedAttributes {
    #[serde(rename = "TOXICITY")]
    toxicity: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    attribute_scores: AttributeScores,
}

#[derive(Debug, Deserialize)]
struct AttributeScores {
    #[serde(rename = "TOXICITY")]
    toxicity: AttributeScore,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeScore {
    summary_score: SummaryScore,
}

#[derive(Debug, Deserialize)]
struct SummaryScore {
    value: f64,
}

impl PerspectiveClient {
    /// Create a new toxicity client with the given request timeout.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { api_key, client })
    }
}

#[async_trait]
impl BaseToxicityScorer for PerspectiveClient {
    async fn score(&self, text: &str) -> Result<f64> {
        let request = AnalyzeRequest {
            comment: Comment { text },
            requested_attributes: RequestedAttributes {
                toxicity: serde_json::json!({}),
            },
            do_not_store: true,
        };

        let response = self
            .client
            .post(ANALYZE_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| SafetyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SafetyError::Transport(format!(
                "toxicity endpoint returned {}",
                response.status()
            ))
            .into());
        }

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| SafetyError::MalformedResponse(e.to_string()))?;

        Ok(body.attribute_scores.toxicity.summary_score.value)
    }
}
