// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no decision logic. The pipeline
// (kernel/pipeline.rs) owns sequencing and the fail-closed policy; these
// traits just describe the external collaborators it talks to.
//
// Naming convention: Base* for trait names (e.g., BaseBlocklist)

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Failures from remote safety dependencies. Every variant collapses to
/// the same service rejection at the pipeline boundary; the variants exist
/// for logs, not for callers.
#[derive(Debug, Error)]
pub enum SafetyError {
    #[error("classifier is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

// =============================================================================
// Blocklist Trait (Infrastructure)
// =============================================================================

/// Dynamically editable banned-term set, owned by the external store.
/// The pipeline receives a read-only snapshot per request and only ever
/// asks membership questions.
#[async_trait]
pub trait BaseBlocklist: Send + Sync {
    /// True when the given term is banned. Terms are compared in their
    /// normalized (folded) form.
    async fn lookup(&self, term: &str) -> Result<bool>;
}

// =============================================================================
// Content Classifier Trait (Infrastructure - remote AI moderation)
// =============================================================================

/// Verdict from a remote content classifier.
#[derive(Debug, Clone)]
pub struct ClassifierVerdict {
    pub allowed: bool,
    /// Categories the classifier flagged. Logged, never shown to users.
    pub categories: Vec<String>,
}

#[async_trait]
pub trait BaseContentClassifier: Send + Sync {
    /// Classify text with the remote moderation model.
    async fn classify(&self, text: &str) -> Result<ClassifierVerdict>;
}

// =============================================================================
// Toxicity Scorer Trait (Infrastructure - optional second opinion)
// =============================================================================

#[async_trait]
pub trait BaseToxicityScorer: Send + Sync {
    /// Toxicity score in `[0.0, 1.0]`; higher is more toxic.
    async fn score(&self, text: &str) -> Result<f64>;
}
