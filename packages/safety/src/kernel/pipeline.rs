//! The safety pipeline orchestrator.
//!
//! The only entry point the API layer talks to. Sequences the layers:
//!
//! 1. PII detection (pure, always first: PII must never reach the
//!    remote classifiers)
//! 2. Blocklist snapshot lookup + local heuristic moderation
//! 3. Remote content classifier, bounded by a timeout
//! 4. Optional toxicity scorer, same fail-closed rule
//!
//! Fail-closed: any dependency failure (timeout, transport error,
//! missing configuration, malformed response) resolves to a service
//! rejection, never an approval. The one escape hatch is the
//! environment-gated fail-open override, consulted only here and dead in
//! production.
//!
//! Nothing is persisted before a decision is returned, so a cancelled
//! request simply drops the in-flight classifier call and the decision
//! with it.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use crate::common::moderation::{moderate, ModerationDecision, ReasonCode};
use crate::common::normalize::normalize;
use crate::common::pii::{detect_pii_with_options, PiiFinding};
use crate::config::SafetyConfig;
use crate::kernel::deps::SafetyDeps;
use crate::kernel::traits::ClassifierVerdict;

/// Orchestrates every layer of the content-safety check.
///
/// Callers must not persist content unless [`check_message`] returned an
/// allowed decision. [`check_message`] runs PII detection itself, so one
/// call is the whole contract.
///
/// [`check_message`]: SafetyPipeline::check_message
pub struct SafetyPipeline {
    deps: SafetyDeps,
    config: SafetyConfig,
}

impl SafetyPipeline {
    pub fn new(deps: SafetyDeps, config: SafetyConfig) -> Self {
        Self { deps, config }
    }

    /// Scan raw message text for PII using the configured toggles.
    pub fn detect_pii(&self, text: &str) -> PiiFinding {
        detect_pii_with_options(text, &self.config.pii_options())
    }

    /// Run the full safety check on one message.
    pub async fn check_message(&self, text: &str) -> ModerationDecision {
        if text.trim().is_empty() {
            return ModerationDecision::reject_content(ReasonCode::EmptyContent);
        }

        // Layer 1: PII. Pure and local, so it always runs.
        let finding = self.detect_pii(text);
        if finding.blocked {
            debug!(categories = ?finding.categories, "message blocked for PII");
            return ModerationDecision::reject_content(ReasonCode::PiiDetected);
        }

        // Layer 2a: dynamic blocklist snapshot. A store error is a
        // dependency failure, not a content problem.
        match self.blocklist_hit(text).await {
            Ok(true) => {
                debug!("message blocked by blocklist term");
                return ModerationDecision::reject_content(ReasonCode::BlocklistedTerm);
            }
            Ok(false) => {}
            Err(error) => {
                warn!(error = %error, "blocklist lookup failed");
                if let Some(decision) = self.service_rejection("blocklist") {
                    return decision;
                }
            }
        }

        // Layer 2b: local heuristics.
        let local = moderate(text);
        if !local.is_allowed() {
            debug!(reason = ?local.reason(), "message blocked by local heuristics");
            return local;
        }

        // Layer 3: remote content classifier, fail-closed.
        match self.classify_remote(text).await {
            Ok(verdict) if !verdict.allowed => {
                debug!(categories = ?verdict.categories, "message blocked by classifier");
                return ModerationDecision::reject_content(ReasonCode::ClassifierFlagged);
            }
            Ok(_) => {}
            Err(error) => {
                warn!(error = %error, "content classifier unavailable");
                if let Some(decision) = self.service_rejection("classifier") {
                    return decision;
                }
            }
        }

        // Layer 4: optional toxicity scorer, same fail-closed rule. Runs
        // after the primary layer, so it can never override a rejection.
        if self.config.toxicity_enabled {
            match self.score_toxicity(text).await {
                Ok(score) if score >= self.config.toxicity_threshold => {
                    debug!(score, "message blocked by toxicity score");
                    return ModerationDecision::reject_content(ReasonCode::ToxicityFlagged);
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(error = %error, "toxicity scorer unavailable");
                    if let Some(decision) = self.service_rejection("toxicity") {
                        return decision;
                    }
                }
            }
        }

        ModerationDecision::allow()
    }

    /// Moderate an author display name. Local heuristics only; no
    /// network round-trip for a name field.
    pub fn check_author_name(&self, name: &str) -> ModerationDecision {
        moderate(name)
    }

    /// Look up every distinct normalized token against the blocklist
    /// snapshot.
    async fn blocklist_hit(&self, text: &str) -> Result<bool> {
        let mut seen: HashSet<String> = HashSet::new();
        for view in normalize(text) {
            for token in view.tokens {
                seen.insert(token);
            }
        }

        for token in seen {
            if self.deps.blocklist.lookup(&token).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn classify_remote(&self, text: &str) -> Result<ClassifierVerdict> {
        let classifier = self
            .deps
            .classifier
            .as_ref()
            .context("no content classifier configured")?;

        let deadline = Duration::from_millis(self.config.ai_timeout_ms);
        match tokio::time::timeout(deadline, classifier.classify(text)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "content classifier timed out after {}ms",
                self.config.ai_timeout_ms
            )),
        }
    }

    async fn score_toxicity(&self, text: &str) -> Result<f64> {
        let scorer = self
            .deps
            .toxicity_scorer
            .as_ref()
            .context("no toxicity scorer configured")?;

        let deadline = Duration::from_millis(self.config.ai_timeout_ms);
        match tokio::time::timeout(deadline, scorer.score(text)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "toxicity scorer timed out after {}ms",
                self.config.ai_timeout_ms
            )),
        }
    }

    /// The fail-closed policy in one place. Returns the service rejection
    /// to hand back, or `None` when the environment-gated fail-open
    /// override says to skip the failed layer.
    fn service_rejection(&self, layer: &str) -> Option<ModerationDecision> {
        if self.config.fail_open() {
            info!(layer, "fail-open override active, skipping failed layer");
            None
        } else {
            Some(ModerationDecision::reject_service())
        }
    }
}
