//! Shared test doubles for pipeline tests.
//!
//! Every external collaborator has a controllable stand-in here so tests
//! can exercise the fail-closed policy without touching the network.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::kernel::blocklist::SnapshotBlocklist;
use crate::kernel::deps::SafetyDeps;
use crate::kernel::traits::{
    BaseBlocklist, BaseContentClassifier, BaseToxicityScorer, ClassifierVerdict,
};

/// Classifier that always returns the same verdict.
pub struct StaticClassifier {
    pub allowed: bool,
}

#[async_trait]
impl BaseContentClassifier for StaticClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassifierVerdict> {
        Ok(ClassifierVerdict {
            allowed: self.allowed,
            categories: if self.allowed {
                vec![]
            } else {
                vec!["test".to_string()]
            },
        })
    }
}

/// Classifier whose requests always fail.
pub struct FailingClassifier;

#[async_trait]
impl BaseContentClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassifierVerdict> {
        Err(anyhow!("connection refused"))
    }
}

/// Classifier that sleeps past any reasonable deadline.
pub struct SlowClassifier {
    pub delay: Duration,
}

#[async_trait]
impl BaseContentClassifier for SlowClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassifierVerdict> {
        tokio::time::sleep(self.delay).await;
        Ok(ClassifierVerdict {
            allowed: true,
            categories: vec![],
        })
    }
}

/// Toxicity scorer that always returns the same score.
pub struct StaticToxicityScorer {
    pub score: f64,
}

#[async_trait]
impl BaseToxicityScorer for StaticToxicityScorer {
    async fn score(&self, _text: &str) -> Result<f64> {
        Ok(self.score)
    }
}

/// Toxicity scorer whose requests always fail.
pub struct FailingToxicityScorer;

#[async_trait]
impl BaseToxicityScorer for FailingToxicityScorer {
    async fn score(&self, _text: &str) -> Result<f64> {
        Err(anyhow!("quota exceeded"))
    }
}

/// Blocklist whose store is down.
pub struct FailingBlocklist;

#[async_trait]
impl BaseBlocklist for FailingBlocklist {
    async fn lookup(&self, _term: &str) -> Result<bool> {
        Err(anyhow!("store unavailable"))
    }
}

/// Ready-made dependency bundles for tests.
pub struct TestDependencies;

impl TestDependencies {
    /// Empty blocklist, classifier that allows everything, no toxicity.
    pub fn allowing() -> SafetyDeps {
        SafetyDeps::new(
            Arc::new(SnapshotBlocklist::empty()),
            Some(Arc::new(StaticClassifier { allowed: true })),
            None,
        )
    }

    /// Classifier that flags everything.
    pub fn classifier_rejecting() -> SafetyDeps {
        SafetyDeps::new(
            Arc::new(SnapshotBlocklist::empty()),
            Some(Arc::new(StaticClassifier { allowed: false })),
            None,
        )
    }

    /// Classifier outage.
    pub fn classifier_failing() -> SafetyDeps {
        SafetyDeps::new(
            Arc::new(SnapshotBlocklist::empty()),
            Some(Arc::new(FailingClassifier)),
            None,
        )
    }

    /// No classifier configured at all.
    pub fn classifier_missing() -> SafetyDeps {
        SafetyDeps::new(Arc::new(SnapshotBlocklist::empty()), None, None)
    }
}
