//! Integration tests for the pipeline orchestrator's sequencing and
//! fail-closed policy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use safety_core::common::moderation::ReasonCode;
use safety_core::config::{Environment, SafetyConfig};
use safety_core::kernel::test_dependencies::{
    FailingBlocklist, FailingToxicityScorer, SlowClassifier, StaticClassifier,
    StaticToxicityScorer, TestDependencies,
};
use safety_core::kernel::{
    BaseContentClassifier, ClassifierVerdict, SafetyDeps, SafetyPipeline, SnapshotBlocklist,
};

/// Classifier that counts how often it gets called.
struct RecordingClassifier {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl BaseContentClassifier for RecordingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassifierVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ClassifierVerdict {
            allowed: true,
            categories: vec![],
        })
    }
}

fn pipeline(deps: SafetyDeps) -> SafetyPipeline {
    SafetyPipeline::new(deps, SafetyConfig::default())
}

#[tokio::test]
async fn clean_message_is_allowed() {
    let pipeline = pipeline(TestDependencies::allowing());
    let decision = pipeline.check_message("Sunny afternoon at the lake, trails are dry").await;

    assert!(decision.is_allowed());
    assert!(!decision.is_service_error());
    assert_eq!(decision.reason(), ReasonCode::Clean);
}

#[tokio::test]
async fn pii_blocks_before_the_classifier_is_called() {
    let calls = Arc::new(AtomicUsize::new(0));
    let deps = SafetyDeps::new(
        Arc::new(SnapshotBlocklist::empty()),
        Some(Arc::new(RecordingClassifier {
            calls: Arc::clone(&calls),
        })),
        None,
    );
    let pipeline = pipeline(deps);

    let decision = pipeline.check_message("email me at john@example.com").await;

    assert!(!decision.is_allowed());
    assert_eq!(decision.reason(), ReasonCode::PiiDetected);
    // PII never reaches the AI layer
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blocklisted_term_rejects_content() {
    let deps = SafetyDeps::new(
        Arc::new(SnapshotBlocklist::from_terms(["sideshow"])),
        Some(Arc::new(StaticClassifier { allowed: true })),
        None,
    );
    let pipeline = pipeline(deps);

    let decision = pipeline.check_message("another sideshow downtown tonight").await;

    assert!(!decision.is_allowed());
    assert!(!decision.is_service_error());
    assert_eq!(decision.reason(), ReasonCode::BlocklistedTerm);
}

#[tokio::test]
async fn blocklist_matches_leetspeak_variants() {
    let deps = SafetyDeps::new(
        Arc::new(SnapshotBlocklist::from_terms(["sideshow"])),
        Some(Arc::new(StaticClassifier { allowed: true })),
        None,
    );
    let pipeline = pipeline(deps);

    let decision = pipeline.check_message("another s1desh0w downtown").await;
    assert_eq!(decision.reason(), ReasonCode::BlocklistedTerm);
}

#[tokio::test]
async fn obfuscated_profanity_rejects_content() {
    let pipeline = pipeline(TestDependencies::allowing());
    let decision = pipeline.check_message("f4ck this place").await;

    assert!(!decision.is_allowed());
    assert!(!decision.is_service_error());
    assert_eq!(decision.reason(), ReasonCode::HeuristicMatch);
}

#[tokio::test]
async fn classifier_rejection_is_a_content_rejection() {
    let pipeline = pipeline(TestDependencies::classifier_rejecting());
    let decision = pipeline.check_message("borderline message").await;

    assert!(!decision.is_allowed());
    assert!(!decision.is_service_error());
    assert_eq!(decision.reason(), ReasonCode::ClassifierFlagged);
}

#[tokio::test]
async fn classifier_outage_fails_closed() {
    let pipeline = pipeline(TestDependencies::classifier_failing());
    let decision = pipeline.check_message("perfectly fine message").await;

    assert!(!decision.is_allowed());
    assert!(decision.is_service_error());
    assert_eq!(decision.reason(), ReasonCode::ServiceUnavailable);
}

#[tokio::test]
async fn missing_classifier_configuration_fails_closed() {
    let pipeline = pipeline(TestDependencies::classifier_missing());
    let decision = pipeline.check_message("perfectly fine message").await;

    assert!(!decision.is_allowed());
    assert!(decision.is_service_error());
}

#[tokio::test]
async fn classifier_timeout_fails_closed() {
    let deps = SafetyDeps::new(
        Arc::new(SnapshotBlocklist::empty()),
        Some(Arc::new(SlowClassifier {
            delay: Duration::from_secs(30),
        })),
        None,
    );
    let config = SafetyConfig {
        ai_timeout_ms: 50,
        ..Default::default()
    };
    let pipeline = SafetyPipeline::new(deps, config);

    let decision = pipeline.check_message("perfectly fine message").await;

    assert!(!decision.is_allowed());
    assert!(decision.is_service_error());
}

#[tokio::test]
async fn blocklist_store_outage_fails_closed() {
    let deps = SafetyDeps::new(
        Arc::new(FailingBlocklist),
        Some(Arc::new(StaticClassifier { allowed: true })),
        None,
    );
    let pipeline = pipeline(deps);

    let decision = pipeline.check_message("perfectly fine message").await;

    assert!(!decision.is_allowed());
    assert!(decision.is_service_error());
}

#[tokio::test]
async fn fail_open_override_skips_outages_outside_production() {
    let config = SafetyConfig {
        environment: Environment::Development,
        fail_open_requested: true,
        ..Default::default()
    };
    let pipeline = SafetyPipeline::new(TestDependencies::classifier_failing(), config);

    let decision = pipeline.check_message("perfectly fine message").await;
    assert!(decision.is_allowed());
}

#[tokio::test]
async fn fail_open_override_is_ignored_in_production() {
    let config = SafetyConfig {
        environment: Environment::Production,
        fail_open_requested: true,
        ..Default::default()
    };
    let pipeline = SafetyPipeline::new(TestDependencies::classifier_failing(), config);

    let decision = pipeline.check_message("perfectly fine message").await;

    assert!(!decision.is_allowed());
    assert!(decision.is_service_error());
}

#[tokio::test]
async fn fail_open_never_unblocks_content_rejections() {
    let config = SafetyConfig {
        environment: Environment::Development,
        fail_open_requested: true,
        ..Default::default()
    };
    let pipeline = SafetyPipeline::new(TestDependencies::classifier_failing(), config);

    let decision = pipeline.check_message("f4ck this place").await;
    assert!(!decision.is_allowed());
    assert_eq!(decision.reason(), ReasonCode::HeuristicMatch);
}

#[tokio::test]
async fn toxicity_score_over_threshold_rejects_content() {
    let deps = SafetyDeps::new(
        Arc::new(SnapshotBlocklist::empty()),
        Some(Arc::new(StaticClassifier { allowed: true })),
        Some(Arc::new(StaticToxicityScorer { score: 0.95 })),
    );
    let config = SafetyConfig {
        toxicity_enabled: true,
        ..Default::default()
    };
    let pipeline = SafetyPipeline::new(deps, config);

    let decision = pipeline.check_message("borderline message").await;

    assert!(!decision.is_allowed());
    assert!(!decision.is_service_error());
    assert_eq!(decision.reason(), ReasonCode::ToxicityFlagged);
}

#[tokio::test]
async fn low_toxicity_score_passes() {
    let deps = SafetyDeps::new(
        Arc::new(SnapshotBlocklist::empty()),
        Some(Arc::new(StaticClassifier { allowed: true })),
        Some(Arc::new(StaticToxicityScorer { score: 0.1 })),
    );
    let config = SafetyConfig {
        toxicity_enabled: true,
        ..Default::default()
    };
    let pipeline = SafetyPipeline::new(deps, config);

    assert!(pipeline.check_message("nice day out there").await.is_allowed());
}

#[tokio::test]
async fn toxicity_outage_fails_closed_when_enabled() {
    let deps = SafetyDeps::new(
        Arc::new(SnapshotBlocklist::empty()),
        Some(Arc::new(StaticClassifier { allowed: true })),
        Some(Arc::new(FailingToxicityScorer)),
    );
    let config = SafetyConfig {
        toxicity_enabled: true,
        ..Default::default()
    };
    let pipeline = SafetyPipeline::new(deps, config);

    let decision = pipeline.check_message("perfectly fine message").await;

    assert!(!decision.is_allowed());
    assert!(decision.is_service_error());
}

#[tokio::test]
async fn toxicity_success_cannot_override_classifier_rejection() {
    let deps = SafetyDeps::new(
        Arc::new(SnapshotBlocklist::empty()),
        Some(Arc::new(StaticClassifier { allowed: false })),
        Some(Arc::new(StaticToxicityScorer { score: 0.0 })),
    );
    let config = SafetyConfig {
        toxicity_enabled: true,
        ..Default::default()
    };
    let pipeline = SafetyPipeline::new(deps, config);

    let decision = pipeline.check_message("borderline message").await;
    assert_eq!(decision.reason(), ReasonCode::ClassifierFlagged);
}

#[tokio::test]
async fn empty_message_is_a_content_rejection() {
    let pipeline = pipeline(TestDependencies::allowing());
    let decision = pipeline.check_message("   ").await;

    assert!(!decision.is_allowed());
    assert!(!decision.is_service_error());
    assert_eq!(decision.reason(), ReasonCode::EmptyContent);
}

#[tokio::test]
async fn author_name_check_never_touches_the_network() {
    // Classifier is down; a name check must not care
    let pipeline = pipeline(TestDependencies::classifier_failing());

    assert!(pipeline.check_author_name("Lakeside Larry").is_allowed());
    assert!(!pipeline.check_author_name("a$$hole supreme").is_allowed());
}

#[tokio::test]
async fn service_rejections_always_deny() {
    // Invariant sweep over every dependency-failure shape
    let outcomes = [
        pipeline(TestDependencies::classifier_failing())
            .check_message("fine message")
            .await,
        pipeline(TestDependencies::classifier_missing())
            .check_message("fine message")
            .await,
        SafetyPipeline::new(
            SafetyDeps::new(
                Arc::new(FailingBlocklist),
                Some(Arc::new(StaticClassifier { allowed: true })),
                None,
            ),
            SafetyConfig::default(),
        )
        .check_message("fine message")
        .await,
    ];

    for decision in outcomes {
        assert!(decision.is_service_error());
        assert!(
            !decision.is_allowed(),
            "service error decision must never allow"
        );
    }
}

#[tokio::test]
async fn rejection_messages_are_generic_and_distinct_by_kind() {
    let content = pipeline(TestDependencies::allowing())
        .check_message("f4ck this place")
        .await;
    let service = pipeline(TestDependencies::classifier_failing())
        .check_message("fine message")
        .await;

    assert_ne!(content.user_message(), service.user_message());
    for message in [content.user_message(), service.user_message()] {
        let lower = message.to_lowercase();
        assert!(!lower.contains("f4ck"));
        assert!(!lower.contains("classifier"));
        assert!(!lower.contains("lexicon"));
    }
}
