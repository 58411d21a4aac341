//! Safety pipeline dependencies (using traits for testability)
//!
//! Central container for the external collaborators the pipeline talks
//! to. All of them sit behind trait abstractions so tests can swap in
//! doubles without any network or database.

use std::sync::Arc;

use crate::kernel::traits::{BaseBlocklist, BaseContentClassifier, BaseToxicityScorer};

/// External collaborators injected into the pipeline.
///
/// `classifier` and `toxicity_scorer` are optional because not every
/// environment configures them. An unconfigured classifier is still a
/// service rejection at check time, never a pass.
#[derive(Clone)]
pub struct SafetyDeps {
    pub blocklist: Arc<dyn BaseBlocklist>,
    pub classifier: Option<Arc<dyn BaseContentClassifier>>,
    pub toxicity_scorer: Option<Arc<dyn BaseToxicityScorer>>,
}

impl SafetyDeps {
    pub fn new(
        blocklist: Arc<dyn BaseBlocklist>,
        classifier: Option<Arc<dyn BaseContentClassifier>>,
        toxicity_scorer: Option<Arc<dyn BaseToxicityScorer>>,
    ) -> Self {
        Self {
            blocklist,
            classifier,
            toxicity_scorer,
        }
    }
}
