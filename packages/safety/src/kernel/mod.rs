//! Kernel module - pipeline infrastructure and dependencies.

pub mod blocklist;
pub mod deps;
pub mod moderation_client;
pub mod pipeline;
pub mod test_dependencies;
pub mod toxicity_client;
pub mod traits;

/// Remote moderation model requested from the classifier endpoint.
pub const MODERATION_MODEL: &str = "omni-moderation-latest";

pub use blocklist::SnapshotBlocklist;
pub use deps::SafetyDeps;
pub use moderation_client::OpenAiModerationClient;
pub use pipeline::SafetyPipeline;
pub use test_dependencies::TestDependencies;
pub use toxicity_client::PerspectiveClient;
pub use traits::*;
