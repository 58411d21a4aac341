// Pulsewire - Content Safety Core
//
// Every user-submitted pulse passes through this crate before it is
// persisted: PII detection, local heuristic moderation against obfuscated
// abuse, a dynamic blocklist, and remote AI classification with a strict
// fail-closed contract. Content signatures for duplicate suppression of
// bot posts live here too, since they share the normalization primitives.
//
// The hosted store, HTTP layer and notification plumbing are external
// collaborators behind the kernel's Base* traits.

pub mod common;
pub mod config;
pub mod kernel;

pub use config::*;

/// Initialize tracing with env-filter support (call once early in the
/// host binary).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
