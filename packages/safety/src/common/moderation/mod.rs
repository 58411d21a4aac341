//! Local heuristic content moderation
//!
//! The first automated line of defense: pure, lexicon-driven detection of
//! profanity, harassment, threats and solicitation, run against every
//! normalized view of the input. No network calls, so this layer works even
//! when the remote classifiers are down.
//!
//! Any single positive signal blocks. There is no scoring or threshold:
//! this layer is deliberately conservative and errs toward over-blocking,
//! with the remote AI layer as the more context-aware second opinion for
//! whatever slips past it.

pub mod decision;
pub mod edit_distance;
pub mod heuristics;
pub mod lexicon;

pub use decision::{ModerationDecision, ReasonCode};
pub use edit_distance::within_edit_distance;
pub use heuristics::moderate;
