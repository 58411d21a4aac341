//! PII (Personally Identifiable Information) detection
//!
//! Every user-submitted pulse is scanned for contact information before it
//! reaches any other moderation layer. Detection is pure pattern matching
//! with no network calls, so it always runs, even when remote classifiers are
//! down.
//!
//! # Detection Methods
//!
//! - **Pattern-based**: structured PII (emails, phone numbers, SSNs, card
//!   numbers, street addresses) including obfuscated spellings
//! - **Context-gated**: number-shaped categories (phone, SSN, address) only
//!   fire next to a corroborating cue phrase, so scores, route numbers and
//!   step counts pass through
//! - **Checksum-gated**: card numbers must pass the Luhn check, no cue
//!   phrase required
//!
//! The finding's `reason_message` is one fixed generic sentence. It never
//! names the category that fired and never echoes the matched text.

pub mod detector;

pub use detector::{detect_pii, detect_pii_with_options, PiiCategory, PiiFinding, PiiOptions};
