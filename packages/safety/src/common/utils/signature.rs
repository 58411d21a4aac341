//! Content signatures for duplicate suppression.
//!
//! Background bots post synthesized pulses about the same events, roads
//! and storms over and over. A content signature is a coarse semantic
//! fingerprint, `"{category}:{subtype}:{entity}"`, that two near-
//! identical pulses share even when their wording differs, so the poster
//! can skip the repeat inside a sliding time window.
//!
//! Independent of the safety decision; shares the normalization
//! primitives. Exact duplicates are additionally caught with a SHA-256
//! hash of the canonicalized text.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Structured fields a bot already knows about the pulse it is about to
/// post. When present they beat free-text extraction.
#[derive(Debug, Clone, Default)]
pub struct StructuredContent {
    pub venue: Option<String>,
    pub title: Option<String>,
}

/// Truncation length for the fallback entity.
const FALLBACK_PREFIX_LEN: usize = 40;

lazy_static! {
    // "(Eras Tour)", "(21+)" and similar annotations
    static ref PARENTHETICAL_REGEX: Regex = Regex::new(r"\([^)]*\)").unwrap();

    // "at <Venue>" where the venue is a capitalized run
    static ref VENUE_REGEX: Regex = Regex::new(
        r"\bat\s+((?:[A-Z][A-Za-z0-9'&.-]*\s*)+)"
    ).unwrap();

    // road/highway token following on/at/near
    static ref ROAD_REGEX: Regex = Regex::new(
        r"(?i)\b(?:on|at|near)\s+(?:the\s+)?((?:i-?\d{1,3})|(?:(?:hwy|highway|route|rt)\s*\d{1,4})|(?:\d{1,4})|(?:[a-z]+\s+(?:st|street|ave|avenue|rd|road|blvd|pkwy)))\b"
    ).unwrap();
}

/// Squash an extracted entity into a stable key fragment.
fn normalize_entity(entity: &str) -> String {
    entity
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Derive the deterministic signature for one message.
///
/// Category-specific extraction first (venue or event name for events,
/// road token for traffic), falling back to a truncated alphanumeric
/// prefix of the message when nothing structured is found. Parenthetical
/// annotations are stripped before extraction so tour taglines and age
/// notes don't split otherwise-identical posts.
pub fn content_signature(
    category: &str,
    message: &str,
    structured: Option<&StructuredContent>,
) -> String {
    let stripped = PARENTHETICAL_REGEX.replace_all(message, " ");

    match category {
        "events" => {
            if let Some(venue) = structured
                .and_then(|s| s.venue.as_deref())
                .map(str::to_string)
                .or_else(|| {
                    VENUE_REGEX
                        .captures(&stripped)
                        .map(|c| c[1].trim().to_string())
                })
            {
                return format!("{}:venue:{}", category, normalize_entity(&venue));
            }
            if let Some(title) = structured.and_then(|s| s.title.as_deref()) {
                return format!("{}:title:{}", category, normalize_entity(title));
            }
            format!("{}:text:{}", category, fallback_entity(&stripped))
        }
        "traffic" => {
            if let Some(caps) = ROAD_REGEX.captures(&stripped) {
                return format!("{}:road:{}", category, normalize_entity(&caps[1]));
            }
            format!("{}:text:{}", category, fallback_entity(&stripped))
        }
        _ => format!("{}:text:{}", category, fallback_entity(&stripped)),
    }
}

/// Truncated alphanumeric prefix used when no structured entity exists.
fn fallback_entity(message: &str) -> String {
    normalize_entity(message)
        .chars()
        .take(FALLBACK_PREFIX_LEN)
        .collect()
}

/// Generate a content hash for exact-duplicate detection.
///
/// SHA-256 over lowercased text with punctuation dropped and whitespace
/// collapsed, so trivial reformatting doesn't defeat the check.
pub fn generate_content_hash(text: &str) -> String {
    let normalized = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sliding-window set of recently posted keys (signatures or content
/// hashes).
///
/// Entries live for the configured window and are pruned on every check.
/// Checking records the key, so candidates from the same batch collide
/// with each other as well as with the persisted recent set.
#[derive(Debug)]
pub struct RecentPostIndex {
    window: Duration,
    seen: HashMap<String, DateTime<Utc>>,
}

impl RecentPostIndex {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    /// Seed the index from the persisted recent-post set.
    pub fn preload<I: IntoIterator<Item = (String, DateTime<Utc>)>>(&mut self, entries: I) {
        self.seen.extend(entries);
    }

    /// True when `key` was seen inside the window. Fresh keys are
    /// recorded with `now`.
    pub fn check_and_record(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        self.prune(now);
        if self.seen.contains_key(key) {
            return true;
        }
        self.seen.insert(key.to_string(), now);
        false
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let window = self.window;
        self.seen.retain(|_, stamp| now - *stamp <= window);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
