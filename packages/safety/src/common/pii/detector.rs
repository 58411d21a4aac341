use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Category of PII that was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiiCategory {
    Email,
    Phone,
    Ssn,
    CreditCard,
    Address,
    SocialHandle,
    ContactPhrase,
    SelfIdentification,
    Spam,
}

/// Result of a PII scan.
///
/// `categories` is a set because one message can trigger several rules at
/// once. The set is for logging and metrics only; `reason_message` is the
/// only string a caller may surface, and it is always the same generic
/// sentence regardless of what fired.
#[derive(Debug, Clone)]
pub struct PiiFinding {
    pub blocked: bool,
    pub categories: HashSet<PiiCategory>,
    pub reason_message: String,
}

/// Per-deployment toggles for the optional categories.
#[derive(Debug, Clone, Copy)]
pub struct PiiOptions {
    pub block_social_handles: bool,
    pub block_self_identification: bool,
}

impl Default for PiiOptions {
    fn default() -> Self {
        Self {
            block_social_handles: true,
            block_self_identification: true,
        }
    }
}

/// The one sentence callers may show the user. Never varies by category.
const PII_REASON_MESSAGE: &str =
    "This message can't be posted because it may contain personal or contact information.";

lazy_static! {
    // Email - standard address syntax
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}"
    ).unwrap();

    // Email - word-substituted separators: "john at gmail dot com",
    // "john (at) gmail (dot) com", "john at gmail.com". A literal dot is
    // only accepted tight (no spaces), so a sentence like "at noon. see
    // you" can't assemble an address out of ordinary prose.
    static ref WORDED_EMAIL_REGEX: Regex = Regex::new(
        r"\b[a-z0-9._%+-]+\s+(?:\(\s*at\s*\)|at)\s+[a-z0-9-]+(?:(?:\s+(?:\(\s*dot\s*\)|dot)\s+|\.)[a-z0-9-]+)*(?:\s+(?:\(\s*dot\s*\)|dot)\s+|\.)[a-z]{2,}\b"
    ).unwrap();

    // Email - parenthesized separators with all whitespace removed
    static ref SQUEEZED_EMAIL_REGEX: Regex = Regex::new(
        r"[a-z0-9._%+-]+(?:@|\(at\))[a-z0-9-]+(?:(?:\.|\(dot\))[a-z0-9-]+)+"
    ).unwrap();

    // Digit runs with phone-style separators (7-11 digits total, checked
    // after stripping separators)
    static ref DIGIT_RUN_REGEX: Regex = Regex::new(
        r"\+?\d[\d\s().-]{4,24}\d"
    ).unwrap();

    // Cue words that turn a digit run into a phone number
    static ref PHONE_CUE_REGEX: Regex = Regex::new(
        r"\b(?:call|text|txt|phone|number|whatsapp|dial)\b|#"
    ).unwrap();

    // Cue phrases that turn a 9-digit run into an SSN
    static ref SSN_CUE_REGEX: Regex = Regex::new(
        r"\bssn\b|\bsocial\s+security\b|\bsocial\s+is\b"
    ).unwrap();

    // Card-shaped digit runs (13-19 digits, optional spacing/dashes);
    // Luhn-gated afterwards
    static ref CARD_REGEX: Regex = Regex::new(
        r"\b\d(?:[\s-]?\d){12,18}\b"
    ).unwrap();

    // Short numeric-plus-road-token pattern ("183 N hwy", "402 Oak street")
    static ref ROAD_REGEX: Regex = Regex::new(
        r"\b\d{1,5}\s+(?:[nsew]\.?\s+)?(?:[a-z]+\s+)?(?:st|street|ave|avenue|rd|road|hwy|highway|blvd|boulevard|dr|drive|ln|lane|ct|court|way|pkwy|parkway)\b"
    ).unwrap();

    // Residence-context phrases that gate the address category
    static ref ADDRESS_CUE_REGEX: Regex = Regex::new(
        r"\baddress is\b|\bi live at\b|\bcome to\b|\bmy apartment\b|\bmy house\b|\bmy place is\b"
    ).unwrap();

    // "@handle" forms, tolerating one space after the @
    static ref HANDLE_REGEX: Regex = Regex::new(
        r"(?:^|[\s:;,(])@ ?[a-z0-9_.]{2,}"
    ).unwrap();

    // Platform-prefixed handles: "instagram: joe_94", "snap - joe94"
    static ref PLATFORM_HANDLE_REGEX: Regex = Regex::new(
        r"\b(?:instagram|insta|ig|snap|snapchat|telegram|tiktok|twitter|signal|discord)\s*[:\-]\s*[a-z0-9_.]{2,}\b"
    ).unwrap();

    // Generic contact-solicitation phrases (part of the handle category)
    static ref SOLICIT_CONTACT_REGEX: Regex = Regex::new(
        r"\b(?:dm me|hit me up|hmu|pm me|reach out|message me)\b"
    ).unwrap();

    // Closed set of out-of-band contact intent phrases
    static ref CONTACT_PHRASE_REGEX: Regex = Regex::new(
        r"\blet'?s talk\b|\bcall me at\b|\btext me at\b|\bmy email is\b|\bdirect message me\b"
    ).unwrap();

    // "my name is First Last" (case of the name matters, lead-in doesn't)
    static ref NAME_REGEX: Regex = Regex::new(
        r"(?:(?i)\bmy name is)\s+[A-Z][a-z]+\s+[A-Z][a-z]+"
    ).unwrap();

    // "I am <Name> reporting"
    static ref REPORTER_NAME_REGEX: Regex = Regex::new(
        r"\bI am\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?\s+(?:(?i)reporting)\b"
    ).unwrap();
}

/// Degenerate filler tokens treated as spam when they are the whole message.
const NONSENSE_TOKENS: &[&str] = &[
    "asdf",
    "asdfasdf",
    "qwerty",
    "qwertyuiop",
    "zxcvbnm",
    "lorem",
    "ipsum",
    "testtesttest",
    "blahblah",
];

/// Scan text for PII with default options (all categories enabled).
pub fn detect_pii(text: &str) -> PiiFinding {
    detect_pii_with_options(text, &PiiOptions::default())
}

/// Scan text for PII.
///
/// Categories compute independently; the finding blocks when any category
/// fires. Context-gated categories (phone, SSN, address) need both the
/// shape match and a cue phrase somewhere in the message.
pub fn detect_pii_with_options(text: &str, options: &PiiOptions) -> PiiFinding {
    let mut categories = HashSet::new();

    let lower = text.to_lowercase();
    let squeezed: String = lower.chars().filter(|c| !c.is_whitespace()).collect();

    // Email: standard, worded/parenthesized separators, spaced-out letters
    if EMAIL_REGEX.is_match(&lower)
        || EMAIL_REGEX.is_match(&squeezed)
        || WORDED_EMAIL_REGEX.is_match(&lower)
        || SQUEEZED_EMAIL_REGEX.is_match(&squeezed)
    {
        categories.insert(PiiCategory::Email);
    }

    // Phone and SSN: digit runs flagged only next to their cue phrases.
    // A bare digit run (bus number, score, step count) must pass.
    let has_phone_cue = PHONE_CUE_REGEX.is_match(&lower);
    let has_ssn_cue = SSN_CUE_REGEX.is_match(&lower);
    if has_phone_cue || has_ssn_cue {
        for mat in DIGIT_RUN_REGEX.find_iter(&lower) {
            let digits = mat.as_str().chars().filter(|c| c.is_ascii_digit()).count();
            if has_phone_cue && (7..=11).contains(&digits) {
                categories.insert(PiiCategory::Phone);
            }
            if has_ssn_cue && digits == 9 {
                categories.insert(PiiCategory::Ssn);
            }
        }
    }

    // Card numbers: Luhn-gated, no cue phrase required
    for mat in CARD_REGEX.find_iter(&lower) {
        let card_num: String = mat
            .as_str()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if is_valid_luhn(&card_num) {
            categories.insert(PiiCategory::CreditCard);
        }
    }

    // Street addresses: gated on residence context so traffic reports
    // naming a highway stay postable
    if ADDRESS_CUE_REGEX.is_match(&lower) && ROAD_REGEX.is_match(&lower) {
        categories.insert(PiiCategory::Address);
    }

    if options.block_social_handles
        && (HANDLE_REGEX.is_match(&lower)
            || PLATFORM_HANDLE_REGEX.is_match(&lower)
            || SOLICIT_CONTACT_REGEX.is_match(&lower))
    {
        categories.insert(PiiCategory::SocialHandle);
    }

    if CONTACT_PHRASE_REGEX.is_match(&lower) {
        categories.insert(PiiCategory::ContactPhrase);
    }

    if options.block_self_identification
        && (NAME_REGEX.is_match(text) || REPORTER_NAME_REGEX.is_match(text))
    {
        categories.insert(PiiCategory::SelfIdentification);
    }

    if is_spam_degenerate(text, &lower) {
        categories.insert(PiiCategory::Spam);
    }

    PiiFinding {
        blocked: !categories.is_empty(),
        categories,
        reason_message: PII_REASON_MESSAGE.to_string(),
    }
}

/// Degenerate inputs: punctuation- or emoji-only strings, one stretched
/// character, or a known filler token.
fn is_spam_degenerate(text: &str, lower: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    // No letters or digits at all: pure punctuation or pure emoji
    if trimmed.chars().all(|c| !c.is_alphanumeric()) {
        return true;
    }

    // A single repeated character run ("aaaaaaa")
    let alnum: Vec<char> = lower.chars().filter(|c| c.is_alphanumeric()).collect();
    if alnum.len() >= 3 {
        let first = alnum[0];
        if alnum.iter().all(|c| *c == first) {
            return true;
        }
    }

    let joined: String = alnum.into_iter().collect();
    NONSENSE_TOKENS.contains(&joined.as_str())
}

/// Luhn algorithm for card number validation
fn is_valid_luhn(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    checksum % 10 == 0
}
