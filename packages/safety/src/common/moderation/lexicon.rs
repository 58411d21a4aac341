//! Static moderation lexicon.
//!
//! Loaded once per process and never mutated. Terms are stored in their
//! written form and folded through the same normalization as user input
//! (see [`crate::common::normalize::fold_term`]) so both sides of every
//! comparison go through one code path.
//!
//! The dynamically editable blocklist is NOT here; that lives behind
//! `BaseBlocklist` and is owned by the external store.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::normalize::fold_term;

/// Curated explicit-term list. Word-boundary matched against tokens;
/// entries whose folded form is 4+ characters are also substring matched
/// against the concatenated alphanumeric text.
pub const EXPLICIT_TERMS: &[&str] = &[
    "fuck",
    "fucking",
    "fucker",
    "motherfucker",
    "shit",
    "shithead",
    "bullshit",
    "bitch",
    "bitches",
    "asshole",
    "dumbass",
    "jackass",
    "cunt",
    "dick",
    "dickhead",
    "cock",
    "cocksucker",
    "pussy",
    "whore",
    "slut",
    "bastard",
    "prick",
    "twat",
    "wanker",
    "douchebag",
    "nigger",
    "nigga",
    "faggot",
    "retard",
    // common non-English variants seen in reports
    "puta",
    "pendejo",
    "mierda",
    "cabron",
    "gilipollas",
    "putain",
    "merde",
    "connard",
    "scheisse",
    "arschloch",
];

/// High-value targets for fuzzy (edit-distance) matching.
pub const FUZZY_TARGETS: &[&str] = &[
    "fuck",
    "shit",
    "bitch",
    "asshole",
    "cunt",
    "whore",
    "slut",
    "nigger",
    "faggot",
    "motherfucker",
];

/// Common words that sit within an edit of a fuzzy target. Checked before
/// the fuzzy pass so ordinary reports ("night shift", "forgot my keys")
/// don't get eaten by it. Starting list, tuned from report traffic.
pub const FUZZY_ALLOWLIST: &[&str] = &[
    "fun", "fur", "sit", "ship", "shot", "shut", "spit", "suit", "slit", "shift", "shirt", "slot",
    "batch", "botch", "butch", "birch", "cant", "cent", "count", "cut", "curt", "cult", "wore",
    "whose", "where", "forgot",
];

/// Targets matched by separator-tolerant structural patterns
/// (`f_u__c.k`, `a$$hole`).
pub const OBFUSCATION_TARGETS: &[&str] = &["fuck", "shit", "bitch", "asshole", "cunt"];

/// Multi-word solicitation phrases, compared token-by-token with the
/// h-insensitive fold.
pub const SOLICITATION_PHRASES: &[&[&str]] = &[
    &["anyone", "up", "for", "a", "hookup"],
    &["looking", "for", "a", "hookup"],
    &["wanna", "hook", "up"],
    &["down", "to", "hook", "up"],
    &["looking", "for", "fun", "tonight"],
    &["friends", "with", "benefits"],
    &["netflix", "and", "chill"],
];

/// Single-token solicitation matches, also searched inside the
/// concatenated alphanumeric text to catch spaced-out letters.
pub const SOLICITATION_TOKENS: &[&str] = &["fwb", "dtf", "hookup", "sext", "sexting", "onlyfans"];

/// Fixed threat / self-harm incitement phrases, matched against the
/// space-joined token stream.
pub const ABUSE_PHRASES: &[&str] = &[
    "kill yourself",
    "kill urself",
    "hope you die",
    "go die",
    "end your life",
    "neck yourself",
    "nobody would miss you",
];

/// Single-token abuse abbreviations.
pub const ABUSE_TOKENS: &[&str] = &["kys"];

/// Abbreviated harassment: short token sequences where the profane word
/// is reduced to an initial letter.
pub const HARASSMENT_SEQUENCES: &[&[&str]] = &[
    &["f", "off"],
    &["f", "you"],
    &["f", "u"],
    &["go", "f", "your"],
    &["go", "f", "yourself"],
    &["eff", "off"],
];

/// Single-token harassment abbreviations.
pub const HARASSMENT_TOKENS: &[&str] = &["stfu", "gtfo"];

/// Leet/symbol substitutes accepted in the structural obfuscation
/// patterns, per letter.
fn letter_class(c: char) -> String {
    match c {
        'a' => "[a@4]".to_string(),
        'b' => "[b8]".to_string(),
        'e' => "[e3]".to_string(),
        'g' => "[g9]".to_string(),
        'i' => "[i1!]".to_string(),
        'l' => "[l1]".to_string(),
        'o' => "[o0]".to_string(),
        's' => "[s5$z]".to_string(),
        't' => "[t7+]".to_string(),
        'u' => "[uv]".to_string(),
        _ => regex::escape(&c.to_string()),
    }
}

/// Build a pattern matching `word` with arbitrary non-alphanumeric junk
/// between its letters. Whitespace is excluded from the separator class so
/// adjacent innocent words ("bus hit") can't assemble a target; spaced-out
/// single letters are handled by the tokenizer's concatenated form instead.
fn obfuscation_pattern(word: &str) -> String {
    let classes: Vec<String> = word.chars().map(letter_class).collect();
    classes.join(r"[^a-z0-9\s]*")
}

lazy_static! {
    /// Explicit terms folded through input normalization.
    pub static ref LEXICON_FOLDED: HashSet<String> =
        EXPLICIT_TERMS.iter().map(|t| fold_term(t)).collect();

    /// Folded terms with every `h` removed, for substitution-variant
    /// comparison.
    pub static ref LEXICON_H_STRIPPED: HashSet<String> = EXPLICIT_TERMS
        .iter()
        .map(|t| fold_term(t).replace('h', ""))
        .filter(|t| t.len() >= 3)
        .collect();

    /// Folded terms eligible for substring matching (4+ chars folded, so
    /// short terms can't fire inside innocuous words).
    pub static ref SUBSTRING_TERMS: Vec<String> = EXPLICIT_TERMS
        .iter()
        .map(|t| fold_term(t))
        .filter(|t| t.len() >= 4)
        .collect();

    /// Fuzzy targets folded, paired with their allowed edit distance
    /// (1 below 6 folded chars, 2 from 6 up).
    pub static ref FUZZY_TARGETS_FOLDED: Vec<(String, usize)> = FUZZY_TARGETS
        .iter()
        .map(|t| {
            let folded = fold_term(t);
            let max = if folded.len() >= 6 { 2 } else { 1 };
            (folded, max)
        })
        .collect();

    /// Compiled separator-tolerant patterns, run on raw lowercased text.
    pub static ref OBFUSCATION_PATTERNS: Vec<Regex> = OBFUSCATION_TARGETS
        .iter()
        .map(|t| Regex::new(&obfuscation_pattern(t)).unwrap())
        .collect();

    /// Solicitation tokens folded.
    pub static ref SOLICITATION_TOKENS_FOLDED: Vec<String> =
        SOLICITATION_TOKENS.iter().map(|t| fold_term(t)).collect();
}
