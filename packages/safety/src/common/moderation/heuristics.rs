//! The local heuristic moderation layer.
//!
//! Seven detection strategies run against every normalized view of the
//! input; any single hit blocks. All matching is pure computation against
//! the static lexicon.

use crate::common::moderation::decision::{ModerationDecision, ReasonCode};
use crate::common::moderation::edit_distance::within_edit_distance;
use crate::common::moderation::lexicon::{
    ABUSE_PHRASES, ABUSE_TOKENS, FUZZY_ALLOWLIST, FUZZY_TARGETS_FOLDED, HARASSMENT_SEQUENCES,
    HARASSMENT_TOKENS, LEXICON_FOLDED, LEXICON_H_STRIPPED, OBFUSCATION_PATTERNS,
    SOLICITATION_PHRASES, SOLICITATION_TOKENS_FOLDED, SUBSTRING_TERMS,
};
use crate::common::normalize::{fold_term, normalize, NormalizedView};

/// Run the local moderation layer over raw message text.
///
/// Malformed input (empty or whitespace-only) is a content rejection, not
/// a service failure. The decision's user message is generic; it never
/// reveals which strategy or term matched.
pub fn moderate(text: &str) -> ModerationDecision {
    if text.trim().is_empty() {
        return ModerationDecision::reject_content(ReasonCode::EmptyContent);
    }

    let lower = text.to_lowercase();

    // Structural obfuscation patterns run on the raw lowercased text so
    // separator junk is still visible (`f_u__c.k`, `a$$hole`).
    if OBFUSCATION_PATTERNS.iter().any(|p| p.is_match(&lower)) {
        return ModerationDecision::reject_content(ReasonCode::HeuristicMatch);
    }

    // Reverse-substitution variants of each raw token.
    if lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .any(substitution_variant_matches)
    {
        return ModerationDecision::reject_content(ReasonCode::HeuristicMatch);
    }

    for view in normalize(text) {
        if view_blocks(&view) {
            return ModerationDecision::reject_content(ReasonCode::HeuristicMatch);
        }
    }

    ModerationDecision::allow()
}

fn view_blocks(view: &NormalizedView) -> bool {
    matches_solicitation(view)
        || matches_abuse(view)
        || matches_harassment(view)
        || matches_lexicon(view)
        || matches_fuzzy(view)
}

/// Strip `h` for the h-insensitive token comparison used by solicitation
/// phrases (`hookup`/`ookup`, `hmu` spelling games).
fn strip_h(token: &str) -> String {
    token.chars().filter(|c| *c != 'h').collect()
}

/// Token-sequence containment, optionally h-insensitive.
fn contains_sequence(tokens: &[String], seq: &[&str], h_insensitive: bool) -> bool {
    if seq.is_empty() || tokens.len() < seq.len() {
        return false;
    }
    tokens.windows(seq.len()).any(|window| {
        window.iter().zip(seq.iter()).all(|(tok, want)| {
            if h_insensitive {
                strip_h(tok) == strip_h(want)
            } else {
                tok == want
            }
        })
    })
}

fn matches_solicitation(view: &NormalizedView) -> bool {
    if SOLICITATION_PHRASES
        .iter()
        .any(|seq| contains_sequence(&view.tokens, seq, true))
    {
        return true;
    }

    SOLICITATION_TOKENS_FOLDED.iter().any(|term| {
        view.tokens.iter().any(|t| t == term)
            || (term.len() >= 3 && view.alnum_only.contains(term.as_str()))
    })
}

fn matches_abuse(view: &NormalizedView) -> bool {
    for phrase in ABUSE_PHRASES {
        let seq: Vec<&str> = phrase.split_whitespace().collect();
        if contains_sequence(&view.tokens, &seq, false) {
            return true;
        }
        // the same phrase written as one glued word
        let glued: String = phrase.chars().filter(|c| !c.is_whitespace()).collect();
        if view.alnum_only.contains(&glued) {
            return true;
        }
    }
    view.tokens.iter().any(|t| ABUSE_TOKENS.contains(&t.as_str()))
}

fn matches_harassment(view: &NormalizedView) -> bool {
    HARASSMENT_SEQUENCES
        .iter()
        .any(|seq| contains_sequence(&view.tokens, seq, false))
        || view
            .tokens
            .iter()
            .any(|t| HARASSMENT_TOKENS.contains(&t.as_str()))
}

fn matches_lexicon(view: &NormalizedView) -> bool {
    // Word-boundary match against the folded lexicon
    if view.tokens.iter().any(|t| LEXICON_FOLDED.contains(t.as_str())) {
        return true;
    }

    // Substring match of long-enough terms against the concatenated form
    if SUBSTRING_TERMS
        .iter()
        .any(|term| view.alnum_only.contains(term.as_str()))
    {
        return true;
    }

    // Spaced-out single letters: rejoin runs of one-character tokens,
    // refold (the join can form a digraph), and look the result up
    // ("f u c k" -> "fuk")
    single_letter_runs(&view.tokens)
        .into_iter()
        .any(|joined| LEXICON_FOLDED.contains(fold_term(&joined).as_str()))
}

/// Joined maximal runs of single-character tokens, length 3+.
fn single_letter_runs(tokens: &[String]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut run_len = 0usize;

    for token in tokens {
        if token.chars().count() == 1 {
            current.push_str(token);
            run_len += 1;
        } else {
            if run_len >= 3 {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
            run_len = 0;
        }
    }
    if run_len >= 3 {
        runs.push(current);
    }
    runs
}

fn matches_fuzzy(view: &NormalizedView) -> bool {
    view.tokens.iter().any(|token| {
        if token.chars().count() < 3 || FUZZY_ALLOWLIST.contains(&token.as_str()) {
            return false;
        }
        let first = token.chars().next();
        FUZZY_TARGETS_FOLDED.iter().any(|(target, max)| {
            first == target.chars().next() && within_edit_distance(token, target, *max)
        })
    })
}

/// Deterministic reverse-substitution variants of one raw token: digit map
/// reversal plus digraph folds (shared with the normalizer), and `h`
/// stripping for tokens that contain an `h`.
fn substitution_variant_matches(token: &str) -> bool {
    let folded = fold_term(token);
    if LEXICON_FOLDED.contains(&folded) {
        return true;
    }
    if token.contains('h') {
        let h_stripped = folded.replace('h', "");
        if h_stripped.len() >= 3 && LEXICON_H_STRIPPED.contains(&h_stripped) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocked(text: &str) -> bool {
        !moderate(text).is_allowed()
    }

    #[test]
    fn test_clean_report_is_allowed() {
        for text in [
            "Traffic on 183 is terrible",
            "carpool lane is finally moving",
            "storm rolling in from the west, stay dry",
            "great turnout at the farmers market",
        ] {
            assert!(!blocked(text), "false positive on {text:?}");
        }
    }

    #[test]
    fn test_exact_profanity_blocks() {
        assert!(blocked("fuck this place"));
        assert!(blocked("what a load of shit"));
    }

    #[test]
    fn test_leetspeak_blocks() {
        assert!(blocked("f4ck this place"));
        assert!(blocked("sh1t show on the freeway"));
        assert!(blocked("b1tch"));
    }

    #[test]
    fn test_stretched_and_spaced_blocks() {
        assert!(blocked("fuuuuck"));
        assert!(blocked("f u c k this"));
        assert!(blocked("a$$hole driver"));
        assert!(blocked("f_u__c.k"));
    }

    #[test]
    fn test_zero_width_evasion_blocks() {
        assert!(blocked("fu\u{200B}ck this"));
    }

    #[test]
    fn test_homoglyph_evasion_blocks() {
        // Cyrillic а in place of a
        assert!(blocked("whаt an аsshole"));
    }

    #[test]
    fn test_harassment_sequences_block() {
        assert!(blocked("f off"));
        assert!(blocked("F. Off."));
        assert!(blocked("why don't you f off already"));
        assert!(blocked("go f yourself"));
        assert!(blocked("stfu"));
    }

    #[test]
    fn test_f_off_blocks_regardless_of_punctuation() {
        for text in ["f off", "f, off!", "(f) (off)", "f-off", "...f...off..."] {
            assert!(blocked(text), "missed {text:?}");
        }
    }

    #[test]
    fn test_abuse_phrases_block() {
        assert!(blocked("kill yourself"));
        assert!(blocked("k1ll yourself"));
        assert!(blocked("kill, yourself"));
        assert!(blocked("killyourself"));
        assert!(blocked("kys"));
        assert!(blocked("hope you die"));
    }

    #[test]
    fn test_solicitation_blocks() {
        assert!(blocked("anyone up for a hookup"));
        // h-insensitive: dropped h still matches
        assert!(blocked("anyone up for a ookup"));
        assert!(blocked("fwb"));
        assert!(blocked("f w b"));
        assert!(blocked("dtf tonight"));
    }

    #[test]
    fn test_fuzzy_match_blocks_near_misses() {
        assert!(blocked("fcuk"));
        assert!(blocked("azzhole"));
    }

    #[test]
    fn test_fuzzy_allowlist_spares_common_words() {
        for text in [
            "night shift crew earned it",
            "forgot my umbrella downtown",
            "the count is 42",
            "new shirt day",
        ] {
            assert!(!blocked(text), "false positive on {text:?}");
        }
    }

    #[test]
    fn test_h_stripped_variant_blocks() {
        assert!(blocked("bhitch"));
    }

    #[test]
    fn test_substring_catches_glued_terms() {
        assert!(blocked("youasshole"));
    }

    #[test]
    fn test_multilingual_terms_block() {
        assert!(blocked("hijo de puta"));
        assert!(blocked("quelle merde"));
    }

    #[test]
    fn test_empty_input_is_content_rejection() {
        let decision = moderate("   ");
        assert!(!decision.is_allowed());
        assert!(!decision.is_service_error());
        assert_eq!(decision.reason(), ReasonCode::EmptyContent);
    }

    #[test]
    fn test_decision_message_never_echoes_term() {
        let decision = moderate("fuck this");
        assert!(!decision.is_allowed());
        let lower = decision.user_message().to_lowercase();
        assert!(!lower.contains("fuck"));
        assert!(!lower.contains("lexicon"));
        assert!(!lower.contains("profanity"));
    }
}
