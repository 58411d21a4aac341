//! Text normalization for safety checks.
//!
//! Canonicalizes raw user input into comparable forms before any pattern
//! matching runs. Defeats the common evasion tricks: diacritics, Cyrillic
//! and Greek lookalike characters, leetspeak, zero-width separators, and
//! character stretching.
//!
//! Normalization is pure and stateless. One input can produce *two* views
//! when the digit `1` appears, because `1` can stand for either `i` or `l`
//! and guessing wrong loses recall. Callers must check every view.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A canonicalized view of one input string.
///
/// `leet_resolved` keeps word boundaries; `alnum_only` drops everything
/// that is not a letter or digit so spaced-out or punctuated spellings
/// (`f u c k`, `a$$hole`) collapse into one searchable run; `tokens` is
/// `leet_resolved` split on non-alphanumeric boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedView {
    pub leet_resolved: String,
    pub alnum_only: String,
    pub tokens: Vec<String>,
}

/// Zero-width and format characters used to split words invisibly.
fn is_zero_width(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | // zero width space
        '\u{200C}' | // zero width non-joiner
        '\u{200D}' | // zero width joiner
        '\u{2060}' | // word joiner
        '\u{FEFF}' // zero width no-break space
    )
}

/// Fold characters from other scripts that render like Latin letters.
fn fold_homoglyph(c: char) -> char {
    match c {
        // Cyrillic lookalikes
        'а' => 'a',
        'в' => 'b',
        'е' => 'e',
        'к' => 'k',
        'м' => 'm',
        'о' => 'o',
        'р' => 'p',
        'с' => 'c',
        'т' => 't',
        'у' => 'y',
        'х' => 'x',
        'і' => 'i',
        'ј' => 'j',
        'ѕ' => 's',
        // Greek lookalikes
        'α' => 'a',
        'ε' => 'e',
        'ι' => 'i',
        'κ' => 'k',
        'ν' => 'v',
        'ο' => 'o',
        'ρ' => 'p',
        'τ' => 't',
        'υ' => 'u',
        _ => c,
    }
}

/// Single-character leetspeak substitutions. `1` is handled separately
/// because it is ambiguous between `i` and `l`.
fn fold_leet(c: char) -> char {
    match c {
        '0' => 'o',
        '3' => 'e',
        '4' => 'a',
        '5' => 's',
        '7' => 't',
        '8' => 'b',
        '9' => 'g',
        '@' => 'a',
        '$' => 's',
        _ => c,
    }
}

/// Digraph substitutions applied until no occurrence remains, so that a
/// second normalization pass is a no-op.
fn fold_digraphs(s: &str) -> String {
    const DIGRAPHS: [(&str, &str); 4] = [("ph", "f"), ("kn", "n"), ("ck", "k"), ("qu", "kw")];

    let mut out = s.to_string();
    loop {
        let mut changed = false;
        for (from, to) in DIGRAPHS {
            if out.contains(from) {
                out = out.replace(from, to);
                changed = true;
            }
        }
        if !changed {
            return out;
        }
    }
}

/// Collapse runs of 3+ identical characters down to one.
///
/// Defeats stretching (`fuuuck`) while keeping legitimate doubles
/// (`off`, `kiss`) intact.
fn collapse_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run_char: Option<char> = None;
    let mut run_len = 0usize;

    for c in s.chars() {
        if Some(c) == run_char {
            run_len += 1;
        } else {
            flush_run(&mut out, run_char, run_len);
            run_char = Some(c);
            run_len = 1;
        }
    }
    flush_run(&mut out, run_char, run_len);
    out
}

fn flush_run(out: &mut String, c: Option<char>, len: usize) {
    if let Some(c) = c {
        let emit = if len >= 3 { 1 } else { len };
        for _ in 0..emit {
            out.push(c);
        }
    }
}

fn build_view(folded: &str, one_as: char) -> NormalizedView {
    // Zero-width characters go first so an invisibly split digraph
    // ("fuc\u{200B}k") is whole again before folding sees it.
    let stripped: String = folded.chars().filter(|c| !is_zero_width(*c)).collect();

    let substituted: String = stripped
        .chars()
        .map(|c| if c == '1' { one_as } else { fold_leet(c) })
        .collect();

    let substituted = fold_digraphs(&substituted);
    let collapsed = collapse_runs(&substituted);

    // Concatenation can butt spaced letters into a digraph ("c k" -> "ck"),
    // so fold once more after dropping the separators.
    let alnum: String = collapsed.chars().filter(|c| c.is_alphanumeric()).collect();
    let alnum_only = fold_digraphs(&alnum);
    let tokens: Vec<String> = collapsed
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect();

    NormalizedView {
        leet_resolved: collapsed,
        alnum_only,
        tokens,
    }
}

/// Normalize raw input into one or two comparable views.
///
/// Two views are returned iff the input still contains the digit `1`
/// after homoglyph folding; the views differ only in whether `1` was
/// read as `i` or `l`. A verdict from either view stands.
pub fn normalize(raw: &str) -> Vec<NormalizedView> {
    // Decompose (compatibility form), drop combining diacritics, fold
    // script lookalikes, lowercase.
    let folded: String = raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .map(fold_homoglyph)
        .collect();

    if folded.contains('1') {
        vec![build_view(&folded, 'i'), build_view(&folded, 'l')]
    } else {
        vec![build_view(&folded, 'i')]
    }
}

/// Canonical single-term form used when loading lexicon and blocklist
/// entries, so stored terms compare through the same folding as input.
pub fn fold_term(term: &str) -> String {
    normalize(term)
        .into_iter()
        .next()
        .map(|v| v.alnum_only)
        .unwrap_or_default()
}
