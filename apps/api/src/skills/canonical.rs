//! Canonicalizer: folds raw skill tokens onto one spelling per skill.
//!
//! `canonicalize` is idempotent: every synonym target maps to itself, and
//! tokens outside the table only get trimmed and lowercased.

/// Surface spelling → canonical skill. Keys are already lowercased.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("c++", "cpp"),
    ("cpp", "cpp"),
    ("c#", "csharp"),
    ("csharp", "csharp"),
    ("node.js", "nodejs"),
    ("nodejs", "nodejs"),
    ("react.js", "react"),
    ("reactjs", "react"),
    ("express.js", "express"),
    ("expressjs", "express"),
    ("google cloud", "gcp"),
    ("gcp", "gcp"),
    ("machine learning", "machine learning"),
    ("ml", "machine learning"),
    ("natural language processing", "nlp"),
    ("nlp", "nlp"),
    ("js", "javascript"),
    ("ecmascript", "javascript"),
    ("es6", "javascript"),
    ("css3", "css"),
    ("html5", "html"),
];

/// Maps a raw skill token to its canonical form.
///
/// Returns an empty string for empty or annotation-only input; callers must
/// drop those rather than treat them as a skill.
pub fn canonicalize(raw: &str) -> String {
    let stripped = strip_parentheticals(raw);
    let folded = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    SYNONYMS
        .iter()
        .find(|(surface, _)| *surface == folded)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(folded)
}

/// Lowercased, alphanumeric-only form used for punctuation-insensitive comparison.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Surface spellings (other than the canonical form itself) that fold to `canonical`.
pub fn aliases_of(canonical: &str) -> impl Iterator<Item = &'static str> + '_ {
    SYNONYMS
        .iter()
        .filter(move |(surface, target)| *target == canonical && *surface != canonical)
        .map(|(surface, _)| *surface)
}

/// Removes every `( ... )` span, including unbalanced trailing ones.
fn strip_parentheticals(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
