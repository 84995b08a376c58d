//! Skill Dictionary: the ordered vocabulary a job text is scanned against.

use std::collections::HashSet;

use crate::skills::canonical::{aliases_of, canonicalize, normalize};

/// Upper bound on detected skills per job text. Later dictionary entries are
/// the long tail and would only dilute the score.
pub const MAX_DETECTED: usize = 10;

/// Built-in vocabulary, grouped: programming, web, databases, cloud,
/// data science, devops. Order matters: it is the detection order.
const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "javascript",
    "java",
    "c++",
    "c#",
    "ruby",
    "go",
    "rust",
    "swift",
    "kotlin",
    "html",
    "css",
    "react",
    "angular",
    "vue",
    "node.js",
    "express",
    "django",
    "flask",
    "sql",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "oracle",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "pandas",
    "numpy",
    "scikit-learn",
    "tensorflow",
    "pytorch",
    "machine learning",
    "jenkins",
    "git",
    "ci/cd",
    "ansible",
    "prometheus",
    "grafana",
];

#[derive(Debug, Clone)]
struct DictionaryEntry {
    canonical: String,
    /// Lowercased spellings checked as whole tokens: the canonical form first,
    /// then every synonym that folds onto it.
    surfaces: Vec<String>,
    normalized: String,
}

/// Ordered, duplicate-free list of canonical skills.
#[derive(Debug, Clone)]
pub struct SkillDictionary {
    entries: Vec<DictionaryEntry>,
}

impl Default for SkillDictionary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied())
    }
}

impl SkillDictionary {
    /// Builds a dictionary from raw tokens. Tokens are canonicalized; blanks
    /// and repeats are dropped, keeping the first occurrence's position.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let entries = tokens
            .into_iter()
            .map(|t| canonicalize(t.as_ref()))
            .filter(|c| !c.is_empty() && seen.insert(c.clone()))
            .map(|canonical| {
                let surfaces = std::iter::once(canonical.clone())
                    .chain(aliases_of(&canonical).map(str::to_string))
                    .collect();
                DictionaryEntry {
                    normalized: normalize(&canonical),
                    surfaces,
                    canonical,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical skills in detection order.
    #[cfg(test)]
    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.canonical.as_str())
    }

    /// Returns the dictionary skills mentioned in `text`, in dictionary order,
    /// stopping after [`MAX_DETECTED`].
    ///
    /// An entry is detected when one of its spellings occurs as a whole token
    /// in the lowercased text, or when its alphanumeric-only form occurs
    /// anywhere in the alphanumeric-only text.
    pub fn detect(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let lowered = text.to_lowercase();
        let normalized_text = normalize(text);

        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .surfaces
                    .iter()
                    .any(|surface| contains_whole_token(&lowered, surface))
                    || (!entry.normalized.is_empty()
                        && normalized_text.contains(&entry.normalized))
            })
            .take(MAX_DETECTED)
            .map(|entry| entry.canonical.clone())
            .collect()
    }
}

/// True when `needle` occurs in `haystack` with no alphanumeric character
/// directly before or after it.
fn contains_whole_token(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
