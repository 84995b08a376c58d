//! Normalizes the analysis provider's loosely-shaped JSON into one struct.
//!
//! Providers answer either with a flat object or with the fields nested
//! under `analysis`. Field names vary between provider versions, so each
//! field is looked up through an alias list in priority order.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::analysis_client::RemoteError;
use crate::skills::canonical::canonicalize;

const SCORE_KEYS: &[&str] = &["overall_score", "matchScore", "match_score", "score"];
const MATCHED_KEYS: &[&str] = &["matched_skills", "matchedSkills", "exact_matches", "matched"];
const PARTIAL_KEYS: &[&str] = &[
    "partial_matches",
    "partialMatches",
    "partial_skills",
    "partial",
];
const MISSING_KEYS: &[&str] = &["missing_skills", "missingSkills", "missing"];
const SUGGESTION_KEYS: &[&str] = &["suggestions", "recommendations"];
const INSIGHT_KEYS: &[&str] = &["compatibility_insights", "insights"];

/// Known response envelopes.
#[derive(Debug)]
enum ProviderPayload<'a> {
    /// `{ "success": true, "analysis": { ... } }`
    Wrapped(&'a Map<String, Value>),
    /// Fields at the top level.
    Flat(&'a Map<String, Value>),
}

impl<'a> ProviderPayload<'a> {
    fn classify(value: &'a Value) -> Result<Self, RemoteError> {
        let object = value
            .as_object()
            .ok_or_else(|| RemoteError::Parse("response is not a JSON object".to_string()))?;

        if object.get("success").and_then(Value::as_bool) == Some(false) {
            let reason = object
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("provider reported failure");
            return Err(RemoteError::Parse(reason.to_string()));
        }

        match object.get("analysis").and_then(Value::as_object) {
            Some(inner) => Ok(Self::Wrapped(inner)),
            None => Ok(Self::Flat(object)),
        }
    }

    fn fields(self) -> &'a Map<String, Value> {
        match self {
            Self::Wrapped(fields) | Self::Flat(fields) => fields,
        }
    }
}

/// Provider analysis after alias resolution and skill canonicalization.
///
/// Skill buckets are made disjoint with precedence matched > partial > missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteAnalysis {
    pub score: u32,
    pub matched: Vec<String>,
    pub partial: Vec<String>,
    pub missing: Vec<String>,
    pub suggestions: Vec<String>,
    pub insights: Vec<String>,
}

impl RemoteAnalysis {
    /// No skill was reported as present, exactly or partially.
    pub fn is_degenerate(&self) -> bool {
        self.matched.is_empty() && self.partial.is_empty()
    }
}

pub fn normalize_response(value: &Value) -> Result<RemoteAnalysis, RemoteError> {
    let fields = ProviderPayload::classify(value)?.fields();

    let mut seen = HashSet::new();
    let matched = skill_list(fields, MATCHED_KEYS, &mut seen);
    let partial = skill_list(fields, PARTIAL_KEYS, &mut seen);
    let missing = skill_list(fields, MISSING_KEYS, &mut seen);

    Ok(RemoteAnalysis {
        score: score(fields),
        matched,
        partial,
        missing,
        suggestions: text_list(fields, SUGGESTION_KEYS),
        insights: text_list(fields, INSIGHT_KEYS),
    })
}

fn first_array<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_array))
}

/// First alias holding a usable score, rounded and clamped to 0–100. An alias
/// whose value does not parse is skipped. Zero when none is usable.
fn score(fields: &Map<String, Value>) -> u32 {
    SCORE_KEYS
        .iter()
        .find_map(|key| fields.get(*key).and_then(parse_score))
        .map_or(0, |s| s.round().clamp(0.0, 100.0) as u32)
}

/// A finite number, or a numeric string with an optional trailing `%`.
fn parse_score(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|s| s.is_finite())
}

/// Canonical skill names from the first alias holding an array. Entries may be
/// plain strings or objects carrying `skill` / `name`. Skills already claimed
/// by a higher-precedence bucket are skipped.
fn skill_list(
    fields: &Map<String, Value>,
    keys: &[&str],
    seen: &mut HashSet<String>,
) -> Vec<String> {
    let Some(items) = first_array(fields, keys) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj
                .get("skill")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str),
            _ => None,
        })
        .map(canonicalize)
        .filter(|skill| !skill.is_empty() && seen.insert(skill.clone()))
        .collect()
}

fn text_list(fields: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    first_array(fields, keys)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
