use serde::{Deserialize, Serialize};

/// Where a [`MatchResult`] was computed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchSource {
    #[default]
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "remote")]
    Remote,
    /// Remote answered but found no skills; skill buckets were recomputed locally.
    #[serde(rename = "remote+local")]
    RemoteLocal,
}

/// How the profile's summed experience compares with the years a job asks for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExperienceAnalysis {
    pub score: u32, // 0 – 100
    pub your_experience: f64,
    /// Zero when the job text states no requirement.
    pub required_experience: u32,
    pub sufficient: bool,
}

/// A profile skill named verbatim in the job text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TopMatch {
    pub skill: String,
    pub strength: String,
    pub reason: String,
}

/// Outcome of matching one profile against one job text.
///
/// `matched`, `partial` and `missing` are disjoint and together hold exactly
/// the detected skills, each in detection order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchResult {
    pub score: u32, // 0 – 100
    pub matched: Vec<String>,
    pub partial: Vec<String>,
    pub missing: Vec<String>,
    pub matched_count: usize,
    pub total_detected: usize,
    pub source: MatchSource,
    pub suggestions: Vec<String>,
    pub insights: Vec<String>,
    /// Computed locally for every source; `None` only on results built by callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceAnalysis>,
    pub top_matches: Vec<TopMatch>,
}
