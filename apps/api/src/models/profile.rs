use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Candidate profile as extracted by the browser extension.
///
/// Read-only input: matching only derives a canonical skill set from it.
/// `experience` and `education` are forwarded untouched to the remote provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub about: String,
    pub skills: Vec<String>,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub location: String,
}
