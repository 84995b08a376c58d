//! Axum route handlers for the Skills API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: Vec<String>,
    pub count: usize,
}

/// POST /api/v1/skills/extract
///
/// Lists the dictionary skills a text mentions, capped like match detection.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractSkillsRequest>,
) -> Json<ExtractSkillsResponse> {
    let skills = state.resolver.dictionary().detect(&request.text);
    Json(ExtractSkillsResponse {
        count: skills.len(),
        skills,
    })
}
