//! Axum route handlers for the Match API.

use axum::{extract::State, http::StatusCode, Json};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::matching::cache::CacheStats;
use crate::matching::validation::{
    optional_str, parse_batch_job, parse_batch_jobs, parse_job_text, parse_profile,
};
use crate::models::match_result::MatchResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Ok { result: MatchResult },
    Error { error: String },
}

#[derive(Debug, Serialize)]
pub struct BatchItemResult {
    pub id: Value,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

#[derive(Debug, Serialize)]
pub struct BatchMatchResponse {
    pub results: Vec<BatchItemResult>,
    pub succeeded: usize,
    pub failed: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Scores one profile against one job text. Always answers with a result
/// once the request is valid; provider outages degrade to local matching.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MatchResult>, AppError> {
    let profile = parse_profile(&body)?;
    let job_text = parse_job_text(&body)?;
    let job_title = optional_str(&body, "job_title");

    let result = state.resolver.resolve(&profile, job_title, job_text).await;
    Ok(Json(result))
}

/// POST /api/v1/match/batch
///
/// Scores one profile against up to ten jobs concurrently. A job that fails
/// validation is reported inline and does not affect the others.
pub async fn handle_match_batch(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<BatchMatchResponse>, AppError> {
    let profile = parse_profile(&body)?;
    let jobs = parse_batch_jobs(&body)?;

    let resolver = &state.resolver;
    let profile = &profile;
    let results: Vec<BatchItemResult> = join_all(jobs.iter().enumerate().map(
        |(index, raw)| async move {
            match parse_batch_job(raw) {
                Ok(job) => {
                    let result = resolver.resolve(profile, &job.title, &job.text).await;
                    BatchItemResult {
                        id: job.id,
                        outcome: BatchOutcome::Ok { result },
                    }
                }
                Err(e) => BatchItemResult {
                    // Fall back to the position so the caller can still line results up.
                    id: raw
                        .get("id")
                        .cloned()
                        .filter(|id| !id.is_null())
                        .unwrap_or_else(|| Value::from(index)),
                    outcome: BatchOutcome::Error {
                        error: e.to_string(),
                    },
                },
            }
        },
    ))
    .await;

    let failed = results
        .iter()
        .filter(|r| matches!(r.outcome, BatchOutcome::Error { .. }))
        .count();
    let succeeded = results.len() - failed;
    info!("Batch match finished: {succeeded} succeeded, {failed} failed");

    Ok(Json(BatchMatchResponse {
        results,
        succeeded,
        failed,
    }))
}

/// GET /api/v1/cache/stats
pub async fn handle_cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.resolver.cache().stats())
}

/// DELETE /api/v1/cache
pub async fn handle_cache_clear(State(state): State<AppState>) -> StatusCode {
    state.resolver.cache().clear();
    info!("Match cache cleared");
    StatusCode::NO_CONTENT
}
