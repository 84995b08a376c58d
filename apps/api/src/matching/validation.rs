//! Request validation for the match endpoints.
//!
//! Bodies arrive as raw JSON so that "absent", "wrong type" and "too short"
//! each produce a precise message instead of a generic deserialization error.

use serde_json::Value;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::profile::Profile;

pub const MIN_JOB_TEXT_CHARS: usize = 20;
pub const MAX_BATCH_JOBS: usize = 10;

/// Why one job of a batch was skipped. Reported inline; never fails the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchItemError {
    #[error("job must be an object")]
    NotAnObject,

    #[error("job id is required")]
    MissingId,

    #[error("job text (or description) is required")]
    MissingText,

    #[error("job text must be at least {MIN_JOB_TEXT_CHARS} characters (got {0})")]
    TextTooShort(usize),
}

/// A batch entry that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub id: Value,
    pub title: String,
    pub text: String,
}

pub fn parse_profile(body: &Value) -> Result<Profile, AppError> {
    let raw = body
        .get("profile")
        .filter(|p| p.is_object())
        .ok_or_else(|| {
            AppError::Validation("profile is required and must be an object".to_string())
        })?;

    serde_json::from_value(raw.clone())
        .map_err(|e| AppError::Validation(format!("profile is malformed: {e}")))
}

/// `job_text` must be a string of at least [`MIN_JOB_TEXT_CHARS`] characters.
pub fn parse_job_text(body: &Value) -> Result<&str, AppError> {
    let text = body
        .get("job_text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::Validation("job_text is required and must be a string".to_string())
        })?;

    let len = text.chars().count();
    if len < MIN_JOB_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "job_text must be at least {MIN_JOB_TEXT_CHARS} characters (got {len})"
        )));
    }
    Ok(text)
}

pub fn optional_str<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Checks the `jobs` array itself: present, an array, at most [`MAX_BATCH_JOBS`].
pub fn parse_batch_jobs(body: &Value) -> Result<&Vec<Value>, AppError> {
    let jobs = body
        .get("jobs")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Validation("jobs is required and must be an array".to_string()))?;

    if jobs.len() > MAX_BATCH_JOBS {
        return Err(AppError::Validation(format!(
            "at most {MAX_BATCH_JOBS} jobs per batch (got {})",
            jobs.len()
        )));
    }
    Ok(jobs)
}

/// Validates one batch entry. `text` takes precedence over `description`.
pub fn parse_batch_job(job: &Value) -> Result<BatchJob, BatchItemError> {
    let object = job.as_object().ok_or(BatchItemError::NotAnObject)?;

    let id = object
        .get("id")
        .filter(|id| id.is_string() || id.is_number())
        .cloned()
        .ok_or(BatchItemError::MissingId)?;

    let text = object
        .get("text")
        .and_then(Value::as_str)
        .or_else(|| object.get("description").and_then(Value::as_str))
        .ok_or(BatchItemError::MissingText)?;

    let len = text.chars().count();
    if len < MIN_JOB_TEXT_CHARS {
        return Err(BatchItemError::TextTooShort(len));
    }

    Ok(BatchJob {
        id,
        title: object
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_must_be_object() {
        assert!(parse_profile(&json!({})).is_err());
        assert!(parse_profile(&json!({"profile": "Ada"})).is_err());
        assert!(parse_profile(&json!({"profile": null})).is_err());
        let profile = parse_profile(&json!({"profile": {"skills": ["Rust"]}})).unwrap();
        assert_eq!(profile.skills, vec!["Rust"]);
    }

    #[test]
    fn test_malformed_profile_fields_are_rejected() {
        let err = parse_profile(&json!({"profile": {"skills": "Rust"}})).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("malformed")));
    }

    #[test]
    fn test_job_text_rules() {
        assert!(parse_job_text(&json!({})).is_err());
        assert!(parse_job_text(&json!({"job_text": 42})).is_err());
        assert!(parse_job_text(&json!({"job_text": "too short"})).is_err());
        let text = "Senior Rust engineer, remote";
        assert_eq!(parse_job_text(&json!({"job_text": text})).unwrap(), text);
    }

    #[test]
    fn test_batch_cap() {
        let jobs: Vec<Value> = (0..11).map(|i| json!({"id": i})).collect();
        assert!(parse_batch_jobs(&json!({"jobs": jobs})).is_err());
        let jobs: Vec<Value> = (0..10).map(|i| json!({"id": i})).collect();
        assert_eq!(parse_batch_jobs(&json!({"jobs": jobs})).unwrap().len(), 10);
        assert!(parse_batch_jobs(&json!({"jobs": "none"})).is_err());
    }

    #[test]
    fn test_batch_job_prefers_text_over_description() {
        let job = parse_batch_job(&json!({
            "id": "a1",
            "title": "Data Engineer",
            "text": "Spark, Python and Airflow pipelines",
            "description": "ignored description text here"
        }))
        .unwrap();
        assert_eq!(job.id, json!("a1"));
        assert_eq!(job.title, "Data Engineer");
        assert_eq!(job.text, "Spark, Python and Airflow pipelines");
    }

    #[test]
    fn test_batch_job_errors() {
        assert_eq!(parse_batch_job(&json!(3)), Err(BatchItemError::NotAnObject));
        assert_eq!(
            parse_batch_job(&json!({"text": "long enough job text here"})),
            Err(BatchItemError::MissingId)
        );
        assert_eq!(
            parse_batch_job(&json!({"id": 1})),
            Err(BatchItemError::MissingText)
        );
        assert_eq!(
            parse_batch_job(&json!({"id": 1, "description": "short"})),
            Err(BatchItemError::TextTooShort(5))
        );
    }
}
