/// Analysis Client: the single point of entry for calls to the external
/// analysis provider.
///
/// The provider is an opaque JSON-over-HTTP service. Every call goes through
/// `analyze_with_retry`, which bounds attempts, backs off linearly between
/// them and caps each attempt with its own timeout. Failures never escape the
/// matching path: the resolver falls back to local matching instead.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::profile::Profile;

pub mod response;

pub use response::{normalize_response, RemoteAnalysis};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unusable response: {0}")]
    Parse(String),

    #[error("Gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Body sent to the provider.
#[derive(Debug, Serialize)]
pub struct AnalysisRequest<'a> {
    pub profile: &'a Profile,
    pub job: JobPayload<'a>,
}

#[derive(Debug, Serialize)]
pub struct JobPayload<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

/// One round trip to an analysis backend. Retry and timeout policy live in
/// [`analyze_with_retry`], not in implementations.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<Value, RemoteError>;
}

/// Provider reached over HTTP: a single `POST` of [`AnalysisRequest`].
#[derive(Clone)]
pub struct HttpAnalysisProvider {
    client: Client,
    url: String,
}

impl HttpAnalysisProvider {
    pub fn new(url: String, timeout: Duration) -> Result<Self, RemoteError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
        })
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalysisProvider {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<Value, RemoteError> {
        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Attempt budget for one resolution.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, first call included.
    pub max_attempts: u32,
    /// Wait before attempt `n` (0-based) is `backoff * n`.
    pub backoff: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
            attempt_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Calls the provider until it yields a usable analysis or the attempt budget
/// runs out. Transport errors, non-2xx statuses, timeouts and unparseable
/// bodies all count as failed attempts.
pub async fn analyze_with_retry(
    provider: &dyn AnalysisProvider,
    request: &AnalysisRequest<'_>,
    policy: &RetryPolicy,
) -> Result<RemoteAnalysis, RemoteError> {
    let mut last_error: Option<RemoteError> = None;

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            // Linear backoff: 1s, 2s, ...
            let delay = policy.backoff * attempt;
            debug!(
                "Retrying analysis provider in {}ms (attempt {} of {})",
                delay.as_millis(),
                attempt + 1,
                policy.max_attempts
            );
            tokio::time::sleep(delay).await;
        }

        let outcome = match tokio::time::timeout(policy.attempt_timeout, provider.analyze(request))
            .await
        {
            Ok(result) => result.and_then(|body| normalize_response(&body)),
            Err(_) => Err(RemoteError::Timeout(policy.attempt_timeout)),
        };

        match outcome {
            Ok(analysis) => {
                debug!(
                    "Analysis provider succeeded on attempt {}: score={}",
                    attempt + 1,
                    analysis.score
                );
                return Ok(analysis);
            }
            Err(e) => {
                warn!(
                    "Analysis attempt {} of {} failed: {e}",
                    attempt + 1,
                    policy.max_attempts
                );
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(RemoteError::Exhausted {
        attempts: policy.max_attempts,
    }))
}

/// Scripted providers for tests.
#[cfg(test)]
pub(crate) mod fake {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;

    use super::{AnalysisProvider, AnalysisRequest, RemoteError};

    pub(crate) enum Step {
        Respond(Value),
        Fail(u16),
        Hang(Duration),
    }

    /// Replays `steps` in order; once exhausted, every call fails with 503.
    pub(crate) struct ScriptedProvider {
        steps: Mutex<VecDeque<Step>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub(crate) fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn always_failing() -> Self {
            Self::new(vec![])
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisProvider for ScriptedProvider {
        async fn analyze(&self, _request: &AnalysisRequest<'_>) -> Result<Value, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.steps.lock().pop_front();
            let status = match step {
                Some(Step::Respond(body)) => return Ok(body),
                Some(Step::Hang(d)) => {
                    tokio::time::sleep(d).await;
                    return Ok(Value::Null);
                }
                Some(Step::Fail(status)) => status,
                None => 503,
            };
            Err(RemoteError::Api {
                status,
                message: "scripted failure".to_string(),
            })
        }
    }
}
