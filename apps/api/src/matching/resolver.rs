//! Match resolution pipeline: cache → analysis provider (with retry) → local
//! matcher, with the result written back to the cache.
//!
//! The provider is optional. When it is absent, fails every attempt, or
//! answers without finding a single skill, the local matcher fills in.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis_client::{
    analyze_with_retry, AnalysisProvider, AnalysisRequest, JobPayload, RemoteAnalysis, RetryPolicy,
};
use crate::matching::cache::{fingerprint, MatchCache};
use crate::matching::matcher::match_profile;
use crate::matching::suggestions::{build_insights, build_suggestions};
use crate::models::match_result::{MatchResult, MatchSource};
use crate::models::profile::Profile;
use crate::skills::dictionary::SkillDictionary;

#[derive(Clone)]
pub struct MatchResolver {
    cache: Arc<MatchCache>,
    provider: Option<Arc<dyn AnalysisProvider>>,
    dictionary: Arc<SkillDictionary>,
    retry: RetryPolicy,
}

impl MatchResolver {
    pub fn new(
        cache: Arc<MatchCache>,
        provider: Option<Arc<dyn AnalysisProvider>>,
        dictionary: Arc<SkillDictionary>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            cache,
            provider,
            dictionary,
            retry,
        }
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    pub fn dictionary(&self) -> &SkillDictionary {
        &self.dictionary
    }

    /// Resolves a match result for `profile` against one job posting.
    ///
    /// Never fails: provider errors are logged and absorbed by the local
    /// fallback. Cache hits are returned as stored, source included.
    pub async fn resolve(&self, profile: &Profile, job_title: &str, job_text: &str) -> MatchResult {
        let key = fingerprint(profile, job_text);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {key}");
            return cached;
        }

        let result = match &self.provider {
            Some(provider) => {
                let request = AnalysisRequest {
                    profile,
                    job: JobPayload {
                        title: job_title,
                        description: job_text,
                    },
                };
                match analyze_with_retry(provider.as_ref(), &request, &self.retry).await {
                    Ok(remote) => self.merge_remote(remote, profile, job_text),
                    Err(e) => {
                        warn!("Analysis provider unavailable, using local matcher: {e}");
                        self.local(profile, job_text)
                    }
                }
            }
            None => self.local(profile, job_text),
        };

        info!(
            "Resolved match: score={} detected={} source={:?}",
            result.score, result.total_detected, result.source
        );

        self.cache.put(key, result.clone());
        result
    }

    fn local(&self, profile: &Profile, job_text: &str) -> MatchResult {
        match_profile(profile, job_text, &self.dictionary)
    }

    /// Keeps a remote result that found any skill. A remote result with no
    /// matched or partial skills gets its skill buckets and score replaced by
    /// the local matcher's; its non-empty suggestions and insights survive.
    /// Experience and top matches always come from the local pass.
    fn merge_remote(
        &self,
        remote: RemoteAnalysis,
        profile: &Profile,
        job_text: &str,
    ) -> MatchResult {
        let local = self.local(profile, job_text);
        if !remote.is_degenerate() {
            return from_remote(remote, local);
        }

        debug!("Remote analysis reported no matching skills, recomputing locally");
        MatchResult {
            source: MatchSource::RemoteLocal,
            suggestions: non_empty_or(remote.suggestions, local.suggestions),
            insights: non_empty_or(remote.insights, local.insights),
            ..local
        }
    }
}

/// Remote skill buckets and score. Advice the provider left out is derived
/// from the remote buckets, like a local result's would be.
fn from_remote(remote: RemoteAnalysis, local: MatchResult) -> MatchResult {
    let matched_count = remote.matched.len() + remote.partial.len();
    let experience = local.experience;
    let suggestions = non_empty_or(
        remote.suggestions,
        build_suggestions(remote.score, &remote.missing, experience.as_ref()),
    );
    let insights = non_empty_or(
        remote.insights,
        build_insights(remote.score, &remote.partial, experience.as_ref()),
    );
    MatchResult {
        score: remote.score,
        matched_count,
        total_detected: matched_count + remote.missing.len(),
        matched: remote.matched,
        partial: remote.partial,
        missing: remote.missing,
        source: MatchSource::Remote,
        suggestions,
        insights,
        experience,
        top_matches: local.top_matches,
    }
}

fn non_empty_or(preferred: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}
