//! In-memory, TTL-bound cache of match results keyed by content fingerprint.
//!
//! Expiry is lazy: a stale entry stays in the map until a lookup touches it,
//! but `get` and `stats` never report it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::match_result::MatchResult;
use crate::models::profile::Profile;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Characters of the serialized profile and of the job text that feed the
/// fingerprint. Inputs sharing this long a prefix share a cache slot.
pub const FINGERPRINT_PREFIX_CHARS: usize = 2000;

/// Time source for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: MatchResult,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub count: usize,
    pub approximate_size_bytes: usize,
}

pub struct MatchCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MatchCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    fn is_live(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        // A negative age (clock stepped backwards) counts as fresh.
        now.signed_duration_since(entry.created_at)
            .to_std()
            .map_or(true, |age| age < self.ttl)
    }

    pub fn get(&self, fingerprint: &str) -> Option<MatchResult> {
        let now = self.clock.now();
        {
            let entries = self.entries.read();
            match entries.get(fingerprint) {
                Some(entry) if self.is_live(entry, now) => return Some(entry.result.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Stale: drop it, unless a concurrent put has already refreshed the slot.
        let mut entries = self.entries.write();
        if entries
            .get(fingerprint)
            .is_some_and(|entry| !self.is_live(entry, now))
        {
            entries.remove(fingerprint);
            debug!("Evicted expired cache entry {fingerprint}");
        }
        None
    }

    /// Unconditional overwrite; restarts the entry's TTL.
    pub fn put(&self, fingerprint: String, result: MatchResult) {
        let entry = CacheEntry {
            result,
            created_at: self.clock.now(),
        };
        self.entries.write().insert(fingerprint, entry);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Live entry count and their approximate serialized size (key + JSON value).
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .iter()
            .filter(|(_, entry)| self.is_live(entry, now))
            .fold(
                CacheStats {
                    count: 0,
                    approximate_size_bytes: 0,
                },
                |acc, (key, entry)| CacheStats {
                    count: acc.count + 1,
                    approximate_size_bytes: acc.approximate_size_bytes
                        + key.len()
                        + serde_json::to_vec(&entry.result).map_or(0, |v| v.len()),
                },
            )
    }
}

/// Hex SHA-256 over bounded prefixes of the serialized profile and the job text.
pub fn fingerprint(profile: &Profile, job_text: &str) -> String {
    let profile_json = serde_json::to_string(profile).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(prefix(&profile_json, FINGERPRINT_PREFIX_CHARS).as_bytes());
    // Separator keeps ("ab", "c") and ("a", "bc") apart.
    hasher.update([0u8]);
    hasher.update(prefix(job_text, FINGERPRINT_PREFIX_CHARS).as_bytes());
    format!("{:x}", hasher.finalize())
}

fn prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_result::MatchSource;
    use parking_lot::Mutex;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc::now())))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock();
            *now += chrono::Duration::from_std(by).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock()
        }
    }

    fn sample_result(score: u32) -> MatchResult {
        MatchResult {
            score,
            matched: vec!["python".to_string()],
            missing: vec!["aws".to_string()],
            matched_count: 1,
            total_detected: 2,
            source: MatchSource::Remote,
            ..Default::default()
        }
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let cache = MatchCache::new(DEFAULT_TTL);
        cache.put("k".to_string(), sample_result(50));
        assert_eq!(cache.get("k"), Some(sample_result(50)));
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let clock = ManualClock::new();
        let cache = MatchCache::with_clock(DEFAULT_TTL, clock.clone());
        cache.put("k".to_string(), sample_result(50));

        clock.advance(Duration::from_secs(3599));
        assert!(cache.get("k").is_some());

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stats().count, 0);
    }

    #[test]
    fn test_put_overwrites_and_restarts_ttl() {
        let clock = ManualClock::new();
        let cache = MatchCache::with_clock(Duration::from_secs(10), clock.clone());
        cache.put("k".to_string(), sample_result(10));
        clock.advance(Duration::from_secs(8));
        cache.put("k".to_string(), sample_result(20));
        clock.advance(Duration::from_secs(8));
        assert_eq!(cache.get("k").map(|r| r.score), Some(20));
    }

    #[test]
    fn test_stats_ignore_expired_entries() {
        let clock = ManualClock::new();
        let cache = MatchCache::with_clock(Duration::from_secs(10), clock.clone());
        cache.put("old".to_string(), sample_result(10));
        clock.advance(Duration::from_secs(11));
        cache.put("new".to_string(), sample_result(20));

        let stats = cache.stats();
        assert_eq!(stats.count, 1);
        let expected = "new".len() + serde_json::to_vec(&sample_result(20)).unwrap().len();
        assert_eq!(stats.approximate_size_bytes, expected);
    }

    #[test]
    fn test_clear_empties_cache() {
        let cache = MatchCache::new(DEFAULT_TTL);
        cache.put("a".to_string(), sample_result(1));
        cache.put("b".to_string(), sample_result(2));
        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(
            cache.stats(),
            CacheStats {
                count: 0,
                approximate_size_bytes: 0
            }
        );
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let profile = Profile {
            skills: vec!["Python".to_string()],
            ..Default::default()
        };
        let a = fingerprint(&profile, "Python developer wanted");
        assert_eq!(a, fingerprint(&profile, "Python developer wanted"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, fingerprint(&profile, "Rust developer wanted"));

        let other = Profile {
            skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        assert_ne!(a, fingerprint(&other, "Python developer wanted"));
    }

    #[test]
    fn test_fingerprint_ignores_text_beyond_prefix() {
        let profile = Profile::default();
        let base = "x".repeat(FINGERPRINT_PREFIX_CHARS);
        assert_eq!(
            fingerprint(&profile, &format!("{base} tail one")),
            fingerprint(&profile, &format!("{base} tail two"))
        );
    }

    #[test]
    fn test_prefix_respects_char_boundaries() {
        assert_eq!(prefix("héllo", 2), "hé");
        assert_eq!(prefix("abc", 10), "abc");
    }
}
