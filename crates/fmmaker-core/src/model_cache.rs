//! Model list cache: one JSON file, one entry per provider.
//!
//! File format (`~/.fmmaker/model_cache.json`):
//! ```json
//! {
//!   "OpenAI": { "models": ["gpt-4", "gpt-4o"], "last_updated": "2024-05-01T10:00:00Z" }
//! }
//! ```
//!
//! Timestamps are written as RFC 3339 UTC; offset-less ISO 8601 values are
//! accepted on read and taken as local time.
//!
//! Entries expire once they are [`CACHE_EXPIRY_DAYS`] old. Expiry is checked
//! on read; stale entries stay on disk until the next write for that provider.
//! The whole file is read and rewritten on every access and assumes a single
//! writer process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// Age at which a cached model list is ignored.
pub const CACHE_EXPIRY_DAYS: i64 = 7;

/// Cached model list for one provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub models: Vec<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is still inside the expiry window at `now`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now - self.last_updated < Duration::days(CACHE_EXPIRY_DAYS)
    }
}

/// RFC 3339 timestamps, or offset-less ISO 8601 ones read as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(stamp.with_timezone(&Utc));
    }
    let naive: NaiveDateTime = raw.parse().map_err(de::Error::custom)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| de::Error::custom(format!("nonexistent local time: {raw}")))
}

type CacheFile = BTreeMap<String, CacheEntry>;

/// Handle to the on-disk model cache.
#[derive(Clone, Debug)]
pub struct ModelCache {
    path: PathBuf,
}

impl ModelCache {
    /// Create a cache backed by `path`, or `~/.fmmaker/model_cache.json` if `None`.
    ///
    /// Nothing is read or created until the first access.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(crate::utils::get_model_cache_path),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached models for `provider`, or `None` on a miss.
    pub fn get(&self, provider: &str) -> Option<Vec<String>> {
        self.get_at(provider, Utc::now())
    }

    /// Cached models for `provider` as seen at `now`.
    pub fn get_at(&self, provider: &str, now: DateTime<Utc>) -> Option<Vec<String>> {
        debug!(provider, "loading cached models");
        let cache = self.read()?;

        match cache.get(provider) {
            Some(entry) if entry.is_fresh_at(now) => {
                debug!(provider, models = entry.models.len(), "model cache hit");
                Some(entry.models.clone())
            }
            Some(entry) => {
                debug!(provider, last_updated = %entry.last_updated, "model cache entry expired");
                None
            }
            None => {
                debug!(provider, "no cached models");
                None
            }
        }
    }

    /// Full entry for `provider` regardless of age.
    pub fn entry(&self, provider: &str) -> Option<CacheEntry> {
        self.read()?.remove(provider)
    }

    /// Replace the cached models for `provider`, stamped with the current time.
    pub fn put(&self, provider: &str, models: &[String]) -> std::io::Result<()> {
        self.put_at(provider, models, Utc::now())
    }

    /// Replace the cached models for `provider`, stamped with `now`.
    ///
    /// Other providers' entries are preserved. A malformed file is replaced.
    pub fn put_at(&self, provider: &str, models: &[String], now: DateTime<Utc>) -> std::io::Result<()> {
        let mut cache = self.read().unwrap_or_default();
        cache.insert(
            provider.to_string(),
            CacheEntry {
                models: models.to_vec(),
                last_updated: now,
            },
        );

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&cache).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, json)?;
        debug!(provider, models = models.len(), path = %self.path.display(), "model cache updated");
        Ok(())
    }

    /// Read the whole file. Missing and malformed files both read as `None`.
    fn read(&self) -> Option<CacheFile> {
        if !self.path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read model cache");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed model cache");
                None
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache() -> (tempfile::TempDir, ModelCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(Some(dir.path().join("model_cache.json")));
        (dir, cache)
    }

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_file_is_miss() {
        let (_dir, cache) = temp_cache();
        assert_eq!(cache.get("OpenAI"), None);
        assert!(!cache.path().exists());
    }

    #[test]
    fn test_put_then_get_preserves_order() {
        let (_dir, cache) = temp_cache();
        let list = models(&["gpt-4o", "gpt-4", "gpt-3.5-turbo"]);
        cache.put("OpenAI", &list).unwrap();
        assert_eq!(cache.get("OpenAI"), Some(list));
    }

    #[test]
    fn test_put_keeps_other_providers() {
        let (_dir, cache) = temp_cache();
        cache.put("Anthropic", &models(&["claude-2.1"])).unwrap();
        cache.put("OpenAI", &models(&["gpt-4"])).unwrap();
        assert_eq!(cache.get("Anthropic"), Some(models(&["claude-2.1"])));
        assert_eq!(cache.get("OpenAI"), Some(models(&["gpt-4"])));
    }

    #[test]
    fn test_put_overwrites_entry() {
        let (_dir, cache) = temp_cache();
        cache.put("OpenAI", &models(&["gpt-4"])).unwrap();
        cache.put("OpenAI", &models(&["gpt-4o"])).unwrap();
        assert_eq!(cache.get("OpenAI"), Some(models(&["gpt-4o"])));
    }

    #[test]
    fn test_entry_expires_after_seven_days() {
        let (_dir, cache) = temp_cache();
        let written = Utc::now();
        cache.put_at("OpenAI", &models(&["gpt-4"]), written).unwrap();

        let almost = written + Duration::days(7) - Duration::seconds(1);
        assert!(cache.get_at("OpenAI", almost).is_some());

        let exactly = written + Duration::days(7);
        assert_eq!(cache.get_at("OpenAI", exactly), None);

        // Stale entries are not removed from disk
        assert!(cache.entry("OpenAI").is_some());
    }

    #[test]
    fn test_old_timestamp_in_file_is_miss() {
        let (_dir, cache) = temp_cache();
        std::fs::write(
            cache.path(),
            r#"{"Anthropic": {"models": ["claude-2.0"], "last_updated": "2020-01-01T00:00:00Z"}}"#,
        )
        .unwrap();
        assert_eq!(cache.get("Anthropic"), None);
    }

    #[test]
    fn test_offsetless_timestamp_is_local_time() {
        let (_dir, cache) = temp_cache();
        let written = Local::now().naive_local() - Duration::days(1);
        std::fs::write(
            cache.path(),
            format!(
                r#"{{"OpenAI": {{"models": ["gpt-4"], "last_updated": "{}"}}}}"#,
                written.format("%Y-%m-%dT%H:%M:%S%.6f")
            ),
        )
        .unwrap();
        assert_eq!(cache.get("OpenAI"), Some(models(&["gpt-4"])));

        std::fs::write(
            cache.path(),
            r#"{"OpenAI": {"models": ["gpt-4"], "last_updated": "2020-01-01T00:00:00"}}"#,
        )
        .unwrap();
        assert_eq!(cache.get("OpenAI"), None);
        assert!(cache.entry("OpenAI").is_some());
    }

    #[test]
    fn test_malformed_file_is_miss_for_every_provider() {
        let (_dir, cache) = temp_cache();
        std::fs::write(cache.path(), "{ not json").unwrap();
        assert_eq!(cache.get("Anthropic"), None);
        assert_eq!(cache.get("OpenAI"), None);
    }

    #[test]
    fn test_put_replaces_malformed_file() {
        let (_dir, cache) = temp_cache();
        std::fs::write(cache.path(), "[1, 2, 3]").unwrap();
        cache.put("OpenAI", &models(&["gpt-4"])).unwrap();
        assert_eq!(cache.get("OpenAI"), Some(models(&["gpt-4"])));
    }

    #[test]
    fn test_file_layout() {
        let (_dir, cache) = temp_cache();
        cache.put("OpenAI", &models(&["gpt-4"])).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(cache.path()).unwrap()).unwrap();
        assert_eq!(raw["OpenAI"]["models"][0], "gpt-4");
        let stamp = raw["OpenAI"]["last_updated"].as_str().unwrap();
        DateTime::parse_from_rfc3339(stamp).unwrap();
    }
}
