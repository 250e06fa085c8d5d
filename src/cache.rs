//! File-based caching for fetched README content.
//!
//! Each entry is a JSON file whose modification time drives expiry. Expired
//! entries are removed on read, so a README changed upstream shows up once
//! its entry ages out.
//!
//! # Cache Location
//!
//! - Linux: `~/.cache/mcp-directory/`
//! - macOS: `~/Library/Caches/mcp-directory/`
//! - Windows: `%LOCALAPPDATA%\mcp-directory\`
//!
//! # Example
//!
//! ```no_run
//! use mcp_directory::Cache;
//!
//! let cache = Cache::with_ttl_hours(1);
//! cache.set("readme_acme_weather", &"# Weather".to_string()).unwrap();
//!
//! let value: Option<String> = cache.get("readme_acme_weather");
//! assert_eq!(value.as_deref(), Some("# Weather"));
//! ```

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Default cache TTL in hours.
const CACHE_TTL_HOURS: u64 = 1;

/// Returns the platform cache directory for mcp-directory.
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mcp-directory")
}

/// A file-based cache with TTL support.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
    ttl: Duration,
}

impl Cache {
    /// Creates a cache in the platform cache directory with the default
    /// one-hour TTL.
    pub fn new() -> Self {
        Self::with_ttl_hours(CACHE_TTL_HOURS)
    }

    pub fn with_ttl_hours(hours: u64) -> Self {
        Self::in_dir(cache_dir(), hours)
    }

    /// Creates a cache rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>, ttl_hours: u64) -> Self {
        Self {
            dir: dir.into(),
            ttl: Duration::from_secs(ttl_hours * 3600),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("failed to create cache directory {:?}", self.dir))?;
        }
        Ok(())
    }

    /// Converts a cache key to a safe filename. Letters, digits and `-`
    /// are kept, `_` is doubled and any other byte becomes `_` plus two hex
    /// digits, so distinct keys never share a file.
    fn cache_path(&self, key: &str) -> PathBuf {
        let mut safe_key = String::with_capacity(key.len());
        for c in key.chars() {
            if c.is_ascii_alphanumeric() || c == '-' {
                safe_key.push(c);
            } else if c == '_' {
                safe_key.push_str("__");
            } else {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    safe_key.push_str(&format!("_{:02x}", byte));
                }
            }
        }
        self.dir.join(format!("{}.json", safe_key))
    }

    fn is_expired(&self, path: &Path) -> bool {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .map(|elapsed| elapsed > self.ttl)
            .unwrap_or(false)
    }

    /// Retrieves a value, or `None` if it is missing, expired or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.cache_path(key);

        if !path.exists() {
            return None;
        }

        if self.is_expired(&path) {
            debug!(key, "cache entry expired");
            let _ = fs::remove_file(&path);
            return None;
        }

        let content = fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Stores a value, creating the cache directory when needed.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let path = self.cache_path(key);
        let content = serde_json::to_string(value)?;
        fs::write(&path, content).with_context(|| format!("failed to write {:?}", path))?;
        Ok(())
    }

    /// Removes every cached entry and returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        if self.dir.exists() {
            for entry in fs::read_dir(&self.dir)?.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e == "json").unwrap_or(false)
                    && fs::remove_file(&path).is_ok()
                {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::in_dir(tmp.path(), 1);

        cache.set("readme_acme_weather", &"# Weather".to_string()).unwrap();
        let value: Option<String> = cache.get("readme_acme_weather");
        assert_eq!(value.as_deref(), Some("# Weather"));
    }

    #[test]
    fn test_missing_key() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::in_dir(tmp.path(), 1);
        assert!(cache.get::<String>("nope").is_none());
    }

    #[test]
    fn test_zero_ttl_expires() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::in_dir(tmp.path(), 0);

        cache.set("k", &"v".to_string()).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get::<String>("k").is_none());
        assert!(!tmp.path().join("k.json").exists());
    }

    #[test]
    fn test_unsafe_key_characters() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::in_dir(tmp.path(), 1);

        cache.set("../escape/attempt", &1u32).unwrap();
        assert!(tmp.path().join("_2e_2e_2fescape_2fattempt.json").exists());
        assert_eq!(cache.get::<u32>("../escape/attempt"), Some(1));
    }

    #[test]
    fn test_similar_keys_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::in_dir(tmp.path(), 1);

        cache.set("readme_acme_foo.js", &"dot".to_string()).unwrap();
        cache.set("readme_acme_foo_js", &"underscore".to_string()).unwrap();
        cache.set("readme_acme_foo_2ejs", &"literal".to_string()).unwrap();

        assert_eq!(cache.get::<String>("readme_acme_foo.js").as_deref(), Some("dot"));
        assert_eq!(cache.get::<String>("readme_acme_foo_js").as_deref(), Some("underscore"));
        assert_eq!(cache.get::<String>("readme_acme_foo_2ejs").as_deref(), Some("literal"));
    }

    #[test]
    fn test_clear_counts_entries() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::in_dir(tmp.path(), 1);
        cache.set("a", &1u32).unwrap();
        cache.set("b", &2u32).unwrap();
        fs::write(tmp.path().join("keep.txt"), "x").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(tmp.path().join("keep.txt").exists());
        assert!(cache.get::<u32>("a").is_none());
    }

    #[test]
    fn test_clear_missing_dir() {
        let cache = Cache::in_dir("/nonexistent/mcp-directory-cache", 1);
        assert_eq!(cache.clear().unwrap(), 0);
    }
}
