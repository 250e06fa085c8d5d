//! Package record discovery and lookup.
//!
//! Records live in a flat directory, one JSON file per package. The
//! [`Directory`] re-reads that directory on every call, so it always reflects
//! what is on disk. A [`Snapshot`] loads everything once for a batch of
//! queries.
//!
//! A missing directory is "no data", never an error. What happens to a file
//! that cannot be read or parsed is decided by [`MalformedPolicy`].
//!
//! # Example
//!
//! ```no_run
//! use mcp_directory::{Directory, MalformedPolicy};
//!
//! let dir = Directory::new("mcps-data", MalformedPolicy::Abort);
//!
//! if let Some(record) = dir.find_by_name("github-mcp")? {
//!     println!("{} by {}", record.name, record.author());
//! }
//!
//! println!("{} packages", dir.list_all()?.len());
//! # Ok::<(), mcp_directory::resolver::LoadError>(())
//! ```

mod file_date;
mod matcher;

pub use file_date::parse_file_date;
pub use matcher::{normalize, NameQuery};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::model::PackageRecord;

/// Errors raised while loading a single record file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} has no versions")]
    NoVersions { path: PathBuf },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::NoVersions { path } => path,
        }
    }
}

/// What to do with a record file that cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole operation on the first bad file.
    #[default]
    Abort,
    /// Log the bad file and carry on without it.
    Skip,
}

/// Loads one record file and stamps it with the timestamp from its name.
pub fn load_record(path: &Path) -> Result<PackageRecord, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut record: PackageRecord =
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if record.versions.is_empty() {
        return Err(LoadError::NoVersions {
            path: path.to_path_buf(),
        });
    }

    record.file_added = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(parse_file_date);

    Ok(record)
}

fn walk_error(root: &Path, e: walkdir::Error) -> LoadError {
    let path = e.path().unwrap_or(root).to_path_buf();
    let source = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
    LoadError::Io { path, source }
}

/// A directory of record files, re-read on every query.
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
    policy: MalformedPolicy,
}

impl Directory {
    pub fn new(root: impl Into<PathBuf>, policy: MalformedPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    /// Paths of all `*.json` files, in directory enumeration order.
    ///
    /// Returns an empty list when the directory does not exist. Entries that
    /// cannot be read go through the malformed-file policy.
    pub fn record_paths(&self) -> Result<Vec<PathBuf>, LoadError> {
        if !self.root.is_dir() {
            debug!(dir = %self.root.display(), "records directory not found");
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let entries = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.tolerate(walk_error(&self.root, e))?;
                    continue;
                }
            };
            let path = entry.into_path();
            if path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    /// Loads a record, applying the malformed-file policy.
    ///
    /// `Ok(None)` means the file was skipped.
    fn load(&self, path: &Path) -> Result<Option<PackageRecord>, LoadError> {
        match load_record(path) {
            Ok(record) => Ok(Some(record)),
            Err(e) => self.tolerate(e).map(|()| None),
        }
    }

    fn tolerate(&self, e: LoadError) -> Result<(), LoadError> {
        match self.policy {
            MalformedPolicy::Abort => Err(e),
            MalformedPolicy::Skip => {
                warn!(path = %e.path().display(), error = %e, "skipping malformed record");
                Ok(())
            }
        }
    }

    /// Finds the first record matching `name`. See [`NameQuery::matches`].
    ///
    /// Files after the first match are not read.
    pub fn find_by_name(&self, name: &str) -> Result<Option<PackageRecord>, LoadError> {
        let query = NameQuery::new(name);

        for path in self.record_paths()? {
            if let Some(record) = self.load(&path)? {
                if query.matches(&record) {
                    debug!(query = name, path = %path.display(), "resolved package");
                    return Ok(Some(record));
                }
            }
        }

        debug!(query = name, "no package matched");
        Ok(None)
    }

    /// Loads every record, unfiltered, in directory enumeration order.
    pub fn list_all(&self) -> Result<Vec<PackageRecord>, LoadError> {
        let mut records = Vec::new();
        for path in self.record_paths()? {
            if let Some(record) = self.load(&path)? {
                records.push(record);
            }
        }
        debug!(dir = %self.root.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    /// Loads every record once into a [`Snapshot`].
    pub fn snapshot(&self) -> Result<Snapshot, LoadError> {
        Ok(Snapshot {
            records: self.list_all()?,
        })
    }
}

/// Records loaded once and queried from memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<PackageRecord>,
}

impl Snapshot {
    pub fn load(root: impl Into<PathBuf>, policy: MalformedPolicy) -> Result<Self, LoadError> {
        Directory::new(root, policy).snapshot()
    }

    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Same matching rules as [`Directory::find_by_name`].
    pub fn find_by_name(&self, name: &str) -> Option<&PackageRecord> {
        let query = NameQuery::new(name);
        self.records.iter().find(|record| query.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record_json(identifier: &str, name: &str) -> String {
        format!(
            r#"{{
                "identifier": "{identifier}",
                "name": "{name}",
                "description": "desc",
                "platform": "npm",
                "isOfficial": false,
                "isCommunity": true,
                "firstReleaseDate": "2024-01-01T00:00:00Z",
                "repository": {{ "provider": "github", "url": "https://github.com/{identifier}" }},
                "versions": [{{ "version": "1.0.0", "license": "MIT", "releaseDate": "2024-01-01" }}]
            }}"#
        )
    }

    fn write(dir: &TempDir, file: &str, content: &str) {
        fs::write(dir.path().join(file), content).unwrap();
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = Directory::new("/nonexistent/mcps-data", MalformedPolicy::Abort);
        assert!(dir.list_all().unwrap().is_empty());
        assert!(dir.find_by_name("anything").unwrap().is_none());
    }

    #[test]
    fn test_empty_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let dir = Directory::new(tmp.path(), MalformedPolicy::Abort);
        assert!(dir.list_all().unwrap().is_empty());
        assert!(dir.find_by_name("anything").unwrap().is_none());
    }

    #[test]
    fn test_find_by_name_separator_insensitive() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "a_2024-05-01T10-00-00.json", &record_json("acme/other", "My Package"));
        let dir = Directory::new(tmp.path(), MalformedPolicy::Abort);

        for q in ["My-Package", "mypackage", "MY_PACKAGE"] {
            let found = dir.find_by_name(q).unwrap();
            assert_eq!(found.map(|r| r.name), Some("My Package".to_string()), "query {q:?}");
        }
    }

    #[test]
    fn test_load_record_sets_file_added() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "pkg_2024-05-01T10-20-30.json", &record_json("acme/pkg", "Pkg"));
        write(&tmp, "undated.json", &record_json("acme/undated", "Undated"));

        let dated = load_record(&tmp.path().join("pkg_2024-05-01T10-20-30.json")).unwrap();
        assert_eq!(
            dated.file_added.unwrap().to_rfc3339(),
            "2024-05-01T10:20:30+00:00"
        );

        let undated = load_record(&tmp.path().join("undated.json")).unwrap();
        assert!(undated.file_added.is_none());
        assert_eq!(undated.added_at(), undated.first_release_date);
    }

    #[test]
    fn test_list_all_ignores_non_json_and_subdirectories() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "one.json", &record_json("acme/one", "One"));
        write(&tmp, "two.json", &record_json("acme/two", "Two"));
        write(&tmp, "notes.txt", "not a record");
        fs::create_dir(tmp.path().join("nested.json")).unwrap();

        let dir = Directory::new(tmp.path(), MalformedPolicy::Abort);
        assert_eq!(dir.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_list_all_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "one.json", &record_json("acme/one", "One"));
        write(&tmp, "two.json", &record_json("acme/two", "Two"));

        let dir = Directory::new(tmp.path(), MalformedPolicy::Abort);
        assert_eq!(dir.list_all().unwrap(), dir.list_all().unwrap());
    }

    #[test]
    fn test_list_all_reflects_new_files() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "one.json", &record_json("acme/one", "One"));
        let dir = Directory::new(tmp.path(), MalformedPolicy::Abort);
        assert_eq!(dir.list_all().unwrap().len(), 1);

        write(&tmp, "two.json", &record_json("acme/two", "Two"));
        assert_eq!(dir.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_abort_policy_fails_on_malformed() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "good.json", &record_json("acme/good", "Good"));
        write(&tmp, "bad.json", "{ not json");

        let dir = Directory::new(tmp.path(), MalformedPolicy::Abort);
        let err = dir.list_all().unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.path().ends_with("bad.json"));
    }

    #[test]
    fn test_skip_policy_drops_malformed() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "good.json", &record_json("acme/good", "Good"));
        write(&tmp, "bad.json", "{ not json");
        write(
            &tmp,
            "empty.json",
            &record_json("acme/empty", "Empty").replace(
                r#"[{ "version": "1.0.0", "license": "MIT", "releaseDate": "2024-01-01" }]"#,
                "[]",
            ),
        );

        let dir = Directory::new(tmp.path(), MalformedPolicy::Skip);
        let records = dir.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Good");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_follows_policy() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "good.json", &record_json("acme/good", "Good"));
        std::os::unix::fs::symlink(tmp.path().join("gone.json"), tmp.path().join("link.json"))
            .unwrap();

        let abort = Directory::new(tmp.path(), MalformedPolicy::Abort);
        let err = abort.list_all().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.path().ends_with("link.json"));
        assert!(abort.find_by_name("good").is_err());

        let skip = Directory::new(tmp.path(), MalformedPolicy::Skip);
        assert_eq!(skip.list_all().unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_record_is_loaded() {
        let tmp = TempDir::new().unwrap();
        let store = TempDir::new().unwrap();
        write(&store, "real.json", &record_json("acme/linked", "Linked"));
        std::os::unix::fs::symlink(store.path().join("real.json"), tmp.path().join("linked.json"))
            .unwrap();

        let dir = Directory::new(tmp.path(), MalformedPolicy::Abort);
        assert_eq!(dir.list_all().unwrap()[0].identifier, "acme/linked");
    }

    #[test]
    fn test_empty_versions_rejected() {
        let tmp = TempDir::new().unwrap();
        let json = record_json("acme/empty", "Empty").replace(
            r#"[{ "version": "1.0.0", "license": "MIT", "releaseDate": "2024-01-01" }]"#,
            "[]",
        );
        write(&tmp, "empty.json", &json);

        let err = load_record(&tmp.path().join("empty.json")).unwrap_err();
        assert!(matches!(err, LoadError::NoVersions { .. }));
    }

    #[test]
    fn test_snapshot_matches_directory() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "one.json", &record_json("acme/weather-mcp", "Weather"));
        write(&tmp, "two.json", &record_json("acme/github-mcp", "GitHub"));

        let dir = Directory::new(tmp.path(), MalformedPolicy::Abort);
        let snapshot = dir.snapshot().unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.find_by_name("Weather_MCP").cloned(),
            dir.find_by_name("Weather_MCP").unwrap()
        );
        assert!(snapshot.find_by_name("gitlab").is_none());
    }
}
