use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review::SecurityReview;
use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub provider: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub version: String,
    #[serde(default)]
    pub license: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub release_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_review: Option<SecurityReview>,
}

impl Version {
    pub fn vulnerability_count(&self) -> usize {
        self.security_review
            .as_ref()
            .map(|r| r.vulnerabilities.len())
            .unwrap_or(0)
    }

    pub fn weekly_downloads(&self) -> u64 {
        self.security_review
            .as_ref()
            .map(|r| r.weekly_downloads)
            .unwrap_or(0)
    }
}

/// One package's metadata plus its ordered version history.
///
/// `versions[0]` is the latest release. The loader rejects records with an
/// empty version list, so [`latest_version`](Self::latest_version) is always
/// `Some` for records that came out of a [`Directory`](crate::Directory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    /// `owner/name` style identifier.
    pub identifier: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub is_official: bool,
    #[serde(default)]
    pub is_community: bool,
    #[serde(default)]
    pub is_hostable: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub first_release_date: DateTime<Utc>,
    pub repository: Repository,
    #[serde(default)]
    pub versions: Vec<Version>,
    /// When the record file was added to the directory, taken from its
    /// filename. Never read from the JSON body.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub file_added: Option<DateTime<Utc>>,
}

impl PackageRecord {
    /// Last `/` segment of the identifier.
    pub fn short_name(&self) -> &str {
        self.identifier.rsplit('/').next().unwrap_or(&self.identifier)
    }

    /// First `/` segment of the identifier.
    pub fn author(&self) -> &str {
        self.identifier.split('/').next().unwrap_or(&self.identifier)
    }

    /// When the package entered the directory, falling back to its first
    /// release when the filename carried no timestamp.
    pub fn added_at(&self) -> DateTime<Utc> {
        self.file_added.unwrap_or(self.first_release_date)
    }

    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.first()
    }

    pub fn version(&self, version: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Returns the requested version, or the latest one when `version` is
    /// `None` or not present in the history.
    pub fn select_version(&self, version: Option<&str>) -> Option<&Version> {
        version
            .and_then(|v| self.version(v))
            .or_else(|| self.latest_version())
    }

    pub fn is_latest(&self, version: &str) -> bool {
        self.latest_version()
            .map(|v| v.version == version)
            .unwrap_or(false)
    }
}
