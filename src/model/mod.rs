//! Core data types for package records and their security reviews.
//!
//! This module contains the fundamental types used throughout mcp-directory:
//!
//! - [`PackageRecord`] - One package's metadata plus its version history
//! - [`Version`] - A released version of a package
//! - [`SecurityReview`] - Scores, vulnerabilities and download trend for a version
//! - [`Vulnerability`] - A finding inside a security review
//!
//! Records are read from JSON files whose keys are camelCase:
//!
//! ```
//! use mcp_directory::PackageRecord;
//!
//! let json = r#"{
//!     "identifier": "acme/weather-mcp",
//!     "name": "Weather MCP",
//!     "firstReleaseDate": "2024-05-01T00:00:00Z",
//!     "repository": { "provider": "github", "url": "https://github.com/acme/weather-mcp" },
//!     "versions": [{ "version": "1.0.0", "license": "MIT", "releaseDate": "2024-05-01" }]
//! }"#;
//!
//! let record: PackageRecord = serde_json::from_str(json).unwrap();
//! assert_eq!(record.short_name(), "weather-mcp");
//! assert_eq!(record.latest_version().unwrap().version, "1.0.0");
//! ```

mod record;
mod review;
pub(crate) mod timestamp;

pub use record::*;
pub use review::*;
