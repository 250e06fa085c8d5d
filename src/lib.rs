pub mod cache;
pub mod config;
pub mod listing;
pub mod markdown;
pub mod model;
pub mod output;
pub mod readme;
pub mod resolver;
pub mod score;

pub use cache::Cache;
pub use config::Config;
pub use markdown::{render_markdown, MarkdownRenderer};
pub use model::{PackageRecord, Scores, SecurityReview, Severity, Trend, Version, Vulnerability};
pub use resolver::{Directory, LoadError, MalformedPolicy, Snapshot};
