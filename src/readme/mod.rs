//! README retrieval from GitHub.
//!
//! [`ReadmeFetcher::fetch`] walks the [`attempt_plan`] one request at a time
//! and returns the first body served with a success status. Every request is
//! bounded by the transport's timeout. Running out of attempts is a normal
//! outcome and yields `None`.
//!
//! Successful fetches are stored in the file [`Cache`] and served from there
//! until the entry expires.
//!
//! # Example
//!
//! ```no_run
//! use mcp_directory::{Config, readme::ReadmeFetcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = ReadmeFetcher::from_config(&Config::default())?;
//!     match fetcher.fetch("https://github.com/modelcontextprotocol/servers").await {
//!         Some(text) => println!("{} bytes of README", text.len()),
//!         None => println!("no README"),
//!     }
//!     Ok(())
//! }
//! ```

mod github;

pub use github::{
    attempt_plan, parse_github_url, Attempt, AttemptKind, GitHubRepo, BRANCHES, README_VARIANTS,
};

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::config::Config;

const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const USER_AGENT: &str = concat!("mcp-directory/", env!("CARGO_PKG_VERSION"));

/// Performs a single README request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the body for a success status and `None` for any other
    /// status. Network failures and timeouts are errors.
    async fn get(&self, attempt: &Attempt) -> Result<Option<String>>;
}

/// [`Transport`] backed by reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, token })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, attempt: &Attempt) -> Result<Option<String>> {
        let mut request = self.client.get(&attempt.url);

        if attempt.kind == AttemptKind::Api {
            request = request.header("Accept", RAW_MEDIA_TYPE);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            debug!(url = %attempt.url, status = %response.status(), "README attempt rejected");
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

pub struct ReadmeFetcher<T = HttpTransport> {
    transport: T,
    cache: Option<Cache>,
}

impl ReadmeFetcher<HttpTransport> {
    /// Builds a fetcher from the `[readme]` configuration section. The
    /// `GITHUB_TOKEN` environment variable overrides the configured token.
    pub fn from_config(config: &Config) -> Result<Self> {
        let readme = &config.readme;
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| readme.github_token.clone());

        let transport = HttpTransport::new(Duration::from_secs(readme.timeout_secs), token)?;
        let cache = readme
            .use_cache
            .then(|| Cache::with_ttl_hours(readme.cache_ttl_hours));

        Ok(Self { transport, cache })
    }
}

impl<T: Transport> ReadmeFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetches the README for a GitHub repository URL.
    ///
    /// Returns `None` for non-GitHub URLs and when every attempt fails.
    pub async fn fetch(&self, repository_url: &str) -> Option<String> {
        let repo = match parse_github_url(repository_url) {
            Some(repo) => repo,
            None => {
                warn!(url = repository_url, "not a GitHub repository URL");
                return None;
            }
        };

        let cache_key = repo.cache_key();
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get::<String>(&cache_key)) {
            debug!(%repo, "README served from cache");
            return Some(cached);
        }

        for attempt in attempt_plan(&repo) {
            match self.transport.get(&attempt).await {
                Ok(Some(body)) => {
                    debug!(%repo, url = %attempt.url, "README fetched");
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.set(&cache_key, &body) {
                            debug!(error = %e, "failed to cache README");
                        }
                    }
                    return Some(body);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(url = %attempt.url, error = %e, "README attempt failed");
                }
            }
        }

        warn!(%repo, "README not found");
        None
    }
}
