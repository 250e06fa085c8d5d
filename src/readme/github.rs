/// Filenames tried, in order, for every lookup strategy.
pub const README_VARIANTS: [&str; 5] = ["README.md", "Readme.md", "readme.md", "README.MD", "README"];

/// Branches tried against raw.githubusercontent.com.
pub const BRANCHES: [&str; 2] = ["main", "master"];

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl GitHubRepo {
    pub fn cache_key(&self) -> String {
        format!("readme_{}_{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Extracts owner and repository from any URL containing
/// `github.com/<owner>/<repo>`. A trailing `.git` is dropped.
///
/// ```
/// use mcp_directory::readme::parse_github_url;
///
/// let repo = parse_github_url("https://github.com/acme/weather-mcp.git").unwrap();
/// assert_eq!(repo.owner, "acme");
/// assert_eq!(repo.repo, "weather-mcp");
/// assert!(parse_github_url("https://gitlab.com/acme/weather").is_none());
/// ```
pub fn parse_github_url(url: &str) -> Option<GitHubRepo> {
    let (_, path) = url.split_once("github.com/")?;
    let mut segments = path.split('/');

    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    // Query strings and fragments are not part of the repository name.
    let repo = repo.split(['?', '#']).next().unwrap_or(repo);
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if repo.is_empty() {
        return None;
    }

    Some(GitHubRepo {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// How an attempt talks to GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    /// Contents API with the raw media type; may carry a token.
    Api,
    /// Plain download from raw.githubusercontent.com.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub kind: AttemptKind,
    pub url: String,
}

/// Every URL to try, in order: the contents API for each filename variant,
/// then for each variant the raw file on `main` and then on `master`.
pub fn attempt_plan(repo: &GitHubRepo) -> Vec<Attempt> {
    let api = README_VARIANTS.iter().map(|variant| Attempt {
        kind: AttemptKind::Api,
        url: format!(
            "{}/repos/{}/{}/contents/{}",
            API_BASE, repo.owner, repo.repo, variant
        ),
    });

    let raw = README_VARIANTS.iter().flat_map(|variant| {
        BRANCHES.iter().map(move |branch| Attempt {
            kind: AttemptKind::Raw,
            url: format!(
                "{}/{}/{}/{}/{}",
                RAW_BASE, repo.owner, repo.repo, branch, variant
            ),
        })
    });

    api.chain(raw).collect()
}
