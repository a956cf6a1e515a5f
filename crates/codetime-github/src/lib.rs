//! GitHub REST API commit source.
//!
//! Provides the remote side of codetime:
//! - Listing a user's public repositories
//! - Fetching commit timestamps for a repository, page by page, with caps
//!
//! Requests are unauthenticated and issued one at a time.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("codetime/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";
const REPOS_PER_PAGE: u32 = 100;

/// GitHub client errors.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The configured API URL was unusable.
    #[error("invalid API URL: {reason}")]
    InvalidApiUrl { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The API rate limit is exhausted.
    #[error("GitHub rate limit exceeded{}", reset_suffix(*.reset))]
    RateLimited { reset: Option<i64> },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

fn reset_suffix(reset: Option<i64>) -> String {
    reset
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| format!(" (resets at {})", at.to_rfc3339()))
        .unwrap_or_default()
}

/// Caps applied while paging through a repository's commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Commits requested per page. Default: 100 (the API maximum).
    pub per_page: u32,
    /// Pages fetched before giving up. Default: 20.
    pub max_pages: u32,
    /// Timestamps collected before stopping. Default: 2000.
    pub max_commits: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            per_page: 100,
            max_pages: 20,
            max_commits: 2000,
        }
    }
}

/// GitHub API client.
///
/// Cloning is cheap; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_url: Url,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the given API base URL (e.g. [`DEFAULT_API_URL`]).
    pub fn new(api_url: impl Into<String>) -> Result<Self, GithubError> {
        let api_url = api_url.into();
        let api_url = api_url.trim().trim_end_matches('/');
        if api_url.is_empty() {
            return Err(GithubError::InvalidApiUrl {
                reason: "API URL cannot be empty",
            });
        }
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(GithubError::InvalidApiUrl {
                reason: "API URL must start with http:// or https://",
            });
        }

        let api_url = Url::parse(api_url).map_err(|_| GithubError::InvalidApiUrl {
            reason: "API URL is not a valid URL",
        })?;
        if api_url.cannot_be_a_base() {
            return Err(GithubError::InvalidApiUrl {
                reason: "API URL cannot be used as a base",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(GithubError::ClientBuild)?;

        Ok(Self { http, api_url })
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// Appends percent-encoded path segments to the API base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // cannot_be_a_base URLs are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Lists the names of a user's public repositories.
    pub async fn list_user_repos(&self, user: &str) -> Result<Vec<String>, GithubError> {
        let url = self.endpoint(&["users", user, "repos"]);
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let Some(body) = self.get_page(&url, REPOS_PER_PAGE, page).await? else {
                break;
            };
            let names = parse_repo_page(&body)?;
            let count = names.len();
            repos.extend(names);
            tracing::debug!(user, page, count, "fetched repository page");

            if count < REPOS_PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        Ok(repos)
    }

    /// Fetches commit timestamps for `user/repo`, newest first as returned by the API.
    ///
    /// Stops at an empty page, after `limits.max_pages` pages, or once
    /// `limits.max_commits` timestamps are collected. Commits without a
    /// committer date are skipped. A failed page ends pagination early and
    /// the timestamps gathered so far are returned.
    pub async fn fetch_commits(
        &self,
        user: &str,
        repo: &str,
        limits: &FetchLimits,
    ) -> Result<Vec<DateTime<FixedOffset>>, GithubError> {
        let url = self.endpoint(&["repos", user, repo, "commits"]);
        let mut commits = Vec::new();

        for page in 1..=limits.max_pages {
            if commits.len() >= limits.max_commits {
                tracing::debug!(repo, max_commits = limits.max_commits, "hit commit limit");
                break;
            }
            let Some(body) = self.get_page(&url, limits.per_page, page).await? else {
                break;
            };
            let parsed = parse_commit_page(&body)?;
            if parsed.items == 0 {
                break;
            }

            for timestamp in parsed.timestamps {
                commits.push(timestamp);
                if commits.len() >= limits.max_commits {
                    tracing::debug!(repo, max_commits = limits.max_commits, "hit commit limit");
                    return Ok(commits);
                }
            }
            tracing::debug!(repo, page, items = parsed.items, "fetched commit page");

            if page == limits.max_pages {
                tracing::debug!(repo, max_pages = limits.max_pages, "reached page limit");
            }
        }

        Ok(commits)
    }

    /// Fetches one page. Returns `None` when the API answered with a
    /// non-success status that should end pagination.
    async fn get_page(
        &self,
        url: &Url,
        per_page: u32,
        page: u32,
    ) -> Result<Option<String>, GithubError> {
        let response = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .query(&[("per_page", per_page), ("page", page)])
            .send()
            .await?;

        let status = response.status();
        check_rate_limit(status, response.headers())?;
        if !status.is_success() {
            tracing::warn!(%url, page, %status, "failed to fetch page");
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

/// Fails with [`GithubError::RateLimited`] when the response says the quota is spent.
fn check_rate_limit(status: StatusCode, headers: &HeaderMap) -> Result<(), GithubError> {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return Ok(());
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
    };
    if header("x-ratelimit-remaining") != Some("0") {
        return Ok(());
    }

    Err(GithubError::RateLimited {
        reset: header("x-ratelimit-reset").and_then(|value| value.parse().ok()),
    })
}

/// One page of the commits listing.
#[derive(Debug, Default)]
struct CommitPage {
    /// Number of commit objects on the page, including skipped ones.
    items: usize,
    /// Committer timestamps that could be parsed.
    timestamps: Vec<DateTime<FixedOffset>>,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    commit: Option<CommitDetails>,
}

#[derive(Debug, Deserialize)]
struct CommitDetails {
    committer: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
}

fn parse_commit_page(body: &str) -> Result<CommitPage, GithubError> {
    let items: Vec<CommitItem> =
        serde_json::from_str(body).map_err(|err| GithubError::InvalidResponse(err.to_string()))?;

    let mut page = CommitPage {
        items: items.len(),
        timestamps: Vec::with_capacity(items.len()),
    };
    for item in items {
        let Some(date) = item
            .commit
            .and_then(|commit| commit.committer)
            .and_then(|committer| committer.date)
        else {
            continue;
        };
        match DateTime::parse_from_rfc3339(&date) {
            Ok(timestamp) => page.timestamps.push(timestamp),
            Err(err) => tracing::debug!(date, %err, "skipping commit with unparseable date"),
        }
    }
    Ok(page)
}

fn parse_repo_page(body: &str) -> Result<Vec<String>, GithubError> {
    let repos: Vec<Repository> =
        serde_json::from_str(body).map_err(|err| GithubError::InvalidResponse(err.to_string()))?;
    Ok(repos.into_iter().map(|repo| repo.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use reqwest::header::HeaderValue;

    #[test]
    fn client_rejects_empty_api_url() {
        assert!(matches!(
            Client::new("  "),
            Err(GithubError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn client_rejects_url_without_scheme() {
        assert!(matches!(
            Client::new("api.github.com"),
            Err(GithubError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = Client::new("https://github.example.com/api/v3/").unwrap();
        assert_eq!(client.api_url(), "https://github.example.com/api/v3");
    }

    #[test]
    fn client_rejects_unparseable_url() {
        assert!(matches!(
            Client::new("https://"),
            Err(GithubError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn endpoint_appends_segments_to_base() {
        let client = Client::new(DEFAULT_API_URL).unwrap();
        assert_eq!(
            client.endpoint(&["repos", "octocat", "hello", "commits"]).as_str(),
            "https://api.github.com/repos/octocat/hello/commits"
        );

        let enterprise = Client::new("https://github.example.com/api/v3/").unwrap();
        assert_eq!(
            enterprise.endpoint(&["users", "octocat", "repos"]).as_str(),
            "https://github.example.com/api/v3/users/octocat/repos"
        );
    }

    #[test]
    fn endpoint_escapes_reserved_characters() {
        let client = Client::new(DEFAULT_API_URL).unwrap();
        let url = client.endpoint(&["repos", "octo/cat", "hello?page=9#x", "commits"]);
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo%2Fcat/hello%3Fpage=9%23x/commits"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn parse_commit_page_reads_committer_dates() {
        let body = r#"[
            {"sha": "a", "commit": {"committer": {"name": "x", "date": "2025-01-15T09:00:00Z"}}},
            {"sha": "b", "commit": {"committer": {"name": "x", "date": "2025-01-15T11:30:00+02:00"}}}
        ]"#;
        let page = parse_commit_page(body).unwrap();
        assert_eq!(page.items, 2);
        assert_eq!(page.timestamps.len(), 2);
        assert_eq!(page.timestamps[0].to_rfc3339(), "2025-01-15T09:00:00+00:00");
        assert_eq!(page.timestamps[1].offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn parse_commit_page_skips_incomplete_commits() {
        let body = r#"[
            {"sha": "a"},
            {"sha": "b", "commit": {}},
            {"sha": "c", "commit": {"committer": null}},
            {"sha": "d", "commit": {"committer": {"name": "x"}}},
            {"sha": "e", "commit": {"committer": {"date": "yesterday"}}},
            {"sha": "f", "commit": {"committer": {"date": "2025-01-15T09:00:00Z"}}}
        ]"#;
        let page = parse_commit_page(body).unwrap();
        assert_eq!(page.items, 6);
        assert_eq!(page.timestamps.len(), 1);
    }

    #[test]
    fn parse_commit_page_empty_array() {
        let page = parse_commit_page("[]").unwrap();
        assert_eq!(page.items, 0);
        assert!(page.timestamps.is_empty());
    }

    #[test]
    fn parse_commit_page_rejects_error_object() {
        let err = parse_commit_page(r#"{"message": "Not Found"}"#).unwrap_err();
        assert!(matches!(err, GithubError::InvalidResponse(_)));
    }

    #[test]
    fn parse_repo_page_collects_names() {
        let body = r#"[{"name": "alpha", "fork": false}, {"name": "beta"}]"#;
        assert_eq!(parse_repo_page(body).unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn rate_limit_detected_when_quota_spent() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1736931600"));

        let err = check_rate_limit(StatusCode::FORBIDDEN, &headers).unwrap_err();
        assert!(matches!(
            err,
            GithubError::RateLimited {
                reset: Some(1_736_931_600)
            }
        ));
        assert!(err.to_string().contains("resets at 2025-01-15T09:00:00+00:00"));
    }

    #[test]
    fn forbidden_with_quota_left_is_not_rate_limit() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("42"));
        assert!(check_rate_limit(StatusCode::FORBIDDEN, &headers).is_ok());
        assert!(check_rate_limit(StatusCode::NOT_FOUND, &HeaderMap::new()).is_ok());
    }

    #[test]
    fn rate_limit_without_reset_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        let err = check_rate_limit(StatusCode::TOO_MANY_REQUESTS, &headers).unwrap_err();
        assert_eq!(err.to_string(), "GitHub rate limit exceeded");
    }

    #[test]
    fn default_limits() {
        let limits = FetchLimits::default();
        assert_eq!(limits.per_page, 100);
        assert_eq!(limits.max_pages, 20);
        assert_eq!(limits.max_commits, 2000);
    }
}
