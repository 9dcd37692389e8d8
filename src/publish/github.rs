//! GitHub REST implementation of the version-control host
//!
//! Uses the refs, contents and pulls endpoints with bearer-token
//! authentication. Conflict-shaped responses (409/422) map to
//! [`VcsError::Conflict`] so the gateway can resolve them idempotently.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{PullRequestLocation, VcsError, VcsHost};

/// Default GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub REST client for branch/file/pull-request operations.
pub struct GitHubHost {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    html_url: String,
}

impl GitHubHost {
    /// Create a client against the public GitHub API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, token)
    }

    /// Create a client against a GitHub Enterprise endpoint.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "data-onboarding-sdk")
    }

    async fn ref_sha(&self, repo: &str, reference: &str) -> Result<String, VcsError> {
        let path = format!("/repos/{}/git/ref/{}", repo, reference);
        let response = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await
            .map_err(|e| network_error("resolve ref", e))?;

        if !response.status().is_success() {
            return Err(classify_status(response.status(), &format!("resolve ref {reference}")));
        }

        let parsed: RefResponse = response
            .json()
            .await
            .map_err(|e| VcsError::Other(format!("malformed ref response: {e}")))?;
        Ok(parsed.object.sha)
    }
}

#[async_trait]
impl VcsHost for GitHubHost {
    async fn create_branch(&self, repo: &str, branch: &str, from_ref: &str) -> Result<(), VcsError> {
        let sha = self.ref_sha(repo, &format!("heads/{from_ref}")).await?;
        debug!(repo, branch, %sha, "creating branch");

        let response = self
            .request(reqwest::Method::POST, &format!("/repos/{repo}/git/refs"))
            .json(&json!({
                "ref": format!("refs/heads/{branch}"),
                "sha": sha,
            }))
            .send()
            .await
            .map_err(|e| network_error("create branch", e))?;

        if !response.status().is_success() {
            return Err(classify_status(response.status(), &format!("create branch {branch}")));
        }
        Ok(())
    }

    async fn create_file(
        &self,
        repo: &str,
        path: &str,
        content: &str,
        message: &str,
        branch: &str,
    ) -> Result<(), VcsError> {
        let encoded_path: String = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        debug!(repo, path, branch, "committing file");

        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/repos/{repo}/contents/{encoded_path}"),
            )
            .json(&json!({
                "message": message,
                "content": BASE64.encode(content),
                "branch": branch,
            }))
            .send()
            .await
            .map_err(|e| network_error("create file", e))?;

        if !response.status().is_success() {
            return Err(classify_status(response.status(), &format!("create file {path}")));
        }
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequestLocation, VcsError> {
        debug!(repo, head, base, "opening pull request");
        let response = self
            .request(reqwest::Method::POST, &format!("/repos/{repo}/pulls"))
            .json(&json!({
                "title": title,
                "body": body,
                "head": head,
                "base": base,
            }))
            .send()
            .await
            .map_err(|e| network_error("create pull request", e))?;

        if !response.status().is_success() {
            return Err(classify_status(
                response.status(),
                &format!("create pull request for {head}"),
            ));
        }

        let parsed: PullResponse = response
            .json()
            .await
            .map_err(|e| VcsError::Other(format!("malformed pull request response: {e}")))?;
        Ok(PullRequestLocation {
            number: parsed.number,
            url: parsed.html_url,
        })
    }

    async fn find_pull_request(
        &self,
        repo: &str,
        head: &str,
    ) -> Result<Option<PullRequestLocation>, VcsError> {
        // The pulls list endpoint filters head refs as "owner:branch".
        let owner = repo.split('/').next().unwrap_or(repo);
        let path = format!(
            "/repos/{}/pulls?state=open&head={}",
            repo,
            urlencoding::encode(&format!("{owner}:{head}"))
        );

        let response = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await
            .map_err(|e| network_error("list pull requests", e))?;

        if !response.status().is_success() {
            return Err(classify_status(response.status(), "list pull requests"));
        }

        let pulls: Vec<PullResponse> = response
            .json()
            .await
            .map_err(|e| VcsError::Other(format!("malformed pull list response: {e}")))?;
        Ok(pulls.into_iter().next().map(|p| PullRequestLocation {
            number: p.number,
            url: p.html_url,
        }))
    }
}

fn classify_status(status: reqwest::StatusCode, context: &str) -> VcsError {
    match status.as_u16() {
        401 | 403 => VcsError::Auth(format!("{context}: HTTP {status}")),
        409 | 422 => VcsError::Conflict(format!("{context}: HTTP {status}")),
        _ => VcsError::Other(format!("{context}: HTTP {status}")),
    }
}

fn network_error(context: &str, err: reqwest::Error) -> VcsError {
    VcsError::Network(format!("{context}: {err}"))
}
