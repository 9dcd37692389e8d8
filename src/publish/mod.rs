//! Publishing rendered configurations to the review repository
//!
//! The gateway is a thin façade over a version-control hosting collaborator:
//! branch from the base, commit the configuration document, open a pull
//! request. Publishing is idempotent per (artifact id, branch): conflicts
//! from an earlier attempt resolve to the existing pull request and are
//! reported as success-with-existing-location, never as errors.

#[cfg(feature = "api-backend")]
pub mod github;

#[cfg(feature = "api-backend")]
pub use github::GitHubHost;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Base branch pull requests target by default.
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Directory inside the review repository that holds configuration documents.
pub const CONFIG_DIR: &str = "ingestion_configs";

/// Commit message for generated configuration files.
pub const COMMIT_MESSAGE: &str = "Add ingestion config via chatbot";

/// Location of a pull request on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestLocation {
    pub number: u64,
    pub url: String,
}

/// Errors from the underlying version-control host.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The branch, file or pull request already exists.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Authentication or authorization failed.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Transport-level failure reaching the host.
    #[error("network failure: {0}")]
    Network(String),
    /// Anything else the host reported.
    #[error("host error: {0}")]
    Other(String),
}

/// Version-control hosting collaborator.
#[async_trait]
pub trait VcsHost: Send + Sync {
    /// Create `branch` in `repo`, pointing at the head of `from_ref`.
    async fn create_branch(&self, repo: &str, branch: &str, from_ref: &str) -> Result<(), VcsError>;

    /// Commit a new file on `branch`.
    async fn create_file(
        &self,
        repo: &str,
        path: &str,
        content: &str,
        message: &str,
        branch: &str,
    ) -> Result<(), VcsError>;

    /// Open a pull request from `head` into `base`.
    async fn create_pull_request(
        &self,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequestLocation, VcsError>;

    /// Find an open pull request whose head is `head`, if any.
    async fn find_pull_request(
        &self,
        repo: &str,
        head: &str,
    ) -> Result<Option<PullRequestLocation>, VcsError>;
}

/// Outcome of a publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub location: PullRequestLocation,
    /// False when an earlier attempt already opened the pull request.
    pub created: bool,
}

/// Errors surfaced to the conversation after a failed publish.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A conflict that could not be resolved to an existing pull request.
    #[error("publish conflict: {0}")]
    Conflict(String),
    #[error("publish authentication failed: {0}")]
    Auth(String),
    #[error("publish network failure: {0}")]
    Network(String),
    #[error("publish failed: {0}")]
    Unknown(String),
}

impl PublishError {
    /// Whether retrying with the same inputs can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PublishError::Network(_) | PublishError::Unknown(_))
    }

    /// User-facing message with a recovery hint.
    pub fn user_message(&self) -> String {
        match self {
            PublishError::Auth(msg) => format!(
                "Publishing failed: {msg}. Check the repository token and permissions, then retry."
            ),
            PublishError::Network(msg) => {
                format!("Publishing failed: {msg}. The collected configuration is kept - retry when the host is reachable.")
            }
            _ => format!("{self}. The collected configuration is kept - you can retry."),
        }
    }
}

fn map_vcs_error(err: VcsError) -> PublishError {
    match err {
        VcsError::Conflict(msg) => PublishError::Conflict(msg),
        VcsError::Auth(msg) => PublishError::Auth(msg),
        VcsError::Network(msg) => PublishError::Network(msg),
        VcsError::Other(msg) => PublishError::Unknown(msg),
    }
}

/// Thin façade that turns a rendered artifact into a pull request.
pub struct PublishGateway<H: VcsHost> {
    host: H,
    repo: String,
    base_branch: String,
}

impl<H: VcsHost> PublishGateway<H> {
    pub fn new(host: H, repo: impl Into<String>) -> Self {
        Self {
            host,
            repo: repo.into(),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
        }
    }

    pub fn with_base_branch(mut self, base_branch: impl Into<String>) -> Self {
        self.base_branch = base_branch.into();
        self
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Access the underlying host, e.g. to inspect it in tests.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Publish one configuration document. Safe to retry with the same
    /// `(dag_id, branch)`: every conflict path resolves to the pull request
    /// an earlier attempt created.
    pub async fn publish(
        &self,
        dag_id: &str,
        config_document: &str,
        branch: &str,
    ) -> Result<PublishOutcome, PublishError> {
        match self.host.create_branch(&self.repo, branch, &self.base_branch).await {
            Ok(()) => {}
            Err(VcsError::Conflict(_)) => {
                // A previous attempt got at least as far as the branch.
                if let Some(existing) = self
                    .host
                    .find_pull_request(&self.repo, branch)
                    .await
                    .map_err(map_vcs_error)?
                {
                    info!(dag_id, branch, pr = %existing.url, "reusing pull request from earlier attempt");
                    return Ok(PublishOutcome { location: existing, created: false });
                }
            }
            Err(err) => return Err(map_vcs_error(err)),
        }

        let path = format!("{}/{}.yaml", CONFIG_DIR, branch);
        match self
            .host
            .create_file(&self.repo, &path, config_document, COMMIT_MESSAGE, branch)
            .await
        {
            Ok(()) => {}
            // File committed by the earlier attempt.
            Err(VcsError::Conflict(_)) => {}
            Err(err) => return Err(map_vcs_error(err)),
        }

        let title = format!("Add ingestion pipeline {}", dag_id);
        let body = format!("Automated ingestion configuration for `{}`.", dag_id);
        match self
            .host
            .create_pull_request(&self.repo, &title, &body, branch, &self.base_branch)
            .await
        {
            Ok(location) => {
                info!(dag_id, branch, pr = %location.url, "pull request opened");
                Ok(PublishOutcome { location, created: true })
            }
            Err(VcsError::Conflict(msg)) => {
                match self
                    .host
                    .find_pull_request(&self.repo, branch)
                    .await
                    .map_err(map_vcs_error)?
                {
                    Some(existing) => {
                        info!(dag_id, branch, pr = %existing.url, "pull request already open");
                        Ok(PublishOutcome { location: existing, created: false })
                    }
                    None => {
                        warn!(dag_id, branch, "pull request conflict with no open pull request");
                        Err(PublishError::Conflict(msg))
                    }
                }
            }
            Err(err) => Err(map_vcs_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory host that records calls and simulates conflicts.
    #[derive(Default)]
    struct FakeHost {
        branches: Mutex<Vec<String>>,
        files: Mutex<Vec<String>>,
        pulls: Mutex<Vec<(String, PullRequestLocation)>>,
        fail_with: Mutex<Option<VcsError>>,
    }

    impl FakeHost {
        fn failing(err: VcsError) -> Self {
            Self {
                fail_with: Mutex::new(Some(err)),
                ..Default::default()
            }
        }

        fn take_failure(&self) -> Option<VcsError> {
            self.fail_with.lock().unwrap().take()
        }
    }

    #[async_trait]
    impl VcsHost for FakeHost {
        async fn create_branch(&self, _repo: &str, branch: &str, _from: &str) -> Result<(), VcsError> {
            if let Some(err) = self.take_failure() {
                return Err(err);
            }
            let mut branches = self.branches.lock().unwrap();
            if branches.iter().any(|b| b == branch) {
                return Err(VcsError::Conflict(format!("branch {branch} exists")));
            }
            branches.push(branch.to_string());
            Ok(())
        }

        async fn create_file(
            &self,
            _repo: &str,
            path: &str,
            _content: &str,
            _message: &str,
            _branch: &str,
        ) -> Result<(), VcsError> {
            let mut files = self.files.lock().unwrap();
            if files.iter().any(|f| f == path) {
                return Err(VcsError::Conflict(format!("file {path} exists")));
            }
            files.push(path.to_string());
            Ok(())
        }

        async fn create_pull_request(
            &self,
            _repo: &str,
            _title: &str,
            _body: &str,
            head: &str,
            _base: &str,
        ) -> Result<PullRequestLocation, VcsError> {
            let mut pulls = self.pulls.lock().unwrap();
            if pulls.iter().any(|(h, _)| h == head) {
                return Err(VcsError::Conflict(format!("pull request for {head} exists")));
            }
            let location = PullRequestLocation {
                number: pulls.len() as u64 + 1,
                url: format!("https://example.test/pulls/{}", pulls.len() + 1),
            };
            pulls.push((head.to_string(), location.clone()));
            Ok(location)
        }

        async fn find_pull_request(
            &self,
            _repo: &str,
            head: &str,
        ) -> Result<Option<PullRequestLocation>, VcsError> {
            Ok(self
                .pulls
                .lock()
                .unwrap()
                .iter()
                .find(|(h, _)| h == head)
                .map(|(_, loc)| loc.clone()))
        }
    }

    #[tokio::test]
    async fn test_first_publish_creates_pull_request() {
        let gateway = PublishGateway::new(FakeHost::default(), "org/data-onboarding");
        let outcome = gateway
            .publish("ingest__mysql_source__transactions", "ingestion: {}", "ingest__mysql_source__transactions")
            .await
            .unwrap();
        assert!(outcome.created);
        assert_eq!(outcome.location.number, 1);
    }

    #[tokio::test]
    async fn test_republish_is_idempotent() {
        let gateway = PublishGateway::new(FakeHost::default(), "org/data-onboarding");
        let first = gateway.publish("dag", "doc", "branch").await.unwrap();
        let second = gateway.publish("dag", "doc", "branch").await.unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.location, second.location);
        // Exactly one pull request exists.
        assert_eq!(gateway.host.pulls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_is_typed() {
        let gateway = PublishGateway::new(
            FakeHost::failing(VcsError::Auth("bad token".to_string())),
            "org/data-onboarding",
        );
        let err = gateway.publish("dag", "doc", "branch").await.unwrap_err();
        assert!(matches!(err, PublishError::Auth(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_network_failure_is_retryable() {
        let gateway = PublishGateway::new(
            FakeHost::failing(VcsError::Network("timeout".to_string())),
            "org/data-onboarding",
        );
        let err = gateway.publish("dag", "doc", "branch").await.unwrap_err();
        assert!(matches!(err, PublishError::Network(_)));
        assert!(err.is_retryable());
        // The fake recovers after one failure; a retry goes through.
        let outcome = gateway.publish("dag", "doc", "branch").await.unwrap();
        assert!(outcome.created);
    }

    #[tokio::test]
    async fn test_file_path_layout() {
        let gateway = PublishGateway::new(FakeHost::default(), "org/data-onboarding");
        gateway.publish("dag", "doc", "my-branch").await.unwrap();
        assert_eq!(
            gateway.host.files.lock().unwrap().as_slice(),
            ["ingestion_configs/my-branch.yaml"]
        );
    }
}
