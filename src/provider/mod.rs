//! # Provider Modules
//!
//! Service traits for the parts of the GitHub REST API the controllers use.
//!
//! Each service is implemented by an HTTP client outside this crate and by
//! `mockall` mocks in tests:
//! - `RepositoriesService` for repositories
//! - `ActionsService` for repository Actions secrets
//! - `OrganizationsService` for organization memberships
//! - `ContentsService` for repository files

pub mod github;

use async_trait::async_trait;
use github::{
    CreateOrgInvitationOptions, EncryptedSecret, Membership, PublicKey, Repository,
    RepositoryContent, RepositoryContentFileOptions, Secret, TemplateRepoRequest,
};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Failure of a GitHub API call
///
/// `status` is the HTTP status code when a response was received, `None` for
/// transport failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("GitHub API request failed ({}): {message}", status_label(.status.as_ref()))]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
}

fn status_label(status: Option<&u16>) -> String {
    status.map_or_else(|| "no response".to_string(), |s| format!("status {s}"))
}

impl ApiError {
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure without an HTTP response (connection, timeout, TLS)
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(404, "Not Found")
    }

    /// Whether GitHub answered 404
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Repository endpoints
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RepositoriesService: Send + Sync {
    /// Create a repository. An empty `org` creates it for the authenticated user.
    async fn create(&self, org: &str, repo: &Repository) -> ApiResult<Repository>;

    async fn get(&self, owner: &str, repo: &str) -> ApiResult<Repository>;

    async fn edit(&self, owner: &str, repo: &str, changes: &Repository) -> ApiResult<Repository>;

    async fn delete(&self, owner: &str, repo: &str) -> ApiResult<()>;

    /// Generate a repository from a template repository
    async fn create_from_template(
        &self,
        template_owner: &str,
        template_repo: &str,
        request: &TemplateRepoRequest,
    ) -> ApiResult<Repository>;
}

/// Actions secrets endpoints
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ActionsService: Send + Sync {
    async fn get_repo_public_key(&self, owner: &str, repo: &str) -> ApiResult<PublicKey>;

    async fn get_repo_secret(&self, owner: &str, repo: &str, name: &str) -> ApiResult<Secret>;

    async fn create_or_update_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        secret: &EncryptedSecret,
    ) -> ApiResult<()>;

    async fn delete_repo_secret(&self, owner: &str, repo: &str, name: &str) -> ApiResult<()>;
}

/// Organization membership endpoints
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrganizationsService: Send + Sync {
    async fn get_org_membership(&self, user: &str, org: &str) -> ApiResult<Membership>;

    async fn create_org_invitation(
        &self,
        org: &str,
        options: &CreateOrgInvitationOptions,
    ) -> ApiResult<()>;

    async fn remove_member(&self, org: &str, user: &str) -> ApiResult<()>;
}

/// Repository contents endpoints
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentsService: Send + Sync {
    /// Get a file. `branch` selects the ref; `None` uses the default branch.
    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<String>,
    ) -> ApiResult<RepositoryContent>;

    async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        options: &RepositoryContentFileOptions,
    ) -> ApiResult<RepositoryContent>;

    async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        options: &RepositoryContentFileOptions,
    ) -> ApiResult<RepositoryContent>;

    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        options: &RepositoryContentFileOptions,
    ) -> ApiResult<()>;
}
