//! # GitHub Domain Objects
//!
//! Objects exchanged with the GitHub REST API. Every field GitHub may omit is
//! an `Option`, so "not returned" stays distinct from `false`, `0` or `""`.
//! The HTTP client implementing the service traits maps these to and from
//! the wire representation.

pub mod values;

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Owner type reported by GitHub for organization-owned repositories
pub const OWNER_TYPE_ORGANIZATION: &str = "Organization";

/// A GitHub user or organization account as embedded in other objects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub login: Option<String>,
    pub id: Option<i64>,
    /// `User` or `Organization`
    pub r#type: Option<String>,
}

/// An organization as embedded in a repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    pub login: Option<String>,
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// A GitHub repository
///
/// Used both as the payload of create/edit calls and as the observed state
/// returned by get.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repository {
    pub id: Option<i64>,
    pub node_id: Option<String>,
    pub owner: Option<User>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub default_branch: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub fork: Option<bool>,
    pub forks_count: Option<i64>,
    pub network_count: Option<i64>,
    pub open_issues_count: Option<i64>,
    pub stargazers_count: Option<i64>,
    pub subscribers_count: Option<i64>,
    pub watchers_count: Option<i64>,
    pub size: Option<i64>,
    pub auto_init: Option<bool>,
    pub allow_rebase_merge: Option<bool>,
    pub allow_squash_merge: Option<bool>,
    pub allow_merge_commit: Option<bool>,
    pub delete_branch_on_merge: Option<bool>,
    pub topics: Option<Vec<String>>,
    pub archived: Option<bool>,
    pub disabled: Option<bool>,
    pub permissions: Option<BTreeMap<String, bool>>,
    pub private: Option<bool>,
    pub visibility: Option<String>,
    pub has_issues: Option<bool>,
    pub has_wiki: Option<bool>,
    pub has_pages: Option<bool>,
    pub has_projects: Option<bool>,
    pub has_downloads: Option<bool>,
    pub is_template: Option<bool>,
    pub license_template: Option<String>,
    pub gitignore_template: Option<String>,
    pub team_id: Option<i64>,
    pub organization: Option<Organization>,
    /// Repository this one was generated from
    pub template_repository: Option<Box<Repository>>,

    pub url: Option<String>,
    pub html_url: Option<String>,
    pub clone_url: Option<String>,
    pub git_url: Option<String>,
    pub mirror_url: Option<String>,
    pub ssh_url: Option<String>,
    pub svn_url: Option<String>,
    pub archive_url: Option<String>,
    pub assignees_url: Option<String>,
    pub blobs_url: Option<String>,
    pub branches_url: Option<String>,
    pub collaborators_url: Option<String>,
    pub comments_url: Option<String>,
    pub commits_url: Option<String>,
    pub compare_url: Option<String>,
    pub contents_url: Option<String>,
    pub contributors_url: Option<String>,
    pub deployments_url: Option<String>,
    pub downloads_url: Option<String>,
    pub events_url: Option<String>,
    pub forks_url: Option<String>,
    pub git_commits_url: Option<String>,
    pub git_refs_url: Option<String>,
    pub git_tags_url: Option<String>,
    pub hooks_url: Option<String>,
    pub issue_comment_url: Option<String>,
    pub issue_events_url: Option<String>,
    pub issues_url: Option<String>,
    pub keys_url: Option<String>,
    pub labels_url: Option<String>,
    pub languages_url: Option<String>,
    pub merges_url: Option<String>,
    pub milestones_url: Option<String>,
    pub notifications_url: Option<String>,
    pub pulls_url: Option<String>,
    pub releases_url: Option<String>,
    pub stargazers_url: Option<String>,
    pub statuses_url: Option<String>,
    pub subscribers_url: Option<String>,
    pub subscription_url: Option<String>,
    pub tags_url: Option<String>,
    pub trees_url: Option<String>,
    pub teams_url: Option<String>,
}

/// Body of `POST /repos/{template_owner}/{template_repo}/generate`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRepoRequest {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub private: Option<bool>,
}

/// Public key used to seal repository secrets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicKey {
    pub key_id: Option<String>,
    /// Base64-encoded X25519 public key
    pub key: Option<String>,
}

/// Metadata of a repository secret. GitHub never returns the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT /repos/{owner}/{repo}/actions/secrets/{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    pub name: String,
    pub key_id: String,
    /// Base64-encoded sealed box
    pub encrypted_value: String,
}

/// A user's membership in an organization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    pub url: Option<String>,
    /// `active` or `pending`
    pub state: Option<String>,
    pub role: Option<String>,
    pub organization_url: Option<String>,
}

/// Body of `POST /orgs/{org}/invitations`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOrgInvitationOptions {
    pub invitee_id: Option<i64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub team_id: Vec<i64>,
}

/// A file in a repository as returned by the contents API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryContent {
    pub name: Option<String>,
    pub path: Option<String>,
    pub sha: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    /// File body, encoded as described by `encoding`
    pub content: Option<String>,
    pub encoding: Option<String>,
}

/// Options for creating, updating or deleting a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryContentFileOptions {
    pub message: String,
    /// Raw file body; the client base64-encodes it on the wire
    pub content: Vec<u8>,
    /// Blob sha of the file being replaced or deleted
    pub sha: Option<String>,
    pub branch: Option<String>,
}
