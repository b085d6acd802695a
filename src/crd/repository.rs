//! # Repository CRD
//!
//! A GitHub repository managed by the provider.

use super::common::{Condition, Reference};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Repository specification
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "repositories.github.crossplane.io",
    version = "v1alpha1",
    kind = "Repository",
    status = "RepositoryStatus",
    category = "crossplane",
    category = "managed",
    category = "github",
    printcolumn = r#"{"name":"URL","type":"string","jsonPath":".status.atProvider.htmlUrl"}"#,
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySpec {
    pub for_provider: RepositoryParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<Reference>,
}

/// Desired state of a repository
///
/// Optional fields left unset are late-initialized from GitHub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryParameters {
    /// User or organization that owns the repository
    pub owner: String,
    pub name: String,
    /// Organization to create the repository in; empty creates it for the
    /// authenticated user
    #[serde(rename = "org", default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// `public`, `private` or `internal`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    /// Team granted access; only valid for organization repositories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    /// Create an initial commit with an empty README. Only honored on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_pages: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_downloads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Template repository to generate from, as `{owner}/{name}`
    #[serde(rename = "templateRef", default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Reference>,
}

/// Observed state of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryObservation {
    pub id: i64,
    pub node_id: String,
    pub full_name: String,
    pub name: String,

    pub url: String,
    pub archive_url: String,
    pub assignees_url: String,
    pub blobs_url: String,
    pub branches_url: String,
    pub collaborators_url: String,
    pub comments_url: String,
    pub commits_url: String,
    pub compare_url: String,
    pub contents_url: String,
    pub contributors_url: String,
    pub deployments_url: String,
    pub downloads_url: String,
    pub events_url: String,
    pub forks_url: String,
    pub git_commits_url: String,
    pub git_refs_url: String,
    pub git_tags_url: String,
    pub hooks_url: String,
    pub issue_comment_url: String,
    pub issue_events_url: String,
    pub issues_url: String,
    pub keys_url: String,
    pub labels_url: String,
    pub languages_url: String,
    pub merges_url: String,
    pub milestones_url: String,
    pub notifications_url: String,
    pub pulls_url: String,
    pub releases_url: String,
    pub stargazers_url: String,
    pub statuses_url: String,
    pub subscribers_url: String,
    pub subscription_url: String,
    pub tags_url: String,
    pub trees_url: String,
    pub teams_url: String,
    pub html_url: String,
    pub clone_url: String,
    pub git_url: String,
    pub mirror_url: String,
    pub ssh_url: String,
    pub svn_url: String,

    pub forks_count: i64,
    pub network_count: i64,
    pub open_issues_count: i64,
    pub stargazers_count: i64,
    pub subscribers_count: i64,
    pub watchers_count: i64,

    /// RFC3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    pub language: String,
    pub fork: bool,
    pub size: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    pub disabled: bool,
    /// Permissions of the authenticated user on the repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeMap<String, bool>>,
}

/// Repository status
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub at_provider: RepositoryObservation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_use_provider_field_names() {
        let params: RepositoryParameters = serde_json::from_value(serde_json::json!({
            "owner": "crossplane",
            "name": "provider-github",
            "org": "crossplane",
            "hasIssues": false,
            "teamId": 7,
            "templateRef": { "name": "crossplane/provider-template" }
        }))
        .unwrap();
        assert_eq!(params.organization.as_deref(), Some("crossplane"));
        assert_eq!(params.has_issues, Some(false));
        assert_eq!(params.team_id, Some(7));
        assert_eq!(params.template.unwrap().name, "crossplane/provider-template");
        assert_eq!(params.description, None);
    }

    #[test]
    fn test_unset_parameters_are_not_serialized() {
        let params = RepositoryParameters {
            owner: "crossplane".to_string(),
            name: "provider-github".to_string(),
            ..RepositoryParameters::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "owner": "crossplane", "name": "provider-github" })
        );
    }

    #[test]
    fn test_status_defaults_when_missing() {
        let status: RepositoryStatus = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(status.conditions.is_empty());
        assert_eq!(status.at_provider, RepositoryObservation::default());
    }
}
