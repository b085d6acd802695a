//! # Content CRD
//!
//! A single file committed to a GitHub repository.

use super::common::{Condition, Reference};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "repositories.github.crossplane.io",
    version = "v1alpha1",
    kind = "Content",
    status = "ContentStatus",
    category = "crossplane",
    category = "managed",
    category = "github",
    printcolumn = r#"{"name":"URL","type":"string","jsonPath":".status.atProvider.htmlUrl"}"#,
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ContentSpec {
    pub for_provider: ContentParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentParameters {
    pub owner: String,
    pub repo: String,
    /// Path of the file inside the repository
    pub path: String,
    /// Commit message used for every change to the file
    pub message: String,
    /// Plain-text file body
    pub content: String,
    /// Branch to commit to; the repository's default branch when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentObservation {
    pub url: String,
    pub html_url: String,
    /// Blob sha of the file
    pub sha: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub at_provider: ContentObservation,
}
