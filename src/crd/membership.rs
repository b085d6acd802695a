//! # Membership CRD
//!
//! Membership of a user in a GitHub organization.

use super::common::{Condition, Reference};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "organizations.github.crossplane.io",
    version = "v1alpha1",
    kind = "Membership",
    status = "MembershipStatus",
    category = "crossplane",
    category = "managed",
    category = "github",
    printcolumn = r#"{"name":"STATE","type":"string","jsonPath":".status.atProvider.state"}"#,
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSpec {
    pub for_provider: MembershipParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipParameters {
    /// GitHub user id to invite; required unless `email` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitee_id: Option<i64>,
    /// Email address to invite; required unless `invitee_id` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Login of the member, used to look up and remove the membership
    #[serde(default)]
    pub user: String,
    /// `admin`, `direct_member` or `billing_manager`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub organization: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `active` once the invitation is accepted, `pending` before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub at_provider: MembershipObservation,
}
