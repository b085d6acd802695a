//! # Secrets CRD
//!
//! A GitHub Actions repository secret whose value comes from a Kubernetes
//! Secret. The secret name in GitHub is the resource's external name.

use super::common::{Condition, Reference, SecretKeySelector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "secrets.github.crossplane.io",
    version = "v1alpha1",
    kind = "Secrets",
    plural = "secrets",
    status = "SecretsStatus",
    category = "crossplane",
    category = "managed",
    category = "github",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SecretsSpec {
    pub for_provider: SecretsParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretsParameters {
    pub owner: String,
    pub repository: String,
    /// Kubernetes Secret key holding the plaintext value
    pub value: SecretKeySelector,
}

/// Cached fingerprint of the last value written to GitHub
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SecretsObservation {
    /// SHA-256 hex digest of the plaintext
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypt_value: Option<String>,
    /// `updated_at` of the secret in GitHub, RFC3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretsStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub at_provider: SecretsObservation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_field_names() {
        let observation = SecretsObservation {
            encrypt_value: Some("abc".to_string()),
            last_update: Some("2023-01-01T00:00:00Z".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&observation).unwrap(),
            serde_json::json!({
                "encrypt_value": "abc",
                "last_update": "2023-01-01T00:00:00Z"
            })
        );
        assert_eq!(
            serde_json::to_value(SecretsObservation::default()).unwrap(),
            serde_json::json!({})
        );
    }
}
