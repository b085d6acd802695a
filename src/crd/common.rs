//! # Common CRD Types
//!
//! Status conditions and references shared by every managed resource kind.

use crate::constants::EXTERNAL_NAME_ANNOTATION;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type tracking whether the external resource is usable
pub const CONDITION_TYPE_READY: &str = "Ready";

pub const REASON_AVAILABLE: &str = "Available";
pub const REASON_CREATING: &str = "Creating";
pub const REASON_DELETING: &str = "Deleting";

/// Status condition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub r#type: String,
    pub status: String,
    #[serde(default)]
    pub last_transition_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Condition {
    fn ready(status: &str, reason: &str) -> Self {
        Self {
            r#type: CONDITION_TYPE_READY.to_string(),
            status: status.to_string(),
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            reason: Some(reason.to_string()),
            message: None,
        }
    }

    /// The external resource exists and is ready for use
    #[must_use]
    pub fn available() -> Self {
        Self::ready("True", REASON_AVAILABLE)
    }

    /// The external resource is being created
    #[must_use]
    pub fn creating() -> Self {
        Self::ready("False", REASON_CREATING)
    }

    /// The external resource is being deleted
    #[must_use]
    pub fn deleting() -> Self {
        Self::ready("False", REASON_DELETING)
    }

    /// Whether two conditions describe the same state, ignoring timestamps
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.r#type == other.r#type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }

    #[must_use]
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reason.as_deref() == Some(reason)
    }
}

/// Set a condition, replacing any existing condition of the same type.
///
/// An existing condition describing the same state is kept as-is so its
/// transition time is preserved.
pub fn set_condition(conditions: &mut Vec<Condition>, condition: Condition) {
    match conditions.iter_mut().find(|c| c.r#type == condition.r#type) {
        Some(existing) if existing.equal(&condition) => {}
        Some(existing) => *existing = condition,
        None => conditions.push(condition),
    }
}

#[must_use]
pub fn get_condition<'a>(conditions: &'a [Condition], r#type: &str) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.r#type == r#type)
}

/// Reference to another resource by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub name: String,
}

/// Selects a key of a Kubernetes Secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    pub name: String,
    pub namespace: String,
    pub key: String,
}

/// Name of the resource in GitHub: the external-name annotation, falling
/// back to the object name.
#[must_use]
pub fn external_name(meta: &ObjectMeta) -> String {
    meta.annotations
        .as_ref()
        .and_then(|a| a.get(EXTERNAL_NAME_ANNOTATION))
        .filter(|name| !name.is_empty())
        .or(meta.name.as_ref())
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_set_condition_replaces_same_type() {
        let mut conditions = vec![Condition::creating()];
        set_condition(&mut conditions, Condition::available());
        assert_eq!(conditions.len(), 1);
        assert!(conditions[0].has_reason(REASON_AVAILABLE));
        assert_eq!(conditions[0].status, "True");
    }

    #[test]
    fn test_set_condition_keeps_transition_time_when_unchanged() {
        let mut first = Condition::available();
        first.last_transition_time = Some("2020-01-01T00:00:00+00:00".to_string());
        let mut conditions = vec![first.clone()];
        set_condition(&mut conditions, Condition::available());
        assert_eq!(conditions, vec![first]);
    }

    #[test]
    fn test_get_condition() {
        let conditions = vec![Condition::deleting()];
        let ready = get_condition(&conditions, CONDITION_TYPE_READY).unwrap();
        assert!(ready.has_reason(REASON_DELETING));
        assert!(get_condition(&conditions, "Synced").is_none());
    }

    #[test]
    fn test_external_name_prefers_annotation() {
        let meta = ObjectMeta {
            name: Some("my-secret".to_string()),
            annotations: Some(BTreeMap::from([(
                EXTERNAL_NAME_ANNOTATION.to_string(),
                "DEPLOY_TOKEN".to_string(),
            )])),
            ..ObjectMeta::default()
        };
        assert_eq!(external_name(&meta), "DEPLOY_TOKEN");
    }

    #[test]
    fn test_external_name_falls_back_to_object_name() {
        let meta = ObjectMeta {
            name: Some("my-secret".to_string()),
            ..ObjectMeta::default()
        };
        assert_eq!(external_name(&meta), "my-secret");
    }
}
