//! # Errors
//!
//! Failures surfaced by the external clients to the reconcile loop.
//!
//! Errors are classified as transient (retried with backoff) or permanent
//! (the resource must change before a retry can succeed). The error policy
//! uses [`Error::is_permanent`] to pick the requeue interval.

use crate::provider::ApiError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Message used when a template reference is not `{owner}/{name}`
pub const ERR_MALFORMED_TEMPLATE_REF: &str =
    "The templateRef fullname is not valid. It needs to be in the format {owner}/{name}";

#[derive(Debug, Error)]
pub enum Error {
    /// An external client was handed a resource of another kind
    #[error("The managed resource is not a {0} resource")]
    WrongResourceKind(&'static str),

    /// A GitHub API call failed for a reason other than "not found"
    #[error("{context}: {source}")]
    Remote {
        context: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("cannot create Repository: the referenced repository template was not found: {0}")]
    TemplateNotFound(#[source] ApiError),

    /// Persisting late-initialized fields back to the cluster failed
    #[error("cannot update {kind} custom resource: {source}")]
    LocalPersistence {
        kind: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("{}", ERR_MALFORMED_TEMPLATE_REF)]
    MalformedReference,

    #[error("cannot get secret value: {0}")]
    SecretExtraction(String),

    #[error("cannot encrypt secret: {0}")]
    Encryption(String),
}

impl Error {
    #[must_use]
    pub fn remote(context: &'static str, source: ApiError) -> Self {
        Self::Remote { context, source }
    }

    /// Permanent errors cannot succeed on retry until the resource changes.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::WrongResourceKind(_) | Self::MalformedReference)
    }

    /// Short label for metrics
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::WrongResourceKind(_) => "wrong_resource_kind",
            Self::Remote { .. } => "remote",
            Self::TemplateNotFound(_) => "template_not_found",
            Self::LocalPersistence { .. } => "local_persistence",
            Self::MalformedReference => "malformed_reference",
            Self::SecretExtraction(_) => "secret_extraction",
            Self::Encryption(_) => "encryption",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_resource_kind_message() {
        assert_eq!(
            Error::WrongResourceKind("Repository").to_string(),
            "The managed resource is not a Repository resource"
        );
    }

    #[test]
    fn test_malformed_reference_message() {
        assert_eq!(
            Error::MalformedReference.to_string(),
            "The templateRef fullname is not valid. It needs to be in the format {owner}/{name}"
        );
    }

    #[test]
    fn test_remote_error_carries_context() {
        let err = Error::remote("Cannot get GitHub repository", ApiError::new(500, "boom"));
        assert!(err
            .to_string()
            .starts_with("Cannot get GitHub repository: "));
        assert!(!err.is_permanent());
        assert_eq!(err.reason(), "remote");
    }

    #[test]
    fn test_permanent_classification() {
        assert!(Error::WrongResourceKind("Secrets").is_permanent());
        assert!(Error::MalformedReference.is_permanent());
        assert!(!Error::TemplateNotFound(ApiError::not_found()).is_permanent());
        assert!(!Error::SecretExtraction("missing".into()).is_permanent());
        assert!(!Error::Encryption("bad key".into()).is_permanent());
        assert!(!Error::LocalPersistence {
            kind: "Repository",
            source: anyhow::anyhow!("conflict"),
        }
        .is_permanent());
    }
}
