//! # Custom Resource Definitions
//!
//! Managed resource kinds reconciled against GitHub. All kinds are
//! cluster-scoped and follow the same shape: `spec.forProvider` holds the
//! desired state, `status.atProvider` the last observation and
//! `status.conditions` the readiness.

mod common;
mod content;
mod membership;
mod repository;
mod secrets;

pub use common::{
    external_name, get_condition, set_condition, Condition, Reference, SecretKeySelector,
    CONDITION_TYPE_READY, REASON_AVAILABLE, REASON_CREATING, REASON_DELETING,
};
pub use content::{Content, ContentObservation, ContentParameters, ContentSpec, ContentStatus};
pub use membership::{
    Membership, MembershipObservation, MembershipParameters, MembershipSpec, MembershipStatus,
};
pub use repository::{
    Repository, RepositoryObservation, RepositoryParameters, RepositorySpec, RepositoryStatus,
};
pub use secrets::{Secrets, SecretsObservation, SecretsParameters, SecretsSpec, SecretsStatus};
