//! # Prelude
//!
//! Re-exports commonly used types and traits.
//!
//! ```rust
//! use provider_github::prelude::*;
//! ```

// CRD types
pub use crate::crd::*;

// Remote API collaborators
pub use crate::provider::{
    ActionsService, ApiError, ApiResult, ContentsService, OrganizationsService,
    RepositoriesService,
};

// External clients and their collaborators
pub use crate::controller::content::ContentExternal;
pub use crate::controller::managed::{
    ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, ManagedKind,
    ManagedResource,
};
pub use crate::controller::membership::MembershipExternal;
pub use crate::controller::repository::RepositoryExternal;
pub use crate::controller::secrets::SecretsExternal;
pub use crate::controller::store::{KubeSecretExtractor, KubeStore, LocalStore, SecretExtractor};

// Configuration and requeue policy
pub use crate::config::ControllerConfig;
pub use crate::runtime::{ErrorPolicy, FibonacciBackoff};

// Errors
pub use crate::error::{Error, Result};
