//! # Managed Resources
//!
//! The handle external clients receive for every operation, the outcomes they
//! return and the `ExternalClient` trait each resource kind implements.
//!
//! A client bound to one kind refuses every other kind with
//! [`Error::WrongResourceKind`].

use crate::crd::{
    external_name, get_condition, set_condition, Condition, Content, Membership, Repository,
    Secrets, CONDITION_TYPE_READY,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use kube::ResourceExt;

/// Any resource kind managed by the provider
#[derive(Debug, Clone)]
pub enum ManagedResource {
    Repository(Repository),
    Secrets(Secrets),
    Membership(Membership),
    Content(Content),
}

impl ManagedResource {
    /// Borrow the resource as kind `K`
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongResourceKind`] when the handle holds another kind.
    pub fn downcast<K: ManagedKind>(&mut self) -> Result<&mut K> {
        K::from_managed(self).ok_or(Error::WrongResourceKind(K::KIND))
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Repository(_) => Repository::KIND,
            Self::Secrets(_) => Secrets::KIND,
            Self::Membership(_) => Membership::KIND,
            Self::Content(_) => Content::KIND,
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Repository(cr) => cr.name_any(),
            Self::Secrets(cr) => cr.name_any(),
            Self::Membership(cr) => cr.name_any(),
            Self::Content(cr) => cr.name_any(),
        }
    }
}

/// A resource kind that can be held by [`ManagedResource`]
pub trait ManagedKind: ResourceExt + Sized {
    const KIND: &'static str;

    fn from_managed(mg: &mut ManagedResource) -> Option<&mut Self>;

    fn conditions(&self) -> &[Condition];

    fn conditions_mut(&mut self) -> &mut Vec<Condition>;

    fn set_conditions(&mut self, condition: Condition) {
        set_condition(self.conditions_mut(), condition);
    }

    /// The `Ready` condition, which also records the creation phase
    fn ready_condition(&self) -> Option<&Condition> {
        get_condition(self.conditions(), CONDITION_TYPE_READY)
    }

    /// Name of the resource in GitHub
    fn external_name(&self) -> String {
        external_name(self.meta())
    }
}

macro_rules! managed_kind {
    ($kind:ident) => {
        impl ManagedKind for $kind {
            const KIND: &'static str = stringify!($kind);

            fn from_managed(mg: &mut ManagedResource) -> Option<&mut Self> {
                match mg {
                    ManagedResource::$kind(cr) => Some(cr),
                    _ => None,
                }
            }

            fn conditions(&self) -> &[Condition] {
                self.status
                    .as_ref()
                    .map(|status| status.conditions.as_slice())
                    .unwrap_or_default()
            }

            fn conditions_mut(&mut self) -> &mut Vec<Condition> {
                &mut self.status.get_or_insert_with(Default::default).conditions
            }
        }

        impl From<$kind> for ManagedResource {
            fn from(cr: $kind) -> Self {
                ManagedResource::$kind(cr)
            }
        }
    };
}

managed_kind!(Repository);
managed_kind!(Secrets);
managed_kind!(Membership);
managed_kind!(Content);

/// Result of observing the external resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    /// The resource exists in GitHub
    pub resource_exists: bool,
    /// GitHub matches the desired state
    pub resource_up_to_date: bool,
    /// Unset spec fields were filled from GitHub and persisted
    pub resource_late_initialized: bool,
}

impl ExternalObservation {
    /// The resource does not exist in GitHub
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalCreation {
    /// The client set the external name during creation
    pub external_name_assigned: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalUpdate;

/// Drives one kind of external resource towards its desired state
#[async_trait]
pub trait ExternalClient: Send + Sync {
    async fn observe(&self, mg: &mut ManagedResource) -> Result<ExternalObservation>;

    async fn create(&self, mg: &mut ManagedResource) -> Result<ExternalCreation>;

    async fn update(&self, mg: &mut ManagedResource) -> Result<ExternalUpdate>;

    async fn delete(&self, mg: &mut ManagedResource) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{
        MembershipParameters, MembershipSpec, RepositoryParameters, RepositorySpec,
        REASON_CREATING,
    };

    fn repository() -> Repository {
        Repository::new(
            "demo",
            RepositorySpec {
                for_provider: RepositoryParameters::default(),
                provider_config_ref: None,
            },
        )
    }

    #[test]
    fn test_downcast_matching_kind() {
        let mut mg = ManagedResource::from(repository());
        assert_eq!(mg.kind(), "Repository");
        assert_eq!(mg.name(), "demo");
        assert!(mg.downcast::<Repository>().is_ok());
    }

    #[test]
    fn test_downcast_wrong_kind() {
        let mut mg = ManagedResource::from(Membership::new(
            "member",
            MembershipSpec {
                for_provider: MembershipParameters::default(),
                provider_config_ref: None,
            },
        ));
        let err = mg.downcast::<Repository>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "The managed resource is not a Repository resource"
        );
    }

    #[test]
    fn test_conditions_created_on_demand() {
        let mut cr = repository();
        assert!(cr.ready_condition().is_none());
        cr.set_conditions(Condition::creating());
        assert!(cr.ready_condition().unwrap().has_reason(REASON_CREATING));
    }
}
