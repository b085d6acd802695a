//! # Membership External Client
//!
//! Invites users to organizations and removes them again. A membership is
//! `Creating` until the user accepts the invitation.

use crate::constants::MEMBERSHIP_STATE_ACTIVE;
use crate::controller::instrumented;
use crate::controller::managed::{
    ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, ManagedKind,
    ManagedResource,
};
use crate::crd::{Condition, Membership, MembershipObservation};
use crate::error::{Error, Result};
use crate::provider::github::CreateOrgInvitationOptions;
use crate::provider::OrganizationsService;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

const ERR_GET_MEMBERSHIP: &str = "cannot get organization membership";
const ERR_CREATE_INVITATION: &str = "cannot create organization invitation";
const ERR_REMOVE_MEMBER: &str = "cannot remove organization member";

/// External client for `Membership` resources
#[derive(Clone)]
pub struct MembershipExternal {
    gh: Arc<dyn OrganizationsService>,
}

impl std::fmt::Debug for MembershipExternal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipExternal").finish_non_exhaustive()
    }
}

impl MembershipExternal {
    #[must_use]
    pub fn new(gh: Arc<dyn OrganizationsService>) -> Self {
        Self { gh }
    }

    async fn observe_membership(&self, mg: &mut ManagedResource) -> Result<ExternalObservation> {
        let cr = mg.downcast::<Membership>()?;
        let params = &cr.spec.for_provider;
        let membership = match self
            .gh
            .get_org_membership(&params.user, &params.organization)
            .await
        {
            Ok(membership) => membership,
            Err(err) if err.is_not_found() => {
                debug!("Membership does not exist");
                return Ok(ExternalObservation::absent());
            }
            Err(err) => return Err(Error::remote(ERR_GET_MEMBERSHIP, err)),
        };

        if membership.state.as_deref() == Some(MEMBERSHIP_STATE_ACTIVE) {
            cr.set_conditions(Condition::available());
        } else {
            cr.set_conditions(Condition::creating());
        }
        cr.status.get_or_insert_with(Default::default).at_provider = MembershipObservation {
            url: membership.url,
            state: membership.state,
        };

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: true,
            resource_late_initialized: false,
        })
    }

    async fn create_membership(&self, mg: &mut ManagedResource) -> Result<ExternalCreation> {
        let cr = mg.downcast::<Membership>()?;
        let params = &cr.spec.for_provider;
        let invitation = CreateOrgInvitationOptions {
            invitee_id: params.invitee_id,
            email: params.email.clone(),
            role: params.role.clone(),
            team_id: Vec::new(),
        };
        self.gh
            .create_org_invitation(&params.organization, &invitation)
            .await
            .map_err(|e| Error::remote(ERR_CREATE_INVITATION, e))?;
        info!(organization = %params.organization, "Invited member");

        Ok(ExternalCreation {
            external_name_assigned: true,
        })
    }

    async fn delete_membership(&self, mg: &mut ManagedResource) -> Result<()> {
        let cr = mg.downcast::<Membership>()?;
        let params = &cr.spec.for_provider;
        self.gh
            .remove_member(&params.organization, &params.user)
            .await
            .map_err(|e| Error::remote(ERR_REMOVE_MEMBER, e))?;
        info!(organization = %params.organization, user = %params.user, "Removed member");
        Ok(())
    }
}

#[async_trait]
impl ExternalClient for MembershipExternal {
    async fn observe(&self, mg: &mut ManagedResource) -> Result<ExternalObservation> {
        let name = mg.name();
        instrumented(Membership::KIND, "observe", &name, self.observe_membership(mg)).await
    }

    async fn create(&self, mg: &mut ManagedResource) -> Result<ExternalCreation> {
        let name = mg.name();
        instrumented(Membership::KIND, "create", &name, self.create_membership(mg)).await
    }

    /// Memberships have nothing to update; the role only applies to the invitation.
    async fn update(&self, mg: &mut ManagedResource) -> Result<ExternalUpdate> {
        let name = mg.name();
        instrumented(Membership::KIND, "update", &name, async {
            mg.downcast::<Membership>()?;
            Ok(ExternalUpdate)
        })
        .await
    }

    async fn delete(&self, mg: &mut ManagedResource) -> Result<()> {
        let name = mg.name();
        instrumented(Membership::KIND, "delete", &name, self.delete_membership(mg)).await
    }
}
