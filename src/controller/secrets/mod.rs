//! # Secrets External Client
//!
//! Keeps GitHub Actions repository secrets in sync with Kubernetes Secrets.
//! The secret's name in GitHub is the resource's external name.

pub mod engine;

use crate::controller::instrumented;
use crate::controller::managed::{
    ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, ManagedKind,
    ManagedResource,
};
use crate::controller::store::SecretExtractor;
use crate::crd::{Condition, Secrets, SecretsObservation};
use crate::error::{Error, Result};
use crate::observability::metrics;
use crate::provider::ActionsService;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

const ERR_DELETE_SECRET: &str = "cannot delete repository secret";

/// External client for `Secrets` resources
#[derive(Clone)]
pub struct SecretsExternal {
    gh: Arc<dyn ActionsService>,
    extractor: Arc<dyn SecretExtractor>,
}

impl std::fmt::Debug for SecretsExternal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsExternal").finish_non_exhaustive()
    }
}

impl SecretsExternal {
    #[must_use]
    pub fn new(gh: Arc<dyn ActionsService>, extractor: Arc<dyn SecretExtractor>) -> Self {
        Self { gh, extractor }
    }

    async fn observe_secret(&self, mg: &mut ManagedResource) -> Result<ExternalObservation> {
        let cr = mg.downcast::<Secrets>()?;
        let Some(cached) = cr
            .status
            .as_ref()
            .map(|status| status.at_provider.clone())
            .filter(|observation| observation.encrypt_value.is_some())
        else {
            debug!("Secret has not been uploaded yet");
            return Ok(ExternalObservation::absent());
        };

        let up_to_date = engine::is_up_to_date(
            self.gh.as_ref(),
            self.extractor.as_ref(),
            &cr.spec.for_provider,
            &cached,
            &cr.external_name(),
        )
        .await?;
        if !up_to_date {
            metrics::increment_drift_detected(Secrets::KIND);
            info!("Secret differs from its source value");
        }

        cr.set_conditions(Condition::available());
        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
            resource_late_initialized: false,
        })
    }

    /// Uploads the current value and records its fingerprint in status.
    async fn upload(&self, cr: &mut Secrets) -> Result<()> {
        let secret_name = cr.external_name();
        let params = &cr.spec.for_provider;
        let hash = engine::create_or_update_secret(
            self.gh.as_ref(),
            self.extractor.as_ref(),
            params,
            &secret_name,
        )
        .await?;
        let remote = engine::get_remote_secret(self.gh.as_ref(), params, &secret_name).await?;

        cr.status.get_or_insert_with(Default::default).at_provider =
            engine::observation(hash, &remote);
        info!(secret = %secret_name, "Uploaded repository secret");
        Ok(())
    }

    async fn create_secret(&self, mg: &mut ManagedResource) -> Result<ExternalCreation> {
        let cr = mg.downcast::<Secrets>()?;
        self.upload(cr).await?;
        cr.set_conditions(Condition::creating());
        Ok(ExternalCreation::default())
    }

    async fn update_secret(&self, mg: &mut ManagedResource) -> Result<ExternalUpdate> {
        let cr = mg.downcast::<Secrets>()?;
        self.upload(cr).await?;
        Ok(ExternalUpdate)
    }

    async fn delete_secret(&self, mg: &mut ManagedResource) -> Result<()> {
        let cr = mg.downcast::<Secrets>()?;
        let secret_name = cr.external_name();
        let params = &cr.spec.for_provider;
        self.gh
            .delete_repo_secret(&params.owner, &params.repository, &secret_name)
            .await
            .map_err(|e| Error::remote(ERR_DELETE_SECRET, e))?;

        cr.status.get_or_insert_with(Default::default).at_provider = SecretsObservation::default();
        cr.set_conditions(Condition::deleting());
        info!(secret = %secret_name, "Deleted repository secret");
        Ok(())
    }
}

#[async_trait]
impl ExternalClient for SecretsExternal {
    async fn observe(&self, mg: &mut ManagedResource) -> Result<ExternalObservation> {
        let name = mg.name();
        instrumented(Secrets::KIND, "observe", &name, self.observe_secret(mg)).await
    }

    async fn create(&self, mg: &mut ManagedResource) -> Result<ExternalCreation> {
        let name = mg.name();
        instrumented(Secrets::KIND, "create", &name, self.create_secret(mg)).await
    }

    async fn update(&self, mg: &mut ManagedResource) -> Result<ExternalUpdate> {
        let name = mg.name();
        instrumented(Secrets::KIND, "update", &name, self.update_secret(mg)).await
    }

    async fn delete(&self, mg: &mut ManagedResource) -> Result<()> {
        let name = mg.name();
        instrumented(Secrets::KIND, "delete", &name, self.delete_secret(mg)).await
    }
}
