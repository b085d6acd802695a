//! # Repository External Client
//!
//! Observes, creates, updates and deletes GitHub repositories for
//! `Repository` resources. A repository renamed through the spec is still
//! found under the name recorded in status until the rename is applied.

pub mod engine;

use crate::controller::managed::{
    ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, ManagedKind,
    ManagedResource,
};
use crate::controller::store::LocalStore;
use crate::controller::instrumented;
use crate::crd::{Condition, Repository};
use crate::error::{Error, Result};
use crate::observability::metrics;
use crate::provider::{github, ApiResult, RepositoriesService};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

const ERR_GET_REPOSITORY: &str = "Cannot get GitHub repository";
const ERR_CREATE_REPOSITORY: &str = "cannot create Repository";
const ERR_UPDATE_REPOSITORY: &str = "cannot update Repository";
const ERR_DELETE_REPOSITORY: &str = "cannot delete Repository";

/// External client for `Repository` resources
#[derive(Clone)]
pub struct RepositoryExternal {
    gh: Arc<dyn RepositoriesService>,
    store: Arc<dyn LocalStore>,
}

impl std::fmt::Debug for RepositoryExternal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryExternal").finish_non_exhaustive()
    }
}

/// Name recorded in status by the last observation
fn observed_name(cr: &Repository) -> String {
    cr.status
        .as_ref()
        .map(|status| status.at_provider.name.clone())
        .unwrap_or_default()
}

impl RepositoryExternal {
    #[must_use]
    pub fn new(gh: Arc<dyn RepositoriesService>, store: Arc<dyn LocalStore>) -> Self {
        Self { gh, store }
    }

    /// Gets the repository by its desired name, then by the name recorded in
    /// status.
    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
        observed_name: &str,
    ) -> ApiResult<github::Repository> {
        match self.gh.get(owner, name).await {
            Ok(repo) => Ok(repo),
            Err(err) if observed_name.is_empty() || observed_name == name => Err(err),
            Err(err) => {
                debug!(
                    error = %err,
                    observed_name,
                    "Repository lookup by desired name failed, retrying with observed name"
                );
                self.gh.get(owner, observed_name).await
            }
        }
    }

    async fn observe_repository(&self, mg: &mut ManagedResource) -> Result<ExternalObservation> {
        let cr = mg.downcast::<Repository>()?;
        let desired = cr.spec.for_provider.clone();
        let previous_name = observed_name(cr);
        let ready = cr.ready_condition().cloned();

        let mut observed = match self
            .get_repository(&desired.owner, &desired.name, &previous_name)
            .await
        {
            Ok(repo) => repo,
            Err(err) if err.is_not_found() => {
                debug!("Repository does not exist");
                return Ok(ExternalObservation::absent());
            }
            Err(err) => return Err(Error::remote(ERR_GET_REPOSITORY, err)),
        };

        let mut initialized = desired.clone();
        engine::late_initialize(&mut initialized, &mut observed, ready.as_ref());
        let late_initialized = initialized != desired;
        if late_initialized {
            mg.downcast::<Repository>()?.spec.for_provider = initialized;
            self.store
                .update(mg)
                .await
                .map_err(|source| Error::LocalPersistence {
                    kind: Repository::KIND,
                    source,
                })?;
            metrics::increment_late_initializations(Repository::KIND);
            info!("Late-initialized repository parameters from GitHub");
        }

        let cr = mg.downcast::<Repository>()?;
        cr.set_conditions(Condition::available());
        cr.status.get_or_insert_with(Default::default).at_provider =
            engine::generate_observation(&observed);

        let up_to_date = engine::is_up_to_date(&cr.spec.for_provider, &observed);
        if !up_to_date {
            metrics::increment_drift_detected(Repository::KIND);
            info!("Repository differs from desired state");
        }

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
            resource_late_initialized: late_initialized,
        })
    }

    async fn create_repository(&self, mg: &mut ManagedResource) -> Result<ExternalCreation> {
        let cr = mg.downcast::<Repository>()?;
        let rp = &cr.spec.for_provider;

        match &rp.template {
            None => {
                let repo = engine::override_parameters(rp, github::Repository::default());
                let org = rp.organization.as_deref().unwrap_or_default();
                self.gh
                    .create(org, &repo)
                    .await
                    .map_err(|e| Error::remote(ERR_CREATE_REPOSITORY, e))?;
                info!(org, "Created repository");
            }
            Some(template) => {
                let template_ref = engine::split_full_name(&template.name)?;
                let request = engine::generate_template_repo_request(rp);
                self.gh
                    .create_from_template(&template_ref["owner"], &template_ref["name"], &request)
                    .await
                    .map_err(|e| {
                        if e.is_not_found() {
                            Error::TemplateNotFound(e)
                        } else {
                            Error::remote(ERR_CREATE_REPOSITORY, e)
                        }
                    })?;
                info!(template = %template.name, "Created repository from template");
            }
        }

        cr.set_conditions(Condition::creating());
        Ok(ExternalCreation::default())
    }

    async fn update_repository(&self, mg: &mut ManagedResource) -> Result<ExternalUpdate> {
        let cr = mg.downcast::<Repository>()?;
        let rp = &cr.spec.for_provider;
        let previous_name = observed_name(cr);

        let observed = self
            .get_repository(&rp.owner, &rp.name, &previous_name)
            .await
            .map_err(|e| Error::remote(ERR_GET_REPOSITORY, e))?;
        let changes = engine::override_parameters(rp, observed);

        // Renames are applied to the repository under its current name.
        let current_name = if previous_name.is_empty() {
            rp.name.as_str()
        } else {
            previous_name.as_str()
        };
        self.gh
            .edit(&rp.owner, current_name, &changes)
            .await
            .map_err(|e| Error::remote(ERR_UPDATE_REPOSITORY, e))?;
        info!(current_name, "Updated repository");
        Ok(ExternalUpdate)
    }

    async fn delete_repository(&self, mg: &mut ManagedResource) -> Result<()> {
        let cr = mg.downcast::<Repository>()?;
        let rp = &cr.spec.for_provider;
        self.gh
            .delete(&rp.owner, &rp.name)
            .await
            .map_err(|e| Error::remote(ERR_DELETE_REPOSITORY, e))?;
        info!("Deleted repository");
        Ok(())
    }
}

#[async_trait]
impl ExternalClient for RepositoryExternal {
    async fn observe(&self, mg: &mut ManagedResource) -> Result<ExternalObservation> {
        let name = mg.name();
        instrumented(Repository::KIND, "observe", &name, self.observe_repository(mg)).await
    }

    async fn create(&self, mg: &mut ManagedResource) -> Result<ExternalCreation> {
        let name = mg.name();
        instrumented(Repository::KIND, "create", &name, self.create_repository(mg)).await
    }

    async fn update(&self, mg: &mut ManagedResource) -> Result<ExternalUpdate> {
        let name = mg.name();
        instrumented(Repository::KIND, "update", &name, self.update_repository(mg)).await
    }

    async fn delete(&self, mg: &mut ManagedResource) -> Result<()> {
        let name = mg.name();
        instrumented(Repository::KIND, "delete", &name, self.delete_repository(mg)).await
    }
}
