//! # Content External Client
//!
//! Commits a single file to a repository and keeps its body in sync.

use crate::controller::instrumented;
use crate::controller::managed::{
    ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, ManagedKind,
    ManagedResource,
};
use crate::crd::{Condition, Content, ContentObservation, ContentParameters};
use crate::error::{Error, Result};
use crate::observability::metrics;
use crate::provider::github::values::string_value;
use crate::provider::github::{RepositoryContent, RepositoryContentFileOptions};
use crate::provider::{ApiResult, ContentsService};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ERR_GET_CONTENT: &str = "cannot get repository content";
const ERR_CREATE_CONTENT: &str = "cannot create repository content";
const ERR_UPDATE_CONTENT: &str = "cannot update repository content";
const ERR_DELETE_CONTENT: &str = "cannot delete repository content";

/// Decodes the body of a file returned by the contents API.
///
/// GitHub wraps base64 bodies at 60 columns; line breaks are ignored.
/// Returns `None` when the body is missing, not valid base64 UTF-8, or
/// carried in any other encoding.
#[must_use]
pub fn decoded_content(content: &RepositoryContent) -> Option<String> {
    if !has_comparable_body(content) {
        return None;
    }
    let body = content.content.as_deref()?;
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    String::from_utf8(bytes).ok()
}

/// Files over 1 MB come back with `encoding: "none"` and an empty body.
fn has_comparable_body(content: &RepositoryContent) -> bool {
    matches!(content.encoding.as_deref(), Some("base64") | None)
}

/// Whether the file in GitHub holds the desired body
///
/// A body GitHub did not inline cannot be compared and is reported as up to
/// date, so large files are not rewritten on every poll.
#[must_use]
pub fn is_up_to_date(params: &ContentParameters, observed: &RepositoryContent) -> bool {
    if !has_comparable_body(observed) {
        return true;
    }
    decoded_content(observed).as_deref() == Some(params.content.as_str())
}

#[must_use]
pub fn generate_observation(observed: &RepositoryContent) -> ContentObservation {
    ContentObservation {
        url: string_value(observed.url.as_deref()),
        html_url: string_value(observed.html_url.as_deref()),
        sha: string_value(observed.sha.as_deref()),
    }
}

/// External client for `Content` resources
#[derive(Clone)]
pub struct ContentExternal {
    gh: Arc<dyn ContentsService>,
}

impl std::fmt::Debug for ContentExternal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentExternal").finish_non_exhaustive()
    }
}

fn file_options(params: &ContentParameters, sha: Option<String>) -> RepositoryContentFileOptions {
    RepositoryContentFileOptions {
        message: params.message.clone(),
        content: params.content.clone().into_bytes(),
        sha,
        branch: params.branch.clone(),
    }
}

impl ContentExternal {
    #[must_use]
    pub fn new(gh: Arc<dyn ContentsService>) -> Self {
        Self { gh }
    }

    async fn get_content(&self, params: &ContentParameters) -> ApiResult<RepositoryContent> {
        self.gh
            .get_contents(&params.owner, &params.repo, &params.path, params.branch.clone())
            .await
    }

    async fn observe_content(&self, mg: &mut ManagedResource) -> Result<ExternalObservation> {
        let cr = mg.downcast::<Content>()?;
        let observed = match self.get_content(&cr.spec.for_provider).await {
            Ok(content) => content,
            Err(err) if err.is_not_found() => {
                debug!("File does not exist");
                return Ok(ExternalObservation::absent());
            }
            Err(err) => return Err(Error::remote(ERR_GET_CONTENT, err)),
        };

        if !has_comparable_body(&observed) {
            warn!(
                encoding = observed.encoding.as_deref().unwrap_or_default(),
                "File body not inlined by GitHub, skipping drift check"
            );
        }
        let up_to_date = is_up_to_date(&cr.spec.for_provider, &observed);
        if !up_to_date {
            metrics::increment_drift_detected(Content::KIND);
            info!("File differs from desired content");
        }
        cr.set_conditions(Condition::available());
        cr.status.get_or_insert_with(Default::default).at_provider =
            generate_observation(&observed);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
            resource_late_initialized: false,
        })
    }

    async fn create_content(&self, mg: &mut ManagedResource) -> Result<ExternalCreation> {
        let cr = mg.downcast::<Content>()?;
        let params = &cr.spec.for_provider;
        self.gh
            .create_file(
                &params.owner,
                &params.repo,
                &params.path,
                &file_options(params, None),
            )
            .await
            .map_err(|e| Error::remote(ERR_CREATE_CONTENT, e))?;
        info!(path = %params.path, "Created file");
        cr.set_conditions(Condition::creating());
        Ok(ExternalCreation::default())
    }

    async fn update_content(&self, mg: &mut ManagedResource) -> Result<ExternalUpdate> {
        let cr = mg.downcast::<Content>()?;
        let params = &cr.spec.for_provider;
        let current = self
            .get_content(params)
            .await
            .map_err(|e| Error::remote(ERR_GET_CONTENT, e))?;
        self.gh
            .update_file(
                &params.owner,
                &params.repo,
                &params.path,
                &file_options(params, current.sha),
            )
            .await
            .map_err(|e| Error::remote(ERR_UPDATE_CONTENT, e))?;
        info!(path = %params.path, "Updated file");
        Ok(ExternalUpdate)
    }

    async fn delete_content(&self, mg: &mut ManagedResource) -> Result<()> {
        let cr = mg.downcast::<Content>()?;
        let params = &cr.spec.for_provider;
        let current = match self.get_content(params).await {
            Ok(content) => content,
            Err(err) if err.is_not_found() => {
                debug!("File already deleted");
                return Ok(());
            }
            Err(err) => return Err(Error::remote(ERR_GET_CONTENT, err)),
        };
        self.gh
            .delete_file(
                &params.owner,
                &params.repo,
                &params.path,
                &file_options(params, current.sha),
            )
            .await
            .map_err(|e| Error::remote(ERR_DELETE_CONTENT, e))?;
        info!(path = %params.path, "Deleted file");
        cr.set_conditions(Condition::deleting());
        Ok(())
    }
}

#[async_trait]
impl ExternalClient for ContentExternal {
    async fn observe(&self, mg: &mut ManagedResource) -> Result<ExternalObservation> {
        let name = mg.name();
        instrumented(Content::KIND, "observe", &name, self.observe_content(mg)).await
    }

    async fn create(&self, mg: &mut ManagedResource) -> Result<ExternalCreation> {
        let name = mg.name();
        instrumented(Content::KIND, "create", &name, self.create_content(mg)).await
    }

    async fn update(&self, mg: &mut ManagedResource) -> Result<ExternalUpdate> {
        let name = mg.name();
        instrumented(Content::KIND, "update", &name, self.update_content(mg)).await
    }

    async fn delete(&self, mg: &mut ManagedResource) -> Result<()> {
        let name = mg.name();
        instrumented(Content::KIND, "delete", &name, self.delete_content(mg)).await
    }
}
