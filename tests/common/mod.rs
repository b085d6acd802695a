//! Shared fakes for the integration tests
//!
//! In-memory stand-ins for GitHub and the cluster, so external clients can be
//! driven through whole lifecycles without network access.

#![allow(dead_code, reason = "Each test binary uses a different subset")]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use provider_github::controller::managed::ManagedResource;
use provider_github::controller::store::{LocalStore, SecretExtractor};
use provider_github::crd::SecretKeySelector;
use provider_github::error::{Error, Result};
use provider_github::provider::github::{
    EncryptedSecret, Organization, PublicKey, Repository, Secret, TemplateRepoRequest, User,
    OWNER_TYPE_ORGANIZATION,
};
use provider_github::provider::{ActionsService, ApiError, ApiResult, RepositoriesService};
use std::collections::HashMap;
use std::sync::Mutex;
use zeroize::Zeroizing;

pub const AUTHENTICATED_USER: &str = "octocat";

fn key(owner: &str, name: &str) -> String {
    format!("{owner}/{name}")
}

/// Repositories held in memory, shaped the way GitHub returns them
#[derive(Debug, Default)]
pub struct FakeRepositories {
    repos: Mutex<HashMap<String, Repository>>,
    next_id: Mutex<i64>,
}

impl FakeRepositories {
    pub fn insert(&self, repo: Repository) {
        let owner = repo
            .owner
            .as_ref()
            .and_then(|o| o.login.clone())
            .unwrap_or_default();
        let name = repo.name.clone().unwrap_or_default();
        self.repos.lock().unwrap().insert(key(&owner, &name), repo);
    }

    pub fn get_stored(&self, owner: &str, name: &str) -> Option<Repository> {
        self.repos.lock().unwrap().get(&key(owner, name)).cloned()
    }

    pub fn len(&self) -> usize {
        self.repos.lock().unwrap().len()
    }

    /// Changes a repository behind the controller's back.
    pub fn tamper(&self, owner: &str, name: &str, change: impl FnOnce(&mut Repository)) {
        if let Some(repo) = self.repos.lock().unwrap().get_mut(&key(owner, name)) {
            change(repo);
        }
    }

    fn materialize(&self, owner: &str, owner_type: &str, mut repo: Repository) -> Repository {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let name = repo.name.clone().unwrap_or_default();
        repo.id = Some(*next_id);
        repo.full_name = Some(key(owner, &name));
        repo.html_url = Some(format!("https://github.com/{owner}/{name}"));
        repo.owner = Some(User {
            login: Some(owner.to_string()),
            id: Some(1),
            r#type: Some(owner_type.to_string()),
        });
        if owner_type == OWNER_TYPE_ORGANIZATION {
            repo.organization = Some(Organization {
                login: Some(owner.to_string()),
                id: Some(1),
                name: None,
            });
        }
        repo.default_branch.get_or_insert_with(|| "main".to_string());
        repo.private.get_or_insert(false);
        repo.has_issues.get_or_insert(true);
        repo.has_wiki.get_or_insert(true);
        // Only honored at creation; never returned.
        repo.auto_init = None;
        repo
    }
}

#[async_trait]
impl RepositoriesService for FakeRepositories {
    async fn create(&self, org: &str, repo: &Repository) -> ApiResult<Repository> {
        let (owner, owner_type) = if org.is_empty() {
            (AUTHENTICATED_USER, "User")
        } else {
            (org, OWNER_TYPE_ORGANIZATION)
        };
        let name = repo.name.clone().unwrap_or_default();
        if self.get_stored(owner, &name).is_some() {
            return Err(ApiError::new(422, "name already exists on this account"));
        }
        let created = self.materialize(owner, owner_type, repo.clone());
        self.insert(created.clone());
        Ok(created)
    }

    async fn get(&self, owner: &str, repo: &str) -> ApiResult<Repository> {
        self.get_stored(owner, repo).ok_or_else(ApiError::not_found)
    }

    async fn edit(&self, owner: &str, repo: &str, changes: &Repository) -> ApiResult<Repository> {
        let mut repos = self.repos.lock().unwrap();
        let current = repos
            .remove(&key(owner, repo))
            .ok_or_else(ApiError::not_found)?;
        let name = changes.name.clone().or(current.name.clone()).unwrap_or_default();
        let mut edited = changes.clone();
        edited.id = current.id;
        edited.owner = current.owner;
        edited.organization = current.organization;
        edited.name = Some(name.clone());
        edited.full_name = Some(key(owner, &name));
        edited.auto_init = None;
        repos.insert(key(owner, &name), edited.clone());
        Ok(edited)
    }

    async fn delete(&self, owner: &str, repo: &str) -> ApiResult<()> {
        self.repos
            .lock()
            .unwrap()
            .remove(&key(owner, repo))
            .map(|_| ())
            .ok_or_else(ApiError::not_found)
    }

    async fn create_from_template(
        &self,
        template_owner: &str,
        template_repo: &str,
        request: &TemplateRepoRequest,
    ) -> ApiResult<Repository> {
        let template = self
            .get_stored(template_owner, template_repo)
            .ok_or_else(ApiError::not_found)?;
        let owner = request.owner.clone().unwrap_or_else(|| AUTHENTICATED_USER.to_string());
        let generated = Repository {
            name: request.name.clone(),
            description: request.description.clone(),
            private: request.private,
            // GitHub reports `main` until the template's branch is copied.
            default_branch: Some("main".to_string()),
            template_repository: Some(Box::new(template)),
            ..Repository::default()
        };
        let created = self.materialize(&owner, OWNER_TYPE_ORGANIZATION, generated);
        self.insert(created.clone());
        Ok(created)
    }
}

/// Actions secrets held in memory. Uploaded values are unsealed with the
/// repository's private key so tests can check what GitHub received.
pub struct FakeActions {
    secret_key: SecretKey,
    secrets: Mutex<HashMap<String, (Vec<u8>, Secret)>>,
    clock: Mutex<DateTime<Utc>>,
}

impl std::fmt::Debug for FakeActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeActions").finish_non_exhaustive()
    }
}

impl Default for FakeActions {
    fn default() -> Self {
        Self {
            secret_key: SecretKey::generate(&mut OsRng),
            secrets: Mutex::new(HashMap::new()),
            clock: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        }
    }
}

impl FakeActions {
    fn tick(&self) -> DateTime<Utc> {
        let mut clock = self.clock.lock().unwrap();
        *clock += Duration::seconds(1);
        *clock
    }

    /// Plaintext GitHub would hand to workflows
    pub fn plaintext(&self, owner: &str, repo: &str, name: &str) -> Option<Vec<u8>> {
        self.secrets
            .lock()
            .unwrap()
            .get(&format!("{owner}/{repo}/{name}"))
            .map(|(value, _)| value.clone())
    }

    /// Simulates someone rewriting the secret outside the controller.
    pub fn overwrite(&self, owner: &str, repo: &str, name: &str, value: &[u8]) {
        let at = self.tick();
        if let Some(entry) = self
            .secrets
            .lock()
            .unwrap()
            .get_mut(&format!("{owner}/{repo}/{name}"))
        {
            entry.0 = value.to_vec();
            entry.1.updated_at = at;
        }
    }
}

#[async_trait]
impl ActionsService for FakeActions {
    async fn get_repo_public_key(&self, _owner: &str, _repo: &str) -> ApiResult<PublicKey> {
        Ok(PublicKey {
            key_id: Some("568250167242549743".to_string()),
            key: Some(STANDARD.encode(self.secret_key.public_key().as_bytes())),
        })
    }

    async fn get_repo_secret(&self, owner: &str, repo: &str, name: &str) -> ApiResult<Secret> {
        self.secrets
            .lock()
            .unwrap()
            .get(&format!("{owner}/{repo}/{name}"))
            .map(|(_, secret)| secret.clone())
            .ok_or_else(ApiError::not_found)
    }

    async fn create_or_update_repo_secret(
        &self,
        owner: &str,
        repo: &str,
        secret: &EncryptedSecret,
    ) -> ApiResult<()> {
        let sealed = STANDARD
            .decode(&secret.encrypted_value)
            .map_err(|e| ApiError::new(422, e.to_string()))?;
        let value = self
            .secret_key
            .unseal(&sealed)
            .map_err(|e| ApiError::new(422, e.to_string()))?;
        let at = self.tick();
        let mut secrets = self.secrets.lock().unwrap();
        let created_at = secrets
            .get(&format!("{owner}/{repo}/{}", secret.name))
            .map_or(at, |(_, existing)| existing.created_at);
        secrets.insert(
            format!("{owner}/{repo}/{}", secret.name),
            (
                value,
                Secret {
                    name: secret.name.clone(),
                    created_at,
                    updated_at: at,
                },
            ),
        );
        Ok(())
    }

    async fn delete_repo_secret(&self, owner: &str, repo: &str, name: &str) -> ApiResult<()> {
        self.secrets
            .lock()
            .unwrap()
            .remove(&format!("{owner}/{repo}/{name}"))
            .map(|_| ())
            .ok_or_else(ApiError::not_found)
    }
}

/// Records every resource written back to the cluster
#[derive(Debug, Default)]
pub struct RecordingStore {
    updates: Mutex<Vec<ManagedResource>>,
    fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn updates(&self) -> Vec<ManagedResource> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocalStore for RecordingStore {
    async fn update(&self, mg: &mut ManagedResource) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("the object has been modified; please apply your changes to the latest version");
        }
        self.updates.lock().unwrap().push(mg.clone());
        Ok(())
    }
}

/// Kubernetes Secret data keyed by `namespace/name/key`
#[derive(Debug, Default)]
pub struct FakeSecretStore {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeSecretStore {
    pub fn set(&self, selector: &SecretKeySelector, value: &[u8]) {
        self.data.lock().unwrap().insert(
            format!("{}/{}/{}", selector.namespace, selector.name, selector.key),
            value.to_vec(),
        );
    }
}

#[async_trait]
impl SecretExtractor for FakeSecretStore {
    async fn extract(&self, selector: &SecretKeySelector) -> Result<Zeroizing<Vec<u8>>> {
        self.data
            .lock()
            .unwrap()
            .get(&format!(
                "{}/{}/{}",
                selector.namespace, selector.name, selector.key
            ))
            .cloned()
            .map(Zeroizing::new)
            .ok_or_else(|| {
                Error::SecretExtraction(format!(
                    "secrets \"{}\" not found",
                    selector.name
                ))
            })
    }
}
