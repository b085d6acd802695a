//! # Cluster Collaborators
//!
//! Access to the Kubernetes API needed by the external clients:
//! - `LocalStore` persists spec fields filled in by late initialization
//! - `SecretExtractor` reads secret plaintexts referenced by a resource
//!
//! Both are traits so external clients can be tested without a cluster.

use crate::controller::managed::ManagedResource;
use crate::crd::SecretKeySelector;
use crate::error::{Error, Result};
use anyhow::Context;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::PostParams;
use kube::{Api, Client, Resource, ResourceExt};
#[cfg(test)]
use mockall::automock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;
use zeroize::Zeroizing;

/// Persists changes to a managed resource's spec
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Write the resource back to the cluster. On success the handle holds
    /// the stored object, including its new resource version.
    async fn update(&self, mg: &mut ManagedResource) -> anyhow::Result<()>;
}

/// Resolves the plaintext a `SecretKeySelector` points at
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SecretExtractor: Send + Sync {
    async fn extract(&self, selector: &SecretKeySelector) -> Result<Zeroizing<Vec<u8>>>;
}

/// `LocalStore` backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn replace<K>(&self, obj: &K) -> anyhow::Result<K>
    where
        K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Serialize + Debug,
    {
        let name = obj.name_any();
        let api: Api<K> = Api::all(self.client.clone());
        debug!(resource.name = %name, "Persisting late-initialized spec");
        api.replace(&name, &PostParams::default(), obj)
            .await
            .with_context(|| format!("Failed to replace {name}"))
    }
}

#[async_trait]
impl LocalStore for KubeStore {
    async fn update(&self, mg: &mut ManagedResource) -> anyhow::Result<()> {
        match mg {
            ManagedResource::Repository(cr) => *cr = self.replace(&*cr).await?,
            ManagedResource::Secrets(cr) => *cr = self.replace(&*cr).await?,
            ManagedResource::Membership(cr) => *cr = self.replace(&*cr).await?,
            ManagedResource::Content(cr) => *cr = self.replace(&*cr).await?,
        }
        Ok(())
    }
}

/// `SecretExtractor` reading keys of Kubernetes Secrets
#[derive(Clone)]
pub struct KubeSecretExtractor {
    client: Client,
}

impl std::fmt::Debug for KubeSecretExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretExtractor").finish_non_exhaustive()
    }
}

impl KubeSecretExtractor {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Message for a selector missing its name, namespace or key
pub const ERR_INCOMPLETE_SELECTOR: &str = "cannot extract from secret key when none specified";

/// Checks that a selector names a secret, its namespace and a key.
///
/// # Errors
///
/// Returns [`Error::SecretExtraction`] when any part is empty.
pub fn validate_selector(selector: &SecretKeySelector) -> Result<()> {
    if selector.name.is_empty() || selector.namespace.is_empty() || selector.key.is_empty() {
        return Err(Error::SecretExtraction(ERR_INCOMPLETE_SELECTOR.to_string()));
    }
    Ok(())
}

#[async_trait]
impl SecretExtractor for KubeSecretExtractor {
    async fn extract(&self, selector: &SecretKeySelector) -> Result<Zeroizing<Vec<u8>>> {
        validate_selector(selector)?;

        let api: Api<Secret> = Api::namespaced(self.client.clone(), &selector.namespace);
        let secret = api.get(&selector.name).await.map_err(|e| {
            Error::SecretExtraction(format!(
                "cannot get secret {}/{}: {e}",
                selector.namespace, selector.name
            ))
        })?;

        secret
            .data
            .as_ref()
            .and_then(|data| data.get(&selector.key))
            .map(|value| Zeroizing::new(value.0.clone()))
            .ok_or_else(|| {
                Error::SecretExtraction(format!(
                    "key {} not found in secret {}/{}",
                    selector.key, selector.namespace, selector.name
                ))
            })
    }
}
