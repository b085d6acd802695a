//! # Secret Sync Engine
//!
//! Seals secret plaintexts with the repository public key before upload and
//! detects drift without keeping the plaintext.
//!
//! GitHub never returns secret values, so a secret is considered in sync when
//! both the SHA-256 of the current plaintext and the `updated_at` GitHub
//! reports match what was recorded after the last upload.

use crate::crd::{SecretsObservation, SecretsParameters};
use crate::controller::store::SecretExtractor;
use crate::error::{Error, Result};
use crate::provider::github::values::format_timestamp;
use crate::provider::github::{EncryptedSecret, PublicKey, Secret};
use crate::provider::ActionsService;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_box::aead::OsRng;
use sha2::{Digest, Sha256};
use tracing::debug;

const ERR_GET_PUBLIC_KEY: &str = "cannot get repository public key";
const ERR_UPLOAD_SECRET: &str = "cannot create or update repository secret";
const ERR_GET_SECRET: &str = "cannot get repository secret";

/// Seals `plaintext` for `public_key`.
///
/// # Errors
///
/// Returns [`Error::Encryption`] when the key is missing, is not base64 or
/// does not decode to a 32-byte X25519 key.
pub fn encrypt_secret(
    public_key: &PublicKey,
    secret_name: &str,
    plaintext: &[u8],
) -> Result<EncryptedSecret> {
    let encoded = public_key
        .key
        .as_deref()
        .ok_or_else(|| Error::Encryption("repository public key is empty".to_string()))?;
    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| Error::Encryption(format!("cannot decode public key: {e}")))?;
    let key_bytes: [u8; crypto_box::KEY_SIZE] =
        decoded.as_slice().try_into().map_err(|e| {
            Error::Encryption(format!(
                "public key must be {} bytes, got {}: {e}",
                crypto_box::KEY_SIZE,
                decoded.len()
            ))
        })?;

    let sealed = crypto_box::PublicKey::from(key_bytes)
        .seal(&mut OsRng, plaintext)
        .map_err(|e| Error::Encryption(format!("cannot seal secret: {e}")))?;

    Ok(EncryptedSecret {
        name: secret_name.to_string(),
        key_id: public_key.key_id.clone().unwrap_or_default(),
        encrypted_value: STANDARD.encode(sealed),
    })
}

/// Lower-case hex SHA-256 of the plaintext
#[must_use]
pub fn generate_hash(plaintext: &[u8]) -> String {
    format!("{:x}", Sha256::digest(plaintext))
}

/// Fingerprint recorded after an upload
#[must_use]
pub fn observation(hash: String, remote: &Secret) -> SecretsObservation {
    SecretsObservation {
        encrypt_value: Some(hash),
        last_update: Some(format_timestamp(&remote.updated_at)),
    }
}

/// Seals the current plaintext and uploads it. Returns the plaintext hash.
///
/// # Errors
///
/// Fails when the public key cannot be fetched, the plaintext cannot be
/// extracted, sealing fails or the upload is rejected.
pub async fn create_or_update_secret(
    gh: &dyn ActionsService,
    extractor: &dyn SecretExtractor,
    params: &SecretsParameters,
    secret_name: &str,
) -> Result<String> {
    let public_key = gh
        .get_repo_public_key(&params.owner, &params.repository)
        .await
        .map_err(|e| Error::remote(ERR_GET_PUBLIC_KEY, e))?;
    let plaintext = extractor.extract(&params.value).await?;

    let encrypted = encrypt_secret(&public_key, secret_name, &plaintext)?;
    gh.create_or_update_repo_secret(&params.owner, &params.repository, &encrypted)
        .await
        .map_err(|e| Error::remote(ERR_UPLOAD_SECRET, e))?;
    debug!(key_id = %encrypted.key_id, "Uploaded sealed secret");

    Ok(generate_hash(&plaintext))
}

/// Fetches the secret metadata GitHub holds
///
/// # Errors
///
/// Returns [`Error::Remote`] when the lookup fails.
pub async fn get_remote_secret(
    gh: &dyn ActionsService,
    params: &SecretsParameters,
    secret_name: &str,
) -> Result<Secret> {
    gh.get_repo_secret(&params.owner, &params.repository, secret_name)
        .await
        .map_err(|e| Error::remote(ERR_GET_SECRET, e))
}

/// Whether the secret in GitHub still holds the current plaintext.
///
/// # Errors
///
/// Fails when the remote secret cannot be fetched or the plaintext cannot be
/// extracted; the sync state is unknown in both cases.
pub async fn is_up_to_date(
    gh: &dyn ActionsService,
    extractor: &dyn SecretExtractor,
    params: &SecretsParameters,
    cached: &SecretsObservation,
    secret_name: &str,
) -> Result<bool> {
    let remote = get_remote_secret(gh, params, secret_name).await?;
    let plaintext = extractor.extract(&params.value).await?;
    let hash = generate_hash(&plaintext);
    let last_update = format_timestamp(&remote.updated_at);

    Ok(cached.encrypt_value.as_deref() == Some(hash.as_str())
        && cached.last_update.as_deref() == Some(last_update.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::store::MockSecretExtractor;
    use crate::crd::SecretKeySelector;
    use crate::provider::{ApiError, MockActionsService};
    use chrono::{TimeZone, Utc};
    use crypto_box::SecretKey;
    use zeroize::Zeroizing;

    const PLAINTEXT: &[u8] = b"fR4k3y";

    fn params() -> SecretsParameters {
        SecretsParameters {
            owner: "crossplane".to_string(),
            repository: "provider-github".to_string(),
            value: SecretKeySelector {
                name: "ci".to_string(),
                namespace: "crossplane-system".to_string(),
                key: "token".to_string(),
            },
        }
    }

    fn remote_secret() -> Secret {
        let at = Utc.with_ymd_and_hms(2023, 5, 4, 10, 30, 0).unwrap();
        Secret {
            name: "TOKEN".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn extractor_returning(value: &'static [u8]) -> MockSecretExtractor {
        let mut extractor = MockSecretExtractor::new();
        extractor
            .expect_extract()
            .returning(move |_| Ok(Zeroizing::new(value.to_vec())));
        extractor
    }

    fn public_key_for(secret_key: &SecretKey) -> PublicKey {
        PublicKey {
            key_id: Some("568250167242549743".to_string()),
            key: Some(STANDARD.encode(secret_key.public_key().as_bytes())),
        }
    }

    #[test]
    fn test_hash_of_empty_input() {
        assert_eq!(
            generate_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_matches_sha256_hex() {
        assert_eq!(
            generate_hash(b"test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
        let hash = generate_hash(PLAINTEXT);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, format!("{:x}", Sha256::digest(PLAINTEXT)));
    }

    #[test]
    fn test_sealed_secret_opens_with_repository_key() {
        let secret_key = SecretKey::generate(&mut OsRng);
        let encrypted = encrypt_secret(&public_key_for(&secret_key), "TOKEN", PLAINTEXT).unwrap();
        assert_eq!(encrypted.name, "TOKEN");
        assert_eq!(encrypted.key_id, "568250167242549743");

        let sealed = STANDARD.decode(&encrypted.encrypted_value).unwrap();
        assert_ne!(sealed.as_slice(), PLAINTEXT);
        assert_eq!(secret_key.unseal(&sealed).unwrap(), PLAINTEXT);
    }

    #[test]
    fn test_encrypt_rejects_short_key() {
        let key = PublicKey {
            key_id: Some("1".to_string()),
            key: Some(STANDARD.encode([7u8; 16])),
        };
        assert!(matches!(
            encrypt_secret(&key, "TOKEN", PLAINTEXT),
            Err(Error::Encryption(_))
        ));
    }

    #[test]
    fn test_encrypt_rejects_undecodable_or_missing_key() {
        let garbage = PublicKey {
            key_id: None,
            key: Some("not base64!".to_string()),
        };
        assert!(matches!(
            encrypt_secret(&garbage, "TOKEN", PLAINTEXT),
            Err(Error::Encryption(_))
        ));
        assert!(matches!(
            encrypt_secret(&PublicKey::default(), "TOKEN", PLAINTEXT),
            Err(Error::Encryption(_))
        ));
    }

    #[tokio::test]
    async fn test_create_or_update_uploads_and_returns_hash() {
        let secret_key = SecretKey::generate(&mut OsRng);
        let public_key = public_key_for(&secret_key);
        let mut gh = MockActionsService::new();
        gh.expect_get_repo_public_key()
            .times(1)
            .returning(move |_, _| Ok(public_key.clone()));
        gh.expect_create_or_update_repo_secret()
            .withf(move |owner, repo, secret| {
                let sealed = STANDARD.decode(&secret.encrypted_value).unwrap();
                owner == "crossplane"
                    && repo == "provider-github"
                    && secret.name == "TOKEN"
                    && secret_key.unseal(&sealed).is_ok_and(|p| p == PLAINTEXT)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let hash = create_or_update_secret(&gh, &extractor_returning(PLAINTEXT), &params(), "TOKEN")
            .await
            .unwrap();
        assert_eq!(hash, generate_hash(PLAINTEXT));
    }

    #[tokio::test]
    async fn test_create_or_update_fails_without_public_key() {
        let mut gh = MockActionsService::new();
        gh.expect_get_repo_public_key()
            .returning(|_, _| Err(ApiError::new(403, "Resource not accessible")));
        gh.expect_create_or_update_repo_secret().never();
        let mut extractor = MockSecretExtractor::new();
        extractor.expect_extract().never();

        let err = create_or_update_secret(&gh, &extractor, &params(), "TOKEN")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("cannot get repository public key"));
    }

    async fn up_to_date_with(cached: SecretsObservation) -> bool {
        let mut gh = MockActionsService::new();
        gh.expect_get_repo_secret()
            .returning(|_, _, _| Ok(remote_secret()));
        is_up_to_date(&gh, &extractor_returning(PLAINTEXT), &params(), &cached, "TOKEN")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_up_to_date_requires_hash_and_timestamp() {
        let hash = generate_hash(PLAINTEXT);
        let last_update = format_timestamp(&remote_secret().updated_at);

        assert!(
            up_to_date_with(SecretsObservation {
                encrypt_value: Some(hash.clone()),
                last_update: Some(last_update.clone()),
            })
            .await
        );
        assert!(
            !up_to_date_with(SecretsObservation {
                encrypt_value: Some("fakeHash".to_string()),
                last_update: Some(last_update.clone()),
            })
            .await
        );
        assert!(
            !up_to_date_with(SecretsObservation {
                encrypt_value: Some(hash),
                last_update: Some("2020-01-01T00:00:00Z".to_string()),
            })
            .await
        );
        assert!(
            !up_to_date_with(SecretsObservation {
                encrypt_value: Some("fakeHash".to_string()),
                last_update: None,
            })
            .await
        );
    }

    #[tokio::test]
    async fn test_up_to_date_fails_when_remote_secret_unavailable() {
        let mut gh = MockActionsService::new();
        gh.expect_get_repo_secret()
            .returning(|_, _, _| Err(ApiError::new(500, "boom")));
        let err = is_up_to_date(
            &gh,
            &extractor_returning(PLAINTEXT),
            &params(),
            &SecretsObservation::default(),
            "TOKEN",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Remote { .. }));
    }

    #[tokio::test]
    async fn test_up_to_date_fails_when_plaintext_unavailable() {
        let mut gh = MockActionsService::new();
        gh.expect_get_repo_secret()
            .returning(|_, _, _| Ok(remote_secret()));
        let mut extractor = MockSecretExtractor::new();
        extractor
            .expect_extract()
            .returning(|_| Err(Error::SecretExtraction("secret not found".to_string())));
        let err = is_up_to_date(
            &gh,
            &extractor,
            &params(),
            &SecretsObservation::default(),
            "TOKEN",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::SecretExtraction(_)));
    }
}
