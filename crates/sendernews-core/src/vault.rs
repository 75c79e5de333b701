//! Credential Vault
//!
//! Protects the Sender.net API token at rest with AES-256-GCM keyed by a
//! process-wide secret, and masks it for display.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sendernews_common::config::VaultConfig;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

/// Number of leading characters left visible by [`mask`]
pub const MASK_PREFIX_LEN: usize = 5;

/// Character replacing the hidden part of a token
pub const MASK_CHAR: char = '*';

/// Trailing pattern marking a submitted token as "unchanged"
pub const MASK_SENTINEL: &str = "*****";

const NONCE_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Vault secret key is not configured")]
    MissingKey,
    #[error("Invalid key length")]
    InvalidKeyLength,
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),
    #[error("No stored ciphertext to decrypt")]
    EmptyCiphertext,
}

impl From<VaultError> for sendernews_common::Error {
    fn from(err: VaultError) -> Self {
        sendernews_common::Error::Crypto(err.to_string())
    }
}

/// A decrypted API token. Only lives for the duration of one host event.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The plaintext, for building the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiToken").field(&self.masked()).finish()
    }
}

/// Symmetric vault for the stored API token.
#[derive(Clone)]
pub struct CredentialVault {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault").finish_non_exhaustive()
    }
}

impl CredentialVault {
    /// Creates a vault from a raw 32-byte key.
    pub fn new(key: &[u8]) -> Result<Self, VaultError> {
        Ok(Self {
            cipher: Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::InvalidKeyLength)?,
        })
    }

    /// Creates a vault from an arbitrary-length secret string, hashed to a
    /// 256-bit key.
    pub fn from_secret(secret: &str) -> Result<Self, VaultError> {
        if secret.is_empty() {
            return Err(VaultError::MissingKey);
        }
        let key = Sha256::digest(secret.as_bytes());
        Self::new(key.as_slice())
    }

    /// Creates a vault from the environment variable named in the config.
    pub fn from_env(config: &VaultConfig) -> Result<Self, VaultError> {
        let secret = std::env::var(&config.secret_env).map_err(|_| {
            warn!("Vault secret variable {} is not set", config.secret_env);
            VaultError::MissingKey
        })?;
        Self::from_secret(&secret)
    }

    /// Encrypts a token into a storage-safe string.
    /// The output is base64 of a random 12-byte nonce followed by the ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(sealed))
    }

    /// Decrypts a string produced by [`CredentialVault::encrypt`].
    pub fn decrypt(&self, ciphertext: &str) -> Result<ApiToken, VaultError> {
        if ciphertext.is_empty() {
            return Err(VaultError::EmptyCiphertext);
        }

        let sealed = STANDARD
            .decode(ciphertext)
            .map_err(|e| VaultError::DecryptionFailed(format!("invalid encoding: {}", e)))?;

        if sealed.len() < NONCE_LEN {
            return Err(VaultError::DecryptionFailed(
                "Invalid encrypted data: too short to contain a nonce".to_string(),
            ));
        }

        let (nonce_bytes, body) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), body)
            .map_err(|e| VaultError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(plaintext)
            .map(ApiToken)
            .map_err(|_| VaultError::DecryptionFailed("plaintext is not UTF-8".to_string()))
    }

    /// Decides what to persist for a token submitted from the settings page.
    ///
    /// A value ending in [`MASK_SENTINEL`] means the administrator left the
    /// masked token untouched, so the existing ciphertext is kept. The same
    /// holds when the submission equals the currently stored plaintext or its
    /// mask, which covers tokens too short for the mask to end in the sentinel.
    /// An empty submission clears the token.
    pub fn resolve_submission(
        &self,
        submitted: &str,
        existing: Option<&str>,
    ) -> Result<String, VaultError> {
        if is_masked(submitted) {
            debug!("Submitted token is masked, keeping stored ciphertext");
            return Ok(existing.unwrap_or_default().to_string());
        }

        if submitted.is_empty() {
            return Ok(String::new());
        }

        if let Some(existing) = existing.filter(|c| !c.is_empty()) {
            if let Ok(current) = self.decrypt(existing) {
                if current.expose() == submitted || current.masked() == submitted {
                    debug!("Submitted token matches stored token, keeping stored ciphertext");
                    return Ok(existing.to_string());
                }
            }
        }

        self.encrypt(submitted)
    }
}

/// Masks a token for display: the first five characters stay visible and
/// every remaining character becomes `*`. Shorter tokens are shown as is.
pub fn mask(plaintext: &str) -> String {
    plaintext
        .chars()
        .enumerate()
        .map(|(i, c)| if i < MASK_PREFIX_LEN { c } else { MASK_CHAR })
        .collect()
}

/// Whether a submitted value is a masked placeholder
pub fn is_masked(submitted: &str) -> bool {
    submitted.ends_with(MASK_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOKENS: &[&str] = &[
        "abcde",
        "abcdef",
        "abcdefgh",
        "abcdefghi",
        "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9.payload.signature",
        "token-with-ünïcode",
        "x",
        "",
    ];

    fn vault() -> CredentialVault {
        CredentialVault::from_secret("nonce-key-for-tests").unwrap()
    }

    #[test]
    fn test_round_trip() {
        let vault = vault();
        for token in TOKENS.iter().filter(|t| !t.is_empty()) {
            let sealed = vault.encrypt(token).unwrap();
            assert_ne!(&sealed, token);
            assert_eq!(vault.decrypt(&sealed).unwrap().expose(), *token);
        }
    }

    #[test]
    fn test_encrypt_is_not_deterministic() {
        let vault = vault();
        assert_ne!(vault.encrypt("same").unwrap(), vault.encrypt("same").unwrap());
    }

    #[test]
    fn test_decrypt_rejects_bad_input() {
        let vault = vault();
        assert!(matches!(vault.decrypt(""), Err(VaultError::EmptyCiphertext)));
        assert!(matches!(vault.decrypt("not base64!"), Err(VaultError::DecryptionFailed(_))));
        assert!(matches!(vault.decrypt("AAAA"), Err(VaultError::DecryptionFailed(_))));

        let other = CredentialVault::from_secret("another-secret").unwrap();
        let sealed = other.encrypt("token").unwrap();
        assert!(matches!(vault.decrypt(&sealed), Err(VaultError::DecryptionFailed(_))));
    }

    #[test]
    fn test_missing_key() {
        assert!(matches!(CredentialVault::from_secret(""), Err(VaultError::MissingKey)));
        assert!(matches!(CredentialVault::new(&[0u8; 16]), Err(VaultError::InvalidKeyLength)));

        let config = VaultConfig {
            secret_env: "SENDERNEWS_TEST_UNSET_SECRET".to_string(),
        };
        assert!(matches!(CredentialVault::from_env(&config), Err(VaultError::MissingKey)));
    }

    #[test]
    fn test_mask_format() {
        for token in TOKENS.iter().filter(|t| t.chars().count() >= MASK_PREFIX_LEN) {
            let masked = mask(token);
            assert_eq!(masked.chars().count(), token.chars().count());
            let prefix: String = token.chars().take(MASK_PREFIX_LEN).collect();
            assert!(masked.starts_with(&prefix));
            assert!(masked.chars().skip(MASK_PREFIX_LEN).all(|c| c == MASK_CHAR));
        }
        assert_eq!(mask("abcdefgh"), "abcde***");
        assert_eq!(mask("abc"), "abc");
    }

    #[test]
    fn test_masked_submission_keeps_ciphertext() {
        let vault = vault();
        for token in TOKENS.iter().filter(|t| t.chars().count() >= MASK_PREFIX_LEN) {
            let stored = vault.encrypt(token).unwrap();
            let kept = vault.resolve_submission(&mask(token), Some(&stored)).unwrap();
            assert_eq!(kept, stored);
        }
    }

    #[test]
    fn test_suffix_check_not_full_comparison() {
        let vault = vault();
        let stored = vault.encrypt("abcdefghij").unwrap();
        // A different prefix still counts as "unchanged"
        let kept = vault.resolve_submission("zzzzz*****", Some(&stored)).unwrap();
        assert_eq!(kept, stored);
        // Four stars is a real value
        let replaced = vault.resolve_submission("abcde****", Some(&stored)).unwrap();
        assert_ne!(replaced, stored);
        assert_eq!(vault.decrypt(&replaced).unwrap().expose(), "abcde****");
    }

    #[test]
    fn test_short_token_mask_without_sentinel_keeps_ciphertext() {
        let vault = vault();
        let stored = vault.encrypt("abcdefgh").unwrap();
        assert!(!is_masked("abcde***"));
        assert_eq!(vault.resolve_submission("abcde***", Some(&stored)).unwrap(), stored);

        // A different value of the same shape is a real change
        let replaced = vault.resolve_submission("zzzde***", Some(&stored)).unwrap();
        assert_ne!(replaced, stored);
        assert_eq!(vault.decrypt(&replaced).unwrap().expose(), "zzzde***");
    }

    #[test]
    fn test_new_submission_encrypts() {
        let vault = vault();
        let stored = vault.resolve_submission("fresh-token", None).unwrap();
        assert_eq!(vault.decrypt(&stored).unwrap().expose(), "fresh-token");
        assert_eq!(vault.resolve_submission("", Some(&stored)).unwrap(), "");
        assert_eq!(vault.resolve_submission("*****", None).unwrap(), "");
    }

    #[test]
    fn test_token_debug_is_masked() {
        let token = ApiToken::new("secret-token-value");
        assert_eq!(format!("{:?}", token), "ApiToken(\"secre*************\")");
    }
}
