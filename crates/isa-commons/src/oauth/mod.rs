//! OAuth 1.0a request signing for the Action API.
//!
//! Consumers registered with a shared secret sign with HMAC-SHA1; consumers
//! registered with a public key sign with RSA-SHA1.

pub(crate) mod key;
mod signature;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rsa::RsaPrivateKey;

use crate::error::CommonsError;
use crate::types::AccessCredential;

use signature::create_authorization_header;

/// Consumer signing material.
#[derive(Clone)]
pub enum SignatureMethod {
    /// HMAC-SHA1 keyed by the consumer secret and the access secret.
    HmacSha1 {
        /// OAuth consumer secret.
        consumer_secret: String,
    },
    /// RSA-SHA1 with the consumer's private key.
    RsaSha1 {
        /// Consumer private key.
        private_key: Arc<RsaPrivateKey>,
    },
}

impl SignatureMethod {
    /// `oauth_signature_method` value.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::HmacSha1 { .. } => "HMAC-SHA1",
            Self::RsaSha1 { .. } => "RSA-SHA1",
        }
    }
}

impl fmt::Debug for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registered OAuth consumer (the application itself).
#[derive(Debug, Clone)]
pub struct Consumer {
    key: String,
    method: SignatureMethod,
}

impl Consumer {
    /// HMAC-SHA1 consumer.
    pub fn hmac(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            method: SignatureMethod::HmacSha1 {
                consumer_secret: secret.into(),
            },
        }
    }

    /// RSA-SHA1 consumer with a pre-loaded private key.
    pub fn rsa(key: impl Into<String>, private_key: RsaPrivateKey) -> Self {
        Self {
            key: key.into(),
            method: SignatureMethod::RsaSha1 {
                private_key: Arc::new(private_key),
            },
        }
    }

    /// RSA-SHA1 consumer with the private key read from a PEM file.
    ///
    /// # Errors
    ///
    /// Returns [`CommonsError::Io`] or [`CommonsError::RsaKey`] if the key cannot be loaded.
    pub fn rsa_from_file(key: impl Into<String>, key_file: &Path) -> Result<Self, CommonsError> {
        let private_key = key::load_private_key_from_file(key_file)?;
        Ok(Self::rsa(key, private_key))
    }

    /// Consumer key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Signer acting on behalf of one user's access credential.
    pub fn signer(&self, access: &AccessCredential) -> RequestSigner {
        RequestSigner {
            consumer: self.clone(),
            token: access.key.clone(),
            token_secret: access.secret.clone(),
        }
    }
}

/// Signs requests for one consumer and one access credential.
#[derive(Clone)]
pub struct RequestSigner {
    consumer: Consumer,
    token: String,
    token_secret: String,
}

impl RequestSigner {
    /// Compute the `Authorization` header value for a request.
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `base_url` - URL without query string
    /// * `params` - Query parameters and form-encoded body parameters
    pub fn sign(
        &self,
        method: &str,
        base_url: &str,
        params: &[(String, String)],
    ) -> Result<String, CommonsError> {
        create_authorization_header(
            method,
            base_url,
            params,
            &self.consumer.key,
            &self.consumer.method,
            &self.token,
            &self.token_secret,
        )
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("consumer", &self.consumer.key)
            .field("method", &self.consumer.method)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signer_uses_access_token() {
        let consumer = Consumer::hmac("consumer", "consumer-secret");
        let signer = consumer.signer(&AccessCredential::new("user-token", "user-secret"));

        let header = signer
            .sign("GET", "https://commons.wikimedia.org/w/api.php", &[])
            .unwrap();

        assert!(header.contains("oauth_token=\"user-token\""));
        assert!(header.contains("oauth_consumer_key=\"consumer\""));
    }

    #[test]
    fn test_signer_debug_hides_secrets() {
        let consumer = Consumer::hmac("consumer", "consumer-secret");
        let signer = consumer.signer(&AccessCredential::new("user-token", "user-secret"));

        let debug = format!("{signer:?}");

        assert!(debug.contains("HMAC-SHA1"));
        assert!(!debug.contains("consumer-secret"));
        assert!(!debug.contains("user-secret"));
    }

    #[test]
    fn test_rsa_consumer_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consumer.pem");
        std::fs::write(&path, key::tests::TEST_PKCS8_KEY).unwrap();

        let consumer = Consumer::rsa_from_file("consumer", &path).unwrap();

        assert_eq!(consumer.key(), "consumer");
        assert_eq!(consumer.method.name(), "RSA-SHA1");
    }
}
