//! Error types for platform access.

use std::str::Utf8Error;

/// Error from Action API operations.
#[derive(Debug, thiserror::Error)]
pub enum CommonsError {
    /// No long-lived access credential for the session.
    #[error("no access credential for this session")]
    MissingAccessCredential,

    /// The platform refused to mint an edit token for the credential.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// The Action API answered with an `error` object.
    #[error("API error {code}: {info}")]
    Api {
        /// Machine-readable error code (e.g. `editconflict`).
        code: String,
        /// Human-readable description.
        info: String,
    },

    /// Edit response carried no revision id.
    #[error("edit response carried no revision id")]
    MissingRevision,

    /// RSA key loading/parsing error.
    #[error("RSA key error")]
    RsaKey(#[from] RsaKeyError),

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Platform configuration is incomplete.
    #[error(transparent)]
    Config(#[from] isa_config::ConfigError),

    /// API URL could not be parsed.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl CommonsError {
    /// Whether the failure was a transport timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::HttpRequest(ureq::Error::Timeout(_)))
    }
}

/// RSA key loading/parsing error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RsaKeyError {
    /// Invalid UTF-8 in key file.
    #[error("invalid UTF-8 in key")]
    InvalidUtf8(#[from] Utf8Error),

    /// PKCS#1 key parsing error.
    #[error("PKCS#1 key error")]
    Pkcs1(#[from] rsa::pkcs1::Error),

    /// PKCS#8 key parsing error (returned when both formats fail).
    #[error("PKCS#8 key error")]
    Pkcs8(#[from] rsa::pkcs8::Error),
}
