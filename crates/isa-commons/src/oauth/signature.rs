//! OAuth 1.0a signature generation (RFC 5849).

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use rand::RngExt;
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha1::Sha1;

use super::SignatureMethod;
use crate::error::CommonsError;

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode string per RFC 3986.
pub(crate) fn oauth_encode(input: &str) -> String {
    percent_encode(input.as_bytes(), OAUTH_ENCODE_SET).to_string()
}

/// Generate cryptographically random nonce (32 hex characters).
fn generate_nonce() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

/// Generate Unix timestamp.
fn generate_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Sign data with HMAC-SHA1 and return base64-encoded signature.
///
/// The key is `encode(consumer_secret)&encode(token_secret)` (RFC 5849 Section 3.4.2).
fn sign_hmac_sha1(
    consumer_secret: &str,
    token_secret: &str,
    data: &str,
) -> Result<String, CommonsError> {
    let key = format!(
        "{}&{}",
        oauth_encode(consumer_secret),
        oauth_encode(token_secret)
    );
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| CommonsError::Authentication(format!("HMAC key rejected: {e}")))?;
    mac.update(data.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

/// Sign data with RSA-SHA1 and return base64-encoded signature.
fn sign_rsa_sha1(private_key: &RsaPrivateKey, data: &str) -> String {
    let signing_key = SigningKey::<Sha1>::new(private_key.clone());
    let signature = signing_key.sign(data.as_bytes());
    BASE64_STANDARD.encode(signature.to_bytes())
}

/// Build OAuth signature base string per RFC 5849 Section 3.4.1.
///
/// Format: `HTTP_METHOD&encoded_base_url&encoded_parameters`
fn build_signature_base_string(
    method: &str,
    base_url: &str,
    params: &[(String, String)],
) -> String {
    // Normalize parameters: encode keys/values, sort by key then value
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (oauth_encode(k), oauth_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        oauth_encode(base_url),
        oauth_encode(&param_string)
    )
}

/// Build OAuth Authorization header from OAuth params.
fn build_authorization_header(oauth_params: &[(String, String)]) -> String {
    let header_parts: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, oauth_encode(v)))
        .collect();
    format!("OAuth {}", header_parts.join(", "))
}

/// Create OAuth Authorization header value.
///
/// # Arguments
/// * `method` - HTTP method (GET, POST, etc.)
/// * `base_url` - URL without query string (<scheme://host/path>)
/// * `request_params` - Query and form-encoded body parameters
/// * `consumer_key` - OAuth consumer key
/// * `signature_method` - Consumer signing material
/// * `token` - OAuth access token
/// * `token_secret` - OAuth access token secret (ignored by RSA-SHA1)
pub(crate) fn create_authorization_header(
    method: &str,
    base_url: &str,
    request_params: &[(String, String)],
    consumer_key: &str,
    signature_method: &SignatureMethod,
    token: &str,
    token_secret: &str,
) -> Result<String, CommonsError> {
    let mut oauth_params = vec![
        ("oauth_consumer_key".to_owned(), consumer_key.to_owned()),
        ("oauth_nonce".to_owned(), generate_nonce()),
        (
            "oauth_signature_method".to_owned(),
            signature_method.name().to_owned(),
        ),
        ("oauth_timestamp".to_owned(), generate_timestamp()),
        ("oauth_token".to_owned(), token.to_owned()),
        ("oauth_version".to_owned(), "1.0".to_owned()),
    ];

    // Signature covers OAuth params plus request params (RFC 5849 Section 3.4.1.3)
    let mut signature_params = oauth_params.clone();
    signature_params.extend(request_params.iter().cloned());

    let base_string = build_signature_base_string(method, base_url, &signature_params);
    let signature = match signature_method {
        SignatureMethod::HmacSha1 { consumer_secret } => {
            sign_hmac_sha1(consumer_secret, token_secret, &base_string)?
        }
        SignatureMethod::RsaSha1 { private_key } => sign_rsa_sha1(private_key, &base_string),
    };
    oauth_params.push(("oauth_signature".to_owned(), signature));

    Ok(build_authorization_header(&oauth_params))
}
