//! Action API client.
//!
//! Provides a sync HTTP client for a MediaWiki Action API endpoint with
//! OAuth 1.0a authentication. One client serves as both the
//! [`CredentialProvider`](crate::CredentialProvider) and the
//! [`RemoteEditClient`](crate::RemoteEditClient) of a live deployment.

mod edits;
mod tokens;

use std::time::Duration;

use isa_config::CommonsConfig;
use serde::Deserialize;
use ureq::Agent;

use crate::error::CommonsError;
use crate::oauth::Consumer;

/// Action API client.
pub struct CommonsClient {
    agent: Agent,
    api_url: String,
    user_agent: String,
    consumer: Consumer,
}

impl CommonsClient {
    /// Create client for an API endpoint.
    ///
    /// # Arguments
    /// * `api_url` - Action API endpoint (`https://host/w/api.php`), no query string
    /// * `user_agent` - `User-Agent` header value
    /// * `timeout` - Global per-request timeout
    /// * `consumer` - Registered OAuth consumer
    ///
    /// # Errors
    ///
    /// Returns [`CommonsError::InvalidUrl`] if `api_url` is not an absolute URL.
    pub fn new(
        api_url: &str,
        user_agent: &str,
        timeout: Duration,
        consumer: Consumer,
    ) -> Result<Self, CommonsError> {
        let uri: ureq::http::Uri = api_url
            .parse()
            .map_err(|e| CommonsError::InvalidUrl(format!("{api_url}: {e}")))?;
        if uri.scheme().is_none() || uri.host().is_none() || uri.query().is_some() {
            return Err(CommonsError::InvalidUrl(format!(
                "{api_url}: expected an absolute URL without query string"
            )));
        }

        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            api_url: api_url.to_owned(),
            user_agent: user_agent.to_owned(),
            consumer,
        })
    }

    /// Create client from the `[commons]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`CommonsError::Config`] if the consumer is not configured, or a
    /// key error if the RSA private key cannot be loaded.
    pub fn from_config(config: &CommonsConfig) -> Result<Self, CommonsError> {
        config.validate()?;

        let consumer = match (&config.consumer_secret, &config.private_key_file) {
            (Some(secret), _) => Consumer::hmac(&config.consumer_key, secret),
            (None, Some(key_file)) => Consumer::rsa_from_file(&config.consumer_key, key_file)?,
            (None, None) => {
                return Err(isa_config::ConfigError::Validation(
                    "commons.consumer_secret or commons.private_key_file is required".to_owned(),
                )
                .into());
            }
        };

        Self::new(
            &config.api_url,
            &config.user_agent,
            config.timeout(),
            consumer,
        )
    }

    /// API endpoint.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// `error` object of an Action API response.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    #[serde(default)]
    info: String,
}

impl From<ApiErrorBody> for CommonsError {
    fn from(error: ApiErrorBody) -> Self {
        Self::Api {
            code: error.code,
            info: error.info,
        }
    }
}

/// Read a response body, mapping HTTP error statuses.
fn read_body(response: ureq::http::Response<ureq::Body>) -> Result<String, CommonsError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(CommonsError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_to_string()?)
}
