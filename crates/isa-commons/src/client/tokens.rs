//! CSRF token minting.

use serde::Deserialize;
use tracing::{debug, info};

use super::{ApiErrorBody, CommonsClient, read_body};
use crate::credentials::{CredentialProvider, EditCredentials};
use crate::error::CommonsError;
use crate::types::AccessCredential;

/// Token MediaWiki hands to anonymous sessions.
const ANONYMOUS_TOKEN: &str = "+\\";

#[derive(Debug, Deserialize)]
struct TokensResponse {
    error: Option<ApiErrorBody>,
    query: Option<TokensQuery>,
}

#[derive(Debug, Deserialize)]
struct TokensQuery {
    tokens: Tokens,
}

#[derive(Debug, Deserialize)]
struct Tokens {
    csrftoken: String,
}

/// Extract the CSRF token from a `meta=tokens` response body.
fn parse_token_response(body: &str) -> Result<String, CommonsError> {
    let response: TokensResponse = serde_json::from_str(body)?;

    if let Some(error) = response.error {
        return Err(CommonsError::Authentication(format!(
            "{}: {}",
            error.code, error.info
        )));
    }

    let token = response
        .query
        .map(|q| q.tokens.csrftoken)
        .ok_or_else(|| CommonsError::Authentication("response carried no CSRF token".to_owned()))?;

    if token == ANONYMOUS_TOKEN {
        return Err(CommonsError::Authentication(
            "access credential was not accepted".to_owned(),
        ));
    }

    Ok(token)
}

impl CredentialProvider for CommonsClient {
    fn mint(&self, access: Option<&AccessCredential>) -> Result<EditCredentials, CommonsError> {
        let access = access.ok_or(CommonsError::MissingAccessCredential)?;
        let signer = self.consumer.signer(access);

        let query: Vec<(String, String)> = [
            ("action", "query"),
            ("meta", "tokens"),
            ("type", "csrf"),
            ("format", "json"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();

        debug!(api_url = %self.api_url, "Requesting CSRF token");
        let auth_header = signer.sign("GET", &self.api_url, &query)?;

        let response = self
            .agent
            .get(&self.api_url)
            .query_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .header("Authorization", &auth_header)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()?;

        let csrf_token = parse_token_response(&read_body(response)?)?;
        info!("Minted CSRF token");

        Ok(EditCredentials {
            csrf_token,
            signer: Some(signer),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::oauth::Consumer;

    #[test]
    fn test_parse_token() {
        let body = r#"{"batchcomplete":"","query":{"tokens":{"csrftoken":"9ed1499d99c0c34c73faa07157b3b6075b427365+\\"}}}"#;
        assert_eq!(
            parse_token_response(body).unwrap(),
            "9ed1499d99c0c34c73faa07157b3b6075b427365+\\"
        );
    }

    #[test]
    fn test_parse_anonymous_token_is_rejected() {
        let body = r#"{"batchcomplete":"","query":{"tokens":{"csrftoken":"+\\"}}}"#;
        let err = parse_token_response(body).unwrap_err();
        assert!(matches!(err, CommonsError::Authentication(_)));
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"error":{"code":"mwoauth-invalid-authorization","info":"The authorization headers in your request are not valid"}}"#;
        let err = parse_token_response(body).unwrap_err();
        assert!(err.to_string().contains("mwoauth-invalid-authorization"));
    }

    #[test]
    fn test_parse_missing_query() {
        let err = parse_token_response(r#"{"batchcomplete":""}"#).unwrap_err();
        assert!(matches!(err, CommonsError::Authentication(_)));
    }

    #[test]
    fn test_mint_without_access_credential() {
        let client = CommonsClient::new(
            "https://commons.wikimedia.org/w/api.php",
            "ISA-test",
            Duration::from_secs(1),
            Consumer::hmac("k", "s"),
        )
        .unwrap_or_else(|_| panic!("valid client"));

        let err = client.mint(None).unwrap_err();

        assert!(matches!(err, CommonsError::MissingAccessCredential));
    }
}
