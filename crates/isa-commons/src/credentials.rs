//! Per-call edit credentials.

use crate::error::CommonsError;
use crate::oauth::RequestSigner;
use crate::types::AccessCredential;

/// Credentials good for exactly one edit call.
#[derive(Debug, Clone)]
pub struct EditCredentials {
    /// Short-lived CSRF token sent as the `token` form field.
    pub csrf_token: String,
    /// Signer for the request carrying the edit. `None` in simulation.
    pub signer: Option<RequestSigner>,
}

/// Mints fresh credentials before every remote edit.
///
/// Implementations hold no per-batch state; each call performs its own
/// handshake.
pub trait CredentialProvider: Send + Sync {
    /// Mint credentials for one upcoming edit.
    ///
    /// # Errors
    ///
    /// Returns [`CommonsError::MissingAccessCredential`] when `access` is `None`,
    /// or another error when the platform rejects the handshake.
    fn mint(&self, access: Option<&AccessCredential>) -> Result<EditCredentials, CommonsError>;
}

/// Credential provider for simulation mode.
///
/// Performs no network I/O and does not require an access credential.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedCredentials;

/// CSRF token handed out in simulation mode.
pub const SIMULATED_CSRF_TOKEN: &str = "simulated+\\";

impl CredentialProvider for SimulatedCredentials {
    fn mint(&self, _access: Option<&AccessCredential>) -> Result<EditCredentials, CommonsError> {
        Ok(EditCredentials {
            csrf_token: SIMULATED_CSRF_TOKEN.to_owned(),
            signer: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_credentials_need_no_access() {
        let credentials = SimulatedCredentials.mint(None).unwrap();
        assert_eq!(credentials.csrf_token, SIMULATED_CSRF_TOKEN);
        assert!(credentials.signer.is_none());
    }
}
