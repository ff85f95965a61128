//! Wikimedia Commons access for ISA.
//!
//! This crate talks to a MediaWiki Action API endpoint on behalf of a
//! signed-in contributor:
//!
//! - [`CredentialProvider`] mints a fresh CSRF token and request signer for
//!   every edit (OAuth 1.0a, HMAC-SHA1 or RSA-SHA1 consumers)
//! - [`RemoteEditClient`] performs one `wbsetclaim`, `wbremoveclaims` or
//!   `wbsetlabel` call and returns the new [`RevisionId`]
//! - [`CommonsClient`] implements both against the live API
//! - [`SimulatedCredentials`] and [`SimulatedEditClient`] replace the
//!   network path in simulation mode
//! - [`StaticCredentials`] and [`ScriptedEditClient`] for testing (behind
//!   `mock` feature flag)

mod client;
mod credentials;
mod edit;
mod error;
#[cfg(feature = "mock")]
mod mock;
mod oauth;
mod types;

pub use client::CommonsClient;
pub use credentials::{
    CredentialProvider, EditCredentials, SIMULATED_CSRF_TOKEN, SimulatedCredentials,
};
pub use edit::{EditRequest, RemoteEditClient, SimulatedEditClient};
pub use error::{CommonsError, RsaKeyError};
#[cfg(feature = "mock")]
pub use mock::{ScriptedEditClient, StaticCredentials};
pub use oauth::{Consumer, RequestSigner, SignatureMethod};
pub use types::{AccessCredential, EditAction, ParseEditActionError, RevisionId};
