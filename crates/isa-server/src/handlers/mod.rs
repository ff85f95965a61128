//! HTTP request handlers.

pub(crate) mod contributions;
pub(crate) mod suggestions;
