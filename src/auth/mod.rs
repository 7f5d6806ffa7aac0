//! Authentication module
//!
//! Supports: API key headers and Google service accounts (with optional
//! domain-wide delegation).
//!
//! The `Authenticator` applies credentials to requests and caches access
//! tokens for the service account flow.

mod authenticator;
mod types;

pub use authenticator::{sign_assertion, Authenticator};
pub use types::{AuthConfig, CachedToken, ServiceAccountKey, GOOGLE_TOKEN_URI};

#[cfg(test)]
mod tests;
