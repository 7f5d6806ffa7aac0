//! Secret store access
//!
//! Secrets come back as strings in one of three shapes: a flat JSON object,
//! an object wrapping the real payload under `secret_value`, or a bare
//! string. [`parse_secret_string`] normalizes all three into a
//! [`SecretValue`] map.

mod provider;
mod types;

pub use provider::{AwsSecretsManager, SecretProvider, StaticSecretProvider, DEFAULT_REGION};
pub use types::{parse_secret_string, SecretValue};
