//! Secret providers
//!
//! `AwsSecretsManager` talks to AWS Secrets Manager; `StaticSecretProvider`
//! serves secrets from memory for tests and local runs.

use super::types::{parse_secret_string, SecretValue};
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use std::collections::HashMap;
use tracing::{debug, error, info, info_span, Instrument};

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-2";

/// Resolves secret names to their contents
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the raw secret string
    async fn get_secret_string(&self, name: &str) -> Result<String>;

    /// Fetch and parse a secret
    async fn get_secret(&self, name: &str) -> Result<SecretValue> {
        let raw = self.get_secret_string(name).await?;
        Ok(parse_secret_string(&raw))
    }
}

/// AWS Secrets Manager provider
pub struct AwsSecretsManager {
    client: SecretsManagerClient,
    region: String,
}

impl std::fmt::Debug for AwsSecretsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsManager")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsSecretsManager {
    /// Create a client using the default AWS credential chain
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self::from_client(SecretsManagerClient::new(&sdk_config), region)
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: SecretsManagerClient, region: &str) -> Self {
        Self {
            client,
            region: region.to_string(),
        }
    }

    /// Region this provider reads from
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl SecretProvider for AwsSecretsManager {
    async fn get_secret_string(&self, name: &str) -> Result<String> {
        let span = info_span!("aws.secret.get", secret.name = name, region = %self.region);

        async move {
            info!("Getting secret value for {name}");
            let response = self
                .client
                .get_secret_value()
                .secret_id(name)
                .send()
                .await
                .map_err(|e| {
                    let err = if e.code() == Some("ResourceNotFoundException") {
                        Error::SecretNotFound {
                            name: name.to_string(),
                        }
                    } else {
                        Error::secret_access(name, DisplayErrorContext(&e).to_string())
                    };
                    error!("Failed to retrieve secret '{name}'. Error: {err}");
                    err
                })?;

            if let Some(value) = response.secret_string() {
                return Ok(value.to_string());
            }
            if let Some(blob) = response.secret_binary() {
                debug!("Secret '{name}' is binary, decoding as UTF-8");
                return Ok(String::from_utf8_lossy(blob.as_ref()).into_owned());
            }
            Err(Error::secret_access(
                name,
                "Secret has no string or binary value",
            ))
        }
        .instrument(span)
        .await
    }
}

/// In-memory provider
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    secrets: HashMap<String, String>,
}

impl StaticSecretProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret
    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn get_secret_string(&self, name: &str) -> Result<String> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| Error::SecretNotFound {
                name: name.to_string(),
            })
    }
}
