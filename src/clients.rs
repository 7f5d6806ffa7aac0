//! Secret-backed client construction
//!
//! Each vendor handle is built from a named secret. Failures are logged with
//! the client they were for and returned unchanged to the caller.

use crate::auth::{AuthConfig, Authenticator, ServiceAccountKey};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::klaviyo::KlaviyoClient;
use crate::secrets::{SecretProvider, SecretValue};
use crate::sheets::SheetsClient;
use tracing::error;

/// OAuth scope for the Sheets API
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// OAuth scope for BigQuery and other cloud-platform APIs
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Secret holding the Sheets service account
pub const SHEETS_SECRET: &str = "gcp/sheets";

/// Secret holding the BigQuery service account
pub const BIGQUERY_SECRET: &str = "gcp/bigquery";

/// Secret holding the Trello key and token
pub const TRELLO_SECRET: &str = "trello/api_keys";

/// Name of the Klaviyo secret for a dataset
pub fn klaviyo_secret_name(dataset_id: &str) -> String {
    format!("klaviyo/{dataset_id}_create_campaigns")
}

/// Builds vendor clients from secrets
#[derive(Debug)]
pub struct ClientProvider<P> {
    secrets: P,
    config: AppConfig,
}

impl<P: SecretProvider> ClientProvider<P> {
    /// Create a provider backed by `secrets`
    pub fn new(secrets: P, config: AppConfig) -> Self {
        Self { secrets, config }
    }

    /// The configuration clients are built with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The secret provider
    pub fn secrets(&self) -> &P {
        &self.secrets
    }

    /// Klaviyo client for one dataset, with optional retry tuning
    pub async fn klaviyo_client(
        &self,
        dataset_id: &str,
        max_delay: Option<u64>,
        max_retries: Option<u32>,
    ) -> Result<KlaviyoClient> {
        let secret = self.secrets.get_secret(&klaviyo_secret_name(dataset_id)).await?;
        let build = || -> Result<KlaviyoClient> {
            let api_key = secret
                .api_key()
                .ok_or_else(|| Error::client("Klaviyo", "secret has no api_key or value"))?;
            let config = self
                .config
                .klaviyo
                .clone()
                .with_retry_overrides(max_delay, max_retries);
            KlaviyoClient::new(api_key, &config, self.config.http.timeout())
        };
        build().inspect_err(|e| error!("Could not create Klaviyo client. Error: {e}"))
    }

    /// Sheets client acting as `delegated_email`, or the configured default
    pub async fn sheets_client(&self, delegated_email: Option<&str>) -> Result<SheetsClient> {
        let secret = self.secrets.get_secret(SHEETS_SECRET).await?;
        let subject = delegated_email.unwrap_or(&self.config.google.delegated_email);
        self.sheets_client_from_secret(&secret, subject)
            .inspect_err(|e| error!("Could not create Google Sheets client. Error: {e}"))
    }

    /// Sheets client from an already resolved service account secret
    pub fn sheets_client_from_secret(
        &self,
        secret: &SecretValue,
        delegated_email: &str,
    ) -> Result<SheetsClient> {
        let key = ServiceAccountKey::from_secret(secret)?;
        SheetsClient::new(
            key,
            delegated_email,
            &self.config.google.sheets_base_url,
            self.config.http.timeout(),
        )
    }

    /// Authenticator for cloud-platform APIs such as BigQuery
    pub async fn bigquery_authenticator(&self) -> Result<Authenticator> {
        let secret = self.secrets.get_secret(BIGQUERY_SECRET).await?;
        let key = ServiceAccountKey::from_secret(&secret)
            .inspect_err(|e| error!("Could not create Google client. Error: {e}"))?;
        Ok(Authenticator::new(AuthConfig::service_account(
            key,
            &[CLOUD_PLATFORM_SCOPE],
            None,
        )))
    }

    /// Raw Trello credentials
    pub async fn trello_credentials(&self) -> Result<SecretValue> {
        self.secrets
            .get_secret(TRELLO_SECRET)
            .await
            .inspect_err(|e| error!("Could not retrieve Trello API credentials. Error: {e}"))
    }
}
