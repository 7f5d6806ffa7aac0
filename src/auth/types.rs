//! Auth configuration types
//!
//! Runtime auth settings built from resolved secrets.

use crate::error::{Error, Result};
use crate::secrets::SecretValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default OAuth token endpoint for Google service accounts
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google service account key, as downloaded from the cloud console
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email, used as the JWT issuer
    pub client_email: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// Key identifier, sent as the JWT `kid`
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Owning project
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::auth(format!("Invalid service account key: {e}")))
    }

    /// Parse a key from a resolved secret
    pub fn from_secret(secret: &SecretValue) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(secret.as_map().clone()))
            .map_err(|e| Error::auth(format!("Invalid service account key: {e}")))
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Static API key in a header
    ApiKey {
        /// Header name
        header: String,
        /// Prefix placed before the key (e.g. "Klaviyo-API-Key ")
        prefix: Option<String>,
        /// The API key value
        value: String,
    },

    /// Service account JWT exchanged for an access token
    ServiceAccount {
        /// The signing key
        key: ServiceAccountKey,
        /// OAuth scopes requested
        scopes: Vec<String>,
        /// User to impersonate (domain-wide delegation)
        subject: Option<String>,
        /// Token lifetime in seconds
        token_lifetime_seconds: u64,
    },
}

impl AuthConfig {
    /// Create a service account config with a one hour token lifetime
    pub fn service_account(
        key: ServiceAccountKey,
        scopes: &[&str],
        subject: Option<String>,
    ) -> Self {
        Self::ServiceAccount {
            key,
            scopes: scopes.iter().map(|s| (*s).to_string()).collect(),
            subject,
            token_lifetime_seconds: 3600,
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
