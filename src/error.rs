//! Error types for saas-bridge
//!
//! Every public API returns `Result<T, Error>` where Error is defined here.
//! Variants are grouped the way failures surface to a caller: secret
//! resolution, client construction, HTTP calls, and pagination.

use thiserror::Error;

/// The main error type for saas-bridge
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Secret Errors
    // ============================================================================
    #[error("Secret '{name}' not found")]
    SecretNotFound { name: String },

    #[error("Failed to retrieve secret '{name}': {message}")]
    SecretAccess { name: String, message: String },

    // ============================================================================
    // Client Construction / Authentication Errors
    // ============================================================================
    #[error("Could not create {client} client: {message}")]
    ClientConstruction { client: String, message: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("JWT generation failed: {message}")]
    JwtGeneration { message: String },

    #[error("Token exchange failed: {message}")]
    TokenExchange { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Invalid resource_type. Must be 'tags' or 'segments', got '{kind}'")]
    UnsupportedResource { kind: String },

    #[error("Pagination for {kind} stopped early: next link has no cursor ({link})")]
    PaginationTruncated { kind: String, link: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a secret access error
    pub fn secret_access(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecretAccess {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a client construction error
    pub fn client(client: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ClientConstruction {
            client: client.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an unsupported resource error
    pub fn unsupported_resource(kind: impl Into<String>) -> Self {
        Self::UnsupportedResource { kind: kind.into() }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this error came from resolving a secret
    pub fn is_secret_error(&self) -> bool {
        matches!(
            self,
            Error::SecretNotFound { .. } | Error::SecretAccess { .. }
        )
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for saas-bridge
pub type Result<T> = std::result::Result<T, Error>;
