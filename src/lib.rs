// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # saas-bridge
//!
//! Secret-backed clients for the SaaS services our automation talks to.
//!
//! Credentials live in AWS Secrets Manager. Each client is built from a named
//! secret, and the Klaviyo client walks cursor-paginated collections (tags and
//! segments) until the API stops returning a `next` link.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use saas_bridge::clients::ClientProvider;
//! use saas_bridge::config::AppConfig;
//! use saas_bridge::klaviyo::fetch_resources;
//! use saas_bridge::pagination::PaginatedFetcher;
//! use saas_bridge::secrets::AwsSecretsManager;
//!
//! #[tokio::main]
//! async fn main() -> saas_bridge::Result<()> {
//!     let config = AppConfig::default();
//!     let secrets = AwsSecretsManager::new(&config.secrets.region).await;
//!     let provider = ClientProvider::new(secrets, config);
//!
//!     let tags = fetch_resources(&provider, "invigor8", "tags", &PaginatedFetcher::new()).await?;
//!     for tag in &tags.items {
//!         println!("- {} (ID: {})", tag.name, tag.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  ClientProvider (clients)                  │
//! │   secret name → SecretValue → vendor client               │
//! └───────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬──────────┬───────┴──────┬────────────┬─────────┐
//! │ Secrets  │   Auth   │    HTTP      │ Pagination │ Vendors │
//! ├──────────┼──────────┼──────────────┼────────────┼─────────┤
//! │ AWS SM   │ API Key  │ Retry        │ Cursor     │ Klaviyo │
//! │ Static   │ SA JWT   │ Rate Limit   │ Observer   │ Sheets  │
//! │          │          │ Backoff      │            │         │
//! └──────────┴──────────┴──────────────┴────────────┴─────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication (API keys, service accounts)
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Secret retrieval
pub mod secrets;

/// Application configuration
pub mod config;

/// Klaviyo tags and segments
pub mod klaviyo;

/// Google Sheets header extraction
pub mod sheets;

/// Secret-backed client construction
pub mod clients;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use clients::ClientProvider;
pub use config::{load_config, AppConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
