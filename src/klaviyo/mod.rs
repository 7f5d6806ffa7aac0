//! Klaviyo marketing platform
//!
//! Tag and segment listings, walked to completion with the
//! [`PaginatedFetcher`](crate::pagination::PaginatedFetcher).

mod client;
mod types;

pub use client::{KlaviyoClient, ResourcePageSource};
pub use types::ResourceKind;

use crate::clients::ClientProvider;
use crate::error::Result;
use crate::pagination::{FetchOutcome, PaginatedFetcher};
use crate::secrets::SecretProvider;

/// Fetch every resource of `kind` for a dataset
///
/// `kind` is validated before the secret is read, so an unsupported kind
/// never touches the network.
pub async fn fetch_resources<P: SecretProvider>(
    provider: &ClientProvider<P>,
    dataset_id: &str,
    kind: &str,
    fetcher: &PaginatedFetcher,
) -> Result<FetchOutcome> {
    let kind: ResourceKind = kind.parse()?;
    let client = provider.klaviyo_client(dataset_id, None, None).await?;
    fetch_with_client(&client, kind, fetcher).await
}

/// Fetch every resource of `kind` with an existing client
pub async fn fetch_with_client(
    client: &KlaviyoClient,
    kind: ResourceKind,
    fetcher: &PaginatedFetcher,
) -> Result<FetchOutcome> {
    fetcher.fetch_all(&client.pages(kind), kind.as_str()).await
}
