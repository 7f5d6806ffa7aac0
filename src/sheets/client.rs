//! Google Sheets client
//!
//! Reads header rows through the Sheets v4 REST API, authenticated as a
//! service account impersonating a workspace user.

use crate::auth::{AuthConfig, Authenticator, ServiceAccountKey};
use crate::clients::SHEETS_SCOPE;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::types::JsonValue;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// Authenticated handle to the Sheets API
#[derive(Debug)]
pub struct SheetsClient {
    http: HttpClient,
    delegated_email: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
}

impl SheetsClient {
    /// Build a client for `key`, impersonating `delegated_email`
    pub fn new(
        key: ServiceAccountKey,
        delegated_email: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let auth = Authenticator::new(AuthConfig::service_account(
            key,
            &[SHEETS_SCOPE],
            Some(delegated_email.to_string()),
        ));
        let config = HttpClientConfig::builder()
            .base_url(base_url)
            .timeout(timeout)
            .build();

        Ok(Self {
            http: HttpClient::with_auth(config, auth)?,
            delegated_email: delegated_email.to_string(),
        })
    }

    /// User the client acts as
    pub fn delegated_email(&self) -> &str {
        &self.delegated_email
    }

    /// Title of the first sheet in a spreadsheet
    pub async fn first_sheet_title(&self, sheet_id: &str) -> Result<String> {
        let url = format!("/spreadsheets/{}", urlencoding::encode(sheet_id));
        let metadata: SpreadsheetMetadata = self
            .http
            .get_json(&url, RequestConfig::new().query("fields", "sheets.properties.title"))
            .await?;

        metadata
            .sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| Error::decode(format!("Spreadsheet {sheet_id} has no sheets")))
    }

    /// Header cells of a sheet, unformatted
    ///
    /// Without a sheet name the first sheet is used. A sheet with no header
    /// row yields an empty list.
    pub async fn get_sheet_columns(
        &self,
        sheet_id: &str,
        sheet_name: Option<&str>,
    ) -> Result<Vec<JsonValue>> {
        let sheet_name = match sheet_name.filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                let title = self.first_sheet_title(sheet_id).await?;
                info!("Using first sheet: {title}");
                title
            }
        };

        let range = format!("{sheet_name}!1:1");
        let url = format!(
            "/spreadsheets/{}/values/{}",
            urlencoding::encode(sheet_id),
            urlencoding::encode(&range)
        );
        let values: ValueRange = self
            .http
            .get_json(
                &url,
                RequestConfig::new().query("valueRenderOption", "UNFORMATTED_VALUE"),
            )
            .await?;

        match values.values.into_iter().next() {
            Some(headers) if !headers.is_empty() => {
                info!("Found {} columns in sheet '{sheet_name}'", headers.len());
                Ok(headers)
            }
            _ => {
                warn!("No header row found in sheet '{sheet_name}'");
                Ok(Vec::new())
            }
        }
    }
}
