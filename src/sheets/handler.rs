//! Function-style request handler for header extraction
//!
//! Accepts an event whose `body` is a JSON string and always answers with a
//! status code and a JSON body; failures become a 500 response instead of
//! an error.

use super::client::SheetsClient;
use crate::auth::ServiceAccountKey;
use crate::config::GoogleConfig;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

/// Incoming event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandlerEvent {
    /// JSON-encoded [`ColumnRequest`]
    #[serde(default)]
    pub body: Option<String>,
}

/// Fields of the request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnRequest {
    pub sheet_id: Option<String>,
    pub sheet_name: Option<String>,
    /// Either a key object or its JSON text
    pub service_account_key: Option<JsonValue>,
    pub delegated_email: Option<String>,
}

/// Handler reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

/// Successful body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnResponse {
    pub success: bool,
    pub sheet_id: String,
    pub sheet_name: Option<String>,
    pub columns: Vec<JsonValue>,
    pub column_count: usize,
}

/// Failure body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_type: String,
}

/// Validated request
struct ValidRequest {
    sheet_id: String,
    sheet_name: Option<String>,
    key: ServiceAccountKey,
    delegated_email: String,
}

impl ColumnRequest {
    fn validate(self) -> Result<ValidRequest> {
        let sheet_id = required(self.sheet_id, "sheet_id")?;
        let key = match self.service_account_key {
            Some(JsonValue::String(text)) if !text.is_empty() => ServiceAccountKey::from_json(&text)?,
            Some(value @ JsonValue::Object(_)) => serde_json::from_value(value)
                .map_err(|e| Error::auth(format!("Invalid service account key: {e}")))?,
            _ => return Err(Error::config("Missing service_account_key")),
        };
        let delegated_email = required(self.delegated_email, "delegated_email")?;

        Ok(ValidRequest {
            sheet_id,
            sheet_name: self.sheet_name,
            key,
            delegated_email,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::config(format!("Missing {field}")))
}

/// Handle one event
pub async fn handle_event(
    event: &HandlerEvent,
    google: &GoogleConfig,
    timeout: Duration,
) -> HandlerResponse {
    match process(event, google, timeout).await {
        Ok(body) => respond(200, &body),
        Err(e) => {
            error!("Handler execution failed: {e}");
            respond(
                500,
                &ErrorResponse {
                    success: false,
                    error: e.to_string(),
                    error_type: "internal_error".to_string(),
                },
            )
        }
    }
}

async fn process(
    event: &HandlerEvent,
    google: &GoogleConfig,
    timeout: Duration,
) -> Result<ColumnResponse> {
    let body = event
        .body
        .as_deref()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| Error::config("Request body is missing"))?;
    let request: ColumnRequest = serde_json::from_str(body)?;
    let request = request.validate()?;

    let client = SheetsClient::new(
        request.key,
        &request.delegated_email,
        &google.sheets_base_url,
        timeout,
    )?;
    let columns = client
        .get_sheet_columns(&request.sheet_id, request.sheet_name.as_deref())
        .await?;

    Ok(ColumnResponse {
        success: true,
        column_count: columns.len(),
        sheet_id: request.sheet_id,
        sheet_name: request.sheet_name,
        columns,
    })
}

fn respond<T: Serialize>(status_code: u16, body: &T) -> HandlerResponse {
    HandlerResponse {
        status_code,
        body: serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string()),
    }
}
