//! Spreadsheet access
//!
//! Header-row extraction from Google Sheets, plus a request/response
//! handler wrapping it for function-style deployment.

mod client;
mod handler;

pub use client::SheetsClient;
pub use handler::{
    handle_event, ColumnRequest, ColumnResponse, ErrorResponse, HandlerEvent, HandlerResponse,
};
