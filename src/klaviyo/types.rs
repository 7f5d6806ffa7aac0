//! Klaviyo resource kinds and JSON:API response shapes

use crate::error::{Error, Result};
use crate::pagination::Page;
use crate::types::{JsonObject, JsonValue, ResourceItem};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Listing endpoints the fetcher knows how to page through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `/api/tags/`
    Tags,
    /// `/api/segments/`
    Segments,
}

impl ResourceKind {
    /// All supported kinds, in the order they are fetched for `all`
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Tags, ResourceKind::Segments];

    /// Plural label, as accepted by `FromStr`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Segments => "segments",
        }
    }

    /// Endpoint path relative to the API base URL
    pub fn path(self) -> &'static str {
        match self {
            Self::Tags => "/tags/",
            Self::Segments => "/segments/",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tags" => Ok(Self::Tags),
            "segments" => Ok(Self::Segments),
            other => Err(Error::unsupported_resource(other)),
        }
    }
}

/// Body of a JSON:API listing response
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    data: Vec<ResourceObject>,
    #[serde(default)]
    links: Option<ListLinks>,
}

#[derive(Debug, Deserialize)]
struct ResourceObject {
    #[serde(rename = "type")]
    resource_type: String,
    id: String,
    #[serde(default)]
    attributes: JsonObject,
}

#[derive(Debug, Deserialize)]
struct ListLinks {
    #[serde(default)]
    next: Option<String>,
}

impl ResourceObject {
    fn into_item(self) -> ResourceItem {
        let name = self
            .attributes
            .get("name")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        ResourceItem {
            resource_type: self.resource_type,
            id: self.id,
            name,
            attributes: self.attributes,
        }
    }
}

impl ListResponse {
    /// Convert into a page, keeping the next link as sent
    pub(crate) fn into_page(self) -> Page {
        Page::new(
            self.data.into_iter().map(ResourceObject::into_item).collect(),
            self.links.and_then(|links| links.next),
        )
    }
}
