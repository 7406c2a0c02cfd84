use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The banner configuration, as exchanged via the JSON API
///
/// `style` and `bannerType` are transferred as plain strings, so that invalid values can be
/// reported as field-level validation errors instead of JSON deserialization errors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BannerConfiguration {
    pub enabled: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "contentGuests")]
    pub content_guests: Option<String>,
    #[serde(rename = "closeButton")]
    pub close_button: bool,
    pub style: String,
    #[serde(rename = "bannerType")]
    pub banner_type: String,
}

/// The decision whether and how the banner is shown for one kind of viewer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RenderDecision {
    pub show: bool,
    pub content: String,
    pub style: String,
    #[serde(rename = "closeButton")]
    pub close_button: bool,
}

/// Response body for a rejected configuration update: one message per offending field, keyed by
/// the settings key of the field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ValidationErrorResponse {
    #[serde(rename = "httpCode")]
    pub http_code: u16,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}
