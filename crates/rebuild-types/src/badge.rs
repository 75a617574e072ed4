//! shields.io endpoint badge document

use serde::{Deserialize, Serialize};

/// A shields.io endpoint badge (schemaVersion 1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub schema_version: u32,
    pub label: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label_color: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo_svg: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub style: String,
}
