use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Catalog entry exactly as it appears in the source document.
/// Every field is optional and untyped; the normalizer decides what to keep.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAddonRecord {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub shortdescription: Option<Value>,
    pub longdescription: Option<Value>,
    #[serde(rename = "type")]
    pub addon_type: Option<Value>,
    pub version: Option<Value>,
    pub author: Option<Value>,
    pub file: Option<Value>,
    pub icon: Option<Value>,
    pub id: Option<Value>,
    pub color: Option<Value>,
    #[serde(rename = "minAppVersion")]
    pub min_app_version: Option<Value>,
    pub screenshots: Option<Value>,
}

/// Whether an addon is downloadable directly or has to be purchased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonType {
    #[default]
    Free,
    Paid,
}

impl AddonType {
    /// Only the literal `"paid"` grants paid behavior
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            Some("paid") => AddonType::Paid,
            _ => AddonType::Free,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AddonType::Free => "free",
            AddonType::Paid => "paid",
        }
    }

    /// Upper-case tag shown on cards
    pub fn label(self) -> &'static str {
        match self {
            AddonType::Free => "FREE",
            AddonType::Paid => "PAID",
        }
    }
}

impl fmt::Display for AddonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical addon record, produced only by the normalizer.
///
/// Serializes with the same field names the catalog document uses, so a
/// serialized catalog is valid loader input again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Addon {
    /// Link key, unique within the catalog this addon was loaded with
    pub key: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "longdescription", skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(rename = "type")]
    pub addon_type: AddonType,
    pub version: String,
    pub author: String,
    /// `"#"` when a free addon has no download target, `""` for paid addons without one
    pub file: String,
    /// Empty when the addon has no icon
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "minAppVersion", skip_serializing_if = "Option::is_none")]
    pub min_app_version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<String>,
}

impl Addon {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_paid(&self) -> bool {
        self.addon_type == AddonType::Paid
    }

    /// Case-insensitive substring match on name or description.
    /// `needle` must already be trimmed and lower-cased.
    pub fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
