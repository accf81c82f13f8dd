use crate::error::CatalogError;
use crate::models::{Addon, AddonType, RawAddonRecord};
use serde_json::Value;
use std::collections::HashSet;

pub const DEFAULT_NAME: &str = "Unnamed Addon";
pub const DEFAULT_DESCRIPTION: &str = "No description available.";
pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_AUTHOR: &str = "Unknown";
/// Download target of a free addon that ships no file
pub const NO_FILE: &str = "#";

/// Turns a parsed catalog document into canonical addons, preserving order
pub fn normalize(document: Value) -> Result<Vec<Addon>, CatalogError> {
    let entries = match document {
        Value::Array(entries) => entries,
        other => {
            return Err(CatalogError::InvalidFormat {
                found: json_kind(&other),
            })
        }
    };

    let mut addons: Vec<Addon> = entries.into_iter().map(normalize_entry).collect();
    assign_keys(&mut addons);
    Ok(addons)
}

/// Gives every addon a link key that no other addon of the catalog shares:
/// the explicit id, else a slug of the name, else `addon-<position>`.
/// Repeated keys get a `-2`, `-3`, ... suffix in catalog order.
fn assign_keys(addons: &mut [Addon]) {
    let mut taken = HashSet::with_capacity(addons.len());

    for (index, addon) in addons.iter_mut().enumerate() {
        let base = match &addon.id {
            Some(id) => id.clone(),
            None => slugify(&addon.name),
        };
        let base = if base.is_empty() {
            format!("addon-{}", index + 1)
        } else {
            base
        };

        let mut key = base.clone();
        let mut suffix = 2;
        while taken.contains(&key) {
            key = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        taken.insert(key.clone());
        addon.key = key;
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Normalizes a single catalog entry. Entries that are not objects carry no
/// usable fields and come out fully defaulted.
fn normalize_entry(entry: Value) -> Addon {
    let raw: RawAddonRecord = if entry.is_object() {
        serde_json::from_value(entry).unwrap_or_default()
    } else {
        tracing::debug!("Catalog entry is {}, using defaults", json_kind(&entry));
        RawAddonRecord::default()
    };

    normalize_record(raw)
}

/// Canonical fields of one record. The key is left empty until
/// `assign_keys` has seen the whole catalog.
fn normalize_record(raw: RawAddonRecord) -> Addon {
    let addon_type = AddonType::classify(text(&raw.addon_type).as_deref());
    let long_description = text(&raw.longdescription);

    let description = text(&raw.description)
        .or_else(|| text(&raw.shortdescription))
        .or_else(|| long_description.clone())
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    let file = text(&raw.file).unwrap_or_else(|| match addon_type {
        AddonType::Free => NO_FILE.to_string(),
        AddonType::Paid => String::new(),
    });

    Addon {
        key: String::new(),
        name: text(&raw.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
        description,
        long_description,
        addon_type,
        version: text(&raw.version).unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        author: text(&raw.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        file,
        icon: text(&raw.icon).unwrap_or_default(),
        id: text(&raw.id),
        color: text(&raw.color),
        min_app_version: text(&raw.min_app_version),
        screenshots: url_list(&raw.screenshots),
    }
}

/// Trimmed text of a scalar field. Blank strings and non-scalar values are absent.
fn text(value: &Option<Value>) -> Option<String> {
    let text = match value.as_ref()? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}

fn url_list(value: &Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
