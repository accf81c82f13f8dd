use crate::models::{Addon, AddonType};
use std::fmt;
use std::str::FromStr;

/// Type selector of the catalog filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(AddonType),
}

impl TypeFilter {
    pub fn matches(self, addon_type: AddonType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => wanted == addon_type,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(addon_type) => addon_type.as_str(),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(TypeFilter::All),
            "free" => Ok(TypeFilter::Only(AddonType::Free)),
            "paid" => Ok(TypeFilter::Only(AddonType::Paid)),
            other => Err(format!(
                "Unknown addon type filter '{}' (expected all, free or paid)",
                other
            )),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the addons matching both the search text and the type selector,
/// in catalog order
pub fn filter<'a>(catalog: &'a [Addon], query: &str, selector: TypeFilter) -> Vec<&'a Addon> {
    let needle = query.trim().to_lowercase();

    catalog
        .iter()
        .filter(|addon| selector.matches(addon.addon_type) && addon.matches_text(&needle))
        .collect()
}
