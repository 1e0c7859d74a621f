//! Data source descriptors used to suggest `dataBinding` values.
//!
//! The engine never resolves bindings; it only offers names for a field's
//! binding picker.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Names whose name or label contains `query` (case-insensitive), in
/// source order. An empty query matches everything.
pub fn suggest_bindings<'a>(sources: &'a [DataSourceField], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    sources
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.name.to_lowercase().contains(&needle)
                || s.label.to_lowercase().contains(&needle)
        })
        .map(|s| s.name.as_str())
        .collect()
}
