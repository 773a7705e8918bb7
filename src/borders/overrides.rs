//! Canonical code overrides for features with inconsistent ISO codes.

use hashbrown::HashMap;
use serde::Deserialize;

use crate::models::is_assigned_code;

/// Data table mapping raw codes and display names to canonical codes.
///
/// `by_code` is consulted first on the raw code. `by_name` only fills in codes
/// that are still the sentinel afterwards.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CodeOverrides {
    #[serde(default)]
    pub by_code: HashMap<String, String>,

    #[serde(default)]
    pub by_name: HashMap<String, String>,
}

impl CodeOverrides {
    /// Overrides for the Natural Earth features published with `-99`
    pub fn natural_earth() -> Self {
        let by_name = [("France", "FR"), ("Norway", "NO"), ("Kosovo", "XK")]
            .into_iter()
            .map(|(name, code)| (name.to_string(), code.to_string()))
            .collect();

        Self {
            by_code: HashMap::new(),
            by_name,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty() && self.by_name.is_empty()
    }

    /// Canonical code for a raw `(code, name)` pair
    pub fn canonical(&self, code: &str, name: &str) -> String {
        let code = code.trim();
        let code = self.by_code.get(code).map(String::as_str).unwrap_or(code);

        if !is_assigned_code(code) {
            if let Some(named) = self.by_name.get(name.trim()) {
                return named.clone();
            }
        }

        code.to_string()
    }
}
