// Copyright (c) 2025 - Cowboy AI, Inc.
//! Free-Text Appliance Search
//!
//! An appliance matches when ANY of network name, inventory number, housing
//! name or cabinet name contains the query. Matching is case-insensitive
//! unless [`SearchQuery::case_sensitive`] is set. Surrounding whitespace is
//! ignored and an empty query matches every appliance.

use super::Appliance;

/// Substring filter over appliances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    case_sensitive: bool,
}

impl SearchQuery {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn matches(&self, appliance: &Appliance) -> bool {
        if self.is_empty() {
            return true;
        }

        let fields = [
            appliance.network_name.as_str(),
            appliance.inventory_number.as_str(),
            appliance.housing_name.as_str(),
            appliance.cabinet_name.as_str(),
        ];

        if self.case_sensitive {
            fields.iter().any(|field| field.contains(&self.text))
        } else {
            let needle = self.text.to_lowercase();
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        }
    }

    /// Matching appliances, each once, in input order
    pub fn filter(&self, appliances: &[Appliance]) -> Vec<Appliance> {
        appliances
            .iter()
            .filter(|appliance| self.matches(appliance))
            .cloned()
            .collect()
    }
}
