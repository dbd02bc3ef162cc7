// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory configuration

use serde::{Deserialize, Serialize};

/// Name of the sentinel housing and cabinet used when none is set
pub const DEFAULT_UNASSIGNED_NAME: &str = "N/A";

/// Configuration for the inventory services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Name of the housing that holds not-yet-placed devices
    #[serde(default = "default_unassigned_name")]
    pub unassigned_housing_name: String,

    /// Name of the cabinet that holds not-yet-placed devices
    #[serde(default = "default_unassigned_name")]
    pub unassigned_cabinet_name: String,
}

fn default_unassigned_name() -> String {
    DEFAULT_UNASSIGNED_NAME.to_string()
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            unassigned_housing_name: default_unassigned_name(),
            unassigned_cabinet_name: default_unassigned_name(),
        }
    }
}

impl InventoryConfig {
    /// Load configuration from environment variables
    ///
    /// - `INVENTORY_UNASSIGNED_HOUSING`
    /// - `INVENTORY_UNASSIGNED_CABINET`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let named = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_unassigned_name)
        };

        Self {
            unassigned_housing_name: named("INVENTORY_UNASSIGNED_HOUSING"),
            unassigned_cabinet_name: named("INVENTORY_UNASSIGNED_CABINET"),
        }
    }
}
