// Copyright (c) 2025 - Cowboy AI, Inc.
//! Device Entity and its Write Models
//!
//! A [`Device`] is a physical piece of network equipment identified by an
//! inventory number and a network name, both unique across the inventory.
//! Devices never carry their location directly; placement lives in the
//! append-only [`DeviceLocation`](super::DeviceLocation) history.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Device type reference data (personal computer, switch, server, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    pub id: EntityId<DeviceType>,
    pub name: String,
}

impl DeviceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
        }
    }
}

/// Device Entity
///
/// # Invariants
/// - `inventory_number` is non-empty and unique across devices
/// - `network_name` is non-empty and unique across devices
/// - `type_id` references an existing [`DeviceType`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: EntityId<Device>,

    pub inventory_number: String,

    pub network_name: String,

    pub type_id: EntityId<DeviceType>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model_name: Option<String>,
}

/// Input for registering a new device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub inventory_number: String,
    pub network_name: String,
    pub type_id: EntityId<DeviceType>,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl DeviceInfo {
    pub fn new(
        inventory_number: impl Into<String>,
        network_name: impl Into<String>,
        type_id: EntityId<DeviceType>,
    ) -> Self {
        Self {
            inventory_number: inventory_number.into(),
            network_name: network_name.into(),
            type_id,
            model_name: None,
        }
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }
}

/// Partial update of a device
///
/// `None` means "leave untouched". For the optional model name,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    #[serde(default)]
    pub inventory_number: Option<String>,

    #[serde(default)]
    pub network_name: Option<String>,

    #[serde(default)]
    pub type_id: Option<EntityId<DeviceType>>,

    #[serde(default)]
    pub model_name: Option<Option<String>>,
}

impl DeviceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inventory_number(mut self, value: impl Into<String>) -> Self {
        self.inventory_number = Some(value.into());
        self
    }

    pub fn network_name(mut self, value: impl Into<String>) -> Self {
        self.network_name = Some(value.into());
        self
    }

    pub fn type_id(mut self, value: EntityId<DeviceType>) -> Self {
        self.type_id = Some(value);
        self
    }

    pub fn model_name(mut self, value: impl Into<String>) -> Self {
        self.model_name = Some(Some(value.into()));
        self
    }

    pub fn clear_model_name(mut self) -> Self {
        self.model_name = Some(None);
        self
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.inventory_number.is_none()
            && self.network_name.is_none()
            && self.type_id.is_none()
            && self.model_name.is_none()
    }
}

/// A device joined with its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceWithType {
    pub device: Device,
    pub device_type: DeviceType,
}
