// Copyright (c) 2025 - Cowboy AI, Inc.
//! IP Address Assignment
//!
//! Addresses are stored as given. Format validation and cross-device
//! uniqueness are operator concerns, not inventory invariants.

use serde::{Deserialize, Serialize};

use super::{Device, EntityId};

/// An IP address owned by a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    pub id: EntityId<IpAddress>,
    pub address: String,
    pub device_id: EntityId<Device>,
}

impl IpAddress {
    pub fn new(address: impl Into<String>, device_id: EntityId<Device>) -> Self {
        Self {
            id: EntityId::new(),
            address: address.into(),
            device_id,
        }
    }
}
