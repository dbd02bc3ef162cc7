// Copyright (c) 2025 - Cowboy AI, Inc.
//! Appliance Projection

use serde::{Deserialize, Serialize};

use crate::domain::{Cabinet, Device, DeviceType, EntityId, Housing, IpAddress};

/// Device flattened with its type, current placement and addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: EntityId<Device>,
    pub inventory_number: String,
    pub type_name: String,
    pub network_name: String,
    pub housing_name: String,
    pub cabinet_name: String,
    pub ip_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,
}

/// Build an appliance from its parts
///
/// Pure and deterministic. Address order is kept exactly as given.
pub fn assemble_appliance(
    device: &Device,
    device_type: &DeviceType,
    cabinet: &Cabinet,
    housing: &Housing,
    ip_addresses: &[IpAddress],
) -> Appliance {
    Appliance {
        id: device.id,
        inventory_number: device.inventory_number.clone(),
        type_name: device_type.name.clone(),
        network_name: device.network_name.clone(),
        housing_name: housing.name.clone(),
        cabinet_name: cabinet.name.clone(),
        ip_addresses: ip_addresses.iter().map(|ip| ip.address.clone()).collect(),
        comment: None,
    }
}
