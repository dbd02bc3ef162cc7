// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-inventory
//!
//! Builds a bootstrapped in-memory inventory through the public services so
//! every test starts from the same reference data:
//!
//! - unassigned housing/cabinet ("N/A" / "N/A")
//! - housings "Main" and "Second" with cabinets "12" and "3" respectively
//! - device types "Personal computer" and "Switch"
//!
//! Identifiers that must NOT exist in the store are fixed constants.

#![allow(dead_code)]

use std::sync::Arc;

use cim_inventory::{
    Cabinet, DeviceInfo, DeviceType, DevicesManager, EntityId, Housing, InMemoryRepository,
    InventoryConfig, Placement, ReferenceDataService, RepositoryDevicesManager, Snapshot,
};
use uuid::Uuid;

/// Fixed id that never references a stored record
pub const UNKNOWN_ID: &str = "01934f4a-dead-7000-8000-00000000dead";

pub fn unknown_id<T>() -> EntityId<T> {
    EntityId::from_uuid(Uuid::parse_str(UNKNOWN_ID).expect("Invalid UUID in test fixture"))
}

pub type SharedRepository = Arc<InMemoryRepository>;

/// Bootstrapped inventory with services sharing one repository
pub struct Inventory {
    pub repo: SharedRepository,
    pub devices: RepositoryDevicesManager<SharedRepository>,
    pub reference: ReferenceDataService<SharedRepository>,
    pub unassigned: Placement,
    pub main: Housing,
    pub second: Housing,
    pub main_cabinet: Cabinet,
    pub second_cabinet: Cabinet,
    pub computer: DeviceType,
    pub switch: DeviceType,
}

impl Inventory {
    /// Register a device with the personal computer type
    pub async fn add_computer(&self, inventory_number: &str, network_name: &str) {
        self.devices
            .create_device(DeviceInfo::new(
                inventory_number,
                network_name,
                self.computer.id,
            ))
            .await
            .expect("Failed to create fixture device");
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.repo.snapshot().await
    }
}

pub async fn inventory() -> Inventory {
    let repo = Arc::new(InMemoryRepository::new());
    let config = InventoryConfig::default();
    let reference = ReferenceDataService::new(repo.clone(), config.clone());

    let unassigned = reference
        .ensure_unassigned_location()
        .await
        .expect("Failed to bootstrap unassigned location");
    let main = reference.create_housing("Main").await.expect("housing");
    let second = reference.create_housing("Second").await.expect("housing");
    let main_cabinet = reference
        .create_cabinet(main.id, "12")
        .await
        .expect("cabinet")
        .cabinet;
    let second_cabinet = reference
        .create_cabinet(second.id, "3")
        .await
        .expect("cabinet")
        .cabinet;
    let computer = reference
        .create_device_type("Personal computer")
        .await
        .expect("device type");
    let switch = reference
        .create_device_type("Switch")
        .await
        .expect("device type");

    Inventory {
        devices: RepositoryDevicesManager::new(repo.clone(), config),
        repo,
        reference,
        unassigned,
        main,
        second,
        main_cabinet,
        second_cabinet,
        computer,
        switch,
    }
}
