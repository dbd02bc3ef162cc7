// Copyright (c) 2025 - Cowboy AI, Inc.
//! Devices Manager
//!
//! Application service that owns the device lifecycle:
//! - Registration with reference checks and a default placement
//! - Partial updates guarded by uniqueness rules
//! - Relocation as an appended history record
//! - Hard delete cascading to addresses and history
//! - Appliance projection for display and search
//!
//! # Transaction Semantics
//!
//! Each mutating operation:
//! 1. Validates input and checks it against current repository state
//! 2. Stages every write in one [`ChangeSet`]
//! 3. Commits it with a single `save`
//!
//! The repository re-checks uniqueness and references at commit, so a
//! concurrent writer that slips between steps 1 and 3 is reported as a
//! [`InventoryError::Conflict`] or [`InventoryError::Validation`] instead of
//! corrupting the inventory. History records are appended with
//! [`ChangeSet::append`] and numbered at commit, so concurrent moves of the
//! same device all succeed.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::placement::{dangling, locate_unassigned, placement_of, unassigned_placement};
use crate::config::InventoryConfig;
use crate::domain::invariants::{optional_text, require_reference, require_text};
use crate::domain::{
    current_location, order_history, Cabinet, Device, DeviceInfo, DeviceLocation, DeviceType,
    DeviceUpdate, DeviceWithType, EntityId, Housing, IpAddress, Location, Placement,
};
use crate::errors::{InventoryError, InventoryResult};
use crate::projection::{assemble_appliance, Appliance};
use crate::repository::{ChangeSet, Filter, Repository};

/// Device management operations
#[async_trait]
pub trait DevicesManager: Send + Sync {
    /// Register a new device in the unassigned location
    ///
    /// # Errors
    /// - `Validation` for blank names, a nil or unknown type
    /// - `Conflict` if the inventory number or network name is taken
    async fn create_device(&self, info: DeviceInfo) -> InventoryResult<EntityId<Device>>;

    /// Apply a partial update to the device with `target_inventory_number`
    async fn update_device(
        &self,
        target_inventory_number: &str,
        update: DeviceUpdate,
    ) -> InventoryResult<Device>;

    /// Remove a device together with its addresses and location history
    async fn delete_device(&self, inventory_number: &str) -> InventoryResult<()>;

    /// Place a device into a cabinet by appending a history record
    async fn move_device(
        &self,
        inventory_number: &str,
        cabinet_id: EntityId<Cabinet>,
    ) -> InventoryResult<()>;

    /// All devices with their types, ordered by inventory number
    async fn get_devices(&self) -> InventoryResult<Vec<DeviceWithType>>;

    async fn get_device_by_inventory_number(
        &self,
        inventory_number: &str,
    ) -> InventoryResult<Device>;

    /// Current cabinet of a device, with its housing
    async fn get_device_cabinet(&self, inventory_number: &str) -> InventoryResult<Placement>;

    /// Every placement of a device, oldest first
    async fn get_location_history(
        &self,
        inventory_number: &str,
    ) -> InventoryResult<Vec<DeviceLocation>>;

    /// One appliance per device, ordered by inventory number
    async fn get_appliances(&self) -> InventoryResult<Vec<Appliance>>;

    /// Device type reference data, ordered by name
    async fn get_device_types(&self) -> InventoryResult<Vec<DeviceType>>;

    async fn assign_ip_address(
        &self,
        inventory_number: &str,
        address: &str,
    ) -> InventoryResult<EntityId<IpAddress>>;

    /// Addresses of a device in storage order
    async fn get_device_ip_addresses(
        &self,
        inventory_number: &str,
    ) -> InventoryResult<Vec<IpAddress>>;

    async fn release_ip_address(&self, ip_id: EntityId<IpAddress>) -> InventoryResult<()>;
}

/// [`DevicesManager`] backed by any [`Repository`]
pub struct RepositoryDevicesManager<R> {
    repo: R,
    config: InventoryConfig,
}

impl<R: Repository> RepositoryDevicesManager<R> {
    pub fn new(repo: R, config: InventoryConfig) -> Self {
        Self { repo, config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lookup keys are trimmed the same way stored values are
    async fn find_device(&self, inventory_number: &str) -> InventoryResult<Option<Device>> {
        let wanted = inventory_number.trim().to_string();
        Ok(self
            .repo
            .get_single(Filter::new(move |d: &Device| d.inventory_number == wanted))
            .await?)
    }

    async fn find_device_by_network_name(
        &self,
        network_name: &str,
    ) -> InventoryResult<Option<Device>> {
        let wanted = network_name.trim().to_string();
        Ok(self
            .repo
            .get_single(Filter::new(move |d: &Device| d.network_name == wanted))
            .await?)
    }

    async fn require_device(&self, inventory_number: &str) -> InventoryResult<Device> {
        self.find_device(inventory_number)
            .await?
            .ok_or_else(|| InventoryError::device_not_found(inventory_number.trim()))
    }

    async fn require_device_type(&self, type_id: EntityId<DeviceType>) -> InventoryResult<()> {
        let type_id = require_reference("device type", type_id)?;
        match self.repo.get_by_id(type_id).await? {
            Some(_) => Ok(()),
            None => Err(InventoryError::validation(format!(
                "device type {type_id} does not exist"
            ))),
        }
    }

    async fn history(&self, device_id: EntityId<Device>) -> InventoryResult<Vec<DeviceLocation>> {
        let mut history = self
            .repo
            .get(Filter::new(move |r: &DeviceLocation| r.device_id == device_id))
            .await?;
        order_history(&mut history);
        Ok(history)
    }

    /// Uniqueness check that ignores the device being edited
    fn ensure_free(
        field: &str,
        value: &str,
        holder: Option<Device>,
        editing: EntityId<Device>,
    ) -> InventoryResult<()> {
        match holder {
            Some(other) if other.id != editing => {
                warn!(field, value, holder = %other.id, "Value already taken by another device");
                Err(InventoryError::conflict(field, value))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R: Repository> DevicesManager for RepositoryDevicesManager<R> {
    async fn create_device(&self, info: DeviceInfo) -> InventoryResult<EntityId<Device>> {
        let inventory_number = require_text("inventory number", &info.inventory_number)?;
        let network_name = require_text("network name", &info.network_name)?;

        if self.find_device(&inventory_number).await?.is_some() {
            warn!(%inventory_number, "Device with inventory number already exists");
            return Err(InventoryError::conflict("inventory number", inventory_number));
        }
        if self.find_device_by_network_name(&network_name).await?.is_some() {
            warn!(%network_name, "Device with network name already exists");
            return Err(InventoryError::conflict("network name", network_name));
        }

        self.require_device_type(info.type_id).await?;
        let unassigned = unassigned_placement(&self.repo, &self.config).await?;

        let device = Device {
            id: EntityId::new(),
            inventory_number,
            network_name,
            type_id: info.type_id,
            model_name: optional_text(info.model_name.as_deref()),
        };
        let placement = DeviceLocation::new(device.id, unassigned.location.id, Utc::now());

        let mut changes = ChangeSet::new();
        changes.add(device.clone()).append(placement);
        self.repo.save(changes).await?;

        info!(
            device_id = %device.id,
            inventory_number = %device.inventory_number,
            network_name = %device.network_name,
            "Device created"
        );
        Ok(device.id)
    }

    async fn update_device(
        &self,
        target_inventory_number: &str,
        update: DeviceUpdate,
    ) -> InventoryResult<Device> {
        let mut device = self.require_device(target_inventory_number).await?;
        if update.is_empty() {
            debug!(target_inventory_number, "Empty update, nothing to commit");
            return Ok(device);
        }

        if let Some(type_id) = update.type_id {
            self.require_device_type(type_id).await?;
            device.type_id = type_id;
        }

        if let Some(value) = update.inventory_number {
            let value = require_text("inventory number", &value)?;
            let holder = self.find_device(&value).await?;
            Self::ensure_free("inventory number", &value, holder, device.id)?;
            device.inventory_number = value;
        }

        if let Some(value) = update.network_name {
            let value = require_text("network name", &value)?;
            let holder = self.find_device_by_network_name(&value).await?;
            Self::ensure_free("network name", &value, holder, device.id)?;
            device.network_name = value;
        }

        if let Some(model_name) = update.model_name {
            device.model_name = optional_text(model_name.as_deref());
        }

        let mut changes = ChangeSet::new();
        changes.update(device.clone());
        self.repo.save(changes).await?;

        info!(
            device_id = %device.id,
            target_inventory_number,
            inventory_number = %device.inventory_number,
            "Device updated"
        );
        Ok(device)
    }

    async fn delete_device(&self, inventory_number: &str) -> InventoryResult<()> {
        let device = self.require_device(inventory_number).await?;
        let device_id = device.id;

        let addresses = self
            .repo
            .get(Filter::new(move |ip: &IpAddress| ip.device_id == device_id))
            .await?;
        let history = self.history(device_id).await?;

        let mut changes = ChangeSet::new();
        for ip in &addresses {
            changes.remove(ip.id);
        }
        for record in &history {
            changes.remove(record.id);
        }
        changes.remove(device_id);
        self.repo.save(changes).await?;

        info!(
            %device_id,
            inventory_number,
            addresses = addresses.len(),
            history = history.len(),
            "Device deleted"
        );
        Ok(())
    }

    async fn move_device(
        &self,
        inventory_number: &str,
        cabinet_id: EntityId<Cabinet>,
    ) -> InventoryResult<()> {
        let device = self.require_device(inventory_number).await?;
        let cabinet_id = require_reference("cabinet", cabinet_id)?;

        if self.repo.get_by_id(cabinet_id).await?.is_none() {
            return Err(InventoryError::validation(format!(
                "cabinet {cabinet_id} does not exist"
            )));
        }
        let location = self
            .repo
            .get_single(Filter::new(move |l: &Location| l.cabinet_id == cabinet_id))
            .await?
            .ok_or_else(|| {
                InventoryError::validation(format!("cabinet {cabinet_id} is not in any housing"))
            })?;

        let mut changes = ChangeSet::new();
        changes.append(DeviceLocation::new(device.id, location.id, Utc::now()));
        self.repo.save(changes).await?;

        info!(
            device_id = %device.id,
            inventory_number,
            %cabinet_id,
            "Device moved"
        );
        Ok(())
    }

    async fn get_devices(&self) -> InventoryResult<Vec<DeviceWithType>> {
        let (devices, types) = futures::try_join!(
            self.repo.get::<Device>(Filter::all()),
            self.repo.get::<DeviceType>(Filter::all()),
        )?;
        let types: HashMap<EntityId<DeviceType>, DeviceType> =
            types.into_iter().map(|t| (t.id, t)).collect();

        let mut joined = devices
            .into_iter()
            .map(|device| -> InventoryResult<DeviceWithType> {
                let device_type = types
                    .get(&device.type_id)
                    .cloned()
                    .ok_or_else(|| dangling(device.type_id))?;
                Ok(DeviceWithType {
                    device,
                    device_type,
                })
            })
            .collect::<InventoryResult<Vec<_>>>()?;
        joined.sort_by(|a, b| a.device.inventory_number.cmp(&b.device.inventory_number));

        debug!(count = joined.len(), "Loaded devices");
        Ok(joined)
    }

    async fn get_device_by_inventory_number(
        &self,
        inventory_number: &str,
    ) -> InventoryResult<Device> {
        self.require_device(inventory_number).await
    }

    async fn get_device_cabinet(&self, inventory_number: &str) -> InventoryResult<Placement> {
        let device = self.require_device(inventory_number).await?;
        let history = self.history(device.id).await?;

        match current_location(&history) {
            Some(record) => placement_of(&self.repo, record.location_id).await,
            None => {
                debug!(inventory_number, "Device has no placement, using unassigned");
                unassigned_placement(&self.repo, &self.config).await
            }
        }
    }

    async fn get_location_history(
        &self,
        inventory_number: &str,
    ) -> InventoryResult<Vec<DeviceLocation>> {
        let device = self.require_device(inventory_number).await?;
        self.history(device.id).await
    }

    async fn get_appliances(&self) -> InventoryResult<Vec<Appliance>> {
        let (devices, types, history, locations, cabinets, housings, addresses) = futures::try_join!(
            self.repo.get::<Device>(Filter::all()),
            self.repo.get::<DeviceType>(Filter::all()),
            self.repo.get::<DeviceLocation>(Filter::all()),
            self.repo.get::<Location>(Filter::all()),
            self.repo.get::<Cabinet>(Filter::all()),
            self.repo.get::<Housing>(Filter::all()),
            self.repo.get::<IpAddress>(Filter::all()),
        )?;

        let type_index: HashMap<_, _> = types.iter().map(|t| (t.id, t)).collect();
        let location_index: HashMap<_, _> = locations.iter().map(|l| (l.id, l)).collect();
        let cabinet_index: HashMap<_, _> = cabinets.iter().map(|c| (c.id, c)).collect();
        let housing_index: HashMap<_, _> = housings.iter().map(|h| (h.id, h)).collect();

        let mut current: HashMap<EntityId<Device>, &DeviceLocation> = HashMap::new();
        for record in &history {
            let latest = current.entry(record.device_id).or_insert(record);
            if record.sequence > latest.sequence {
                *latest = record;
            }
        }

        let mut addresses_by_device: HashMap<EntityId<Device>, Vec<IpAddress>> = HashMap::new();
        for ip in addresses {
            addresses_by_device.entry(ip.device_id).or_default().push(ip);
        }

        let fallback = locate_unassigned(&self.config, &housings, &cabinets, &locations);

        let mut devices = devices;
        devices.sort_by(|a, b| a.inventory_number.cmp(&b.inventory_number));

        let mut appliances = Vec::with_capacity(devices.len());
        for device in &devices {
            let device_type = type_index
                .get(&device.type_id)
                .copied()
                .ok_or_else(|| dangling(device.type_id))?;

            let (cabinet, housing) = match current.get(&device.id) {
                Some(record) => {
                    let location = location_index
                        .get(&record.location_id)
                        .copied()
                        .ok_or_else(|| dangling(record.location_id))?;
                    let cabinet = cabinet_index
                        .get(&location.cabinet_id)
                        .copied()
                        .ok_or_else(|| dangling(location.cabinet_id))?;
                    let housing = housing_index
                        .get(&location.housing_id)
                        .copied()
                        .ok_or_else(|| dangling(location.housing_id))?;
                    (cabinet, housing)
                }
                None => {
                    let placement = fallback.as_ref().ok_or_else(|| {
                        InventoryError::MissingUnassignedLocation {
                            housing: self.config.unassigned_housing_name.clone(),
                            cabinet: self.config.unassigned_cabinet_name.clone(),
                        }
                    })?;
                    (&placement.cabinet, &placement.housing)
                }
            };

            let ips = addresses_by_device
                .get(&device.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            appliances.push(assemble_appliance(device, device_type, cabinet, housing, ips));
        }

        debug!(count = appliances.len(), "Assembled appliances");
        Ok(appliances)
    }

    async fn get_device_types(&self) -> InventoryResult<Vec<DeviceType>> {
        let mut types = self.repo.get::<DeviceType>(Filter::all()).await?;
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn assign_ip_address(
        &self,
        inventory_number: &str,
        address: &str,
    ) -> InventoryResult<EntityId<IpAddress>> {
        let device = self.require_device(inventory_number).await?;
        let address = require_text("IP address", address)?;
        let ip = IpAddress::new(address, device.id);
        let ip_id = ip.id;

        let mut changes = ChangeSet::new();
        changes.add(ip);
        self.repo.save(changes).await?;

        info!(device_id = %device.id, inventory_number, %ip_id, "IP address assigned");
        Ok(ip_id)
    }

    async fn get_device_ip_addresses(
        &self,
        inventory_number: &str,
    ) -> InventoryResult<Vec<IpAddress>> {
        let device = self.require_device(inventory_number).await?;
        let device_id = device.id;
        Ok(self
            .repo
            .get(Filter::new(move |ip: &IpAddress| ip.device_id == device_id))
            .await?)
    }

    async fn release_ip_address(&self, ip_id: EntityId<IpAddress>) -> InventoryResult<()> {
        let ip = self
            .repo
            .get_by_id(ip_id)
            .await?
            .ok_or_else(|| InventoryError::NotFound {
                entity: "IpAddress",
                key: ip_id.to_string(),
            })?;

        let mut changes = ChangeSet::new();
        changes.remove(ip.id);
        self.repo.save(changes).await?;

        info!(%ip_id, address = %ip.address, "IP address released");
        Ok(())
    }
}
