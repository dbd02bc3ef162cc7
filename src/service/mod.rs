// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Inventory Management
//!
//! Application services that validate requests against stored state and
//! commit the resulting writes through a [`Repository`](crate::repository::Repository).
//!
//! # Architecture
//!
//! ```text
//! Caller (transport / presentation)
//!     ↓
//! DevicesManager / ReferenceDataService
//!     ↓ validate (domain invariants + repository lookups)
//! ChangeSet
//!     ↓ save (atomic, constraint-checked)
//! Repository
//!     ↓ query
//! Appliance projection
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cim_inventory::{
//!     DeviceInfo, DevicesManager, InMemoryRepository, InventoryConfig,
//!     ReferenceDataService, RepositoryDevicesManager,
//! };
//!
//! # tokio_test::block_on(async {
//! let repo = Arc::new(InMemoryRepository::new());
//! let reference = ReferenceDataService::new(repo.clone(), InventoryConfig::default());
//! reference.ensure_unassigned_location().await?;
//! let switch = reference.create_device_type("Switch").await?;
//!
//! let devices = RepositoryDevicesManager::new(repo, InventoryConfig::default());
//! devices
//!     .create_device(DeviceInfo::new("INV-1", "SW-CORE-1", switch.id))
//!     .await?;
//!
//! let appliances = devices.get_appliances().await?;
//! assert_eq!(appliances[0].cabinet_name, "N/A");
//! # Ok::<(), cim_inventory::InventoryError>(())
//! # }).unwrap();
//! ```

pub mod devices;
mod placement;
pub mod reference;

pub use devices::{DevicesManager, RepositoryDevicesManager};
pub use reference::ReferenceDataService;
