//! Device inventory for the Composable Information Machine
//!
//! Tracks network devices across housings, cabinets and IP address
//! assignments. Devices are placed through an append-only location history
//! and exposed to callers as flattened [`Appliance`] projections.
//!
//! - [`domain`] - entities and structural invariants
//! - [`repository`] - persistence contract and in-memory store
//! - [`service`] - device and reference data management
//! - [`projection`] - appliance assembly and free-text search

pub mod config;
pub mod domain;
pub mod errors;
pub mod projection;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use config::InventoryConfig;
pub use domain::{
    Cabinet, Device, DeviceInfo, DeviceLocation, DeviceType, DeviceUpdate, DeviceWithType,
    EntityId, Housing, IpAddress, Location, Placement,
};
pub use errors::{InventoryError, InventoryResult};
pub use projection::{Appliance, SearchQuery};
pub use repository::{InMemoryRepository, Repository, RepositoryError, Snapshot};
pub use service::{DevicesManager, ReferenceDataService, RepositoryDevicesManager};
