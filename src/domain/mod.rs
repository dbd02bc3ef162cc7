// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Domain Models
//!
//! Entities tracked by the inventory and the structural invariants they obey.
//!
//! # Entities
//!
//! - [`Device`] - network equipment with unique inventory number and network name
//! - [`DeviceType`] - reference data classifying devices
//! - [`Housing`] / [`Cabinet`] / [`Location`] - where equipment can be placed
//! - [`DeviceLocation`] - append-only placement history of a device
//! - [`IpAddress`] - addresses owned by a device
//!
//! # Relationships
//!
//! ```text
//! DeviceType ◄── Device ──► IpAddress*
//!                  │
//!                  ▼
//!          DeviceLocation* (latest wins)
//!                  │
//!                  ▼
//!     Housing ◄── Location ──► Cabinet
//! ```

pub mod device;
pub mod id;
pub mod invariants;
pub mod ip_address;
pub mod placement;

pub use device::{Device, DeviceInfo, DeviceType, DeviceUpdate, DeviceWithType};
pub use id::EntityId;
pub use invariants::{ValidationError, ValidationResult};
pub use ip_address::IpAddress;
pub use placement::{
    current_location, order_history, Cabinet, DeviceLocation, Housing, Location, Placement,
};
