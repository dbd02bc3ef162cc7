// Copyright (c) 2025 - Cowboy AI, Inc.
//! Physical Placement: Housings, Cabinets, Locations and Location History
//!
//! A [`Location`] pairs a [`Housing`] (building/site) with a [`Cabinet`]
//! (rack). Devices are placed by appending [`DeviceLocation`] records; the
//! record with the highest sequence number is the current placement and
//! earlier records are kept as history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Device, EntityId};

/// Building or site grouping cabinets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Housing {
    pub id: EntityId<Housing>,
    pub name: String,
}

impl Housing {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
        }
    }
}

/// Physical rack. Names are not unique across housings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cabinet {
    pub id: EntityId<Cabinet>,
    pub name: String,
}

impl Cabinet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
        }
    }
}

/// A valid (housing, cabinet) pairing. Each cabinet has at most one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: EntityId<Location>,
    pub housing_id: EntityId<Housing>,
    pub cabinet_id: EntityId<Cabinet>,
}

impl Location {
    pub fn new(housing_id: EntityId<Housing>, cabinet_id: EntityId<Cabinet>) -> Self {
        Self {
            id: EntityId::new(),
            housing_id,
            cabinet_id,
        }
    }
}

/// One entry of a device's location history
///
/// Records are append-only. `sequence` starts at 1 and grows by one per move;
/// `(device_id, sequence)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceLocation {
    pub id: EntityId<DeviceLocation>,
    pub device_id: EntityId<Device>,
    pub location_id: EntityId<Location>,
    pub sequence: u64,
    pub assigned_at: DateTime<Utc>,
}

impl DeviceLocation {
    /// First sequence number of every history
    pub const INITIAL_SEQUENCE: u64 = 1;

    /// Build a history record for appending
    ///
    /// The sequence is a placeholder; the repository assigns the next
    /// per-device sequence when the record is committed with
    /// [`ChangeSet::append`](crate::repository::ChangeSet::append).
    pub fn new(
        device_id: EntityId<Device>,
        location_id: EntityId<Location>,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            device_id,
            location_id,
            sequence: Self::INITIAL_SEQUENCE,
            assigned_at,
        }
    }

    /// Sequence of the record that follows `latest`
    pub fn following(latest: Option<u64>) -> u64 {
        latest.map_or(Self::INITIAL_SEQUENCE, |sequence| sequence + 1)
    }
}

/// The authoritative (highest-sequence) record of a history
pub fn current_location(history: &[DeviceLocation]) -> Option<&DeviceLocation> {
    history.iter().max_by_key(|record| record.sequence)
}

/// Sort a history oldest first
pub fn order_history(history: &mut [DeviceLocation]) {
    history.sort_by_key(|record| record.sequence);
}

/// A cabinet resolved together with its housing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub location: Location,
    pub housing: Housing,
    pub cabinet: Cabinet,
}
