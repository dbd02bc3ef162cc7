// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed Entity Identifiers
//!
//! Every inventory record is identified by an opaque UUID. The phantom type
//! parameter keeps a `DeviceId` from being passed where a `CabinetId` is
//! expected, while the wire form stays a plain UUID string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// Identifier of an entity of type `T`
///
/// New identifiers are UUID v7 (time-ordered). The nil UUID is the "empty"
/// sentinel and never references a stored record.
///
/// There is no `Default`; pick [`EntityId::new`] or [`EntityId::nil`]:
///
/// ```compile_fail
/// let id: cim_inventory::EntityId<()> = Default::default();
/// ```
pub struct EntityId<T> {
    uuid: Uuid,
    _marker: PhantomData<fn() -> T>,
}

#[allow(clippy::new_without_default)]
impl<T> EntityId<T> {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    /// Wrap an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: PhantomData,
        }
    }

    /// The nil sentinel
    pub const fn nil() -> Self {
        Self::from_uuid(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.uuid.is_nil()
    }

    pub fn as_uuid(&self) -> Uuid {
        self.uuid
    }
}

// Manual impls: derives would require `T: Clone`, `T: PartialEq`, ...

impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid.cmp(&other.uuid)
    }
}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.uuid)
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uuid, f)
    }
}

impl<T> From<Uuid> for EntityId<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> Serialize for EntityId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.uuid.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for EntityId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}
