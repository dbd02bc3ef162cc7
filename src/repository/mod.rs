// Copyright (c) 2025 - Cowboy AI, Inc.
//! Repository Abstraction
//!
//! The inventory services depend only on this narrow persistence contract.
//! Storage backends implement [`Repository`]; the crate ships
//! [`InMemoryRepository`] for tests and small deployments.
//!
//! # Architecture
//!
//! ```text
//! Service → (query) → Repository::get / get_single / get_by_id
//!    │
//!    └── stage Add/Update/Remove in a ChangeSet → Repository::save
//! ```
//!
//! # Commit Requirements
//!
//! 1. **Atomic**: a [`ChangeSet`] is applied entirely or not at all
//! 2. **Constrained**: uniqueness and foreign keys are checked at commit,
//!    so a check-then-act race in the service surfaces as an error instead
//!    of corrupt data
//! 3. **Ordered**: queries return rows in a stable order (insertion order
//!    for the in-memory store)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Cabinet, Device, DeviceLocation, DeviceType, EntityId, Housing, IpAddress, Location,
};

pub mod memory;

pub use memory::{InMemoryRepository, Snapshot};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage-level failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Unique constraint violated at commit
    #[error("Unique constraint violated: {entity}.{field} = {value:?}")]
    UniqueViolation {
        entity: EntityKind,
        field: &'static str,
        value: String,
    },

    /// Reference to a record that does not exist
    #[error("Foreign key violated: {entity}.{field} references missing {target} {id}")]
    ForeignKeyViolation {
        entity: EntityKind,
        field: &'static str,
        target: EntityKind,
        id: Uuid,
    },

    /// Add of a record whose id is already stored
    #[error("Duplicate key: {entity} {id} already exists")]
    DuplicateKey { entity: EntityKind, id: Uuid },

    /// Update/remove of a record that is not stored
    #[error("Record not found: {entity} {id}")]
    MissingRecord { entity: EntityKind, id: Uuid },

    /// Backend could not be reached or failed internally
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

/// Kinds of stored records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    DeviceType,
    Housing,
    Cabinet,
    Location,
    Device,
    IpAddress,
    DeviceLocation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::DeviceType => "DeviceType",
            EntityKind::Housing => "Housing",
            EntityKind::Cabinet => "Cabinet",
            EntityKind::Location => "Location",
            EntityKind::Device => "Device",
            EntityKind::IpAddress => "IpAddress",
            EntityKind::DeviceLocation => "DeviceLocation",
        };
        f.write_str(name)
    }
}

/// A stored row of any kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Record {
    DeviceType(DeviceType),
    Housing(Housing),
    Cabinet(Cabinet),
    Location(Location),
    Device(Device),
    IpAddress(IpAddress),
    DeviceLocation(DeviceLocation),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::DeviceType(_) => EntityKind::DeviceType,
            Record::Housing(_) => EntityKind::Housing,
            Record::Cabinet(_) => EntityKind::Cabinet,
            Record::Location(_) => EntityKind::Location,
            Record::Device(_) => EntityKind::Device,
            Record::IpAddress(_) => EntityKind::IpAddress,
            Record::DeviceLocation(_) => EntityKind::DeviceLocation,
        }
    }

    pub fn uuid(&self) -> Uuid {
        match self {
            Record::DeviceType(e) => e.id.as_uuid(),
            Record::Housing(e) => e.id.as_uuid(),
            Record::Cabinet(e) => e.id.as_uuid(),
            Record::Location(e) => e.id.as_uuid(),
            Record::Device(e) => e.id.as_uuid(),
            Record::IpAddress(e) => e.id.as_uuid(),
            Record::DeviceLocation(e) => e.id.as_uuid(),
        }
    }
}

/// A persistable entity
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> EntityId<Self>;

    fn into_record(self) -> Record;

    fn from_record(record: &Record) -> Option<&Self>;
}

macro_rules! impl_entity {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn id(&self) -> EntityId<Self> {
                    self.id
                }

                fn into_record(self) -> Record {
                    Record::$ty(self)
                }

                fn from_record(record: &Record) -> Option<&Self> {
                    match record {
                        Record::$ty(entity) => Some(entity),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_entity!(DeviceType, Housing, Cabinet, Location, Device, IpAddress, DeviceLocation);

/// Query predicate over entities of type `T`
pub struct Filter<T> {
    predicate: Option<Arc<dyn Fn(&T) -> bool + Send + Sync>>,
}

impl<T> Filter<T> {
    /// Match every row
    pub fn all() -> Self {
        Self { predicate: None }
    }

    /// Match rows satisfying `predicate`
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Arc::new(predicate)),
        }
    }

    pub fn matches(&self, entity: &T) -> bool {
        self.predicate.as_ref().map_or(true, |p| p(entity))
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("restricted", &self.predicate.is_some())
            .finish()
    }
}

/// A staged write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Add(Record),
    /// History record whose sequence is assigned at commit
    Append(DeviceLocation),
    Update(Record),
    Remove { kind: EntityKind, id: Uuid },
}

/// Unit of work committed by [`Repository::save`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T: Entity>(&mut self, entity: T) -> &mut Self {
        self.changes.push(Change::Add(entity.into_record()));
        self
    }

    /// Append to a device's location history
    ///
    /// The record gets the next sequence of its device when the change set
    /// is committed, so concurrent appends never collide.
    pub fn append(&mut self, record: DeviceLocation) -> &mut Self {
        self.changes.push(Change::Append(record));
        self
    }

    pub fn update<T: Entity>(&mut self, entity: T) -> &mut Self {
        self.changes.push(Change::Update(entity.into_record()));
        self
    }

    pub fn remove<T: Entity>(&mut self, id: EntityId<T>) -> &mut Self {
        self.changes.push(Change::Remove {
            kind: T::KIND,
            id: id.as_uuid(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

/// Persistence contract consumed by the inventory services
///
/// Implementations must apply a [`ChangeSet`] atomically and enforce:
///
/// - unique `Device.inventory_number` and `Device.network_name`
/// - unique `Location.cabinet_id`
/// - unique `(DeviceLocation.device_id, DeviceLocation.sequence)`
/// - every foreign key between the inventory entities
///
/// A [`Change::Append`] record is stored with its device's highest
/// sequence plus one, computed under the commit's exclusive access.
#[async_trait]
pub trait Repository: Send + Sync {
    /// All rows of `T` matching `filter`, in stable storage order
    async fn get<T: Entity>(&self, filter: Filter<T>) -> RepositoryResult<Vec<T>>;

    /// First row of `T` matching `filter`
    async fn get_single<T: Entity>(&self, filter: Filter<T>) -> RepositoryResult<Option<T>> {
        Ok(self.get(filter).await?.into_iter().next())
    }

    /// Row of `T` with the given id
    async fn get_by_id<T: Entity>(&self, id: EntityId<T>) -> RepositoryResult<Option<T>> {
        self.get_single(Filter::new(move |entity: &T| entity.id() == id))
            .await
    }

    /// Commit staged changes as one unit
    async fn save(&self, changes: ChangeSet) -> RepositoryResult<()>;
}

#[async_trait]
impl<R: Repository> Repository for Arc<R> {
    async fn get<T: Entity>(&self, filter: Filter<T>) -> RepositoryResult<Vec<T>> {
        (**self).get(filter).await
    }

    async fn get_single<T: Entity>(&self, filter: Filter<T>) -> RepositoryResult<Option<T>> {
        (**self).get_single(filter).await
    }

    async fn get_by_id<T: Entity>(&self, id: EntityId<T>) -> RepositoryResult<Option<T>> {
        (**self).get_by_id(id).await
    }

    async fn save(&self, changes: ChangeSet) -> RepositoryResult<()> {
        (**self).save(changes).await
    }
}
