// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Repository
//!
//! Each table keeps its rows in insertion order and addresses them by id.
//! Unique values, inbound references and per-device history sequences are
//! indexed, so a commit only checks the rows its change set touched. Changes
//! are applied in place under the write lock with an undo log; a change set
//! that fails any check is rolled back before the lock is released, so
//! readers never observe a partial commit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    Change, ChangeSet, Entity, EntityKind, Filter, Record, Repository, RepositoryError,
    RepositoryResult,
};
use crate::domain::{
    Cabinet, Device, DeviceLocation, DeviceType, EntityId, Housing, IpAddress, Location,
};

/// Serializable dump of every table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub device_types: Vec<DeviceType>,
    #[serde(default)]
    pub housings: Vec<Housing>,
    #[serde(default)]
    pub cabinets: Vec<Cabinet>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub ip_addresses: Vec<IpAddress>,
    #[serde(default)]
    pub device_locations: Vec<DeviceLocation>,
}

/// Value at most one row may hold
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum UniqueKey {
    InventoryNumber(String),
    NetworkName(String),
    LocationCabinet(Uuid),
    HistorySequence(Uuid, u64),
}

impl UniqueKey {
    fn violation(&self, entity: EntityKind) -> RepositoryError {
        let (field, value) = match self {
            UniqueKey::InventoryNumber(value) => ("inventory_number", value.clone()),
            UniqueKey::NetworkName(value) => ("network_name", value.clone()),
            UniqueKey::LocationCabinet(cabinet) => ("cabinet_id", cabinet.to_string()),
            UniqueKey::HistorySequence(device, sequence) => {
                ("sequence", format!("{device}#{sequence}"))
            }
        };
        RepositoryError::UniqueViolation {
            entity,
            field,
            value,
        }
    }
}

/// Outgoing foreign key of a row
struct Reference {
    field: &'static str,
    target: EntityKind,
    id: Uuid,
}

fn reference<T: Entity>(field: &'static str, id: EntityId<T>) -> Reference {
    Reference {
        field,
        target: T::KIND,
        id: id.as_uuid(),
    }
}

fn unique_keys(record: &Record) -> Vec<UniqueKey> {
    match record {
        Record::Device(device) => vec![
            UniqueKey::InventoryNumber(device.inventory_number.clone()),
            UniqueKey::NetworkName(device.network_name.clone()),
        ],
        Record::Location(location) => {
            vec![UniqueKey::LocationCabinet(location.cabinet_id.as_uuid())]
        }
        Record::DeviceLocation(entry) => vec![UniqueKey::HistorySequence(
            entry.device_id.as_uuid(),
            entry.sequence,
        )],
        Record::DeviceType(_) | Record::Housing(_) | Record::Cabinet(_) | Record::IpAddress(_) => {
            Vec::new()
        }
    }
}

fn references(record: &Record) -> Vec<Reference> {
    match record {
        Record::Device(device) => vec![reference("type_id", device.type_id)],
        Record::Location(location) => vec![
            reference("housing_id", location.housing_id),
            reference("cabinet_id", location.cabinet_id),
        ],
        Record::IpAddress(ip) => vec![reference("device_id", ip.device_id)],
        Record::DeviceLocation(entry) => vec![
            reference("device_id", entry.device_id),
            reference("location_id", entry.location_id),
        ],
        Record::DeviceType(_) | Record::Housing(_) | Record::Cabinet(_) => Vec::new(),
    }
}

/// Rows of one kind keyed by insertion slot, with an id index
#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<u64, Record>,
    slots: HashMap<Uuid, u64>,
}

/// Inverse of an applied change
enum Undo {
    Remove { kind: EntityKind, id: Uuid },
    Restore { slot: u64, record: Record },
}

/// Rows written or removed by a change set
#[derive(Default)]
struct Touched {
    written: Vec<(EntityKind, Uuid)>,
    removed: Vec<(EntityKind, Uuid)>,
}

#[derive(Debug, Default)]
struct Tables {
    tables: BTreeMap<EntityKind, Table>,
    next_slot: u64,
    unique: HashMap<UniqueKey, Vec<Uuid>>,
    inbound: HashMap<(EntityKind, Uuid), usize>,
    sequences: HashMap<Uuid, BTreeMap<u64, usize>>,
}

impl Tables {
    fn rows<T: Entity>(&self) -> impl Iterator<Item = &T> {
        self.tables
            .get(&T::KIND)
            .into_iter()
            .flat_map(|table| table.rows.values())
            .filter_map(T::from_record)
    }

    fn record(&self, kind: EntityKind, id: Uuid) -> Option<&Record> {
        let table = self.tables.get(&kind)?;
        table.slots.get(&id).and_then(|slot| table.rows.get(slot))
    }

    fn contains(&self, kind: EntityKind, id: Uuid) -> bool {
        self.tables
            .get(&kind)
            .is_some_and(|table| table.slots.contains_key(&id))
    }

    fn latest_sequence(&self, device_id: EntityId<Device>) -> Option<u64> {
        self.sequences
            .get(&device_id.as_uuid())
            .and_then(|sequences| sequences.keys().next_back().copied())
    }

    fn insert(&mut self, slot: u64, record: Record) {
        self.index(&record);
        let table = self.tables.entry(record.kind()).or_default();
        table.slots.insert(record.uuid(), slot);
        table.rows.insert(slot, record);
    }

    fn take(&mut self, kind: EntityKind, id: Uuid) -> Option<(u64, Record)> {
        let table = self.tables.get_mut(&kind)?;
        let slot = table.slots.remove(&id)?;
        let record = table.rows.remove(&slot)?;
        self.unindex(&record);
        Some((slot, record))
    }

    fn index(&mut self, record: &Record) {
        let id = record.uuid();
        for key in unique_keys(record) {
            self.unique.entry(key).or_default().push(id);
        }
        for target in references(record) {
            *self.inbound.entry((target.target, target.id)).or_default() += 1;
        }
        if let Record::DeviceLocation(entry) = record {
            *self
                .sequences
                .entry(entry.device_id.as_uuid())
                .or_default()
                .entry(entry.sequence)
                .or_default() += 1;
        }
    }

    fn unindex(&mut self, record: &Record) {
        let id = record.uuid();
        for key in unique_keys(record) {
            if let Entry::Occupied(mut holders) = self.unique.entry(key) {
                holders.get_mut().retain(|holder| *holder != id);
                if holders.get().is_empty() {
                    holders.remove();
                }
            }
        }
        for target in references(record) {
            if let Entry::Occupied(mut count) = self.inbound.entry((target.target, target.id)) {
                *count.get_mut() -= 1;
                if *count.get() == 0 {
                    count.remove();
                }
            }
        }
        if let Record::DeviceLocation(entry) = record {
            if let Entry::Occupied(mut device) = self.sequences.entry(entry.device_id.as_uuid()) {
                let counts = device.get_mut();
                if let Some(count) = counts.get_mut(&entry.sequence) {
                    *count -= 1;
                    if *count == 0 {
                        counts.remove(&entry.sequence);
                    }
                }
                if counts.is_empty() {
                    device.remove();
                }
            }
        }
    }

    fn add(&mut self, record: Record, touched: &mut Touched) -> RepositoryResult<Undo> {
        let (kind, id) = (record.kind(), record.uuid());
        if self.contains(kind, id) {
            return Err(RepositoryError::DuplicateKey { entity: kind, id });
        }
        let slot = self.next_slot;
        self.next_slot += 1;
        self.insert(slot, record);
        touched.written.push((kind, id));
        Ok(Undo::Remove { kind, id })
    }

    fn apply(&mut self, change: Change, touched: &mut Touched) -> RepositoryResult<Undo> {
        match change {
            Change::Add(record) => self.add(record, touched),
            Change::Append(mut entry) => {
                entry.sequence = DeviceLocation::following(self.latest_sequence(entry.device_id));
                self.add(entry.into_record(), touched)
            }
            Change::Update(record) => {
                let (kind, id) = (record.kind(), record.uuid());
                let (slot, previous) = self
                    .take(kind, id)
                    .ok_or(RepositoryError::MissingRecord { entity: kind, id })?;
                self.insert(slot, record);
                touched.written.push((kind, id));
                Ok(Undo::Restore {
                    slot,
                    record: previous,
                })
            }
            Change::Remove { kind, id } => {
                let (slot, previous) = self
                    .take(kind, id)
                    .ok_or(RepositoryError::MissingRecord { entity: kind, id })?;
                touched.removed.push((kind, id));
                Ok(Undo::Restore {
                    slot,
                    record: previous,
                })
            }
        }
    }

    fn undo(&mut self, undo: Undo) {
        match undo {
            Undo::Remove { kind, id } => {
                self.take(kind, id);
            }
            Undo::Restore { slot, record } => {
                self.take(record.kind(), record.uuid());
                self.insert(slot, record);
            }
        }
    }

    fn apply_all(
        &mut self,
        changes: ChangeSet,
        touched: &mut Touched,
        undo_log: &mut Vec<Undo>,
    ) -> RepositoryResult<()> {
        for change in changes.into_changes() {
            undo_log.push(self.apply(change, touched)?);
        }
        Ok(())
    }

    /// Apply a change set, rolling every change back if any check fails
    fn commit(&mut self, changes: ChangeSet) -> RepositoryResult<()> {
        let mut touched = Touched::default();
        let mut undo_log = Vec::with_capacity(changes.len());

        let result = self
            .apply_all(changes, &mut touched, &mut undo_log)
            .and_then(|()| self.check(&touched));

        if result.is_err() {
            for undo in undo_log.into_iter().rev() {
                self.undo(undo);
            }
        }
        result
    }

    fn check(&self, touched: &Touched) -> RepositoryResult<()> {
        for &(kind, id) in &touched.written {
            let Some(record) = self.record(kind, id) else {
                continue;
            };
            for key in unique_keys(record) {
                if self.unique.get(&key).is_some_and(|holders| holders.len() > 1) {
                    return Err(key.violation(kind));
                }
            }
            for target in references(record) {
                if !self.contains(target.target, target.id) {
                    return Err(RepositoryError::ForeignKeyViolation {
                        entity: kind,
                        field: target.field,
                        target: target.target,
                        id: target.id,
                    });
                }
            }
        }

        for &(kind, id) in &touched.removed {
            if !self.contains(kind, id) && self.inbound.contains_key(&(kind, id)) {
                return Err(self.referrer_violation(kind, id));
            }
        }

        Ok(())
    }

    /// Describe a row that still references a removed record
    fn referrer_violation(&self, target: EntityKind, id: Uuid) -> RepositoryError {
        self.tables
            .values()
            .flat_map(|table| table.rows.values())
            .find_map(|record| {
                references(record)
                    .into_iter()
                    .find(|r| r.target == target && r.id == id)
                    .map(|r| RepositoryError::ForeignKeyViolation {
                        entity: record.kind(),
                        field: r.field,
                        target,
                        id,
                    })
            })
            .unwrap_or(RepositoryError::MissingRecord { entity: target, id })
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            device_types: self.rows::<DeviceType>().cloned().collect(),
            housings: self.rows::<Housing>().cloned().collect(),
            cabinets: self.rows::<Cabinet>().cloned().collect(),
            locations: self.rows::<Location>().cloned().collect(),
            devices: self.rows::<Device>().cloned().collect(),
            ip_addresses: self.rows::<IpAddress>().cloned().collect(),
            device_locations: self.rows::<DeviceLocation>().cloned().collect(),
        }
    }
}

/// Repository backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot, rejecting it if it violates any constraint
    pub fn from_snapshot(snapshot: Snapshot) -> RepositoryResult<Self> {
        let mut changes = ChangeSet::new();
        for row in snapshot.device_types {
            changes.add(row);
        }
        for row in snapshot.housings {
            changes.add(row);
        }
        for row in snapshot.cabinets {
            changes.add(row);
        }
        for row in snapshot.locations {
            changes.add(row);
        }
        for row in snapshot.devices {
            changes.add(row);
        }
        for row in snapshot.ip_addresses {
            changes.add(row);
        }
        for row in snapshot.device_locations {
            changes.add(row);
        }

        let mut tables = Tables::default();
        tables.commit(changes)?;

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Dump every table in storage order
    pub async fn snapshot(&self) -> Snapshot {
        self.tables.read().await.to_snapshot()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get<T: Entity>(&self, filter: Filter<T>) -> RepositoryResult<Vec<T>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows::<T>()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    async fn save(&self, changes: ChangeSet) -> RepositoryResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let count = changes.len();
        let mut tables = self.tables.write().await;

        match tables.commit(changes) {
            Ok(()) => {
                debug!(changes = count, "Committed change set");
                Ok(())
            }
            Err(e) => {
                warn!(changes = count, error = %e, "Rejected change set");
                Err(e)
            }
        }
    }
}
