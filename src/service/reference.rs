// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reference Data Service
//!
//! Maintains the data devices point at: device types, housings and the
//! cabinets placed in them. Also bootstraps the sentinel "unassigned"
//! housing/cabinet pairing that every new device starts in.

use std::collections::HashMap;
use tracing::info;

use super::placement::unassigned_placement;
use crate::config::InventoryConfig;
use crate::domain::invariants::{require_reference, require_text};
use crate::domain::{Cabinet, DeviceType, EntityId, Housing, Location, Placement};
use crate::errors::{InventoryError, InventoryResult};
use crate::repository::{ChangeSet, Filter, Repository};

/// Service for device types, housings and cabinets
pub struct ReferenceDataService<R> {
    repo: R,
    config: InventoryConfig,
}

impl<R: Repository> ReferenceDataService<R> {
    pub fn new(repo: R, config: InventoryConfig) -> Self {
        Self { repo, config }
    }

    pub async fn create_device_type(&self, name: &str) -> InventoryResult<DeviceType> {
        let device_type = DeviceType::new(require_text("device type name", name)?);

        let mut changes = ChangeSet::new();
        changes.add(device_type.clone());
        self.repo.save(changes).await?;

        info!(type_id = %device_type.id, name = %device_type.name, "Device type created");
        Ok(device_type)
    }

    pub async fn create_housing(&self, name: &str) -> InventoryResult<Housing> {
        let housing = Housing::new(require_text("housing name", name)?);

        let mut changes = ChangeSet::new();
        changes.add(housing.clone());
        self.repo.save(changes).await?;

        info!(housing_id = %housing.id, name = %housing.name, "Housing created");
        Ok(housing)
    }

    /// Create a cabinet inside a housing (cabinet and location in one commit)
    pub async fn create_cabinet(
        &self,
        housing_id: EntityId<Housing>,
        name: &str,
    ) -> InventoryResult<Placement> {
        let name = require_text("cabinet name", name)?;
        let housing_id = require_reference("housing", housing_id)?;
        let housing = self.repo.get_by_id(housing_id).await?.ok_or_else(|| {
            InventoryError::validation(format!("housing {housing_id} does not exist"))
        })?;

        let cabinet = Cabinet::new(name);
        let location = Location::new(housing.id, cabinet.id);

        let mut changes = ChangeSet::new();
        changes.add(cabinet.clone()).add(location.clone());
        self.repo.save(changes).await?;

        info!(
            cabinet_id = %cabinet.id,
            cabinet = %cabinet.name,
            housing = %housing.name,
            "Cabinet created"
        );
        Ok(Placement {
            location,
            housing,
            cabinet,
        })
    }

    /// Housings ordered by name
    pub async fn get_housings(&self) -> InventoryResult<Vec<Housing>> {
        let mut housings = self.repo.get::<Housing>(Filter::all()).await?;
        housings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(housings)
    }

    /// Cabinets placed in a housing, in location order
    pub async fn get_housing_cabinets(
        &self,
        housing_id: EntityId<Housing>,
    ) -> InventoryResult<Vec<Cabinet>> {
        if self.repo.get_by_id(housing_id).await?.is_none() {
            return Err(InventoryError::NotFound {
                entity: "Housing",
                key: housing_id.to_string(),
            });
        }

        let locations = self
            .repo
            .get(Filter::new(move |l: &Location| l.housing_id == housing_id))
            .await?;
        let mut cabinets: HashMap<EntityId<Cabinet>, Cabinet> = self
            .repo
            .get::<Cabinet>(Filter::all())
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(locations
            .iter()
            .filter_map(|l| cabinets.remove(&l.cabinet_id))
            .collect())
    }

    /// Return the unassigned placement, creating it when missing
    ///
    /// Idempotent. An existing housing with the configured name is reused;
    /// the sentinel cabinet is always created fresh inside it.
    pub async fn ensure_unassigned_location(&self) -> InventoryResult<Placement> {
        match unassigned_placement(&self.repo, &self.config).await {
            Err(InventoryError::MissingUnassignedLocation { .. }) => {}
            found => return found,
        }

        let housing_name = self.config.unassigned_housing_name.trim().to_string();
        let wanted = housing_name.clone();
        let existing = self
            .repo
            .get_single(Filter::new(move |h: &Housing| h.name.trim() == wanted))
            .await?;

        let mut changes = ChangeSet::new();
        let housing = match existing {
            Some(housing) => housing,
            None => {
                let housing = Housing::new(housing_name);
                changes.add(housing.clone());
                housing
            }
        };
        let cabinet = Cabinet::new(self.config.unassigned_cabinet_name.trim());
        let location = Location::new(housing.id, cabinet.id);
        changes.add(cabinet.clone()).add(location.clone());
        self.repo.save(changes).await?;

        info!(
            housing = %housing.name,
            cabinet = %cabinet.name,
            "Unassigned location bootstrapped"
        );
        Ok(Placement {
            location,
            housing,
            cabinet,
        })
    }
}
