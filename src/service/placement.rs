// Copyright (c) 2025 - Cowboy AI, Inc.
//! Placement Resolution Shared by the Services
//!
//! Turns a location id into a full [`Placement`] and finds the sentinel
//! "unassigned" placement that new devices start in.

use std::collections::HashSet;

use crate::config::InventoryConfig;
use crate::domain::{Cabinet, EntityId, Housing, Location, Placement};
use crate::errors::{InventoryError, InventoryResult};
use crate::repository::{Entity, Filter, Repository, RepositoryError};

/// Error for a row that a stored reference points at but is gone
pub(crate) fn dangling<T: Entity>(id: EntityId<T>) -> InventoryError {
    InventoryError::Repository(RepositoryError::MissingRecord {
        entity: T::KIND,
        id: id.as_uuid(),
    })
}

/// Pick the unassigned placement out of already loaded rows
///
/// Names are compared after trimming, so a stored `"N/A "` still matches.
pub(crate) fn locate_unassigned(
    config: &InventoryConfig,
    housings: &[Housing],
    cabinets: &[Cabinet],
    locations: &[Location],
) -> Option<Placement> {
    let housing_name = config.unassigned_housing_name.trim();
    let cabinet_name = config.unassigned_cabinet_name.trim();

    locations.iter().find_map(|location| {
        let housing = housings
            .iter()
            .find(|h| h.id == location.housing_id && h.name.trim() == housing_name)?;
        let cabinet = cabinets
            .iter()
            .find(|c| c.id == location.cabinet_id && c.name.trim() == cabinet_name)?;

        Some(Placement {
            location: location.clone(),
            housing: housing.clone(),
            cabinet: cabinet.clone(),
        })
    })
}

/// Query the repository for the unassigned placement
pub(crate) async fn unassigned_placement<R: Repository>(
    repo: &R,
    config: &InventoryConfig,
) -> InventoryResult<Placement> {
    let cabinet_name = config.unassigned_cabinet_name.trim().to_string();
    let housing_name = config.unassigned_housing_name.trim().to_string();

    let cabinets = repo
        .get(Filter::new(move |c: &Cabinet| c.name.trim() == cabinet_name))
        .await?;
    let housings = repo
        .get(Filter::new(move |h: &Housing| h.name.trim() == housing_name))
        .await?;

    let cabinet_ids: HashSet<EntityId<Cabinet>> = cabinets.iter().map(|c| c.id).collect();
    let locations = repo
        .get(Filter::new(move |l: &Location| cabinet_ids.contains(&l.cabinet_id)))
        .await?;

    locate_unassigned(config, &housings, &cabinets, &locations).ok_or_else(|| {
        InventoryError::MissingUnassignedLocation {
            housing: config.unassigned_housing_name.clone(),
            cabinet: config.unassigned_cabinet_name.clone(),
        }
    })
}

/// Resolve a location into its housing and cabinet
pub(crate) async fn placement_of<R: Repository>(
    repo: &R,
    location_id: EntityId<Location>,
) -> InventoryResult<Placement> {
    let location = repo
        .get_by_id(location_id)
        .await?
        .ok_or_else(|| dangling(location_id))?;
    let housing = repo
        .get_by_id(location.housing_id)
        .await?
        .ok_or_else(|| dangling(location.housing_id))?;
    let cabinet = repo
        .get_by_id(location.cabinet_id)
        .await?
        .ok_or_else(|| dangling(location.cabinet_id))?;

    Ok(Placement {
        location,
        housing,
        cabinet,
    })
}
