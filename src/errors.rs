// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for inventory operations

use thiserror::Error;

use crate::domain::ValidationError;
use crate::repository::RepositoryError;

/// Errors surfaced by the inventory services
///
/// Callers branch on the variant. Nothing is retried internally; retry and
/// backoff for remote storage belong to the repository implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Malformed input or reference to a record that does not exist
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Uniqueness violation
    #[error("Conflict: {field} {value:?} is already in use")]
    Conflict { field: String, value: String },

    /// Operation target does not exist
    #[error("{entity} {key:?} not found")]
    NotFound { entity: &'static str, key: String },

    /// The sentinel housing/cabinet pairing has not been bootstrapped
    #[error("Unassigned location missing: no cabinet {cabinet:?} in housing {housing:?}")]
    MissingUnassignedLocation { housing: String, cabinet: String },

    /// Storage failure, passed through unchanged
    #[error(transparent)]
    Repository(RepositoryError),
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

impl InventoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        InventoryError::Validation(message.into())
    }

    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        InventoryError::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn device_not_found(inventory_number: impl Into<String>) -> Self {
        InventoryError::NotFound {
            entity: "Device",
            key: inventory_number.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, InventoryError::Conflict { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, InventoryError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InventoryError::NotFound { .. })
    }
}

impl From<ValidationError> for InventoryError {
    fn from(err: ValidationError) -> Self {
        InventoryError::Validation(err.to_string())
    }
}

/// Constraint violations raised at commit map onto the service taxonomy;
/// anything else is a storage failure and passes through.
impl From<RepositoryError> for InventoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation { field, value, .. } => {
                InventoryError::conflict(field.replace('_', " "), value)
            }
            RepositoryError::ForeignKeyViolation { .. } => {
                InventoryError::Validation(err.to_string())
            }
            other => InventoryError::Repository(other),
        }
    }
}
