// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Inventory Invariants
//!
//! Structural checks that need no repository access. Checks against stored
//! state (uniqueness, references) live in the service layer.
//!
//! All functions are pure: no I/O, deterministic.

use super::EntityId;

/// Validation result with detailed error information
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Structural validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required text field is empty or whitespace
    #[error("{field} must not be empty")]
    Blank { field: &'static str },

    /// Reference holds the nil sentinel
    #[error("{field} must reference an existing record")]
    NilReference { field: &'static str },
}

/// Trim a required text field, rejecting blank input
pub fn require_text(field: &'static str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank input becomes `None`
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reject the nil sentinel
pub fn require_reference<T>(field: &'static str, id: EntityId<T>) -> ValidationResult<EntityId<T>> {
    if id.is_nil() {
        return Err(ValidationError::NilReference { field });
    }
    Ok(id)
}
