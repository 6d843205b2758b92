//! Game mechanic types and the rules shared by every store backend.
//!
//! Defines the closed mechanic type enumeration, relationship label defaults,
//! and validation for canvas positions coming back from the graph editor.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Mechanic type
// ---------------------------------------------------------------------------

/// Whether a mechanic is a broad design pillar or a concrete implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MechanicType {
    General,
    Specific,
}

impl MechanicType {
    pub const fn as_db_value(self) -> &'static str {
        match self {
            MechanicType::General => "general",
            MechanicType::Specific => "specific",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "general" => Some(MechanicType::General),
            "specific" => Some(MechanicType::Specific),
            _ => None,
        }
    }
}

impl fmt::Display for MechanicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_value())
    }
}

impl FromStr for MechanicType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_value(s).ok_or_else(|| {
            CoreError::Validation(format!(
                "Unknown mechanic type '{s}', expected 'general' or 'specific'"
            ))
        })
    }
}

/// Used by sqlx to decode the `type` text column.
impl TryFrom<String> for MechanicType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// Label given to a relationship when the caller does not supply one.
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "implements";

/// Resolve the label for a new relationship.
///
/// `None` falls back to [`DEFAULT_RELATIONSHIP_TYPE`]. A supplied label is
/// stored verbatim and must not be blank.
pub fn resolve_relationship_type(label: Option<&str>) -> Result<String, CoreError> {
    match label {
        None => Ok(DEFAULT_RELATIONSHIP_TYPE.to_string()),
        Some(raw) if raw.trim().is_empty() => Err(CoreError::Validation(
            "Relationship type must not be blank".to_string(),
        )),
        Some(raw) => Ok(raw.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Names and positions
// ---------------------------------------------------------------------------

/// Reject mechanic names that are empty or whitespace-only.
pub fn validate_mechanic_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Mechanic name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Canvas coordinates must be finite; NaN and infinities cannot be stored.
pub fn validate_position(x: f64, y: f64) -> Result<(), CoreError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Position ({x}, {y}) must have finite coordinates"
        )))
    }
}

/// One entry of a bulk position save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MechanicPosition {
    pub id: DbId,
    pub x: f64,
    pub y: f64,
}

/// Validate a position batch and collapse repeated ids.
///
/// The last entry for an id wins; ids keep the order of their first
/// appearance so the batch stays stable for logging.
pub fn collapse_positions(
    positions: &[MechanicPosition],
) -> Result<Vec<MechanicPosition>, CoreError> {
    let mut collapsed: Vec<MechanicPosition> = Vec::with_capacity(positions.len());
    let mut index_by_id: HashMap<DbId, usize> = HashMap::with_capacity(positions.len());

    for position in positions {
        validate_position(position.x, position.y)?;
        match index_by_id.get(&position.id) {
            Some(&index) => collapsed[index] = *position,
            None => {
                index_by_id.insert(position.id, collapsed.len());
                collapsed.push(*position);
            }
        }
    }

    Ok(collapsed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
