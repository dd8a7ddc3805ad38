//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

use crate::definition::{Field, Zone};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PivotError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Zone {zone} does not accept field {field}: {reason}")]
    ZoneRejected {
        field: Field,
        zone: Zone,
        reason: &'static str,
    },

    #[error("Field {field} is already placed in zone {zone}")]
    FieldInOtherZone { field: Field, zone: Zone },
}

pub type PivotResult<T> = Result<T, PivotError>;
