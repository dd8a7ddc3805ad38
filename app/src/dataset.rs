//! FILENAME: app/src/dataset.rs
//! PURPOSE: Loads the source records the pivot is computed from.
//! CONTEXT: Input is a JSON array of flat objects. Each value is resolved
//! once into a `RecordValue`; records lacking `carats` or `pcs` get a
//! synthesized integer so every numeric field has data to aggregate.

use std::ops::Range;
use std::path::Path;

use pivot_engine::{Dataset, Field, Record, RecordValue};
use rand::Rng;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{log_debug, log_info};

/// Dataset compiled into the binary.
const BUNDLED_DATA: &str = include_str!("../data/data.json");

/// Synthesized carats lie in `[5, 100)`.
pub const CARATS_RANGE: Range<u32> = 5..100;

/// Synthesized pcs lie in `[10, 500)`.
pub const PCS_RANGE: Range<u32> = 10..500;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset must be a JSON array of records")]
    NotAnArray,

    #[error("Record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Record {index} has an unsupported value for '{key}'")]
    UnsupportedValue { index: usize, key: String },
}

// ============================================================================
// LOADING
// ============================================================================

/// Loads the bundled dataset.
pub fn load_bundled<R: Rng>(rng: &mut R) -> Result<Dataset, DatasetError> {
    log_debug!("DATA", "loading bundled dataset ({} bytes)", BUNDLED_DATA.len());
    load_from_str(BUNDLED_DATA, rng)
}

/// Loads a dataset from a JSON file.
pub fn load_from_path<R: Rng>(path: &Path, rng: &mut R) -> Result<Dataset, DatasetError> {
    log_debug!("DATA", "loading dataset from {:?}", path);
    let text = std::fs::read_to_string(path)?;
    load_from_str(&text, rng)
}

pub fn load_from_str<R: Rng>(text: &str, rng: &mut R) -> Result<Dataset, DatasetError> {
    let value: Value = serde_json::from_str(text)?;
    let records = parse_records(&value, rng)?;

    let mut dataset = Dataset::new();
    dataset.reserve(records.len());
    for record in &records {
        dataset.add_record(record);
    }

    log_info!(
        "DATA",
        "loaded {} records ({} departments, {} statuses, {} locations)",
        dataset.record_count(),
        dataset.field(Field::Department).unique_count(),
        dataset.field(Field::Status).unique_count(),
        dataset.field(Field::Location).unique_count()
    );
    Ok(dataset)
}

// ============================================================================
// PARSING
// ============================================================================

/// Converts a JSON array of objects into records, synthesizing missing
/// `carats` and `pcs`. Keys outside the known fields are ignored.
pub fn parse_records<R: Rng>(value: &Value, rng: &mut R) -> Result<Vec<Record>, DatasetError> {
    let items = value.as_array().ok_or(DatasetError::NotAnArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item.as_object().ok_or(DatasetError::NotAnObject { index })?;
            parse_record(index, object, rng)
        })
        .collect()
}

fn parse_record<R: Rng>(
    index: usize,
    object: &Map<String, Value>,
    rng: &mut R,
) -> Result<Record, DatasetError> {
    let mut record = Record::new();

    for field in Field::ALL {
        if let Some(value) = object.get(field.name()) {
            record.set(field, convert_value(index, field.name(), value)?);
        }
    }

    // Presence of the key decides, not its value: an explicit null is kept
    if !object.contains_key(Field::Carats.name()) {
        record.set(Field::Carats, rng.gen_range(CARATS_RANGE) as f64);
    }
    if !object.contains_key(Field::Pcs.name()) {
        record.set(Field::Pcs, rng.gen_range(PCS_RANGE) as f64);
    }

    Ok(record)
}

fn convert_value(index: usize, key: &str, value: &Value) -> Result<RecordValue, DatasetError> {
    match value {
        Value::Null => Ok(RecordValue::Empty),
        Value::Bool(b) => Ok(RecordValue::text(b.to_string())),
        Value::Number(n) => n
            .as_f64()
            .map(RecordValue::number)
            .ok_or_else(|| DatasetError::UnsupportedValue {
                index,
                key: key.to_string(),
            }),
        Value::String(s) => Ok(RecordValue::text(s.as_str())),
        Value::Array(_) | Value::Object(_) => Err(DatasetError::UnsupportedValue {
            index,
            key: key.to_string(),
        }),
    }
}
