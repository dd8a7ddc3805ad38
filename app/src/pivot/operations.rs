//! FILENAME: app/src/pivot/operations.rs
//! PURPOSE: Helpers shared by the pivot commands.
//! CONTEXT: Every configuration change replaces the active config and
//! recomputes the view from the source records. Locks are always taken in
//! the order config, view, stale flag.

use std::sync::MutexGuard;
use std::time::Instant;

use pivot_engine::{calculate_pivot, ColumnKind, Dataset, Field, PivotConfig, PivotView, Zone};

use crate::pivot::types::{FieldInfo, PivotViewResponse};
use crate::{log_debug, AppState};

// ============================================================================
// PARSING
// ============================================================================

pub fn parse_zone(name: &str) -> Result<Zone, String> {
    name.parse::<Zone>()
}

pub fn parse_field(name: &str) -> Result<Field, String> {
    name.parse::<Field>().map_err(|e| e.to_string())
}

// ============================================================================
// CALCULATION
// ============================================================================

/// Runs the engine, returning `None` when the guard skips the rebuild.
pub fn safe_calculate_pivot(config: &PivotConfig, dataset: &Dataset) -> Option<PivotView> {
    let start = Instant::now();
    match calculate_pivot(config, dataset) {
        Some(view) => {
            log_debug!(
                "PIVOT",
                "calculated v{} rows={} leaves={} in {:?}",
                view.version,
                view.row_count(),
                view.leaf_columns().len(),
                start.elapsed()
            );
            Some(view)
        }
        None => {
            log_debug!(
                "PIVOT",
                "skipped v{}: group_fields={} value_fields={}",
                config.version,
                config.group_fields.len(),
                config.value_fields.len()
            );
            None
        }
    }
}

pub fn view_to_response(view: &PivotView, config: &PivotConfig, is_stale: bool) -> PivotViewResponse {
    PivotViewResponse {
        version: view.version,
        config_version: config.version,
        operator: view.operator,
        columns: view.columns.clone(),
        rows: view.rows.clone(),
        is_stale,
        row_count: view.row_count(),
    }
}

// ============================================================================
// STATE TRANSITIONS
// ============================================================================

fn lock<'a, T>(mutex: &'a std::sync::Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, String> {
    mutex.lock().map_err(|e| format!("{} lock poisoned: {}", what, e))
}

/// Recomputes against `config`; a skipped rebuild keeps the previous view.
fn recompute_locked(state: &AppState, config: &PivotConfig) -> Result<PivotViewResponse, String> {
    let mut view = lock(&state.pivot_view, "view")?;
    let mut stale = lock(&state.view_is_stale, "stale flag")?;

    match safe_calculate_pivot(config, &state.dataset) {
        Some(next) => {
            *view = next;
            *stale = false;
        }
        None => *stale = true,
    }

    Ok(view_to_response(&view, config, *stale))
}

/// Derives a new configuration from the active one and recomputes.
/// Rejections leave both configuration and view untouched; an unchanged
/// version means nothing changed and the view is returned as is.
pub fn update_config<F>(state: &AppState, derive: F) -> Result<PivotViewResponse, String>
where
    F: FnOnce(&PivotConfig) -> Result<PivotConfig, String>,
{
    let mut config = lock(&state.pivot_config, "config")?;
    let next = derive(&config)?;

    if next.version == config.version {
        let view = lock(&state.pivot_view, "view")?;
        let stale = lock(&state.view_is_stale, "stale flag")?;
        return Ok(view_to_response(&view, &config, *stale));
    }

    *config = next;
    recompute_locked(state, &config)
}

/// Recomputes against the active configuration.
pub fn recompute_active(state: &AppState) -> Result<PivotViewResponse, String> {
    let config = lock(&state.pivot_config, "config")?;
    recompute_locked(state, &config)
}

pub fn current_response(state: &AppState) -> Result<PivotViewResponse, String> {
    let config = lock(&state.pivot_config, "config")?;
    let view = lock(&state.pivot_view, "view")?;
    let stale = lock(&state.view_is_stale, "stale flag")?;
    Ok(view_to_response(&view, &config, *stale))
}

pub fn current_config(state: &AppState) -> Result<PivotConfig, String> {
    Ok(lock(&state.pivot_config, "config")?.clone())
}

// ============================================================================
// PRESENTATION
// ============================================================================

/// The field palette with each field's current zone.
pub fn field_list(config: &PivotConfig) -> Vec<FieldInfo> {
    Field::ALL
        .iter()
        .map(|&field| FieldInfo::new(field, config.zone_of(field)))
        .collect()
}

/// Renders the view as text cells: one header line of leaf identifiers,
/// then one line per row with group values and formatted scalars.
pub fn format_view_table(view: &PivotView) -> Vec<Vec<String>> {
    let leaves = view.leaf_columns();
    let mut lines = Vec::with_capacity(view.row_count() + 1);

    lines.push(
        leaves
            .iter()
            .map(|leaf| match leaf.kind {
                ColumnKind::RowKey => leaf.header_name.clone(),
                ColumnKind::Value => leaf.field.clone(),
            })
            .collect(),
    );

    for row in &view.rows {
        let cells = leaves
            .iter()
            .map(|leaf| match leaf.kind {
                ColumnKind::RowKey => Field::from_name(&leaf.field)
                    .and_then(|f| row.group_value(f))
                    .map(|v| v.display_text())
                    .unwrap_or_default(),
                ColumnKind::Value => row.formatted(&leaf.field),
            })
            .collect();
        lines.push(cells);
    }

    lines
}
