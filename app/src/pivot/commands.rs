//! FILENAME: app/src/pivot/commands.rs
//! PURPOSE: Commands driving the interactive pivot table.
//! CONTEXT: Each command mutates the configuration through the engine's
//! pure transitions and recomputes explicitly before returning the view.

use pivot_engine::AggregationOperator;

use crate::pivot::operations::*;
use crate::pivot::types::*;
use crate::{log_enter, log_exit, log_info, log_warn, AppState};

// ============================================================================
// COMMANDS
// ============================================================================

/// Places a field into a zone. Rejected drops leave the state untouched.
pub fn drop_field(state: &AppState, zone: &str, field: &str) -> Result<PivotViewResponse, String> {
    log_enter!("PIVOT", "drop_field", "zone={} field={}", zone, field);

    let zone = parse_zone(zone)?;
    let field = parse_field(field)?;

    let result = update_config(state, |config| {
        config.with_field_dropped(zone, field).map_err(|e| e.to_string())
    });

    match &result {
        Ok(response) => log_info!(
            "PIVOT",
            "drop_field {} -> {} v{} rows={} stale={}",
            field,
            zone,
            response.config_version,
            response.row_count,
            response.is_stale
        ),
        Err(e) => log_warn!("PIVOT", "drop_field rejected: {}", e),
    }

    log_exit!("PIVOT", "drop_field");
    result
}

/// Removes a field from a zone. Removing an absent field is a no-op.
pub fn remove_field(state: &AppState, zone: &str, field: &str) -> Result<PivotViewResponse, String> {
    log_enter!("PIVOT", "remove_field", "zone={} field={}", zone, field);

    let zone = parse_zone(zone)?;
    let field = parse_field(field)?;

    let response = update_config(state, |config| Ok(config.with_field_removed(zone, field)))?;

    log_info!(
        "PIVOT",
        "remove_field {} <- {} v{} rows={} stale={}",
        field,
        zone,
        response.config_version,
        response.row_count,
        response.is_stale
    );
    log_exit!("PIVOT", "remove_field");
    Ok(response)
}

/// Selects the aggregation operator. Unknown names fall back to sum.
pub fn set_aggregation(state: &AppState, operator: &str) -> Result<PivotViewResponse, String> {
    let resolved = match AggregationOperator::parse(operator) {
        Some(op) => op,
        None => {
            log_warn!("PIVOT", "unknown aggregation '{}', using sum", operator);
            AggregationOperator::default()
        }
    };

    let response = update_config(state, |config| Ok(config.with_operator(resolved)))?;

    log_info!(
        "PIVOT",
        "set_aggregation {} v{} rows={}",
        resolved,
        response.config_version,
        response.row_count
    );
    Ok(response)
}

/// Recomputes the view from the active configuration.
/// The previous view is kept when the group or value zone is empty.
pub fn recompute(state: &AppState) -> Result<PivotViewResponse, String> {
    let response = recompute_active(state)?;
    log_info!(
        "PIVOT",
        "recompute v{} rows={} stale={}",
        response.config_version,
        response.row_count,
        response.is_stale
    );
    Ok(response)
}

/// Returns the current view without recomputing.
pub fn get_pivot_view(state: &AppState) -> Result<PivotViewResponse, String> {
    current_response(state)
}

/// Returns the draggable field palette.
pub fn get_field_list(state: &AppState) -> Result<Vec<FieldInfo>, String> {
    let config = current_config(state)?;
    Ok(field_list(&config))
}
