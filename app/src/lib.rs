//! FILENAME: app/src/lib.rs
// PURPOSE: Host for the interactive pivot table: shared state, dataset
// loading and the commands a renderer drives.

use std::sync::{Arc, Mutex};

use pivot_engine::{Dataset, PivotConfig, PivotView};

pub mod config;
pub mod dataset;
pub mod logging;
pub mod pivot;

pub use config::{AppConfig, ConfigError};
pub use dataset::DatasetError;
pub use pivot::types::{FieldInfo, PivotViewResponse};

/// Session state shared by every command.
#[derive(Debug)]
pub struct AppState {
    pub app_config: AppConfig,
    /// Source records, loaded once and never mutated
    pub dataset: Arc<Dataset>,
    /// The active configuration, replaced wholesale on every change
    pub pivot_config: Mutex<PivotConfig>,
    /// Last computed view
    pub pivot_view: Mutex<PivotView>,
    /// Set when the last recompute was skipped by the guard
    pub view_is_stale: Mutex<bool>,
}

/// State over an already loaded dataset, with an empty configuration.
pub fn create_app_state(dataset: Dataset) -> AppState {
    create_app_state_with(AppConfig::default(), dataset)
}

pub fn create_app_state_with(app_config: AppConfig, dataset: Dataset) -> AppState {
    log_info!("SYS", "Creating AppState with {} records", dataset.record_count());
    AppState {
        app_config,
        dataset: Arc::new(dataset),
        pivot_config: Mutex::new(PivotConfig::new()),
        pivot_view: Mutex::new(PivotView::empty()),
        view_is_stale: Mutex::new(false),
    }
}

/// Opens the log file and loads the configured (or bundled) dataset.
pub fn load_app_state(app_config: AppConfig) -> Result<AppState, String> {
    if let Some(path) = &app_config.log_file {
        let path = logging::init_log_file(path)?;
        log_info!("SYS", "Logging to {:?}", path);
    }

    let mut rng = app_config.rng();
    let dataset = match &app_config.dataset_path {
        Some(path) => dataset::load_from_path(path, &mut rng),
        None => dataset::load_bundled(&mut rng),
    }
    .map_err(|e| {
        log_error!("SYS", "dataset load failed: {}", e);
        e.to_string()
    })?;

    Ok(create_app_state_with(app_config, dataset))
}
