//! Loading the reference table snapshot at startup

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use shared::ReferenceTables;

use crate::config::ReferenceDataConfig;
use crate::error::{AppError, AppResult};

/// Read, parse and check the snapshot named by the configuration
pub fn load_reference_tables(config: &ReferenceDataConfig) -> AppResult<Arc<ReferenceTables>> {
    let path = Path::new(&config.path);
    let file = File::open(path).map_err(|e| {
        AppError::Configuration(format!("cannot open reference data {}: {}", path.display(), e))
    })?;

    let tables = ReferenceTables::from_reader(BufReader::new(file))
        .map_err(|e| AppError::ReferenceData(e.to_string()))?;
    tables
        .validate(config.strict_range_order)
        .map_err(|e| AppError::ReferenceData(e.to_string()))?;

    tracing::info!(
        crops = tables.crops.len(),
        regions = tables.regions.len(),
        manures = tables.manures.len(),
        units = tables.units.len(),
        "Reference data loaded from {}",
        path.display()
    );

    Ok(Arc::new(tables))
}
