use crate::data::universe::Universe;
use crate::error::{NeurotradeError, Result};
use polars::prelude::*;
use std::path::Path;

/// Reads a precomputed feature table: one header row, one row per day,
/// every column numeric.
pub struct CsvConnector;

impl CsvConnector {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| NeurotradeError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    pub fn load_universe<P: AsRef<Path>>(path: P) -> Result<Universe> {
        let df = Self::load(&path)?;
        let null_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|column| column.null_count() > 0)
            .map(|column| column.name().to_string())
            .collect();
        if !null_columns.is_empty() {
            return Err(NeurotradeError::DataLoading(format!(
                "Null values in columns {:?} of {}",
                null_columns,
                path.as_ref().display()
            )));
        }

        let universe = Universe::from_dataframe(&df)?;
        log::info!(
            "Loaded universe from {}: {} days x {} features",
            path.as_ref().display(),
            universe.len(),
            universe.width()
        );
        Ok(universe)
    }
}
