//! Functionality for running a tariff model and saving its results.
use crate::model::Model;
use crate::output::metadata::write_metadata;
use crate::output::{DataWriter, format_results_table};
use crate::tariff::{SectorResult, summarise};
use crate::units::Volume;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

/// Run the tariff model.
///
/// # Arguments
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write additional information (e.g. price response) to file
///
/// # Returns
///
/// The results for each sector.
pub fn run(model: &Model, output_path: &Path, debug_model: bool) -> Result<Vec<SectorResult>> {
    info!(
        "Applying progressive factor of {} to {} sector(s)",
        model.progressive_factor(),
        model.sectors.len()
    );

    let results = model.evaluate()?;
    for result in &results {
        if result.new_demand < Volume(0.0) {
            warn!(
                "Estimated demand for sector {} is negative ({}). The tariff change is too large \
                for the linear elasticity approximation to be meaningful.",
                result.sector_id, result.new_demand
            );
        }
    }

    let summary = summarise(&results);
    info!(
        "Total demand falls from {:.1} to {:.1} m³; total revenue changes from {:.2} to {:.2}",
        summary.baseline_demand.value(),
        summary.new_demand.value(),
        summary.baseline_revenue.value(),
        summary.new_revenue.value()
    );

    // Write results to CSV files
    let mut writer =
        DataWriter::create(output_path, debug_model).context("Failed to create output files.")?;
    writer.write_results(&results)?;
    writer.write_summary(&summary)?;
    writer.flush()?;
    write_metadata(output_path, model).context("Failed to save metadata.")?;

    println!("{}", format_results_table(&results));

    Ok(results)
}
