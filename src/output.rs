//! The module responsible for writing output data to disk.
use crate::sector::SectorID;
use crate::tariff::{EvaluationSummary, SectorResult};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The output file name for per-sector results
const SECTOR_RESULTS_FILE_NAME: &str = "sector_results.csv";

/// The output file name for totals across sectors
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// The output file name for the price response breakdown
const PRICE_CHANGE_FILE_NAME: &str = "debug_price_change.csv";

/// Get the default output directory for the model at the specified path.
///
/// This is a folder named after the model inside `output_root`.
pub fn get_output_dir(model_dir: &Path, output_root: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok(output_root.join(model_name))
}

/// Create a new output directory for the model, optionally overwriting existing data
///
/// # Arguments
///
/// * `output_dir` - The output directory to create/overwrite
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// True if the output dir contained existing data that was deleted, false if not, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the price change debug CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PriceChangeRow {
    sector_id: SectorID,
    price_change_ratio: Dimensionless,
    /// Proportional change in demand (elasticity multiplied by price change ratio)
    demand_response: Dimensionless,
}

impl PriceChangeRow {
    fn new(result: &SectorResult) -> Self {
        Self {
            sector_id: result.sector_id.clone(),
            price_change_ratio: result.price_change_ratio,
            demand_response: result.price_elasticity * result.price_change_ratio,
        }
    }
}

/// For writing extra debug information about the model
struct DebugDataWriter {
    price_change_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        Ok(Self {
            price_change_writer: csv::Writer::from_path(output_path.join(PRICE_CHANGE_FILE_NAME))?,
        })
    }

    /// Write the breakdown of each sector's response to the price change
    fn write_price_changes(&mut self, results: &[SectorResult]) -> Result<()> {
        for result in results {
            self.price_change_writer
                .serialize(PriceChangeRow::new(result))?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.price_change_writer.flush()?;

        Ok(())
    }
}

/// An object for writing tariff results to file
pub struct DataWriter {
    results_writer: csv::Writer<File>,
    summary_writer: csv::Writer<File>,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let debug_writer = if save_debug_info {
            // Create debug CSV files
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            results_writer: new_writer(SECTOR_RESULTS_FILE_NAME)?,
            summary_writer: new_writer(SUMMARY_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write per-sector results, at full precision, to a CSV file
    pub fn write_results(&mut self, results: &[SectorResult]) -> Result<()> {
        for result in results {
            self.results_writer.serialize(result)?;
        }

        if let Some(ref mut wtr) = self.debug_writer {
            wtr.write_price_changes(results)?;
        }

        Ok(())
    }

    /// Write totals across sectors to a CSV file
    pub fn write_summary(&mut self, summary: &EvaluationSummary) -> Result<()> {
        self.summary_writer.serialize(summary)?;

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.results_writer.flush()?;
        self.summary_writer.flush()?;
        if let Some(ref mut wtr) = self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

/// Column headings for the results table
const TABLE_HEADINGS: [&str; 9] = [
    "Sector",
    "Baseline demand (m³)",
    "Baseline tariff",
    "New tariff",
    "Elasticity",
    "New demand (m³)",
    "Demand reduction (m³)",
    "Baseline revenue",
    "New revenue",
];

/// Format results as a plain-text table for display.
///
/// Monetary values are rounded to 2 decimal places and volumes to 1 decimal place. This is for
/// presentation only: files written by [`DataWriter`] are not rounded.
pub fn format_results_table(results: &[SectorResult]) -> String {
    let rows = results
        .iter()
        .map(|r| {
            [
                r.sector_id.to_string(),
                format!("{:.1}", r.baseline_demand.value()),
                format!("{:.2}", r.baseline_tariff.value()),
                format!("{:.2}", r.new_tariff.value()),
                format!("{:.2}", r.price_elasticity.value()),
                format!("{:.1}", r.new_demand.value()),
                format!("{:.1}", r.demand_reduction.value()),
                format!("{:.2}", r.baseline_revenue.value()),
                format!("{:.2}", r.new_revenue.value()),
            ]
        })
        .collect_vec();

    // Width of each column is the width of its widest cell
    let widths = TABLE_HEADINGS
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(heading.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect_vec();

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .join(" | ")
    };

    let header = format_row(TABLE_HEADINGS.map(String::from).as_slice());
    let separator = widths.iter().map(|&width| "-".repeat(width)).join("-+-");
    let body = rows.iter().map(|row| format_row(row.as_slice())).join("\n");

    format!("{header}\n{separator}\n{body}")
}
