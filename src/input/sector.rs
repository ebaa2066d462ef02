//! Code for reading sector parameters from a CSV file.
use super::{input_err_msg, read_csv};
use crate::id::check_ids_unique;
use crate::sector::SectorParameters;
use crate::units::{Dimensionless, MoneyPerVolume, Volume};
use anyhow::{Context, Result, ensure};
use log::warn;
use std::path::Path;

const SECTORS_FILE_NAME: &str = "sectors.csv";

/// Reads sector parameters from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The sectors in the order they appear in the file, or an error.
pub fn read_sectors(model_dir: &Path) -> Result<Vec<SectorParameters>> {
    let file_path = model_dir.join(SECTORS_FILE_NAME);
    let sectors = read_csv(&file_path)?;
    validate_sectors(&sectors).with_context(|| input_err_msg(&file_path))?;

    Ok(sectors)
}

fn validate_sectors(sectors: &[SectorParameters]) -> Result<()> {
    check_ids_unique(sectors)?;
    for sector in sectors {
        validate_sector(sector)?;
    }

    Ok(())
}

/// Check that the parameters for a single sector are valid.
///
/// A positive elasticity is permitted, but a warning is emitted.
fn validate_sector(sector: &SectorParameters) -> Result<()> {
    ensure!(
        sector.baseline_demand.is_finite() && sector.baseline_demand > Volume(0.0),
        "baseline_demand for sector {} must be a finite number greater than zero",
        sector.id
    );
    ensure!(
        sector.baseline_tariff.is_finite() && sector.baseline_tariff > MoneyPerVolume(0.0),
        "baseline_tariff for sector {} must be a finite number greater than zero",
        sector.id
    );
    ensure!(
        sector.price_elasticity.is_finite(),
        "price_elasticity for sector {} must be a finite number",
        sector.id
    );

    if sector.price_elasticity > Dimensionless(0.0) {
        warn!(
            "Sector {} has a positive price elasticity ({}). Demand will rise with the tariff.",
            sector.id, sector.price_elasticity
        );
    }

    Ok(())
}
