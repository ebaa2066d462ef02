//! Code for tariff models.
use crate::sector::SectorParameters;
use crate::tariff::{SectorResult, evaluate};
use crate::units::Dimensionless;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub mod parameters;
pub use parameters::{ModelParameters, check_progressive_factor};

/// A tariff scenario: the sectors affected and the tariff policy applied to them
#[derive(Debug, PartialEq)]
pub struct Model {
    /// Path to the model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Sectors, in the order they were defined
    pub sectors: Vec<SectorParameters>,
}

impl Model {
    /// The progressive factor applied to every sector's tariff
    pub fn progressive_factor(&self) -> Dimensionless {
        self.parameters.progressive_factor
    }

    /// Replace the model's progressive factor, e.g. with one given on the command line
    pub fn set_progressive_factor(&mut self, value: Dimensionless) -> Result<()> {
        check_progressive_factor(value)?;
        self.parameters.progressive_factor = value;

        Ok(())
    }

    /// Calculate the effect of the model's tariff policy on each sector
    pub fn evaluate(&self) -> Result<Vec<SectorResult>> {
        let results = evaluate(&self.sectors, self.progressive_factor())
            .context("Failed to evaluate tariff model.")?;

        Ok(results)
    }
}
