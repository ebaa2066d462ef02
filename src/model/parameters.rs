//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::input::{input_err_msg, read_toml};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

/// The range of progressive factors which are considered realistic.
///
/// Values outside this range are permitted, but a warning is emitted.
pub const ADVISORY_FACTOR_RANGE: RangeInclusive<f64> = 1.0..=2.0;

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_unit_param_default!(default_progressive_factor, Dimensionless, 1.25);

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// A short description of the scenario
    #[serde(default)]
    pub description: Option<String>,
    /// Multiplier applied to every sector's baseline tariff
    #[serde(default = "default_progressive_factor")]
    pub progressive_factor: Dimensionless,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            description: None,
            progressive_factor: default_progressive_factor(),
        }
    }
}

/// Check that the `progressive_factor` parameter is valid.
///
/// Factors below one (i.e. regressive tariffs) are allowed.
pub fn check_progressive_factor(value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value > Dimensionless(0.0),
        "progressive_factor must be a finite number greater than zero"
    );

    if !ADVISORY_FACTOR_RANGE.contains(&value.0) {
        warn!(
            "progressive_factor ({value}) is outside the advisory range of {} to {}",
            ADVISORY_FACTOR_RANGE.start(),
            ADVISORY_FACTOR_RANGE.end()
        );
    }

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_progressive_factor(self.progressive_factor)
    }
}
