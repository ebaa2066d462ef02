//! User-level defaults for `tariffsim`, read from `settings.toml` in the config directory.
use crate::get_tariffsim_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Folder under which results for each model are written, unless `--output-dir` is given
const DEFAULT_OUTPUT_ROOT: &str = "tariffsim_results";

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_tariffsim_config_dir().join(SETTINGS_FILE_NAME)
}

/// Defaults for a run which can be overridden on the command line
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Log level used unless TARIFFSIM_LOG_LEVEL is set (error, warn, info, debug, trace or off)
    pub log_level: String,
    /// Folder in which a results folder is created for each model run
    pub output_root: PathBuf,
    /// Replace the contents of an existing results folder
    pub overwrite: bool,
    /// Also write the price response of each sector to debug_price_change.csv
    pub debug_model: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            overwrite: false,
            debug_model: false,
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory, or use the defaults if there is no file
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if file_path.is_file() {
            read_toml(file_path)
        } else {
            Ok(Settings::default())
        }
    }

    /// A settings file listing every setting with its default value, all commented out
    pub fn default_file_contents() -> Result<String> {
        let defaults = toml::Table::try_from(Settings::default())
            .context("Could not convert settings to TOML")?;

        let mut out = String::from("# tariffsim settings\n# Uncomment a line to change a default\n");
        for (key, value) in &defaults {
            let docs = Settings::get_field_docs(key)
                .with_context(|| format!("No documentation for setting {key}"))?;
            writeln!(out)?;
            for line in docs.lines() {
                writeln!(out, "# # {}", line.trim())?;
            }
            writeln!(out, "# {key} = {value}")?;
        }

        Ok(out)
    }
}
