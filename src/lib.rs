//! Common functionality for tariffsim, a tool for estimating the effect of progressive water
//! tariffs on sectoral demand and revenue.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod sector;
pub mod settings;
pub mod simulation;
pub mod tariff;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// This will be something like: `~/.config/tariffsim`. Falls back on the current directory if
/// the platform provides no config folder.
pub fn get_tariffsim_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("tariffsim");

    path
}
