//! Water usage sectors (e.g. urban, irrigation, industrial).
use crate::id::{define_id_getter, define_id_type};
use crate::units::{Dimensionless, MoneyPerVolume, Volume};
use serde::Deserialize;

define_id_type! {SectorID}

/// The baseline state of a single water usage sector.
///
/// Sectors are independent of one another: there is no substitution between sectors and no
/// shared pool of demand.
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct SectorParameters {
    /// Unique identifier for the sector (e.g. "urban")
    pub id: SectorID,
    /// Volume consumed at the baseline tariff
    pub baseline_demand: Volume,
    /// Price per unit volume before the progressive factor is applied
    pub baseline_tariff: MoneyPerVolume,
    /// Proportional change in demand per proportional change in price.
    ///
    /// Normally negative, though this is not enforced.
    pub price_elasticity: Dimensionless,
}
define_id_getter! {SectorParameters, SectorID}

impl SectorParameters {
    /// Create a new [`SectorParameters`]
    pub fn new(
        id: &str,
        baseline_demand: Volume,
        baseline_tariff: MoneyPerVolume,
        price_elasticity: Dimensionless,
    ) -> Self {
        Self {
            id: id.into(),
            baseline_demand,
            baseline_tariff,
            price_elasticity,
        }
    }
}
