//! Fixtures for tests
use crate::sector::SectorParameters;
use crate::units::{Dimensionless, MoneyPerVolume, Volume};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn sector_urban() -> SectorParameters {
    SectorParameters::new(
        "urban",
        Volume(1000.0),
        MoneyPerVolume(1.0),
        Dimensionless(-0.2),
    )
}

#[fixture]
pub fn sector_irrigation() -> SectorParameters {
    SectorParameters::new(
        "irrigation",
        Volume(2000.0),
        MoneyPerVolume(1.5),
        Dimensionless(-0.3),
    )
}

#[fixture]
pub fn sector_industrial() -> SectorParameters {
    SectorParameters::new(
        "industrial",
        Volume(1500.0),
        MoneyPerVolume(2.0),
        Dimensionless(-0.4),
    )
}

#[fixture]
pub fn sectors(
    sector_urban: SectorParameters,
    sector_irrigation: SectorParameters,
    sector_industrial: SectorParameters,
) -> Vec<SectorParameters> {
    vec![sector_urban, sector_irrigation, sector_industrial]
}
