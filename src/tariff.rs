//! The tariff-elasticity engine.
//!
//! A progressive factor is applied to each sector's baseline tariff and the resulting change in
//! demand is estimated with a linear constant-elasticity approximation:
//!
//! ```text
//! new_tariff         = baseline_tariff * progressive_factor
//! price_change_ratio = (new_tariff - baseline_tariff) / baseline_tariff
//! new_demand         = baseline_demand * (1 + price_elasticity * price_change_ratio)
//! ```
//!
//! Results are returned at full precision. Negative demand is not clamped, so callers can detect
//! over-aggressive tariff policies.
use crate::sector::{SectorID, SectorParameters};
use crate::units::{Dimensionless, Money, MoneyPerVolume, Volume};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Indicates that the engine was given parameters for which results are undefined.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidParameterError {
    /// No sectors were supplied
    EmptySectors,
    /// A sector's baseline tariff is zero, negative or NaN
    NonPositiveTariff {
        /// The offending sector
        sector_id: String,
        /// The value supplied for its baseline tariff
        tariff: MoneyPerVolume,
    },
}

impl fmt::Display for InvalidParameterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EmptySectors => write!(f, "At least one sector must be provided"),
            Self::NonPositiveTariff { sector_id, tariff } => write!(
                f,
                "Baseline tariff for sector {sector_id} must be greater than zero (got {tariff})"
            ),
        }
    }
}

impl Error for InvalidParameterError {}

/// The effect of a new tariff on a single sector.
///
/// The baseline inputs are carried along so that a row can be tabulated on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorResult {
    /// The sector these results are for
    pub sector_id: SectorID,
    /// Volume consumed at the baseline tariff
    pub baseline_demand: Volume,
    /// Tariff before the progressive factor is applied
    pub baseline_tariff: MoneyPerVolume,
    /// Price elasticity of demand for the sector
    pub price_elasticity: Dimensionless,
    /// Tariff after the progressive factor is applied
    pub new_tariff: MoneyPerVolume,
    /// Proportional change in tariff
    pub price_change_ratio: Dimensionless,
    /// Estimated volume consumed at the new tariff (may be negative)
    pub new_demand: Volume,
    /// Fall in consumption relative to baseline (negative if demand rose)
    pub demand_reduction: Volume,
    /// Revenue at the baseline tariff and demand
    pub baseline_revenue: Money,
    /// Revenue at the new tariff and demand
    pub new_revenue: Money,
}

/// Totals across all sectors for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Total baseline demand
    pub baseline_demand: Volume,
    /// Total demand at the new tariffs
    pub new_demand: Volume,
    /// Total fall in demand
    pub demand_reduction: Volume,
    /// Total baseline revenue
    pub baseline_revenue: Money,
    /// Total revenue at the new tariffs
    pub new_revenue: Money,
    /// Difference between new and baseline revenue
    pub revenue_change: Money,
}

/// Evaluate the effect of applying a progressive tariff factor to every sector.
///
/// # Arguments
///
/// * `sectors` - Baseline parameters for each sector
/// * `progressive_factor` - Multiplier applied uniformly to every baseline tariff
///
/// # Returns
///
/// One [`SectorResult`] per sector, in the same order as `sectors`. If any sector is invalid, an
/// error is returned and no results are produced.
pub fn evaluate(
    sectors: &[SectorParameters],
    progressive_factor: Dimensionless,
) -> Result<Vec<SectorResult>, InvalidParameterError> {
    check_sectors(sectors)?;

    Ok(sectors
        .iter()
        .map(|sector| derive_result(sector, sector.baseline_tariff * progressive_factor))
        .collect())
}

/// Evaluate a single sector against an explicit new tariff.
///
/// This allows for factors which differ between sectors.
pub fn evaluate_sector(
    sector: &SectorParameters,
    new_tariff: MoneyPerVolume,
) -> Result<SectorResult, InvalidParameterError> {
    check_tariff(sector)?;

    Ok(derive_result(sector, new_tariff))
}

/// Sum results across sectors
pub fn summarise(results: &[SectorResult]) -> EvaluationSummary {
    let baseline_demand = results.iter().map(|r| r.baseline_demand).sum();
    let new_demand = results.iter().map(|r| r.new_demand).sum();
    let baseline_revenue = results.iter().map(|r| r.baseline_revenue).sum();
    let new_revenue = results.iter().map(|r| r.new_revenue).sum();

    EvaluationSummary {
        baseline_demand,
        new_demand,
        demand_reduction: baseline_demand - new_demand,
        baseline_revenue,
        new_revenue,
        revenue_change: new_revenue - baseline_revenue,
    }
}

/// Check that results can be calculated for every sector
fn check_sectors(sectors: &[SectorParameters]) -> Result<(), InvalidParameterError> {
    if sectors.is_empty() {
        return Err(InvalidParameterError::EmptySectors);
    }

    sectors.iter().try_for_each(check_tariff)
}

/// Check that the baseline tariff can safely be used as a divisor
fn check_tariff(sector: &SectorParameters) -> Result<(), InvalidParameterError> {
    // NB: written this way round so that NaN is rejected too
    if sector.baseline_tariff > MoneyPerVolume(0.0) {
        Ok(())
    } else {
        Err(InvalidParameterError::NonPositiveTariff {
            sector_id: sector.id.to_string(),
            tariff: sector.baseline_tariff,
        })
    }
}

/// Calculate the results for one sector. The baseline tariff must already have been checked.
fn derive_result(sector: &SectorParameters, new_tariff: MoneyPerVolume) -> SectorResult {
    let price_change_ratio = (new_tariff - sector.baseline_tariff) / sector.baseline_tariff;
    let new_demand = sector.baseline_demand
        * (Dimensionless(1.0) + sector.price_elasticity * price_change_ratio);

    SectorResult {
        sector_id: sector.id.clone(),
        baseline_demand: sector.baseline_demand,
        baseline_tariff: sector.baseline_tariff,
        price_elasticity: sector.price_elasticity,
        new_tariff,
        price_change_ratio,
        new_demand,
        demand_reduction: sector.baseline_demand - new_demand,
        baseline_revenue: sector.baseline_demand * sector.baseline_tariff,
        new_revenue: new_demand * new_tariff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{sector_industrial, sector_irrigation, sector_urban, sectors};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    /// The result expected when a sector's tariff is left unchanged
    fn unchanged(sector: &SectorParameters) -> SectorResult {
        SectorResult {
            sector_id: sector.id.clone(),
            baseline_demand: sector.baseline_demand,
            baseline_tariff: sector.baseline_tariff,
            price_elasticity: sector.price_elasticity,
            new_tariff: sector.baseline_tariff,
            price_change_ratio: Dimensionless(0.0),
            new_demand: sector.baseline_demand,
            demand_reduction: Volume(0.0),
            baseline_revenue: Money(sector.baseline_demand.0 * sector.baseline_tariff.0),
            new_revenue: Money(sector.baseline_demand.0 * sector.baseline_tariff.0),
        }
    }

    /// Check that every derived quantity matches, allowing for rounding error
    fn assert_result_approx_eq(actual: &SectorResult, expected: &SectorResult) {
        assert_eq!(actual.sector_id, expected.sector_id);
        assert_eq!(actual.baseline_demand, expected.baseline_demand);
        assert_eq!(actual.baseline_tariff, expected.baseline_tariff);
        assert_eq!(actual.price_elasticity, expected.price_elasticity);
        assert_approx_eq!(
            MoneyPerVolume,
            actual.new_tariff,
            expected.new_tariff,
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Dimensionless,
            actual.price_change_ratio,
            expected.price_change_ratio,
            epsilon = 1e-12
        );
        assert_approx_eq!(Volume, actual.new_demand, expected.new_demand, epsilon = 1e-9);
        assert_approx_eq!(
            Volume,
            actual.demand_reduction,
            expected.demand_reduction,
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Money,
            actual.baseline_revenue,
            expected.baseline_revenue,
            epsilon = 1e-9
        );
        assert_approx_eq!(Money, actual.new_revenue, expected.new_revenue, epsilon = 1e-9);
    }

    #[rstest]
    fn test_evaluate_urban(sector_urban: SectorParameters) {
        let results = evaluate(std::slice::from_ref(&sector_urban), Dimensionless(1.25)).unwrap();
        assert_eq!(results.len(), 1);
        assert_result_approx_eq(
            &results[0],
            &SectorResult {
                new_tariff: MoneyPerVolume(1.25),
                price_change_ratio: Dimensionless(0.25),
                new_demand: Volume(950.0),
                demand_reduction: Volume(50.0),
                new_revenue: Money(1187.5),
                ..unchanged(&sector_urban)
            },
        );
    }

    #[rstest]
    fn test_evaluate_industrial(sector_industrial: SectorParameters) {
        let results =
            evaluate(std::slice::from_ref(&sector_industrial), Dimensionless(1.25)).unwrap();
        assert_result_approx_eq(
            &results[0],
            &SectorResult {
                new_tariff: MoneyPerVolume(2.5),
                price_change_ratio: Dimensionless(0.25),
                new_demand: Volume(1350.0),
                demand_reduction: Volume(150.0),
                new_revenue: Money(3375.0),
                ..unchanged(&sector_industrial)
            },
        );
        assert_eq!(results[0].baseline_revenue, Money(3000.0));
    }

    #[rstest]
    fn test_evaluate_preserves_order(
        sectors: Vec<SectorParameters>,
        sector_irrigation: SectorParameters,
    ) {
        let results = evaluate(&sectors, Dimensionless(1.25)).unwrap();
        assert!(
            results
                .iter()
                .map(|r| &r.sector_id)
                .eq(sectors.iter().map(|s| &s.id))
        );
        assert_result_approx_eq(
            &results[1],
            &SectorResult {
                new_tariff: MoneyPerVolume(1.875),
                price_change_ratio: Dimensionless(0.25),
                new_demand: Volume(1850.0),
                demand_reduction: Volume(150.0),
                new_revenue: Money(3468.75),
                ..unchanged(&sector_irrigation)
            },
        );
    }

    #[rstest]
    fn test_evaluate_identity_factor(sectors: Vec<SectorParameters>) {
        let results = evaluate(&sectors, Dimensionless(1.0)).unwrap();
        for (sector, result) in sectors.iter().zip(&results) {
            // These should be exact, not just approximately equal
            assert_eq!(*result, unchanged(sector));
        }
    }

    #[rstest]
    #[case(1.05)]
    #[case(1.25)]
    #[case(1.5)]
    #[case(2.0)]
    fn test_evaluate_negative_elasticity_reduces_demand(
        sectors: Vec<SectorParameters>,
        #[case] factor: f64,
    ) {
        let results = evaluate(&sectors, Dimensionless(factor)).unwrap();
        for result in results {
            assert!(result.new_demand < result.baseline_demand);
            assert!(result.demand_reduction > Volume(0.0));
        }
    }

    #[rstest]
    #[case(0.5)]
    #[case(1.0)]
    #[case(1.3)]
    #[case(2.0)]
    fn test_price_change_ratio_is_factor_minus_one(
        sectors: Vec<SectorParameters>,
        #[case] factor: f64,
    ) {
        let results = evaluate(&sectors, Dimensionless(factor)).unwrap();
        for result in results {
            assert_approx_eq!(
                Dimensionless,
                result.price_change_ratio,
                Dimensionless(factor - 1.0),
                epsilon = 1e-12
            );
        }
    }

    #[rstest]
    fn test_price_change_ratio_scale_invariant(sector_urban: SectorParameters) {
        let mut scaled = sector_urban.clone();
        scaled.baseline_tariff = sector_urban.baseline_tariff * Dimensionless(2.0);

        let a = evaluate_sector(&sector_urban, MoneyPerVolume(1.4)).unwrap();
        let b = evaluate_sector(&scaled, MoneyPerVolume(2.8)).unwrap();
        assert_approx_eq!(
            Dimensionless,
            a.price_change_ratio,
            b.price_change_ratio,
            epsilon = 1e-12
        );
    }

    #[rstest]
    #[case(1.0, 1.0, 0.0, 1000.0, 1000.0)] // Unchanged
    #[case(1.5, 1.5, 0.5, 900.0, 1350.0)]
    #[case(2.0, 2.0, 1.0, 800.0, 1600.0)]
    #[case(0.8, 0.8, -0.2, 1040.0, 832.0)] // Regressive tariff
    fn test_evaluate_sector(
        sector_urban: SectorParameters,
        #[case] new_tariff: f64,
        #[case] expected_tariff: f64,
        #[case] expected_ratio: f64,
        #[case] expected_demand: f64,
        #[case] expected_revenue: f64,
    ) {
        let result = evaluate_sector(&sector_urban, MoneyPerVolume(new_tariff)).unwrap();
        assert_result_approx_eq(
            &result,
            &SectorResult {
                new_tariff: MoneyPerVolume(expected_tariff),
                price_change_ratio: Dimensionless(expected_ratio),
                new_demand: Volume(expected_demand),
                demand_reduction: Volume(1000.0 - expected_demand),
                new_revenue: Money(expected_revenue),
                ..unchanged(&sector_urban)
            },
        );
    }

    #[rstest]
    fn test_evaluate_sector_non_uniform(sectors: Vec<SectorParameters>) {
        // Different factors for different sectors
        let results: Vec<_> = sectors
            .iter()
            .zip([1.0, 1.5, 2.0])
            .map(|(sector, factor)| {
                evaluate_sector(sector, sector.baseline_tariff * Dimensionless(factor)).unwrap()
            })
            .collect();

        assert_eq!(results[0], unchanged(&sectors[0]));
        assert_approx_eq!(Volume, results[1].new_demand, Volume(1700.0), epsilon = 1e-9);
        assert_approx_eq!(Money, results[1].new_revenue, Money(3825.0), epsilon = 1e-9);
        assert_approx_eq!(Volume, results[2].new_demand, Volume(900.0), epsilon = 1e-9);
        assert_approx_eq!(Money, results[2].new_revenue, Money(3600.0), epsilon = 1e-9);
    }

    #[rstest]
    fn test_evaluate_negative_demand_not_clamped(mut sector_urban: SectorParameters) {
        sector_urban.price_elasticity = Dimensionless(-1.5);

        // 1000 * (1 - 1.5 * 1.0) = -500
        let results = evaluate(std::slice::from_ref(&sector_urban), Dimensionless(2.0)).unwrap();
        assert_result_approx_eq(
            &results[0],
            &SectorResult {
                new_tariff: MoneyPerVolume(2.0),
                price_change_ratio: Dimensionless(1.0),
                new_demand: Volume(-500.0),
                demand_reduction: Volume(1500.0),
                new_revenue: Money(-1000.0),
                ..unchanged(&sector_urban)
            },
        );
    }

    #[test]
    fn test_evaluate_empty() {
        assert_eq!(
            evaluate(&[], Dimensionless(1.25)),
            Err(InvalidParameterError::EmptySectors)
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn test_evaluate_non_positive_tariff(mut sectors: Vec<SectorParameters>, #[case] tariff: f64) {
        // An invalid sector anywhere in the list means no results at all
        sectors[2].baseline_tariff = MoneyPerVolume(tariff);
        let err = evaluate(&sectors, Dimensionless(1.25)).unwrap_err();
        assert!(matches!(
            err,
            InvalidParameterError::NonPositiveTariff { ref sector_id, .. }
                if sector_id == "industrial"
        ));
    }

    #[test]
    fn test_invalid_parameter_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<InvalidParameterError>();
    }

    #[rstest]
    fn test_evaluate_sector_zero_tariff(mut sector_urban: SectorParameters) {
        sector_urban.baseline_tariff = MoneyPerVolume(0.0);
        assert_eq!(
            evaluate_sector(&sector_urban, MoneyPerVolume(1.0))
                .unwrap_err()
                .to_string(),
            "Baseline tariff for sector urban must be greater than zero (got 0)"
        );
    }

    #[rstest]
    fn test_summarise(sectors: Vec<SectorParameters>) {
        let results = evaluate(&sectors, Dimensionless(1.25)).unwrap();
        let summary = summarise(&results);
        assert_approx_eq!(Volume, summary.baseline_demand, Volume(4500.0));
        assert_approx_eq!(Volume, summary.new_demand, Volume(4150.0), epsilon = 1e-9);
        assert_approx_eq!(
            Volume,
            summary.demand_reduction,
            Volume(350.0),
            epsilon = 1e-9
        );
        assert_approx_eq!(Money, summary.baseline_revenue, Money(7000.0));
        assert_approx_eq!(Money, summary.new_revenue, Money(8031.25), epsilon = 1e-9);
        assert_approx_eq!(
            Money,
            summary.revenue_change,
            Money(1031.25),
            epsilon = 1e-9
        );
    }
}
