//! Scenario runner for yield sweeps, rate shifts and position batches
//!
//! Holds one configured [`Valuator`] and reuses it across many bonds or
//! rates. Runs sequentially.

use crate::bond::{BondPosition, BondSpec};
use crate::error::{BondError, BondResult};
use crate::pricing::{price, AccrualDates, BondAnalysis, Valuator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Yield range for a price-yield curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// First yield (inclusive)
    pub start: f64,
    /// Last yield (inclusive)
    pub end: f64,
    /// Number of evenly spaced points
    pub points: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            start: 0.01,
            end: 0.15,
            points: 100,
        }
    }
}

/// One point on a price-yield curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub yield_rate: f64,
    pub price: f64,
}

/// Full repricing vs. duration/convexity estimates for a parallel shift
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateShiftScenario {
    pub shift_bps: f64,
    pub shifted_rate: f64,
    pub repriced: f64,
    pub duration_estimate: f64,
    pub convexity_estimate: f64,
}

impl RateShiftScenario {
    /// Error of the duration + convexity estimate against full repricing
    pub fn estimate_error(&self) -> f64 {
        self.convexity_estimate - self.repriced
    }
}

/// Valuation of one loaded position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResult {
    pub bond_id: String,
    pub analysis: BondAnalysis,
}

/// Pre-configured runner for repeated valuations
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    valuator: Valuator,
}

impl ScenarioRunner {
    pub fn new(valuator: Valuator) -> Self {
        Self { valuator }
    }

    pub fn valuator(&self) -> &Valuator {
        &self.valuator
    }

    /// Price the bond across evenly spaced yields
    pub fn price_yield_curve(&self, spec: &BondSpec, curve: &CurveConfig) -> BondResult<Vec<CurvePoint>> {
        if curve.points < 2 {
            return Err(BondError::invalid_spec("curve", "needs at least two points"));
        }

        let step = (curve.end - curve.start) / (curve.points - 1) as f64;
        (0..curve.points)
            .map(|i| {
                let yield_rate = if i == curve.points - 1 {
                    curve.end
                } else {
                    curve.start + step * i as f64
                };
                Ok(CurvePoint {
                    yield_rate,
                    price: price(spec, yield_rate)?,
                })
            })
            .collect()
    }

    /// Reprice under parallel shifts and compare with the risk-metric estimates
    pub fn rate_shifts(
        &self,
        spec: &BondSpec,
        base_rate: f64,
        shifts_bps: &[f64],
    ) -> BondResult<Vec<RateShiftScenario>> {
        let base_price = self.valuator.price(spec, base_rate)?;
        let risk = self.valuator.duration_and_convexity(spec, base_rate)?;

        shifts_bps
            .iter()
            .map(|&shift_bps| {
                let change = shift_bps / 10_000.0;
                let shifted_rate = base_rate + change;
                let sensitivity = risk.price_sensitivity(base_price, change);

                Ok(RateShiftScenario {
                    shift_bps,
                    shifted_rate,
                    repriced: self.valuator.price(spec, shifted_rate)?,
                    duration_estimate: base_price * (1.0 + sensitivity.duration_effect),
                    convexity_estimate: sensitivity.new_price,
                })
            })
            .collect()
    }

    /// Analyze every position; accrual uses `as_of` for positions with a last payment date
    pub fn run_positions(&self, positions: &[BondPosition], as_of: NaiveDate) -> BondResult<Vec<PositionResult>> {
        positions
            .iter()
            .map(|position| {
                let dates = position.last_payment_date.map(|last_payment| AccrualDates {
                    last_payment,
                    as_of,
                });
                let analysis = self
                    .valuator
                    .analyze(&position.spec, position.discount_rate, dates)
                    .map_err(|e| {
                        log::error!("Bond {} failed: {}", position.bond_id, e);
                        e
                    })?;

                Ok(PositionResult {
                    bond_id: position.bond_id.clone(),
                    analysis,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::{load_positions_from_reader, Frequency};

    fn test_bond() -> BondSpec {
        BondSpec::new(1000.0, 0.05, 10.0, Frequency::SemiAnnual).unwrap()
    }

    #[test]
    fn test_default_curve() {
        let runner = ScenarioRunner::default();
        let curve = runner.price_yield_curve(&test_bond(), &CurveConfig::default()).unwrap();

        assert_eq!(curve.len(), 100);
        assert_eq!(curve[0].yield_rate, 0.01);
        assert_eq!(curve[99].yield_rate, 0.15);
        assert!(curve.windows(2).all(|w| w[1].price < w[0].price));
    }

    #[test]
    fn test_curve_needs_two_points() {
        let runner = ScenarioRunner::default();
        let curve = CurveConfig {
            points: 1,
            ..Default::default()
        };
        assert!(runner.price_yield_curve(&test_bond(), &curve).is_err());
    }

    #[test]
    fn test_rate_shifts() {
        let runner = ScenarioRunner::default();
        let scenarios = runner.rate_shifts(&test_bond(), 0.05, &[-100.0, 0.0, 100.0]).unwrap();

        assert_eq!(scenarios.len(), 3);
        let flat = &scenarios[1];
        assert!((flat.repriced - 1000.0).abs() < 1e-8);
        assert!((flat.convexity_estimate - flat.repriced).abs() < 1e-8);

        for s in [&scenarios[0], &scenarios[2]] {
            // Adding convexity should bring the estimate closer to full repricing
            let duration_error = (s.duration_estimate - s.repriced).abs();
            assert!(s.estimate_error().abs() < duration_error, "shift {}", s.shift_bps);
        }
        assert!(scenarios[0].repriced > scenarios[2].repriced);
    }

    #[test]
    fn test_run_positions() {
        let csv = "\
BondID,FaceValue,CouponRate,YearsToMaturity,Frequency,DiscountRate,LastPaymentDate
A,1000,0.05,10,Annual,0.05,2024-01-01
B,1000,0.05,10,Semi-annual,0.06,
";
        let positions = load_positions_from_reader(csv.as_bytes()).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let results = ScenarioRunner::default().run_positions(&positions, as_of).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].bond_id, "A");
        assert!((results[0].analysis.clean_price - 1000.0).abs() < 1e-8);
        assert!(results[0].analysis.accrued_interest.is_some());
        assert!(results[1].analysis.accrued_interest.is_none());
        assert!(results[1].analysis.clean_price < 1000.0);
    }
}
