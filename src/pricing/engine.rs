//! Discounted cash-flow pricing

use super::cashflows::{Cashflow, CashflowSchedule};
use crate::bond::{BondSpec, Frequency};
use crate::error::{BondError, BondResult};
use serde::{Deserialize, Serialize};

/// Annual discount rate paired with the frequency it is applied at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountContext {
    /// Annual discount or yield rate (fraction, 0.05 = 5%)
    annual_rate: f64,

    /// Frequency used to derive the periodic rate
    frequency: Frequency,
}

impl DiscountContext {
    /// Create a context, rejecting rates whose periodic discount base
    /// `1 + rate / n` is zero or negative.
    pub fn new(annual_rate: f64, frequency: Frequency) -> BondResult<Self> {
        if !annual_rate.is_finite() {
            return Err(BondError::InvalidRate {
                rate: annual_rate,
                reason: "rate must be finite".to_string(),
            });
        }

        let base = 1.0 + frequency.periodic_rate(annual_rate);
        if base <= 0.0 {
            return Err(BondError::InvalidRate {
                rate: annual_rate,
                reason: format!(
                    "periodic discount base 1 + rate/{} is {} (division by zero or sign flip)",
                    frequency.payments_per_year(),
                    base
                ),
            });
        }

        Ok(Self {
            annual_rate,
            frequency,
        })
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Rate per coupon period (annual rate / payments per year)
    pub fn periodic_rate(&self) -> f64 {
        self.frequency.periodic_rate(self.annual_rate)
    }

    /// Discount factor to the end of `period`
    pub fn discount_factor(&self, period: u32) -> f64 {
        1.0 / (1.0 + self.periodic_rate()).powi(period as i32)
    }

    /// Present value of a single scheduled payment
    pub fn present_value(&self, cashflow: &Cashflow) -> f64 {
        cashflow.amount * self.discount_factor(cashflow.period)
    }
}

/// A scheduled payment with its present value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountedCashflow {
    pub cashflow: Cashflow,
    pub present_value: f64,
}

/// Discount every payment of a schedule
pub fn discount_schedule(schedule: &CashflowSchedule, ctx: &DiscountContext) -> Vec<DiscountedCashflow> {
    schedule
        .iter()
        .map(|cf| DiscountedCashflow {
            cashflow: *cf,
            present_value: ctx.present_value(cf),
        })
        .collect()
}

/// Clean price of a bond: sum of discounted coupons and principal
pub fn price(spec: &BondSpec, discount_rate: f64) -> BondResult<f64> {
    let ctx = DiscountContext::new(discount_rate, spec.frequency())?;
    Ok(price_with_context(spec, &ctx))
}

/// Price against an already-validated discount context
pub(crate) fn price_with_context(spec: &BondSpec, ctx: &DiscountContext) -> f64 {
    CashflowSchedule::for_bond(spec)
        .iter()
        .map(|cf| ctx.present_value(cf))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ten_year(frequency: Frequency) -> BondSpec {
        BondSpec::new(1000.0, 0.05, 10.0, frequency).unwrap()
    }

    #[test]
    fn test_par_bond_annual() {
        let p = price(&ten_year(Frequency::Annual), 0.05).unwrap();
        assert_abs_diff_eq!(p, 1000.0, epsilon = 1e-8);
    }

    #[test]
    fn test_par_bond_all_frequencies() {
        for freq in Frequency::ALL {
            let p = price(&ten_year(freq), 0.05).unwrap();
            assert_abs_diff_eq!(p, 1000.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_discount_bond_semi_annual() {
        let p = price(&ten_year(Frequency::SemiAnnual), 0.06).unwrap();
        assert!(p < 1000.0, "Expected price below par, got {}", p);
        // 25 * a(20, 3%) + 1000 * v^20
        assert_abs_diff_eq!(p, 925.6126, epsilon = 1e-3);
    }

    #[test]
    fn test_premium_bond() {
        let p = price(&ten_year(Frequency::Annual), 0.04).unwrap();
        assert!(p > 1000.0);
        assert_abs_diff_eq!(p, 1081.1090, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_rate_is_undiscounted_total() {
        let spec = ten_year(Frequency::Quarterly);
        let p = price(&spec, 0.0).unwrap();
        assert_abs_diff_eq!(p, CashflowSchedule::for_bond(&spec).total(), epsilon = 1e-9);
    }

    #[test]
    fn test_strictly_decreasing_in_rate() {
        let spec = ten_year(Frequency::SemiAnnual);
        let mut prev = price(&spec, 0.0).unwrap();
        for step in 1..=60 {
            let p = price(&spec, step as f64 * 0.005).unwrap();
            assert!(p < prev, "Price not decreasing at step {}", step);
            prev = p;
        }
    }

    #[test]
    fn test_division_by_zero_rate() {
        let err = price(&ten_year(Frequency::Annual), -1.0).unwrap_err();
        assert!(matches!(err, BondError::InvalidRate { .. }));

        // For semi-annual the singular point is -200%
        assert!(price(&ten_year(Frequency::SemiAnnual), -1.0).is_ok());
        assert!(price(&ten_year(Frequency::SemiAnnual), -2.0).is_err());
    }

    #[test]
    fn test_negative_rate_allowed() {
        let p = price(&ten_year(Frequency::Annual), -0.01).unwrap();
        assert!(p > 1500.0);
    }

    #[test]
    fn test_discount_schedule_sums_to_price() {
        let spec = ten_year(Frequency::Monthly);
        let ctx = DiscountContext::new(0.07, spec.frequency()).unwrap();
        let discounted = discount_schedule(&CashflowSchedule::for_bond(&spec), &ctx);

        assert_eq!(discounted.len(), 120);
        let total: f64 = discounted.iter().map(|d| d.present_value).sum();
        assert_abs_diff_eq!(total, price(&spec, 0.07).unwrap(), epsilon = 1e-9);
    }
}
