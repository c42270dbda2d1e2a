//! Accrued interest on a 360-day year
//!
//! The reference date is always supplied by the caller; nothing here reads
//! the wall clock.

use crate::bond::BondSpec;
use crate::error::{BondError, BondResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days in the approximated coupon year
pub const DAYS_PER_YEAR: f64 = 360.0;

/// Treatment of accrual periods longer than one coupon period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualPolicy {
    /// Accrue linearly without limit, so a stale last-payment date can
    /// produce more than one full coupon
    #[default]
    Unclamped,

    /// Never accrue more than one coupon payment
    CapAtCoupon,
}

/// Accrued interest calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct AccruedInterestCalculator {
    policy: AccrualPolicy,
}

impl AccruedInterestCalculator {
    pub fn new(policy: AccrualPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AccrualPolicy {
        self.policy
    }

    /// Interest earned from `last_payment_date` up to `as_of`
    pub fn accrued_interest(
        &self,
        spec: &BondSpec,
        last_payment_date: NaiveDate,
        as_of: NaiveDate,
    ) -> BondResult<f64> {
        let days_elapsed = (as_of - last_payment_date).num_days();
        if days_elapsed < 0 {
            return Err(BondError::InvalidDate {
                last_payment: last_payment_date,
                as_of,
            });
        }

        let days_per_period = days_per_period(spec);
        let coupon = spec.coupon_payment();
        let accrued = days_elapsed as f64 / days_per_period * coupon;

        if days_elapsed as f64 > days_per_period {
            match self.policy {
                AccrualPolicy::Unclamped => {
                    log::warn!(
                        "{} days since last payment exceeds the {}-day coupon period; accrued {:.2} > coupon {:.2}",
                        days_elapsed,
                        days_per_period,
                        accrued,
                        coupon
                    );
                }
                AccrualPolicy::CapAtCoupon => return Ok(coupon),
            }
        }

        Ok(accrued)
    }
}

/// Days in one coupon period (360 / payments per year)
pub fn days_per_period(spec: &BondSpec) -> f64 {
    DAYS_PER_YEAR / spec.frequency().payments_per_year() as f64
}

/// Accrued interest with the unclamped policy
pub fn accrued_interest(spec: &BondSpec, last_payment_date: NaiveDate, as_of: NaiveDate) -> BondResult<f64> {
    AccruedInterestCalculator::default().accrued_interest(spec, last_payment_date, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::Frequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn semi_annual() -> BondSpec {
        BondSpec::new(1000.0, 0.06, 10.0, Frequency::SemiAnnual).unwrap()
    }

    #[test]
    fn test_zero_on_payment_date() {
        let d = date(2024, 3, 1);
        assert_eq!(accrued_interest(&semi_annual(), d, d).unwrap(), 0.0);
    }

    #[test]
    fn test_linear_in_days() {
        let spec = semi_annual();
        let last = date(2024, 1, 1);

        // 30 coupon per 180 days
        let a30 = accrued_interest(&spec, last, date(2024, 1, 31)).unwrap();
        let a60 = accrued_interest(&spec, last, date(2024, 3, 1)).unwrap();
        assert!((a30 - 5.0).abs() < 1e-9, "Expected 5.00, got {}", a30);
        assert!((a60 - 2.0 * a30).abs() < 1e-9);
    }

    #[test]
    fn test_full_period() {
        let spec = BondSpec::new(1000.0, 0.05, 5.0, Frequency::Annual).unwrap();
        let last = date(2023, 1, 1);
        let accrued = accrued_interest(&spec, last, last + chrono::Duration::days(360)).unwrap();
        assert!((accrued - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_days_per_period() {
        let spec = BondSpec::new(1200.0, 0.12, 1.0, Frequency::Monthly).unwrap();
        assert_eq!(days_per_period(&spec), 30.0);

        // 15 of 30 days on a 12.00 coupon
        let accrued = accrued_interest(&spec, date(2024, 6, 1), date(2024, 6, 16)).unwrap();
        assert!((accrued - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_stale_date_unclamped() {
        let spec = semi_annual();
        // 366 days over a 180-day period
        let accrued = accrued_interest(&spec, date(2023, 1, 1), date(2024, 1, 2)).unwrap();
        assert!(accrued > spec.coupon_payment());
        assert!((accrued - 366.0 / 180.0 * 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_stale_date_capped() {
        let spec = semi_annual();
        let calc = AccruedInterestCalculator::new(AccrualPolicy::CapAtCoupon);
        let accrued = calc.accrued_interest(&spec, date(2023, 1, 1), date(2024, 1, 2)).unwrap();
        assert!((accrued - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_as_of_before_last_payment() {
        let err = accrued_interest(&semi_annual(), date(2024, 5, 1), date(2024, 4, 30)).unwrap_err();
        assert!(matches!(err, BondError::InvalidDate { .. }));
    }
}
