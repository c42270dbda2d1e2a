//! Valuation entry point combining price, yield, risk and accrual

use super::accrued::AccruedInterestCalculator;
use super::cashflows::CashflowSchedule;
use super::engine::{price_with_context, DiscountContext};
use super::risk::{metrics_with_context, RiskMetrics};
use super::yield_solver::YieldSolver;
use crate::bond::BondSpec;
use crate::config::ValuationConfig;
use crate::error::BondResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dates needed for an accrued interest calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualDates {
    pub last_payment: NaiveDate,
    pub as_of: NaiveDate,
}

/// Clean price, optionally with accrued interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Sum of discounted cash flows, excluding accrued interest
    pub clean_price: f64,

    /// Interest accrued since the last coupon, when dates were supplied
    pub accrued_interest: Option<f64>,
}

impl ValuationResult {
    /// Clean price plus accrued interest (clean price when no accrual was computed)
    pub fn dirty_price(&self) -> f64 {
        self.clean_price + self.accrued_interest.unwrap_or(0.0)
    }
}

/// Full set of metrics for one bond at one discount rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondAnalysis {
    pub spec: BondSpec,
    pub discount_rate: f64,
    pub clean_price: f64,
    pub accrued_interest: Option<f64>,
    pub dirty_price: f64,

    /// Yield recovered from the clean price
    pub yield_to_maturity: f64,

    /// Annual coupon / clean price
    pub current_yield: f64,

    /// Coupon paid each period
    pub periodic_payment: f64,

    /// Number of coupon payments
    pub payment_count: u32,

    pub risk: RiskMetrics,
}

/// Bond valuator holding the solver and accrual settings
#[derive(Debug, Clone, Default)]
pub struct Valuator {
    config: ValuationConfig,
    solver: YieldSolver,
    accrual: AccruedInterestCalculator,
}

impl Valuator {
    pub fn new(config: ValuationConfig) -> Self {
        Self {
            config,
            solver: YieldSolver::new(config.solver),
            accrual: AccruedInterestCalculator::new(config.accrual),
        }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    pub fn price(&self, spec: &BondSpec, discount_rate: f64) -> BondResult<f64> {
        super::engine::price(spec, discount_rate)
    }

    pub fn implied_yield(&self, spec: &BondSpec, price: f64) -> BondResult<f64> {
        self.solver.solve(spec, price)
    }

    pub fn duration_and_convexity(&self, spec: &BondSpec, discount_rate: f64) -> BondResult<RiskMetrics> {
        super::risk::duration_and_convexity(spec, discount_rate)
    }

    pub fn accrued_interest(&self, spec: &BondSpec, dates: AccrualDates) -> BondResult<f64> {
        self.accrual.accrued_interest(spec, dates.last_payment, dates.as_of)
    }

    pub fn cashflow_schedule(&self, spec: &BondSpec) -> CashflowSchedule {
        CashflowSchedule::for_bond(spec)
    }

    /// Clean price with accrued interest when dates are given
    pub fn value(
        &self,
        spec: &BondSpec,
        discount_rate: f64,
        dates: Option<AccrualDates>,
    ) -> BondResult<ValuationResult> {
        let clean_price = self.price(spec, discount_rate)?;
        let accrued_interest = dates
            .map(|d| self.accrued_interest(spec, d))
            .transpose()?;

        Ok(ValuationResult {
            clean_price,
            accrued_interest,
        })
    }

    /// Price, yield, risk and accrual, all at the same discount rate
    pub fn analyze(
        &self,
        spec: &BondSpec,
        discount_rate: f64,
        dates: Option<AccrualDates>,
    ) -> BondResult<BondAnalysis> {
        let ctx = DiscountContext::new(discount_rate, spec.frequency())?;
        let clean_price = price_with_context(spec, &ctx);
        let risk = metrics_with_context(spec, &ctx);
        let yield_to_maturity = self.solver.solve(spec, clean_price)?;
        let accrued_interest = dates
            .map(|d| self.accrued_interest(spec, d))
            .transpose()?;

        let valuation = ValuationResult {
            clean_price,
            accrued_interest,
        };

        log::debug!(
            "Analyzed {} bond ({} periods) at {:.4}: clean {:.4}, ytm {:.6}",
            spec.frequency(),
            spec.periods(),
            discount_rate,
            clean_price,
            yield_to_maturity
        );

        Ok(BondAnalysis {
            spec: *spec,
            discount_rate,
            clean_price,
            accrued_interest,
            dirty_price: valuation.dirty_price(),
            yield_to_maturity,
            current_yield: spec.coupon_rate() * spec.face_value() / clean_price,
            periodic_payment: spec.coupon_payment(),
            payment_count: spec.periods(),
            risk,
        })
    }
}
