//! Valuation engine: pricing, yield recovery, risk metrics and accrual

mod accrued;
mod cashflows;
mod engine;
mod risk;
mod valuation;
mod yield_solver;

pub use accrued::{accrued_interest, days_per_period, AccrualPolicy, AccruedInterestCalculator, DAYS_PER_YEAR};
pub use cashflows::{cashflow_schedule, Cashflow, CashflowSchedule};
pub use engine::{discount_schedule, price, DiscountContext, DiscountedCashflow};
pub use risk::{duration_and_convexity, PriceSensitivity, RiskMetrics};
pub use valuation::{AccrualDates, BondAnalysis, ValuationResult, Valuator};
pub use yield_solver::{
    implied_yield, BoundsPolicy, YieldSolution, YieldSolver, YieldSolverConfig, DEFAULT_ITERATIONS,
    DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND,
};
