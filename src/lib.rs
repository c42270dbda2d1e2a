//! Bond Pricer - valuation engine for fixed-coupon bullet bonds
//!
//! This library provides:
//! - Clean and dirty pricing from a discounted coupon/principal schedule
//! - Yield to maturity by bisection with explicit out-of-bracket handling
//! - Macaulay duration, modified duration and convexity
//! - Accrued interest on a 360-day year with an injected as-of date
//! - Price-yield sweeps, rate-shift scenarios and CSV position batches
//!
//! Periodic rates are always `annual_rate / payments_per_year`.

pub mod bond;
pub mod config;
pub mod error;
pub mod pricing;
pub mod scenario;

// Re-export commonly used types
pub use bond::{BondSpec, Frequency};
pub use config::ValuationConfig;
pub use error::{BondError, BondResult};
pub use pricing::{
    accrued_interest, cashflow_schedule, duration_and_convexity, implied_yield, price, RiskMetrics,
    ValuationResult, Valuator,
};
pub use scenario::ScenarioRunner;
