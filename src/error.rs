//! Error types for bond valuation

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias used throughout the valuation engine
pub type BondResult<T> = Result<T, BondError>;

/// Errors raised by a single valuation call
///
/// Every error is local to the call that produced it. The engine never
/// retries or adjusts inputs to recover.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Frequency label outside Annual / Semi-annual / Quarterly / Monthly
    #[error("Unknown payment frequency: {0:?}")]
    InvalidFrequency(String),

    /// floor(years_to_maturity × payments_per_year) is below one or above `MAX_PERIODS`
    #[error("Unsupported number of coupon periods: {years_to_maturity} years at {payments_per_year} payments per year")]
    InvalidPeriods {
        years_to_maturity: f64,
        payments_per_year: u32,
    },

    /// Rate that would divide by zero (or worse) once converted to a periodic rate
    #[error("Invalid rate {rate}: {reason}")]
    InvalidRate { rate: f64, reason: String },

    /// Bond terms or target price outside the supported domain
    #[error("Invalid bond specification: {field} - {reason}")]
    InvalidSpec { field: String, reason: String },

    /// Target price implies a yield outside the solver bracket
    #[error("Implied yield for price {price} lies outside [{lower}, {upper}]")]
    YieldOutOfBounds { price: f64, lower: f64, upper: f64 },

    /// Accrual reference date precedes the last coupon date
    #[error("As-of date {as_of} is before last payment date {last_payment}")]
    InvalidDate {
        last_payment: NaiveDate,
        as_of: NaiveDate,
    },
}

impl BondError {
    pub(crate) fn invalid_spec(field: &str, reason: impl Into<String>) -> Self {
        BondError::InvalidSpec {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
