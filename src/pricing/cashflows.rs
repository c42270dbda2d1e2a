//! Coupon and principal cash-flow schedule

use crate::bond::BondSpec;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// A single scheduled payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cashflow {
    /// Coupon period (1-indexed)
    pub period: u32,

    /// Time from valuation in years (period / payments per year)
    pub time: f64,

    /// Payment amount: coupon, plus face value in the final period
    pub amount: f64,
}

/// Ordered payments of a bond from the first coupon to maturity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowSchedule {
    cashflows: Vec<Cashflow>,
}

impl CashflowSchedule {
    /// Build the schedule for a bond. Rebuilt on every call, never cached.
    pub fn for_bond(spec: &BondSpec) -> Self {
        let periods = spec.periods();
        let period_length = spec.frequency().period_length();
        let coupon = spec.coupon_payment();

        let cashflows = (1..=periods)
            .map(|period| Cashflow {
                period,
                time: period as f64 * period_length,
                amount: if period == periods {
                    coupon + spec.face_value()
                } else {
                    coupon
                },
            })
            .collect();

        Self { cashflows }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cashflow> {
        self.cashflows.iter()
    }

    pub fn as_slice(&self) -> &[Cashflow] {
        &self.cashflows
    }

    pub fn len(&self) -> usize {
        self.cashflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cashflows.is_empty()
    }

    /// Undiscounted sum of all payments
    pub fn total(&self) -> f64 {
        self.cashflows.iter().map(|cf| cf.amount).sum()
    }

    /// Time of the final payment in years
    pub fn maturity(&self) -> f64 {
        self.cashflows.last().map(|cf| cf.time).unwrap_or(0.0)
    }

    /// Write the schedule as CSV (`Period,TimeYears,Amount`)
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), Box<dyn Error>> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["Period", "TimeYears", "Amount"])?;
        for cf in &self.cashflows {
            csv_writer.write_record([
                cf.period.to_string(),
                format!("{:.6}", cf.time),
                format!("{:.8}", cf.amount),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CashflowSchedule {
    type Item = &'a Cashflow;
    type IntoIter = std::slice::Iter<'a, Cashflow>;

    fn into_iter(self) -> Self::IntoIter {
        self.cashflows.iter()
    }
}

/// Cash-flow schedule for a bond
pub fn cashflow_schedule(spec: &BondSpec) -> CashflowSchedule {
    CashflowSchedule::for_bond(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::Frequency;

    #[test]
    fn test_annual_schedule() {
        let spec = BondSpec::new(1000.0, 0.05, 10.0, Frequency::Annual).unwrap();
        let schedule = cashflow_schedule(&spec);

        assert_eq!(schedule.len(), 10);
        for cf in schedule.iter().take(9) {
            assert!((cf.amount - 50.0).abs() < 1e-12);
        }
        let last = schedule.as_slice()[9];
        assert_eq!(last.period, 10);
        assert!((last.time - 10.0).abs() < 1e-12);
        assert!((last.amount - 1050.0).abs() < 1e-12);
        assert!((schedule.total() - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_quarterly_times() {
        let spec = BondSpec::new(100.0, 0.08, 2.0, Frequency::Quarterly).unwrap();
        let schedule = cashflow_schedule(&spec);

        let times: Vec<f64> = schedule.iter().map(|cf| cf.time).collect();
        assert_eq!(times, vec![0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0]);
        assert!((schedule.as_slice()[0].amount - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_period() {
        let spec = BondSpec::new(1000.0, 0.04, 1.9, Frequency::Annual).unwrap();
        let schedule = cashflow_schedule(&spec);

        assert_eq!(schedule.len(), 1);
        assert!((schedule.maturity() - 1.0).abs() < 1e-12);
        assert!((schedule.total() - 1040.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_csv() {
        let spec = BondSpec::new(1000.0, 0.06, 1.0, Frequency::SemiAnnual).unwrap();
        let mut out = Vec::new();
        cashflow_schedule(&spec).write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Period,TimeYears,Amount");
        assert_eq!(lines[1], "1,0.500000,30.00000000");
        assert_eq!(lines[2], "2,1.000000,1030.00000000");
    }
}
