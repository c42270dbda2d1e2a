//! Bond terms and payment frequency

use crate::error::{BondError, BondResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coupon payment frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// One payment per year
    Annual,
    /// Two payments per year
    #[serde(rename = "Semi-annual")]
    SemiAnnual,
    /// Four payments per year
    Quarterly,
    /// Twelve payments per year
    Monthly,
}

impl Frequency {
    /// All supported frequencies, in increasing payment count
    pub const ALL: [Frequency; 4] = [
        Frequency::Annual,
        Frequency::SemiAnnual,
        Frequency::Quarterly,
        Frequency::Monthly,
    ];

    /// Resolve a frequency label ("Annual", "Semi-annual", "Quarterly", "Monthly")
    pub fn from_label(label: &str) -> BondResult<Self> {
        match label {
            "Annual" => Ok(Frequency::Annual),
            "Semi-annual" => Ok(Frequency::SemiAnnual),
            "Quarterly" => Ok(Frequency::Quarterly),
            "Monthly" => Ok(Frequency::Monthly),
            other => Err(BondError::InvalidFrequency(other.to_string())),
        }
    }

    /// Canonical label for this frequency
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        }
    }

    /// Number of coupon payments per year
    pub fn payments_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Convert an annual rate to a per-period rate by simple division.
    ///
    /// Pricing, yield recovery and risk metrics all go through this; using a
    /// compounding-equivalent conversion anywhere would break price/yield
    /// round trips.
    pub fn periodic_rate(&self, annual_rate: f64) -> f64 {
        annual_rate / self.payments_per_year() as f64
    }

    /// Length of one coupon period in years
    pub fn period_length(&self) -> f64 {
        1.0 / self.payments_per_year() as f64
    }
}

impl FromStr for Frequency {
    type Err = BondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::from_label(s)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payments per year for a frequency label
pub fn payments_per_year(label: &str) -> BondResult<u32> {
    Frequency::from_label(label).map(|f| f.payments_per_year())
}

/// Upper bound on coupon periods (1200 years of monthly coupons)
pub const MAX_PERIODS: u32 = 14_400;

/// Unvalidated bond terms, as read from input files
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BondTerms {
    pub face_value: f64,
    pub coupon_rate: f64,
    pub years_to_maturity: f64,
    pub frequency: Frequency,
}

/// Fixed-coupon bullet bond
///
/// Construction validates the terms, so every `BondSpec` in hand has at
/// least one coupon period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BondTerms")]
pub struct BondSpec {
    /// Principal repaid at maturity
    face_value: f64,

    /// Annual coupon rate as a fraction of face value
    coupon_rate: f64,

    /// Time to maturity in years
    years_to_maturity: f64,

    /// Coupon payment frequency
    frequency: Frequency,
}

impl BondSpec {
    pub fn new(
        face_value: f64,
        coupon_rate: f64,
        years_to_maturity: f64,
        frequency: Frequency,
    ) -> BondResult<Self> {
        if !face_value.is_finite() || face_value <= 0.0 {
            return Err(BondError::invalid_spec("face_value", format!("must be positive, got {}", face_value)));
        }
        if !coupon_rate.is_finite() || coupon_rate < 0.0 {
            return Err(BondError::invalid_spec("coupon_rate", format!("must be non-negative, got {}", coupon_rate)));
        }
        if !years_to_maturity.is_finite() || years_to_maturity <= 0.0 {
            return Err(BondError::invalid_spec(
                "years_to_maturity",
                format!("must be positive, got {}", years_to_maturity),
            ));
        }

        let spec = Self {
            face_value,
            coupon_rate,
            years_to_maturity,
            frequency,
        };

        let periods = (years_to_maturity * frequency.payments_per_year() as f64).floor();
        if !(1.0..=MAX_PERIODS as f64).contains(&periods) {
            return Err(BondError::InvalidPeriods {
                years_to_maturity,
                payments_per_year: frequency.payments_per_year(),
            });
        }

        Ok(spec)
    }

    pub fn face_value(&self) -> f64 {
        self.face_value
    }

    pub fn coupon_rate(&self) -> f64 {
        self.coupon_rate
    }

    pub fn years_to_maturity(&self) -> f64 {
        self.years_to_maturity
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Number of coupon periods: floor(years × payments per year), at most `MAX_PERIODS`
    pub fn periods(&self) -> u32 {
        (self.years_to_maturity * self.frequency.payments_per_year() as f64).floor() as u32
    }

    /// Coupon rate per period
    pub fn periodic_coupon_rate(&self) -> f64 {
        self.frequency.periodic_rate(self.coupon_rate)
    }

    /// Coupon amount paid each period
    pub fn coupon_payment(&self) -> f64 {
        self.face_value * self.periodic_coupon_rate()
    }

    /// Same bond with a different frequency
    pub fn with_frequency(&self, frequency: Frequency) -> BondResult<Self> {
        Self::new(self.face_value, self.coupon_rate, self.years_to_maturity, frequency)
    }
}

impl TryFrom<BondTerms> for BondSpec {
    type Error = BondError;

    fn try_from(terms: BondTerms) -> Result<Self, Self::Error> {
        BondSpec::new(terms.face_value, terms.coupon_rate, terms.years_to_maturity, terms.frequency)
    }
}

impl From<BondSpec> for BondTerms {
    fn from(spec: BondSpec) -> Self {
        Self {
            face_value: spec.face_value,
            coupon_rate: spec.coupon_rate,
            years_to_maturity: spec.years_to_maturity,
            frequency: spec.frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payments_per_year() {
        assert_eq!(payments_per_year("Annual").unwrap(), 1);
        assert_eq!(payments_per_year("Semi-annual").unwrap(), 2);
        assert_eq!(payments_per_year("Quarterly").unwrap(), 4);
        assert_eq!(payments_per_year("Monthly").unwrap(), 12);
    }

    #[test]
    fn test_unknown_label() {
        let err = payments_per_year("Weekly").unwrap_err();
        assert_eq!(err, BondError::InvalidFrequency("Weekly".into()));

        // Labels are matched exactly
        assert!("semi-annual".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_label_round_trip() {
        for freq in Frequency::ALL {
            assert_eq!(freq.label().parse::<Frequency>().unwrap(), freq);
        }
    }

    #[test]
    fn test_periodic_rate_is_simple_division() {
        let rate = Frequency::Monthly.periodic_rate(0.06);
        assert!((rate - 0.005).abs() < 1e-15);

        // Not the compounding-equivalent rate
        let compounded = 1.06_f64.powf(1.0 / 12.0) - 1.0;
        assert!((rate - compounded).abs() > 1e-5);
    }

    #[test]
    fn test_monthly_one_year() {
        let spec = BondSpec::new(1000.0, 0.05, 1.0, Frequency::Monthly).unwrap();
        assert_eq!(spec.periods(), 12);
        assert!((spec.periodic_coupon_rate() - 0.05 / 12.0).abs() < 1e-15);
    }

    #[test]
    fn test_periods_truncate() {
        let spec = BondSpec::new(1000.0, 0.05, 10.7, Frequency::Annual).unwrap();
        assert_eq!(spec.periods(), 10);

        let spec = BondSpec::new(1000.0, 0.05, 2.6, Frequency::SemiAnnual).unwrap();
        assert_eq!(spec.periods(), 5);
    }

    #[test]
    fn test_zero_periods_rejected() {
        let err = BondSpec::new(1000.0, 0.05, 0.4, Frequency::Annual).unwrap_err();
        assert!(matches!(err, BondError::InvalidPeriods { payments_per_year: 1, .. }));

        // The same maturity has periods under a finer frequency
        assert!(BondSpec::new(1000.0, 0.05, 0.4, Frequency::Quarterly).is_ok());
    }

    #[test]
    fn test_period_count_capped() {
        let err = BondSpec::new(1000.0, 0.05, 1e9, Frequency::Monthly).unwrap_err();
        assert!(matches!(err, BondError::InvalidPeriods { payments_per_year: 12, .. }));

        let longest = BondSpec::new(1000.0, 0.05, 1200.0, Frequency::Monthly).unwrap();
        assert_eq!(longest.periods(), MAX_PERIODS);
        assert!(BondSpec::new(1000.0, 0.05, 1201.0, Frequency::Monthly).is_err());

        // Annual coupons allow the same period count over a longer life
        assert!(BondSpec::new(1000.0, 0.05, 14_400.0, Frequency::Annual).is_ok());
        assert!(BondSpec::new(1000.0, 0.05, 14_401.0, Frequency::Annual).is_err());
    }

    #[test]
    fn test_invalid_terms() {
        assert!(matches!(
            BondSpec::new(0.0, 0.05, 10.0, Frequency::Annual),
            Err(BondError::InvalidSpec { .. })
        ));
        assert!(matches!(
            BondSpec::new(1000.0, -0.01, 10.0, Frequency::Annual),
            Err(BondError::InvalidSpec { .. })
        ));
        assert!(matches!(
            BondSpec::new(1000.0, 0.05, f64::NAN, Frequency::Annual),
            Err(BondError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"face_value":1000.0,"coupon_rate":0.05,"years_to_maturity":10.0,"frequency":"Semi-annual"}"#;
        let spec: BondSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.frequency(), Frequency::SemiAnnual);
        assert_eq!(spec.periods(), 20);

        let json = r#"{"face_value":-5.0,"coupon_rate":0.05,"years_to_maturity":10.0,"frequency":"Annual"}"#;
        assert!(serde_json::from_str::<BondSpec>(json).is_err());
    }
}
