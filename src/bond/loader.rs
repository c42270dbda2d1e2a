//! Load bond positions from CSV
//!
//! Expected columns: `BondID,FaceValue,CouponRate,YearsToMaturity,Frequency,DiscountRate,LastPaymentDate`.
//! `LastPaymentDate` may be left empty.

use super::{BondSpec, Frequency};
use chrono::NaiveDate;
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Raw CSV row
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "BondID")]
    bond_id: String,
    #[serde(rename = "FaceValue")]
    face_value: f64,
    #[serde(rename = "CouponRate")]
    coupon_rate: f64,
    #[serde(rename = "YearsToMaturity")]
    years_to_maturity: f64,
    #[serde(rename = "Frequency")]
    frequency: String,
    #[serde(rename = "DiscountRate")]
    discount_rate: f64,
    #[serde(rename = "LastPaymentDate", default)]
    last_payment_date: Option<NaiveDate>,
}

impl CsvRow {
    fn into_position(self) -> Result<BondPosition, Box<dyn Error>> {
        let frequency = Frequency::from_label(self.frequency.trim())
            .map_err(|e| format!("Bond {}: {}", self.bond_id, e))?;

        let spec = BondSpec::new(self.face_value, self.coupon_rate, self.years_to_maturity, frequency)
            .map_err(|e| format!("Bond {}: {}", self.bond_id, e))?;

        Ok(BondPosition {
            bond_id: self.bond_id,
            spec,
            discount_rate: self.discount_rate,
            last_payment_date: self.last_payment_date,
        })
    }
}

/// A bond together with the market inputs needed to value it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondPosition {
    pub bond_id: String,
    pub spec: BondSpec,
    pub discount_rate: f64,
    pub last_payment_date: Option<NaiveDate>,
}

/// Load all positions from a CSV file
pub fn load_positions<P: AsRef<Path>>(path: P) -> Result<Vec<BondPosition>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    read_positions(&mut reader)
}

/// Load positions from any reader (e.g., string buffer, stdin)
pub fn load_positions_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<BondPosition>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    read_positions(&mut csv_reader)
}

fn read_positions<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Vec<BondPosition>, Box<dyn Error>> {
    let mut positions = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        positions.push(row.into_position()?);
    }

    log::debug!("Loaded {} bond positions", positions.len());
    Ok(positions)
}
