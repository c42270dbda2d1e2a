//! Valuation configuration
//!
//! Loaded from JSON; every field is optional and falls back to the defaults
//! below.
//!
//! ```json
//! {
//!   "solver": { "upper_bound": 2.0, "bounds_policy": { "policy": "widen", "max_upper": 16.0 } },
//!   "accrual": "cap_at_coupon"
//! }
//! ```

use crate::pricing::{AccrualPolicy, YieldSolverConfig};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Yield-to-maturity search settings
    pub solver: YieldSolverConfig,

    /// Accrued interest treatment for stale last-payment dates
    pub accrual: AccrualPolicy,
}

impl ValuationConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded valuation config from {}: {:?}", path.as_ref().display(), config);
        Ok(config)
    }
}
