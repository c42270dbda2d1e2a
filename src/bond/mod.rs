//! Bond terms and position loading

mod data;
pub mod loader;

pub use data::{payments_per_year, BondSpec, BondTerms, Frequency, MAX_PERIODS};
pub use loader::{load_positions, load_positions_from_reader, BondPosition};
