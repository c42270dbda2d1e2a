//! Value a block of bonds from CSV
//!
//! Usage: value_block <positions.csv> [--as-of YYYY-MM-DD] [--config config.json] [--output out.csv]
//!
//! Writes one row per bond with price, yield, risk and accrual columns.

use anyhow::{Context, Result};
use bond_pricer::bond::load_positions;
use bond_pricer::pricing::Valuator;
use bond_pricer::scenario::ScenarioRunner;
use bond_pricer::ValuationConfig;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "value_block", about = "Value every bond in a positions CSV")]
struct Cli {
    /// Positions CSV (BondID,FaceValue,CouponRate,YearsToMaturity,Frequency,DiscountRate,LastPaymentDate)
    positions: PathBuf,

    /// Accrual reference date, defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// JSON valuation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "block_valuation_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    let config = match &cli.config {
        Some(path) => ValuationConfig::from_json_path(path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ValuationConfig::default(),
    };

    println!("Loading positions from {}...", cli.positions.display());
    let positions = load_positions(&cli.positions)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to load positions")?;
    println!("Loaded {} positions in {:?}", positions.len(), start.elapsed());

    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());
    let runner = ScenarioRunner::new(Valuator::new(config));
    let results = runner.run_positions(&positions, as_of)?;

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    writer.write_record([
        "BondID",
        "Frequency",
        "Payments",
        "DiscountRate",
        "CleanPrice",
        "AccruedInterest",
        "DirtyPrice",
        "YTM",
        "CurrentYield",
        "MacaulayDuration",
        "ModifiedDuration",
        "Convexity",
    ])?;

    let mut total_dirty = 0.0;
    for result in &results {
        let a = &result.analysis;
        total_dirty += a.dirty_price;
        writer.write_record([
            result.bond_id.clone(),
            a.spec.frequency().to_string(),
            a.payment_count.to_string(),
            format!("{:.6}", a.discount_rate),
            format!("{:.6}", a.clean_price),
            format!("{:.6}", a.accrued_interest.unwrap_or(0.0)),
            format!("{:.6}", a.dirty_price),
            format!("{:.8}", a.yield_to_maturity),
            format!("{:.8}", a.current_yield),
            format!("{:.6}", a.risk.macaulay_duration),
            format!("{:.6}", a.risk.modified_duration),
            format!("{:.6}", a.risk.convexity),
        ])?;
    }
    writer.flush()?;

    println!("Valued {} bonds in {:?}", results.len(), start.elapsed());
    println!("Total dirty value: {:.2}", total_dirty);
    println!("Results written to: {}", cli.output.display());

    Ok(())
}
