//! Bond Pricer CLI
//!
//! Command-line front end for single-bond valuations

use anyhow::{Context, Result};
use bond_pricer::pricing::{AccrualDates, Valuator};
use bond_pricer::scenario::{CurveConfig, ScenarioRunner};
use bond_pricer::{BondSpec, Frequency, ValuationConfig};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bond_pricer", version, about = "Fixed-coupon bond valuation")]
struct Cli {
    /// JSON valuation config (solver bracket, bounds policy, accrual policy)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct BondArgs {
    /// Principal repaid at maturity
    #[arg(long, default_value_t = 1000.0)]
    face_value: f64,

    /// Annual coupon rate as a fraction (0.05 = 5%)
    #[arg(long, default_value_t = 0.05)]
    coupon_rate: f64,

    /// Years to maturity
    #[arg(long, default_value_t = 10.0)]
    years: f64,

    /// Annual, Semi-annual, Quarterly or Monthly
    #[arg(long, default_value = "Semi-annual")]
    frequency: Frequency,
}

impl BondArgs {
    fn spec(&self) -> Result<BondSpec> {
        BondSpec::new(self.face_value, self.coupon_rate, self.years, self.frequency).context("Invalid bond terms")
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean price at a discount rate
    Price {
        #[command(flatten)]
        bond: BondArgs,
        /// Annual discount rate as a fraction
        #[arg(long)]
        rate: f64,
    },
    /// Yield to maturity implied by a clean price
    Yield {
        #[command(flatten)]
        bond: BondArgs,
        /// Clean price
        #[arg(long)]
        price: f64,
    },
    /// Duration, convexity and a price sensitivity estimate
    Risk {
        #[command(flatten)]
        bond: BondArgs,
        #[arg(long)]
        rate: f64,
        /// Parallel yield change in basis points
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        shift_bps: f64,
    },
    /// Interest accrued since the last coupon
    Accrued {
        #[command(flatten)]
        bond: BondArgs,
        /// Last coupon date (YYYY-MM-DD)
        #[arg(long)]
        last_payment: NaiveDate,
        /// Reference date, defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Coupon and principal schedule
    Cashflows {
        #[command(flatten)]
        bond: BondArgs,
        /// Write CSV to stdout instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Price, yield, risk, accrual and summary metrics
    Analyze {
        #[command(flatten)]
        bond: BondArgs,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        last_payment: Option<NaiveDate>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Price across a range of yields
    Curve {
        #[command(flatten)]
        bond: BondArgs,
        #[arg(long, default_value_t = 0.01)]
        start: f64,
        #[arg(long, default_value_t = 0.15)]
        end: f64,
        #[arg(long, default_value_t = 100)]
        points: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ValuationConfig::from_json_path(path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ValuationConfig::default(),
    };
    let valuator = Valuator::new(config);

    match &cli.command {
        Command::Price { bond, rate } => {
            let spec = bond.spec()?;
            let price = valuator.price(&spec, *rate)?;
            emit(cli.json, &serde_json::json!({ "clean_price": price }), || {
                println!("Clean price: {:.4}", price);
            })?;
        }
        Command::Yield { bond, price } => {
            let spec = bond.spec()?;
            let ytm = valuator.implied_yield(&spec, *price)?;
            emit(cli.json, &serde_json::json!({ "yield_to_maturity": ytm }), || {
                println!("Yield to maturity: {:.4}%", ytm * 100.0);
            })?;
        }
        Command::Risk { bond, rate, shift_bps } => {
            let spec = bond.spec()?;
            let price = valuator.price(&spec, *rate)?;
            let risk = valuator.duration_and_convexity(&spec, *rate)?;
            let sensitivity = risk.price_sensitivity(price, shift_bps / 10_000.0);
            emit(
                cli.json,
                &serde_json::json!({ "risk": risk, "sensitivity": sensitivity }),
                || {
                    println!("Macaulay duration: {:.4} years", risk.macaulay_duration);
                    println!("Modified duration: {:.4}", risk.modified_duration);
                    println!("Convexity:         {:.4}", risk.convexity);
                    println!();
                    println!("Yield change {:+.0}bp:", shift_bps);
                    println!("  Duration effect:   {:+.4}%", sensitivity.duration_effect * 100.0);
                    println!("  Convexity effect:  {:+.4}%", sensitivity.convexity_effect * 100.0);
                    println!("  Percentage change: {:+.4}%", sensitivity.total_effect * 100.0);
                    println!("  Price change:      {:+.4}", sensitivity.price_change);
                },
            )?;
        }
        Command::Accrued {
            bond,
            last_payment,
            as_of,
        } => {
            let spec = bond.spec()?;
            let dates = AccrualDates {
                last_payment: *last_payment,
                as_of: as_of.unwrap_or_else(today),
            };
            let accrued = valuator.accrued_interest(&spec, dates)?;
            emit(cli.json, &serde_json::json!({ "accrued_interest": accrued }), || {
                println!("Accrued interest: {:.4}", accrued);
            })?;
        }
        Command::Cashflows { bond, csv } => {
            let spec = bond.spec()?;
            let schedule = valuator.cashflow_schedule(&spec);
            if *csv {
                schedule
                    .write_csv(std::io::stdout())
                    .map_err(|e| anyhow::anyhow!("{}", e))
                    .context("Failed to write cash flows")?;
            } else {
                emit(cli.json, &schedule, || {
                    println!("{:>6} {:>10} {:>14}", "Period", "Years", "Amount");
                    println!("{}", "-".repeat(32));
                    for cf in &schedule {
                        println!("{:>6} {:>10.4} {:>14.2}", cf.period, cf.time, cf.amount);
                    }
                    println!("{}", "-".repeat(32));
                    println!("{:>17} {:>14.2}", "Total", schedule.total());
                })?;
            }
        }
        Command::Analyze {
            bond,
            rate,
            last_payment,
            as_of,
        } => {
            let spec = bond.spec()?;
            let dates = last_payment.map(|last_payment| AccrualDates {
                last_payment,
                as_of: as_of.unwrap_or_else(today),
            });
            let a = valuator.analyze(&spec, *rate, dates)?;
            emit(cli.json, &a, || {
                println!("Bond Summary:");
                println!("  Face Value:            {:.2}", spec.face_value());
                println!("  Annual Coupon Rate:    {:.2}%", spec.coupon_rate() * 100.0);
                println!(
                    "  Payment Frequency:     {} ({} payments per year)",
                    spec.frequency(),
                    spec.frequency().payments_per_year()
                );
                println!("  Payment Amount:        {:.2} per period", a.periodic_payment);
                println!("  Time to Maturity:      {} years", spec.years_to_maturity());
                println!("  Total Payments:        {}", a.payment_count);
                println!();
                println!("  Clean Price:           {:.2}", a.clean_price);
                if let Some(accrued) = a.accrued_interest {
                    println!("  Accrued Interest:      {:.2}", accrued);
                }
                println!("  Dirty Price:           {:.2}", a.dirty_price);
                println!("  Yield to Maturity:     {:.4}%", a.yield_to_maturity * 100.0);
                println!("  Current Yield:         {:.4}%", a.current_yield * 100.0);
                println!("  Macaulay Duration:     {:.4} years", a.risk.macaulay_duration);
                println!("  Modified Duration:     {:.4}", a.risk.modified_duration);
                println!("  Convexity:             {:.4}", a.risk.convexity);
            })?;
        }
        Command::Curve {
            bond,
            start,
            end,
            points,
        } => {
            let spec = bond.spec()?;
            let curve = CurveConfig {
                start: *start,
                end: *end,
                points: *points,
            };
            let runner = ScenarioRunner::new(valuator.clone());
            let points = runner.price_yield_curve(&spec, &curve)?;
            emit(cli.json, &points, || {
                println!("{:>10} {:>14}", "Yield %", "Price");
                for p in &points {
                    println!("{:>10.4} {:>14.4}", p.yield_rate * 100.0, p.price);
                }
            })?;
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Print `value` as JSON, or run the table printer
fn emit<T: Serialize, F: FnOnce()>(json: bool, value: &T, table: F) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        table();
    }
    Ok(())
}
