//! Yield to maturity by bisection
//!
//! The solver inverts the pricing engine: it searches for the annual yield at
//! which the discounted schedule equals a target clean price. Bond price is
//! strictly decreasing in yield for a non-negative coupon and positive face
//! value, so `npv(y) = price_at(y) - target` changes sign at most once.

use super::cashflows::CashflowSchedule;
use super::engine::DiscountContext;
use crate::bond::{BondSpec, Frequency};
use crate::error::{BondError, BondResult};
use serde::{Deserialize, Serialize};

/// Default lower bound of the yield bracket
pub const DEFAULT_LOWER_BOUND: f64 = 0.0;

/// Default upper bound of the yield bracket (100% annual yield)
pub const DEFAULT_UPPER_BOUND: f64 = 1.0;

/// Default number of bisection steps
pub const DEFAULT_ITERATIONS: u32 = 50;

/// What to do when the target price is not bracketed by the search interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Fail with `YieldOutOfBounds`
    #[default]
    Error,

    /// Bisect anyway and return the bracket end nearest the true yield
    Clamp,

    /// Double the bracket width upward until the price is bracketed or
    /// `max_upper` is reached
    Widen { max_upper: f64 },
}

/// Yield solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldSolverConfig {
    /// Lower end of the annual yield bracket
    pub lower_bound: f64,

    /// Upper end of the annual yield bracket
    pub upper_bound: f64,

    /// Number of halving steps
    pub iterations: u32,

    /// Optional early stop once the bracket is narrower than this
    pub tolerance: Option<f64>,

    /// Behaviour when the price is not bracketed
    pub bounds_policy: BoundsPolicy,
}

impl Default for YieldSolverConfig {
    fn default() -> Self {
        Self {
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            iterations: DEFAULT_ITERATIONS,
            tolerance: None,
            bounds_policy: BoundsPolicy::Error,
        }
    }
}

impl YieldSolverConfig {
    /// Reference behaviour: [0, 1], 50 steps, silently clamped
    pub fn clamped() -> Self {
        Self {
            bounds_policy: BoundsPolicy::Clamp,
            ..Default::default()
        }
    }

    /// Default bracket that widens upward to `max_upper` for distressed prices
    pub fn widening(max_upper: f64) -> Self {
        Self {
            bounds_policy: BoundsPolicy::Widen { max_upper },
            ..Default::default()
        }
    }

    fn validate(&self) -> BondResult<()> {
        if !self.lower_bound.is_finite() || !self.upper_bound.is_finite() || self.lower_bound >= self.upper_bound {
            return Err(BondError::invalid_spec(
                "yield_solver",
                format!("invalid bracket [{}, {}]", self.lower_bound, self.upper_bound),
            ));
        }
        if self.iterations == 0 {
            return Err(BondError::invalid_spec("yield_solver", "iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of a yield search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldSolution {
    /// Annual yield to maturity (fraction)
    pub ytm: f64,

    /// Bisection steps actually taken
    pub iterations: u32,

    /// Price at `ytm` minus target price
    pub residual: f64,

    /// Final bracket width
    pub bracket_width: f64,

    /// True when the price was not bracketed and the result sits on a bound
    pub clamped: bool,
}

/// Bisection yield solver
#[derive(Debug, Clone, Default)]
pub struct YieldSolver {
    config: YieldSolverConfig,
}

impl YieldSolver {
    pub fn new(config: YieldSolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &YieldSolverConfig {
        &self.config
    }

    /// Annual yield that reprices the bond at `target_price`
    pub fn solve(&self, spec: &BondSpec, target_price: f64) -> BondResult<f64> {
        self.solve_detailed(spec, target_price).map(|s| s.ytm)
    }

    pub fn solve_detailed(&self, spec: &BondSpec, target_price: f64) -> BondResult<YieldSolution> {
        self.config.validate()?;
        if !target_price.is_finite() || target_price <= 0.0 {
            return Err(BondError::invalid_spec("price", format!("must be positive, got {}", target_price)));
        }

        let objective = Objective::new(spec, target_price);
        let lower = self.config.lower_bound;
        let mut upper = self.config.upper_bound;

        let npv_lower = objective.npv(lower)?;
        let mut npv_upper = objective.npv(upper)?;

        if let BoundsPolicy::Widen { max_upper } = self.config.bounds_policy {
            while npv_upper > 0.0 && upper < max_upper {
                upper = (lower + 2.0 * (upper - lower)).min(max_upper);
                npv_upper = objective.npv(upper)?;
                log::debug!("Widened yield bracket to [{}, {}]", lower, upper);
            }
        }

        let bracketed = npv_lower >= 0.0 && npv_upper <= 0.0;
        if !bracketed {
            match self.config.bounds_policy {
                BoundsPolicy::Clamp => {
                    log::warn!(
                        "Price {} not bracketed by yields [{}, {}]; result will be clamped",
                        target_price,
                        lower,
                        upper
                    );
                }
                BoundsPolicy::Error | BoundsPolicy::Widen { .. } => {
                    return Err(BondError::YieldOutOfBounds {
                        price: target_price,
                        lower,
                        upper,
                    });
                }
            }
        }

        let mut low = lower;
        let mut high = upper;
        let mut steps = 0;

        for _ in 0..self.config.iterations {
            let mid = (low + high) / 2.0;
            if objective.npv(mid)? > 0.0 {
                low = mid;
            } else {
                high = mid;
            }
            steps += 1;

            if let Some(tolerance) = self.config.tolerance {
                if high - low < tolerance {
                    break;
                }
            }
        }

        let ytm = (low + high) / 2.0;
        let residual = objective.npv(ytm)?;
        log::debug!(
            "Solved yield {:.10} for price {} in {} steps (residual {:.3e})",
            ytm,
            target_price,
            steps,
            residual
        );

        Ok(YieldSolution {
            ytm,
            iterations: steps,
            residual,
            bracket_width: high - low,
            clamped: !bracketed,
        })
    }
}

/// Price difference as a function of annual yield, with the schedule built once per solve
struct Objective {
    schedule: CashflowSchedule,
    frequency: Frequency,
    target_price: f64,
}

impl Objective {
    fn new(spec: &BondSpec, target_price: f64) -> Self {
        Self {
            schedule: CashflowSchedule::for_bond(spec),
            frequency: spec.frequency(),
            target_price,
        }
    }

    fn npv(&self, annual_yield: f64) -> BondResult<f64> {
        let ctx = DiscountContext::new(annual_yield, self.frequency)?;
        let pv: f64 = self.schedule.iter().map(|cf| ctx.present_value(cf)).sum();

        Ok(pv - self.target_price)
    }
}

/// Yield to maturity with the default solver (bracket [0, 1], 50 steps,
/// `YieldOutOfBounds` when the price is not bracketed)
pub fn implied_yield(spec: &BondSpec, price: f64) -> BondResult<f64> {
    YieldSolver::default().solve(spec, price)
}
