//! Duration and convexity
//!
//! All three metrics come from one discounted schedule at one rate. Mixing a
//! price at one rate with risk metrics at another is only meaningful when
//! modelling a rate shift explicitly (see [`RiskMetrics::price_sensitivity`]).

use super::cashflows::CashflowSchedule;
use super::engine::{discount_schedule, DiscountContext};
use crate::bond::BondSpec;
use crate::error::BondResult;
use serde::{Deserialize, Serialize};

/// First- and second-order rate sensitivity of a bond
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Present-value-weighted average time to cash flow, in years
    pub macaulay_duration: f64,

    /// Macaulay duration / (1 + periodic rate)
    pub modified_duration: f64,

    /// Price curvature with respect to yield
    pub convexity: f64,
}

/// Price change estimated from duration and convexity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSensitivity {
    /// Yield change as a fraction (0.0001 = 1bp)
    pub yield_change: f64,

    /// -modified_duration × Δy
    pub duration_effect: f64,

    /// ½ × convexity × Δy²
    pub convexity_effect: f64,

    /// Relative price change (duration + convexity effects)
    pub total_effect: f64,

    /// Estimated price after the shift
    pub new_price: f64,

    /// new_price - price
    pub price_change: f64,
}

impl RiskMetrics {
    /// Second-order estimate of the price move for a parallel yield change
    pub fn price_sensitivity(&self, price: f64, yield_change: f64) -> PriceSensitivity {
        let duration_effect = -self.modified_duration * yield_change;
        let convexity_effect = 0.5 * self.convexity * yield_change * yield_change;
        let total_effect = duration_effect + convexity_effect;
        let new_price = price * (1.0 + total_effect);

        PriceSensitivity {
            yield_change,
            duration_effect,
            convexity_effect,
            total_effect,
            new_price,
            price_change: new_price - price,
        }
    }
}

/// Macaulay duration, modified duration and convexity at `discount_rate`
pub fn duration_and_convexity(spec: &BondSpec, discount_rate: f64) -> BondResult<RiskMetrics> {
    let ctx = DiscountContext::new(discount_rate, spec.frequency())?;
    Ok(metrics_with_context(spec, &ctx))
}

pub(crate) fn metrics_with_context(spec: &BondSpec, ctx: &DiscountContext) -> RiskMetrics {
    let period_length = spec.frequency().period_length();
    let growth = 1.0 + ctx.periodic_rate();
    let periods = spec.periods();

    let mut pv_total = 0.0;
    let mut weighted_time = 0.0;
    let mut weighted_squares = 0.0;

    for discounted in discount_schedule(&CashflowSchedule::for_bond(spec), ctx) {
        let t = discounted.cashflow.time;
        let mut coupon_pv = discounted.present_value;

        // Principal is timed at the stated maturity, coupons at i / n
        if discounted.cashflow.period == periods {
            let maturity = spec.years_to_maturity();
            let face_pv = spec.face_value() * ctx.discount_factor(periods);
            coupon_pv -= face_pv;
            pv_total += face_pv;
            weighted_time += maturity * face_pv;
            weighted_squares += maturity * (maturity + period_length) * face_pv;
        }

        pv_total += coupon_pv;
        weighted_time += t * coupon_pv;
        weighted_squares += t * (t + period_length) * coupon_pv;
    }

    let macaulay_duration = weighted_time / pv_total;

    RiskMetrics {
        macaulay_duration,
        modified_duration: macaulay_duration / growth,
        convexity: weighted_squares / (pv_total * growth * growth),
    }
}
