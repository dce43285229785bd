//! Liquidity-dependent slippage and effective execution rate.
//!
//! The penalty for a leg grows with its quoted spread and shrinks with the
//! square root of available depth:
//!
//! ```text
//! exponent = -(slippage% / 100) / (sensitivity * (sqrt(volume) + 0.1))
//! impact   = clamp(1 - exp(exponent), 0, max_impact)
//! rate'    = rate * (1 - fee_rate) * (1 - impact)
//! ```
//!
//! The penalty saturates instead of diverging as volume goes to zero, and the
//! cap keeps one illiquid leg from dominating a path.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use spotarb_core::GraphEdge;

/// Added to `sqrt(volume)` so an empty book still has a finite scale.
const DEPTH_OFFSET: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Parameters of the slippage/profit model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlippageModel {
    /// Taker fee per leg (0.001 = 0.1%).
    pub fee_rate: Decimal,
    /// Spread-to-depth sensitivity.
    pub sensitivity: Decimal,
    /// Upper bound on the per-leg impact (0.1 = 10%).
    pub max_impact: Decimal,
    /// Beyond this magnitude `exp` is replaced by its limit (0 or +inf).
    pub exponent_limit: Decimal,
}

impl Default for SlippageModel {
    fn default() -> Self {
        Self {
            fee_rate: Decimal::new(1, 3),
            sensitivity: Decimal::new(5, 2),
            max_impact: Decimal::new(1, 1),
            exponent_limit: Decimal::from(20),
        }
    }
}

impl SlippageModel {
    /// Fractional impact of slippage for a leg, always within `[0, max_impact]`.
    pub fn slippage_impact(&self, slippage_percent: Decimal, available_volume: Decimal) -> Decimal {
        if slippage_percent.is_zero() {
            return Decimal::ZERO;
        }
        let fraction = slippage_percent / Decimal::ONE_HUNDRED;
        let depth = available_volume.sqrt().unwrap_or(Decimal::ZERO) + DEPTH_OFFSET;
        let scale = self.sensitivity * depth;

        let decay = match (-fraction).checked_div(scale) {
            Some(exponent) => self.decay(exponent),
            // zero scale: the exponent runs off to -fraction * inf
            None => limit_decay(-fraction),
        };

        decay.min(self.max_impact).max(Decimal::ZERO)
    }

    /// `1 - exp(exponent)`, with out-of-range exponents replaced by the limit.
    fn decay(&self, exponent: Decimal) -> Decimal {
        if exponent.abs() > self.exponent_limit {
            return limit_decay(exponent);
        }
        match exponent.checked_exp() {
            Some(e) => Decimal::ONE - e,
            None => limit_decay(exponent),
        }
    }

    /// Effective rate for a raw rate after fee and slippage.
    ///
    /// Returns `None` if the product overflows.
    pub fn effective_rate(
        &self,
        rate: Decimal,
        slippage_percent: Decimal,
        available_volume: Decimal,
    ) -> Option<Decimal> {
        let impact = self.slippage_impact(slippage_percent, available_volume);
        rate.checked_mul(Decimal::ONE - self.fee_rate)?
            .checked_mul(Decimal::ONE - impact)
    }

    /// Multiplier applied to an amount carried across `edge`.
    pub fn effective_multiplier(&self, edge: &GraphEdge) -> Option<Decimal> {
        self.effective_rate(edge.rate, edge.slippage_percent, edge.available_volume)
    }
}

/// Limit of `1 - exp(x)`: 1 as x -> -inf, -inf (here `Decimal::MIN`) as x -> +inf.
fn limit_decay(exponent: Decimal) -> Decimal {
    if exponent.is_zero() {
        Decimal::ZERO
    } else if exponent.is_sign_negative() {
        Decimal::ONE
    } else {
        Decimal::MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spotarb_core::TradeSide;

    fn edge(rate: Decimal, slippage_percent: Decimal, available_volume: Decimal) -> GraphEdge {
        GraphEdge {
            from: "USDT".into(),
            to: "BTC".into(),
            rate,
            side: TradeSide::Buy,
            instrument_id: "BTC-USDT".into(),
            price: rate,
            available_volume,
            slippage_percent,
            price_increment_units: Decimal::ZERO,
        }
    }

    #[test]
    fn test_default_constants() {
        let model = SlippageModel::default();
        assert_eq!(model.fee_rate, dec!(0.001));
        assert_eq!(model.sensitivity, dec!(0.05));
        assert_eq!(model.max_impact, dec!(0.1));
        assert_eq!(model.exponent_limit, dec!(20));
        assert_eq!(DEPTH_OFFSET, dec!(0.1));
    }

    #[test]
    fn test_zero_slippage_only_charges_fee() {
        let model = SlippageModel::default();
        assert_eq!(model.slippage_impact(Decimal::ZERO, dec!(1000)), Decimal::ZERO);
        assert_eq!(
            model.effective_multiplier(&edge(dec!(2), Decimal::ZERO, dec!(1000))),
            Some(dec!(1.998))
        );
    }

    #[test]
    fn test_moderate_slippage() {
        // exponent = -0.001 / (0.05 * (10 + 0.1)) = -0.0019801..
        // impact   = 1 - exp(exponent) ~= 0.0019782
        let impact = SlippageModel::default().slippage_impact(dec!(0.1), dec!(100));
        assert!(impact > dec!(0.00197), "impact {}", impact);
        assert!(impact < dec!(0.00199), "impact {}", impact);
    }

    #[test]
    fn test_impact_shrinks_with_depth() {
        let model = SlippageModel::default();
        let shallow = model.slippage_impact(dec!(0.5), dec!(100));
        let deep = model.slippage_impact(dec!(0.5), dec!(1000000));
        assert!(deep < shallow);
    }

    #[test]
    fn test_empty_book_saturates_at_cap() {
        // exponent = -0.5 / (0.05 * 0.1) = -100, past the exp limit
        let impact = SlippageModel::default().slippage_impact(dec!(50), Decimal::ZERO);
        assert_eq!(impact, dec!(0.1));
    }

    #[test]
    fn test_negative_slippage_clamps_to_zero() {
        let model = SlippageModel::default();
        assert_eq!(model.slippage_impact(dec!(-1), dec!(100)), Decimal::ZERO);
        // far past the limit on the positive side as well
        assert_eq!(model.slippage_impact(dec!(-50), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_zero_sensitivity_uses_limit() {
        let model = SlippageModel {
            sensitivity: Decimal::ZERO,
            ..Default::default()
        };
        assert_eq!(model.slippage_impact(dec!(0.2), dec!(100)), dec!(0.1));
        assert_eq!(model.slippage_impact(Decimal::ZERO, dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn test_impact_always_within_bounds() {
        let model = SlippageModel::default();
        let slippages = [dec!(-10), dec!(0), dec!(0.01), dec!(0.3), dec!(2), dec!(25), dec!(400)];
        let volumes = [dec!(0), dec!(0.5), dec!(10), dec!(1000), dec!(5000000)];

        for slippage in slippages {
            for volume in volumes {
                let impact = model.slippage_impact(slippage, volume);
                assert!(impact >= Decimal::ZERO && impact <= dec!(0.1), "{} {} -> {}", slippage, volume, impact);
            }
        }
    }
}
