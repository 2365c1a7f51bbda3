//! Liquidity sweep detection.
//!
//! A buy-side sweep is a wick at least 0.2x ATR beyond the prior window
//! high with the close back under that high: stops above the range were
//! taken, then price rejected. Sell-side is the mirror. A sweep hints at
//! reversal, so its direction is the opposite bias.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Bias};
use crate::smc::structure::structure_window;

/// Wick excess beyond the swept level, in ATR multiples.
const SWEEP_EXCESS_ATR: f64 = 0.2;

/// How many sweeps survive.
const MAX_SWEEPS: usize = 6;

/// Which pool of resting orders was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepSide {
    /// Stops above a prior high.
    BuySide,
    /// Stops below a prior low.
    SellSide,
}

/// A stop-hunt wick through a prior extreme that closed back inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquiditySweep {
    pub index: usize,
    pub side: SweepSide,
    /// The swept extreme.
    pub level: f64,
    /// Implied reversal bias.
    pub direction: Bias,
}

/// Detect liquidity sweeps; the most recent six survive.
pub fn find_liquidity_sweeps(bars: &[Bar], atr: f64) -> Vec<LiquiditySweep> {
    let n = bars.len();
    let window = structure_window(n);
    if n <= window {
        return Vec::new();
    }

    let excess = SWEEP_EXCESS_ATR * atr;
    let mut sweeps = Vec::new();

    for i in window..n {
        let bar = &bars[i];
        let local = &bars[i - window..i];
        let prior_high = local.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let prior_low = local.iter().map(|b| b.low).fold(f64::MAX, f64::min);

        if bar.high >= prior_high + excess && bar.close < prior_high {
            sweeps.push(LiquiditySweep {
                index: i,
                side: SweepSide::BuySide,
                level: prior_high,
                direction: Bias::Bearish,
            });
        }
        if bar.low <= prior_low - excess && bar.close > prior_low {
            sweeps.push(LiquiditySweep {
                index: i,
                side: SweepSide::SellSide,
                level: prior_low,
                direction: Bias::Bullish,
            });
        }
    }

    if sweeps.len() > MAX_SWEEPS {
        sweeps.drain(..sweeps.len() - MAX_SWEEPS);
    }
    sweeps
}
