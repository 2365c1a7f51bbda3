//! Stop, target and position sizing arithmetic.
//!
//! The stop chain only ever widens: structure stop (order block edge or
//! 20-bar swing), then the 5-bar wick stop, then a 1.5x ATR floor from
//! entry. Targets prefer the wave projection when it clears the minimum
//! R-multiple for its rung, otherwise fall back to fixed R-multiples, and
//! are always spaced at least half an R apart.

use crate::domain::{Bar, Direction};
use crate::elliott::ElliottWaveResult;
use crate::smc::OrderBlock;

/// Minimum stop distance, in ATR multiples.
const STOP_FLOOR_ATR: f64 = 1.5;

/// Buffer past an order block edge, in ATR multiples.
const OB_STOP_BUFFER_ATR: f64 = 0.4;

/// Buffer past the 20-bar swing extreme, in ATR multiples.
const SWING_STOP_BUFFER_ATR: f64 = 0.3;

/// Buffer past the 5-bar wick extreme, in ATR multiples.
const WICK_STOP_BUFFER_ATR: f64 = 0.2;

const SWING_WINDOW: usize = 20;
const WICK_WINDOW: usize = 5;

/// Wave targets must clear these R-multiples to be used per rung.
const ELLIOTT_MIN_R: [f64; 3] = [1.5, 2.5, 3.5];

/// Fixed R-multiples used when no wave target qualifies.
const FALLBACK_R: [f64; 3] = [1.8, 2.8, 4.5];

/// Minimum spacing between consecutive targets, in R.
const TARGET_SPACING_R: f64 = 0.5;

/// Accepted reward:risk ratio; boundary-exact.
pub const MIN_RISK_REWARD: f64 = 1.5;
pub const RR_EPSILON: f64 = 1e-9;

/// Round a price to 5 decimal places.
pub fn round5(price: f64) -> f64 {
    (price * 100_000.0).round() / 100_000.0
}

/// Protective stop for a position entered at the last close.
///
/// Starts from the structure stop (aligned unmitigated order block edge if
/// one exists, else the 20-bar swing extreme), widens to the 5-bar wick
/// stop if that is further, then enforces the ATR floor.
pub fn stop_loss(
    bars: &[Bar],
    direction: Direction,
    entry: f64,
    atr: f64,
    aligned_ob: Option<&OrderBlock>,
) -> f64 {
    let swing = &bars[bars.len().saturating_sub(SWING_WINDOW)..];
    let wick = &bars[bars.len().saturating_sub(WICK_WINDOW)..];

    match direction {
        Direction::Long => {
            let structure = match aligned_ob {
                Some(ob) => ob.bottom - OB_STOP_BUFFER_ATR * atr,
                None => {
                    let low = swing.iter().map(|b| b.low).fold(f64::MAX, f64::min);
                    low - SWING_STOP_BUFFER_ATR * atr
                }
            };
            let wick_stop =
                wick.iter().map(|b| b.low).fold(f64::MAX, f64::min) - WICK_STOP_BUFFER_ATR * atr;
            let floor = entry - STOP_FLOOR_ATR * atr;
            structure.min(wick_stop).min(floor)
        }
        Direction::Short => {
            let structure = match aligned_ob {
                Some(ob) => ob.top + OB_STOP_BUFFER_ATR * atr,
                None => {
                    let high = swing.iter().map(|b| b.high).fold(f64::MIN, f64::max);
                    high + SWING_STOP_BUFFER_ATR * atr
                }
            };
            let wick_stop =
                wick.iter().map(|b| b.high).fold(f64::MIN, f64::max) + WICK_STOP_BUFFER_ATR * atr;
            let ceil = entry + STOP_FLOOR_ATR * atr;
            structure.max(wick_stop).max(ceil)
        }
    }
}

/// Three-rung target ladder.
///
/// Each rung takes the wave projection when it sits on the trade side and
/// clears that rung's minimum R-multiple, otherwise the fixed fallback.
/// Rungs are then pushed apart to at least half an R of spacing.
pub fn take_profits(
    elliott: &ElliottWaveResult,
    direction: Direction,
    entry: f64,
    risk: f64,
) -> [f64; 3] {
    let sign = direction.sign();
    let wave = [elliott.target, elliott.tp2, elliott.tp3];

    let mut tps = [0.0f64; 3];
    for rung in 0..3 {
        let projected = wave[rung].filter(|&t| {
            let reward = sign * (t - entry);
            reward >= ELLIOTT_MIN_R[rung] * risk - RR_EPSILON
        });
        tps[rung] = match projected {
            Some(t) => t,
            None => entry + sign * FALLBACK_R[rung] * risk,
        };
    }

    for rung in 1..3 {
        let min_level = tps[rung - 1] + sign * TARGET_SPACING_R * risk;
        if sign * (tps[rung] - min_level) < 0.0 {
            tps[rung] = min_level;
        }
    }
    tps
}

/// Reward:risk of the first target. Boundary acceptance is exact: a ratio
/// of 1.5 passes, 1.499 does not.
pub fn risk_reward(direction: Direction, entry: f64, stop: f64, tp1: f64) -> f64 {
    let risk = (entry - stop).abs();
    if risk <= 0.0 {
        return 0.0;
    }
    direction.sign() * (tp1 - entry) / risk
}

pub fn risk_reward_acceptable(rr: f64) -> bool {
    rr >= MIN_RISK_REWARD - RR_EPSILON
}

/// Fixed-fractional lot size: risk amount over pip risk at 10 units per
/// pip per lot. Clamped to broker limits and rounded to 2 decimals.
pub fn lot_size(balance: f64, risk_fraction: f64, entry: f64, stop: f64) -> f64 {
    let risk_amount = balance * risk_fraction;
    let pip_diff = (entry - stop).abs() * 10_000.0;
    if pip_diff <= 0.0 {
        return 0.01;
    }
    let raw = risk_amount / (pip_diff * 10.0);
    (raw.clamp(0.01, 10.0) * 100.0).round() / 100.0
}
