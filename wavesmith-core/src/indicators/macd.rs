//! Moving Average Convergence/Divergence (MACD) snapshot.
//!
//! Standard 12/26/9 EMA construction. The snapshot carries the latest
//! line/signal/histogram values and a momentum flag that is true when the
//! histogram has risen in magnitude toward the trade side for three bars
//! (strictly increasing for longs, strictly decreasing for shorts is read
//! by the caller via `histogram` sign plus `momentum_rising`).

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::ema::ema_series;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Latest MACD reading. `Default` is the neutral result for short series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSnapshot {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    /// Histogram strictly increased over the last three bars.
    pub momentum_rising: bool,
    /// Histogram strictly decreased over the last three bars.
    pub momentum_falling: bool,
}

/// Compute the latest MACD snapshot; neutral default below warmup length.
pub fn macd_snapshot(bars: &[Bar]) -> MacdSnapshot {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    if closes.len() < MACD_SLOW + MACD_SIGNAL {
        return MacdSnapshot::default();
    }

    let fast = ema_series(&closes, MACD_FAST);
    let slow = ema_series(&closes, MACD_SLOW);

    // MACD line is defined from the first index where both EMAs exist.
    let macd_line: Vec<f64> = fast
        .iter()
        .zip(&slow)
        .skip(MACD_SLOW - 1)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_series(&macd_line, MACD_SIGNAL);

    let hist: Vec<f64> = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    let n = hist.len();
    let last_valid = |v: &[f64], i: usize| -> f64 {
        let x = v[i];
        if x.is_nan() {
            0.0
        } else {
            x
        }
    };

    let histogram = last_valid(&hist, n - 1);
    let momentum_rising = n >= 3
        && !hist[n - 3].is_nan()
        && hist[n - 1] > hist[n - 2]
        && hist[n - 2] > hist[n - 3];
    let momentum_falling = n >= 3
        && !hist[n - 3].is_nan()
        && hist[n - 1] < hist[n - 2]
        && hist[n - 2] < hist[n - 3];

    MacdSnapshot {
        macd: last_valid(&macd_line, macd_line.len() - 1),
        signal: last_valid(&signal_line, signal_line.len() - 1),
        histogram,
        momentum_rising,
        momentum_falling,
    }
}
