//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and losses over close-to-close changes.
//! Returns the latest value only. Edge cases: fewer than `period + 1` bars
//! → 50.0 (neutral); zero average loss → 100.0; zero average gain → 0.0.

use crate::domain::Bar;

/// RSI of the latest bar, neutral 50.0 on insufficient history.
pub fn rsi(bars: &[Bar], period: usize) -> f64 {
    let n = bars.len();
    if period == 0 || n < period + 1 {
        return 50.0;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let ch = bars[i].close - bars[i - 1].close;
        if ch > 0.0 {
            avg_gain += ch;
        } else {
            avg_loss -= ch;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        let ch = bars[i].close - bars[i - 1].close;
        let gain = if ch > 0.0 { ch } else { 0.0 };
        let loss = if ch < 0.0 { -ch } else { 0.0 };
        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
    }

    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
