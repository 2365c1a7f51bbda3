//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! This crate uses the simple mean of the last `period` true ranges; the
//! structural detectors consume ATR as a single displacement yardstick for
//! the latest snapshot, not as a full smoothed series.
//! Degenerate input (too short, flat) falls back to 0.1% of the last price.

use crate::domain::Bar;

/// Fraction of price used as the ATR floor when the series is too short
/// or has zero range.
const ATR_FLOOR_PCT: f64 = 0.001;

/// True Range series. TR[0] has no previous close and is just high - low.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = Vec::with_capacity(n);
    if n == 0 {
        return tr;
    }
    tr.push(bars[0].high - bars[0].low);
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr.push((h - l).max((h - pc).abs()).max((l - pc).abs()));
    }
    tr
}

/// ATR over the trailing `period` bars, floored at 0.1% of the last close.
///
/// The floor guards every downstream division (displacement ratios, stop
/// distances) against flat or too-short series.
pub fn atr(bars: &[Bar], period: usize) -> f64 {
    let Some(last) = bars.last() else {
        return ATR_FLOOR_PCT;
    };
    let floor = (last.close.abs() * ATR_FLOOR_PCT).max(f64::MIN_POSITIVE);

    if bars.len() < period + 1 || period == 0 {
        return floor;
    }

    let tr = true_range(bars);
    // Skip TR[0]: no previous close, not a proper true range.
    let usable = &tr[1..];
    let window = &usable[usable.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    if mean > 0.0 {
        mean
    } else {
        floor
    }
}
