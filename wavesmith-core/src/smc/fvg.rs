//! Fair value gap detection and fill tracking.
//!
//! A bullish FVG is a three-bar imbalance where bar i-1's high sits below
//! bar i+1's low; bearish is the mirror. Gaps smaller than 0.3x ATR are
//! noise and ignored. Fill percentage tracks how deep later price has
//! traveled back into the gap; crossing the far edge marks it filled.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Bias};

/// Minimum gap size, in ATR multiples.
const MIN_GAP_ATR: f64 = 0.3;

/// How many gaps survive ranking.
const MAX_FVGS: usize = 8;

/// A three-bar price imbalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairValueGap {
    /// Index of the middle bar of the three-bar pattern.
    pub index: usize,
    pub kind: Bias,
    pub top: f64,
    pub bottom: f64,
    pub mid: f64,
    pub is_filled: bool,
    /// 0-100, how much of the gap later price has retraced into.
    pub fill_pct: f64,
}

impl FairValueGap {
    /// Whether a price sits inside the gap within `tolerance`.
    pub fn contains(&self, price: f64, tolerance: f64) -> bool {
        price >= self.bottom - tolerance && price <= self.top + tolerance
    }
}

/// Detect fair value gaps, tracking fill state from all later bars.
/// Ranking keeps unfilled gaps first, most recent first; at most eight.
pub fn find_fair_value_gaps(bars: &[Bar], atr: f64) -> Vec<FairValueGap> {
    let n = bars.len();
    if n < 3 {
        return Vec::new();
    }

    let min_gap = MIN_GAP_ATR * atr;
    let mut gaps = Vec::new();

    for i in 1..n - 1 {
        let prev_high = bars[i - 1].high;
        let prev_low = bars[i - 1].low;
        let next_high = bars[i + 1].high;
        let next_low = bars[i + 1].low;

        if next_low - prev_high >= min_gap {
            gaps.push(track_fill(
                bars,
                i,
                Bias::Bullish,
                next_low,  // top
                prev_high, // bottom
            ));
        }
        if prev_low - next_high >= min_gap {
            gaps.push(track_fill(
                bars,
                i,
                Bias::Bearish,
                prev_low,  // top
                next_high, // bottom
            ));
        }
    }

    gaps.sort_by(|a, b| {
        (a.is_filled, b.index)
            .cmp(&(b.is_filled, a.index))
    });
    gaps.truncate(MAX_FVGS);
    gaps
}

/// Measure how far later price has traveled into the gap.
///
/// A bullish gap sits below the move that created it, so fill depth is
/// measured from the top edge downward by later lows; bearish mirrors.
fn track_fill(bars: &[Bar], index: usize, kind: Bias, top: f64, bottom: f64) -> FairValueGap {
    let size = top - bottom;
    let later = &bars[index + 2..];

    let depth = match kind {
        Bias::Bullish => {
            let min_low = later.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            top - min_low
        }
        Bias::Bearish => {
            let max_high = later.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            max_high - bottom
        }
    };

    let fill_pct = if later.is_empty() || size <= 0.0 {
        0.0
    } else {
        (depth / size).clamp(0.0, 1.0) * 100.0
    };

    FairValueGap {
        index,
        kind,
        top,
        bottom,
        mid: (top + bottom) / 2.0,
        is_filled: fill_pct >= 100.0,
        fill_pct,
    }
}
