//! Pivot extraction — local price extrema in a bar series.
//!
//! A bar is a swing high if its high is >= every high within `order` bars on
//! both sides (plateau-tolerant), mirrored for swing lows. Same-type pivots
//! closer than `order` bars are merged, keeping the more extreme price.
//! Pure and deterministic; series shorter than `2*order + 1` yield nothing.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Which side of price action a pivot marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotKind {
    High,
    Low,
}

/// A single swing point. Derived, recomputed per call, no persisted identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub index: usize,
    pub price: f64,
    pub kind: PivotKind,
}

/// Swing highs and lows of one series, each ordered by bar index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotSet {
    pub highs: Vec<Pivot>,
    pub lows: Vec<Pivot>,
}

impl PivotSet {
    /// All pivots of both kinds in bar-index order.
    pub fn interleaved(&self) -> Vec<Pivot> {
        let mut all: Vec<Pivot> = self.highs.iter().chain(self.lows.iter()).copied().collect();
        all.sort_by_key(|p| p.index);
        all
    }
}

/// Window order chosen from series length when the caller does not supply one.
pub fn adaptive_order(len: usize) -> usize {
    if len >= 500 {
        10
    } else if len >= 200 {
        7
    } else if len >= 100 {
        5
    } else {
        3
    }
}

/// Find swing highs and lows with window order `order`.
///
/// Pass `None` to pick the order adaptively from the series length.
pub fn find_pivots(bars: &[Bar], order: Option<usize>) -> PivotSet {
    let k = order.unwrap_or_else(|| adaptive_order(bars.len())).max(1);
    let n = bars.len();
    if n < 2 * k + 1 {
        return PivotSet::default();
    }

    let mut highs = Vec::new();
    let mut lows = Vec::new();

    for i in k..n - k {
        let window = &bars[i - k..=i + k];
        if window.iter().all(|b| bars[i].high >= b.high) {
            highs.push(Pivot {
                index: i,
                price: bars[i].high,
                kind: PivotKind::High,
            });
        }
        if window.iter().all(|b| bars[i].low <= b.low) {
            lows.push(Pivot {
                index: i,
                price: bars[i].low,
                kind: PivotKind::Low,
            });
        }
    }

    PivotSet {
        highs: merge_close(highs, k, PivotKind::High),
        lows: merge_close(lows, k, PivotKind::Low),
    }
}

/// Collapse same-type pivots within `k` bars of each other, keeping the more
/// extreme price (higher high / lower low). Plateaus produce runs of equal
/// pivots; the earliest of an equal run survives.
fn merge_close(pivots: Vec<Pivot>, k: usize, kind: PivotKind) -> Vec<Pivot> {
    let mut merged: Vec<Pivot> = Vec::with_capacity(pivots.len());
    for p in pivots {
        match merged.last_mut() {
            Some(last) if p.index - last.index <= k => {
                let replace = match kind {
                    PivotKind::High => p.price > last.price,
                    PivotKind::Low => p.price < last.price,
                };
                if replace {
                    *last = p;
                }
            }
            _ => merged.push(p),
        }
    }
    merged
}
