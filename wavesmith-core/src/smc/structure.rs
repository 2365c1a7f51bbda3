//! Break of Structure / Change of Character detection.
//!
//! A structural break is a close beyond the local window extreme backed by a
//! candle body of at least 0.7x ATR. The break is a CHoCH when the prior
//! local closes ran the opposite way, otherwise a BOS. The prior-leg test
//! deliberately inspects a single close-to-close comparison over the window;
//! downstream confluence scoring depends on this definition staying as is.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Bias};

/// Candle body required to qualify a break, in ATR multiples.
const BREAK_BODY_ATR: f64 = 0.7;

/// How many structure points survive.
const MAX_STRUCTURE_POINTS: usize = 12;

/// Continuation break or character change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureKind {
    #[serde(rename = "BOS")]
    Bos,
    #[serde(rename = "CHoCH")]
    Choch,
}

/// A confirmed or pending structural break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructurePoint {
    pub index: usize,
    /// The close that broke the level.
    pub price: f64,
    pub kind: StructureKind,
    pub direction: Bias,
    /// A later close held beyond the broken level.
    pub is_confirmed: bool,
    /// Break candle body in ATR multiples.
    pub displacement: f64,
}

/// Local-extreme window size for an n-bar series.
pub(crate) fn structure_window(n: usize) -> usize {
    (n / 10).max(5)
}

/// Detect BOS/CHoCH points; the most recent twelve survive.
pub fn find_structure_points(bars: &[Bar], atr: f64) -> Vec<StructurePoint> {
    let n = bars.len();
    let window = structure_window(n);
    if n <= window {
        return Vec::new();
    }

    let mut points = Vec::new();
    for i in window..n {
        let bar = &bars[i];
        let body = bar.body();
        if body < BREAK_BODY_ATR * atr {
            continue;
        }

        let local = &bars[i - window..i];
        let local_high = local.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let local_low = local.iter().map(|b| b.low).fold(f64::MAX, f64::min);

        // Single-comparison prior-leg read: close at window start vs the
        // close just before the break.
        let prior_leg_down = bars[i - 1].close < bars[i - window].close;
        let prior_leg_up = bars[i - 1].close > bars[i - window].close;

        if bar.close > local_high {
            let kind = if prior_leg_down {
                StructureKind::Choch
            } else {
                StructureKind::Bos
            };
            let is_confirmed = bars[i + 1..].iter().any(|b| b.close > local_high);
            points.push(StructurePoint {
                index: i,
                price: bar.close,
                kind,
                direction: Bias::Bullish,
                is_confirmed,
                displacement: body / atr,
            });
        } else if bar.close < local_low {
            let kind = if prior_leg_up {
                StructureKind::Choch
            } else {
                StructureKind::Bos
            };
            let is_confirmed = bars[i + 1..].iter().any(|b| b.close < local_low);
            points.push(StructurePoint {
                index: i,
                price: bar.close,
                kind,
                direction: Bias::Bearish,
                is_confirmed,
                displacement: body / atr,
            });
        }
    }

    if points.len() > MAX_STRUCTURE_POINTS {
        points.drain(..points.len() - MAX_STRUCTURE_POINTS);
    }
    points
}
