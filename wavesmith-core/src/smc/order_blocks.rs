//! Order block detection.
//!
//! A bullish order block is a down-candle followed within three bars by a
//! cumulative up-move of at least 1.5x ATR; bearish is the mirror. The block
//! spans the candle's own open/close. Mitigation means a later bar's extreme
//! traded back through the far edge of the block; touches count later closes
//! re-entering the block within a 0.3x ATR tolerance.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Bias};

/// Follow-through displacement required, in ATR multiples.
const DISPLACEMENT_ATR: f64 = 1.5;

/// Tolerance band around the block for touch counting, in ATR multiples.
const TOUCH_TOLERANCE_ATR: f64 = 0.3;

/// Displacement that earns full strength, in ATR multiples.
const FULL_STRENGTH_ATR: f64 = 3.0;

/// How many bars after the candle the displacement may take.
const DISPLACEMENT_WINDOW: usize = 3;

/// How many blocks survive ranking.
const MAX_ORDER_BLOCKS: usize = 8;

/// A supply/demand zone left behind by a displacement move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    pub index: usize,
    pub kind: Bias,
    pub top: f64,
    pub bottom: f64,
    pub mid: f64,
    /// min(1, displacement / 3 ATR).
    pub strength: f64,
    pub is_mitigated: bool,
    pub touch_count: usize,
    /// Size of the follow-through move in price units.
    pub displacement: f64,
}

impl OrderBlock {
    /// Whether a price sits inside the block within `tolerance`.
    pub fn contains(&self, price: f64, tolerance: f64) -> bool {
        price >= self.bottom - tolerance && price <= self.top + tolerance
    }
}

/// Detect order blocks and rank them: unmitigated first, then by touch
/// count, then by strength. At most eight survive.
pub fn find_order_blocks(bars: &[Bar], atr: f64) -> Vec<OrderBlock> {
    let n = bars.len();
    if n < DISPLACEMENT_WINDOW + 2 {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    for i in 1..n - DISPLACEMENT_WINDOW {
        let bar = &bars[i];
        let follow = &bars[i + 1..=i + DISPLACEMENT_WINDOW];

        if bar.is_down() {
            let displacement = follow
                .iter()
                .map(|b| b.close - bar.close)
                .fold(f64::MIN, f64::max);
            if displacement >= DISPLACEMENT_ATR * atr {
                blocks.push(build_block(bars, i, Bias::Bullish, displacement, atr));
            }
        }
        if bar.is_up() {
            let displacement = follow
                .iter()
                .map(|b| bar.close - b.close)
                .fold(f64::MIN, f64::max);
            if displacement >= DISPLACEMENT_ATR * atr {
                blocks.push(build_block(bars, i, Bias::Bearish, displacement, atr));
            }
        }
    }

    blocks.sort_by(|a, b| {
        (a.is_mitigated, b.touch_count, b.strength)
            .partial_cmp(&(b.is_mitigated, a.touch_count, a.strength))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    blocks.truncate(MAX_ORDER_BLOCKS);
    blocks
}

fn build_block(bars: &[Bar], index: usize, kind: Bias, displacement: f64, atr: f64) -> OrderBlock {
    let bar = &bars[index];
    let top = bar.open.max(bar.close);
    let bottom = bar.open.min(bar.close);
    let tolerance = TOUCH_TOLERANCE_ATR * atr;

    let later = &bars[index + DISPLACEMENT_WINDOW + 1..];
    let is_mitigated = later.iter().any(|b| match kind {
        Bias::Bullish => b.low < bottom,
        Bias::Bearish => b.high > top,
    });
    let touch_count = later
        .iter()
        .filter(|b| b.close >= bottom - tolerance && b.close <= top + tolerance)
        .count();

    OrderBlock {
        index,
        kind,
        top,
        bottom,
        mid: (top + bottom) / 2.0,
        strength: (displacement / (FULL_STRENGTH_ATR * atr)).min(1.0),
        is_mitigated,
        touch_count,
        displacement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::atr;
    use crate::indicators::testing::bars_from_ohlc;
    use proptest::prelude::*;

    /// Flat base, one down-candle, then a strong three-bar rally.
    fn bullish_ob_rows() -> Vec<(f64, f64, f64, f64)> {
        let mut rows = vec![(100.0, 100.6, 99.4, 100.0); 15];
        rows.push((100.0, 100.2, 98.9, 99.0)); // down-candle: block 99.0..100.0
        rows.push((99.0, 101.5, 99.0, 101.2));
        rows.push((101.2, 103.0, 101.0, 102.8));
        rows.push((102.8, 104.0, 102.5, 103.8)); // displacement 4.8 from 99.0
        rows
    }

    #[test]
    fn detects_bullish_block_after_displacement() {
        let bars = bars_from_ohlc(&bullish_ob_rows());
        let a = atr(&bars, 14);
        let blocks = find_order_blocks(&bars, a);
        let ob = blocks
            .iter()
            .find(|ob| ob.kind == Bias::Bullish && ob.index == 15)
            .expect("bullish order block at the down-candle");
        assert_eq!(ob.top, 100.0);
        assert_eq!(ob.bottom, 99.0);
        assert!(!ob.is_mitigated);
        assert!(ob.strength > 0.0 && ob.strength <= 1.0);
        assert!(ob.displacement >= 1.5 * a);
    }

    #[test]
    fn later_sweep_through_block_mitigates_it() {
        let mut rows = bullish_ob_rows();
        rows.push((103.8, 103.9, 98.5, 98.7)); // trades below block bottom
        let bars = bars_from_ohlc(&rows);
        let a = atr(&bars, 14);
        let blocks = find_order_blocks(&bars, a);
        let ob = blocks
            .iter()
            .find(|ob| ob.kind == Bias::Bullish && ob.index == 15)
            .expect("block still detected");
        assert!(ob.is_mitigated);
    }

    #[test]
    fn touches_count_closes_reentering_the_block() {
        let mut rows = bullish_ob_rows();
        rows.push((103.8, 103.9, 99.4, 99.6)); // close back inside the block
        rows.push((99.6, 102.0, 99.5, 101.8));
        let bars = bars_from_ohlc(&rows);
        let a = atr(&bars, 14);
        let blocks = find_order_blocks(&bars, a);
        let ob = blocks
            .iter()
            .find(|ob| ob.kind == Bias::Bullish && ob.index == 15)
            .unwrap();
        assert!(ob.touch_count >= 1);
    }

    #[test]
    fn weak_follow_through_is_ignored() {
        let mut rows = vec![(100.0, 100.6, 99.4, 100.0); 15];
        rows.push((100.0, 100.2, 98.9, 99.0));
        rows.push((99.0, 99.4, 98.9, 99.2)); // drift, no displacement
        rows.push((99.2, 99.5, 99.0, 99.3));
        rows.push((99.3, 99.6, 99.1, 99.4));
        let bars = bars_from_ohlc(&rows);
        let a = atr(&bars, 14);
        assert!(find_order_blocks(&bars, a)
            .iter()
            .all(|ob| ob.index != 15));
    }

    #[test]
    fn unmitigated_blocks_rank_first() {
        let mut rows = bullish_ob_rows();
        // Second bullish block later in the series.
        rows.push((103.8, 104.0, 102.7, 102.8)); // down-candle
        rows.push((102.8, 105.5, 102.8, 105.2));
        rows.push((105.2, 107.0, 105.0, 106.8));
        rows.push((106.8, 108.0, 106.5, 107.8));
        // Sweep through the first block only.
        rows.push((107.8, 107.9, 98.5, 98.7));
        let bars = bars_from_ohlc(&rows);
        let a = atr(&bars, 14);
        let blocks = find_order_blocks(&bars, a);
        assert!(blocks.len() >= 2);
        let first_mitigated = blocks
            .iter()
            .position(|ob| ob.is_mitigated)
            .unwrap_or(blocks.len());
        let last_unmitigated = blocks
            .iter()
            .rposition(|ob| !ob.is_mitigated)
            .unwrap_or(0);
        assert!(last_unmitigated < first_mitigated || blocks.iter().all(|b| b.is_mitigated));
    }

    proptest! {
        /// Mitigation is monotonic: a block mitigated in a prefix stays
        /// mitigated when later bars are appended.
        #[test]
        fn mitigation_is_monotonic_under_extension(
            steps in prop::collection::vec(-1.0f64..1.0, 30..60),
            cut in 25usize..30,
        ) {
            let mut close = 100.0;
            let rows: Vec<(f64, f64, f64, f64)> = steps
                .iter()
                .map(|&s| {
                    let open = close;
                    close = (close + s).max(1.0);
                    (open, open.max(close) + 0.2, open.min(close) - 0.2, close)
                })
                .collect();
            let bars = bars_from_ohlc(&rows);
            let a = atr(&bars, 14);

            let prefix = find_order_blocks(&bars[..cut], a);
            let full = find_order_blocks(&bars, a);
            for ob in prefix.iter().filter(|ob| ob.is_mitigated) {
                if let Some(later) = full
                    .iter()
                    .find(|o| o.index == ob.index && o.kind == ob.kind)
                {
                    prop_assert!(later.is_mitigated);
                }
            }
        }
    }
}
