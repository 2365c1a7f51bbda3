//! Smart Money Concepts structure analysis.
//!
//! Derives order blocks, fair value gaps, BOS/CHoCH structure points and
//! liquidity sweeps directly from bars, then aggregates them into a trend
//! vote, premium/discount zoning and a confidence reading. Everything is
//! recomputed per call from the immutable snapshot.

pub mod fvg;
pub mod order_blocks;
pub mod structure;
pub mod sweeps;

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Bias, Trend};
use crate::indicators::{atr, ema_last};

pub use fvg::{find_fair_value_gaps, FairValueGap};
pub use order_blocks::{find_order_blocks, OrderBlock};
pub use structure::{find_structure_points, StructureKind, StructurePoint};
pub use sweeps::{find_liquidity_sweeps, LiquiditySweep, SweepSide};

/// Minimum series length for structure analysis.
pub const MIN_BARS: usize = 20;

const ATR_PERIOD: usize = 14;
const RANGE_WINDOW: usize = 50;
const TREND_EMA_PERIOD: usize = 20;

/// Where price sits inside the recent trading range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Premium,
    Discount,
    Equilibrium,
}

/// Premium/discount/equilibrium levels of the recent high-low range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneLevels {
    pub premium: f64,
    pub discount: f64,
    pub equilibrium: f64,
    pub zone: Zone,
}

impl ZoneLevels {
    fn neutral() -> Self {
        Self {
            premium: 0.0,
            discount: 0.0,
            equilibrium: 0.0,
            zone: Zone::Equilibrium,
        }
    }
}

/// Aggregated structure snapshot for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmcResult {
    pub order_blocks: Vec<OrderBlock>,
    pub fair_value_gaps: Vec<FairValueGap>,
    pub structure_points: Vec<StructurePoint>,
    pub sweeps: Vec<LiquiditySweep>,
    pub trend: Trend,
    pub current_ob: Option<OrderBlock>,
    pub nearest_fvg: Option<FairValueGap>,
    pub last_bos: Option<StructurePoint>,
    pub last_choch: Option<StructurePoint>,
    pub bias: String,
    /// 0.0 - 1.0.
    pub confidence: f64,
    pub zones: ZoneLevels,
}

impl SmcResult {
    /// Explicitly empty/neutral result for series under `MIN_BARS`.
    pub fn neutral() -> Self {
        Self {
            order_blocks: Vec::new(),
            fair_value_gaps: Vec::new(),
            structure_points: Vec::new(),
            sweeps: Vec::new(),
            trend: Trend::Neutral,
            current_ob: None,
            nearest_fvg: None,
            last_bos: None,
            last_choch: None,
            bias: "Insufficient data".to_string(),
            confidence: 0.0,
            zones: ZoneLevels::neutral(),
        }
    }
}

/// Full structure analysis pipeline.
pub fn analyze(bars: &[Bar]) -> SmcResult {
    if bars.len() < MIN_BARS {
        return SmcResult::neutral();
    }

    let n = bars.len();
    let price = bars[n - 1].close;
    let atr = atr(bars, ATR_PERIOD);

    let order_blocks = find_order_blocks(bars, atr);
    let fair_value_gaps = find_fair_value_gaps(bars, atr);
    let structure_points = find_structure_points(bars, atr);
    let sweeps = find_liquidity_sweeps(bars, atr);

    let trend = vote_trend(bars, &structure_points);
    let zones = zone_levels(bars);

    let current_ob = order_blocks
        .iter()
        .filter(|ob| !ob.is_mitigated)
        .min_by(|a, b| {
            let da = (a.mid - price).abs();
            let db = (b.mid - price).abs();
            da.total_cmp(&db)
        })
        .cloned();

    let nearest_fvg = fair_value_gaps
        .iter()
        .filter(|f| !f.is_filled)
        .min_by(|a, b| {
            let da = (a.mid - price).abs();
            let db = (b.mid - price).abs();
            da.total_cmp(&db)
        })
        .cloned();

    let last_of = |kind: StructureKind| {
        structure_points
            .iter()
            .filter(|s| s.kind == kind)
            .max_by_key(|s| s.index)
            .cloned()
    };
    let last_bos = last_of(StructureKind::Bos);
    let last_choch = last_of(StructureKind::Choch);

    let mut confidence = 0.3;
    if let Some(ob) = &current_ob {
        confidence += 0.2 * ob.strength;
    }
    if last_choch.is_some() {
        confidence += 0.15;
    }
    if last_bos.is_some() {
        confidence += 0.10;
    }
    if nearest_fvg.is_some() {
        confidence += 0.10;
    }
    if !sweeps.is_empty() {
        confidence += 0.10;
    }
    let confidence = confidence.min(1.0);

    let bias = describe_bias(trend, &current_ob, &nearest_fvg);

    SmcResult {
        order_blocks,
        fair_value_gaps,
        structure_points,
        sweeps,
        trend,
        current_ob,
        nearest_fvg,
        last_bos,
        last_choch,
        bias,
        confidence,
        zones,
    }
}

/// Weighted structure vote: confirmed BOS x2, CHoCH x1, EMA position x1;
/// ties broken by the 20-bar price change sign.
fn vote_trend(bars: &[Bar], structure_points: &[StructurePoint]) -> Trend {
    let n = bars.len();
    let price = bars[n - 1].close;
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema20 = ema_last(&closes, TREND_EMA_PERIOD);

    let count = |kind: StructureKind, direction: Bias, confirmed_only: bool| {
        structure_points
            .iter()
            .filter(|s| {
                s.kind == kind && s.direction == direction && (!confirmed_only || s.is_confirmed)
            })
            .count() as i64
    };

    let mut bull = 2 * count(StructureKind::Bos, Bias::Bullish, true)
        + count(StructureKind::Choch, Bias::Bullish, false);
    let mut bear = 2 * count(StructureKind::Bos, Bias::Bearish, true)
        + count(StructureKind::Choch, Bias::Bearish, false);
    if let Some(ema) = ema20 {
        if price > ema {
            bull += 1;
        } else if price < ema {
            bear += 1;
        }
    }

    match bull.cmp(&bear) {
        std::cmp::Ordering::Greater => Trend::Bullish,
        std::cmp::Ordering::Less => Trend::Bearish,
        std::cmp::Ordering::Equal => {
            let change = price - bars[n - 20].close;
            if change > 0.0 {
                Trend::Bullish
            } else if change < 0.0 {
                Trend::Bearish
            } else {
                Trend::Neutral
            }
        }
    }
}

/// 61.8/50/38.2 retracement levels of the trailing 50-bar range.
fn zone_levels(bars: &[Bar]) -> ZoneLevels {
    let start = bars.len().saturating_sub(RANGE_WINDOW);
    let window = &bars[start..];
    let high = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let low = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let range = high - low;
    let price = bars[bars.len() - 1].close;

    let premium = low + 0.618 * range;
    let discount = low + 0.382 * range;
    let equilibrium = low + 0.5 * range;

    let zone = if range <= 0.0 {
        Zone::Equilibrium
    } else if price > premium {
        Zone::Premium
    } else if price < discount {
        Zone::Discount
    } else {
        Zone::Equilibrium
    };

    ZoneLevels {
        premium,
        discount,
        equilibrium,
        zone,
    }
}

fn describe_bias(
    trend: Trend,
    current_ob: &Option<OrderBlock>,
    nearest_fvg: &Option<FairValueGap>,
) -> String {
    let mut bias = match trend {
        Trend::Bullish => "Bullish bias".to_string(),
        Trend::Bearish => "Bearish bias".to_string(),
        Trend::Neutral => "Neutral bias".to_string(),
    };
    if let Some(ob) = current_ob {
        bias.push_str(&format!(" | OB @ {:.5}-{:.5}", ob.bottom, ob.top));
    }
    if let Some(fvg) = nearest_fvg {
        bias.push_str(&format!(" | FVG @ {:.5}-{:.5}", fvg.bottom, fvg.top));
    }
    bias
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::testing::bars_from_ohlc;

    #[test]
    fn short_series_is_neutral() {
        let bars = bars_from_ohlc(&[(100.0, 101.0, 99.0, 100.5); 10]);
        let result = analyze(&bars);
        assert_eq!(result, SmcResult::neutral());
    }

    #[test]
    fn strictly_rising_series_is_bullish_with_no_bearish_structure() {
        let rows: Vec<(f64, f64, f64, f64)> = (0..60)
            .map(|i| {
                let c = 100.0 + 0.5 * i as f64;
                (c - 0.4, c + 0.1, c - 0.5, c)
            })
            .collect();
        let result = analyze(&bars_from_ohlc(&rows));
        assert_eq!(result.trend, Trend::Bullish);
        assert!(result
            .structure_points
            .iter()
            .all(|s| s.direction == Bias::Bullish));
        assert!(result.sweeps.is_empty());
    }

    #[test]
    fn zones_split_the_range() {
        // Range 100..120, last close near the top → premium.
        let mut rows = vec![(100.0, 101.0, 100.0, 100.5); 30];
        rows.push((100.0, 120.0, 100.0, 119.0));
        let result = analyze(&bars_from_ohlc(&rows));
        assert_eq!(result.zones.zone, Zone::Premium);
        assert!(result.zones.premium > result.zones.equilibrium);
        assert!(result.zones.equilibrium > result.zones.discount);
    }

    #[test]
    fn confidence_is_bounded() {
        let rows: Vec<(f64, f64, f64, f64)> = (0..80)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.7).sin() * 5.0;
                (c - 0.3, c + 0.6, c - 0.6, c + 0.2)
            })
            .collect();
        let result = analyze(&bars_from_ohlc(&rows));
        assert!(result.confidence >= 0.3);
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn analysis_is_deterministic() {
        let rows: Vec<(f64, f64, f64, f64)> = (0..70)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.45).sin() * 4.0 + 0.05 * i as f64;
                (c - 0.2, c + 0.5, c - 0.5, c + 0.1)
            })
            .collect();
        let bars = bars_from_ohlc(&rows);
        assert_eq!(analyze(&bars), analyze(&bars));
    }
}
