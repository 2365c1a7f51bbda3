//! Signal synthesis.
//!
//! Combines the wave classification, structure analysis and momentum
//! filters into at most one trade signal per series. The pipeline is a
//! chain of gates: direction agreement, risk/reward, structural
//! confluence, momentum or candle confirmation. Any gate failing yields
//! `Ok(None)`; only malformed input is an error. The signal timestamp is
//! taken from the last bar, never from the wall clock, so repeated calls
//! over the same snapshot are bit-identical.

pub mod risk;
pub mod score;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{validate_series, Bar, Bias, Direction, SeriesError};
use crate::elliott::{classify, ElliottWaveResult};
use crate::indicators::{atr, classify_last_candle, macd_snapshot, rsi, volume_ok};
use crate::smc::{analyze, SmcResult};

pub use risk::{lot_size, risk_reward, round5, stop_loss, take_profits, MIN_RISK_REWARD};
pub use score::{score_signal, ScoreContext, ScoreOutcome};

/// Minimum series length for synthesis.
pub const MIN_BARS: usize = 50;

/// Fraction of the account risked per trade.
pub const DEFAULT_RISK_FRACTION: f64 = 0.01;

const ATR_PERIOD: usize = 14;
const RSI_PERIOD: usize = 14;

/// Tolerance for the ideal-entry check, in ATR multiples.
const IDEAL_ENTRY_ATR: f64 = 0.5;

/// One synthesis request: a primary series and an optional higher
/// timeframe series for confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisInput {
    pub symbol: String,
    pub primary: Vec<Bar>,
    pub secondary: Option<Vec<Bar>>,
    pub account_balance: f64,
    pub risk_fraction: f64,
}

impl SynthesisInput {
    pub fn new(symbol: impl Into<String>, primary: Vec<Bar>, account_balance: f64) -> Self {
        Self {
            symbol: symbol.into(),
            primary,
            secondary: None,
            account_balance,
            risk_fraction: DEFAULT_RISK_FRACTION,
        }
    }
}

/// Booleans a consumer can filter on without re-deriving them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFlags {
    pub wave3_extended: bool,
    pub ideal_entry: bool,
    pub momentum_pass: bool,
    pub multi_timeframe: bool,
}

/// A fully specified trade idea. Prices carry 5 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub lot_size: f64,
    /// 0-100.
    pub probability_score: f64,
    pub confluences: Vec<String>,
    pub elliott: ElliottWaveResult,
    pub smc: SmcResult,
    pub risk_reward: f64,
    /// Timestamp of the last bar of the primary series.
    pub timestamp: DateTime<Utc>,
    pub quality_flags: QualityFlags,
}

/// Run the full synthesis pipeline over one snapshot.
pub fn synthesize(input: &SynthesisInput) -> Result<Option<TradeSignal>, SeriesError> {
    validate_series(&input.primary)?;
    if let Some(secondary) = &input.secondary {
        validate_series(secondary)?;
    }

    let bars = &input.primary;
    if bars.len() < MIN_BARS {
        return Ok(None);
    }

    let elliott = classify(bars);
    let smc = analyze(bars);

    let direction = match resolve_direction(&elliott, &smc) {
        Some(d) => d,
        None => return Ok(None),
    };
    let bias = direction.bias();

    let atr = atr(bars, ATR_PERIOD);
    let rsi = rsi(bars, RSI_PERIOD);
    let macd = macd_snapshot(bars);
    let volume_ok = volume_ok(bars);
    let candle = classify_last_candle(bars);

    let entry = bars[bars.len() - 1].close;

    let aligned_ob = smc
        .current_ob
        .as_ref()
        .filter(|ob| !ob.is_mitigated && ob.kind == bias);
    let tolerance = IDEAL_ENTRY_ATR * atr;
    let ideal_entry = aligned_ob.map_or(false, |ob| ob.contains(entry, tolerance))
        || smc
            .nearest_fvg
            .as_ref()
            .map_or(false, |f| !f.is_filled && f.kind == bias && f.contains(entry, tolerance));

    let stop = stop_loss(bars, direction, entry, atr, aligned_ob);
    let risk = (entry - stop).abs();
    let tps = take_profits(&elliott, direction, entry, risk);
    let rr = risk_reward(direction, entry, stop, tps[0]);
    if !risk::risk_reward_acceptable(rr) {
        return Ok(None);
    }

    let mtf_agreement = input
        .secondary
        .as_ref()
        .map_or(false, |secondary| higher_timeframe_agrees(secondary, bias));

    let outcome = score_signal(&ScoreContext {
        direction,
        elliott: &elliott,
        smc: &smc,
        rsi,
        macd,
        volume_ok,
        candle,
        risk_reward: rr,
        ideal_entry,
        mtf_agreement,
    });

    if !outcome.has_structural_confluence {
        return Ok(None);
    }
    if !outcome.momentum_pass && !score::candle_aligned(direction, candle) {
        return Ok(None);
    }

    let lot = lot_size(input.account_balance, input.risk_fraction, entry, stop);
    let timestamp = bars[bars.len() - 1].timestamp;

    Ok(Some(TradeSignal {
        symbol: input.symbol.clone(),
        direction,
        entry_price: round5(entry),
        stop_loss: round5(stop),
        tp1: round5(tps[0]),
        tp2: round5(tps[1]),
        tp3: round5(tps[2]),
        lot_size: lot,
        probability_score: outcome.score,
        confluences: outcome.confluences,
        quality_flags: QualityFlags {
            wave3_extended: elliott.wave3_extended,
            ideal_entry,
            momentum_pass: outcome.momentum_pass,
            multi_timeframe: mtf_agreement,
        },
        elliott,
        smc,
        risk_reward: rr,
        timestamp,
    }))
}

/// Trade direction from the two analyses.
///
/// Both trends agreeing on a side wins; otherwise a confirmed change of
/// character carries its own direction; otherwise no trade.
fn resolve_direction(elliott: &ElliottWaveResult, smc: &SmcResult) -> Option<Direction> {
    if elliott.trend == smc.trend {
        if let Some(bias) = elliott.trend.bias() {
            return Some(direction_for(bias));
        }
    }
    smc.last_choch
        .as_ref()
        .filter(|s| s.is_confirmed)
        .map(|s| direction_for(s.direction))
}

fn direction_for(bias: Bias) -> Direction {
    match bias {
        Bias::Bullish => Direction::Long,
        Bias::Bearish => Direction::Short,
    }
}

/// Both higher-timeframe reads must sit on the trade side.
fn higher_timeframe_agrees(secondary: &[Bar], bias: Bias) -> bool {
    let elliott = classify(secondary);
    let smc = analyze(secondary);
    elliott.trend.bias() == Some(bias) && smc.trend.bias() == Some(bias)
}
