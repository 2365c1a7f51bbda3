//! Probability score and confluence ledger.
//!
//! The score is a fold over an ordered rule list starting at a base of 15
//! and clamped to 0..100. Each rule inspects the assembled context and
//! yields a delta plus an optional confluence label; penalties stay
//! unlabeled. The rule order is part of the contract: labels come out in
//! this order and tests rely on it.

use crate::domain::{Bias, Direction};
use crate::elliott::{ElliottWaveResult, PatternType};
use crate::indicators::{CandlePattern, MacdSnapshot};
#[cfg(test)]
use crate::smc::StructureKind;
use crate::smc::{SmcResult, Zone};

const BASE_SCORE: f64 = 15.0;

/// RSI acceptance bands per trade side.
pub const RSI_LONG_RANGE: (f64, f64) = (38.0, 72.0);
pub const RSI_SHORT_RANGE: (f64, f64) = (28.0, 62.0);

/// Everything the rules look at, assembled once by the synthesizer.
pub struct ScoreContext<'a> {
    pub direction: Direction,
    pub elliott: &'a ElliottWaveResult,
    pub smc: &'a SmcResult,
    pub rsi: f64,
    pub macd: MacdSnapshot,
    pub volume_ok: bool,
    pub candle: Option<CandlePattern>,
    pub risk_reward: f64,
    pub ideal_entry: bool,
    pub mtf_agreement: bool,
}

/// Score with its gathered confluence labels.
pub struct ScoreOutcome {
    pub score: f64,
    pub confluences: Vec<String>,
    /// At least one structure element (CHoCH, BOS, OB, FVG, sweep) aligned.
    pub has_structural_confluence: bool,
    /// RSI in band and histogram on the trade side.
    pub momentum_pass: bool,
}

pub fn rsi_in_band(direction: Direction, rsi: f64) -> bool {
    let (lo, hi) = match direction {
        Direction::Long => RSI_LONG_RANGE,
        Direction::Short => RSI_SHORT_RANGE,
    };
    rsi >= lo && rsi <= hi
}

fn histogram_aligned(direction: Direction, macd: &MacdSnapshot) -> bool {
    match direction {
        Direction::Long => macd.histogram > 0.0,
        Direction::Short => macd.histogram < 0.0,
    }
}

pub fn candle_aligned(direction: Direction, candle: Option<CandlePattern>) -> bool {
    candle.map_or(false, |c| c.bias() == direction.bias())
}

/// Whether the trade fights the premium/discount zone.
pub fn counter_zone(direction: Direction, zone: Zone) -> bool {
    matches!(
        (direction, zone),
        (Direction::Long, Zone::Premium) | (Direction::Short, Zone::Discount)
    )
}

type Rule = fn(&ScoreContext) -> (f64, Option<String>);

/// Ordered rule list; see module docs.
const RULES: &[Rule] = &[
    rule_pattern,
    rule_wave_confidence,
    rule_choch,
    rule_bos,
    rule_order_block,
    rule_fvg,
    rule_sweep,
    rule_rsi,
    rule_histogram,
    rule_volume,
    rule_candle,
    rule_ideal_entry,
    rule_zone,
    rule_mtf,
    rule_risk_reward,
];

/// Fold the rule list over the context.
pub fn score_signal(ctx: &ScoreContext) -> ScoreOutcome {
    let mut score = BASE_SCORE;
    let mut confluences = Vec::new();
    for rule in RULES {
        let (delta, label) = rule(ctx);
        score += delta;
        if let Some(label) = label {
            confluences.push(label);
        }
    }

    let bias = ctx.direction.bias();
    let has_structural_confluence = aligned_choch(ctx).is_some()
        || aligned_bos(ctx).is_some()
        || aligned_order_block(ctx).is_some()
        || aligned_fvg(ctx)
        || aligned_sweep(ctx, bias);
    let momentum_pass =
        rsi_in_band(ctx.direction, ctx.rsi) && histogram_aligned(ctx.direction, &ctx.macd);

    ScoreOutcome {
        score: score.clamp(0.0, 100.0),
        confluences,
        has_structural_confluence,
        momentum_pass,
    }
}

fn aligned_choch(ctx: &ScoreContext) -> Option<Bias> {
    ctx.smc
        .last_choch
        .as_ref()
        .filter(|s| s.direction == ctx.direction.bias())
        .map(|s| s.direction)
}

fn aligned_bos(ctx: &ScoreContext) -> Option<Bias> {
    ctx.smc
        .last_bos
        .as_ref()
        .filter(|s| s.direction == ctx.direction.bias())
        .map(|s| s.direction)
}

fn aligned_order_block<'a>(ctx: &ScoreContext<'a>) -> Option<&'a crate::smc::OrderBlock> {
    ctx.smc
        .current_ob
        .as_ref()
        .filter(|ob| !ob.is_mitigated && ob.kind == ctx.direction.bias())
}

fn aligned_fvg(ctx: &ScoreContext) -> bool {
    ctx.smc
        .nearest_fvg
        .as_ref()
        .map_or(false, |f| !f.is_filled && f.kind == ctx.direction.bias())
}

fn aligned_sweep(ctx: &ScoreContext, bias: Bias) -> bool {
    ctx.smc.sweeps.iter().any(|s| s.direction == bias)
}

fn rule_pattern(ctx: &ScoreContext) -> (f64, Option<String>) {
    match ctx.elliott.pattern_type {
        PatternType::FiveWaveImpulse => {
            let delta = if ctx.elliott.wave3_extended { 26.0 } else { 18.0 };
            let label = if ctx.elliott.wave3_extended {
                "5-wave impulse (extended wave 3)"
            } else {
                "5-wave impulse"
            };
            (delta, Some(label.to_string()))
        }
        PatternType::ThreeWaveAbc => (8.0, Some("ABC correction complete".to_string())),
        PatternType::Unknown => (0.0, None),
    }
}

fn rule_wave_confidence(ctx: &ScoreContext) -> (f64, Option<String>) {
    let c = ctx.elliott.confidence;
    if c >= 0.75 {
        (12.0, Some(format!("High wave confidence ({:.2})", c)))
    } else if c >= 0.55 {
        (6.0, Some(format!("Good wave confidence ({:.2})", c)))
    } else if c < 0.40 {
        (-10.0, None)
    } else {
        (0.0, None)
    }
}

fn rule_choch(ctx: &ScoreContext) -> (f64, Option<String>) {
    match &ctx.smc.last_choch {
        Some(s) if s.direction == ctx.direction.bias() => {
            (18.0, Some("CHoCH in trade direction".to_string()))
        }
        Some(_) => (-15.0, None),
        None => (0.0, None),
    }
}

fn rule_bos(ctx: &ScoreContext) -> (f64, Option<String>) {
    match &ctx.smc.last_bos {
        Some(s) if s.direction == ctx.direction.bias() => {
            (12.0, Some("BOS in trade direction".to_string()))
        }
        Some(_) => (-8.0, None),
        None => (0.0, None),
    }
}

fn rule_order_block(ctx: &ScoreContext) -> (f64, Option<String>) {
    match aligned_order_block(ctx) {
        Some(ob) => {
            let delta = (6.0 + 3.0 * ob.touch_count as f64).min(15.0);
            (delta, Some("Unmitigated order block".to_string()))
        }
        None => (0.0, None),
    }
}

fn rule_fvg(ctx: &ScoreContext) -> (f64, Option<String>) {
    if aligned_fvg(ctx) {
        (6.0, Some("Open fair value gap".to_string()))
    } else {
        (0.0, None)
    }
}

fn rule_sweep(ctx: &ScoreContext) -> (f64, Option<String>) {
    if aligned_sweep(ctx, ctx.direction.bias()) {
        (14.0, Some("Liquidity sweep".to_string()))
    } else {
        (0.0, None)
    }
}

fn rule_rsi(ctx: &ScoreContext) -> (f64, Option<String>) {
    if rsi_in_band(ctx.direction, ctx.rsi) {
        (8.0, Some(format!("RSI in range ({:.1})", ctx.rsi)))
    } else {
        (-10.0, None)
    }
}

fn rule_histogram(ctx: &ScoreContext) -> (f64, Option<String>) {
    if histogram_aligned(ctx.direction, &ctx.macd) {
        (6.0, Some("MACD histogram aligned".to_string()))
    } else {
        (-6.0, None)
    }
}

fn rule_volume(ctx: &ScoreContext) -> (f64, Option<String>) {
    if ctx.volume_ok {
        (5.0, Some("Volume supportive".to_string()))
    } else {
        (0.0, None)
    }
}

fn rule_candle(ctx: &ScoreContext) -> (f64, Option<String>) {
    if candle_aligned(ctx.direction, ctx.candle) {
        (8.0, Some("Candle confirmation".to_string()))
    } else {
        (0.0, None)
    }
}

fn rule_ideal_entry(ctx: &ScoreContext) -> (f64, Option<String>) {
    if ctx.ideal_entry {
        (15.0, Some("Entry inside demand/supply zone".to_string()))
    } else {
        (0.0, None)
    }
}

fn rule_zone(ctx: &ScoreContext) -> (f64, Option<String>) {
    if counter_zone(ctx.direction, ctx.smc.zones.zone) {
        (-20.0, None)
    } else {
        (0.0, None)
    }
}

fn rule_mtf(ctx: &ScoreContext) -> (f64, Option<String>) {
    if ctx.mtf_agreement {
        (12.0, Some("Higher timeframe agreement".to_string()))
    } else {
        (0.0, None)
    }
}

fn rule_risk_reward(ctx: &ScoreContext) -> (f64, Option<String>) {
    if ctx.risk_reward >= 3.0 {
        (8.0, Some(format!("RR {:.2}", ctx.risk_reward)))
    } else if ctx.risk_reward >= 2.0 {
        (4.0, Some(format!("RR {:.2}", ctx.risk_reward)))
    } else {
        (0.0, None)
    }
}
