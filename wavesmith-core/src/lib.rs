//! WaveSmith Core — market-structure classification and signal synthesis.
//!
//! This crate contains the analytics heart of the system:
//! - Domain types (bars, trade direction, bias, trend)
//! - Adaptive swing pivot extraction
//! - Elliott Wave classification (impulse, ABC corrective, trend fallback)
//! - Smart Money Concepts structure analysis (order blocks, FVGs,
//!   BOS/CHoCH, liquidity sweeps, premium/discount zoning)
//! - Momentum and pattern filters (RSI, MACD, volume, candle shapes)
//! - Signal synthesis: direction, entry, stop, targets, sizing and a
//!   0-100 probability score with its confluence ledger
//!
//! Everything is pure and deterministic: the same bars always produce the
//! same outputs, byte for byte. No I/O, no clocks, no global state.

pub mod domain;
pub mod elliott;
pub mod indicators;
pub mod pivots;
pub mod smc;
pub mod snapshot;
pub mod synth;

pub use domain::{validate_series, Bar, Bias, Direction, SeriesError, Trend};
pub use elliott::{classify, ElliottWaveResult, PatternType};
pub use smc::{analyze, SmcResult};
pub use synth::{synthesize, SynthesisInput, TradeSignal};
