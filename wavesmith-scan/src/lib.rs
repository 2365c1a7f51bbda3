//! WaveSmith Scan — batch scanning over many symbols.
//!
//! Thin orchestration layer over `wavesmith-core`: a TOML-backed scan
//! configuration, a rayon-parallel scan loop with per-symbol error
//! tolerance, score filtering and deterministic ranking, plus JSON-lines
//! export of the surviving signals.

pub mod config;
pub mod scan;

pub use config::ScanConfig;
pub use scan::{scan_all, signals_to_json_lines, ScanOutcome, ScanRequest, SymbolError};
