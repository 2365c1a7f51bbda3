//! Snapshot stamping — deterministic identification of bar-series inputs.
//!
//! Two analyses disagree only if they saw different data, so every signal
//! run can be tagged with the stamp of the series it read. The id hashes
//! symbol, span and length with blake3; appending a bar changes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Hex characters kept from the full blake3 digest.
const ID_LEN: usize = 16;

/// Identity of one immutable bar-series snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStamp {
    pub symbol: String,
    pub bar_count: usize,
    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
    /// Truncated blake3 digest, lowercase hex.
    pub id: String,
}

/// Stamp a series; None when it is empty.
pub fn stamp(bars: &[Bar]) -> Option<SnapshotStamp> {
    let first = bars.first()?;
    let last = bars.last()?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(first.symbol.as_bytes());
    hasher.update(&first.timestamp.timestamp_millis().to_le_bytes());
    hasher.update(&last.timestamp.timestamp_millis().to_le_bytes());
    hasher.update(&(bars.len() as u64).to_le_bytes());
    hasher.update(&last.close.to_bits().to_le_bytes());
    let hex = hasher.finalize().to_hex();

    Some(SnapshotStamp {
        symbol: first.symbol.clone(),
        bar_count: bars.len(),
        first_timestamp: first.timestamp,
        last_timestamp: last.timestamp,
        id: hex.as_str()[..ID_LEN].to_string(),
    })
}
