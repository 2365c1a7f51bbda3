//! Domain types: bars, direction vocabularies, series contract validation.

pub mod bar;
pub mod market;

pub use bar::{validate_series, Bar, SeriesError};
pub use market::{Bias, Direction, Trend};
