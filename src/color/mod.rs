//! Color types and palette statistics.

pub mod metrics;
pub mod rgb;

pub use rgb::RgbColor;
