//! # palette_quant
//!
//! A Rust crate for extracting a small, representative palette of colors
//! from a dense RGBA pixel buffer.
//!
//! Four independent reduction algorithms are provided:
//! - Octree quantization: bit-plane tree construction and deepest-first collapse
//! - Median-cut: recursive widest-channel partitioning of the color space
//! - K-means++: seeded probabilistic clustering with bounded Lloyd iteration
//! - Hybrid: fusion of the three on partitioned sub-budgets
//!
//! plus a [`ComparisonHarness`] that runs all four on identical input and
//! scores them on quality, speed and memory.
//!
//! Every quantizer is a stateless value-in/value-out function: nothing
//! persists between calls, and instances are safe to use concurrently
//! across threads. Randomness (k-means seeding) flows through explicit
//! seeds so results are reproducible.
//!
//! ## Example
//!
//! ```rust
//! use palette_quant::{extract_palette, Algorithm, ExtractionConfig, PixelBuffer};
//!
//! // 2x2 RGBA image: two red pixels, one green, one blue
//! let pixels = [
//!     255, 0, 0, 255, 255, 0, 0, 255,
//!     0, 255, 0, 255, 0, 0, 255, 255,
//! ];
//! let frame = PixelBuffer::new(&pixels, 2, 2)?;
//! let config = ExtractionConfig {
//!     target_color_count: 3,
//!     max_color_count: 8,
//!     quality_threshold: 0.0,
//!     color_distance_threshold: 10.0,
//!     memory_limit_mb: 64,
//! };
//!
//! let result = extract_palette(&frame, &config, Algorithm::Octree, 0)?;
//! assert_eq!(result.color_count, 3);
//! # Ok::<(), palette_quant::ExtractionError>(())
//! ```

pub mod buffer;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod harness;
pub mod quantize;

pub use buffer::PixelBuffer;
pub use color::RgbColor;
pub use config::ExtractionConfig;
pub use error::{ExtractionError, Result};
pub use harness::{AlgorithmScore, ComparisonHarness, ComparisonReport};
pub use quantize::{
    Algorithm, ExtractedColor, ExtractionResult, HybridQuantizer, KMeansQuantizer,
    MedianCutQuantizer, OctreeQuantizer, Quantizer,
};

/// Extract a palette with the chosen algorithm.
///
/// Convenience wrapper constructing the matching quantizer; `seed` feeds
/// the k-means pass (directly or inside hybrid) and is ignored by the
/// deterministic algorithms.
///
/// # Errors
///
/// Propagates configuration validation and memory-limit failures from the
/// underlying quantizer.
pub fn extract_palette(
    frame: &PixelBuffer<'_>,
    config: &ExtractionConfig,
    algorithm: Algorithm,
    seed: u64,
) -> Result<ExtractionResult> {
    match algorithm {
        Algorithm::Octree => OctreeQuantizer::new().quantize(frame, config),
        Algorithm::MedianCut => MedianCutQuantizer::new().quantize(frame, config),
        Algorithm::KMeans => KMeansQuantizer::new(seed).quantize(frame, config),
        Algorithm::Hybrid => HybridQuantizer::new(seed).quantize(frame, config),
    }
}
