//! Quantization algorithms and their shared result types.
//!
//! Four independent reduction algorithms operate on the same opaque-sample
//! view of a [`PixelBuffer`]:
//! - [`OctreeQuantizer`]: 8-ary bit-plane tree, deepest-first collapse
//! - [`MedianCutQuantizer`]: recursive widest-channel box splitting
//! - [`KMeansQuantizer`]: K-means++ seeding plus bounded Lloyd iteration
//! - [`HybridQuantizer`]: fusion of the three on partitioned sub-budgets
//!
//! Every `quantize()` call is a pure, synchronous function of its inputs
//! (plus the explicit seed, where randomness is drawn). Quantizer instances
//! hold no shared mutable state and are safe to run concurrently.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::color::{metrics, RgbColor};
use crate::config::ExtractionConfig;

pub mod hybrid;
pub mod kmeans;
pub mod median_cut;
pub mod octree;

pub use hybrid::HybridQuantizer;
pub use kmeans::KMeansQuantizer;
pub use median_cut::MedianCutQuantizer;
pub use octree::OctreeQuantizer;

use crate::buffer::PixelBuffer;
use crate::error::Result;

/// Identifies one of the four quantization algorithms.
///
/// The declaration order is also the tie-break order used by the
/// comparison harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "octree")]
    Octree,
    #[serde(rename = "median-cut")]
    MedianCut,
    #[serde(rename = "improved-kmeans")]
    KMeans,
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl Algorithm {
    /// All algorithms in harness enumeration order
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Octree,
        Algorithm::MedianCut,
        Algorithm::KMeans,
        Algorithm::Hybrid,
    ];

    /// Stable string identifier, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Octree => "octree",
            Algorithm::MedianCut => "median-cut",
            Algorithm::KMeans => "improved-kmeans",
            Algorithm::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A palette entry with its extraction statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedColor {
    /// The palette color
    pub color: RgbColor,
    /// Share of processed (opaque) pixels this color accounts for
    pub frequency: f64,
    /// Separation from the nearest other palette entry, normalized to [0, 1]
    pub importance: f64,
    /// Coverage of the source distribution, normalized to [0, 1]
    pub representativeness: f64,
}

/// The outcome of a single `quantize()` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted palette, at most `target_color_count` entries
    pub colors: Vec<ExtractedColor>,
    /// Algorithm that produced this result
    pub algorithm: Algorithm,
    /// Wall-clock extraction time in milliseconds
    pub extraction_time_ms: f64,
    /// Mean pairwise palette distance, normalized to [0, 1]
    pub quality_score: f64,
    /// Best-effort working-set estimate in bytes
    pub memory_usage: u64,
    /// Number of extracted colors
    pub color_count: usize,
}

impl ExtractionResult {
    /// Empty result for inputs with zero opaque pixels
    pub(crate) fn empty(algorithm: Algorithm, extraction_time_ms: f64) -> Self {
        Self {
            colors: Vec::new(),
            algorithm,
            extraction_time_ms,
            quality_score: 0.0,
            memory_usage: 0,
            color_count: 0,
        }
    }

    /// Whether this palette meets the configured quality threshold.
    ///
    /// The threshold is uniformly informational: extraction never fails
    /// because of it, callers decide what to do with a weak palette.
    pub fn meets_quality_threshold(&self, config: &ExtractionConfig) -> bool {
        self.quality_score >= config.quality_threshold
    }
}

/// A palette extraction algorithm.
///
/// Implementations are stateless value-in/value-out functions: nothing
/// persists between calls, so instances are reentrant and may be shared
/// across threads freely.
pub trait Quantizer {
    /// Which algorithm this quantizer implements
    fn algorithm(&self) -> Algorithm;

    /// Extract a palette from the opaque pixels of `frame`.
    ///
    /// # Errors
    ///
    /// Fails fast on invalid configuration, and with
    /// [`MemoryLimitExceeded`](crate::ExtractionError::MemoryLimitExceeded)
    /// when the estimated working set exceeds `memory_limit_mb`. A fully
    /// transparent input is not an error: it yields an empty result.
    fn quantize(&self, frame: &PixelBuffer<'_>, config: &ExtractionConfig)
        -> Result<ExtractionResult>;
}

/// Assemble a result from raw `(color, pixel_count)` clusters.
///
/// Fills in frequency/importance/representativeness, sorts by descending
/// frequency and computes the quality score. Shared by the three
/// single-strategy algorithms; hybrid ranks by weighted score instead.
pub(crate) fn finish_result(
    algorithm: Algorithm,
    clusters: Vec<(RgbColor, u64)>,
    samples: &[RgbColor],
    started: Instant,
    auxiliary_bytes: u64,
) -> ExtractionResult {
    let total = samples.len() as f64;
    let mut colors: Vec<ExtractedColor> = clusters
        .into_iter()
        .map(|(color, count)| ExtractedColor {
            color,
            frequency: count as f64 / total,
            importance: 0.0,
            representativeness: 0.0,
        })
        .collect();

    metrics::annotate(&mut colors, samples);
    colors.sort_by(|a, b| {
        b.frequency
            .partial_cmp(&a.frequency)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let quality_score = metrics::palette_quality(&colors);
    let color_count = colors.len();
    ExtractionResult {
        colors,
        algorithm,
        extraction_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        quality_score,
        memory_usage: metrics::estimate_working_set(samples.len(), auxiliary_bytes),
        color_count,
    }
}
