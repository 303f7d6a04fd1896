//! Algorithm constants and scoring weights for palette extraction
//!
//! This module contains compile-time constants shared across the
//! quantization algorithms and the comparison harness.

/// Maximum Euclidean distance between two colors in the RGB cube (255·√3).
///
/// Used to normalize distance-derived scores into the [0, 1] range.
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

/// Default seed for algorithms that draw randomness (K-means++ seeding).
///
/// Every random draw in this crate goes through an explicitly seeded
/// generator so identical input and seed always produce identical output.
pub const DEFAULT_SEED: u64 = 0;

/// K-means iteration bounds
pub mod kmeans {
    /// Maximum number of Lloyd iterations per quantize call
    pub const MAX_ITERATIONS: usize = 50;

    /// Convergence threshold: iteration stops early once every centroid
    /// moves at most this far (Euclidean RGB distance) in one round
    pub const CONVERGENCE_THRESHOLD: f64 = 1.0;
}

/// Hybrid fusion sub-budgets and ranking weights
pub mod hybrid {
    /// Fraction of the target color count given to the octree pass
    pub const OCTREE_SHARE: f64 = 0.4;

    /// Fraction of the target color count given to the median-cut pass
    pub const MEDIAN_CUT_SHARE: f64 = 0.3;

    /// Fraction of the target color count given to the k-means pass
    pub const KMEANS_SHARE: f64 = 0.3;

    /// Ranking weight for color importance (separation from the palette)
    pub const IMPORTANCE_WEIGHT: f64 = 0.4;

    /// Ranking weight for representativeness (source coverage)
    pub const REPRESENTATIVENESS_WEIGHT: f64 = 0.4;

    /// Ranking weight for pixel-share frequency
    pub const FREQUENCY_WEIGHT: f64 = 0.2;
}

/// Comparison harness scoring parameters
pub mod scoring {
    /// Weight of palette quality in the overall score
    pub const QUALITY_WEIGHT: f64 = 0.6;

    /// Weight of extraction speed in the overall score
    pub const SPEED_WEIGHT: f64 = 0.3;

    /// Weight of memory footprint in the overall score
    pub const MEMORY_WEIGHT: f64 = 0.1;

    /// Extraction time at which the speed score reaches zero
    pub const SPEED_BUDGET_MS: f64 = 1000.0;

    /// Working-set size at which the memory score reaches zero (100 MB)
    pub const MEMORY_BUDGET_BYTES: f64 = 100.0 * 1024.0 * 1024.0;
}
