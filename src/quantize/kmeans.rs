//! K-means++ color clustering.
//!
//! Seeding draws the first centroid uniformly from the samples; every
//! subsequent centroid is drawn with probability proportional to its
//! squared distance from the nearest existing centroid, via a single
//! cumulative-distribution draw. When the residual distance mass reaches
//! zero (fewer distinct colors than requested clusters) seeding stops
//! early rather than duplicating centroids.
//!
//! Lloyd iteration runs at most [`constants::kmeans::MAX_ITERATIONS`]
//! rounds and stops early once every centroid moves at most the
//! convergence threshold. An empty cluster retains its previous centroid
//! unchanged; no average is ever taken over zero samples.
//!
//! All randomness flows through an explicitly seeded generator, so
//! identical input and seed produce identical output.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::{metrics, RgbColor};
use crate::config::ExtractionConfig;
use crate::constants;
use crate::error::Result;

use super::{finish_result, Algorithm, ExtractionResult, Quantizer};

/// K-means++ palette extraction.
#[derive(Debug, Clone, Copy)]
pub struct KMeansQuantizer {
    seed: u64,
    max_iterations: usize,
    convergence_threshold: f64,
    /// Keep every n-th opaque sample; 1 keeps them all. Subsampling is a
    /// statistical approximation that bounds cost on large inputs.
    sample_stride: usize,
}

impl KMeansQuantizer {
    /// Create a quantizer with the default iteration bounds
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_iterations: constants::kmeans::MAX_ITERATIONS,
            convergence_threshold: constants::kmeans::CONVERGENCE_THRESHOLD,
            sample_stride: 1,
        }
    }

    /// Override the iteration cap and convergence threshold
    pub fn with_params(seed: u64, max_iterations: usize, convergence_threshold: f64) -> Self {
        Self {
            seed,
            max_iterations,
            convergence_threshold,
            sample_stride: 1,
        }
    }

    /// Cluster on every `stride`-th opaque sample instead of all of them
    pub fn with_sample_stride(mut self, stride: usize) -> Self {
        self.sample_stride = stride.max(1);
        self
    }

    /// K-means++ seeding over `samples`, producing at most `k` centroids
    fn seed_centroids(&self, samples: &[RgbColor], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
        let mut centroids = Vec::with_capacity(k);
        let first = samples[rng.random_range(0..samples.len())];
        centroids.push(to_f64(first));

        let mut nearest_sq: Vec<f64> = samples
            .iter()
            .map(|s| distance_squared(s, &centroids[0]))
            .collect();

        while centroids.len() < k {
            let total: f64 = nearest_sq.iter().sum();
            if total <= 0.0 {
                // Every sample coincides with a centroid already
                break;
            }

            let mut draw = rng.random::<f64>() * total;
            let mut chosen = samples.len() - 1;
            for (i, &d) in nearest_sq.iter().enumerate() {
                if draw < d {
                    chosen = i;
                    break;
                }
                draw -= d;
            }

            let centroid = to_f64(samples[chosen]);
            for (d, s) in nearest_sq.iter_mut().zip(samples) {
                *d = d.min(distance_squared(s, &centroid));
            }
            centroids.push(centroid);
        }

        centroids
    }
}

fn to_f64(color: RgbColor) -> [f64; 3] {
    [color.r as f64, color.g as f64, color.b as f64]
}

fn to_color(centroid: &[f64; 3]) -> RgbColor {
    RgbColor::new(
        centroid[0].round().clamp(0.0, 255.0) as u8,
        centroid[1].round().clamp(0.0, 255.0) as u8,
        centroid[2].round().clamp(0.0, 255.0) as u8,
    )
}

fn distance_squared(sample: &RgbColor, centroid: &[f64; 3]) -> f64 {
    let dr = sample.r as f64 - centroid[0];
    let dg = sample.g as f64 - centroid[1];
    let db = sample.b as f64 - centroid[2];
    dr * dr + dg * dg + db * db
}

fn nearest_centroid(sample: &RgbColor, centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = distance_squared(sample, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

impl Quantizer for KMeansQuantizer {
    fn algorithm(&self) -> Algorithm {
        Algorithm::KMeans
    }

    fn quantize(
        &self,
        frame: &PixelBuffer<'_>,
        config: &ExtractionConfig,
    ) -> Result<ExtractionResult> {
        config.validate()?;
        let started = Instant::now();

        let samples = frame.opaque_colors();
        metrics::check_memory_limit(metrics::estimate_working_set(samples.len(), 0), config)?;
        if samples.is_empty() {
            return Ok(ExtractionResult::empty(
                Algorithm::KMeans,
                started.elapsed().as_secs_f64() * 1000.0,
            ));
        }

        let strided;
        let working: &[RgbColor] = if self.sample_stride > 1 {
            strided = samples
                .iter()
                .step_by(self.sample_stride)
                .copied()
                .collect::<Vec<_>>();
            &strided
        } else {
            &samples
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids =
            self.seed_centroids(working, config.target_color_count, &mut rng);

        let mut converged_at = None;
        for iteration in 0..self.max_iterations {
            // Assignment and accumulation in one pass
            let mut sums = vec![[0.0f64; 3]; centroids.len()];
            let mut counts = vec![0u64; centroids.len()];
            for sample in working {
                let cluster = nearest_centroid(sample, &centroids);
                sums[cluster][0] += sample.r as f64;
                sums[cluster][1] += sample.g as f64;
                sums[cluster][2] += sample.b as f64;
                counts[cluster] += 1;
            }

            let mut max_movement = 0.0f64;
            for (i, centroid) in centroids.iter_mut().enumerate() {
                if counts[i] == 0 {
                    // Empty cluster keeps its previous centroid
                    continue;
                }
                let n = counts[i] as f64;
                let updated = [sums[i][0] / n, sums[i][1] / n, sums[i][2] / n];
                let movement = ((updated[0] - centroid[0]).powi(2)
                    + (updated[1] - centroid[1]).powi(2)
                    + (updated[2] - centroid[2]).powi(2))
                .sqrt();
                max_movement = max_movement.max(movement);
                *centroid = updated;
            }

            if max_movement <= self.convergence_threshold {
                converged_at = Some(iteration);
                break;
            }
        }
        debug!(
            centroids = centroids.len(),
            converged_at = ?converged_at,
            "k-means finished"
        );

        // Final counts against the settled centroids; clusters that end
        // up empty are dropped rather than reported as synthetic colors
        let mut counts = vec![0u64; centroids.len()];
        for sample in working {
            counts[nearest_centroid(sample, &centroids)] += 1;
        }
        let scale = samples.len() as f64 / working.len() as f64;
        let clusters: Vec<(RgbColor, u64)> = centroids
            .iter()
            .zip(&counts)
            .filter(|(_, &count)| count > 0)
            .map(|(c, &count)| (to_color(c), (count as f64 * scale).round() as u64))
            .collect();

        let auxiliary = (working.len() * std::mem::size_of::<f64>()
            + centroids.len() * std::mem::size_of::<[f64; 3]>()) as u64;
        Ok(finish_result(
            Algorithm::KMeans,
            clusters,
            &samples,
            started,
            auxiliary,
        ))
    }
}
