//! Comparison harness for the four quantization algorithms.
//!
//! Runs every algorithm on the same `(buffer, config)` pair, turns each
//! result into normalized quality/speed/memory scores and selects a
//! winner. One algorithm failing never prevents the others from
//! completing: failures are captured per entry and reported alongside
//! the successful runs.

use serde::Serialize;
use tracing::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::config::ExtractionConfig;
use crate::constants::scoring;
use crate::error::Result;
use crate::quantize::{
    Algorithm, ExtractionResult, HybridQuantizer, KMeansQuantizer, MedianCutQuantizer,
    OctreeQuantizer, Quantizer,
};

/// Scores for one algorithm run.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmScore {
    /// Algorithm being scored
    pub algorithm: Algorithm,
    /// The palette it produced, absent when the run failed
    pub result: Option<ExtractionResult>,
    /// Error message when the run failed
    pub error: Option<String>,
    /// Palette quality in [0, 1]
    pub quality_score: f64,
    /// Speed score: 1 at instantaneous, 0 at the time budget
    pub speed_score: f64,
    /// Memory score: 1 at zero footprint, 0 at the byte budget
    pub memory_score: f64,
    /// Weighted overall score
    pub overall_score: f64,
}

/// Full comparison across all four algorithms.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// One entry per algorithm, in enumeration order
    pub scores: Vec<AlgorithmScore>,
    /// Highest-scoring algorithm; ties keep the earlier entry.
    /// `None` when every run failed.
    pub winner: Option<Algorithm>,
}

/// Runs all four quantizers on identical input and ranks them.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonHarness {
    seed: u64,
}

impl ComparisonHarness {
    /// Create a harness; the seed feeds the k-means and hybrid passes
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Run every algorithm and score the results.
    ///
    /// # Errors
    ///
    /// Invalid configuration fails fast before any algorithm runs.
    /// Per-algorithm failures do not propagate: they appear as entries
    /// with an error message and zero scores.
    pub fn run(
        &self,
        frame: &PixelBuffer<'_>,
        config: &ExtractionConfig,
    ) -> Result<ComparisonReport> {
        config.validate()?;

        let quantizers: [Box<dyn Quantizer>; 4] = [
            Box::new(OctreeQuantizer::new()),
            Box::new(MedianCutQuantizer::new()),
            Box::new(KMeansQuantizer::new(self.seed)),
            Box::new(HybridQuantizer::new(self.seed)),
        ];

        let mut scores = Vec::with_capacity(quantizers.len());
        for quantizer in &quantizers {
            let algorithm = quantizer.algorithm();
            match quantizer.quantize(frame, config) {
                Ok(result) => {
                    let entry = AlgorithmScore::from_result(algorithm, result);
                    debug!(
                        algorithm = %algorithm,
                        overall = entry.overall_score,
                        "algorithm scored"
                    );
                    scores.push(entry);
                }
                Err(error) => {
                    warn!(algorithm = %algorithm, %error, "algorithm failed");
                    scores.push(AlgorithmScore::from_error(algorithm, error.to_string()));
                }
            }
        }

        let winner = select_winner(&scores);
        Ok(ComparisonReport { scores, winner })
    }
}

impl AlgorithmScore {
    fn from_result(algorithm: Algorithm, result: ExtractionResult) -> Self {
        let quality_score = result.quality_score;
        let speed_score = speed_score(result.extraction_time_ms);
        let memory_score = memory_score(result.memory_usage);
        let overall_score = scoring::QUALITY_WEIGHT * quality_score
            + scoring::SPEED_WEIGHT * speed_score
            + scoring::MEMORY_WEIGHT * memory_score;
        Self {
            algorithm,
            result: Some(result),
            error: None,
            quality_score,
            speed_score,
            memory_score,
            overall_score,
        }
    }

    fn from_error(algorithm: Algorithm, error: String) -> Self {
        Self {
            algorithm,
            result: None,
            error: Some(error),
            quality_score: 0.0,
            speed_score: 0.0,
            memory_score: 0.0,
            overall_score: 0.0,
        }
    }
}

fn speed_score(extraction_time_ms: f64) -> f64 {
    (1.0 - extraction_time_ms / scoring::SPEED_BUDGET_MS).max(0.0)
}

fn memory_score(memory_usage: u64) -> f64 {
    (1.0 - memory_usage as f64 / scoring::MEMORY_BUDGET_BYTES).max(0.0)
}

/// Highest overall score among successful runs; ties resolve in
/// enumeration order (only a strictly greater score replaces the leader)
fn select_winner(scores: &[AlgorithmScore]) -> Option<Algorithm> {
    let mut winner: Option<(Algorithm, f64)> = None;
    for entry in scores {
        if entry.result.is_none() {
            continue;
        }
        if winner.map_or(true, |(_, best)| entry.overall_score > best) {
            winner = Some((entry.algorithm, entry.overall_score));
        }
    }
    winner.map(|(algorithm, _)| algorithm)
}
