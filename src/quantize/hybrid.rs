//! Hybrid palette extraction: fusion of octree, median-cut and k-means.
//!
//! The target budget is partitioned 0.4 / 0.3 / 0.3 across the three
//! algorithms, each share floored independently. The floored shares can
//! under-cover the requested total by up to two colors; that tolerance is
//! kept (sub-results are never topped up), with each share clamped to at
//! least one color so small targets still produce output.
//!
//! Fusion walks the concatenated sub-results in their original order and
//! greedily merges any candidate within the distance threshold of an
//! already-accepted entry: the first color seen in each similarity group
//! becomes the fusion anchor. Because merging moves anchors, the pass is
//! repeated until no merge occurs, which guarantees the final list keeps
//! all pairs at or above the threshold. Entries are then ranked by
//! weighted score and truncated to the target.

use std::time::Instant;

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::{metrics, RgbColor};
use crate::config::ExtractionConfig;
use crate::constants::hybrid::{
    FREQUENCY_WEIGHT, IMPORTANCE_WEIGHT, KMEANS_SHARE, MEDIAN_CUT_SHARE, OCTREE_SHARE,
    REPRESENTATIVENESS_WEIGHT,
};
use crate::error::Result;

use super::{
    Algorithm, ExtractedColor, ExtractionResult, KMeansQuantizer, MedianCutQuantizer,
    OctreeQuantizer, Quantizer,
};

/// Hybrid palette extraction.
#[derive(Debug, Clone, Copy)]
pub struct HybridQuantizer {
    seed: u64,
}

impl HybridQuantizer {
    /// Create a hybrid quantizer; the seed feeds the k-means pass
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

/// Sub-budget for one algorithm: independently floored share of the
/// target, clamped to at least one color
fn sub_budget(target: usize, share: f64) -> usize {
    ((target as f64 * share).floor() as usize).max(1)
}

fn sub_config(config: &ExtractionConfig, budget: usize) -> ExtractionConfig {
    ExtractionConfig {
        target_color_count: budget,
        ..config.clone()
    }
}

/// One greedy fusion pass in candidate order.
///
/// Returns the merged list and whether any merge happened.
fn fuse_pass(candidates: Vec<ExtractedColor>, threshold: f64) -> (Vec<ExtractedColor>, bool) {
    let mut merged: Vec<ExtractedColor> = Vec::with_capacity(candidates.len());
    let mut any = false;

    for candidate in candidates {
        match merged
            .iter_mut()
            .find(|entry| entry.color.distance(&candidate.color) < threshold)
        {
            Some(anchor) => {
                let weight = anchor.frequency + candidate.frequency;
                anchor.color = if weight > 0.0 {
                    weighted_average(anchor, &candidate, weight)
                } else {
                    midpoint(anchor.color, candidate.color)
                };
                anchor.frequency = weight;
                anchor.importance = anchor.importance.max(candidate.importance);
                anchor.representativeness =
                    anchor.representativeness.max(candidate.representativeness);
                any = true;
            }
            None => merged.push(candidate),
        }
    }

    (merged, any)
}

fn weighted_average(anchor: &ExtractedColor, candidate: &ExtractedColor, weight: f64) -> RgbColor {
    let blend = |a: u8, b: u8| -> u8 {
        let v = (a as f64 * anchor.frequency + b as f64 * candidate.frequency) / weight;
        v.round().clamp(0.0, 255.0) as u8
    };
    RgbColor::new(
        blend(anchor.color.r, candidate.color.r),
        blend(anchor.color.g, candidate.color.g),
        blend(anchor.color.b, candidate.color.b),
    )
}

fn midpoint(a: RgbColor, b: RgbColor) -> RgbColor {
    RgbColor::new(
        ((a.r as u16 + b.r as u16) / 2) as u8,
        ((a.g as u16 + b.g as u16) / 2) as u8,
        ((a.b as u16 + b.b as u16) / 2) as u8,
    )
}

/// Weighted ranking score used to order the fused palette
fn score(entry: &ExtractedColor) -> f64 {
    IMPORTANCE_WEIGHT * entry.importance
        + REPRESENTATIVENESS_WEIGHT * entry.representativeness
        + FREQUENCY_WEIGHT * entry.frequency
}

impl Quantizer for HybridQuantizer {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Hybrid
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
                Algorithm::Hybrid,
                started.elapsed().as_secs_f64() * 1000.0,
            ));
        }

        let target = config.target_color_count;
        let octree = OctreeQuantizer::new()
            .quantize(frame, &sub_config(config, sub_budget(target, OCTREE_SHARE)))?;
        let median_cut = MedianCutQuantizer::new()
            .quantize(frame, &sub_config(config, sub_budget(target, MEDIAN_CUT_SHARE)))?;
        let kmeans = KMeansQuantizer::new(self.seed)
            .quantize(frame, &sub_config(config, sub_budget(target, KMEANS_SHARE)))?;
        let sub_memory = octree.memory_usage + median_cut.memory_usage + kmeans.memory_usage;

        // Order matters: the first color of each similarity group anchors it
        let mut merged: Vec<ExtractedColor> = octree
            .colors
            .into_iter()
            .chain(median_cut.colors)
            .chain(kmeans.colors)
            .collect();
        loop {
            let (result, merged_any) = fuse_pass(merged, config.color_distance_threshold);
            merged = result;
            if !merged_any {
                break;
            }
        }
        merged.truncate(config.max_color_count);
        debug!(candidates = merged.len(), "hybrid fusion settled");

        // Accumulated frequencies from three palettes sum to roughly 3.0;
        // renormalize so frequency stays a share of processed pixels
        let total_frequency: f64 = merged.iter().map(|e| e.frequency).sum();
        if total_frequency > 0.0 {
            for entry in &mut merged {
                entry.frequency /= total_frequency;
            }
        }

        merged.sort_by(|a, b| {
            score(b)
                .partial_cmp(&score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        merged.truncate(target);

        let quality_score = metrics::palette_quality(&merged);
        let color_count = merged.len();
        Ok(ExtractionResult {
            colors: merged,
            algorithm: Algorithm::Hybrid,
            extraction_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            quality_score,
            memory_usage: sub_memory,
            color_count,
        })
    }
}
