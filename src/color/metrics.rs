//! Palette statistics shared by every quantizer.
//!
//! Computes the per-color metrics of an extraction:
//! - importance: separation of a color from the rest of the palette
//! - representativeness: measured coverage of the source distribution
//! - quality score: mean pairwise distance over the final palette
//!
//! All scores are normalized by the RGB cube diagonal (255·√3) into [0, 1].

use crate::color::RgbColor;
use crate::config::ExtractionConfig;
use crate::constants::MAX_RGB_DISTANCE;
use crate::error::{ExtractionError, Result};
use crate::quantize::ExtractedColor;

/// Mean pairwise Euclidean distance over the palette, normalized to [0, 1].
///
/// A palette of fewer than two colors has no pairs and scores 0.
pub fn palette_quality(colors: &[ExtractedColor]) -> f64 {
    if colors.len() < 2 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut pairs = 0usize;
    for i in 0..colors.len() {
        for j in (i + 1)..colors.len() {
            sum += colors[i].color.distance(&colors[j].color);
            pairs += 1;
        }
    }

    (sum / pairs as f64 / MAX_RGB_DISTANCE).clamp(0.0, 1.0)
}

/// Fill in importance and representativeness for a freshly extracted palette.
///
/// Importance is the distance to the nearest other palette entry,
/// normalized; a single-color palette scores 1.0 (nothing competes with it).
///
/// Representativeness measures how much of the source distribution a color
/// covers: the fraction of samples whose nearest palette entry is this
/// color, scaled by the mean closeness of those samples. A color that
/// exactly reproduces its region scores its pixel share; an approximate
/// color scores less.
pub fn annotate(colors: &mut [ExtractedColor], samples: &[RgbColor]) {
    if colors.is_empty() {
        return;
    }

    // Importance: nearest-neighbor separation within the palette
    for i in 0..colors.len() {
        let mut nearest = f64::INFINITY;
        for j in 0..colors.len() {
            if i != j {
                nearest = nearest.min(colors[i].color.distance(&colors[j].color));
            }
        }
        colors[i].importance = if nearest.is_finite() {
            (nearest / MAX_RGB_DISTANCE).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    // Representativeness: assign every sample to its nearest palette entry
    if samples.is_empty() {
        for color in colors.iter_mut() {
            color.representativeness = 0.0;
        }
        return;
    }

    let mut assigned = vec![0usize; colors.len()];
    let mut distance_sums = vec![0.0f64; colors.len()];
    for sample in samples {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, entry) in colors.iter().enumerate() {
            let d = entry.color.distance_squared(sample);
            if d < best_dist {
                best_dist = d;
                best = i;
            }
        }
        assigned[best] += 1;
        distance_sums[best] += best_dist.sqrt();
    }

    let total = samples.len() as f64;
    for (i, color) in colors.iter_mut().enumerate() {
        if assigned[i] == 0 {
            color.representativeness = 0.0;
            continue;
        }
        let share = assigned[i] as f64 / total;
        let closeness = 1.0 - distance_sums[i] / assigned[i] as f64 / MAX_RGB_DISTANCE;
        color.representativeness = (share * closeness).clamp(0.0, 1.0);
    }
}

/// Best-effort working-set estimate for `n` collected samples plus
/// per-algorithm auxiliary bytes.
///
/// This is a deterministic arithmetic estimate, not an OS heap probe;
/// the harness treats it as such when scoring memory.
pub fn estimate_working_set(sample_count: usize, auxiliary_bytes: u64) -> u64 {
    sample_count as u64 * std::mem::size_of::<RgbColor>() as u64 + auxiliary_bytes
}

/// Fail when the estimated working set exceeds the configured limit.
pub fn check_memory_limit(estimated_bytes: u64, config: &ExtractionConfig) -> Result<()> {
    if estimated_bytes > config.memory_limit_bytes() {
        return Err(ExtractionError::MemoryLimitExceeded {
            estimated_bytes,
            limit_mb: config.memory_limit_mb,
        });
    }
    Ok(())
}
