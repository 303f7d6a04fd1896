//! Median-cut color quantization.
//!
//! Starts with one bounding box around every opaque sample and repeatedly
//! splits the largest-volume box along its widest channel at the median
//! sample. Boxes are index ranges into a single sample vector that is
//! sorted in place per split, so the box set partitions the samples
//! exactly: no sample is duplicated or dropped.
//!
//! Selection skips unsplittable boxes (one sample, or zero range in every
//! channel). When only unsplittable boxes remain — a fully monochrome
//! remainder — the loop terminates below the target; that is a defined
//! stopping condition, not a stall.

use std::time::Instant;

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::{metrics, RgbColor};
use crate::config::ExtractionConfig;
use crate::error::Result;

use super::{finish_result, Algorithm, ExtractionResult, Quantizer};

/// An index range into the shared sample vector plus its channel bounds.
#[derive(Debug, Clone, Copy)]
struct ColorBox {
    lo: usize,
    hi: usize,
    min: [u8; 3],
    max: [u8; 3],
}

impl ColorBox {
    fn new(samples: &[RgbColor], lo: usize, hi: usize) -> Self {
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];
        for sample in &samples[lo..hi] {
            for ch in 0..3 {
                let v = sample.channel(ch);
                min[ch] = min[ch].min(v);
                max[ch] = max[ch].max(v);
            }
        }
        Self { lo, hi, min, max }
    }

    fn len(&self) -> usize {
        self.hi - self.lo
    }

    fn range(&self, channel: usize) -> u16 {
        self.max[channel] as u16 - self.min[channel] as u16
    }

    fn volume(&self) -> u64 {
        self.range(0) as u64 * self.range(1) as u64 * self.range(2) as u64
    }

    /// Widest channel index; ties resolve R ≥ G ≥ B
    fn widest_channel(&self) -> usize {
        let (r, g, b) = (self.range(0), self.range(1), self.range(2));
        if r >= g && r >= b {
            0
        } else if g >= b {
            1
        } else {
            2
        }
    }

    /// A box with one sample or zero range in every channel cannot split
    fn is_splittable(&self) -> bool {
        self.len() > 1 && (self.range(0) > 0 || self.range(1) > 0 || self.range(2) > 0)
    }

    /// Rounded channel-wise mean of the box's samples
    fn average(&self, samples: &[RgbColor]) -> RgbColor {
        let mut sum = [0u64; 3];
        for sample in &samples[self.lo..self.hi] {
            sum[0] += sample.r as u64;
            sum[1] += sample.g as u64;
            sum[2] += sample.b as u64;
        }
        let n = self.len() as u64;
        let half = n / 2;
        RgbColor::new(
            ((sum[0] + half) / n) as u8,
            ((sum[1] + half) / n) as u8,
            ((sum[2] + half) / n) as u8,
        )
    }
}

/// Split boxes until `target` boxes exist or no splittable box remains.
///
/// The chosen box is always the maximum-volume splittable one; volume
/// ties keep the earliest box in the list so output is deterministic.
fn cut_boxes(samples: &mut [RgbColor], target: usize) -> Vec<ColorBox> {
    let mut boxes = vec![ColorBox::new(samples, 0, samples.len())];

    while boxes.len() < target {
        let mut chosen: Option<(usize, u64)> = None;
        for (i, b) in boxes.iter().enumerate() {
            if b.is_splittable() {
                let volume = b.volume();
                if chosen.map_or(true, |(_, best)| volume > best) {
                    chosen = Some((i, volume));
                }
            }
        }
        let Some((index, _)) = chosen else { break };

        let parent = boxes[index];
        let channel = parent.widest_channel();
        samples[parent.lo..parent.hi].sort_unstable_by_key(|c| c.channel(channel));

        let median = parent.lo + parent.len() / 2;
        boxes[index] = ColorBox::new(samples, parent.lo, median);
        boxes.push(ColorBox::new(samples, median, parent.hi));
    }

    boxes
}

/// Median-cut palette extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCutQuantizer;

impl MedianCutQuantizer {
    pub fn new() -> Self {
        Self
    }
}

impl Quantizer for MedianCutQuantizer {
    fn algorithm(&self) -> Algorithm {
        Algorithm::MedianCut
    }

    fn quantize(
        &self,
        frame: &PixelBuffer<'_>,
        config: &ExtractionConfig,
    ) -> Result<ExtractionResult> {
        config.validate()?;
        let started = Instant::now();

        let mut samples = frame.opaque_colors();
        metrics::check_memory_limit(metrics::estimate_working_set(samples.len(), 0), config)?;
        if samples.is_empty() {
            return Ok(ExtractionResult::empty(
                Algorithm::MedianCut,
                started.elapsed().as_secs_f64() * 1000.0,
            ));
        }

        let boxes = cut_boxes(&mut samples, config.target_color_count);
        debug!(boxes = boxes.len(), "median cut finished");

        let clusters: Vec<(RgbColor, u64)> = boxes
            .iter()
            .map(|b| (b.average(&samples), b.len() as u64))
            .collect();

        let auxiliary = (boxes.len() * std::mem::size_of::<ColorBox>()) as u64;
        Ok(finish_result(
            Algorithm::MedianCut,
            clusters,
            &samples,
            started,
            auxiliary,
        ))
    }
}
