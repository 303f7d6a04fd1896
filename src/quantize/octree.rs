//! Octree color quantization.
//!
//! Builds an 8-ary tree over the RGB bit-planes: at depth `level` a pixel
//! descends into the child selected by bit `7 - level` of each channel,
//! accumulating count and channel sums at every node on the path so the
//! tree can be averaged at any collapse point. Leaves are forced at
//! level 7. Reduction collapses the deepest interior nodes first until the
//! leaf count fits the target, preserving coarse structure before touching
//! influential shallow branches.
//!
//! Nodes live in a flat arena (`Vec<Node>` with u32 handles) rather than
//! boxed children, and exist only for the duration of one `quantize()`
//! call.

use std::time::Instant;

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::{metrics, RgbColor};
use crate::config::ExtractionConfig;
use crate::error::Result;

use super::{finish_result, Algorithm, ExtractionResult, Quantizer};

/// Null child handle in the node arena
const NULL: u32 = u32::MAX;

/// Tree depth below the root; leaves sit at this level
const MAX_DEPTH: usize = 7;

#[derive(Debug, Clone)]
struct Node {
    pixel_count: u64,
    sum: [u64; 3],
    children: [u32; 8],
    is_leaf: bool,
}

impl Node {
    fn new(is_leaf: bool) -> Self {
        Self {
            pixel_count: 0,
            sum: [0; 3],
            children: [NULL; 8],
            is_leaf,
        }
    }

    fn accumulate(&mut self, color: RgbColor) {
        self.pixel_count += 1;
        self.sum[0] += color.r as u64;
        self.sum[1] += color.g as u64;
        self.sum[2] += color.b as u64;
    }

    /// Rounded channel-wise average; zero pixel count yields black rather
    /// than dividing by zero
    fn average(&self) -> RgbColor {
        if self.pixel_count == 0 {
            return RgbColor::new(0, 0, 0);
        }
        let half = self.pixel_count / 2;
        RgbColor::new(
            ((self.sum[0] + half) / self.pixel_count) as u8,
            ((self.sum[1] + half) / self.pixel_count) as u8,
            ((self.sum[2] + half) / self.pixel_count) as u8,
        )
    }
}

/// Arena-indexed octree scoped to one quantize call.
struct Octree {
    nodes: Vec<Node>,
    /// Interior nodes per level (0..MAX_DEPTH), candidates for collapse
    interior: [Vec<u32>; MAX_DEPTH],
    leaf_count: usize,
}

impl Octree {
    fn new() -> Self {
        let mut interior: [Vec<u32>; MAX_DEPTH] = Default::default();
        interior[0].push(0);
        Self {
            nodes: vec![Node::new(false)],
            interior,
            leaf_count: 0,
        }
    }

    /// 3-bit octal branch index from bit `7 - level` of each channel
    fn branch_index(color: RgbColor, level: usize) -> usize {
        let bit = 7 - level;
        (((color.r >> bit) & 1) as usize) << 2
            | (((color.g >> bit) & 1) as usize) << 1
            | ((color.b >> bit) & 1) as usize
    }

    fn insert(&mut self, color: RgbColor) {
        let mut index = 0usize;
        self.nodes[0].accumulate(color);

        for level in 0..MAX_DEPTH {
            let branch = Self::branch_index(color, level);
            let child = self.nodes[index].children[branch];
            let child = if child == NULL {
                let new_index = self.nodes.len() as u32;
                let is_leaf = level + 1 == MAX_DEPTH;
                self.nodes.push(Node::new(is_leaf));
                self.nodes[index].children[branch] = new_index;
                if is_leaf {
                    self.leaf_count += 1;
                } else {
                    self.interior[level + 1].push(new_index);
                }
                new_index
            } else {
                child
            };
            self.nodes[child as usize].accumulate(color);
            index = child as usize;
        }
    }

    /// Collapse deepest interior nodes until the leaf count fits `target`.
    ///
    /// Popping from the deepest non-empty interior level guarantees the
    /// popped node's children are all leaves; its own accumulators were
    /// already filled during the build, so collapsing is just clearing
    /// the children and re-flagging.
    fn reduce(&mut self, target: usize) {
        while self.leaf_count > target {
            let Some(level) = (0..MAX_DEPTH).rev().find(|&l| !self.interior[l].is_empty())
            else {
                break;
            };
            let index = match self.interior[level].pop() {
                Some(i) => i as usize,
                None => break,
            };

            let mut merged = 0;
            for branch in 0..8 {
                let child = self.nodes[index].children[branch];
                if child != NULL {
                    // Orphaned arena entries must stop counting as leaves
                    self.nodes[child as usize].is_leaf = false;
                    merged += 1;
                }
            }
            self.nodes[index].children = [NULL; 8];
            self.nodes[index].is_leaf = true;
            self.leaf_count = self.leaf_count + 1 - merged;
        }
    }

    /// Non-empty leaves as `(average color, pixel count)` clusters
    fn leaves(&self) -> Vec<(RgbColor, u64)> {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf && n.pixel_count > 0)
            .map(|n| (n.average(), n.pixel_count))
            .collect()
    }

    #[cfg(test)]
    fn leaf_pixel_total(&self) -> u64 {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf)
            .map(|n| n.pixel_count)
            .sum()
    }

    fn arena_bytes(&self) -> u64 {
        (self.nodes.len() * std::mem::size_of::<Node>()) as u64
    }
}

/// Octree palette extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct OctreeQuantizer;

impl OctreeQuantizer {
    pub fn new() -> Self {
        Self
    }
}

impl Quantizer for OctreeQuantizer {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Octree
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
                Algorithm::Octree,
                started.elapsed().as_secs_f64() * 1000.0,
            ));
        }

        let mut tree = Octree::new();
        for &color in &samples {
            tree.insert(color);
        }
        debug!(
            leaves = tree.leaf_count,
            nodes = tree.nodes.len(),
            "octree built"
        );

        tree.reduce(config.target_color_count);

        let mut clusters = tree.leaves();
        clusters.sort_by(|a, b| b.1.cmp(&a.1));
        clusters.truncate(config.target_color_count);

        let auxiliary = tree.arena_bytes();
        Ok(finish_result(
            Algorithm::Octree,
            clusters,
            &samples,
            started,
            auxiliary,
        ))
    }
}
