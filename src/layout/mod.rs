//! Layout analysis for region candidates.
//!
//! This module provides the segmentation seam used when no ground-truth
//! regions are available:
//! - [`RegionSegmenter`] trait for any block segmentation algorithm
//! - [`GapSegmenter`], a whitespace-based implementation

pub mod segmenter;

// Re-export main types
pub use segmenter::{GapSegmenter, RegionSegmenter, TextRegion};
