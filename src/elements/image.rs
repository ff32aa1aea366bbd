//! Image content element types.
//!
//! This module provides the `ImageContent` type for representing
//! images placed on a page.

use crate::geometry::BoundingBox;

/// An image placed on a page.
///
/// Only the placement matters for region classification; pixel data is
/// never decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    /// Bounding box where the image is placed
    pub bbox: BoundingBox,
    /// Image width in pixels, if known
    pub pixel_width: Option<u32>,
    /// Image height in pixels, if known
    pub pixel_height: Option<u32>,
}

impl ImageContent {
    /// Create a new image placed at `bbox`.
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            pixel_width: None,
            pixel_height: None,
        }
    }

    /// Set the pixel dimensions.
    pub fn with_pixel_size(mut self, width: u32, height: u32) -> Self {
        self.pixel_width = Some(width);
        self.pixel_height = Some(height);
        self
    }

    /// Placement area in page units.
    pub fn area(&self) -> f64 {
        self.bbox.area()
    }

    /// Horizontal resolution in dots per inch, if the pixel width is known.
    pub fn horizontal_dpi(&self) -> Option<f64> {
        let px = self.pixel_width?;
        let width = self.bbox.width();
        (width > 0.0).then(|| px as f64 / (width / 72.0))
    }
}
