//! Page content elements consumed by region classification.
//!
//! A page is seen through the [`PageContent`] trait: its glyphs, its vector
//! paths and its placed images. Any PDF library can feed the classifier by
//! implementing that trait; [`Page`] is the owned in-memory implementation
//! used by the dataset tools and the tests.
//!
//! ## Example
//!
//! ```
//! use region_oxide::elements::{Glyph, Page, PageContent, PathContent};
//! use region_oxide::geometry::BoundingBox;
//!
//! let page = Page::new(1, 612.0, 792.0)
//!     .with_glyphs(vec![Glyph::new("H", BoundingBox::new(72.0, 700.0, 80.0, 712.0))])
//!     .with_paths(vec![PathContent::line(72.0, 690.0, 300.0, 690.0)]);
//!
//! assert_eq!(page.glyphs().len(), 1);
//! assert_eq!(page.average_glyph_height(), 12.0);
//! ```

mod glyph;
mod image;
mod path;

pub use glyph::Glyph;
pub use image::ImageContent;
pub use path::{
    BezierCurve, LineSegment, PathCommand, PathContent, PathOperation, SegmentOrientation,
};

/// Read access to the content of one page.
pub trait PageContent {
    /// All glyphs on the page.
    fn glyphs(&self) -> &[Glyph];

    /// All vector paths on the page.
    fn paths(&self) -> &[PathContent];

    /// All placed images on the page.
    fn images(&self) -> &[ImageContent];

    /// Mean glyph height over the whole page, 0 when there are no glyphs.
    fn average_glyph_height(&self) -> f64 {
        let glyphs = self.glyphs();
        if glyphs.is_empty() {
            return 0.0;
        }
        glyphs.iter().map(Glyph::height).sum::<f64>() / glyphs.len() as f64
    }
}

/// Owned page content.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
    /// Glyphs in content stream order
    pub glyphs: Vec<Glyph>,
    /// Vector paths
    pub paths: Vec<PathContent>,
    /// Placed images
    pub images: Vec<ImageContent>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: usize, width: f64, height: f64) -> Self {
        Self {
            number,
            width,
            height,
            ..Default::default()
        }
    }

    /// Set the glyphs.
    pub fn with_glyphs(mut self, glyphs: Vec<Glyph>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Set the paths.
    pub fn with_paths(mut self, paths: Vec<PathContent>) -> Self {
        self.paths = paths;
        self
    }

    /// Set the images.
    pub fn with_images(mut self, images: Vec<ImageContent>) -> Self {
        self.images = images;
        self
    }
}

impl PageContent for Page {
    fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    fn paths(&self) -> &[PathContent] {
        &self.paths
    }

    fn images(&self) -> &[ImageContent] {
        &self.images
    }
}
