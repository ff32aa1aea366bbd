//! Glyph content element type.

use crate::geometry::BoundingBox;

/// A positioned glyph: its text value and bounding box.
///
/// The value is usually one character but may be a ligature or an empty
/// string when the font has no Unicode mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Text value of the glyph
    pub value: String,
    /// Bounding box of the glyph
    pub bbox: BoundingBox,
}

impl Glyph {
    /// Create a new glyph.
    ///
    /// # Examples
    ///
    /// ```
    /// use region_oxide::elements::Glyph;
    /// use region_oxide::geometry::BoundingBox;
    ///
    /// let g = Glyph::new("A", BoundingBox::new(10.0, 10.0, 16.0, 22.0));
    /// assert_eq!(g.height(), 12.0);
    /// ```
    pub fn new(value: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            value: value.into(),
            bbox,
        }
    }

    /// Height of the glyph box.
    pub fn height(&self) -> f64 {
        self.bbox.height()
    }

    /// Characters of the glyph value.
    pub fn chars(&self) -> std::str::Chars<'_> {
        self.value.chars()
    }
}
