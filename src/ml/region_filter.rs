//! Selection of page content lying inside a region.
//!
//! Containment is inclusive on all four edges and never partial: an element
//! that crosses the region boundary is left out. Elements without a
//! bounding box (empty paths) are never inside anything.

use crate::elements::{Glyph, ImageContent, PathContent};
use crate::geometry::BoundingBox;

/// Anything with an optional bounding box.
pub trait Bounded {
    /// Bounding box of the element, if it has one.
    fn bounds(&self) -> Option<BoundingBox>;
}

impl Bounded for Glyph {
    fn bounds(&self) -> Option<BoundingBox> {
        Some(self.bbox)
    }
}

impl Bounded for ImageContent {
    fn bounds(&self) -> Option<BoundingBox> {
        Some(self.bbox)
    }
}

impl Bounded for PathContent {
    fn bounds(&self) -> Option<BoundingBox> {
        self.bounding_box()
    }
}

impl<T: Bounded + ?Sized> Bounded for &T {
    fn bounds(&self) -> Option<BoundingBox> {
        (**self).bounds()
    }
}

/// Elements fully contained in `region`, in input order.
///
/// Works on owned slices and on previous results alike, so the filter can be
/// re-applied to its own output.
///
/// # Examples
///
/// ```
/// use region_oxide::elements::Glyph;
/// use region_oxide::geometry::BoundingBox;
/// use region_oxide::ml::region_filter::elements_inside;
///
/// let glyphs = vec![
///     Glyph::new("a", BoundingBox::new(1.0, 1.0, 2.0, 2.0)),
///     Glyph::new("b", BoundingBox::new(9.0, 9.0, 11.0, 10.0)),
/// ];
/// let region = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let inside = elements_inside(&region, &glyphs);
/// assert_eq!(inside.len(), 1);
/// assert_eq!(inside[0].value, "a");
/// ```
pub fn elements_inside<'a, T, I>(region: &BoundingBox, items: I) -> Vec<&'a T>
where
    T: Bounded + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| item.bounds().is_some_and(|b| region.contains(&b)))
        .collect()
}

/// Glyphs fully inside `region`.
pub fn glyphs_inside<'a>(region: &BoundingBox, glyphs: &'a [Glyph]) -> Vec<&'a Glyph> {
    elements_inside(region, glyphs)
}

/// Paths fully inside `region`; paths with no bounding box are excluded.
pub fn paths_inside<'a>(region: &BoundingBox, paths: &'a [PathContent]) -> Vec<&'a PathContent> {
    elements_inside(region, paths)
}

/// Images fully inside `region`.
pub fn images_inside<'a>(
    region: &BoundingBox,
    images: &'a [ImageContent],
) -> Vec<&'a ImageContent> {
    elements_inside(region, images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::PathOperation;

    fn region() -> BoundingBox {
        BoundingBox::new(10.0, 10.0, 100.0, 100.0)
    }

    #[test]
    fn test_edges_are_inclusive() {
        let glyphs = vec![
            Glyph::new("a", BoundingBox::new(10.0, 10.0, 20.0, 20.0)),
            Glyph::new("b", BoundingBox::new(90.0, 90.0, 100.0, 100.0)),
            Glyph::new("c", BoundingBox::new(95.0, 50.0, 100.5, 60.0)),
        ];
        let inside = glyphs_inside(&region(), &glyphs);
        let values: Vec<&str> = inside.iter().map(|g| g.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_intersecting_is_not_inside() {
        let images = vec![
            ImageContent::new(BoundingBox::new(50.0, 50.0, 150.0, 80.0)),
            ImageContent::new(BoundingBox::new(20.0, 20.0, 40.0, 40.0)),
        ];
        let inside = images_inside(&region(), &images);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].bbox.left, 20.0);
    }

    #[test]
    fn test_paths_without_bbox_excluded() {
        let paths = vec![
            PathContent::from_operations(&[PathOperation::MoveTo(50.0, 50.0)]),
            PathContent::line(20.0, 20.0, 80.0, 20.0),
            PathContent::line(20.0, 20.0, 180.0, 20.0),
        ];
        let inside = paths_inside(&region(), &paths);
        assert_eq!(inside.len(), 1);
    }

    #[test]
    fn test_refiltering_is_identity() {
        let glyphs = vec![
            Glyph::new("x", BoundingBox::new(15.0, 15.0, 25.0, 25.0)),
            Glyph::new("y", BoundingBox::new(0.0, 0.0, 5.0, 5.0)),
            Glyph::new("z", BoundingBox::new(30.0, 30.0, 40.0, 40.0)),
        ];
        let once = glyphs_inside(&region(), &glyphs);
        let twice: Vec<&Glyph> = elements_inside(&region(), once.iter().copied());
        assert_eq!(once, twice);
    }
}
