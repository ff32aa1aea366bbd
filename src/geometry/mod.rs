//! Geometric primitives for region analysis.
//!
//! Coordinates follow the page space of the PDF library that produced the
//! content: `bottom` and `top` are y-coordinates with `bottom <= top`.

use serde::{Deserialize, Serialize};

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use region_oxide::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page space.
///
/// Invariant: `left <= right` and `bottom <= top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge x-coordinate
    pub left: f64,
    /// Bottom edge y-coordinate
    pub bottom: f64,
    /// Right edge x-coordinate
    pub right: f64,
    /// Top edge y-coordinate
    pub top: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    ///
    /// Swapped edges are reordered so the invariant always holds.
    ///
    /// # Examples
    ///
    /// ```
    /// use region_oxide::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(110.0, 20.0, 10.0, 70.0);
    /// assert_eq!(bbox.left, 10.0);
    /// assert_eq!(bbox.right, 110.0);
    /// assert_eq!(bbox.area(), 5000.0);
    /// ```
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left: left.min(right),
            bottom: bottom.min(top),
            right: left.max(right),
            top: bottom.max(top),
        }
    }

    /// Create a bounding box from an origin and dimensions.
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Smallest box containing all the given points, `None` for no points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bbox.left = bbox.left.min(p.x);
            bbox.bottom = bbox.bottom.min(p.y);
            bbox.right = bbox.right.max(p.x);
            bbox.top = bbox.top.max(p.y);
        }
        Some(bbox)
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// Check whether `other` lies fully inside this box.
    ///
    /// All four sides of `other` must be within or equal to this box's sides.
    ///
    /// # Examples
    ///
    /// ```
    /// use region_oxide::geometry::BoundingBox;
    ///
    /// let region = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
    /// assert!(region.contains(&BoundingBox::new(0.0, 0.0, 100.0, 100.0)));
    /// assert!(region.contains(&BoundingBox::new(10.0, 10.0, 20.0, 20.0)));
    /// assert!(!region.contains(&BoundingBox::new(90.0, 90.0, 110.0, 95.0)));
    /// ```
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.bottom >= self.bottom
            && other.top <= self.top
    }

    /// Check whether this box overlaps another (touching edges do not count).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.bottom < other.top
            && self.top > other.bottom
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_normalizes_edges() {
        let b = BoundingBox::new(50.0, 80.0, 10.0, 20.0);
        assert_eq!(b.left, 10.0);
        assert_eq!(b.bottom, 20.0);
        assert_eq!(b.right, 50.0);
        assert_eq!(b.top, 80.0);
    }

    #[test]
    fn test_bbox_dimensions() {
        let b = BoundingBox::from_origin(5.0, 10.0, 100.0, 50.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 50.0);
        assert_eq!(b.area(), 5000.0);
        assert_eq!(b.center(), Point::new(55.0, 35.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let region = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(region.contains(&region));
        assert!(region.contains(&BoundingBox::new(0.0, 5.0, 10.0, 10.0)));
        assert!(!region.contains(&BoundingBox::new(-0.1, 5.0, 10.0, 10.0)));
        assert!(!region.contains(&BoundingBox::new(0.0, 5.0, 10.0, 10.1)));
    }

    #[test]
    fn test_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        let c = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_enclosing() {
        assert!(BoundingBox::enclosing(Vec::new()).is_none());
        let b = BoundingBox::enclosing(vec![
            Point::new(3.0, 4.0),
            Point::new(-1.0, 8.0),
            Point::new(2.0, 0.5),
        ])
        .unwrap();
        assert_eq!(b, BoundingBox::new(-1.0, 0.5, 3.0, 8.0));
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(0.0, 0.0, 5.0, 5.0);
        let b = BoundingBox::new(3.0, -2.0, 8.0, 4.0);
        assert_eq!(a.union(&b), BoundingBox::new(0.0, -2.0, 8.0, 5.0));
    }
}
