//! Feature extraction for region classification.
//!
//! This module turns the content of a page region (glyphs, vector paths and
//! images) into a fixed 13-dimensional [`FeatureVector`].
//!
//! Extraction is total: empty regions and zero denominators resolve to
//! sentinel values instead of errors.

use crate::elements::{Glyph, ImageContent, PageContent, PathCommand, PathContent, SegmentOrientation};
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::ml::region_filter::{glyphs_inside, images_inside, paths_inside};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Number of features per region.
pub const FEATURE_COUNT: usize = 13;

/// Feature names in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "char_count",
    "pct_numeric",
    "pct_alphabetic",
    "pct_symbolic",
    "pct_bullet",
    "height_ratio",
    "path_count",
    "pct_bezier",
    "pct_horizontal",
    "pct_vertical",
    "pct_oblique",
    "image_count",
    "avg_image_area_ratio",
];

/// Value of the height ratio when it cannot be computed.
pub const NO_HEIGHT_RATIO: f64 = -1.0;

/// Glyphs counted as list bullets.
const BULLETS: [char; 22] = [
    '•', 'o', '▪', '❖', '➢', '►', '✓', '➔', '⇨', '➪', '➨', '➫', '➬', '➭', '➮', '➯', '➱', '➲',
    '\u{2023}', '\u{2043}', '\u{204C}', '\u{204D}',
];

/// Decimal places kept for ratio features.
const RATIO_DECIMALS: i32 = 5;

fn round_ratio(value: f64) -> f64 {
    let scale = 10f64.powi(RATIO_DECIMALS);
    (value * scale).round() / scale
}

fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_ratio(count as f64 / total as f64)
    }
}

/// Fixed-order numeric summary of a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Features as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of characters in the region.
    pub fn char_count(&self) -> f64 {
        self.0[0]
    }

    /// Fraction of numeric characters.
    pub fn pct_numeric(&self) -> f64 {
        self.0[1]
    }

    /// Fraction of alphabetic characters.
    pub fn pct_alphabetic(&self) -> f64 {
        self.0[2]
    }

    /// Fraction of characters that are neither numeric nor alphabetic.
    pub fn pct_symbolic(&self) -> f64 {
        self.0[3]
    }

    /// Fraction of bullet characters.
    pub fn pct_bullet(&self) -> f64 {
        self.0[4]
    }

    /// Region mean glyph height over page mean glyph height, or
    /// [`NO_HEIGHT_RATIO`].
    pub fn height_ratio(&self) -> f64 {
        self.0[5]
    }

    /// Number of line and curve primitives.
    pub fn path_count(&self) -> f64 {
        self.0[6]
    }

    /// Fraction of primitives that are curves.
    pub fn pct_bezier(&self) -> f64 {
        self.0[7]
    }

    /// Fraction of primitives that are horizontal lines.
    pub fn pct_horizontal(&self) -> f64 {
        self.0[8]
    }

    /// Fraction of primitives that are vertical lines.
    pub fn pct_vertical(&self) -> f64 {
        self.0[9]
    }

    /// Fraction of primitives that are oblique lines.
    pub fn pct_oblique(&self) -> f64 {
        self.0[10]
    }

    /// Number of images in the region.
    pub fn image_count(&self) -> f64 {
        self.0[11]
    }

    /// Mean of image area over region area.
    pub fn avg_image_area_ratio(&self) -> f64 {
        self.0[12]
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = Error;

    fn try_from(values: &[f64]) -> Result<Self> {
        let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| Error::MalformedRow {
            line: 0,
            expected: FEATURE_COUNT,
            found: values.len(),
        })?;
        Ok(Self(array))
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Stack feature vectors into an (n × 13) matrix.
pub fn to_matrix(vectors: &[FeatureVector]) -> Array2<f64> {
    let mut matrix = Array2::zeros((vectors.len(), FEATURE_COUNT));
    for (i, v) in vectors.iter().enumerate() {
        for (j, value) in v.0.iter().enumerate() {
            matrix[[i, j]] = *value;
        }
    }
    matrix
}

/// Extracts region features.
///
/// # Example
///
/// ```
/// use region_oxide::elements::{Glyph, Page};
/// use region_oxide::geometry::BoundingBox;
/// use region_oxide::ml::FeatureExtractor;
///
/// let page = Page::new(1, 612.0, 792.0).with_glyphs(vec![
///     Glyph::new("1", BoundingBox::new(10.0, 10.0, 15.0, 20.0)),
///     Glyph::new("a", BoundingBox::new(15.0, 10.0, 20.0, 20.0)),
/// ]);
/// let features = FeatureExtractor::new().extract_region(&page, &BoundingBox::new(0.0, 0.0, 50.0, 50.0));
/// assert_eq!(features.char_count(), 2.0);
/// assert_eq!(features.pct_numeric(), 0.5);
/// assert_eq!(features.height_ratio(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features for a region of `page`.
    ///
    /// Selects the glyphs, paths and images fully inside `region` and
    /// summarises them against the page-wide glyph height.
    pub fn extract_region<P>(&self, page: &P, region: &BoundingBox) -> FeatureVector
    where
        P: PageContent + ?Sized,
    {
        let glyphs = glyphs_inside(region, page.glyphs());
        let paths = paths_inside(region, page.paths());
        let images = images_inside(region, page.images());
        self.extract(page.average_glyph_height(), region, &glyphs, &paths, &images)
    }

    /// Extract features from already selected region content.
    ///
    /// # Arguments
    ///
    /// * `page_avg_glyph_height` - Mean glyph height over the whole page
    /// * `region` - Region bounding box
    /// * `glyphs` - Glyphs inside the region
    /// * `paths` - Paths inside the region
    /// * `images` - Images inside the region
    pub fn extract(
        &self,
        page_avg_glyph_height: f64,
        region: &BoundingBox,
        glyphs: &[&Glyph],
        paths: &[&PathContent],
        images: &[&ImageContent],
    ) -> FeatureVector {
        let mut f = [0.0; FEATURE_COUNT];

        let chars = CharStats::collect(glyphs);
        f[0] = chars.total as f64;
        f[1] = fraction(chars.numeric, chars.total);
        f[2] = fraction(chars.alphabetic, chars.total);
        f[3] = fraction(chars.symbolic, chars.total);
        f[4] = fraction(chars.bullet, chars.total);
        f[5] = height_ratio(page_avg_glyph_height, glyphs);

        let prims = PrimitiveStats::collect(paths);
        f[6] = prims.total as f64;
        f[7] = fraction(prims.curves, prims.total);
        f[8] = fraction(prims.horizontal, prims.total);
        f[9] = fraction(prims.vertical, prims.total);
        f[10] = fraction(prims.oblique, prims.total);

        f[11] = images.len() as f64;
        f[12] = image_area_ratio(region, images);

        FeatureVector(f)
    }
}

#[derive(Debug, Default)]
struct CharStats {
    total: usize,
    numeric: usize,
    alphabetic: usize,
    symbolic: usize,
    bullet: usize,
}

impl CharStats {
    fn collect(glyphs: &[&Glyph]) -> Self {
        let mut stats = Self::default();
        for c in glyphs.iter().flat_map(|g| g.chars()) {
            stats.total += 1;
            // Numeric wins over alphabetic so the three classes partition
            if c.is_numeric() {
                stats.numeric += 1;
            } else if c.is_alphabetic() {
                stats.alphabetic += 1;
            } else {
                stats.symbolic += 1;
            }
            if BULLETS.contains(&c) {
                stats.bullet += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Default)]
struct PrimitiveStats {
    total: usize,
    curves: usize,
    horizontal: usize,
    vertical: usize,
    oblique: usize,
}

impl PrimitiveStats {
    fn collect(paths: &[&PathContent]) -> Self {
        let mut stats = Self::default();
        for command in paths.iter().flat_map(|p| p.commands.iter()) {
            match command {
                PathCommand::Curve(_) => {
                    stats.total += 1;
                    stats.curves += 1;
                },
                PathCommand::Line(line) => {
                    stats.total += 1;
                    match line.orientation() {
                        SegmentOrientation::Vertical => stats.vertical += 1,
                        SegmentOrientation::Horizontal => stats.horizontal += 1,
                        SegmentOrientation::Oblique => stats.oblique += 1,
                    }
                },
                PathCommand::Move(_) | PathCommand::Close => {},
            }
        }
        stats
    }
}

fn height_ratio(page_avg_glyph_height: f64, glyphs: &[&Glyph]) -> f64 {
    if glyphs.is_empty() || page_avg_glyph_height == 0.0 {
        return NO_HEIGHT_RATIO;
    }
    let region_avg = glyphs.iter().map(|g| g.height()).sum::<f64>() / glyphs.len() as f64;
    round_ratio(region_avg / page_avg_glyph_height)
}

fn image_area_ratio(region: &BoundingBox, images: &[&ImageContent]) -> f64 {
    let region_area = region.area();
    if images.is_empty() || region_area == 0.0 {
        return 0.0;
    }
    let avg_area = images.iter().map(|i| i.area()).sum::<f64>() / images.len() as f64;
    round_ratio(avg_area / region_area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{BezierCurve, LineSegment};
    use crate::geometry::Point;

    fn glyph(value: &str, x: f64, height: f64) -> Glyph {
        Glyph::new(value, BoundingBox::new(x, 0.0, x + 5.0, height))
    }

    fn region() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_empty_region_sentinels() {
        let f = FeatureExtractor::new().extract(10.0, &region(), &[], &[], &[]);
        assert_eq!(f.char_count(), 0.0);
        assert_eq!(f.height_ratio(), NO_HEIGHT_RATIO);
        assert_eq!(f.path_count(), 0.0);
        assert_eq!(f.pct_bezier(), 0.0);
        assert_eq!(f.pct_horizontal(), 0.0);
        assert_eq!(f.pct_vertical(), 0.0);
        assert_eq!(f.pct_oblique(), 0.0);
        assert_eq!(f.image_count(), 0.0);
        assert_eq!(f.avg_image_area_ratio(), 0.0);
    }

    #[test]
    fn test_matrix_feeds_linfa_dataset() {
        use linfa::prelude::*;

        let vectors = vec![FeatureVector([1.0; FEATURE_COUNT]), FeatureVector([0.0; FEATURE_COUNT])];
        let matrix = to_matrix(&vectors);
        assert_eq!(matrix.dim(), (2, FEATURE_COUNT));
        assert_eq!(matrix[[0, 12]], 1.0);

        let dataset = Dataset::new(matrix, ndarray::Array1::from(vec![true, false]));
        assert_eq!(dataset.nsamples(), 2);
        assert_eq!(dataset.nfeatures(), FEATURE_COUNT);
    }

    #[test]
    fn test_char_classes() {
        let glyphs: Vec<Glyph> = ["1", "2", "3", "a", "b", "c", "d", "e", "%", "•"]
            .iter()
            .enumerate()
            .map(|(i, v)| glyph(v, i as f64 * 5.0, 10.0))
            .collect();
        let refs: Vec<&Glyph> = glyphs.iter().collect();
        let f = FeatureExtractor::new().extract(10.0, &region(), &refs, &[], &[]);
        assert_eq!(f.char_count(), 10.0);
        assert_eq!(f.pct_numeric(), 0.3);
        assert_eq!(f.pct_alphabetic(), 0.5);
        assert_eq!(f.pct_symbolic(), 0.2);
        assert_eq!(f.pct_bullet(), 0.1);
    }

    #[test]
    fn test_letter_o_counts_as_bullet_and_letter() {
        let glyphs = [glyph("o", 0.0, 10.0)];
        let refs: Vec<&Glyph> = glyphs.iter().collect();
        let f = FeatureExtractor::new().extract(10.0, &region(), &refs, &[], &[]);
        assert_eq!(f.pct_alphabetic(), 1.0);
        assert_eq!(f.pct_bullet(), 1.0);
    }

    #[test]
    fn test_height_ratio() {
        let glyphs = [glyph("a", 0.0, 20.0), glyph("b", 5.0, 10.0)];
        let refs: Vec<&Glyph> = glyphs.iter().collect();
        let f = FeatureExtractor::new().extract(10.0, &region(), &refs, &[], &[]);
        assert_eq!(f.height_ratio(), 1.5);

        let f = FeatureExtractor::new().extract(0.0, &region(), &refs, &[], &[]);
        assert_eq!(f.height_ratio(), NO_HEIGHT_RATIO);
    }

    #[test]
    fn test_ratios_rounded() {
        let glyphs = [glyph("1", 0.0, 10.0), glyph("a", 5.0, 10.0), glyph("b", 10.0, 10.0)];
        let refs: Vec<&Glyph> = glyphs.iter().collect();
        let f = FeatureExtractor::new().extract(10.0, &region(), &refs, &[], &[]);
        assert_eq!(f.pct_numeric(), 0.33333);
        assert_eq!(f.pct_alphabetic(), 0.66667);
    }

    #[test]
    fn test_path_primitives() {
        let mut path = PathContent::new();
        path.push(PathCommand::Move(Point::new(0.0, 0.0)));
        path.push(PathCommand::Line(LineSegment::new(Point::new(0.0, 0.0), Point::new(50.0, 0.0))));
        path.push(PathCommand::Line(LineSegment::new(Point::new(50.0, 0.0), Point::new(50.0, 50.0))));
        path.push(PathCommand::Line(LineSegment::new(Point::new(50.0, 50.0), Point::new(0.0, 10.0))));
        path.push(PathCommand::Curve(BezierCurve::new(
            Point::new(0.0, 10.0),
            Point::new(5.0, 20.0),
            Point::new(10.0, 20.0),
            Point::new(15.0, 10.0),
        )));
        path.push(PathCommand::Close);

        let f = FeatureExtractor::new().extract(10.0, &region(), &[], &[&path], &[]);
        assert_eq!(f.path_count(), 4.0);
        assert_eq!(f.pct_horizontal(), 0.25);
        assert_eq!(f.pct_vertical(), 0.25);
        assert_eq!(f.pct_oblique(), 0.25);
        assert_eq!(f.pct_bezier(), 0.25);
    }

    #[test]
    fn test_image_area_ratio() {
        let a = ImageContent::new(BoundingBox::new(0.0, 0.0, 50.0, 50.0));
        let b = ImageContent::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let f = FeatureExtractor::new().extract(10.0, &region(), &[], &[], &[&a, &b]);
        assert_eq!(f.image_count(), 2.0);
        // (2500 + 100) / 2 / 10000
        assert_eq!(f.avg_image_area_ratio(), 0.13);

        let flat = BoundingBox::new(0.0, 0.0, 100.0, 0.0);
        let f = FeatureExtractor::new().extract(10.0, &flat, &[], &[], &[&a]);
        assert_eq!(f.avg_image_area_ratio(), 0.0);
    }

    #[test]
    fn test_try_from_slice() {
        let ok = FeatureVector::try_from(&[0.0; FEATURE_COUNT][..]);
        assert!(ok.is_ok());
        let err = FeatureVector::try_from(&[0.0; 12][..]);
        assert!(matches!(
            err,
            Err(Error::MalformedRow {
                expected: 13,
                found: 12,
                ..
            })
        ));
    }

    #[test]
    fn test_to_matrix() {
        let mut values = [0.0; FEATURE_COUNT];
        values[12] = 7.0;
        let m = to_matrix(&[FeatureVector(values), FeatureVector([1.0; FEATURE_COUNT])]);
        assert_eq!(m.shape(), &[2, FEATURE_COUNT]);
        assert_eq!(m[[0, 12]], 7.0);
        assert_eq!(m[[1, 0]], 1.0);
    }
}
