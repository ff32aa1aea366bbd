//! Integration tests for region selection and feature extraction.
//!
//! Builds pages the way a PDF backend would hand them over and checks the
//! resulting feature vectors end to end.

use proptest::prelude::*;
use region_oxide::elements::{
    BezierCurve, Glyph, ImageContent, LineSegment, Page, PathCommand, PathContent, PathOperation,
};
use region_oxide::geometry::{BoundingBox, Point};
use region_oxide::ml::feature_extractor::NO_HEIGHT_RATIO;
use region_oxide::ml::region_filter::{elements_inside, glyphs_inside};
use region_oxide::ml::FeatureExtractor;

// ============================================================================
// Helper Functions
// ============================================================================

/// Glyphs for `text`, one per character, on a single line starting at `x`.
fn line_of(text: &str, x: f64, y: f64, size: f64) -> Vec<Glyph> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            let left = x + i as f64 * size * 0.6;
            Glyph::new(c.to_string(), BoundingBox::new(left, y, left + size * 0.6, y + size))
        })
        .collect()
}

fn whole_page() -> BoundingBox {
    BoundingBox::new(0.0, 0.0, 612.0, 792.0)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_character_class_fractions() {
    // 3 digits, 5 letters, 2 symbols
    let page = Page::new(1, 612.0, 792.0).with_glyphs(line_of("12abc3de.!", 72.0, 700.0, 10.0));
    let f = FeatureExtractor::new().extract_region(&page, &whole_page());

    assert_eq!(f.char_count(), 10.0);
    assert_eq!(f.pct_numeric(), 0.3);
    assert_eq!(f.pct_alphabetic(), 0.5);
    assert_eq!(f.pct_symbolic(), 0.2);
    assert_eq!(f.pct_bullet(), 0.0);
    assert_eq!(f.height_ratio(), 1.0);
}

#[test]
fn test_single_vertical_segment() {
    let page = Page::new(1, 612.0, 792.0).with_paths(vec![PathContent::line(100.0, 100.0, 100.0, 300.0)]);
    let f = FeatureExtractor::new().extract_region(&page, &whole_page());

    assert_eq!(f.path_count(), 1.0);
    assert_eq!(f.pct_vertical(), 1.0);
    assert_eq!(f.pct_horizontal(), 0.0);
    assert_eq!(f.pct_oblique(), 0.0);
    assert_eq!(f.pct_bezier(), 0.0);
}

#[test]
fn test_table_like_region() {
    let operations = [
        PathOperation::Rectangle(100.0, 100.0, 200.0, 100.0),
        PathOperation::MoveTo(100.0, 150.0),
        PathOperation::LineTo(300.0, 150.0),
    ];
    let mut glyphs = line_of("42", 110.0, 160.0, 8.0);
    glyphs.extend(line_of("body text far away", 72.0, 700.0, 8.0));
    let page = Page::new(1, 612.0, 792.0)
        .with_glyphs(glyphs)
        .with_paths(vec![PathContent::from_operations(&operations)]);

    let region = BoundingBox::new(90.0, 90.0, 310.0, 210.0);
    let f = FeatureExtractor::new().extract_region(&page, &region);

    assert_eq!(f.char_count(), 2.0);
    assert_eq!(f.pct_numeric(), 1.0);
    // rectangle edges H, V, H (the close adds no primitive), then one rule
    assert_eq!(f.path_count(), 4.0);
    assert_eq!(f.pct_horizontal(), 0.75);
    assert_eq!(f.pct_vertical(), 0.25);
}

#[test]
fn test_empty_region_uses_sentinels() {
    let page = Page::new(1, 612.0, 792.0).with_glyphs(line_of("Heading", 72.0, 700.0, 18.0));
    let f = FeatureExtractor::new().extract_region(&page, &BoundingBox::new(0.0, 0.0, 10.0, 10.0));

    assert_eq!(f.char_count(), 0.0);
    assert_eq!(f.height_ratio(), NO_HEIGHT_RATIO);
    assert_eq!(f.path_count(), 0.0);
    assert_eq!(f.pct_bezier(), 0.0);
    assert_eq!(f.pct_horizontal(), 0.0);
    assert_eq!(f.pct_vertical(), 0.0);
    assert_eq!(f.pct_oblique(), 0.0);
    assert_eq!(f.image_count(), 0.0);
    assert_eq!(f.avg_image_area_ratio(), 0.0);
    assert!(f.as_slice().iter().all(|v| v.is_finite()));
}

#[test]
fn test_title_is_taller_than_page_average() {
    let mut glyphs = line_of("Title", 72.0, 720.0, 20.0);
    glyphs.extend(line_of("body body body body body", 72.0, 600.0, 10.0));
    let page = Page::new(1, 612.0, 792.0).with_glyphs(glyphs);

    let f = FeatureExtractor::new().extract_region(&page, &BoundingBox::new(60.0, 710.0, 300.0, 750.0));
    assert!(f.height_ratio() > 1.0);
}

#[test]
fn test_image_region() {
    let page = Page::new(1, 612.0, 792.0).with_images(vec![
        ImageContent::new(BoundingBox::new(100.0, 100.0, 200.0, 200.0)),
        ImageContent::new(BoundingBox::new(250.0, 100.0, 300.0, 150.0)),
    ]);
    let f = FeatureExtractor::new().extract_region(&page, &BoundingBox::new(100.0, 100.0, 300.0, 200.0));

    assert_eq!(f.image_count(), 2.0);
    // (10000 + 2500) / 2 over 20000
    assert_eq!(f.avg_image_area_ratio(), 0.3125);
}

// ============================================================================
// Properties
// ============================================================================

fn glyph_strategy() -> impl Strategy<Value = Glyph> {
    (
        prop::sample::select(vec!["a", "Z", "7", "0", ".", "•", " ", "é", "%", "Ω"]),
        0.0f64..600.0,
        0.0f64..770.0,
        1.0f64..20.0,
    )
        .prop_map(|(value, x, y, size)| Glyph::new(value, BoundingBox::new(x, y, x + size * 0.5, y + size)))
}

fn region_strategy() -> impl Strategy<Value = BoundingBox> {
    (0.0f64..612.0, 0.0f64..792.0, 0.0f64..612.0, 0.0f64..792.0)
        .prop_map(|(x1, y1, x2, y2)| BoundingBox::new(x1, y1, x2, y2))
}

fn point_strategy() -> impl Strategy<Value = Point> {
    // Coarse grid so that shared coordinates, and with them horizontal and
    // vertical segments, come up often
    (0u32..60, 0u32..78).prop_map(|(x, y)| Point::new(x as f64 * 10.0, y as f64 * 10.0))
}

fn primitive_strategy() -> impl Strategy<Value = PathCommand> {
    prop_oneof![
        (point_strategy(), point_strategy())
            .prop_map(|(from, to)| PathCommand::Line(LineSegment::new(from, to))),
        (point_strategy(), point_strategy(), point_strategy(), point_strategy())
            .prop_map(|(a, b, c, d)| PathCommand::Curve(BezierCurve::new(a, b, c, d))),
    ]
}

proptest! {
    #[test]
    fn prop_primitive_fractions_partition(
        primitives in prop::collection::vec(primitive_strategy(), 1..40),
        with_close in any::<bool>(),
    ) {
        let count = primitives.len();
        let mut commands = vec![PathCommand::Move(Point::new(0.0, 0.0))];
        commands.extend(primitives);
        if with_close {
            commands.push(PathCommand::Close);
        }
        let page = Page::new(1, 612.0, 792.0).with_paths(vec![PathContent::from_commands(commands)]);
        let f = FeatureExtractor::new().extract_region(&page, &whole_page());

        prop_assert_eq!(f.path_count(), count as f64);
        let sum = f.pct_bezier() + f.pct_horizontal() + f.pct_vertical() + f.pct_oblique();
        prop_assert!((sum - 1.0).abs() <= 2e-5, "primitive fractions sum to {}", sum);
    }

    #[test]
    fn prop_character_fractions_partition(
        glyphs in prop::collection::vec(glyph_strategy(), 1..60),
    ) {
        let page = Page::new(1, 612.0, 792.0).with_glyphs(glyphs);
        let f = FeatureExtractor::new().extract_region(&page, &whole_page());

        let sum = f.pct_numeric() + f.pct_alphabetic() + f.pct_symbolic();
        prop_assert!((sum - 1.0).abs() <= 2e-5, "fractions sum to {}", sum);
        prop_assert!(f.pct_bullet() <= f.pct_symbolic() + f.pct_alphabetic() + 1e-12);
        prop_assert!(f.height_ratio() > 0.0);
    }

    #[test]
    fn prop_filter_is_idempotent(
        glyphs in prop::collection::vec(glyph_strategy(), 0..60),
        region in region_strategy(),
    ) {
        let once = glyphs_inside(&region, &glyphs);
        let twice: Vec<&Glyph> = elements_inside(&region, once.iter().copied());
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.iter().all(|g| region.contains(&g.bbox)));
    }

    #[test]
    fn prop_features_are_finite(
        glyphs in prop::collection::vec(glyph_strategy(), 0..40),
        region in region_strategy(),
    ) {
        let page = Page::new(1, 612.0, 792.0).with_glyphs(glyphs);
        let f = FeatureExtractor::new().extract_region(&page, &region);
        prop_assert!(f.as_slice().iter().all(|v| v.is_finite()));
        prop_assert!(f.pct_numeric() >= 0.0 && f.pct_numeric() <= 1.0);
    }
}
