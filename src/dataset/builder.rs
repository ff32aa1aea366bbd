//! Training examples from annotated pages.

use crate::dataset::LabeledDataset;
use crate::elements::PageContent;
use crate::geometry::{BoundingBox, Point};
use crate::ml::category::Category;
use crate::ml::feature_extractor::FeatureExtractor;

/// A ground-truth region of a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedRegion {
    /// Region bounds in page space
    pub bbox: BoundingBox,
    /// Gold category
    pub category: Category,
}

impl AnnotatedRegion {
    /// Create an annotation.
    pub fn new(bbox: BoundingBox, category: Category) -> Self {
        Self { bbox, category }
    }

    /// Annotation from a polygon given in image space (origin top-left,
    /// y pointing down), as produced by most annotation tools.
    ///
    /// Returns `None` for an empty polygon.
    pub fn from_image_polygon(
        points: &[Point],
        page_height: f64,
        category: Category,
    ) -> Option<Self> {
        let flipped = points.iter().map(|p| Point::new(p.x, page_height - p.y));
        BoundingBox::enclosing(flipped).map(|bbox| Self { bbox, category })
    }
}

/// Labelled examples for every annotated region of `page`.
///
/// Uses the same selection and extraction as inference, in annotation
/// order.
pub fn examples_from_page<P>(page: &P, annotations: &[AnnotatedRegion]) -> LabeledDataset
where
    P: PageContent + ?Sized,
{
    let extractor = FeatureExtractor::new();
    let mut dataset = LabeledDataset::new();
    for annotation in annotations {
        dataset.push(extractor.extract_region(page, &annotation.bbox), annotation.category);
    }
    log::debug!("Built {} examples from one page", dataset.len());
    dataset
}
