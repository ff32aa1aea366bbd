//! Region classification with a trained model.
//!
//! Features are computed exactly as for the training data: the region
//! filter selects the content inside each region and the feature extractor
//! summarises it against the page-wide glyph height.

use crate::elements::PageContent;
use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::layout::segmenter::{RegionSegmenter, TextRegion};
use crate::ml::category::Category;
use crate::ml::feature_extractor::FeatureExtractor;
use crate::ml::model_loader::load_model;
use crate::ml::svm::MulticlassSvm;
use std::path::Path;
use std::sync::Arc;

/// Classifies page regions.
///
/// The model is shared read-only; cloning the classifier is cheap.
///
/// # Example
///
/// ```no_run
/// use region_oxide::elements::Page;
/// use region_oxide::geometry::BoundingBox;
/// use region_oxide::ml::RegionClassifier;
///
/// # fn main() -> region_oxide::Result<()> {
/// let classifier = RegionClassifier::load("model.gz".as_ref())?;
/// let page = Page::new(1, 612.0, 792.0);
/// let labels = classifier.classify(&page, &[BoundingBox::new(72.0, 600.0, 540.0, 720.0)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    model: Arc<MulticlassSvm>,
    extractor: FeatureExtractor,
}

impl RegionClassifier {
    /// Load a persisted model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file is missing, corrupt or uses
    /// unknown categories.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_model(load_model(path)?))
    }

    /// Wrap an in-memory model.
    pub fn from_model(model: MulticlassSvm) -> Self {
        Self::from_shared(Arc::new(model))
    }

    /// Wrap a model shared with other owners.
    pub fn from_shared(model: Arc<MulticlassSvm>) -> Self {
        Self {
            model,
            extractor: FeatureExtractor::new(),
        }
    }

    /// The underlying model.
    pub fn model(&self) -> &MulticlassSvm {
        &self.model
    }

    /// Classify one region of `page`.
    pub fn classify_one<P>(&self, page: &P, region: &BoundingBox) -> Category
    where
        P: PageContent + ?Sized,
    {
        let features = self.extractor.extract_region(page, region);
        self.model.decide(&features)
    }

    /// Classify every region of `page`, one category per region.
    ///
    /// Regions without any content are still classified.
    pub fn classify<P>(&self, page: &P, regions: &[BoundingBox]) -> Vec<Category>
    where
        P: PageContent + ?Sized,
    {
        regions.iter().map(|r| self.classify_one(page, r)).collect()
    }

    /// Segment the glyphs of `page` and classify each resulting region.
    pub fn classify_segmented<P, S>(&self, page: &P, segmenter: &S) -> Vec<(TextRegion, Category)>
    where
        P: PageContent + ?Sized,
        S: RegionSegmenter + ?Sized,
    {
        let regions = segmenter.segment(page.glyphs());
        log::debug!("Classifying {} segmented regions", regions.len());
        regions
            .into_iter()
            .map(|region| {
                let category = self.classify_one(page, &region.bbox);
                (region, category)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecisionMethod;
    use crate::elements::{Glyph, Page};
    use crate::ml::feature_extractor::FeatureVector;
    use crate::ml::svm::BinaryMachine;

    /// Text when the region holds glyphs near its support vector, image otherwise.
    fn glyph_detector() -> MulticlassSvm {
        // Support vector: 2 alphabetic glyphs of page height
        let mut sv = [0.0; 13];
        sv[0] = 2.0;
        sv[2] = 1.0;
        sv[5] = 1.0;
        MulticlassSvm::from_parts(
            1.0,
            DecisionMethod::Elimination,
            vec![Category::Text, Category::Image],
            vec![BinaryMachine {
                positive: Category::Text,
                negative: Category::Image,
                support_vectors: vec![FeatureVector(sv)],
                weights: vec![1.0],
                rho: 0.5,
            }],
        )
        .unwrap()
    }

    fn page() -> Page {
        Page::new(1, 612.0, 792.0).with_glyphs(vec![
            Glyph::new("a", BoundingBox::new(10.0, 10.0, 16.0, 20.0)),
            Glyph::new("b", BoundingBox::new(16.0, 10.0, 22.0, 20.0)),
        ])
    }

    #[test]
    fn test_classify_regions() {
        let classifier = RegionClassifier::from_model(glyph_detector());
        let regions = [
            BoundingBox::new(0.0, 0.0, 50.0, 50.0),
            BoundingBox::new(300.0, 300.0, 400.0, 400.0),
        ];
        let labels = classifier.classify(&page(), &regions);
        assert_eq!(labels, vec![Category::Text, Category::Image]);
    }

    #[test]
    fn test_classify_segmented() {
        let classifier = RegionClassifier::from_model(glyph_detector());
        let segmenter = crate::layout::segmenter::GapSegmenter::default();
        let results = classifier.classify_segmented(&page(), &segmenter);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.text, "ab");
        assert_eq!(results[0].1, Category::Text);
    }

    #[test]
    fn test_clones_share_model() {
        let classifier = RegionClassifier::from_model(glyph_detector());
        let copy = classifier.clone();
        assert!(std::ptr::eq(classifier.model(), copy.model()));
    }
}
