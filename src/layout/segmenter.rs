//! Page segmentation into candidate text regions.
//!
//! Region classification needs candidate regions when no ground truth is
//! available. [`RegionSegmenter`] is the seam for any block segmentation
//! algorithm; [`GapSegmenter`] is a simple whitespace-based one.

use crate::elements::Glyph;
use crate::geometry::BoundingBox;

/// A block of text found by a segmenter.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    /// Bounding box of all member glyphs
    pub bbox: BoundingBox,
    /// Text of the block, one line per row
    pub text: String,
    /// Indices of the member glyphs in the input slice
    pub glyph_indices: Vec<usize>,
}

/// Splits the glyphs of a page into text regions.
pub trait RegionSegmenter {
    /// Segment `glyphs` into regions, top to bottom.
    fn segment(&self, glyphs: &[Glyph]) -> Vec<TextRegion>;
}

/// Whitespace-driven segmentation.
///
/// Glyphs whose vertical centres are close form rows; a row is cut into
/// lines at wide horizontal gaps (columns); lines are stacked into blocks
/// while the vertical gap stays small and they overlap horizontally.
/// All thresholds are multiples of glyph height.
///
/// # Example
///
/// ```
/// use region_oxide::elements::Glyph;
/// use region_oxide::geometry::BoundingBox;
/// use region_oxide::layout::{GapSegmenter, RegionSegmenter};
///
/// let glyphs = vec![
///     Glyph::new("H", BoundingBox::new(10.0, 700.0, 18.0, 712.0)),
///     Glyph::new("i", BoundingBox::new(18.0, 700.0, 22.0, 712.0)),
///     Glyph::new("X", BoundingBox::new(10.0, 500.0, 18.0, 512.0)),
/// ];
/// let regions = GapSegmenter::default().segment(&glyphs);
/// assert_eq!(regions.len(), 2);
/// assert_eq!(regions[0].text, "Hi");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapSegmenter {
    /// Maximum centre distance for glyphs on the same row
    pub line_tolerance: f64,
    /// Horizontal gap that separates two lines on the same row
    pub column_gap: f64,
    /// Maximum vertical gap between lines of one block
    pub block_gap: f64,
    /// Horizontal gap rendered as a space in the region text
    pub space_gap: f64,
}

impl Default for GapSegmenter {
    fn default() -> Self {
        Self {
            line_tolerance: 0.5,
            column_gap: 3.0,
            block_gap: 1.0,
            space_gap: 0.25,
        }
    }
}

#[derive(Debug)]
struct Line {
    indices: Vec<usize>,
    bbox: BoundingBox,
}

impl GapSegmenter {
    /// Create a segmenter with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum vertical gap between lines of one block.
    pub fn with_block_gap(mut self, gap: f64) -> Self {
        self.block_gap = gap;
        self
    }

    /// Set the horizontal gap separating columns.
    pub fn with_column_gap(mut self, gap: f64) -> Self {
        self.column_gap = gap;
        self
    }

    fn rows(&self, glyphs: &[Glyph]) -> Vec<Vec<usize>> {
        let mut order: Vec<usize> = (0..glyphs.len()).collect();
        order.sort_by(|&a, &b| {
            glyphs[b].bbox.center().y.total_cmp(&glyphs[a].bbox.center().y)
                .then(glyphs[a].bbox.left.total_cmp(&glyphs[b].bbox.left))
        });

        let mut rows: Vec<Vec<usize>> = Vec::new();
        for i in order {
            let g = &glyphs[i];
            let joins = rows.last().and_then(|row| row.last()).is_some_and(|&prev| {
                let p = &glyphs[prev];
                let tolerance = self.line_tolerance * p.height().max(g.height());
                (p.bbox.center().y - g.bbox.center().y).abs() <= tolerance
            });
            match rows.last_mut() {
                Some(row) if joins => row.push(i),
                _ => rows.push(vec![i]),
            }
        }
        rows
    }

    fn lines(&self, glyphs: &[Glyph]) -> Vec<Line> {
        let mut lines = Vec::new();
        for mut row in self.rows(glyphs) {
            row.sort_by(|&a, &b| glyphs[a].bbox.left.total_cmp(&glyphs[b].bbox.left));
            let height = row.iter().map(|&i| glyphs[i].height()).fold(0.0, f64::max);

            let mut current: Option<Line> = None;
            for i in row {
                let bbox = glyphs[i].bbox;
                match current.as_mut() {
                    Some(line) if bbox.left - line.bbox.right <= self.column_gap * height => {
                        line.indices.push(i);
                        line.bbox = line.bbox.union(&bbox);
                    },
                    _ => {
                        if let Some(done) = current.take() {
                            lines.push(done);
                        }
                        current = Some(Line {
                            indices: vec![i],
                            bbox,
                        });
                    },
                }
            }
            if let Some(done) = current {
                lines.push(done);
            }
        }
        lines
    }

    fn line_text(&self, glyphs: &[Glyph], line: &Line) -> String {
        let mut text = String::new();
        let mut prev: Option<&Glyph> = None;
        for &i in &line.indices {
            let g = &glyphs[i];
            if let Some(p) = prev {
                if g.bbox.left - p.bbox.right > self.space_gap * p.height().max(g.height()) {
                    text.push(' ');
                }
            }
            text.push_str(&g.value);
            prev = Some(g);
        }
        text
    }
}

impl RegionSegmenter for GapSegmenter {
    fn segment(&self, glyphs: &[Glyph]) -> Vec<TextRegion> {
        let mut blocks: Vec<Vec<Line>> = Vec::new();
        let mut bounds: Vec<BoundingBox> = Vec::new();

        for line in self.lines(glyphs) {
            let height = line.bbox.height();
            let target = (0..blocks.len()).rev().find(|&b| {
                let bbox = &bounds[b];
                let overlaps = line.bbox.left < bbox.right && line.bbox.right > bbox.left;
                let gap = bbox.bottom - line.bbox.top;
                overlaps && gap <= self.block_gap * height
            });
            match target {
                Some(b) => {
                    bounds[b] = bounds[b].union(&line.bbox);
                    blocks[b].push(line);
                },
                None => {
                    bounds.push(line.bbox);
                    blocks.push(vec![line]);
                },
            }
        }

        let regions: Vec<TextRegion> = blocks
            .iter()
            .zip(bounds)
            .map(|(lines, bbox)| TextRegion {
                bbox,
                text: lines
                    .iter()
                    .map(|l| self.line_text(glyphs, l))
                    .collect::<Vec<_>>()
                    .join("\n"),
                glyph_indices: lines.iter().flat_map(|l| l.indices.iter().copied()).collect(),
            })
            .collect();

        log::debug!("Segmented {} glyphs into {} regions", glyphs.len(), regions.len());
        regions
    }
}
