//! Vector path content element types.
//!
//! A path is a sequence of [`PathCommand`]s. Only straight lines and Bezier
//! curves are drawing primitives; moves and closes carry no geometry of
//! their own.

use crate::geometry::{BoundingBox, Point};

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point
    pub from: Point,
    /// End point
    pub to: Point,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Classify the segment by exact endpoint equality.
    ///
    /// Equal X coordinates make a vertical segment, equal Y coordinates a
    /// horizontal one. X is checked first, so a zero-length segment is
    /// vertical.
    ///
    /// # Examples
    ///
    /// ```
    /// use region_oxide::elements::{LineSegment, SegmentOrientation};
    /// use region_oxide::geometry::Point;
    ///
    /// let seg = LineSegment::new(Point::new(5.0, 0.0), Point::new(5.0, 40.0));
    /// assert_eq!(seg.orientation(), SegmentOrientation::Vertical);
    /// ```
    pub fn orientation(&self) -> SegmentOrientation {
        if self.from.x == self.to.x {
            SegmentOrientation::Vertical
        } else if self.from.y == self.to.y {
            SegmentOrientation::Horizontal
        } else {
            SegmentOrientation::Oblique
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.from.x, self.from.y, self.to.x, self.to.y)
    }
}

/// Orientation of a straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOrientation {
    /// Both endpoints share the same Y coordinate
    Horizontal,
    /// Both endpoints share the same X coordinate
    Vertical,
    /// Neither coordinate is shared
    Oblique,
}

/// A cubic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    /// Start point
    pub start: Point,
    /// First control point
    pub first_control: Point,
    /// Second control point
    pub second_control: Point,
    /// End point
    pub end: Point,
}

impl BezierCurve {
    /// Create a new cubic Bezier curve.
    pub fn new(start: Point, first_control: Point, second_control: Point, end: Point) -> Self {
        Self {
            start,
            first_control,
            second_control,
            end,
        }
    }

    /// Evaluate the curve at parameter `t` in \[0, 1\].
    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.first_control.x + c * self.second_control.x + d * self.end.x,
            a * self.start.y + b * self.first_control.y + c * self.second_control.y + d * self.end.y,
        )
    }

    /// Tight bounding box of the drawn curve (not of its control polygon).
    pub fn bounding_box(&self) -> BoundingBox {
        let mut points = vec![self.start, self.end];
        let xs = extrema(
            self.start.x,
            self.first_control.x,
            self.second_control.x,
            self.end.x,
        );
        let ys = extrema(
            self.start.y,
            self.first_control.y,
            self.second_control.y,
            self.end.y,
        );
        points.extend(xs.into_iter().chain(ys).map(|t| self.point_at(t)));

        // Non-empty by construction
        BoundingBox::enclosing(points).unwrap_or_else(|| {
            BoundingBox::new(self.start.x, self.start.y, self.end.x, self.end.y)
        })
    }
}

/// Parameters in (0, 1) where the derivative of a 1D cubic Bezier vanishes.
fn extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> Vec<f64> {
    let a = 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);
    let b = 6.0 * (p0 - 2.0 * p1 + p2);
    let c = 3.0 * (p1 - p0);

    let mut roots = Vec::with_capacity(2);
    if a.abs() < f64::EPSILON {
        if b.abs() >= f64::EPSILON {
            roots.push(-c / b);
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            roots.push((-b + sq) / (2.0 * a));
            roots.push((-b - sq) / (2.0 * a));
        }
    }
    roots.retain(|t| *t > 0.0 && *t < 1.0);
    roots
}

/// A single command of a decomposed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath
    Move(Point),
    /// Straight segment
    Line(LineSegment),
    /// Cubic Bezier segment
    Curve(BezierCurve),
    /// Close the current subpath
    Close,
}

impl PathCommand {
    /// Bounding box of the painted geometry, if any.
    fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            PathCommand::Line(line) => Some(line.bounding_box()),
            PathCommand::Curve(curve) => Some(curve.bounding_box()),
            PathCommand::Move(_) | PathCommand::Close => None,
        }
    }
}

/// A raw path construction operator, as emitted by a content stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOperation {
    /// Move to a point (m operator)
    MoveTo(f64, f64),
    /// Line to a point (l operator)
    LineTo(f64, f64),
    /// Bezier curve to a point (c operator)
    /// (control1_x, control1_y, control2_x, control2_y, end_x, end_y)
    CurveTo(f64, f64, f64, f64, f64, f64),
    /// Rectangle (re operator)
    /// (x, y, width, height)
    Rectangle(f64, f64, f64, f64),
    /// Close the current subpath (h operator)
    ClosePath,
}

/// Vector path content of a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathContent {
    /// Decomposed commands
    pub commands: Vec<PathCommand>,
}

impl PathContent {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path from already decomposed commands.
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Decompose a stream of path operators into commands.
    ///
    /// A rectangle becomes a move, three lines and a close. A line or curve
    /// with no current point starts a new subpath at its end point.
    pub fn from_operations(operations: &[PathOperation]) -> Self {
        let mut commands = Vec::with_capacity(operations.len());
        let mut current: Option<Point> = None;
        let mut subpath_start: Option<Point> = None;

        for op in operations {
            match *op {
                PathOperation::MoveTo(x, y) => {
                    let p = Point::new(x, y);
                    commands.push(PathCommand::Move(p));
                    current = Some(p);
                    subpath_start = Some(p);
                },
                PathOperation::LineTo(x, y) => {
                    let p = Point::new(x, y);
                    match current {
                        Some(from) => commands.push(PathCommand::Line(LineSegment::new(from, p))),
                        None => {
                            log::debug!("LineTo without current point, treating as MoveTo");
                            commands.push(PathCommand::Move(p));
                            subpath_start = Some(p);
                        },
                    }
                    current = Some(p);
                },
                PathOperation::CurveTo(x1, y1, x2, y2, x3, y3) => {
                    let end = Point::new(x3, y3);
                    match current {
                        Some(start) => commands.push(PathCommand::Curve(BezierCurve::new(
                            start,
                            Point::new(x1, y1),
                            Point::new(x2, y2),
                            end,
                        ))),
                        None => {
                            log::debug!("CurveTo without current point, treating as MoveTo");
                            commands.push(PathCommand::Move(end));
                            subpath_start = Some(end);
                        },
                    }
                    current = Some(end);
                },
                PathOperation::Rectangle(x, y, w, h) => {
                    let p0 = Point::new(x, y);
                    let p1 = Point::new(x + w, y);
                    let p2 = Point::new(x + w, y + h);
                    let p3 = Point::new(x, y + h);
                    commands.push(PathCommand::Move(p0));
                    commands.push(PathCommand::Line(LineSegment::new(p0, p1)));
                    commands.push(PathCommand::Line(LineSegment::new(p1, p2)));
                    commands.push(PathCommand::Line(LineSegment::new(p2, p3)));
                    commands.push(PathCommand::Close);
                    current = Some(p0);
                    subpath_start = Some(p0);
                },
                PathOperation::ClosePath => {
                    commands.push(PathCommand::Close);
                    current = subpath_start;
                },
            }
        }

        Self { commands }
    }

    /// Create a single straight line path from (x1, y1) to (x2, y2).
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::from_operations(&[PathOperation::MoveTo(x1, y1), PathOperation::LineTo(x2, y2)])
    }

    /// Create a rectangle path.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_operations(&[PathOperation::Rectangle(x, y, width, height)])
    }

    /// Add a command.
    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Bounding box of the painted segments.
    ///
    /// Returns `None` when the path has no line or curve segment.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.commands
            .iter()
            .filter_map(PathCommand::bounding_box)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Iterate over the drawing primitives (lines and curves) only.
    pub fn primitives(&self) -> impl Iterator<Item = &PathCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::Line(_) | PathCommand::Curve(_)))
    }
}
