//! A single editable glyph and the pen that fills it from a font.

use kurbo::{Affine, BezPath, CubicBez, PathEl, Point, Rect, Shape};
use skrifa::outline::OutlinePen;

/// Maximum distance, in font units, between a cubic and its quadratic
/// approximation.
const CUBIC_TOLERANCE: f64 = 1.0;

/// A glyph held by a [`FontContainer`](crate::FontContainer).
///
/// Outlines contain only line and quadratic segments. Coordinates are kept
/// as `f64` and rounded when the container is saved.
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    pub name: String,
    pub codepoint: Option<u32>,
    /// Additional codepoints mapped to this glyph.
    pub alternates: Vec<u32>,
    pub outline: BezPath,
    pub width: i32,
}

impl Glyph {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Primary codepoint followed by the alternates.
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.codepoint.into_iter().chain(self.alternates.iter().copied())
    }

    pub fn has_outline(&self) -> bool {
        self.outline
            .elements()
            .iter()
            .any(|el| !matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath))
    }

    /// A glyph is worth writing out when it draws something or advances.
    pub fn is_worth_outputting(&self) -> bool {
        self.has_outline() || self.width > 0
    }

    /// Tight bounding box of the outline, `None` when there is nothing drawn.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.has_outline().then(|| self.outline.bounding_box())
    }

    /// Apply `affine` to the outline. The advance width is left alone.
    pub fn transform(&mut self, affine: Affine) {
        self.outline.apply_affine(affine);
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform(Affine::translate((dx, dy)));
    }

    /// Rewrite every on- and off-curve point.
    pub fn map_points(&mut self, mut f: impl FnMut(Point) -> Point) {
        for el in self.outline.elements_mut() {
            match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => *p = f(*p),
                PathEl::QuadTo(c, p) => {
                    *c = f(*c);
                    *p = f(*p);
                }
                PathEl::CurveTo(c0, c1, p) => {
                    *c0 = f(*c0);
                    *c1 = f(*c1);
                    *p = f(*p);
                }
                PathEl::ClosePath => {}
            }
        }
    }

    /// Drop the outline and every codepoint mapping.
    pub fn clear(&mut self) {
        self.outline = BezPath::new();
        self.codepoint = None;
        self.alternates.clear();
    }
}

/// Collects a skrifa outline into a quadratic `BezPath`.
#[derive(Default)]
pub(crate) struct QuadPen {
    path: BezPath,
    current: Point,
}

impl QuadPen {
    pub(crate) fn finish(self, reverse: bool) -> BezPath {
        if reverse { reverse_contours(&self.path) } else { self.path }
    }
}

impl OutlinePen for QuadPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.current = point(x, y);
        self.path.move_to(self.current);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current = point(x, y);
        self.path.line_to(self.current);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.current = point(x, y);
        self.path.quad_to(point(cx0, cy0), self.current);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let cubic = CubicBez::new(self.current, point(cx0, cy0), point(cx1, cy1), point(x, y));
        for (_, _, quad) in cubic.to_quads(CUBIC_TOLERANCE) {
            self.path.quad_to(quad.p1, quad.p2);
        }
        self.current = cubic.p3;
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

fn point(x: f32, y: f32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

/// Reverse the direction of every contour.
///
/// PostScript outlines wind counter-clockwise; TrueType expects clockwise.
pub(crate) fn reverse_contours(path: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut start = Point::ZERO;
    let mut segments: Vec<(Point, PathEl)> = Vec::new();
    let mut closed = false;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                push_reversed(&mut out, start, &mut segments, closed);
                start = p;
                closed = false;
            }
            PathEl::ClosePath => closed = true,
            other => {
                let from = segments.last().and_then(|(_, el)| el.end_point()).unwrap_or(start);
                segments.push((from, other));
            }
        }
    }
    push_reversed(&mut out, start, &mut segments, closed);
    out
}

fn push_reversed(
    out: &mut BezPath,
    start: Point,
    segments: &mut Vec<(Point, PathEl)>,
    closed: bool,
) {
    let Some((_, last)) = segments.last() else {
        return;
    };
    out.move_to(last.end_point().unwrap_or(start));
    for (from, el) in segments.drain(..).rev() {
        match el {
            PathEl::QuadTo(c, _) => out.quad_to(c, from),
            _ => out.line_to(from),
        }
    }
    if closed {
        out.close_path();
    }
}
