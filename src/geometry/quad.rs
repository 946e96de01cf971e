use crate::foundation::core::{Point, Rect};
use crate::geometry::rect::RectI;
use crate::geometry::transform::{Homography, W_EPSILON};

/// Maximum distance from an integer at which a projected corner still counts as pixel-aligned.
pub(crate) const SNAP_TOLERANCE: f64 = 0.01;

/// One covered run of pixels `[x0, x1)` on row `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) y: i32,
    pub(crate) x0: i32,
    pub(crate) x1: i32,
}

/// Signed distance to one polygon edge, positive inside, in device pixels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EdgeEquation {
    nx: f64,
    ny: f64,
    c: f64,
}

impl EdgeEquation {
    pub(crate) fn distance(&self, x: f64, y: f64) -> f64 {
        self.nx * x + self.ny * y + self.c
    }
}

/// A local rect projected to device space: a convex polygon, clipped against the eye plane.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DeviceQuad {
    points: Vec<Point>,
}

impl DeviceQuad {
    /// Project `rect` through `h`. `None` if nothing of it lies in front of the eye or the result
    /// has no area.
    pub(crate) fn project(rect: Rect, h: &Homography) -> Option<Self> {
        let corners = [
            (rect.x0, rect.y0),
            (rect.x1, rect.y0),
            (rect.x1, rect.y1),
            (rect.x0, rect.y1),
        ];
        let homogeneous: Vec<[f64; 3]> = corners.iter().map(|&(x, y)| h.map_h(x, y)).collect();
        let clipped = clip_to_front(&homogeneous);
        let points: Vec<Point> = clipped
            .iter()
            .map(|&[x, y, w]| Point::new(x / w, y / w))
            .collect();
        let quad = Self { points };
        if quad.points.len() < 3 || quad.signed_area().abs() < 1e-9 {
            return None;
        }
        Some(quad)
    }

    pub(crate) fn bounds(&self) -> Rect {
        let mut r = Rect::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for p in &self.points {
            r.x0 = r.x0.min(p.x);
            r.y0 = r.y0.min(p.y);
            r.x1 = r.x1.max(p.x);
            r.y1 = r.y1.max(p.y);
        }
        r
    }

    /// Whether the polygon is an axis-aligned rect whose corners sit on whole pixels.
    pub(crate) fn is_pixel_aligned(&self) -> bool {
        if self.points.len() != 4 {
            return false;
        }
        let near_int = |v: f64| (v - v.round()).abs() <= SNAP_TOLERANCE;
        if !self.points.iter().all(|p| near_int(p.x) && near_int(p.y)) {
            return false;
        }
        let b = self.bounds();
        let on_edge_x = |v: f64| (v - b.x0).abs() <= SNAP_TOLERANCE || (v - b.x1).abs() <= SNAP_TOLERANCE;
        let on_edge_y = |v: f64| (v - b.y0).abs() <= SNAP_TOLERANCE || (v - b.y1).abs() <= SNAP_TOLERANCE;
        self.points.iter().all(|p| on_edge_x(p.x) && on_edge_y(p.y))
    }

    /// Round every vertex to the nearest whole pixel.
    pub(crate) fn snapped(&self) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x.round(), p.y.round()))
                .collect(),
        }
    }

    /// Integer pixel bounds touched by the polygon.
    pub(crate) fn pixel_bounds(&self) -> RectI {
        RectI::enclosing(self.bounds())
    }

    fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut acc = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += a.x * b.y - b.x * a.y;
        }
        acc * 0.5
    }

    /// Rows of covered pixels inside `clip`, using the pixel-center rule (left/top inclusive,
    /// right/bottom exclusive).
    pub(crate) fn spans(&self, clip: RectI) -> Vec<Span> {
        let area = self.pixel_bounds().intersect(clip);
        let mut out = Vec::with_capacity(area.height.max(0) as usize);
        if area.is_empty() {
            return out;
        }
        let n = self.points.len();
        for y in area.y..area.bottom() {
            let yc = f64::from(y) + 0.5;
            let mut xl = f64::INFINITY;
            let mut xr = f64::NEG_INFINITY;
            for i in 0..n {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                let crosses = (a.y <= yc && yc < b.y) || (b.y <= yc && yc < a.y);
                if !crosses {
                    continue;
                }
                let x = a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y);
                xl = xl.min(x);
                xr = xr.max(x);
            }
            if xr <= xl {
                continue;
            }
            let x0 = ((xl - 0.5).ceil() as i64).max(i64::from(area.x)) as i32;
            let x1 = ((xr - 0.5).ceil() as i64).min(i64::from(area.right())) as i32;
            if x0 < x1 {
                out.push(Span { y, x0, x1 });
            }
        }
        out
    }

    /// Inward-facing, unit-normalized edge equations.
    pub(crate) fn edge_equations(&self) -> Vec<EdgeEquation> {
        let sign = self.signed_area().signum();
        let n = self.points.len();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let len = (dx * dx + dy * dy).sqrt();
            if len < 1e-12 {
                continue;
            }
            let nx = -dy / len * sign;
            let ny = dx / len * sign;
            out.push(EdgeEquation {
                nx,
                ny,
                c: -(nx * a.x + ny * a.y),
            });
        }
        out
    }
}

/// Anti-aliased coverage of the pixel centered at `(x, y)`.
pub(crate) fn edge_coverage(edges: &[EdgeEquation], x: f64, y: f64) -> f32 {
    let d = edges
        .iter()
        .map(|e| e.distance(x, y))
        .fold(f64::INFINITY, f64::min);
    (d + 0.5).clamp(0.0, 1.0) as f32
}

/// Sutherland-Hodgman clip of a homogeneous polygon against `w >= W_EPSILON`.
fn clip_to_front(poly: &[[f64; 3]]) -> Vec<[f64; 3]> {
    let inside = |p: &[f64; 3]| p[2] >= W_EPSILON;
    if poly.iter().all(inside) {
        return poly.to_vec();
    }
    let mut out = Vec::with_capacity(poly.len() + 2);
    for i in 0..poly.len() {
        let cur = poly[i];
        let next = poly[(i + 1) % poly.len()];
        match (inside(&cur), inside(&next)) {
            (true, true) => out.push(next),
            (true, false) => out.push(intersect_w(cur, next)),
            (false, true) => {
                out.push(intersect_w(cur, next));
                out.push(next);
            }
            (false, false) => {}
        }
    }
    out
}

fn intersect_w(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let t = (W_EPSILON - a[2]) / (b[2] - a[2]);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        W_EPSILON,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/quad.rs"]
mod tests;
