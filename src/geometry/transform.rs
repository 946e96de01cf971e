use crate::foundation::core::{Affine, Point};

/// 4x4 affine + perspective transform, row-major, acting on column vectors `(x, y, z, 1)`.
///
/// Builder methods (`translate`, `scale`, `rotate`, `apply_perspective_depth`) post-concatenate:
/// the newest operation is applied to points first, so
/// `Transform::IDENTITY.translate(c).rotate(10.0).translate(-c)` rotates about `c`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Transform {
    m: [[f64; 4]; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Build from rows.
    pub const fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    /// Embed a 2D affine transform.
    pub fn from_affine(a: Affine) -> Self {
        let [a0, b0, c0, d0, e0, f0] = a.as_coeffs();
        Self::from_rows([
            [a0, c0, 0.0, e0],
            [b0, d0, 0.0, f0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A pure translation.
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::IDENTITY.translate(dx, dy)
    }

    /// Matrix element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    /// `self * other`: `other` is applied to points first.
    pub fn concat(&self, other: &Transform) -> Transform {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..4).map(|k| self.m[r][k] * other.m[k][c]).sum();
            }
        }
        Transform { m: out }
    }

    /// Post-concatenate a translation.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.m[0][3] = dx;
        t.m[1][3] = dy;
        self.concat(&t)
    }

    /// Post-concatenate a scale.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.m[0][0] = sx;
        t.m[1][1] = sy;
        self.concat(&t)
    }

    /// Post-concatenate a rotation about the z axis, in degrees (positive is clockwise on a
    /// y-down target).
    pub fn rotate(self, degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut t = Self::IDENTITY;
        t.m[0][0] = c;
        t.m[0][1] = -s;
        t.m[1][0] = s;
        t.m[1][1] = c;
        self.concat(&t)
    }

    /// Post-concatenate a rotation about the y axis, in degrees.
    pub fn rotate_about_y(self, degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut t = Self::IDENTITY;
        t.m[0][0] = c;
        t.m[0][2] = s;
        t.m[2][0] = -s;
        t.m[2][2] = c;
        self.concat(&t)
    }

    /// Post-concatenate a perspective projection with the eye at distance `depth`.
    pub fn apply_perspective_depth(self, depth: f64) -> Self {
        if depth == 0.0 {
            return self;
        }
        let mut t = Self::IDENTITY;
        t.m[3][2] = -1.0 / depth;
        self.concat(&t)
    }

    /// Whether every element is finite.
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Whether this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Whether the z=0 plane is mapped with a non-trivial `w`.
    pub fn has_perspective(&self) -> bool {
        self.m[3][0] != 0.0 || self.m[3][1] != 0.0 || self.m[3][3] != 1.0
    }

    /// Whether the transform only translates in x/y.
    pub fn is_translation(&self) -> bool {
        !self.has_perspective()
            && self.m[0][0] == 1.0
            && self.m[0][1] == 0.0
            && self.m[1][0] == 0.0
            && self.m[1][1] == 1.0
    }

    /// Whether the transform only translates, by whole pixels.
    pub fn is_integer_translation(&self) -> bool {
        self.is_translation() && self.m[0][3].fract() == 0.0 && self.m[1][3].fract() == 0.0
    }

    /// Whether axis-aligned rects on the z=0 plane stay axis-aligned.
    pub fn preserves_2d_axis_alignment(&self) -> bool {
        if self.has_perspective() {
            return false;
        }
        let (a, b, c, d) = (self.m[0][0], self.m[0][1], self.m[1][0], self.m[1][1]);
        (b == 0.0 && c == 0.0) || (a == 0.0 && d == 0.0)
    }

    /// The 2D affine part, if the transform has no perspective.
    pub fn to_affine(&self) -> Option<Affine> {
        if self.has_perspective() {
            return None;
        }
        Some(Affine::new([
            self.m[0][0],
            self.m[1][0],
            self.m[0][1],
            self.m[1][1],
            self.m[0][3],
            self.m[1][3],
        ]))
    }

    /// Map a point on the z=0 plane. `None` when it lands at or behind the eye.
    pub fn map_point(&self, p: Point) -> Option<Point> {
        self.homography().project(p)
    }

    pub(crate) fn homography(&self) -> Homography {
        let pick = [0usize, 1, 3];
        let mut h = [[0.0; 3]; 3];
        for (r, &mr) in pick.iter().enumerate() {
            for (c, &mc) in pick.iter().enumerate() {
                h[r][c] = self.m[mr][mc];
            }
        }
        Homography(h)
    }
}

/// Smallest `w` treated as in front of the eye.
pub(crate) const W_EPSILON: f64 = 1e-6;

/// 3x3 projective map of the z=0 plane (rows/cols x, y, w of a [`Transform`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Homography(pub(crate) [[f64; 3]; 3]);

impl Homography {
    pub(crate) fn map_h(&self, x: f64, y: f64) -> [f64; 3] {
        let h = &self.0;
        [
            h[0][0] * x + h[0][1] * y + h[0][2],
            h[1][0] * x + h[1][1] * y + h[1][2],
            h[2][0] * x + h[2][1] * y + h[2][2],
        ]
    }

    pub(crate) fn project(&self, p: Point) -> Option<Point> {
        let [x, y, w] = self.map_h(p.x, p.y);
        if w <= W_EPSILON {
            return None;
        }
        Some(Point::new(x / w, y / w))
    }

    pub(crate) fn inverse(&self) -> Option<Homography> {
        let h = &self.0;
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            h[r0][c0] * h[r1][c1] - h[r0][c1] * h[r1][c0]
        };
        let det = h[0][0] * cof(1, 2, 1, 2) - h[0][1] * cof(1, 2, 0, 2) + h[0][2] * cof(1, 2, 0, 1);
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let adj = [
            [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
            [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
            [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
        ];
        let mut out = [[0.0; 3]; 3];
        for r in 0..3 {
            for c in 0..3 {
                out[r][c] = adj[r][c] * inv_det;
            }
        }
        Some(Homography(out))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/transform.rs"]
mod tests;
