//! # Geometry
//!
//! The source platform describes placement with an absolute (axis-aligned) bounding box,
//! an unrotated size, and a 2×3 row-major affine `[[a, c, tx], [b, d, ty]]` relative to the
//! parent coordinate space. The target platform wants, per shape:
//!
//! - `selrect`: the *unrotated* rectangle, positioned so its center matches the source
//! - `points`: the four rotated corners in document space (top-left, top-right,
//!   bottom-right, bottom-left)
//! - `transform` / `transform-inverse`: the rotation part only, no translation
//! - `rotation`: degrees, clockwise, in `[0, 360)`
//!
//! The source rotates counter-clockwise, so a source angle θ becomes `360 − θ`.
//! Unrotated shapes take a fast path straight from the bounding box.

use serde::{Deserialize, Serialize};

pub mod gradient;
pub mod path;

pub use gradient::{gradient_geometry, GradientGeometry, GradientKind};
pub use path::{parse_path, PathError, PathSegment};

/// Row-major 2×3 affine as delivered by the source platform.
pub type SourceTransform = [[f64; 3]; 2];

pub const IDENTITY_TRANSFORM: SourceTransform = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Angles with a smaller magnitude (degrees) take the unrotated path.
const ANGLE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = (self.x + self.width).max(other.x + other.width);
        let y2 = (self.y + self.height).max(other.y + other.height);
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }
}

/// Target-platform selection rectangle: the rect plus its edge coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<Rect> for SelRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            x1: rect.x,
            y1: rect.y,
            x2: rect.x + rect.width,
            y2: rect.y + rect.height,
        }
    }
}

/// Target-platform affine `[a c e; b d f]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation/skew part of a source transform, translation dropped.
    pub fn linear_part(m: &SourceTransform) -> Self {
        Self {
            a: m[0][0],
            b: m[1][0],
            c: m[0][1],
            d: m[1][1],
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn invert(&self) -> Option<Matrix> {
        let inv = invert3(&[
            [self.a, self.c, self.e],
            [self.b, self.d, self.f],
            [0.0, 0.0, 1.0],
        ])?;
        Some(Self {
            a: inv[0][0],
            b: inv[1][0],
            c: inv[0][1],
            d: inv[1][1],
            e: inv[0][2],
            f: inv[1][2],
        })
    }
}

/// `parent × child` for source transforms.
pub fn compose(parent: &SourceTransform, child: &SourceTransform) -> SourceTransform {
    let mut out = [[0.0; 3]; 2];
    for (row, out_row) in out.iter_mut().enumerate() {
        for col in 0..3 {
            let mut value = parent[row][0] * child[0][col] + parent[row][1] * child[1][col];
            if col == 2 {
                value += parent[row][2];
            }
            out_row[col] = value;
        }
    }
    out
}

pub fn apply_transform(m: &SourceTransform, p: Point) -> Point {
    Point::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2],
    )
}

pub fn invert_transform(m: &SourceTransform) -> Option<SourceTransform> {
    let inv = invert3(&[m[0], m[1], [0.0, 0.0, 1.0]])?;
    Some([inv[0], inv[1]])
}

/// Gauss-Jordan inversion of a 3×3 matrix. `None` when the matrix is singular.
pub fn invert3(m: &[[f64; 3]; 3]) -> Option<[[f64; 3]; 3]> {
    let mut a = *m;
    let mut inv = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for col in 0..3 {
        let pivot = (col..3).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if !a[pivot][col].is_finite() || a[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for k in 0..3 {
            a[col][k] /= p;
            inv[col][k] /= p;
        }

        for row in 0..3 {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..3 {
                a[row][k] -= factor * a[col][k];
                inv[row][k] -= factor * inv[col][k];
            }
        }
    }

    if inv.iter().flatten().all(|v| v.is_finite()) {
        Some(inv)
    } else {
        None
    }
}

/// Source rotation in degrees, counter-clockwise positive.
pub fn rotation_angle(m: &SourceTransform) -> f64 {
    (-m[1][0]).atan2(m[0][0]).to_degrees()
}

/// Converts a source angle to the target convention, normalized to `[0, 360)`.
pub fn target_rotation(angle: f64) -> f64 {
    let rotation = (360.0 - angle).rem_euclid(360.0);
    if rotation >= 360.0 - ANGLE_EPSILON || rotation < ANGLE_EPSILON {
        0.0
    } else {
        rotation
    }
}

/// Placement attributes shared by every target shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub selrect: SelRect,
    pub points: [Point; 4],
    pub rotation: f64,
    pub transform: Matrix,
    pub transform_inverse: Matrix,
}

impl ShapeGeometry {
    /// Geometry of an axis-aligned rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            selrect: rect.into(),
            points: rect.corners(),
            rotation: 0.0,
            transform: Matrix::identity(),
            transform_inverse: Matrix::identity(),
        }
    }

    /// `bbox` is the absolute axis-aligned bounding box, `size` the unrotated size, and
    /// `transform` the node's absolute transform.
    pub fn derive(bbox: &Rect, size: Point, transform: &SourceTransform) -> Self {
        let angle = rotation_angle(transform);
        if angle.abs() < ANGLE_EPSILON {
            return Self::from_rect(*bbox);
        }

        let center = bbox.center();
        let (hw, hh) = (size.x / 2.0, size.y / 2.0);
        let local = [
            Point::new(-hw, -hh),
            Point::new(hw, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
        ];
        let rotation = Matrix::linear_part(transform);
        let points = local.map(|p| {
            let r = rotation.apply(p);
            Point::new(r.x + center.x, r.y + center.y)
        });

        let selrect = Rect::new(center.x - hw, center.y - hh, size.x, size.y);
        let transform_inverse = rotation.invert().unwrap_or_else(Matrix::identity);

        Self {
            x: selrect.x,
            y: selrect.y,
            width: selrect.width,
            height: selrect.height,
            selrect: selrect.into(),
            points,
            rotation: target_rotation(angle),
            transform: rotation,
            transform_inverse,
        }
    }
}
