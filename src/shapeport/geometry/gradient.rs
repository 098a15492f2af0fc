//! Gradient endpoint derivation.
//!
//! The source stores a gradient as three handle positions in the node's normalized
//! `[0, 1]²` space. Together they define the affine basis that maps node space onto the
//! canonical gradient square. Inverting that basis gives the gradient-square → node-space
//! map, through which the canonical reference points are pushed:
//!
//! - linear: start `(0, 0.5)`, end `(1, 0.5)`
//! - radial: center `(0.5, 0.5)`, radius end `(1, 0.5)`, second radius end `(0.5, 1)`

use super::{invert3, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
}

/// Gradient placement in the node's normalized space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GradientGeometry {
    pub start: Point,
    pub end: Point,
    /// Direction of the main axis, degrees, measured in node pixel space.
    pub angle: f64,
    /// Length of the main axis in node pixels.
    pub radius_x: f64,
    /// Length of the secondary axis in node pixels (radial only, linear mirrors `radius_x`).
    pub radius_y: f64,
}

impl GradientGeometry {
    /// Ratio of the secondary to the main axis, `1.0` when degenerate.
    pub fn width_ratio(&self) -> f64 {
        if self.radius_x > f64::EPSILON {
            self.radius_y / self.radius_x
        } else {
            1.0
        }
    }
}

/// Canonical gradient-square positions of the three handles, one per column.
fn canonical_handles(kind: GradientKind) -> [[f64; 3]; 3] {
    match kind {
        GradientKind::Linear => [[0.0, 1.0, 0.0], [0.5, 0.5, 1.0], [1.0, 1.0, 1.0]],
        GradientKind::Radial => [[0.5, 1.0, 0.5], [0.5, 0.5, 1.0], [1.0, 1.0, 1.0]],
    }
}

fn reference_points(kind: GradientKind) -> [Point; 3] {
    match kind {
        GradientKind::Linear => [
            Point::new(0.0, 0.5),
            Point::new(1.0, 0.5),
            Point::new(0.0, 1.0),
        ],
        GradientKind::Radial => [
            Point::new(0.5, 0.5),
            Point::new(1.0, 0.5),
            Point::new(0.5, 1.0),
        ],
    }
}

fn mul3(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn apply3(m: &[[f64; 3]; 3], p: Point) -> Point {
    Point::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2],
    )
}

/// Derives the gradient endpoints from the source handles. A degenerate handle basis
/// yields the zero default instead of an error.
pub fn gradient_geometry(kind: GradientKind, handles: &[Point], size: Point) -> GradientGeometry {
    let [h0, h1, h2] = match handles {
        [a, b, c, ..] => [*a, *b, *c],
        _ => return GradientGeometry::default(),
    };

    let handle_basis = [[h0.x, h1.x, h2.x], [h0.y, h1.y, h2.y], [1.0, 1.0, 1.0]];
    let Some(handle_inverse) = invert3(&handle_basis) else {
        log::warn!("degenerate gradient handles, using default placement");
        return GradientGeometry::default();
    };

    // node space → gradient square
    let basis = mul3(&canonical_handles(kind), &handle_inverse);
    let Some(inverse) = invert3(&basis) else {
        log::warn!("degenerate gradient basis, using default placement");
        return GradientGeometry::default();
    };

    let [origin, main, secondary] = reference_points(kind).map(|p| apply3(&inverse, p));

    let to_px = |p: Point| Point::new(p.x * size.x, p.y * size.y);
    let (origin_px, main_px, secondary_px) = (to_px(origin), to_px(main), to_px(secondary));
    let angle = (main_px.y - origin_px.y)
        .atan2(main_px.x - origin_px.x)
        .to_degrees();
    let radius_x = origin_px.distance(&main_px);
    let radius_y = match kind {
        GradientKind::Linear => radius_x,
        GradientKind::Radial => origin_px.distance(&secondary_px),
    };

    GradientGeometry {
        start: origin,
        end: main,
        angle,
        radius_x,
        radius_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point(p: Point, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
            "{:?} != ({}, {})",
            p,
            x,
            y
        );
    }

    #[test]
    fn linear_endpoints_follow_first_two_handles() {
        let handles = [
            Point::new(0.0, 0.5),
            Point::new(1.0, 0.5),
            Point::new(0.0, 1.0),
        ];
        let geom = gradient_geometry(GradientKind::Linear, &handles, Point::new(200.0, 100.0));
        assert_point(geom.start, 0.0, 0.5);
        assert_point(geom.end, 1.0, 0.5);
        assert!(geom.angle.abs() < 1e-9);
        assert!((geom.radius_x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_linear_gradient() {
        let handles = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(-0.5, 0.5),
        ];
        let geom = gradient_geometry(GradientKind::Linear, &handles, Point::new(100.0, 100.0));
        assert_point(geom.start, 0.0, 0.0);
        assert_point(geom.end, 1.0, 1.0);
        assert!((geom.angle - 45.0).abs() < 1e-9);
    }

    #[test]
    fn radial_center_and_radii() {
        let handles = [
            Point::new(0.5, 0.5),
            Point::new(1.0, 0.5),
            Point::new(0.5, 0.75),
        ];
        let geom = gradient_geometry(GradientKind::Radial, &handles, Point::new(100.0, 100.0));
        assert_point(geom.start, 0.5, 0.5);
        assert_point(geom.end, 1.0, 0.5);
        assert!((geom.radius_x - 50.0).abs() < 1e-9);
        assert!((geom.radius_y - 25.0).abs() < 1e-9);
        assert!((geom.width_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn collinear_handles_fall_back_to_default() {
        let handles = [
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.5),
            Point::new(1.0, 1.0),
        ];
        let geom = gradient_geometry(GradientKind::Linear, &handles, Point::new(10.0, 10.0));
        assert_eq!(geom, GradientGeometry::default());
    }

    #[test]
    fn missing_handles_fall_back_to_default() {
        let geom = gradient_geometry(GradientKind::Radial, &[], Point::new(10.0, 10.0));
        assert_eq!(geom, GradientGeometry::default());
    }
}
