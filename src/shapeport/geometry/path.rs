//! SVG path data → target path segments.
//!
//! Source geometry paths are SVG `d` strings in the node's local space. The target stores
//! absolute segments (`move-to`, `line-to`, `curve-to`, `close-path`) in document space.
//! Parsing goes through `kurbo`; the parsed path is moved into document space with the
//! node's absolute transform, and quadratic curves are raised to cubics on the way out.
//! Arcs come back from the parser already approximated by cubics.

use super::SourceTransform;
use kurbo::{Affine, BezPath, PathEl, QuadBez};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "params", rename_all = "kebab-case")]
pub enum PathSegment {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    },
    ClosePath,
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("malformed path data: {0}")]
    Syntax(#[from] kurbo::SvgParseError),
    #[error("path data must start with a move-to")]
    NoInitialMove,
}

/// Source transforms are row-major `[[a, c, e], [b, d, f]]`.
pub fn to_affine(m: &SourceTransform) -> Affine {
    Affine::new([m[0][0], m[1][0], m[0][1], m[1][1], m[0][2], m[1][2]])
}

/// Parses `d` and maps every point through `transform`.
pub fn parse_path(d: &str, transform: &SourceTransform) -> Result<Vec<PathSegment>, PathError> {
    match d.trim_start().chars().next() {
        None => return Ok(Vec::new()),
        Some('M' | 'm') => {}
        Some(_) => return Err(PathError::NoInitialMove),
    }

    let mut path = BezPath::from_svg(d)?;
    path.apply_affine(to_affine(transform));

    let mut segments = Vec::with_capacity(path.elements().len());
    let mut current = kurbo::Point::ZERO;
    let mut subpath_start = kurbo::Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                segments.push(PathSegment::MoveTo { x: p.x, y: p.y });
                current = p;
                subpath_start = p;
            }
            PathEl::LineTo(p) => {
                segments.push(PathSegment::LineTo { x: p.x, y: p.y });
                current = p;
            }
            PathEl::QuadTo(q, p) => {
                let cubic = QuadBez::new(current, q, p).raise();
                segments.push(curve(cubic.p1, cubic.p2, cubic.p3));
                current = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                segments.push(curve(c1, c2, p));
                current = p;
            }
            PathEl::ClosePath => {
                segments.push(PathSegment::ClosePath);
                current = subpath_start;
            }
        }
    }
    Ok(segments)
}

fn curve(c1: kurbo::Point, c2: kurbo::Point, p: kurbo::Point) -> PathSegment {
    PathSegment::CurveTo {
        c1x: c1.x,
        c1y: c1.y,
        c2x: c2.x,
        c2y: c2.y,
        x: p.x,
        y: p.y,
    }
}
