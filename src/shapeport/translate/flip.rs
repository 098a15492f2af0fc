use crate::geometry::SourceTransform;

/// A transform with a negative determinant mirrors its content. The rotation
/// extraction absorbs a vertical flip, so only the horizontal flag is reported.
pub fn flip_x(transform: &SourceTransform) -> Option<bool> {
    let det = transform[0][0] * transform[1][1] - transform[0][1] * transform[1][0];
    if det < 0.0 {
        Some(true)
    } else {
        None
    }
}
