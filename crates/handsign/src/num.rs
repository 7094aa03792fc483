//! Utilities for numerics and coordinate conversion.

use nalgebra::Point2;

/// A landmark position `[x, y, z]`.
pub type Position = [f32; 3];

/// Computes the distance between `a` and `b` in the X/Y plane, ignoring Z.
pub fn planar_distance(a: Position, b: Position) -> f32 {
    nalgebra::distance(&Point2::new(a[0], a[1]), &Point2::new(b[0], b[1]))
}

/// Converts normalized image coordinates to pixel coordinates.
///
/// Returns [`None`] if either coordinate lies outside of the image (outside `0.0..=1.0`).
/// Fractional pixel coordinates are truncated towards zero.
pub fn normalized_to_pixel(x: f32, y: f32, width: u32, height: u32) -> Option<(u32, u32)> {
    if (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y) {
        // `f32` can't represent every `u32`, so scale in `f64`.
        let scale = |n: f32, size: u32| (f64::from(n) * f64::from(size)) as u32;
        Some((scale(x, width), scale(y, height)))
    } else {
        None
    }
}
