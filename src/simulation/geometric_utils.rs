//! Geometric helpers shared by car kinematics and sensors.
//!
//! Screen coordinates grow to the right and downwards. Headings are measured
//! in degrees and turn counter-clockwise on screen, so every direction is
//! built from the negated heading.

use ndarray::{Array1, array};

/// Unit direction vector for a heading in degrees.
///
/// `heading_vector(0.0)` is `(1, 0)`; `heading_vector(90.0)` points up the
/// screen.
pub fn heading_vector(heading_deg: f32) -> Array1<f32> {
    let angle = (-heading_deg).to_radians();
    array![angle.cos(), angle.sin()]
}

/// Point at `length` from `origin` in direction `angle_rad` (screen radians).
pub fn polar_offset(origin: &Array1<f32>, angle_rad: f32, length: f32) -> Array1<f32> {
    array![
        origin[0] + angle_rad.cos() * length,
        origin[1] + angle_rad.sin() * length
    ]
}

/// Pixel nearest to `point`.
pub fn nearest_pixel(point: &Array1<f32>) -> (i32, i32) {
    (point[0].round() as i32, point[1].round() as i32)
}

/// Pixel containing `point`.
pub fn containing_pixel(point: &Array1<f32>) -> (i32, i32) {
    (point[0].floor() as i32, point[1].floor() as i32)
}
