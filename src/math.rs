//! Mathematical structs and functions.

use cgmath::prelude::*;
use cgmath::{Point2, Vector2};

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// Moves `from` towards `to` by at most `max_dist`.
///
/// # Returns
/// The new point, and `true` iff it was snapped exactly onto `to`
/// because the remaining distance was no more than `max_dist`.
pub fn step_towards(from: Point2d, to: Point2d, max_dist: f64) -> (Point2d, bool) {
    let delta = to - from;
    let dist = delta.magnitude();
    if dist <= max_dist {
        (to, true)
    } else {
        (from + delta * (max_dist / dist), false)
    }
}
