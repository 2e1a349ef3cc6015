//! Overlap tests for circles and axis-aligned rectangles
//!
//! Rectangles are given by their top-left corner and size and cover the
//! half-open area `[pos, pos + size)`, so two rectangles that only share an
//! edge do not collide. Likewise circles that only touch do not collide.

use super::vector::Vector;

/// True if the circles overlap (touching does not count)
pub fn circle_with_circle(pos_a: Vector, radius_a: f64, pos_b: Vector, radius_b: f64) -> bool {
    pos_a.dist(pos_b) < radius_a + radius_b
}

/// True unless the rectangles are fully separated along either axis
pub fn rect_with_rect(pos_a: Vector, size_a: Vector, pos_b: Vector, size_b: Vector) -> bool {
    let separated = pos_b.x + size_b.x <= pos_a.x
        || pos_b.x >= pos_a.x + size_a.x
        || pos_b.y + size_b.y <= pos_a.y
        || pos_b.y >= pos_a.y + size_a.y;
    !separated
}

/// True if the point lies inside the circle
pub fn point_in_circle(point: Vector, center: Vector, radius: f64) -> bool {
    point.dist(center) < radius
}

/// True if the point lies inside the half-open rectangle
pub fn point_in_rect(point: Vector, pos: Vector, size: Vector) -> bool {
    point.x >= pos.x && point.x < pos.x + size.x && point.y >= pos.y && point.y < pos.y + size.y
}
