//! Axis-aligned rectangles and their point signed-distance query.
//!
//! The signed distance drives static-obstacle collisions: negative distance
//! means the query point is inside (or edge-overlapping) the rectangle and
//! the returned direction is the escape vector to scale a push force by.

use crate::math::sign;
use glam::Vec2;

/// Axis-aligned rectangle described by its minimum corner and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

/// Result of a signed-distance query: unit direction and signed distance.
/// `distance < 0` means the point is inside the rectangle.
#[derive(Clone, Copy, Debug)]
pub struct SdfHit {
    pub dir: Vec2,
    pub distance: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            min: center - Vec2::new(width, height) * 0.5,
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Expand (or shrink, for negative `amount`) every edge outward.
    pub fn offset_edges(&self, amount: f32) -> Rect {
        Rect {
            min: self.min - Vec2::splat(amount),
            size: self.size + Vec2::splat(amount * 2.0),
        }
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.min,
            Vec2::new(max.x, self.min.y),
            max,
            Vec2::new(self.min.x, max.y),
        ]
    }

    /// Signed distance from `point` to this rectangle's boundary.
    ///
    /// Three regions:
    /// - inside: negative distance to the nearest edge, escape direction
    ///   along the axis with the smaller penetration (x wins ties)
    /// - outside but overlapping the rectangle's span on one axis: positive
    ///   gap along the perpendicular axis, direction toward the rectangle
    /// - outside both spans: Euclidean distance to the nearest corner,
    ///   direction from that corner to the point
    pub fn signed_distance(&self, point: Vec2) -> SdfHit {
        let half = self.size * 0.5;
        let dc = self.center() - point;
        let adc = dc.abs();

        if adc.x < half.x && adc.y < half.y {
            // Signed deficits are both negative inside; the one closer to
            // zero marks the nearer edge.
            let sdx = (adc.x - half.x).min(0.0);
            let sdy = (adc.y - half.y).min(0.0);
            if sdx >= sdy {
                SdfHit {
                    dir: Vec2::new(sign(-dc.x), 0.0),
                    distance: sdx,
                }
            } else {
                SdfHit {
                    dir: Vec2::new(0.0, sign(-dc.y)),
                    distance: sdy,
                }
            }
        } else if adc.x < half.x {
            SdfHit {
                dir: Vec2::new(0.0, sign(dc.y)),
                distance: adc.y - half.y,
            }
        } else if adc.y < half.y {
            SdfHit {
                dir: Vec2::new(sign(dc.x), 0.0),
                distance: adc.x - half.x,
            }
        } else {
            let mut offset = point - self.min;
            for corner in &self.corners()[1..] {
                let v = point - *corner;
                if v.length_squared() < offset.length_squared() {
                    offset = v;
                }
            }
            let distance = offset.length();
            let dir = if distance > 0.0 {
                offset / distance
            } else {
                Vec2::ZERO
            };
            SdfHit { dir, distance }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn interior_point_reports_negative_distance_to_nearest_edge() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);

        let hit = r.signed_distance(Vec2::new(5.0, 5.0));
        assert_relative_eq!(hit.distance, -5.0);

        // Near the right edge: escape points right
        let hit = r.signed_distance(Vec2::new(8.0, 5.0));
        assert_relative_eq!(hit.distance, -2.0);
        assert_relative_eq!(hit.dir.x, 1.0);
        assert_relative_eq!(hit.dir.y, 0.0);

        // Near the top edge: escape points up (negative y)
        let hit = r.signed_distance(Vec2::new(5.0, 1.0));
        assert_relative_eq!(hit.distance, -1.0);
        assert_relative_eq!(hit.dir.x, 0.0);
        assert_relative_eq!(hit.dir.y, -1.0);
    }

    #[test]
    fn corner_region_distance_is_euclidean_to_nearest_corner() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hit = r.signed_distance(Vec2::new(15.0, 15.0));
        assert_relative_eq!(hit.distance, 5.0 * 2.0_f32.sqrt(), epsilon = 1e-4);
        assert_relative_eq!(hit.dir.x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
        assert_relative_eq!(hit.dir.y, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    }

    #[test]
    fn axis_aligned_exterior_reports_perpendicular_gap() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hit = r.signed_distance(Vec2::new(5.0, -3.0));
        assert_relative_eq!(hit.distance, 3.0);
        // Direction points back toward the rectangle (downward here)
        assert_relative_eq!(hit.dir.y, 1.0);
        assert_relative_eq!(hit.dir.x, 0.0);
    }

    #[test]
    fn offset_edges_expands_outward() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).offset_edges(2.0);
        assert_eq!(r.min, Vec2::new(-2.0, -2.0));
        assert_eq!(r.size, Vec2::new(14.0, 14.0));
    }
}
