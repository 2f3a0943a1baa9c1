use crate::state::Pos;

// Contact tolerance widens every circle test a little so discrete time
// stepping does not miss grazing contacts.
pub const CONTACT_TOLERANCE: f32 = 2.0;

pub fn circles_intersect(a: Pos, ra: f32, b: Pos, rb: f32) -> bool {
    a.distance_to(&b) <= ra + rb + CONTACT_TOLERANCE
}

/// Swept test for fast movers: does the segment from `prev` to `curr` pass
/// within `combined_radius` of `center`? Projects the circle center onto the
/// segment and clamps the parameter to [0, 1], so positions before the start
/// or past the end of the motion do not count.
pub fn swept_segment_hits_circle(prev: Pos, curr: Pos, center: Pos, combined_radius: f32) -> bool {
    let dx = curr.x - prev.x;
    let dy = curr.y - prev.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return prev.distance_to(&center) <= combined_radius;
    }

    let t = (((center.x - prev.x) * dx + (center.y - prev.y) * dy) / len_sq).clamp(0.0, 1.0);
    let closest = Pos::new(prev.x + dx * t, prev.y + dy * t);
    closest.distance_to(&center) <= combined_radius
}

/// Unit vector from `from` towards `to`. Coincident (or non-finite) centers
/// fall back to straight up so a bounce can never produce a NaN velocity.
pub fn bounce_direction(from: Pos, to: Pos) -> (f32, f32) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if !len.is_finite() || len <= f32::EPSILON {
        return (0.0, -1.0);
    }
    (dx / len, dy / len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_intersect_includes_tolerance() {
        let a = Pos::new(0.0, 0.0);
        // Radii sum to 10; the 2-unit tolerance makes 12 a contact
        assert!(circles_intersect(a, 5.0, Pos::new(12.0, 0.0), 5.0));
        assert!(!circles_intersect(a, 5.0, Pos::new(12.5, 0.0), 5.0));
    }

    #[test]
    fn test_swept_hit_between_endpoints() {
        let prev = Pos::new(50.0, 20.0);
        let curr = Pos::new(50.0, 80.0);
        let center = Pos::new(50.0, 50.0);
        // Both endpoints are 30 away, far outside the combined radius, but
        // the path runs straight through the circle
        assert!(!circles_intersect(prev, 2.0, center, 8.0));
        assert!(!circles_intersect(curr, 2.0, center, 8.0));
        assert!(swept_segment_hits_circle(prev, curr, center, 12.0));
    }

    #[test]
    fn test_swept_clamps_to_segment_extent() {
        // Circle lies well past the end of the motion segment
        assert!(!swept_segment_hits_circle(
            Pos::new(0.0, 0.0),
            Pos::new(0.0, 10.0),
            Pos::new(0.0, 40.0),
            12.0
        ));
        // And well before its start
        assert!(!swept_segment_hits_circle(
            Pos::new(0.0, 0.0),
            Pos::new(0.0, 10.0),
            Pos::new(0.0, -40.0),
            12.0
        ));
    }

    #[test]
    fn test_swept_degenerate_segment_is_a_point_test() {
        let p = Pos::new(5.0, 5.0);
        assert!(swept_segment_hits_circle(p, p, Pos::new(5.0, 10.0), 6.0));
        assert!(!swept_segment_hits_circle(p, p, Pos::new(5.0, 20.0), 6.0));
    }

    #[test]
    fn test_bounce_direction_is_normalized() {
        let (dx, dy) = bounce_direction(Pos::new(0.0, 0.0), Pos::new(3.0, 4.0));
        assert!((dx - 0.6).abs() < 1e-6);
        assert!((dy - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_direction_coincident_centers_points_up() {
        let p = Pos::new(7.0, 7.0);
        assert_eq!(bounce_direction(p, p), (0.0, -1.0));
    }
}
