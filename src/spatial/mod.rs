//! Plan-view geometry shared by perception, patrol and chase.
//!
//! Everything here is a pure function over plan coordinates (`Vec2`).
//! Bearings use `atan2(dy, dx)`, so heading 0 faces +x.

mod aabb;

pub use aabb::Aabb;

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Wrap an angle into (-PI, PI]. Non-finite input maps to 0.
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Signed difference `to - from`, both normalized first, result in (-PI, PI].
pub fn angle_difference(from: f32, to: f32) -> f32 {
    normalize_angle(normalize_angle(to) - normalize_angle(from))
}

/// Straight-line distance between two plan positions.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Bearing from `from` toward `to`, in (-PI, PI].
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    normalize_angle(d.y.atan2(d.x))
}

/// A perception cone: everything within `range` whose bearing lies within
/// `half_angle` of the viewer's heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub range: f32,
    pub half_angle: f32,
}

impl Cone {
    /// Build from a full field of view in degrees, the way level data and
    /// config express it.
    pub fn from_degrees(range: f32, fov_degrees: f32) -> Self {
        Self {
            range,
            half_angle: (fov_degrees * 0.5).to_radians(),
        }
    }

    /// Is `target` inside the cone seen from `origin` facing `heading`?
    ///
    /// No occlusion: walls and obstacles never block the test.
    pub fn contains(&self, origin: Vec2, heading: f32, target: Vec2) -> bool {
        if distance(origin, target) > self.range {
            return false;
        }
        // Standing on top of the viewer counts as seen.
        if origin.distance_squared(target) < f32::EPSILON {
            return true;
        }
        angle_difference(heading, bearing(origin, target)).abs() <= self.half_angle
    }
}

/// Move `from` toward `to` by at most `max_step`, never overshooting.
/// Returns the new position and the unit direction travelled (zero if
/// already there).
pub fn step_toward(from: Vec2, to: Vec2, max_step: f32) -> (Vec2, Vec2) {
    let delta = to - from;
    let dist = delta.length();
    if dist <= f32::EPSILON {
        return (to, Vec2::ZERO);
    }
    let dir = delta / dist;
    if max_step >= dist {
        (to, dir)
    } else {
        (from + dir * max_step.max(0.0), dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at_bearing(dist: f32, degrees: f32) -> Vec2 {
        Vec2::from_angle(degrees.to_radians()) * dist
    }

    #[test]
    fn normalize_stays_in_half_open_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(-0.5 * PI) + 0.5 * PI).abs() < 1e-6);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn difference_wraps_across_the_seam() {
        let d = angle_difference(170f32.to_radians(), (-170f32).to_radians());
        assert!((d - 20f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn sees_player_inside_cone() {
        // 200 range, 90 degree fov, facing +x, player at 150 @ 30 degrees.
        let cone = Cone::from_degrees(200.0, 90.0);
        assert!(cone.contains(Vec2::ZERO, 0.0, at_bearing(150.0, 30.0)));
    }

    #[test]
    fn misses_player_outside_half_angle() {
        let cone = Cone::from_degrees(200.0, 90.0);
        assert!(!cone.contains(Vec2::ZERO, 0.0, at_bearing(150.0, 50.0)));
    }

    #[test]
    fn misses_player_out_of_range() {
        let cone = Cone::from_degrees(200.0, 90.0);
        assert!(!cone.contains(Vec2::ZERO, 0.0, at_bearing(201.0, 0.0)));
        assert!(cone.contains(Vec2::ZERO, 0.0, at_bearing(199.0, 0.0)));
    }

    #[test]
    fn step_toward_never_overshoots() {
        let (pos, dir) = step_toward(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0);
        assert_eq!(pos, Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);

        let (pos, _) = step_toward(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0);
        assert_eq!(pos, Vec2::new(4.0, 0.0));

        let (pos, dir) = step_toward(Vec2::ONE, Vec2::ONE, 4.0);
        assert_eq!(pos, Vec2::ONE);
        assert_eq!(dir, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn normalized_angle_in_range(a in -1000.0f32..1000.0) {
            let n = normalize_angle(a);
            prop_assert!(n > -PI - 1e-4 && n <= PI + 1e-4);
        }

        #[test]
        fn heading_multiples_of_tau_see_the_same(
            heading in -PI..PI,
            turns in -4i32..=4,
            target_deg in -180.0f32..180.0,
            dist in 1.0f32..300.0,
        ) {
            let cone = Cone::from_degrees(200.0, 90.0);
            let target = at_bearing(dist, target_deg);
            let off = angle_difference(heading, bearing(Vec2::ZERO, target)).abs();
            // Skip float-boundary cases where rounding alone could flip the answer.
            prop_assume!((off - cone.half_angle).abs() > 1e-3);
            prop_assume!((dist - cone.range).abs() > 1e-3);

            let wrapped = heading + turns as f32 * TAU;
            prop_assert_eq!(
                cone.contains(Vec2::ZERO, heading, target),
                cone.contains(Vec2::ZERO, wrapped, target)
            );
        }
    }
}
