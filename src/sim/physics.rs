//! Velocity-integration physics and axis-aligned collision response
//!
//! Deliberately simple: constant gravity, explicit Euler integration, a flat
//! ground plane and static platforms resolved one axis at a time.

use super::state::{Body, Platform};

/// Constant downward acceleration
#[inline]
pub fn apply_gravity(body: &mut Body, gravity: f32) {
    body.vel.y += gravity;
}

/// Advance position by one tick of velocity
#[inline]
pub fn integrate(body: &mut Body) {
    body.pos += body.vel;
}

/// Horizontal damping
#[inline]
pub fn apply_friction(body: &mut Body, friction: f32) {
    body.vel.x *= friction;
}

/// Keep the body horizontally inside `[0, max_x - w]`. Vertical bounds are
/// left to ground/platform collision.
pub fn clamp_to_world_bounds(body: &mut Body, max_x: f32) {
    body.pos.x = crate::clamp(body.pos.x, 0.0, max_x - body.size.x);
}

/// Snap the body onto the ground line. Returns true if grounded.
pub fn resolve_ground_collision(body: &mut Body, ground_y: f32) -> bool {
    if body.pos.y + body.size.y > ground_y {
        body.pos.y = ground_y - body.size.y;
        body.vel.y = 0.0;
        return true;
    }
    false
}

/// Push the body out of every platform it overlaps.
///
/// The side is picked from where the body was before this tick's
/// integration (`pos - vel`): a landing wins over a ceiling hit, which wins
/// over the horizontal sides. At most one resolution per platform. Returns
/// true if the body landed on any platform.
pub fn resolve_platform_collision(body: &mut Body, platforms: &[Platform]) -> bool {
    let mut grounded = false;

    for platform in platforms {
        let p = &platform.rect;
        if !body.rect().overlaps(p) {
            continue;
        }

        let prev = body.pos - body.vel;
        let (w, h) = (body.size.x, body.size.y);

        if body.vel.y > 0.0 && prev.y + h <= p.top() {
            // Landing on top
            body.pos.y = p.top() - h;
            body.vel.y = 0.0;
            grounded = true;
        } else if body.vel.y < 0.0 && prev.y >= p.bottom() {
            // Head bump from below
            body.pos.y = p.bottom();
            body.vel.y = 0.0;
        } else if body.vel.x > 0.0 && prev.x + w <= p.left() {
            body.pos.x = p.left() - w;
            body.vel.x = 0.0;
        } else if body.vel.x < 0.0 && prev.x >= p.right() {
            body.pos.x = p.right();
            body.vel.x = 0.0;
        }
    }

    grounded
}

/// Ground first, platforms only when not standing on the ground
pub fn resolve_terrain(body: &mut Body, ground_y: f32, platforms: &[Platform]) -> bool {
    resolve_ground_collision(body, ground_y) || resolve_platform_collision(body, platforms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use glam::Vec2;
    use proptest::prelude::*;

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(40.0, 50.0)).with_vel(Vec2::new(vx, vy))
    }

    fn ledge() -> Vec<Platform> {
        vec![Platform::new(Rect::new(100.0, 200.0, 120.0, 20.0))]
    }

    #[test]
    fn test_gravity_and_integrate() {
        let mut b = body(0.0, 0.0, 2.0, 0.0);
        apply_gravity(&mut b, 0.5);
        integrate(&mut b);
        assert_eq!(b.vel, Vec2::new(2.0, 0.5));
        assert_eq!(b.pos, Vec2::new(2.0, 0.5));
    }

    #[test]
    fn test_friction() {
        let mut b = body(0.0, 0.0, 10.0, 3.0);
        apply_friction(&mut b, 0.9);
        assert!((b.vel.x - 9.0).abs() < 1e-5);
        assert_eq!(b.vel.y, 3.0);
    }

    #[test]
    fn test_world_bounds() {
        let mut b = body(-5.0, 0.0, 0.0, 0.0);
        clamp_to_world_bounds(&mut b, 2000.0);
        assert_eq!(b.pos.x, 0.0);

        let mut b = body(1990.0, -100.0, 0.0, 0.0);
        clamp_to_world_bounds(&mut b, 2000.0);
        assert_eq!(b.pos.x, 1960.0);
        // y is untouched
        assert_eq!(b.pos.y, -100.0);
    }

    #[test]
    fn test_ground_collision() {
        let mut b = body(0.0, 360.0, 0.0, 5.0);
        assert!(resolve_ground_collision(&mut b, 400.0));
        assert_eq!(b.pos.y, 350.0);
        assert_eq!(b.vel.y, 0.0);

        let mut airborne = body(0.0, 100.0, 0.0, 5.0);
        assert!(!resolve_ground_collision(&mut airborne, 400.0));
        assert_eq!(airborne.vel.y, 5.0);
    }

    #[test]
    fn test_platform_landing() {
        // Bottom was at 148 + 50 = 198 before moving 6 down
        let mut b = body(120.0, 154.0, 0.0, 6.0);
        assert!(resolve_platform_collision(&mut b, &ledge()));
        assert_eq!(b.pos.y, 150.0);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_platform_head_bump() {
        // Top was at 222 (below platform bottom 220) before moving 8 up
        let mut b = body(120.0, 214.0, 0.0, -8.0);
        assert!(!resolve_platform_collision(&mut b, &ledge()));
        assert_eq!(b.pos.y, 220.0);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_platform_side_hits() {
        // Moving right into the left face
        let mut b = body(63.0, 180.0, 5.0, 0.0);
        resolve_platform_collision(&mut b, &ledge());
        assert_eq!(b.pos.x, 60.0);
        assert_eq!(b.vel.x, 0.0);

        // Moving left into the right face
        let mut b = body(217.0, 180.0, -5.0, 0.0);
        resolve_platform_collision(&mut b, &ledge());
        assert_eq!(b.pos.x, 220.0);
        assert_eq!(b.vel.x, 0.0);
    }

    #[test]
    fn test_diagonal_prefers_landing() {
        // Both the previous bottom and previous right edge were clear of the
        // platform; the vertical rule is checked first.
        let mut b = body(64.0, 154.0, 5.0, 6.0);
        assert!(resolve_platform_collision(&mut b, &ledge()));
        assert_eq!(b.pos.y, 150.0);
        assert_eq!(b.vel.x, 5.0);
    }

    #[test]
    fn test_no_overlap_no_change() {
        let mut b = body(500.0, 100.0, 3.0, 3.0);
        let before = b.clone();
        assert!(!resolve_platform_collision(&mut b, &ledge()));
        assert_eq!(b.pos, before.pos);
        assert_eq!(b.vel, before.vel);
    }

    #[test]
    fn test_terrain_skips_platforms_when_on_ground() {
        let mut b = body(120.0, 355.0, 0.0, 2.0);
        assert!(resolve_terrain(&mut b, 400.0, &ledge()));
        assert_eq!(b.pos.y, 350.0);
    }

    proptest! {
        #[test]
        fn prop_landing_never_leaves_overlap(
            x in 61.0f32..219.0,
            gap in 0.05f32..1.0,
            vy in 0.5f32..19.0,
        ) {
            let platforms = ledge();
            // Start above the platform, at most `vy` away from its top
            let start_bottom = 200.0 - gap * vy;
            let mut b = body(x, start_bottom - 50.0, 0.0, vy);
            integrate(&mut b);
            resolve_platform_collision(&mut b, &platforms);
            prop_assert!(!b.rect().overlaps(&platforms[0].rect));
        }
    }
}
