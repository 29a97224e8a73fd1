//! Target entity - a slice-able body that owns its own physics
//!
//! Targets enter from a screen edge, arc under gravity, and either get
//! sliced or expire. Expiry (age or falling out the bottom) is the miss
//! path; the orchestrator resolves it before collision testing.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Brand palette targets are tinted with
pub const TARGET_COLORS: [&str; 7] = [
    "#1A45FF", // blue
    "#FF4B8F", // pink
    "#ED6D3F", // orange
    "#ACFF4B", // green
    "#60E7CE", // turquoise
    "#FFFF00", // yellow
    "#00FF88", // bright green
];

/// A slice-able moving body
#[derive(Debug, Clone)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: &'static str,
    pub age: f32,
    pub max_age: f32,
    pub active: bool,
    pub sliced: bool,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Pulsing glow phase in [0, 1], derived from age each tick
    pub glow: f32,
}

/// Drawable parameters for a target; rendering itself is the host's concern
#[derive(Debug, Clone, Copy)]
pub struct TargetSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: &'static str,
    pub glow: f32,
    pub rotation: f32,
}

impl Target {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: rng.random_range(TARGET_MIN_RADIUS..TARGET_MAX_RADIUS),
            color: TARGET_COLORS[rng.random_range(0..TARGET_COLORS.len())],
            age: 0.0,
            max_age: rng.random_range(TARGET_MIN_LIFETIME..TARGET_MAX_LIFETIME),
            active: true,
            sliced: false,
            rotation: 0.0,
            rotation_speed: rng.random_range(-TARGET_MAX_SPIN..TARGET_MAX_SPIN),
            glow: 0.0,
        }
    }

    /// Integrate one step: position, aging, gravity, damped edge bounces.
    /// There is no bottom bound - falling out below is a valid despawn path.
    pub fn update(&mut self, dt: f32, width: f32, height: f32) {
        if !self.active {
            return;
        }

        self.pos += self.vel * dt;
        self.age += dt;
        self.rotation += self.rotation_speed * dt;
        self.glow = ((self.age * 6.0).sin() + 1.0) * 0.5;

        self.vel.y += TARGET_GRAVITY * dt;

        // Side walls reflect with damping, position clamped back in bounds
        if self.pos.x - self.radius <= 0.0 || self.pos.x + self.radius >= width {
            self.vel.x *= -BOUNCE_DAMP_X;
            self.pos.x = self.pos.x.clamp(self.radius, width - self.radius);
        }

        if self.pos.y - self.radius <= 0.0 {
            self.vel.y *= -BOUNCE_DAMP_Y;
            self.pos.y = self.radius;
        }

        if self.age >= self.max_age || self.pos.y > height + self.radius * 2.0 {
            self.active = false;
        }
    }

    /// Mark the target as cut. Idempotent; a sliced target never reactivates.
    pub fn slice(&mut self) {
        self.sliced = true;
        self.active = false;
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius
    }

    pub fn sprite(&self) -> TargetSprite {
        TargetSprite {
            pos: self.pos,
            radius: self.radius,
            color: self.color,
            glow: self.glow,
            rotation: self.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn make_target(pos: Vec2, vel: Vec2) -> Target {
        let mut rng = Pcg32::seed_from_u64(42);
        Target::new(1, pos, vel, &mut rng)
    }

    #[test]
    fn test_new_in_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..100 {
            let t = Target::new(id, Vec2::ZERO, Vec2::ZERO, &mut rng);
            assert!(t.radius >= TARGET_MIN_RADIUS && t.radius < TARGET_MAX_RADIUS);
            assert!(t.max_age >= TARGET_MIN_LIFETIME && t.max_age < TARGET_MAX_LIFETIME);
            assert!(t.rotation_speed.abs() <= TARGET_MAX_SPIN);
            assert!(t.active && !t.sliced);
        }
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut t = make_target(Vec2::new(400.0, 100.0), Vec2::new(0.0, 0.0));
        t.update(0.1, 800.0, 600.0);
        assert!(t.vel.y > 0.0);
        assert!((t.vel.y - TARGET_GRAVITY * 0.1).abs() < 0.001);
    }

    #[test]
    fn test_side_bounce_damps_velocity() {
        let mut t = make_target(Vec2::new(5.0, 300.0), Vec2::new(-100.0, 0.0));
        t.update(0.01, 800.0, 600.0);
        // Reflected and damped
        assert!(t.vel.x > 0.0);
        assert!((t.vel.x - 100.0 * BOUNCE_DAMP_X).abs() < 0.001);
        // Pushed back inside
        assert!(t.pos.x >= t.radius);
    }

    #[test]
    fn test_top_bounce_damps_velocity() {
        let mut t = make_target(Vec2::new(400.0, 5.0), Vec2::new(0.0, -200.0));
        t.update(0.01, 800.0, 600.0);
        assert!(t.vel.y > 0.0);
        assert!((t.pos.y - t.radius).abs() < 0.001);
    }

    #[test]
    fn test_no_bottom_bounce() {
        let mut t = make_target(Vec2::new(400.0, 590.0), Vec2::new(0.0, 400.0));
        for _ in 0..60 {
            t.update(1.0 / 60.0, 800.0, 600.0);
        }
        // Fell through the bottom and deactivated instead of bouncing
        assert!(!t.active);
        assert!(!t.sliced);
        assert!(t.pos.y > 600.0);
    }

    #[test]
    fn test_expires_by_age() {
        let mut t = make_target(Vec2::new(400.0, 300.0), Vec2::ZERO);
        t.age = t.max_age;
        t.update(0.01, 800.0, 600.0);
        assert!(!t.active);
        assert!(!t.sliced);
    }

    #[test]
    fn test_age_monotone_and_frozen_after_retirement() {
        let mut t = make_target(Vec2::new(400.0, 300.0), Vec2::ZERO);
        let mut last_age = t.age;
        for _ in 0..1000 {
            t.update(0.02, 800.0, 600.0);
            assert!(t.age >= last_age);
            last_age = t.age;
        }
        assert!(!t.active);
        let frozen = t.age;
        t.update(0.02, 800.0, 600.0);
        assert_eq!(t.age, frozen);
    }

    #[test]
    fn test_slice_is_idempotent() {
        let mut t = make_target(Vec2::new(400.0, 300.0), Vec2::ZERO);
        t.slice();
        assert!(t.sliced && !t.active);
        t.slice();
        assert!(t.sliced && !t.active);
        // A sliced target no longer integrates
        let pos = t.pos;
        t.update(0.1, 800.0, 600.0);
        assert_eq!(t.pos, pos);
    }

    #[test]
    fn test_contains() {
        let mut t = make_target(Vec2::new(400.0, 300.0), Vec2::ZERO);
        t.radius = 40.0;
        assert!(t.contains(Vec2::new(420.0, 300.0)));
        assert!(!t.contains(Vec2::new(441.0, 300.0)));
    }
}
