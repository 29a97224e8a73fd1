//! Bounded particle pool for slice and miss feedback
//!
//! The pool is a ring: once the cap is reached, emitting evicts the oldest
//! particle first, so the most recent effect is always visible.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Palette for slice bursts
pub const SLICE_COLORS: [&str; 5] = ["#1A45FF", "#FF4B8F", "#ED6D3F", "#ACFF4B", "#60E7CE"];
/// Palette for miss bursts (disjoint from the slice palette)
pub const MISS_COLORS: [&str; 3] = ["#FF4444", "#FF6666", "#FF8888"];

/// Which effect a burst belongs to; selects the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    Slice,
    Miss,
}

impl BurstKind {
    fn pick_color(&self, rng: &mut impl Rng) -> &'static str {
        match self {
            BurstKind::Slice => SLICE_COLORS[rng.random_range(0..SLICE_COLORS.len())],
            BurstKind::Miss => MISS_COLORS[rng.random_range(0..MISS_COLORS.len())],
        }
    }
}

/// A transient visual effect
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub color: &'static str,
    /// Linear fade, recomputed from life each tick
    pub alpha: f32,
    pub size: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    cap: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::with_capacity(MAX_PARTICLES)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            particles: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Spawn `count` particles at `origin` with randomized outward velocity
    /// and lifetime. Evicts oldest-first when the pool is full.
    pub fn emit(&mut self, origin: Vec2, count: usize, kind: BurstKind, rng: &mut impl Rng) {
        if self.cap == 0 {
            return;
        }
        for _ in 0..count {
            if self.particles.len() >= self.cap {
                self.particles.pop_front();
            }
            self.particles.push_back(Particle {
                pos: origin,
                vel: Vec2::new(
                    rng.random_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
                    rng.random_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
                ),
                life: 0.0,
                max_life: rng.random_range(PARTICLE_MIN_LIFE..PARTICLE_MAX_LIFE),
                color: kind.pick_color(rng),
                alpha: 1.0,
                size: rng.random_range(PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE),
            });
        }
    }

    /// Integrate all particles and drop the ones past their lifetime
    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.life += dt;
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.vel *= PARTICLE_DRAG;
            p.alpha = (1.0 - p.life / p.max_life).max(0.0);
        }
        self.particles.retain(|p| p.life < p.max_life);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_emit_in_ranges() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = ParticleSystem::new();
        ps.emit(Vec2::new(10.0, 20.0), 50, BurstKind::Slice, &mut rng);
        assert_eq!(ps.len(), 50);
        for p in ps.iter() {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert!(p.vel.x.abs() <= PARTICLE_SPREAD && p.vel.y.abs() <= PARTICLE_SPREAD);
            assert!(p.max_life >= PARTICLE_MIN_LIFE && p.max_life < PARTICLE_MAX_LIFE);
            assert!(p.size >= PARTICLE_MIN_SIZE && p.size < PARTICLE_MAX_SIZE);
            assert_eq!(p.alpha, 1.0);
            assert!(SLICE_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn test_palettes_are_disjoint() {
        for c in MISS_COLORS {
            assert!(!SLICE_COLORS.contains(&c));
        }
    }

    #[test]
    fn test_cap_evicts_oldest_first() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ps = ParticleSystem::with_capacity(10);
        ps.emit(Vec2::new(1.0, 1.0), 10, BurstKind::Slice, &mut rng);
        ps.emit(Vec2::new(2.0, 2.0), 5, BurstKind::Miss, &mut rng);
        assert_eq!(ps.len(), 10);
        // The 5 survivors from the first burst come first, newest last
        let origins: Vec<Vec2> = ps.iter().map(|p| p.pos).collect();
        assert!(origins[..5].iter().all(|&o| o == Vec2::new(1.0, 1.0)));
        assert!(origins[5..].iter().all(|&o| o == Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_newest_burst_always_retained() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = ParticleSystem::with_capacity(20);
        ps.emit(Vec2::ZERO, 20, BurstKind::Slice, &mut rng);
        ps.emit(Vec2::new(9.0, 9.0), 20, BurstKind::Miss, &mut rng);
        assert_eq!(ps.len(), 20);
        assert!(ps.iter().all(|p| p.pos == Vec2::new(9.0, 9.0)));
    }

    #[test]
    fn test_alpha_is_linear_in_life() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ps = ParticleSystem::new();
        ps.emit(Vec2::ZERO, 1, BurstKind::Slice, &mut rng);
        ps.update(0.1);
        let p = ps.iter().next().unwrap();
        assert!((p.alpha - (1.0 - 0.1 / p.max_life)).abs() < 1e-6);
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ps = ParticleSystem::new();
        ps.emit(Vec2::ZERO, 30, BurstKind::Miss, &mut rng);
        // Max lifetime is 1.5s
        for _ in 0..200 {
            ps.update(0.01);
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn test_gravity_and_drag() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut ps = ParticleSystem::new();
        ps.emit(Vec2::ZERO, 1, BurstKind::Slice, &mut rng);
        let v0 = ps.iter().next().unwrap().vel;
        ps.update(0.1);
        let v1 = ps.iter().next().unwrap().vel;
        assert!((v1.y - (v0.y + PARTICLE_GRAVITY * 0.1) * PARTICLE_DRAG).abs() < 1e-3);
        assert!((v1.x - v0.x * PARTICLE_DRAG).abs() < 1e-3);
    }

    #[test]
    fn test_zero_cap_never_stores() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ps = ParticleSystem::with_capacity(0);
        ps.emit(Vec2::ZERO, 100, BurstKind::Slice, &mut rng);
        assert!(ps.is_empty());
    }
}
