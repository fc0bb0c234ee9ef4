//! Debris particles thrown off destroyed targets
//!
//! Purely visual. Spawned from the seeded game RNG so a replay with the same
//! seed produces the same debris.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Maximum particles alive at once
pub const MAX_PARTICLES: usize = 256;

/// Seconds a particle lives at most
const LIFETIME: f32 = 1.2;

/// Which piece of the gift a particle is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Wrapping,
    Ribbon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// 1 at spawn, removed at 0
    pub life: f32,
    pub size: f32,
}

/// Spawn `count` particles flying out of `pos`
pub fn burst(particles: &mut Vec<Particle>, rng: &mut Pcg32, pos: Vec2, count: u32) {
    for _ in 0..count {
        if particles.len() >= MAX_PARTICLES {
            break;
        }
        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(80.0..260.0);
        let kind = if rng.random_bool(0.3) {
            ParticleKind::Ribbon
        } else {
            ParticleKind::Wrapping
        };
        particles.push(Particle {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            kind,
            life: 1.0,
            size: rng.random_range(3.0..7.0),
        });
    }
}

/// Move particles and drop the dead ones
pub fn update(particles: &mut Vec<Particle>, gravity: Vec2, dt: f32) {
    for p in particles.iter_mut() {
        p.vel += gravity * 0.5 * dt;
        p.pos += p.vel * dt;
        p.life -= dt / LIFETIME;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_burst_is_seeded() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        burst(&mut a, &mut Pcg32::seed_from_u64(5), Vec2::new(10.0, 10.0), 8);
        burst(&mut b, &mut Pcg32::seed_from_u64(5), Vec2::new(10.0, 10.0), 8);
        assert_eq!(a.len(), 8);
        assert_eq!(a, b);
    }

    #[test]
    fn test_burst_respects_cap() {
        let mut particles = Vec::new();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..40 {
            burst(&mut particles, &mut rng, Vec2::ZERO, 12);
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_particles_expire() {
        let mut particles = Vec::new();
        burst(&mut particles, &mut Pcg32::seed_from_u64(3), Vec2::ZERO, 4);
        for _ in 0..90 {
            update(&mut particles, Vec2::new(0.0, 1000.0), 1.0 / 60.0);
        }
        assert!(particles.is_empty());
    }
}
