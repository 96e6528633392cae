//! Short-lived visual sparks spawned when food is eaten.
//!
//! Particles live in grid units and advance once per simulation tick, so an
//! effect's duration scales with game speed.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::{
    PARTICLE_BURST_COUNT, PARTICLE_LIFETIME_TICKS, PARTICLE_MAX_ALPHA, PARTICLE_MAX_SPEED,
    PARTICLE_MIN_SPEED, PARTICLE_SPEED_SCALE,
};
use crate::grid::GridPoint;

/// Palette token; the render adapter resolves it against the theme.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParticleColor {
    Spark,
    FoodGlow,
    SnakeGlow,
    PrimaryLight,
}

impl ParticleColor {
    pub const ALL: [Self; 4] = [
        Self::Spark,
        Self::FoodGlow,
        Self::SnakeGlow,
        Self::PrimaryLight,
    ];
}

/// One decaying effect unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: ParticleColor,
    initial_lifetime: u16,
    remaining_lifetime: u16,
}

impl Particle {
    #[must_use]
    pub fn new(
        position: (f32, f32),
        velocity: (f32, f32),
        color: ParticleColor,
        lifetime: u16,
    ) -> Self {
        Self {
            x: position.0,
            y: position.1,
            vx: velocity.0,
            vy: velocity.1,
            color,
            initial_lifetime: lifetime,
            remaining_lifetime: lifetime,
        }
    }

    /// Moves by one velocity step and burns one tick of lifetime.
    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.remaining_lifetime = self.remaining_lifetime.saturating_sub(1);
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.remaining_lifetime == 0
    }

    #[must_use]
    pub fn remaining_lifetime(&self) -> u16 {
        self.remaining_lifetime
    }

    /// Opacity proportional to the remaining share of lifetime.
    #[must_use]
    pub fn alpha(&self) -> u8 {
        if self.initial_lifetime == 0 {
            return 0;
        }

        let scaled = u32::from(self.remaining_lifetime) * u32::from(PARTICLE_MAX_ALPHA)
            / u32::from(self.initial_lifetime);
        u8::try_from(scaled).unwrap_or(PARTICLE_MAX_ALPHA)
    }
}

/// Owns every live particle.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a ring of [`PARTICLE_BURST_COUNT`] particles from the center
    /// of `cell`, evenly spaced in angle with randomized speed and color.
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, cell: GridPoint) {
        let origin = (cell.x as f32 + 0.5, cell.y as f32 + 0.5);

        for i in 0..PARTICLE_BURST_COUNT {
            let angle = TAU * i as f32 / PARTICLE_BURST_COUNT as f32;
            let speed =
                rng.gen_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED) * PARTICLE_SPEED_SCALE;
            let color = ParticleColor::ALL[rng.gen_range(0..ParticleColor::ALL.len())];

            self.particles.push(Particle::new(
                origin,
                (angle.cos() * speed, angle.sin() * speed),
                color,
                PARTICLE_LIFETIME_TICKS,
            ));
        }
    }

    /// Adds a single particle.
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Advances every particle one step and drops the expired ones.
    pub fn update(&mut self) {
        self.particles.retain_mut(|particle| {
            particle.update();
            !particle.is_dead()
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }
}
