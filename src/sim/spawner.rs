//! Asteroid and power-up spawning
//!
//! All draws come from the session RNG, so spawning is reproducible for a
//! given seed and frame timeline.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyProfile;
use super::entity::{Asteroid, Playfield, PowerUp};
use crate::consts::*;

/// Spawn timer state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Session time of the last asteroid spawn (or session start)
    pub last_spawn_ms: f64,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a wave of asteroids if the current interval has elapsed.
    ///
    /// Size is shared by the wave; each asteroid gets its own x and speed.
    pub fn try_spawn_asteroids<R: Rng>(
        &mut self,
        now: f64,
        profile: &DifficultyProfile,
        playfield: &Playfield,
        rng: &mut R,
    ) -> Vec<Asteroid> {
        if now - self.last_spawn_ms <= profile.current_interval_ms {
            return Vec::new();
        }
        self.last_spawn_ms = now;

        let size = rng.random_range(ASTEROID_MIN_SIZE..ASTEROID_MAX_SIZE);
        let count = spawn_count(rng, profile.spawn_multiplier);
        let speed_multiplier = profile.effective_speed_multiplier() as f32;

        (0..count)
            .map(|_| {
                let x = random_x(rng, playfield, size);
                let speed = rng.random_range(ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED) * speed_multiplier;
                Asteroid::new(Vec2::new(x, -size), size, speed)
            })
            .collect()
    }

    /// Per-frame Bernoulli trial for a power-up drop
    pub fn try_spawn_power_up<R: Rng>(playfield: &Playfield, rng: &mut R) -> Option<PowerUp> {
        if !rng.random_bool(POWER_UP_SPAWN_CHANCE) {
            return None;
        }
        Some(PowerUp::new(random_x(rng, playfield, POWER_UP_SIZE)))
    }
}

/// `ceil(u * multiplier)` with `u` uniform in (0, 1], so never below 1
pub fn spawn_count<R: Rng>(rng: &mut R, multiplier: f64) -> usize {
    let u = 1.0 - rng.random::<f64>();
    ((u * multiplier).ceil() as usize).max(1)
}

/// Uniform x in [0, width - size), or 0 when the entity does not fit
fn random_x<R: Rng>(rng: &mut R, playfield: &Playfield, size: f32) -> f32 {
    let max_x = playfield.max_x(size);
    if max_x > 0.0 {
        rng.random_range(0.0..max_x)
    } else {
        0.0
    }
}
