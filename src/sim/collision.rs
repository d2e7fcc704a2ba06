//! Collision detection and response
//!
//! Everything collides as axis-aligned rectangles. Overlap is strict:
//! rectangles that only share an edge do not touch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::store::EntityStore;

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// An asteroid destroyed by a bullet this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidHit {
    /// Where the asteroid was when it was hit
    pub bounds: Aabb,
    /// Whether it broke into two children
    pub split: bool,
}

/// Resolve bullet × asteroid hits.
///
/// Asteroids are scanned newest first; for each one the newest overlapping
/// bullet is consumed. A hit removes that bullet and the asteroid, and a
/// splittable asteroid is replaced by its two halves (appended, so they are
/// not scanned again this frame).
pub fn resolve_bullet_hits(store: &mut EntityStore) -> Vec<AsteroidHit> {
    let mut hits = Vec::new();

    let mut i = store.asteroids.len();
    while i > 0 {
        i -= 1;
        let target = store.asteroids[i].bounds;
        let Some(j) = store.bullets.iter().rposition(|b| b.bounds.overlaps(&target)) else {
            continue;
        };

        store.bullets.remove(j);
        let asteroid = store.asteroids.remove(i);
        if asteroid.can_split {
            store.asteroids.extend(asteroid.split());
        }
        hits.push(AsteroidHit {
            bounds: asteroid.bounds,
            split: asteroid.can_split,
        });
    }

    hits
}

/// True if any asteroid overlaps the player (scan stops at the first one)
pub fn player_hit(store: &EntityStore) -> bool {
    let player = store.player.bounds;
    store
        .asteroids
        .iter()
        .rev()
        .any(|a| a.bounds.overlaps(&player))
}

/// Remove every power-up the player touches, returning how many
pub fn collect_power_ups(store: &mut EntityStore) -> usize {
    let player = store.player.bounds;
    let before = store.power_ups.len();
    store.power_ups.retain(|p| !p.bounds.overlaps(&player));
    before - store.power_ups.len()
}
