//! Entity types
//!
//! Every entity is an axis-aligned rectangle plus its own motion fields.
//! The [`Body`] trait is the common interface used by rendering and
//! collision dispatch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Visible simulation area, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest x at which an entity of `width` still fits, never negative
    pub fn max_x(&self, width: f32) -> f32 {
        (self.width - width).max(0.0)
    }
}

/// What a sprite depicts (selects texture/color on the render side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Bullet,
    Asteroid,
    PowerUp,
}

/// One rectangle to blit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub bounds: Aabb,
}

/// Anything with a bounding box and a sprite
pub trait Body {
    const KIND: SpriteKind;

    fn bounds(&self) -> Aabb;

    fn sprite(&self) -> Sprite {
        Sprite {
            kind: Self::KIND,
            bounds: self.bounds(),
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub bounds: Aabb,
    /// Lateral speed (pixels per frame)
    pub speed: f32,
}

impl Player {
    /// Ship at horizontal center, `PLAYER_BOTTOM_OFFSET` above the bottom edge
    pub fn new(playfield: &Playfield) -> Self {
        let x = (playfield.width / 2.0).min(playfield.max_x(PLAYER_WIDTH));
        let y = (playfield.height - PLAYER_BOTTOM_OFFSET).max(0.0);
        Self {
            bounds: Aabb::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
        }
    }

    /// Horizontal center of the ship
    pub fn center_x(&self) -> f32 {
        self.bounds.pos.x + self.bounds.size.x / 2.0
    }
}

impl Body for Player {
    const KIND: SpriteKind = SpriteKind::Player;

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// A projectile travelling upward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub bounds: Aabb,
    /// Upward speed (pixels per frame)
    pub speed: f32,
    /// Horizontal drift (pixels per frame), 0 for the center shot
    pub dx: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, dx: f32) -> Self {
        Self {
            bounds: Aabb::from_pos(pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)),
            speed: BULLET_SPEED,
            dx,
        }
    }
}

impl Body for Bullet {
    const KIND: SpriteKind = SpriteKind::Bullet;

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// A descending square rock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub bounds: Aabb,
    /// Downward speed (pixels per frame)
    pub speed: f32,
    /// Breaks into two halves when hit (only set at spawn, never on children)
    pub can_split: bool,
}

impl Asteroid {
    pub fn new(pos: Vec2, size: f32, speed: f32) -> Self {
        Self {
            bounds: Aabb::from_pos(pos, Vec2::splat(size)),
            speed,
            can_split: size > ASTEROID_SPLIT_THRESHOLD,
        }
    }

    /// Linear size (width == height)
    pub fn size(&self) -> f32 {
        self.bounds.size.x
    }

    /// The two halves produced when a splittable asteroid is destroyed
    pub fn split(&self) -> [Asteroid; 2] {
        let half = self.size() / 2.0;
        let speed = self.speed * SPLIT_SPEED_FACTOR;
        let child = |x: f32| Asteroid {
            bounds: Aabb::new(x, self.bounds.pos.y, half, half),
            speed,
            can_split: false,
        };
        [child(self.bounds.pos.x), child(self.bounds.pos.x + half)]
    }
}

impl Body for Asteroid {
    const KIND: SpriteKind = SpriteKind::Asteroid;

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// The auto-fire pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub bounds: Aabb,
    /// Downward speed (pixels per frame)
    pub speed: f32,
}

impl PowerUp {
    pub fn new(x: f32) -> Self {
        Self {
            bounds: Aabb::new(x, -POWER_UP_SIZE, POWER_UP_SIZE, POWER_UP_SIZE),
            speed: POWER_UP_SPEED,
        }
    }
}

impl Body for PowerUp {
    const KIND: SpriteKind = SpriteKind::PowerUp;

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}
