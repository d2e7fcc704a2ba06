//! Shape generation for 2D primitives
//!
//! All coordinates are playfield pixels (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use crate::sim::{Aabb, Sprite, SpriteKind};

/// Sides used for asteroid outlines
const ASTEROID_SIDES: usize = 8;

/// Axis-aligned quad as two triangles
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Regular polygon inscribed in an ellipse, as a triangle fan
pub fn polygon(center: Vec2, radii: Vec2, sides: usize, color: [f32; 4]) -> Vec<Vertex> {
    let sides = sides.max(3);
    let mut vertices = Vec::with_capacity(sides * 3);
    let point = |i: usize| {
        let angle = i as f32 / sides as f32 * TAU;
        center + Vec2::new(angle.cos(), angle.sin()) * radii
    };

    for i in 0..sides {
        vertices.extend(triangle(center, point(i), point(i + 1), color));
    }
    vertices
}

/// Accumulates sprites for one frame
#[derive(Debug, Default)]
pub struct SpriteBatch {
    vertices: Vec<Vertex>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn push(&mut self, sprite: &Sprite) {
        let Aabb { pos, size } = sprite.bounds;
        let color = colors::for_kind(sprite.kind);
        let center = pos + size * 0.5;

        match sprite.kind {
            SpriteKind::Player => {
                // Hull pointing up, cockpit in the middle
                self.vertices.extend(triangle(
                    Vec2::new(pos.x, pos.y + size.y),
                    Vec2::new(pos.x + size.x, pos.y + size.y),
                    Vec2::new(center.x, pos.y),
                    color,
                ));
                let cockpit = size * 0.15;
                self.vertices.extend(rect(
                    center - cockpit,
                    center + cockpit,
                    colors::PLAYER_COCKPIT,
                ));
            }
            SpriteKind::Bullet => {
                self.vertices.extend(rect(pos, pos + size, color));
            }
            SpriteKind::Asteroid => {
                self.vertices
                    .extend(polygon(center, size * 0.5, ASTEROID_SIDES, color));
            }
            SpriteKind::PowerUp => {
                let top = Vec2::new(center.x, pos.y);
                let bottom = Vec2::new(center.x, pos.y + size.y);
                let left = Vec2::new(pos.x, center.y);
                let right = Vec2::new(pos.x + size.x, center.y);
                self.vertices.extend(triangle(top, right, bottom, color));
                self.vertices.extend(triangle(top, bottom, left, color));
            }
        }
    }
}
