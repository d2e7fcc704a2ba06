//! Entity store
//!
//! Owns the player and the three entity collections. Collections keep
//! insertion order so iteration (and therefore every tie-break) is
//! deterministic.

use serde::{Deserialize, Serialize};

use super::entity::{Asteroid, Body, Bullet, Player, Playfield, PowerUp, Sprite};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub power_ups: Vec<PowerUp>,
}

impl EntityStore {
    /// Fresh store: a centered player, no other entities
    pub fn new(playfield: &Playfield) -> Self {
        Self {
            player: Player::new(playfield),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            power_ups: Vec::new(),
        }
    }

    pub fn add_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    pub fn add_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    pub fn add_power_up(&mut self, power_up: PowerUp) {
        self.power_ups.push(power_up);
    }

    /// Drop every bullet matching `dead`, keeping the rest in order
    pub fn remove_bullets(&mut self, mut dead: impl FnMut(&Bullet) -> bool) -> usize {
        let before = self.bullets.len();
        self.bullets.retain(|b| !dead(b));
        before - self.bullets.len()
    }

    pub fn remove_asteroids(&mut self, mut dead: impl FnMut(&Asteroid) -> bool) -> usize {
        let before = self.asteroids.len();
        self.asteroids.retain(|a| !dead(a));
        before - self.asteroids.len()
    }

    pub fn remove_power_ups(&mut self, mut dead: impl FnMut(&PowerUp) -> bool) -> usize {
        let before = self.power_ups.len();
        self.power_ups.retain(|p| !dead(p));
        before - self.power_ups.len()
    }

    /// Sprites in draw order: player, bullets, asteroids, power-ups
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        std::iter::once(self.player.sprite())
            .chain(self.bullets.iter().map(Body::sprite))
            .chain(self.asteroids.iter().map(Body::sprite))
            .chain(self.power_ups.iter().map(Body::sprite))
    }

    /// Number of live non-player entities
    pub fn entity_count(&self) -> usize {
        self.bullets.len() + self.asteroids.len() + self.power_ups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::SpriteKind;
    use glam::Vec2;

    #[test]
    fn test_remove_keeps_insertion_order() {
        let mut store = EntityStore::new(&Playfield::new(800.0, 600.0));
        for x in [10.0, 20.0, 30.0, 40.0] {
            store.add_asteroid(Asteroid::new(Vec2::new(x, 0.0), 25.0, 1.0));
        }

        let removed = store.remove_asteroids(|a| a.bounds.pos.x == 20.0 || a.bounds.pos.x == 30.0);
        assert_eq!(removed, 2);
        let xs: Vec<f32> = store.asteroids.iter().map(|a| a.bounds.pos.x).collect();
        assert_eq!(xs, vec![10.0, 40.0]);
    }

    #[test]
    fn test_sprites_draw_order() {
        let mut store = EntityStore::new(&Playfield::new(800.0, 600.0));
        store.add_power_up(PowerUp::new(5.0));
        store.add_asteroid(Asteroid::new(Vec2::ZERO, 30.0, 1.0));
        store.add_bullet(Bullet::new(Vec2::new(1.0, 1.0), 0.0));

        let kinds: Vec<SpriteKind> = store.sprites().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SpriteKind::Player,
                SpriteKind::Bullet,
                SpriteKind::Asteroid,
                SpriteKind::PowerUp
            ]
        );
        assert_eq!(store.entity_count(), 3);
    }
}
