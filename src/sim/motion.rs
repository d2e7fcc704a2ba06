//! Motion integration and culling
//!
//! Motion is per frame, not per second: every entity moves by its speed
//! once per rendered frame.

use super::entity::Playfield;
use super::store::EntityStore;

/// Entities culled by one integration pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Culled {
    pub bullets: usize,
    pub asteroids: usize,
    pub power_ups: usize,
}

impl Culled {
    pub fn is_empty(&self) -> bool {
        self.bullets == 0 && self.asteroids == 0 && self.power_ups == 0
    }
}

/// Move the ship laterally, clamped to the playfield
pub fn steer_player(store: &mut EntityStore, playfield: &Playfield, left: bool, right: bool) {
    let player = &mut store.player;
    let mut x = player.bounds.pos.x;
    if left {
        x -= player.speed;
    }
    if right {
        x += player.speed;
    }
    player.bounds.pos.x = x.clamp(0.0, playfield.max_x(player.bounds.size.x));
}

/// Advance every bullet, asteroid and power-up, then drop the ones that
/// left the playfield
pub fn integrate(store: &mut EntityStore, playfield: &Playfield) -> Culled {
    for bullet in &mut store.bullets {
        bullet.bounds.pos.y -= bullet.speed;
        bullet.bounds.pos.x += bullet.dx;
    }
    for asteroid in &mut store.asteroids {
        asteroid.bounds.pos.y += asteroid.speed;
    }
    for power_up in &mut store.power_ups {
        power_up.bounds.pos.y += power_up.speed;
    }

    Culled {
        bullets: store.remove_bullets(|b| {
            b.bounds.bottom() < 0.0 || b.bounds.pos.x < 0.0 || b.bounds.pos.x > playfield.width
        }),
        asteroids: store.remove_asteroids(|a| a.bounds.pos.y > playfield.height),
        power_ups: store.remove_power_ups(|p| p.bounds.pos.y > playfield.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, Bullet, PowerUp};
    use glam::Vec2;
    use proptest::prelude::*;

    fn setup() -> (EntityStore, Playfield) {
        let playfield = Playfield::new(800.0, 600.0);
        (EntityStore::new(&playfield), playfield)
    }

    #[test]
    fn test_bullets_move_up_with_drift() {
        let (mut store, playfield) = setup();
        store.add_bullet(Bullet::new(Vec2::new(100.0, 300.0), -2.0));

        integrate(&mut store, &playfield);
        assert_eq!(store.bullets[0].bounds.pos, Vec2::new(98.0, 293.0));
    }

    #[test]
    fn test_asteroid_culled_once_past_bottom() {
        let (mut store, playfield) = setup();
        store.add_asteroid(Asteroid::new(Vec2::new(10.0, 599.0), 30.0, 2.0));
        store.add_asteroid(Asteroid::new(Vec2::new(10.0, 597.0), 30.0, 2.0));

        let culled = integrate(&mut store, &playfield);
        assert_eq!(culled.asteroids, 1);
        // y == height is still in play
        assert_eq!(store.asteroids.len(), 1);
        assert_eq!(store.asteroids[0].bounds.pos.y, 599.0);

        let culled = integrate(&mut store, &playfield);
        assert_eq!(culled.asteroids, 1);
        assert!(store.asteroids.is_empty());
    }

    #[test]
    fn test_bullet_culling_edges() {
        let (mut store, playfield) = setup();
        // Bottom edge goes above the top
        store.add_bullet(Bullet::new(Vec2::new(100.0, -14.0), 0.0));
        // Still partially visible after the move
        store.add_bullet(Bullet::new(Vec2::new(100.0, -12.0), 0.0));
        // Drifts off the left and right edges
        store.add_bullet(Bullet::new(Vec2::new(1.0, 300.0), -2.0));
        store.add_bullet(Bullet::new(Vec2::new(799.0, 300.0), 2.0));

        let culled = integrate(&mut store, &playfield);
        assert_eq!(culled.bullets, 3);
        assert_eq!(store.bullets.len(), 1);
        assert_eq!(store.bullets[0].bounds.pos.y, -19.0);
    }

    #[test]
    fn test_power_up_falls_and_culls() {
        let (mut store, playfield) = setup();
        store.add_power_up(PowerUp::new(50.0));
        integrate(&mut store, &playfield);
        assert_eq!(store.power_ups[0].bounds.pos.y, -28.0);

        store.power_ups[0].bounds.pos.y = 599.0;
        let culled = integrate(&mut store, &playfield);
        assert_eq!(culled.power_ups, 1);
        assert!(!culled.is_empty());
        assert!(integrate(&mut store, &playfield).is_empty());
    }

    #[test]
    fn test_steer_player_clamps() {
        let (mut store, playfield) = setup();
        store.player.bounds.pos.x = 2.0;
        steer_player(&mut store, &playfield, true, false);
        assert_eq!(store.player.bounds.pos.x, 0.0);

        store.player.bounds.pos.x = 748.0;
        steer_player(&mut store, &playfield, false, true);
        assert_eq!(store.player.bounds.pos.x, 750.0);

        // Both held cancel out
        steer_player(&mut store, &playfield, true, true);
        assert_eq!(store.player.bounds.pos.x, 750.0);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(moves in prop::collection::vec((any::<bool>(), any::<bool>()), 0..400)) {
            let (mut store, playfield) = setup();
            for (left, right) in moves {
                steer_player(&mut store, &playfield, left, right);
                let x = store.player.bounds.pos.x;
                prop_assert!(x >= 0.0);
                prop_assert!(x + store.player.bounds.size.x <= playfield.width);
            }
        }
    }
}
