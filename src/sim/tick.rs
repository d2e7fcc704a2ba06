//! Per-frame simulation step
//!
//! Order within a running frame:
//! input → motion → spawning → difficulty → collisions → power-up expiry.

use super::collision::{collect_power_ups, player_hit, resolve_bullet_hits};
use super::input::FrameInput;
use super::motion::{integrate, steer_player};
use super::spawner::Spawner;
use super::state::{GameEvent, Session, SessionStatus};

/// Advance the session by one frame at external timestamp `now`.
///
/// Does nothing unless the session is running.
pub fn tick(session: &mut Session, input: &FrameInput, now: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.status != SessionStatus::Running {
        return events;
    }

    let now = session.clock.session_time(now);
    let playfield = session.playfield();
    session.frame += 1;

    // Ship control and firing
    steer_player(&mut session.store, &playfield, input.left, input.right);
    if input.fire {
        let bullets = session.fire_volley(now);
        events.push(GameEvent::Fired { bullets });
    }
    if session.auto_fire.volley_due(now) {
        let bullets = session.fire_volley(now);
        events.push(GameEvent::Fired { bullets });
    }

    let culled = integrate(&mut session.store, &playfield);
    if !culled.is_empty() {
        log::trace!(
            "Frame {}: culled {} bullets, {} asteroids, {} power-ups",
            session.frame,
            culled.bullets,
            culled.asteroids,
            culled.power_ups
        );
    }

    let wave = session.spawner.try_spawn_asteroids(
        now,
        &session.difficulty,
        &playfield,
        &mut session.rng,
    );
    session.store.asteroids.extend(wave);
    if let Some(power_up) = Spawner::try_spawn_power_up(&playfield, &mut session.rng) {
        session.store.add_power_up(power_up);
    }

    if session.difficulty.maybe_scale(now) {
        events.push(GameEvent::DifficultyScaled {
            spawn_multiplier: session.difficulty.spawn_multiplier,
        });
    }

    for hit in resolve_bullet_hits(&mut session.store) {
        session.score += 1;
        if hit.split {
            log::debug!("Asteroid split at ({:.0}, {:.0})", hit.bounds.pos.x, hit.bounds.pos.y);
        }
        events.push(GameEvent::AsteroidDestroyed { split: hit.split });
    }

    if player_hit(&session.store) {
        session.status = SessionStatus::Over;
        log::info!("Game over at frame {}: score {}", session.frame, session.score);
        events.push(GameEvent::GameOver {
            score: session.score,
        });
        return events;
    }

    for _ in 0..collect_power_ups(&mut session.store) {
        let activated = session.auto_fire.activate(now);
        events.push(GameEvent::PowerUpCollected { activated });
    }

    if session.auto_fire.tick(now) {
        events.push(GameEvent::AutoFireExpired);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, Bullet, PowerUp};
    use crate::sim::state::SessionConfig;
    use glam::Vec2;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn session(tier: &str) -> Session {
        Session::new(SessionConfig::new(tier, 800.0, 600.0).unwrap(), 12345, 0.0)
    }

    fn run(session: &mut Session, frames: std::ops::Range<u32>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for f in frames {
            events.extend(tick(session, &FrameInput::default(), f as f64 * FRAME_MS));
        }
        events
    }

    #[test]
    fn test_manual_fire_single_bullet() {
        let mut session = session("mid");
        let input = FrameInput {
            fire: true,
            ..Default::default()
        };
        let events = tick(&mut session, &input, 0.0);
        assert_eq!(events, vec![GameEvent::Fired { bullets: 1 }]);
        assert_eq!(session.store.bullets.len(), 1);
        // Fired at (center - 5, 530) then moved once
        assert_eq!(session.store.bullets[0].bounds.pos, Vec2::new(420.0, 523.0));
    }

    #[test]
    fn test_steer_before_fire() {
        let mut session = session("mid");
        let input = FrameInput {
            left: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut session, &input, 0.0);
        assert_eq!(session.store.player.bounds.pos.x, 395.0);
        assert_eq!(session.store.bullets[0].bounds.pos.x, 415.0);
    }

    #[test]
    fn test_offscreen_entities_culled_each_frame() {
        let mut session = session("mid");
        session.store.add_bullet(Bullet::new(Vec2::new(100.0, -14.0), 0.0));
        session
            .store
            .add_asteroid(Asteroid::new(Vec2::new(10.0, 599.0), 30.0, 2.0));
        let mut power_up = PowerUp::new(700.0);
        power_up.bounds.pos.y = 599.0;
        session.store.add_power_up(power_up);

        let events = tick(&mut session, &FrameInput::default(), 0.0);
        assert!(events.is_empty());
        assert!(session.store.bullets.is_empty());
        assert!(session.store.asteroids.is_empty());
        // Only a freshly spawned power-up (above the top edge) may remain
        assert!(session.store.power_ups.iter().all(|p| p.bounds.pos.y < 0.0));
        assert_eq!(session.status, SessionStatus::Running);
    }

    #[test]
    fn test_asteroid_spawns_after_interval() {
        // First spawn happens on the first frame past 1000 ms
        let mut session = session("mid");
        let mut spawned_at = None;
        for f in 0..120 {
            tick(&mut session, &FrameInput::default(), f as f64 * FRAME_MS);
            if !session.store.asteroids.is_empty() {
                spawned_at = Some(f as f64 * FRAME_MS);
                break;
            }
        }
        let t = spawned_at.expect("an asteroid should spawn within two seconds");
        assert!(t > 1000.0 && t < 1000.0 + FRAME_MS + 1e-9);
    }

    #[test]
    fn test_shooting_asteroid_scores() {
        let mut session = session("mid");
        session
            .store
            .add_asteroid(Asteroid::new(Vec2::new(415.0, 500.0), 30.0, 0.0));
        let input = FrameInput {
            fire: true,
            ..Default::default()
        };
        let events = tick(&mut session, &input, 0.0);

        assert!(events.contains(&GameEvent::AsteroidDestroyed { split: false }));
        assert_eq!(session.score, 1);
        assert!(session.store.asteroids.is_empty());
        assert!(session.store.bullets.is_empty());
    }

    #[test]
    fn test_player_collision_ends_session() {
        let mut session = session("mid");
        session
            .store
            .add_asteroid(Asteroid::new(Vec2::new(410.0, 520.0), 30.0, 1.0));
        let events = tick(&mut session, &FrameInput::default(), 0.0);

        assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 0 }));
        assert_eq!(session.status, SessionStatus::Over);

        // Frozen afterwards
        let frame = session.frame;
        assert!(tick(&mut session, &FrameInput::default(), 16.0).is_empty());
        assert_eq!(session.frame, frame);
    }

    #[test]
    fn test_pickup_activates_auto_fire() {
        let mut session = session("mid");
        let mut power_up = PowerUp::new(410.0);
        power_up.bounds.pos.y = 520.0;
        session.store.add_power_up(power_up);

        let events = tick(&mut session, &FrameInput::default(), 0.0);
        assert!(events.contains(&GameEvent::PowerUpCollected { activated: true }));
        assert!(session.auto_fire.is_active(0.0));

        // First automatic volley on the next frame: three bullets
        let events = tick(&mut session, &FrameInput::default(), FRAME_MS);
        assert!(events.contains(&GameEvent::Fired { bullets: 3 }));
        let mut drifts: Vec<f32> = session.store.bullets.iter().map(|b| b.dx).collect();
        drifts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(drifts, vec![-2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_second_pickup_does_not_extend() {
        let mut session = session("mid");
        session.auto_fire.activate(0.0);
        let expiry = session.auto_fire.expiry_ms();

        let mut power_up = PowerUp::new(410.0);
        power_up.bounds.pos.y = 520.0;
        session.store.add_power_up(power_up);

        let events = tick(&mut session, &FrameInput::default(), 5_000.0);
        assert!(events.contains(&GameEvent::PowerUpCollected { activated: false }));
        assert_eq!(session.auto_fire.expiry_ms(), expiry);
        assert!(session.store.power_ups.iter().all(|p| p.bounds.pos.y < 0.0));
    }

    #[test]
    fn test_auto_fire_expires_in_frame_order() {
        let mut session = session("mid");
        session.auto_fire.activate(0.0);
        let events = tick(&mut session, &FrameInput::default(), 10_000.0);
        assert!(events.contains(&GameEvent::AutoFireExpired));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Fired { .. })));
    }

    #[test]
    fn test_difficulty_scales_on_cadence() {
        let mut session = session("hard");
        let events = tick(&mut session, &FrameInput::default(), 5_000.0);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::DifficultyScaled { .. }))
        );
        assert!((session.difficulty.speed_multiplier - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_paused_session_does_not_tick() {
        let mut session = session("mid");
        session.pause(0.0);
        assert!(tick(&mut session, &FrameInput::default(), 5_000.0).is_empty());
        assert_eq!(session.frame, 0);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed should produce identical results
        let mut a = session("hard");
        let mut b = session("hard");
        run(&mut a, 0..900);
        run(&mut b, 0..900);

        assert_eq!(a.store, b.store);
        assert_eq!(a.score, b.score);
        assert_eq!(a.status, b.status);
        assert_eq!(a.difficulty, b.difficulty);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_score_counts_destroyed_asteroids(
            seed in any::<u64>(),
            inputs in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..600),
        ) {
            let config = SessionConfig::new("hard", 400.0, 600.0).unwrap();
            let mut session = Session::new(config, seed, 0.0);
            let mut last_score = 0;

            for (f, (left, right, fire)) in inputs.into_iter().enumerate() {
                let input = FrameInput { left, right, fire };
                let events = tick(&mut session, &input, f as f64 * FRAME_MS);
                let destroyed = events
                    .iter()
                    .filter(|e| matches!(e, GameEvent::AsteroidDestroyed { .. }))
                    .count() as u64;

                prop_assert!(session.score >= last_score);
                prop_assert_eq!(session.score - last_score, destroyed);
                last_score = session.score;

                for a in &session.store.asteroids {
                    prop_assert!(a.bounds.pos.x >= 0.0);
                    prop_assert!(a.bounds.pos.y <= 600.0);
                }
            }
        }
    }
}
