//! Session state and configuration
//!
//! A [`Session`] owns every piece of mutable game state. Nothing is shared
//! between sessions; starting a new game builds a new `Session`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SessionClock;
use super::difficulty::{DifficultyProfile, Tier};
use super::entity::{Bullet, Playfield};
use super::powerup::AutoFire;
use super::spawner::Spawner;
use super::store::EntityStore;
use crate::consts::*;
use crate::error::ConfigError;

/// Validated per-session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tier: Tier,
    pub playfield: Playfield,
    pub scale_cadence_ms: f64,
    pub auto_fire_duration_ms: f64,
    pub auto_fire_interval_ms: f64,
}

impl SessionConfig {
    /// Config from a tier name as typed by the user (fails on unknown names)
    pub fn new(tier: &str, width: f32, height: f32) -> Result<Self, ConfigError> {
        Self::for_tier(tier.parse()?, Playfield::new(width, height))
    }

    /// Tier defaults for everything else
    pub fn for_tier(tier: Tier, playfield: Playfield) -> Result<Self, ConfigError> {
        let config = Self {
            tier,
            playfield,
            scale_cadence_ms: tier.scale_cadence_ms(),
            auto_fire_duration_ms: AUTO_FIRE_DURATION_MS,
            auto_fire_interval_ms: AUTO_FIRE_INTERVAL_MS,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Playfield { width, height } = self.playfield;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidPlayfield { width, height });
        }
        for (name, value) in [
            ("scale_cadence_ms", self.scale_cadence_ms),
            ("auto_fire_duration_ms", self.auto_fire_duration_ms),
            ("auto_fire_interval_ms", self.auto_fire_interval_ms),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidDuration { name, value });
            }
        }
        Ok(())
    }
}

/// Lifecycle of a single session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Running,
    Paused,
    Over,
}

/// Things that happened during a frame, for sounds and screens
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A volley left the ship
    Fired { bullets: usize },
    /// An asteroid was shot down (score +1)
    AsteroidDestroyed { split: bool },
    /// A power-up was picked up; `activated` is false if the buff was already running
    PowerUpCollected { activated: bool },
    AutoFireExpired,
    DifficultyScaled { spawn_multiplier: f64 },
    /// The ship was hit; the session is over
    GameOver { score: u64 },
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SessionConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub status: SessionStatus,
    pub score: u64,
    /// Simulated frames so far
    pub frame: u64,
    pub store: EntityStore,
    pub difficulty: DifficultyProfile,
    pub spawner: Spawner,
    pub auto_fire: AutoFire,
    pub clock: SessionClock,
    pub(crate) rng: Pcg32,
}

impl Session {
    /// Start a session at external timestamp `now`
    pub fn new(config: SessionConfig, seed: u64, now: f64) -> Self {
        log::info!(
            "Session start: tier={} playfield={}x{} seed={}",
            config.tier.as_str(),
            config.playfield.width,
            config.playfield.height,
            seed
        );
        Self {
            store: EntityStore::new(&config.playfield),
            difficulty: DifficultyProfile::with_cadence(config.tier, config.scale_cadence_ms),
            spawner: Spawner::new(),
            auto_fire: AutoFire::new(config.auto_fire_duration_ms, config.auto_fire_interval_ms),
            clock: SessionClock::start(now),
            rng: Pcg32::seed_from_u64(seed),
            status: SessionStatus::Running,
            score: 0,
            frame: 0,
            seed,
            config,
        }
    }

    pub fn playfield(&self) -> Playfield {
        self.config.playfield
    }

    /// Freeze the session. Returns false unless it was running.
    pub fn pause(&mut self, now: f64) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        self.status = SessionStatus::Paused;
        self.clock.pause(now);
        log::info!("Paused at frame {} (score {})", self.frame, self.score);
        true
    }

    /// Unfreeze the session. Returns false unless it was paused.
    pub fn resume(&mut self, now: f64) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        self.status = SessionStatus::Running;
        self.clock.resume(now);
        log::info!("Resumed at frame {}", self.frame);
        true
    }

    /// Fire from the ship: one center bullet, plus two drifting side bullets
    /// while auto-fire is active. `now` is session time.
    pub fn fire_volley(&mut self, now: f64) -> usize {
        let player = &self.store.player.bounds;
        let y = player.pos.y;
        let center_x = player.pos.x + player.size.x / 2.0 - BULLET_WIDTH / 2.0;
        let left_x = player.pos.x + 5.0;
        let right_x = player.right() - 15.0;

        self.store.add_bullet(Bullet::new(Vec2::new(center_x, y), 0.0));
        if !self.auto_fire.is_active(now) {
            return 1;
        }
        self.store
            .add_bullet(Bullet::new(Vec2::new(left_x, y), -SIDE_BULLET_DRIFT));
        self.store
            .add_bullet(Bullet::new(Vec2::new(right_x, y), SIDE_BULLET_DRIFT));
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig::new("medium", 800.0, 600.0).unwrap()
    }

    #[test]
    fn test_config_from_names() {
        let config = config();
        assert_eq!(config.tier, Tier::Mid);
        assert_eq!(config.scale_cadence_ms, 10_000.0);

        assert_eq!(
            SessionConfig::new("insane", 800.0, 600.0),
            Err(ConfigError::UnknownTier("insane".into()))
        );
    }

    #[test]
    fn test_config_rejects_bad_playfield_and_timings() {
        assert!(matches!(
            SessionConfig::new("low", 0.0, 600.0),
            Err(ConfigError::InvalidPlayfield { .. })
        ));
        assert!(matches!(
            SessionConfig::new("low", 800.0, f32::NAN),
            Err(ConfigError::InvalidPlayfield { .. })
        ));

        let mut config = config();
        config.auto_fire_interval_ms = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDuration {
                name: "auto_fire_interval_ms",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_new_session_is_fresh() {
        let session = Session::new(config(), 1, 123.0);
        assert_eq!(session.status, SessionStatus::Running);
        assert_eq!(session.score, 0);
        assert_eq!(session.store.entity_count(), 0);
        assert_eq!(session.difficulty.spawn_multiplier, 1.0);
        assert_eq!(session.clock.session_time(123.0), 0.0);
    }

    #[test]
    fn test_single_shot_from_ship_center() {
        let mut session = Session::new(config(), 1, 0.0);
        assert_eq!(session.store.player.bounds.pos.x, 400.0);

        assert_eq!(session.fire_volley(0.0), 1);
        let bullet = &session.store.bullets[0];
        let center_x = session.store.player.center_x();
        assert_eq!(bullet.bounds.pos, Vec2::new(center_x - 5.0, 530.0));
        assert_eq!(bullet.dx, 0.0);
    }

    #[test]
    fn test_triple_shot_while_auto_fire_active() {
        let mut session = Session::new(config(), 1, 0.0);
        session.auto_fire.activate(0.0);

        assert_eq!(session.fire_volley(10.0), 3);
        let drifts: Vec<f32> = session.store.bullets.iter().map(|b| b.dx).collect();
        assert_eq!(drifts, vec![0.0, -2.0, 2.0]);
        let xs: Vec<f32> = session.store.bullets.iter().map(|b| b.bounds.pos.x).collect();
        assert_eq!(xs, vec![420.0, 405.0, 435.0]);
    }

    #[test]
    fn test_pause_resume_transitions() {
        let mut session = Session::new(config(), 1, 0.0);
        assert!(!session.resume(10.0));
        assert!(session.pause(10.0));
        assert!(!session.pause(20.0));
        assert!(session.resume(30.0));
        assert_eq!(session.clock.session_time(40.0), 20.0);

        session.status = SessionStatus::Over;
        assert!(!session.pause(50.0));
    }
}
