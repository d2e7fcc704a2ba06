//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes only from the frame timestamps handed to [`tick`]
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod input;
pub mod motion;
pub mod powerup;
pub mod spawner;
pub mod state;
pub mod store;
pub mod tick;

pub use clock::SessionClock;
pub use collision::{Aabb, AsteroidHit, collect_power_ups, player_hit, resolve_bullet_hits};
pub use difficulty::{DifficultyProfile, Tier};
pub use entity::{Asteroid, Body, Bullet, Player, Playfield, PowerUp, Sprite, SpriteKind};
pub use input::{FrameInput, InputState, Key};
pub use motion::{Culled, integrate, steer_player};
pub use powerup::AutoFire;
pub use spawner::{Spawner, spawn_count};
pub use state::{GameEvent, Session, SessionConfig, SessionStatus};
pub use store::EntityStore;
pub use tick::tick;
