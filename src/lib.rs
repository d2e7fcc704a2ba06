//! Rock Shooter - a single-screen asteroid shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, power-up)
//! - `driver`: Frame-driven game loop and pause/game-over state machine
//! - `platform`: Collaborator interface (sprites, sounds, screens, frame scheduling)
//! - `renderer`: WebGPU sprite blitter
//! - `settings`: Persisted preferences and session configuration
//! - `audio` (wasm only): Procedural Web Audio effects and music

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{Driver, GamePhase};
pub use error::ConfigError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Player ship dimensions and lateral speed (pixels per frame)
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Distance from the bottom of the playfield to the ship's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 70.0;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 10.0;
    pub const BULLET_HEIGHT: f32 = 20.0;
    pub const BULLET_SPEED: f32 = 7.0;
    /// Horizontal drift of the side bullets fired during auto-fire
    pub const SIDE_BULLET_DRIFT: f32 = 2.0;

    /// Asteroid size range [min, max)
    pub const ASTEROID_MIN_SIZE: f32 = 20.0;
    pub const ASTEROID_MAX_SIZE: f32 = 60.0;
    /// Asteroids strictly larger than this split when hit
    pub const ASTEROID_SPLIT_THRESHOLD: f32 = 40.0;
    /// Descent speed range [min, max) in pixels per frame
    pub const ASTEROID_MIN_SPEED: f32 = 1.0;
    pub const ASTEROID_MAX_SPEED: f32 = 3.0;
    /// Child speed relative to the parent after a split
    pub const SPLIT_SPEED_FACTOR: f32 = 0.5;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_SPEED: f32 = 2.0;
    /// Per-frame spawn probability
    pub const POWER_UP_SPAWN_CHANCE: f64 = 0.002;

    /// Auto-fire buff timings (milliseconds)
    pub const AUTO_FIRE_DURATION_MS: f64 = 10_000.0;
    pub const AUTO_FIRE_INTERVAL_MS: f64 = 300.0;

    /// Spawn interval never drops below this (milliseconds)
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 200.0;
    /// Multiplier increment applied on every difficulty step
    pub const DIFFICULTY_STEP: f64 = 0.2;
}
