//! Platform abstraction layer
//!
//! The game core calls out to the platform for everything it does not own:
//! - Drawing one sprite per live entity
//! - Sound effects and background music
//! - Menu/pause/game-over screens and the live score text
//! - Frame scheduling (`requestAnimationFrame` on the web)

pub mod headless;

pub use headless::HeadlessPlatform;

pub use crate::sim::{Sprite, SpriteKind};

/// Identifies one pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A volley left the ship
    Fire,
    /// Asteroid destroyed
    Explosion,
    /// Power-up collected
    Pickup,
    /// New session started
    GameStart,
    /// Ship destroyed
    GameOver,
}

/// Which overlay is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    /// In-game HUD only
    Playing,
    Paused,
    GameOver { score: u64 },
}

/// Everything the game core needs from its host
pub trait Platform {
    /// Blit one textured rectangle
    fn draw_sprite(&mut self, sprite: &Sprite);

    /// Called after the last sprite of a frame
    fn finish_frame(&mut self) {}

    /// Fire and forget
    fn play_sound(&mut self, effect: SoundEffect);

    fn set_music(&mut self, playing: bool);

    fn show_screen(&mut self, screen: Screen);

    fn set_score_text(&mut self, text: &str);

    /// Ask for exactly one frame callback
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a pending request; its callback must not be delivered
    fn cancel_frame(&mut self, handle: FrameHandle);
}
