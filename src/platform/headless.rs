//! Headless platform
//!
//! Records every collaborator call instead of drawing or playing anything.
//! Used by the native runner and by driver tests; the caller delivers
//! frames by taking the pending handle and passing it back to the driver.

use super::{FrameHandle, Platform, Screen, SoundEffect, Sprite};

#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    /// Sprites drawn during the frame in progress
    pending_sprites: Vec<Sprite>,
    /// Sprites of the last finished frame
    pub last_frame: Vec<Sprite>,
    pub frames_drawn: u64,
    pub sounds: Vec<SoundEffect>,
    pub music_playing: bool,
    pub screens: Vec<Screen>,
    pub score_text: String,
    pub pending: Option<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
    pub requests: u64,
    next_handle: u64,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the pending frame, as a scheduler firing would
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn current_screen(&self) -> Option<Screen> {
        self.screens.last().copied()
    }
}

impl Platform for HeadlessPlatform {
    fn draw_sprite(&mut self, sprite: &Sprite) {
        self.pending_sprites.push(*sprite);
    }

    fn finish_frame(&mut self) {
        self.last_frame = std::mem::take(&mut self.pending_sprites);
        self.frames_drawn += 1;
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        log::trace!("sound: {:?}", effect);
        self.sounds.push(effect);
    }

    fn set_music(&mut self, playing: bool) {
        self.music_playing = playing;
    }

    fn show_screen(&mut self, screen: Screen) {
        log::debug!("screen: {:?}", screen);
        self.screens.push(screen);
    }

    fn set_score_text(&mut self, text: &str) {
        self.score_text.clear();
        self.score_text.push_str(text);
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        self.requests += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}
