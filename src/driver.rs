//! Game loop driver
//!
//! Sequences the simulation once per delivered frame and owns the
//! Idle → Running ⇄ Paused → GameOver → Idle state machine. At most one frame
//! request is outstanding at any time; pausing or losing cancels it, and a
//! callback for anything but the outstanding request is dropped.

use crate::error::ConfigError;
use crate::platform::{FrameHandle, Platform, Screen, SoundEffect};
use crate::sim::{
    GameEvent, InputState, Key, Playfield, Session, SessionConfig, SessionStatus, tick,
};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Menu, no session
    Idle,
    Running,
    Paused,
    GameOver,
}

pub struct Driver<P: Platform> {
    platform: P,
    session: Option<Session>,
    /// Config of the most recent session, for restart
    last_config: Option<SessionConfig>,
    input: InputState,
    pending: Option<FrameHandle>,
}

impl<P: Platform> Driver<P> {
    pub fn new(mut platform: P) -> Self {
        platform.show_screen(Screen::Menu);
        Self {
            platform,
            session: None,
            last_config: None,
            input: InputState::new(),
            pending: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        match self.session.as_ref().map(|s| s.status) {
            None => GamePhase::Idle,
            Some(SessionStatus::Running) => GamePhase::Running,
            Some(SessionStatus::Paused) => GamePhase::Paused,
            Some(SessionStatus::Over) => GamePhase::GameOver,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// The frame request currently outstanding, if any
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Idle → Running with a fresh session
    pub fn start(&mut self, config: SessionConfig, seed: u64, now: f64) -> Result<(), ConfigError> {
        config.validate()?;
        if self.phase() != GamePhase::Idle {
            log::warn!("Ignoring start while {:?}", self.phase());
            return Ok(());
        }

        self.input.clear();
        self.session = Some(Session::new(config.clone(), seed, now));
        self.last_config = Some(config);

        self.platform.show_screen(Screen::Playing);
        self.platform.set_score_text(&score_text(0));
        self.platform.play_sound(SoundEffect::GameStart);
        self.platform.set_music(true);
        self.schedule();
        Ok(())
    }

    /// Start again with the previous session's config on the current playfield
    pub fn restart(&mut self, playfield: Playfield, seed: u64, now: f64) -> Result<(), ConfigError> {
        let Some(mut config) = self.last_config.clone() else {
            log::warn!("Ignoring restart: no previous session");
            return Ok(());
        };
        config.playfield = playfield;
        config.validate()?;
        self.reset();
        self.start(config, seed, now)
    }

    /// Back to the menu from any phase, discarding the session
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.input.clear();
        if self.session.take().is_some() {
            self.platform.set_music(false);
        }
        self.platform.set_score_text("");
        self.platform.show_screen(Screen::Menu);
    }

    /// Running → Paused
    pub fn pause(&mut self, now: f64) {
        let Some(session) = self.session.as_mut() else {
            log::warn!("Ignoring pause: no session");
            return;
        };
        if !session.pause(now) {
            log::warn!("Ignoring pause while {:?}", session.status);
            return;
        }
        self.cancel_pending();
        self.platform.set_music(false);
        self.platform.show_screen(Screen::Paused);
    }

    /// Paused → Running, with exactly one fresh frame request
    pub fn resume(&mut self, now: f64) {
        let Some(session) = self.session.as_mut() else {
            log::warn!("Ignoring resume: no session");
            return;
        };
        if !session.resume(now) {
            log::warn!("Ignoring resume while {:?}", session.status);
            return;
        }
        self.platform.show_screen(Screen::Playing);
        self.platform.set_music(true);
        self.schedule();
    }

    pub fn toggle_pause(&mut self, now: f64) {
        match self.phase() {
            GamePhase::Running => self.pause(now),
            GamePhase::Paused => self.resume(now),
            _ => {}
        }
    }

    /// Key listener entry point
    pub fn key_down(&mut self, key: Key, now: f64) {
        match key {
            Key::Pause => self.toggle_pause(now),
            _ => self.input.press(key),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.release(key);
    }

    /// Frame callback for `handle` at external timestamp `now`
    pub fn on_frame(&mut self, handle: FrameHandle, now: f64) {
        if self.pending != Some(handle) {
            log::debug!("Dropping stale frame {:?}", handle);
            return;
        }
        self.pending = None;

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let input = self.input.take_frame();
        let events = tick(session, &input, now);

        let platform = &mut self.platform;
        for event in &events {
            match event {
                GameEvent::Fired { .. } => platform.play_sound(SoundEffect::Fire),
                GameEvent::AsteroidDestroyed { .. } => platform.play_sound(SoundEffect::Explosion),
                GameEvent::PowerUpCollected { .. } => platform.play_sound(SoundEffect::Pickup),
                GameEvent::GameOver { .. } => platform.play_sound(SoundEffect::GameOver),
                GameEvent::AutoFireExpired | GameEvent::DifficultyScaled { .. } => {}
            }
        }

        for sprite in session.store.sprites() {
            platform.draw_sprite(&sprite);
        }
        platform.set_score_text(&score_text(session.score));
        platform.finish_frame();

        if session.status == SessionStatus::Over {
            platform.set_music(false);
            platform.show_screen(Screen::GameOver {
                score: session.score,
            });
            return;
        }
        self.schedule();
    }

    fn schedule(&mut self) {
        self.cancel_pending();
        self.pending = Some(self.platform.request_frame());
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.platform.cancel_frame(handle);
        }
    }
}

/// Live score line
pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

/// End-of-game score line
pub fn final_score_text(score: u64) -> String {
    format!("Your Score: {}", score)
}
