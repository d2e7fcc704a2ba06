//! Auto-fire power-up
//!
//! Expiry and the auto-fire cadence are polled against session time every
//! frame; nothing is scheduled. Picking up another power-up while the buff
//! is running does not extend it.

use serde::{Deserialize, Serialize};

use crate::consts::{AUTO_FIRE_DURATION_MS, AUTO_FIRE_INTERVAL_MS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoFire {
    active: bool,
    expiry_ms: Option<f64>,
    /// Session time of the last automatic volley
    last_shot_ms: Option<f64>,
    pub duration_ms: f64,
    pub interval_ms: f64,
}

impl Default for AutoFire {
    fn default() -> Self {
        Self::new(AUTO_FIRE_DURATION_MS, AUTO_FIRE_INTERVAL_MS)
    }
}

impl AutoFire {
    pub fn new(duration_ms: f64, interval_ms: f64) -> Self {
        Self {
            active: false,
            expiry_ms: None,
            last_shot_ms: None,
            duration_ms,
            interval_ms,
        }
    }

    /// True iff activated and `now` is before the expiry deadline
    pub fn is_active(&self, now: f64) -> bool {
        self.active && self.expiry_ms.is_some_and(|expiry| now < expiry)
    }

    pub fn expiry_ms(&self) -> Option<f64> {
        self.expiry_ms
    }

    /// Start the buff. Returns false (and changes nothing) if already running.
    pub fn activate(&mut self, now: f64) -> bool {
        if self.is_active(now) {
            return false;
        }
        self.active = true;
        self.expiry_ms = Some(now + self.duration_ms);
        self.last_shot_ms = None;
        log::info!("Auto-fire active until {:.0} ms", now + self.duration_ms);
        true
    }

    /// Deactivate once the deadline has passed. Returns true on expiry.
    pub fn tick(&mut self, now: f64) -> bool {
        if !self.active || self.is_active(now) {
            return false;
        }
        self.active = false;
        self.expiry_ms = None;
        self.last_shot_ms = None;
        log::info!("Auto-fire expired");
        true
    }

    /// Whether an automatic volley is due this frame (records it if so).
    ///
    /// The first volley after activation fires immediately.
    pub fn volley_due(&mut self, now: f64) -> bool {
        if !self.is_active(now) {
            return false;
        }
        let due = self
            .last_shot_ms
            .is_none_or(|last| now - last > self.interval_ms);
        if due {
            self.last_shot_ms = Some(now);
        }
        due
    }
}
