//! Session clock
//!
//! Converts external frame timestamps (milliseconds, monotonically
//! increasing) into session time: milliseconds since the session started,
//! not counting any time spent paused. Every timer in the simulation reads
//! session time, so a pause freezes all of them at once.

use serde::{Deserialize, Serialize};

/// Session time resolution
const MICROS_PER_MS: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClock {
    /// External timestamp at session start
    origin_ms: f64,
    /// Total external time spent paused
    paused_total_ms: f64,
    /// External timestamp of the pause in progress, if any
    paused_at_ms: Option<f64>,
}

impl SessionClock {
    pub fn start(now: f64) -> Self {
        Self {
            origin_ms: now,
            paused_total_ms: 0.0,
            paused_at_ms: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at_ms.is_some()
    }

    /// Whole microseconds of session time for an external timestamp.
    ///
    /// The paused total is folded in before a single rounding step, so the
    /// same frame lands on the same microsecond with or without a pause in
    /// between. While paused, time stays frozen at the moment of the pause.
    pub fn session_micros(&self, now: f64) -> i64 {
        let now = self.paused_at_ms.unwrap_or(now);
        let elapsed = now - self.origin_ms - self.paused_total_ms;
        (elapsed * MICROS_PER_MS).round().max(0.0) as i64
    }

    /// Session time in milliseconds, quantized to whole microseconds
    pub fn session_time(&self, now: f64) -> f64 {
        self.session_micros(now) as f64 / MICROS_PER_MS
    }

    pub fn pause(&mut self, now: f64) {
        if self.paused_at_ms.is_none() {
            self.paused_at_ms = Some(now);
        }
    }

    /// Resume, discarding the paused span
    pub fn resume(&mut self, now: f64) {
        if let Some(paused_at) = self.paused_at_ms.take() {
            self.paused_total_ms += (now - paused_at).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_time_from_origin() {
        let clock = SessionClock::start(5_000.0);
        assert_eq!(clock.session_time(5_000.0), 0.0);
        assert_eq!(clock.session_time(5_016.0), 16.0);
    }

    #[test]
    fn test_pause_excludes_span() {
        let mut clock = SessionClock::start(0.0);
        clock.pause(100.0);
        assert!(clock.is_paused());
        assert_eq!(clock.session_time(9_000.0), 100.0);

        clock.resume(3_100.0);
        assert!(!clock.is_paused());
        assert_eq!(clock.session_time(3_116.0), 116.0);

        // Second pause accumulates
        clock.pause(3_200.0);
        clock.resume(4_200.0);
        assert_eq!(clock.session_time(4_300.0), 300.0);
    }

    #[test]
    fn test_double_pause_keeps_first_timestamp() {
        let mut clock = SessionClock::start(0.0);
        clock.pause(100.0);
        clock.pause(200.0);
        clock.resume(300.0);
        assert_eq!(clock.session_time(300.0), 100.0);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut clock = SessionClock::start(0.0);
        clock.resume(1_000.0);
        assert_eq!(clock.session_time(1_000.0), 1_000.0);
    }

    #[test]
    fn test_quantized_to_microseconds() {
        let clock = SessionClock::start(0.0);
        assert_eq!(clock.session_micros(1000.0 / 60.0), 16_667);
        assert_eq!(clock.session_time(1000.0 / 60.0), 16.667);
        assert_eq!(clock.session_micros(-5.0), 0);
    }

    #[test]
    fn test_fractional_pause_matches_straight_run() {
        let frame_ms = 1000.0 / 60.0;
        let origin = 1234.567;
        let straight = SessionClock::start(origin);

        for gap in [0.1, 7.77, 1234.5678, 99_999.123] {
            for n in [3_u32, 61, 250, 997] {
                let t_n = origin + n as f64 * frame_ms;
                let mut paused = SessionClock::start(origin);
                paused.pause(t_n + 3.3);
                paused.resume(t_n + 3.3 + gap);

                for k in 1..=60 {
                    let t = origin + (n + k) as f64 * frame_ms;
                    assert_eq!(
                        paused.session_micros(t + gap),
                        straight.session_micros(t),
                        "gap {} frame {}",
                        gap,
                        n + k
                    );
                }
            }
        }
    }
}
