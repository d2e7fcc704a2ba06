//! Difficulty tiers and time-based scaling
//!
//! Every `scale_cadence_ms` of running time the spawn multiplier grows by
//! [`DIFFICULTY_STEP`], shrinking the spawn interval toward
//! [`MIN_SPAWN_INTERVAL_MS`]. The high tier also speeds asteroids up.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DIFFICULTY_STEP, MIN_SPAWN_INTERVAL_MS};
use crate::error::ConfigError;

/// Preset difficulty selected at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tier {
    Low,
    #[default]
    Mid,
    High,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Mid => "mid",
            Tier::High => "high",
        }
    }

    /// Spawn interval before any scaling (milliseconds)
    pub fn base_spawn_interval_ms(&self) -> f64 {
        match self {
            Tier::Low => 1500.0,
            Tier::Mid => 1000.0,
            Tier::High => 500.0,
        }
    }

    /// Default time between difficulty steps (milliseconds)
    pub fn scale_cadence_ms(&self) -> f64 {
        match self {
            Tier::Low => 15_000.0,
            Tier::Mid => 10_000.0,
            Tier::High => 5_000.0,
        }
    }

    /// Whether difficulty steps also raise asteroid speed
    pub fn scales_speed(&self) -> bool {
        *self == Tier::High
    }
}

impl FromStr for Tier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "easy" => Ok(Tier::Low),
            "mid" | "medium" => Ok(Tier::Mid),
            "high" | "hard" => Ok(Tier::High),
            _ => Err(ConfigError::UnknownTier(s.to_string())),
        }
    }
}

impl TryFrom<String> for Tier {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        tier.as_str().to_string()
    }
}

/// Live spawn-rate and speed scaling for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub tier: Tier,
    pub base_interval_ms: f64,
    pub scale_cadence_ms: f64,
    pub spawn_multiplier: f64,
    /// Only ever moves on the high tier
    pub speed_multiplier: f64,
    /// `max(MIN_SPAWN_INTERVAL_MS, base_interval_ms / spawn_multiplier)`
    pub current_interval_ms: f64,
    /// Session time of the last scaling step (or session start)
    pub last_scale_ms: f64,
}

impl DifficultyProfile {
    pub fn new(tier: Tier) -> Self {
        Self::with_cadence(tier, tier.scale_cadence_ms())
    }

    pub fn with_cadence(tier: Tier, scale_cadence_ms: f64) -> Self {
        let base = tier.base_spawn_interval_ms();
        Self {
            tier,
            base_interval_ms: base,
            scale_cadence_ms,
            spawn_multiplier: 1.0,
            speed_multiplier: 1.0,
            current_interval_ms: base,
            last_scale_ms: 0.0,
        }
    }

    /// Speed factor applied to freshly spawned asteroids
    pub fn effective_speed_multiplier(&self) -> f64 {
        if self.tier.scales_speed() {
            self.speed_multiplier
        } else {
            1.0
        }
    }

    /// Apply one difficulty step if a full cadence has elapsed.
    ///
    /// Returns true when a step was applied.
    pub fn maybe_scale(&mut self, now: f64) -> bool {
        if now - self.last_scale_ms < self.scale_cadence_ms {
            return false;
        }
        self.last_scale_ms = now;

        self.spawn_multiplier += DIFFICULTY_STEP;
        self.current_interval_ms =
            (self.base_interval_ms / self.spawn_multiplier).max(MIN_SPAWN_INTERVAL_MS);
        if self.tier.scales_speed() {
            self.speed_multiplier += DIFFICULTY_STEP;
        }

        log::debug!(
            "Difficulty step ({}): spawn x{:.1}, interval {:.0} ms, speed x{:.1}",
            self.tier.as_str(),
            self.spawn_multiplier,
            self.current_interval_ms,
            self.speed_multiplier
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_aliases() {
        assert_eq!("easy".parse::<Tier>().unwrap(), Tier::Low);
        assert_eq!("Medium".parse::<Tier>().unwrap(), Tier::Mid);
        assert_eq!(" HARD ".parse::<Tier>().unwrap(), Tier::High);
        assert_eq!(
            "extreme".parse::<Tier>(),
            Err(ConfigError::UnknownTier("extreme".into()))
        );
    }

    #[test]
    fn test_tier_serde_round_trip() {
        let json = serde_json::to_string(&Tier::High).unwrap();
        assert_eq!(json, "\"high\"");
        assert_eq!(serde_json::from_str::<Tier>("\"easy\"").unwrap(), Tier::Low);
        assert!(serde_json::from_str::<Tier>("\"extreme\"").is_err());
    }

    #[test]
    fn test_no_step_before_cadence() {
        let mut profile = DifficultyProfile::new(Tier::Mid);
        assert!(!profile.maybe_scale(9_999.0));
        assert_eq!(profile.spawn_multiplier, 1.0);
        assert_eq!(profile.current_interval_ms, 1000.0);
    }

    #[test]
    fn test_mid_tier_step() {
        let mut profile = DifficultyProfile::new(Tier::Mid);
        assert!(profile.maybe_scale(10_000.0));
        assert!((profile.spawn_multiplier - 1.2).abs() < 1e-9);
        assert!((profile.current_interval_ms - 1000.0 / 1.2).abs() < 1e-9);
        // Speed only scales on the high tier
        assert_eq!(profile.speed_multiplier, 1.0);
        assert_eq!(profile.effective_speed_multiplier(), 1.0);

        // Next step measured from the last one
        assert!(!profile.maybe_scale(19_999.0));
        assert!(profile.maybe_scale(20_000.0));
    }

    #[test]
    fn test_high_tier_scales_speed() {
        let mut profile = DifficultyProfile::new(Tier::High);
        assert!(profile.maybe_scale(5_000.0));
        assert!(profile.maybe_scale(10_000.0));
        assert!((profile.speed_multiplier - 1.4).abs() < 1e-9);
        assert!((profile.effective_speed_multiplier() - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_interval_floor() {
        let mut profile = DifficultyProfile::new(Tier::High);
        let mut now = 0.0;
        let mut last = profile.current_interval_ms;
        for _ in 0..50 {
            now += profile.scale_cadence_ms;
            profile.maybe_scale(now);
            assert!(profile.current_interval_ms <= last);
            assert!(profile.current_interval_ms >= MIN_SPAWN_INTERVAL_MS);
            last = profile.current_interval_ms;
        }
        assert_eq!(profile.current_interval_ms, MIN_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_custom_cadence() {
        let mut profile = DifficultyProfile::with_cadence(Tier::Low, 1_000.0);
        assert!(profile.maybe_scale(1_000.0));
        assert!((profile.current_interval_ms - 1500.0 / 1.2).abs() < 1e-9);
    }
}
