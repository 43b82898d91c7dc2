//! Tunables for the whole simulation.
//!
//! Defaults are the shipped game's values. Every section deserializes from
//! JSON with all fields optional, then `SimConfig::validate` rejects anything
//! that would break the per-tick invariants. Validation happens once, at
//! construction; ticks never fail.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::LocomotionMode;

/// Construction-time configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be a finite, non-negative number (got {value})")]
    NotNonNegative { field: &'static str, value: f32 },

    #[error("`{field}` must be a finite, positive number (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("detection threshold {threshold} exceeds max suspicion {max}")]
    ThresholdAboveMax { threshold: f32, max: f32 },

    #[error("chase abandon radius {abandon} is shorter than detection range {range}")]
    AbandonInsideRange { abandon: f32, range: f32 },

    #[error("invalid locomotion mode: {0}")]
    Locomotion(String),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotNonNegative { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Units/second while walking.
    pub walk_speed: f32,
    /// Units/second while sprinting with stamina left.
    pub run_speed: f32,
    /// Speed multiplier while crouched.
    pub crouch_factor: f32,
    pub max_stamina: f32,
    /// Stamina/second spent while sprinting and moving.
    pub stamina_drain_rate: f32,
    /// Stamina/second recovered otherwise.
    pub stamina_regen_rate: f32,
    pub max_health: f32,
    /// Half size of the collision footprint in plan coordinates.
    pub half_extents: Vec2,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 120.0,
            run_speed: 240.0,
            crouch_factor: 0.5,
            max_stamina: 100.0,
            stamina_drain_rate: 15.0,
            stamina_regen_rate: 10.0,
            max_health: 100.0,
            half_extents: Vec2::splat(12.0),
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("player.walk_speed", self.walk_speed)?;
        non_negative("player.run_speed", self.run_speed)?;
        non_negative("player.crouch_factor", self.crouch_factor)?;
        positive("player.max_stamina", self.max_stamina)?;
        non_negative("player.stamina_drain_rate", self.stamina_drain_rate)?;
        non_negative("player.stamina_regen_rate", self.stamina_regen_rate)?;
        positive("player.max_health", self.max_health)?;
        non_negative("player.half_extents.x", self.half_extents.x)?;
        non_negative("player.half_extents.y", self.half_extents.y)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NPC
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Default vision range, overridable per NPC in level data.
    pub detection_range: f32,
    /// Default full field of view in degrees.
    pub detection_angle: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Alert level at which an NPC drops everything and chases.
    pub alert_threshold: f32,
    /// Alert/second lost while the player is out of sight.
    pub alert_decay_rate: f32,
    /// A chasing NPC gives up beyond this distance.
    pub chase_abandon_radius: f32,
    /// Seconds spent idling at each waypoint.
    pub idle_duration: f32,
    /// Distance below which a waypoint counts as reached.
    pub arrival_epsilon: f32,
    /// Fraction of `alert_threshold` at which an NPC reads as suspicious.
    pub suspicious_fraction: f32,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            detection_range: 200.0,
            detection_angle: 90.0,
            patrol_speed: 80.0,
            chase_speed: 150.0,
            alert_threshold: 30.0,
            alert_decay_rate: 5.0,
            chase_abandon_radius: 300.0,
            idle_duration: 3.0,
            arrival_epsilon: 1.0,
            suspicious_fraction: 0.5,
        }
    }
}

impl NpcConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("npc.detection_range", self.detection_range)?;
        non_negative("npc.detection_angle", self.detection_angle)?;
        non_negative("npc.patrol_speed", self.patrol_speed)?;
        non_negative("npc.chase_speed", self.chase_speed)?;
        positive("npc.alert_threshold", self.alert_threshold)?;
        non_negative("npc.alert_decay_rate", self.alert_decay_rate)?;
        non_negative("npc.chase_abandon_radius", self.chase_abandon_radius)?;
        non_negative("npc.idle_duration", self.idle_duration)?;
        positive("npc.arrival_epsilon", self.arrival_epsilon)?;
        non_negative("npc.suspicious_fraction", self.suspicious_fraction)?;
        if self.chase_abandon_radius < self.detection_range {
            return Err(ConfigError::AbandonInsideRange {
                abandon: self.chase_abandon_radius,
                range: self.detection_range,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stealth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StealthConfig {
    pub max_suspicion: f32,
    /// Suspicion/second lost while nobody is chasing.
    pub suspicion_decay_rate: f32,
    /// At or above this the player counts as spotted.
    pub detection_threshold: f32,
    /// Per-second gain, used both for a chasing NPC's suspicion credit and
    /// for an NPC's alert build-up while it sees the player.
    pub suspicion_increase_base: f32,
}

impl Default for StealthConfig {
    fn default() -> Self {
        Self {
            max_suspicion: 100.0,
            suspicion_decay_rate: 5.0,
            detection_threshold: 75.0,
            suspicion_increase_base: 10.0,
        }
    }
}

impl StealthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("stealth.max_suspicion", self.max_suspicion)?;
        non_negative("stealth.suspicion_decay_rate", self.suspicion_decay_rate)?;
        non_negative("stealth.detection_threshold", self.detection_threshold)?;
        non_negative("stealth.suspicion_increase_base", self.suspicion_increase_base)?;
        if self.detection_threshold > self.max_suspicion {
            return Err(ConfigError::ThresholdAboveMax {
                threshold: self.detection_threshold,
                max: self.max_suspicion,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Whole simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub player: PlayerConfig,
    pub npc: NpcConfig,
    pub stealth: StealthConfig,
    pub locomotion: LocomotionMode,
    /// Largest dt ever handed to a component (seconds).
    pub max_dt: f32,
    /// How close an NPC must be for the interact command to target it.
    pub interact_range: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            npc: NpcConfig::default(),
            stealth: StealthConfig::default(),
            locomotion: LocomotionMode::default(),
            max_dt: 0.1,
            interact_range: 60.0,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.validate()?;
        self.npc.validate()?;
        self.stealth.validate()?;
        self.locomotion.validate()?;
        positive("max_dt", self.max_dt)?;
        non_negative("interact_range", self.interact_range)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "npc": { "chase_speed": 200.0 } }"#).unwrap();
        assert_eq!(config.npc.chase_speed, 200.0);
        assert_eq!(config.npc.patrol_speed, 80.0);
        assert_eq!(config.stealth.max_suspicion, 100.0);
    }

    #[test]
    fn negative_speed_fails_fast() {
        let mut config = SimConfig::default();
        config.player.walk_speed = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotNonNegative { field: "player.walk_speed", .. })
        ));
    }

    #[test]
    fn nan_range_fails_fast() {
        let mut config = SimConfig::default();
        config.npc.detection_range = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn threshold_above_max_rejected() {
        let mut config = SimConfig::default();
        config.stealth.detection_threshold = 150.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdAboveMax { .. })
        ));
    }

    #[test]
    fn abandon_radius_must_cover_detection_range() {
        let mut config = SimConfig::default();
        config.npc.chase_abandon_radius = 100.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AbandonInsideRange { .. })
        ));
    }

    #[test]
    fn unknown_locomotion_mode_is_a_config_error() {
        let err = SimConfig::from_json(r#"{ "locomotion": { "mode": "swimming" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn platform_mode_parses() {
        let config = SimConfig::from_json(
            r#"{ "locomotion": { "mode": "platform", "gravity": 900.0, "ground_level": 500.0 } }"#,
        )
        .unwrap();
        match config.locomotion {
            LocomotionMode::Platform {
                gravity,
                ground_level,
                jump_impulse,
            } => {
                assert_eq!(gravity, 900.0);
                assert_eq!(ground_level, 500.0);
                assert_eq!(jump_impulse, -400.0);
            }
            other => panic!("expected platform mode, got {other:?}"),
        }
    }
}
