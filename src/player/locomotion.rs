use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::input::InputCommand;
use crate::spatial::normalize_angle;

fn default_eye_height() -> f32 {
    160.0
}
fn default_gravity() -> f32 {
    1200.0
}
fn default_ground_level() -> f32 {
    600.0
}
fn default_jump_impulse() -> f32 {
    -400.0
}

/// How the player's velocity is integrated. Stamina, health and collision
/// are shared; only the velocity step differs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LocomotionMode {
    /// First-person, camera-relative movement on the (x, z) plane.
    /// y holds a fixed eye height.
    FreeRoam {
        #[serde(default = "default_eye_height")]
        eye_height: f32,
    },
    /// Side view on the (x, y) plane, y pointing down. Gravity pulls toward
    /// +y, `jump_impulse` is negative (upward).
    Platform {
        #[serde(default = "default_gravity")]
        gravity: f32,
        #[serde(default = "default_ground_level")]
        ground_level: f32,
        #[serde(default = "default_jump_impulse")]
        jump_impulse: f32,
    },
}

impl Default for LocomotionMode {
    fn default() -> Self {
        LocomotionMode::FreeRoam {
            eye_height: default_eye_height(),
        }
    }
}

impl LocomotionMode {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            LocomotionMode::FreeRoam { eye_height } => {
                if !eye_height.is_finite() {
                    return Err(ConfigError::Locomotion(format!(
                        "free-roam eye height must be finite (got {eye_height})"
                    )));
                }
            }
            LocomotionMode::Platform {
                gravity,
                ground_level,
                jump_impulse,
            } => {
                if !(gravity.is_finite() && gravity > 0.0) {
                    return Err(ConfigError::Locomotion(format!(
                        "platform gravity must be positive (got {gravity})"
                    )));
                }
                if !ground_level.is_finite() {
                    return Err(ConfigError::Locomotion(format!(
                        "platform ground level must be finite (got {ground_level})"
                    )));
                }
                if !(jump_impulse.is_finite() && jump_impulse < 0.0) {
                    return Err(ConfigError::Locomotion(format!(
                        "platform jump impulse must be negative (upward), got {jump_impulse}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_platform(&self) -> bool {
        matches!(self, LocomotionMode::Platform { .. })
    }

    /// Project a full position onto the plan used by perception and collision.
    pub fn plan(&self, position: Vec3) -> Vec2 {
        match self {
            LocomotionMode::FreeRoam { .. } => Vec2::new(position.x, position.z),
            LocomotionMode::Platform { .. } => Vec2::new(position.x, position.y),
        }
    }

    /// The component `plan` drops.
    pub fn rest(&self, position: Vec3) -> f32 {
        match self {
            LocomotionMode::FreeRoam { .. } => position.y,
            LocomotionMode::Platform { .. } => position.z,
        }
    }

    /// Lift a plan position back to a full position, keeping `rest` for the
    /// axis the plan drops.
    pub fn lift(&self, plan: Vec2, rest: f32) -> Vec3 {
        match self {
            LocomotionMode::FreeRoam { .. } => Vec3::new(plan.x, rest, plan.y),
            LocomotionMode::Platform { .. } => Vec3::new(plan.x, plan.y, rest),
        }
    }

    /// Where a fresh player stands given a plan spawn point.
    pub fn spawn_position(&self, plan: Vec2) -> Vec3 {
        match *self {
            LocomotionMode::FreeRoam { eye_height } => Vec3::new(plan.x, eye_height, plan.y),
            LocomotionMode::Platform { .. } => Vec3::new(plan.x, plan.y, 0.0),
        }
    }

    /// Plan-space unit direction of travel requested by `cmd`, given the
    /// current heading. Length is at most 1, so analog axes keep their scale
    /// and diagonals are not faster.
    pub fn desired_direction(&self, cmd: &InputCommand, heading: f32) -> Vec2 {
        match self {
            LocomotionMode::FreeRoam { .. } => {
                let forward = Vec2::from_angle(heading);
                let right = forward.perp();
                (forward * cmd.forward + right * cmd.strafe).clamp_length_max(1.0)
            }
            LocomotionMode::Platform { .. } => Vec2::new(cmd.strafe.clamp(-1.0, 1.0), 0.0),
        }
    }

    /// Apply this tick's look input. Only free-roam turns the camera.
    pub fn turn(&self, heading: f32, yaw_delta: f32) -> f32 {
        match self {
            LocomotionMode::FreeRoam { .. } => normalize_angle(heading + yaw_delta),
            LocomotionMode::Platform { .. } => heading,
        }
    }

    /// Heading after moving in `dir`. Platform mode faces the way it last
    /// walked; free-roam keeps the camera heading.
    pub fn face(&self, heading: f32, dir: Vec2) -> f32 {
        match self {
            LocomotionMode::FreeRoam { .. } => heading,
            LocomotionMode::Platform { .. } => {
                if dir.x > 0.0 {
                    0.0
                } else if dir.x < 0.0 {
                    std::f32::consts::PI
                } else {
                    heading
                }
            }
        }
    }
}
