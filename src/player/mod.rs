//! Player locomotion and resources.
//!
//! `PlayerController` owns the only `PlayerState`. Input is recorded with
//! `apply_input` and integrated once per `tick`:
//!
//! 1. speed selection and desired velocity (mode-specific basis)
//! 2. platform gravity / jump
//! 3. position integration
//! 4. collision: any overlap rejects the whole move, no sliding
//! 5. stamina drain or regen

mod locomotion;

pub use locomotion::LocomotionMode;

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::config::{ConfigError, PlayerConfig};
use crate::input::InputCommand;
use crate::spatial::Aabb;

/// Minimum distance below the footprint checked for an obstacle to stand on.
const SUPPORT_PROBE: f32 = 1.0;

/// Position plus yaw. Heading is kept in (-PI, PI].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub position: Vec3,
    pub heading: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerState {
    pub pose: Pose,
    pub velocity: Vec3,
    pub health: f32,
    pub stamina: f32,
    pub sprinting: bool,
    pub crouching: bool,
    pub grounded: bool,
}

pub struct PlayerController {
    config: PlayerConfig,
    mode: LocomotionMode,
    state: PlayerState,
    intent: InputCommand,
    jump_queued: bool,
    /// Set while standing on an obstacle top: the fall that was rejected
    /// when landing, i.e. the most the footprint can hover above it.
    support_gap: Option<f32>,
    obstacles: Vec<Aabb>,
}

impl PlayerController {
    /// Fails on an invalid config or locomotion mode; ticks never fail.
    pub fn new(
        config: PlayerConfig,
        mode: LocomotionMode,
        spawn: Vec2,
        obstacles: Vec<Aabb>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        mode.validate()?;

        let mut controller = Self {
            config,
            mode,
            state: PlayerState {
                pose: Pose {
                    position: mode.spawn_position(spawn),
                    heading: 0.0,
                },
                velocity: Vec3::ZERO,
                health: config.max_health,
                stamina: config.max_stamina,
                sprinting: false,
                crouching: false,
                grounded: true,
            },
            intent: InputCommand::default(),
            jump_queued: false,
            support_gap: None,
            obstacles,
        };
        if let LocomotionMode::Platform { ground_level, .. } = mode {
            controller.state.grounded = spawn.y >= ground_level;
        }
        Ok(controller)
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn mode(&self) -> &LocomotionMode {
        &self.mode
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Position on the plan NPCs perceive.
    pub fn plan_position(&self) -> Vec2 {
        self.mode.plan(self.state.pose.position)
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.state.pose.heading = crate::spatial::normalize_angle(heading);
    }

    pub fn health_fraction(&self) -> f32 {
        self.state.health / self.config.max_health
    }

    pub fn stamina_fraction(&self) -> f32 {
        self.state.stamina / self.config.max_stamina
    }

    /// Record intent for the next tick.
    pub fn apply_input(&mut self, cmd: &InputCommand) {
        let cmd = cmd.sanitized();

        // Held sprint runs whenever there is stamina left; `tick` clears it
        // when stamina hits zero.
        self.state.sprinting = cmd.sprint && self.state.stamina > 0.0;
        self.state.crouching = cmd.crouch;
        if cmd.jump {
            self.jump_queued = true;
        }
        self.intent = cmd;
    }

    /// Platform mode only: launch upward if standing on something.
    pub fn jump(&mut self) -> bool {
        match self.mode {
            LocomotionMode::Platform { jump_impulse, .. } if self.state.grounded => {
                self.state.velocity.y = jump_impulse;
                self.state.grounded = false;
                self.support_gap = None;
                true
            }
            _ => false,
        }
    }

    /// Speed the next tick would move at.
    pub fn current_speed(&self) -> f32 {
        let mut speed = if self.state.sprinting && self.state.stamina > 0.0 {
            self.config.run_speed
        } else {
            self.config.walk_speed
        };
        if self.state.crouching {
            speed *= self.config.crouch_factor;
        }
        speed
    }

    /// Integrate one frame.
    pub fn tick(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let cmd = self.intent;
        let mode = self.mode;

        // 1. Desired velocity
        let heading = mode.turn(self.state.pose.heading, cmd.turn);
        let dir = mode.desired_direction(&cmd, heading);
        self.state.pose.heading = mode.face(heading, dir);
        let planar = dir * self.current_speed();

        let start = self.plan_position();
        let rest = mode.rest(self.state.pose.position);

        // 2. Vertical (platform only)
        match mode {
            LocomotionMode::FreeRoam { .. } => {
                self.state.velocity = Vec3::new(planar.x, 0.0, planar.y);
            }
            LocomotionMode::Platform { gravity, .. } => {
                self.state.velocity.x = planar.x;
                self.state.velocity.z = 0.0;
                if std::mem::take(&mut self.jump_queued) {
                    self.jump();
                }
                if self.state.grounded && self.state.velocity.y >= 0.0 {
                    self.state.velocity.y = 0.0;
                } else {
                    self.state.velocity.y += gravity * dt;
                }
            }
        }
        self.jump_queued = false;

        // 3. Integrate
        let mut plan_velocity = mode.plan(self.state.velocity);
        let delta = plan_velocity * dt;
        let mut next = start + delta;

        // 4. Collide. Already overlapping (bad spawn) may move freely so it
        // can get out.
        let mut landed_on = None;
        if self.blocked(next) && !self.blocked(start) {
            let hit_x = self.blocked(start + Vec2::new(delta.x, 0.0));
            let hit_y = self.blocked(start + Vec2::new(0.0, delta.y));
            let (zero_x, zero_y) = if hit_x || hit_y {
                (hit_x, hit_y)
            } else {
                (true, true)
            };
            if zero_x {
                plan_velocity.x = 0.0;
            }
            if zero_y {
                plan_velocity.y = 0.0;
                if mode.is_platform() && delta.y > 0.0 {
                    landed_on = Some(delta.y);
                }
            }
            next = start;
            let kept = mode.lift(plan_velocity, mode.rest(self.state.velocity));
            self.state.velocity = kept;
        }

        if let LocomotionMode::Platform { ground_level, .. } = mode {
            let on_ground = next.y >= ground_level;
            if on_ground {
                next.y = ground_level;
                if self.state.velocity.y > 0.0 {
                    self.state.velocity.y = 0.0;
                }
            }
            if landed_on.is_some() {
                self.support_gap = landed_on;
            } else if let Some(gap) = self.support_gap {
                // Walked off the edge?
                if !self.blocked(next + Vec2::new(0.0, gap.max(SUPPORT_PROBE))) {
                    self.support_gap = None;
                }
            }
            self.state.grounded =
                self.state.velocity.y >= 0.0 && (on_ground || self.support_gap.is_some());
        }
        self.state.pose.position = mode.lift(next, rest);
        self.intent.turn = 0.0;

        // 5. Stamina
        let moving = match mode {
            LocomotionMode::FreeRoam { .. } => mode.plan(self.state.velocity) != Vec2::ZERO,
            LocomotionMode::Platform { .. } => self.state.velocity.x != 0.0,
        };
        if self.state.sprinting && moving {
            self.state.stamina -= self.config.stamina_drain_rate * dt;
            if self.state.stamina <= 0.0 {
                self.state.stamina = 0.0;
                self.state.sprinting = false;
                log::debug!("Player out of stamina, sprint released");
            }
        } else {
            self.state.stamina += self.config.stamina_regen_rate * dt;
        }
        self.state.stamina = self.state.stamina.clamp(0.0, self.config.max_stamina);
    }

    pub fn take_damage(&mut self, amount: f32) {
        let amount = amount.max(0.0);
        self.state.health = (self.state.health - amount).clamp(0.0, self.config.max_health);
    }

    pub fn heal(&mut self, amount: f32) {
        let amount = amount.max(0.0);
        self.state.health = (self.state.health + amount).clamp(0.0, self.config.max_health);
    }

    fn footprint(&self, plan: Vec2) -> Aabb {
        Aabb::from_center(plan, self.config.half_extents)
    }

    fn blocked(&self, plan: Vec2) -> bool {
        let footprint = self.footprint(plan);
        self.obstacles.iter().any(|o| o.intersects(&footprint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    fn free_roam(obstacles: Vec<Aabb>) -> PlayerController {
        PlayerController::new(
            PlayerConfig::default(),
            LocomotionMode::default(),
            Vec2::ZERO,
            obstacles,
        )
        .unwrap()
    }

    fn platform(obstacles: Vec<Aabb>) -> PlayerController {
        PlayerController::new(
            PlayerConfig::default(),
            LocomotionMode::Platform {
                gravity: 1200.0,
                ground_level: 600.0,
                jump_impulse: -400.0,
            },
            Vec2::new(0.0, 600.0),
            obstacles,
        )
        .unwrap()
    }

    fn forward() -> InputCommand {
        InputCommand {
            forward: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn walks_at_walk_speed() {
        let mut p = free_roam(vec![]);
        p.apply_input(&forward());
        p.tick(DT);
        assert!((p.plan_position().x - 12.0).abs() < 1e-4);
        assert_eq!(p.state().pose.position.y, 160.0);
    }

    #[test]
    fn sprint_and_crouch_pick_speed() {
        let mut p = free_roam(vec![]);
        p.apply_input(&InputCommand {
            sprint: true,
            ..forward()
        });
        assert_eq!(p.current_speed(), 240.0);

        p.apply_input(&InputCommand {
            sprint: true,
            crouch: true,
            ..forward()
        });
        assert_eq!(p.current_speed(), 120.0);

        p.apply_input(&InputCommand {
            crouch: true,
            ..forward()
        });
        assert_eq!(p.current_speed(), 60.0);
    }

    #[test]
    fn sprinting_drains_then_auto_clears() {
        let mut p = free_roam(vec![]);
        let sprint = InputCommand {
            sprint: true,
            ..forward()
        };
        p.apply_input(&sprint);
        p.tick(1.0);
        assert!((p.state().stamina - 85.0).abs() < 1e-4);

        for _ in 0..6 {
            p.apply_input(&sprint);
            p.tick(1.0);
        }
        assert_eq!(p.state().stamina, 0.0);
        assert!(!p.state().sprinting);
        assert_eq!(p.current_speed(), 120.0);

        // Empty tank: holding the key does not sprint.
        p.apply_input(&sprint);
        assert!(!p.state().sprinting);
    }

    #[test]
    fn held_sprint_resumes_after_regen() {
        let mut p = free_roam(vec![]);
        let sprint = InputCommand {
            sprint: true,
            ..forward()
        };
        let mut ticks = 0;
        while p.state().stamina > 0.0 && ticks < 200 {
            p.apply_input(&sprint);
            p.tick(DT);
            ticks += 1;
        }
        assert_eq!(p.state().stamina, 0.0);
        assert!(!p.state().sprinting);

        // Keep the key down while standing still.
        let hold = InputCommand {
            sprint: true,
            ..Default::default()
        };
        for _ in 0..20 {
            p.apply_input(&hold);
            p.tick(DT);
        }
        assert!((p.state().stamina - 20.0).abs() < 1e-3);

        p.apply_input(&sprint);
        assert!(p.state().sprinting);
        assert_eq!(p.current_speed(), 240.0);
    }

    #[test]
    fn sprint_without_movement_regenerates() {
        let mut p = free_roam(vec![]);
        p.apply_input(&InputCommand {
            sprint: true,
            ..forward()
        });
        p.tick(2.0);
        let after_run = p.state().stamina;
        p.apply_input(&InputCommand {
            sprint: true,
            ..Default::default()
        });
        p.tick(1.0);
        assert!(p.state().stamina > after_run);
        assert!(p.state().stamina <= 100.0);
    }

    #[test]
    fn regen_clamps_at_max() {
        let mut p = free_roam(vec![]);
        p.tick(50.0);
        assert_eq!(p.state().stamina, 100.0);
    }

    #[test]
    fn obstacle_rejects_whole_move() {
        // Wall just ahead; any forward step overlaps it.
        let wall = Aabb::new(Vec2::new(13.0, -50.0), Vec2::new(40.0, 50.0));
        let mut p = free_roam(vec![wall]);
        let before = p.state().pose.position;
        p.apply_input(&InputCommand {
            forward: 1.0,
            strafe: 1.0,
            ..Default::default()
        });
        p.tick(DT);
        assert_eq!(p.state().pose.position, before);
        // Only the blocked axis loses its velocity.
        assert_eq!(p.state().velocity.x, 0.0);
        assert!(p.state().velocity.z > 0.0);
    }

    #[test]
    fn flush_against_wall_can_walk_away() {
        let wall = Aabb::new(Vec2::new(12.0, -50.0), Vec2::new(40.0, 50.0));
        let mut p = free_roam(vec![wall]);
        p.apply_input(&InputCommand {
            forward: -1.0,
            ..Default::default()
        });
        p.tick(DT);
        assert!(p.plan_position().x < 0.0);
    }

    #[test]
    fn turning_rotates_forward_axis() {
        let mut p = free_roam(vec![]);
        p.apply_input(&InputCommand {
            turn: std::f32::consts::FRAC_PI_2,
            ..forward()
        });
        p.tick(DT);
        let plan = p.plan_position();
        assert!(plan.x.abs() < 1e-3);
        assert!((plan.y - 12.0).abs() < 1e-3);
    }

    #[test]
    fn platform_jump_and_land() {
        let mut p = platform(vec![]);
        assert!(p.state().grounded);

        p.apply_input(&InputCommand {
            jump: true,
            ..Default::default()
        });
        p.tick(DT);
        assert!(!p.state().grounded);
        assert!(p.plan_position().y < 600.0);

        p.apply_input(&InputCommand::default());
        for _ in 0..20 {
            p.tick(DT);
        }
        assert!(p.state().grounded);
        assert_eq!(p.plan_position().y, 600.0);
        assert_eq!(p.state().velocity.y, 0.0);
    }

    #[test]
    fn cannot_jump_midair() {
        let mut p = platform(vec![]);
        assert!(p.jump());
        assert!(!p.jump());
    }

    #[test]
    fn free_roam_ignores_jump() {
        let mut p = free_roam(vec![]);
        assert!(!p.jump());
        p.apply_input(&InputCommand {
            jump: true,
            ..Default::default()
        });
        p.tick(DT);
        assert_eq!(p.state().pose.position.y, 160.0);
    }

    #[test]
    fn platform_lands_on_box_top_and_walks_off() {
        // Box top at y = 500; player half height 12, so it settles at or
        // just above 488.
        let crate_box = Aabb::new(Vec2::new(-40.0, 500.0), Vec2::new(40.0, 600.0));
        let mut p = PlayerController::new(
            PlayerConfig::default(),
            LocomotionMode::Platform {
                gravity: 1200.0,
                ground_level: 600.0,
                jump_impulse: -400.0,
            },
            Vec2::new(0.0, 450.0),
            vec![crate_box],
        )
        .unwrap();

        for _ in 0..30 {
            p.tick(DT);
        }
        assert!(p.state().grounded);
        assert!(p.plan_position().y < 488.0 + 1e-3);

        // Walk sideways along the top.
        p.apply_input(&InputCommand {
            strafe: 1.0,
            ..Default::default()
        });
        p.tick(DT);
        assert!(p.plan_position().x > 0.0);
        assert_eq!(p.state().pose.heading, 0.0);
    }

    #[test]
    fn damage_and_heal_clamp() {
        let mut p = free_roam(vec![]);
        p.take_damage(30.0);
        assert_eq!(p.state().health, 70.0);
        p.take_damage(500.0);
        assert_eq!(p.state().health, 0.0);
        p.heal(1000.0);
        assert_eq!(p.state().health, 100.0);
        p.take_damage(-20.0);
        assert_eq!(p.state().health, 100.0);
        p.heal(f32::NAN);
        assert_eq!(p.state().health, 100.0);
    }

    #[test]
    fn invalid_mode_fails_at_construction() {
        let result = PlayerController::new(
            PlayerConfig::default(),
            LocomotionMode::Platform {
                gravity: -5.0,
                ground_level: 0.0,
                jump_impulse: -1.0,
            },
            Vec2::ZERO,
            vec![],
        );
        assert!(matches!(result, Err(ConfigError::Locomotion(_))));
    }
}
