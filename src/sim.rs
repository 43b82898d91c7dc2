//! One simulation step: player, then every NPC, then the suspicion meter,
//! then the frame result. Strictly sequential; the order is the guarantee
//! that NPCs react to where the player is *after* this tick's move.

use glam::Vec2;

use crate::config::{ConfigError, SimConfig};
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::ecs::components::*;
use crate::ecs::systems::{self, NpcEvent, NpcEventKind};
use crate::frame::{FrameResult, NpcView, PlayerView};
use crate::input::InputCommand;
use crate::level::{Level, LevelWarning};
use crate::npc::{awareness, spawn_npc};
use crate::player::PlayerController;
use crate::stealth::SuspicionTracker;

pub struct Simulation {
    config: SimConfig,
    level: Level,
    world: hecs::World,
    player: PlayerController,
    tracker: SuspicionTracker,
    /// Reused across ticks.
    events: Vec<NpcEvent>,
    timers: SystemTimers,
    tick_count: u64,
}

impl Simulation {
    /// Validate config and populate the level. Fails only on bad config;
    /// bad NPC records were already dropped by the level loader.
    pub fn new(config: SimConfig, level: Level) -> Result<Self, ConfigError> {
        config.validate()?;
        let player = PlayerController::new(
            config.player,
            config.locomotion,
            level.player_spawn,
            level.obstacles.clone(),
        )?;
        let world = populate(&level, &config);
        for warning in &level.warnings {
            log::debug!("level warning carried into session: {warning}");
        }

        Ok(Self {
            config,
            level,
            world,
            player,
            tracker: SuspicionTracker::new(config.stealth),
            events: Vec::new(),
            timers: SystemTimers::new(),
            tick_count: 0,
        })
    }

    /// Rebuild the level from scratch: fresh player, fresh NPCs, suspicion
    /// and the game-over latch reset.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.player = PlayerController::new(
            self.config.player,
            self.config.locomotion,
            self.level.player_spawn,
            self.level.obstacles.clone(),
        )?;
        self.world = populate(&self.level, &self.config);
        self.tracker.reset();
        self.events.clear();
        self.tick_count = 0;
        log::info!("Level '{}' restarted", self.level.name);
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// NPC records the level loader skipped.
    pub fn warnings(&self) -> &[LevelWarning] {
        &self.level.warnings
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// For damage and healing from outside the core.
    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn tracker(&self) -> &SuspicionTracker {
        &self.tracker
    }

    pub fn timers(&self) -> &SystemTimers {
        &self.timers
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn npc_count(&self) -> usize {
        self.world.len() as usize
    }

    /// The dt actually handed to components: non-finite or negative becomes
    /// 0, anything longer than `max_dt` is cut to `max_dt`.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 {
            dt.min(self.config.max_dt)
        } else {
            0.0
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32, cmd: &InputCommand) -> FrameResult {
        let dt = self.clamp_dt(dt);
        self.tick_count += 1;
        self.events.clear();

        // 1. Player
        self.timers.begin();
        self.player.apply_input(cmd);
        self.player.tick(dt);
        self.timers.end(SystemPhase::Player);

        // 2. NPCs, against the post-move player position
        self.timers.begin();
        let player_plan = self.player.plan_position();
        systems::tick(
            &mut self.world,
            dt,
            player_plan,
            &self.config.npc,
            self.config.stealth.suspicion_increase_base,
            &mut self.events,
        );
        self.timers.end(SystemPhase::Npcs);

        // 3. Suspicion: one credit per chasing NPC, then decay/thresholds
        self.timers.begin();
        for event in &self.events {
            match event.kind {
                NpcEventKind::EnteredChase => self.tracker.notify_chase_started(event.npc),
                NpcEventKind::AbandonedChase => log::info!("NPC {} gave up the chase", event.npc.0),
                NpcEventKind::ReachedWaypoint { index } => {
                    log::debug!("NPC {} reached waypoint {index}", event.npc.0)
                }
            }
        }
        let credit = self.config.stealth.suspicion_increase_base * dt;
        let chasing = self
            .world
            .query::<&NpcState>()
            .iter()
            .filter(|(_, s)| s.state == BehaviorState::Chase)
            .count();
        for _ in 0..chasing {
            self.tracker.increase_suspicion(credit);
        }
        let signals = self
            .tracker
            .tick(dt, self.world.query::<&NpcState>().iter().map(|(_, s)| s.state));
        self.timers.end(SystemPhase::Suspicion);

        // 4. Frame result
        self.timers.begin();
        let interact_target = if cmd.interact {
            self.nearest_npc(player_plan, self.config.interact_range)
        } else {
            None
        };
        let frame = FrameResult {
            tick: self.tick_count,
            player: self.player_view(),
            npcs: self.npc_views(),
            suspicion_pct: self.tracker.percent(),
            detected: signals.player_spotted,
            game_over: signals.game_over,
            interact_target,
            events: self.events.clone(),
        };
        self.timers.end(SystemPhase::Frame);
        frame
    }

    /// Nearest NPC within `reach` of `from`, ties going to the lower id.
    pub fn nearest_npc(&self, from: Vec2, reach: f32) -> Option<NpcId> {
        self.world
            .query::<(&NpcId, &Position)>()
            .iter()
            .map(|(_, (id, pos))| (*id, pos.0.distance(from)))
            .filter(|&(_, d)| d <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    fn player_view(&self) -> PlayerView {
        let state = self.player.state();
        PlayerView {
            position: state.pose.position,
            plan: self.player.plan_position(),
            heading: state.pose.heading,
            health_pct: self.player.health_fraction() * 100.0,
            stamina_pct: self.player.stamina_fraction() * 100.0,
            sprinting: state.sprinting,
            crouching: state.crouching,
            grounded: state.grounded,
        }
    }

    fn npc_views(&self) -> Vec<NpcView> {
        let cfg = &self.config.npc;
        let mut views: Vec<NpcView> = self
            .world
            .query::<(&NpcId, &Position, &Heading, &NpcState, &Alert, &NpcName, &NpcKind)>()
            .iter()
            .map(|(_, (id, pos, heading, state, alert, name, kind))| NpcView {
                id: *id,
                name: name.0.clone(),
                kind: kind.0.clone(),
                position: pos.0,
                heading: heading.0,
                state: state.state,
                awareness: awareness(state.state, alert.level, cfg),
                sees_player: alert.sees_player,
                alert_pct: alert.level / cfg.alert_threshold * 100.0,
            })
            .collect();
        views.sort_by_key(|v| v.id);
        views
    }
}

fn populate(level: &Level, config: &SimConfig) -> hecs::World {
    let mut world = hecs::World::new();
    for (i, spawn) in level.npcs.iter().enumerate() {
        spawn_npc(&mut world, NpcId(i as u32), spawn, &config.npc);
    }
    world
}
