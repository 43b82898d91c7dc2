//! Headless driver: a scripted player wandering the lobby at 60 frames per
//! second of synthetic wall-clock time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use instant::Instant;
use thiserror::Error;

use crate::config::{ConfigError, SimConfig};
use crate::debug::DebugStats;
use crate::ecs::systems::NpcEventKind;
use crate::frame::FrameResult;
use crate::input::{Action, KeyBindings};
use crate::level::{Level, LevelError};
use crate::session::{GameState, Session};
use crate::sim::Simulation;

/// Display frame length.
const FRAME_TIME: Duration = Duration::from_nanos(16_666_667);
/// Yaw speed of the wandering bot, radians/second.
const TURN_RATE: f32 = 1.5;
/// Seconds between scripted pauses.
const PAUSE_EVERY: f32 = 30.0;
/// How long a scripted pause lasts.
const PAUSE_LENGTH: f32 = 2.0;

/// Built-in level used when no level file is given.
pub const LOBBY_LEVEL: &str = r#"{
    "name": "lobby",
    "playerSpawn": {"x": 80, "y": 80},
    "npcs": [
        {"name": "Officer Reyes", "type": "security", "position": {"x": 400, "y": 300},
         "patrolPoints": [{"x": 400, "y": 300}, {"x": 700, "y": 300}, {"x": 700, "y": 500}, {"x": 400, "y": 500}]},
        {"name": "Dr. Hale", "type": "doctor", "position": {"x": 900, "y": 150},
         "patrolPoints": [{"x": 900, "y": 150}, {"x": 900, "y": 450}]},
        {"name": "Front Desk", "type": "receptionist", "position": {"x": 250, "y": 120},
         "patrolPoints": [], "detectionRange": 150, "detectionAngle": 120},
        {"name": "Sam", "type": "ally", "position": {"x": 120, "y": 500}}
    ],
    "obstacles": [
        {"min": {"x": 200, "y": 140}, "max": {"x": 320, "y": 170}},
        {"min": {"x": 540, "y": 380}, "max": {"x": 570, "y": 410}},
        {"min": {"x": 780, "y": 60}, "max": {"x": 800, "y": 560}}
    ],
    "objectives": [{"id": "records", "description": "Reach the records room without being spotted"}]
}"#;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Headless stealth demo: a wandering bot in a patrolled lobby
#[derive(Parser, Debug, Clone)]
#[command(name = "crosswatch")]
pub struct DemoOptions {
    /// Level JSON file (built-in lobby when omitted)
    pub level_path: Option<PathBuf>,

    /// Simulation config JSON file (defaults when omitted)
    pub config_path: Option<PathBuf>,

    /// Wall-clock seconds to simulate
    #[arg(long, default_value_t = 120.0)]
    pub seconds: f32,

    /// Seed for the wandering bot
    #[arg(long, default_value_t = 0x5eed)]
    pub seed: u64,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            level_path: None,
            config_path: None,
            seconds: 120.0,
            seed: 0x5eed,
        }
    }
}

#[derive(Debug)]
pub struct DemoReport {
    pub frames: u64,
    pub ticks: u64,
    pub game_over: bool,
    pub last_frame: Option<FrameResult>,
}

/// Key sets the bot picks between.
const STROLLS: &[&[&str]] = &[
    &["w"],
    &["w"],
    &["w", "Shift"],
    &["w", "c"],
    &["a"],
    &["d"],
    &["s"],
    &[],
];

/// Wandering input: holds a random key set for a random while, turning a bit.
struct Wanderer {
    rng: fastrand::Rng,
    held: &'static [&'static str],
    turn: f32,
    hold_left: f32,
}

impl Wanderer {
    fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            held: &[],
            turn: 0.0,
            hold_left: 0.0,
        }
    }

    fn next(&mut self, dt: f32) -> (&'static [&'static str], f32, bool) {
        self.hold_left -= dt;
        if self.hold_left <= 0.0 {
            self.held = STROLLS[self.rng.usize(0..STROLLS.len())];
            self.turn = (self.rng.f32() * 2.0 - 1.0) * TURN_RATE;
            self.hold_left = 1.0 + self.rng.f32() * 2.0;
        }
        let interact = self.rng.f32() < 0.005;
        (self.held, self.turn * dt, interact)
    }
}

fn load(opts: &DemoOptions) -> Result<(SimConfig, Level), DemoError> {
    let config = match &opts.config_path {
        Some(path) => SimConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    let level = match &opts.level_path {
        Some(path) => Level::from_file(Path::new(path))?,
        None => Level::from_json(LOBBY_LEVEL)?,
    };
    Ok((config, level))
}

pub fn run(opts: &DemoOptions) -> Result<DemoReport, DemoError> {
    let (config, level) = load(opts)?;
    if let Some(objective) = level.current_objective() {
        log::info!("Objective: {objective}");
    }
    let sim = Simulation::new(config, level)?;
    for warning in sim.warnings() {
        log::warn!("{warning}");
    }

    let mut session = Session::new(sim);
    let bindings = KeyBindings::default();
    let mut bot = Wanderer::new(opts.seed);
    let mut stats = DebugStats::new();

    let frame_dt = FRAME_TIME.as_secs_f32();
    let total_frames = (opts.seconds.max(0.0) / frame_dt) as u64;
    let mut now = Instant::now();
    let mut elapsed = 0.0f32;
    let mut next_pause = PAUSE_EVERY;
    let mut paused_for = 0.0f32;
    let mut dialogue_for = 0.0f32;
    let mut last_frame = None;

    for _ in 0..total_frames {
        now += FRAME_TIME;
        elapsed += frame_dt;

        match session.state() {
            GameState::GameOver => break,
            GameState::Paused => {
                paused_for += frame_dt;
                if paused_for >= PAUSE_LENGTH {
                    session.press(Action::Pause);
                }
            }
            GameState::Dialogue => {
                dialogue_for += frame_dt;
                if dialogue_for >= 1.0 {
                    dialogue_for = 0.0;
                    session.press(Action::Interact);
                }
            }
            GameState::Playing if elapsed >= next_pause => {
                next_pause += PAUSE_EVERY;
                paused_for = 0.0;
                session.press(Action::Pause);
            }
            GameState::Playing | GameState::Inventory => {}
        }

        let (held, turn, interact) = bot.next(frame_dt);
        let mut cmd = bindings.resolve(held.iter().copied(), turn);
        cmd.interact = interact;

        let Some(frame) = session.frame(now, &cmd) else {
            continue;
        };
        for event in &frame.events {
            let name = frame.npc(event.npc).map(|n| n.name.as_str()).unwrap_or("?");
            match event.kind {
                NpcEventKind::EnteredChase => log::info!("[{}] {name} is chasing you", frame.tick),
                NpcEventKind::AbandonedChase => log::info!("[{}] {name} lost you", frame.tick),
                NpcEventKind::ReachedWaypoint { .. } => {}
            }
        }
        if let Some(target) = frame.interact_target.and_then(|id| frame.npc(id)) {
            log::info!("[{}] talking to {} ({})", frame.tick, target.name, target.kind);
        }
        if frame.game_over {
            log::info!("[{}] Caught! Game over.", frame.tick);
        }
        stats.record_frame(frame_dt as f64, session.sim().timers(), frame.suspicion_pct);
        last_frame = Some(frame);
    }

    if let Some(frame) = &last_frame {
        log::info!("Final frame: {}", frame.to_json()?);
    }
    Ok(DemoReport {
        frames: stats.frame_count(),
        ticks: session.sim().tick_count(),
        game_over: session.state() == GameState::GameOver,
        last_frame,
    })
}
