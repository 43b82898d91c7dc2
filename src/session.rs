//! Game-state gate around a `Simulation`.
//!
//! The simulation only ticks while `Playing`. Pausing is simply not ticking;
//! the first frame after a start, resume or restart produces no tick so the
//! wall-clock gap is thrown away instead of integrated.

use instant::Instant;
use serde::Serialize;

use crate::config::ConfigError;
use crate::ecs::components::NpcId;
use crate::frame::FrameResult;
use crate::input::{Action, InputCommand};
use crate::sim::Simulation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Playing,
    Paused,
    Dialogue,
    Inventory,
    GameOver,
}

impl GameState {
    pub fn label(self) -> &'static str {
        match self {
            GameState::Playing => "Playing",
            GameState::Paused => "Paused",
            GameState::Dialogue => "Dialogue",
            GameState::Inventory => "Inventory",
            GameState::GameOver => "Game Over",
        }
    }
}

/// Wall-clock frame timer.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Seconds since the previous call, or `None` on the first call after
    /// construction or `reset`.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32());
        self.last = Some(now);
        dt
    }

    /// Forget the last timestamp so the next frame starts fresh.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

pub struct Session {
    sim: Simulation,
    state: GameState,
    clock: FrameClock,
    /// Who the player is talking to while in `Dialogue`.
    dialogue_with: Option<NpcId>,
    /// Interact key state from the previous frame, for edge detection.
    interact_held: bool,
    /// A press seen while playing that no tick has consumed yet.
    interact_pending: bool,
}

impl Session {
    pub fn new(sim: Simulation) -> Self {
        log::info!("Session started on level '{}'", sim.level().name);
        Self {
            sim,
            state: GameState::Playing,
            clock: FrameClock::new(),
            dialogue_with: None,
            interact_held: false,
            interact_pending: false,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn dialogue_with(&self) -> Option<NpcId> {
        self.dialogue_with
    }

    /// Called once per display frame. Ticks the simulation only while
    /// playing, and never on the first frame after (re)entering play.
    ///
    /// `cmd.interact` is the held state of the key; the simulation only sees
    /// it on the frame the key goes down.
    pub fn frame(&mut self, now: Instant, cmd: &InputCommand) -> Option<FrameResult> {
        let pressed = cmd.interact && !self.interact_held;
        self.interact_held = cmd.interact;

        if self.state != GameState::Playing {
            self.interact_pending = false;
            self.clock.reset();
            return None;
        }
        self.interact_pending |= pressed;
        let dt = self.clock.frame(now)?;
        let cmd = InputCommand {
            interact: std::mem::take(&mut self.interact_pending),
            ..*cmd
        };
        let frame = self.sim.tick(dt, &cmd);

        if frame.game_over {
            self.set_state(GameState::GameOver);
        } else if let Some(npc) = frame.interact_target {
            self.dialogue_with = Some(npc);
            self.set_state(GameState::Dialogue);
        }
        Some(frame)
    }

    /// Menu-level actions. Movement actions are ignored here; they reach the
    /// simulation through `InputCommand`.
    pub fn press(&mut self, action: Action) {
        let next = match (self.state, action) {
            (GameState::GameOver, _) => return,
            (GameState::Playing, Action::Pause) => GameState::Paused,
            (GameState::Paused, Action::Pause) => GameState::Playing,
            (GameState::Playing, Action::Inventory) => GameState::Inventory,
            (GameState::Inventory, Action::Inventory | Action::Pause) => GameState::Playing,
            (GameState::Dialogue, Action::Interact | Action::Pause) => {
                self.dialogue_with = None;
                GameState::Playing
            }
            _ => return,
        };
        self.set_state(next);
    }

    /// Rebuild the level and go back to playing.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.sim.restart()?;
        self.dialogue_with = None;
        self.set_state(GameState::Playing);
        Ok(())
    }

    fn set_state(&mut self, next: GameState) {
        if next == self.state {
            return;
        }
        log::info!("Game state: {} -> {}", self.state.label(), next.label());
        self.state = next;
        self.clock.reset();
    }
}
