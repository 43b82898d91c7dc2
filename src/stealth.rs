//! The global suspicion meter.
//!
//! One scalar per session in [0, max_suspicion]. It only grows through
//! `increase_suspicion`, which the simulation calls once per chasing NPC per
//! tick, and only shrinks through the decay in `tick` while nobody chases.

use serde::Serialize;

use crate::config::StealthConfig;
use crate::ecs::components::{BehaviorState, NpcId};

/// What the meter reports after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuspicionSignals {
    /// At or above the detection threshold. Repeats every tick it holds.
    pub player_spotted: bool,
    /// Meter hit the maximum. Fires on exactly one tick per session.
    pub game_over: bool,
}

pub struct SuspicionTracker {
    cfg: StealthConfig,
    suspicion: f32,
    game_over_latched: bool,
    /// Set while the meter is at or above threshold, for edge logging only.
    spotted: bool,
    /// Chases started this session.
    pursuits: u32,
}

impl SuspicionTracker {
    pub fn new(cfg: StealthConfig) -> Self {
        Self {
            cfg,
            suspicion: 0.0,
            game_over_latched: false,
            spotted: false,
            pursuits: 0,
        }
    }

    pub fn suspicion(&self) -> f32 {
        self.suspicion
    }

    /// Meter as 0..=100.
    pub fn percent(&self) -> f32 {
        self.suspicion / self.cfg.max_suspicion * 100.0
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over_latched
    }

    pub fn pursuits(&self) -> u32 {
        self.pursuits
    }

    /// Add suspicion, clamped at the maximum. Zero, negative and non-finite
    /// amounts are ignored.
    pub fn increase_suspicion(&mut self, amount: f32) {
        if !(amount.is_finite() && amount > 0.0) {
            return;
        }
        self.suspicion = (self.suspicion + amount).min(self.cfg.max_suspicion);
    }

    /// An NPC just started chasing. Bookkeeping only; growth still comes
    /// from `increase_suspicion`.
    pub fn notify_chase_started(&mut self, npc: NpcId) {
        self.pursuits += 1;
        log::info!(
            "NPC {} started a chase (suspicion {:.1}%)",
            npc.0,
            self.percent()
        );
    }

    /// Decay if nobody is chasing, then evaluate thresholds. A non-finite or
    /// negative `dt` skips the decay.
    pub fn tick<I>(&mut self, dt: f32, states: I) -> SuspicionSignals
    where
        I: IntoIterator<Item = BehaviorState>,
    {
        let anyone_chasing = states.into_iter().any(|s| s == BehaviorState::Chase);
        if !anyone_chasing && dt.is_finite() && dt > 0.0 {
            self.suspicion = (self.suspicion - self.cfg.suspicion_decay_rate * dt).max(0.0);
        }
        self.suspicion = self.suspicion.clamp(0.0, self.cfg.max_suspicion);

        let player_spotted = self.suspicion >= self.cfg.detection_threshold;
        if player_spotted != self.spotted {
            if player_spotted {
                log::info!("Player spotted (suspicion {:.1}%)", self.percent());
            } else {
                log::debug!("Suspicion fell below detection threshold");
            }
            self.spotted = player_spotted;
        }

        let mut game_over = false;
        if self.suspicion >= self.cfg.max_suspicion && !self.game_over_latched {
            self.game_over_latched = true;
            game_over = true;
            log::info!("Suspicion maxed out: game over");
        }

        SuspicionSignals {
            player_spotted,
            game_over,
        }
    }

    /// New game or level restart.
    pub fn reset(&mut self) {
        self.suspicion = 0.0;
        self.game_over_latched = false;
        self.spotted = false;
        self.pursuits = 0;
    }
}
