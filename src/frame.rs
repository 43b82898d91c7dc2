//! Per-tick output for the presentation layer. Plain data, serializable to
//! JSON; the simulation never touches any view state itself.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::ecs::components::{BehaviorState, NpcId};
use crate::ecs::systems::NpcEvent;
use crate::npc::Awareness;

#[derive(Debug, Clone, Serialize)]
pub struct FrameResult {
    pub tick: u64,
    pub player: PlayerView,
    /// Sorted by id.
    pub npcs: Vec<NpcView>,
    /// 0..=100
    pub suspicion_pct: f32,
    pub detected: bool,
    /// True on the single tick the game ended.
    pub game_over: bool,
    /// Nearest NPC in reach when the command asked to interact.
    pub interact_target: Option<NpcId>,
    pub events: Vec<NpcEvent>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub plan: Vec2,
    pub heading: f32,
    pub health_pct: f32,
    pub stamina_pct: f32,
    pub sprinting: bool,
    pub crouching: bool,
    pub grounded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NpcView {
    pub id: NpcId,
    pub name: String,
    pub kind: String,
    pub position: Vec2,
    pub heading: f32,
    pub state: BehaviorState,
    pub awareness: Awareness,
    pub sees_player: bool,
    /// Alert level as 0..=100 of the chase threshold.
    pub alert_pct: f32,
}

impl FrameResult {
    pub fn npc(&self, id: NpcId) -> Option<&NpcView> {
        self.npcs
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|i| &self.npcs[i])
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
