pub mod behavior;
pub mod perception;

use glam::Vec2;
use serde::Serialize;

use crate::config::NpcConfig;
use crate::ecs::components::{Alert, Heading, NpcId, NpcState, Patrol, Position, Vision};

/// Something an NPC did this tick that the outside world may care about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NpcEvent {
    pub npc: NpcId,
    pub kind: NpcEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NpcEventKind {
    EnteredChase,
    AbandonedChase,
    ReachedWaypoint { index: usize },
}

/// Run every NPC for one tick against the player's plan position.
///
/// Each agent runs behavior then perception before the next agent starts.
/// Agents never read each other, so the order among them has no effect.
pub fn tick(
    world: &mut hecs::World,
    dt: f32,
    player: Vec2,
    cfg: &NpcConfig,
    alert_gain: f32,
    events: &mut Vec<NpcEvent>,
) {
    for (_, (id, pos, heading, vision, state, alert, patrol)) in world.query_mut::<(
        &NpcId,
        &mut Position,
        &mut Heading,
        &Vision,
        &mut NpcState,
        &mut Alert,
        &mut Patrol,
    )>() {
        // 1. Behavior
        if let Some(kind) = behavior::step(pos, heading, state, alert, patrol, player, cfg, dt) {
            events.push(NpcEvent { npc: *id, kind });
        }

        // 2. Perception
        if perception::step(pos, heading, vision, state, alert, player, alert_gain, cfg, dt) {
            events.push(NpcEvent {
                npc: *id,
                kind: NpcEventKind::EnteredChase,
            });
        }
    }
}
