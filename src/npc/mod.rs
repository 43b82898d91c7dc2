mod awareness;
mod route;

pub use awareness::{awareness, Awareness};
pub use route::PatrolRoute;

use std::sync::Arc;

use glam::Vec2;

use crate::config::NpcConfig;
use crate::ecs::components::*;
use crate::spatial::{bearing, Cone};

/// Everything needed to put one NPC into the world, as read from level data.
#[derive(Debug, Clone)]
pub struct NpcSpawn {
    pub name: String,
    pub kind: String,
    pub position: Vec2,
    pub route: Arc<PatrolRoute>,
    /// Per-NPC vision overrides; `None` falls back to config.
    pub detection_range: Option<f32>,
    /// Full field of view in degrees.
    pub detection_angle: Option<f32>,
}

impl NpcSpawn {
    /// Vision cone for this NPC. Range is capped at the chase abandon radius
    /// so an NPC that gives up a chase cannot immediately re-see the player.
    pub fn vision(&self, cfg: &NpcConfig) -> Cone {
        let mut range = self.detection_range.unwrap_or(cfg.detection_range);
        if range > cfg.chase_abandon_radius {
            log::warn!(
                "NPC '{}': detection range {range} capped at chase abandon radius {}",
                self.name,
                cfg.chase_abandon_radius
            );
            range = cfg.chase_abandon_radius;
        }
        let angle = self.detection_angle.unwrap_or(cfg.detection_angle).min(360.0);
        Cone::from_degrees(range, angle)
    }
}

/// Spawn one NPC. Starts patrolling when it has a route, idle otherwise,
/// facing its first waypoint.
pub fn spawn_npc(world: &mut hecs::World, id: NpcId, spawn: &NpcSpawn, cfg: &NpcConfig) -> hecs::Entity {
    let state = if spawn.route.is_empty() {
        BehaviorState::Idle
    } else {
        BehaviorState::Patrol
    };
    let heading = spawn
        .route
        .get(0)
        .filter(|wp| wp.distance_squared(spawn.position) > f32::EPSILON)
        .map(|wp| bearing(spawn.position, wp))
        .unwrap_or(0.0);

    log::debug!(
        "Spawning NPC {} '{}' ({}) at {:?}, {} waypoints",
        id.0,
        spawn.name,
        spawn.kind,
        spawn.position,
        spawn.route.len()
    );

    world.spawn((
        id,
        Position(spawn.position),
        Heading(heading),
        Vision(spawn.vision(cfg)),
        NpcState {
            state,
            idle_timer: cfg.idle_duration,
            idle_duration: cfg.idle_duration,
        },
        Alert::default(),
        Patrol {
            route: Arc::clone(&spawn.route),
            index: 0,
        },
        NpcName(spawn.name.clone()),
        NpcKind(spawn.kind.clone()),
    ))
}
