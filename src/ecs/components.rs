use std::sync::Arc;

use glam::Vec2;
use serde::Serialize;

use crate::npc::PatrolRoute;
use crate::spatial::Cone;

/// Stable per-level NPC index, assigned in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NpcId(pub u32);

/// Plan position in level units.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Facing in radians, (-PI, PI], 0 = +x.
#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

/// What this NPC can see.
#[derive(Debug, Clone, Copy)]
pub struct Vision(pub Cone);

/// Current behavior state.
#[derive(Debug, Clone, Copy)]
pub struct NpcState {
    pub state: BehaviorState,
    /// Seconds left before an idle NPC resumes patrol. Never negative.
    pub idle_timer: f32,
    /// What `idle_timer` is reset to on arriving at a waypoint.
    pub idle_duration: f32,
}

impl NpcState {
    pub fn enter_idle(&mut self) {
        self.state = BehaviorState::Idle;
        self.idle_timer = self.idle_duration;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BehaviorState {
    Idle,
    Patrol,
    Chase,
}

/// Continuous alert accumulator, in [0, alert_threshold].
#[derive(Debug, Clone, Copy, Default)]
pub struct Alert {
    pub level: f32,
    /// Result of this tick's perception test.
    pub sees_player: bool,
}

/// Shared, immutable route plus this NPC's place on it.
#[derive(Debug, Clone)]
pub struct Patrol {
    pub route: Arc<PatrolRoute>,
    /// Next waypoint. Always < route length when the route is non-empty.
    pub index: usize,
}

/// Display name from level data.
#[derive(Debug, Clone)]
pub struct NpcName(pub String);

/// Category from level data ("security", "doctor", ...). Only the
/// presentation layer cares about it.
#[derive(Debug, Clone)]
pub struct NpcKind(pub String);
