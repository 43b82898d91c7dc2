use glam::Vec2;

use crate::config::NpcConfig;
use crate::ecs::components::{Alert, BehaviorState, Heading, NpcState, Patrol, Position};
use crate::spatial::{normalize_angle, step_toward};

use super::NpcEventKind;

/// Run one agent's behavior step: idle countdown, patrol walking, or chase.
/// Returns the transition event this step produced, if any.
#[allow(clippy::too_many_arguments)]
pub fn step(
    pos: &mut Position,
    heading: &mut Heading,
    state: &mut NpcState,
    alert: &mut Alert,
    patrol: &mut Patrol,
    player: Vec2,
    cfg: &NpcConfig,
    dt: f32,
) -> Option<NpcEventKind> {
    match state.state {
        BehaviorState::Idle => {
            idle(state, patrol, dt);
            None
        }
        BehaviorState::Patrol => walk_patrol(pos, heading, state, patrol, cfg, dt),
        BehaviorState::Chase => chase(pos, heading, state, alert, patrol, player, cfg, dt),
    }
}

fn idle(state: &mut NpcState, patrol: &Patrol, dt: f32) {
    state.idle_timer = (state.idle_timer - dt).max(0.0);
    if state.idle_timer > 0.0 {
        return;
    }
    if patrol.route.is_empty() {
        // Nowhere to go; stand watch for another round.
        state.idle_timer = state.idle_duration;
    } else {
        state.state = BehaviorState::Patrol;
    }
}

fn walk_patrol(
    pos: &mut Position,
    heading: &mut Heading,
    state: &mut NpcState,
    patrol: &mut Patrol,
    cfg: &NpcConfig,
    dt: f32,
) -> Option<NpcEventKind> {
    let Some(target) = patrol.route.get(patrol.index) else {
        state.enter_idle();
        return None;
    };

    if pos.0.distance(target) < cfg.arrival_epsilon {
        let reached = patrol.index % patrol.route.len();
        patrol.index = patrol.route.next_index(reached);
        state.enter_idle();
        return Some(NpcEventKind::ReachedWaypoint { index: reached });
    }

    advance(pos, heading, target, cfg.patrol_speed * dt);
    None
}

#[allow(clippy::too_many_arguments)]
fn chase(
    pos: &mut Position,
    heading: &mut Heading,
    state: &mut NpcState,
    alert: &mut Alert,
    patrol: &Patrol,
    player: Vec2,
    cfg: &NpcConfig,
    dt: f32,
) -> Option<NpcEventKind> {
    if pos.0.distance(player) > cfg.chase_abandon_radius {
        alert.level = 0.0;
        if patrol.route.is_empty() {
            state.enter_idle();
        } else {
            state.state = BehaviorState::Patrol;
        }
        return Some(NpcEventKind::AbandonedChase);
    }

    advance(pos, heading, player, cfg.chase_speed * dt);
    None
}

/// Move toward `target` by at most `max_step` and face the direction moved.
fn advance(pos: &mut Position, heading: &mut Heading, target: Vec2, max_step: f32) {
    let (next, dir) = step_toward(pos.0, target, max_step);
    pos.0 = next;
    if dir != Vec2::ZERO {
        heading.0 = normalize_angle(dir.y.atan2(dir.x));
    }
}
