use glam::Vec2;

use crate::config::NpcConfig;
use crate::ecs::components::{Alert, BehaviorState, Heading, NpcState, Position, Vision};

/// Cone test against the player plus alert bookkeeping for one agent.
/// Runs every tick whatever the behavior state.
///
/// Visible: alert rises by `alert_gain * dt`, capped at the threshold.
/// Reaching the threshold forces Chase. Not visible: alert decays toward 0.
///
/// Returns true when this call moved the agent into Chase.
#[allow(clippy::too_many_arguments)]
pub fn step(
    pos: &Position,
    heading: &Heading,
    vision: &Vision,
    state: &mut NpcState,
    alert: &mut Alert,
    player: Vec2,
    alert_gain: f32,
    cfg: &NpcConfig,
    dt: f32,
) -> bool {
    alert.sees_player = vision.0.contains(pos.0, heading.0, player);

    if alert.sees_player {
        alert.level = (alert.level + alert_gain * dt).min(cfg.alert_threshold);
        if alert.level >= cfg.alert_threshold && state.state != BehaviorState::Chase {
            state.state = BehaviorState::Chase;
            return true;
        }
    } else {
        alert.level = (alert.level - cfg.alert_decay_rate * dt).max(0.0);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Cone;

    fn idle() -> NpcState {
        NpcState {
            state: BehaviorState::Idle,
            idle_timer: 3.0,
            idle_duration: 3.0,
        }
    }

    #[test]
    fn three_seconds_in_view_forces_chase() {
        let cfg = NpcConfig::default();
        let pos = Position(Vec2::ZERO);
        let heading = Heading(0.0);
        let vision = Vision(Cone::from_degrees(cfg.detection_range, cfg.detection_angle));
        let mut state = idle();
        let mut alert = Alert::default();
        let player = Vec2::new(100.0, 0.0);

        for _ in 0..29 {
            let entered = step(&pos, &heading, &vision, &mut state, &mut alert, player, 10.0, &cfg, 0.1);
            assert!(!entered);
        }
        assert_eq!(state.state, BehaviorState::Idle);

        let entered = step(&pos, &heading, &vision, &mut state, &mut alert, player, 10.0, &cfg, 0.1);
        assert!(entered);
        assert_eq!(alert.level, 30.0);
        assert_eq!(state.state, BehaviorState::Chase);
    }

    #[test]
    fn alert_caps_at_threshold_and_entry_fires_once() {
        let cfg = NpcConfig::default();
        let pos = Position(Vec2::ZERO);
        let vision = Vision(Cone::from_degrees(200.0, 90.0));
        let mut state = idle();
        let mut alert = Alert {
            level: 29.5,
            sees_player: false,
        };
        let player = Vec2::new(10.0, 0.0);
        assert!(step(&pos, &Heading(0.0), &vision, &mut state, &mut alert, player, 10.0, &cfg, 0.1));
        assert!(!step(&pos, &Heading(0.0), &vision, &mut state, &mut alert, player, 10.0, &cfg, 0.1));
        assert_eq!(alert.level, cfg.alert_threshold);
    }

    #[test]
    fn alert_decays_to_zero_when_unseen() {
        let cfg = NpcConfig::default();
        let pos = Position(Vec2::ZERO);
        let vision = Vision(Cone::from_degrees(200.0, 90.0));
        let mut state = idle();
        let mut alert = Alert {
            level: 1.0,
            sees_player: true,
        };
        // Behind the agent.
        let player = Vec2::new(-50.0, 0.0);
        step(&pos, &Heading(0.0), &vision, &mut state, &mut alert, player, 10.0, &cfg, 0.1);
        assert!(!alert.sees_player);
        assert!((alert.level - 0.5).abs() < 1e-5);
        for _ in 0..10 {
            step(&pos, &Heading(0.0), &vision, &mut state, &mut alert, player, 10.0, &cfg, 0.1);
        }
        assert_eq!(alert.level, 0.0);
        assert_eq!(state.state, BehaviorState::Idle);
    }
}
