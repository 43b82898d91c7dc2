use serde::Serialize;

use crate::config::NpcConfig;
use crate::ecs::components::BehaviorState;

/// Richer read-out of an NPC's alertness for the HUD and cone colour.
/// Derived from state + alert level; never feeds back into the FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Awareness {
    Unaware,
    Suspicious,
    Hunting,
}

pub fn awareness(state: BehaviorState, alert: f32, cfg: &NpcConfig) -> Awareness {
    if state == BehaviorState::Chase {
        Awareness::Hunting
    } else if alert > 0.0 && alert >= cfg.alert_threshold * cfg.suspicious_fraction {
        Awareness::Suspicious
    } else {
        Awareness::Unaware
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        let cfg = NpcConfig::default();
        assert_eq!(awareness(BehaviorState::Patrol, 0.0, &cfg), Awareness::Unaware);
        assert_eq!(awareness(BehaviorState::Patrol, 14.9, &cfg), Awareness::Unaware);
        assert_eq!(awareness(BehaviorState::Idle, 15.0, &cfg), Awareness::Suspicious);
        assert_eq!(awareness(BehaviorState::Chase, 0.0, &cfg), Awareness::Hunting);
    }
}
