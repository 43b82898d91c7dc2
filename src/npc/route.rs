use glam::Vec2;

/// Ordered, cyclic list of waypoints. Immutable once loaded and shared
/// between every NPC that walks it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatrolRoute {
    waypoints: Vec<Vec2>,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at `index`, wrapping around the cycle.
    pub fn get(&self, index: usize) -> Option<Vec2> {
        if self.waypoints.is_empty() {
            None
        } else {
            Some(self.waypoints[index % self.waypoints.len()])
        }
    }

    /// Index that follows `index` on the cycle.
    pub fn next_index(&self, index: usize) -> usize {
        if self.waypoints.is_empty() {
            0
        } else {
            (index + 1) % self.waypoints.len()
        }
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_cyclically() {
        let route = PatrolRoute::new(vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert_eq!(route.next_index(2), 0);
        assert_eq!(route.get(4), Some(Vec2::X));
    }

    #[test]
    fn empty_route_has_no_waypoints() {
        let route = PatrolRoute::default();
        assert!(route.is_empty());
        assert_eq!(route.get(0), None);
        assert_eq!(route.next_index(3), 0);
    }
}
