use instant::Instant;

/// Which phase of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    Player = 0,
    Npcs = 1,
    Suspicion = 2,
    Frame = 3,
}

impl SystemPhase {
    pub const ALL: [SystemPhase; 4] = [Self::Player, Self::Npcs, Self::Suspicion, Self::Frame];

    pub fn label(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Npcs => "NPCs",
            Self::Suspicion => "Suspicion",
            Self::Frame => "Frame",
        }
    }
}

/// Per-phase timing with exponential moving average smoothing.
pub struct SystemTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; 4],
    /// Timestamp when `begin()` was called.
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 4],
            start: Instant::now(),
        }
    }

    /// Call before a phase runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a phase finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: SystemPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.record(phase, elapsed_us);
    }

    fn record(&mut self, phase: SystemPhase, elapsed_us: f64) {
        let idx = phase as usize;
        self.durations_us[idx] = self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    pub fn get(&self, phase: SystemPhase) -> f64 {
        self.durations_us[phase as usize]
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// One-line breakdown for the log.
    pub fn summary(&self) -> String {
        SystemPhase::ALL
            .iter()
            .map(|&p| format!("{} {:.1}us", p.label(), self.get(p)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for SystemTimers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_moves_toward_sample() {
        let mut t = SystemTimers::new();
        t.record(SystemPhase::Npcs, 100.0);
        assert!((t.get(SystemPhase::Npcs) - 10.0).abs() < 1e-9);
        t.record(SystemPhase::Npcs, 100.0);
        assert!((t.get(SystemPhase::Npcs) - 19.0).abs() < 1e-9);
        assert_eq!(t.get(SystemPhase::Player), 0.0);
        assert!((t.total_us() - 19.0).abs() < 1e-9);
        assert!(t.summary().starts_with("Player 0.0us | NPCs 19.0us"));
    }
}
