pub mod ring;
pub mod timer;

use self::ring::RingBuffer;
use self::timer::SystemTimers;

/// Number of frame times to keep for the rolling window.
const FRAME_HISTORY_LEN: usize = 300;
/// Seconds between periodic stat lines.
const LOG_INTERVAL: f64 = 5.0;

/// Headless stand-in for an on-screen debug overlay: rolling frame stats
/// plus a periodic log line.
pub struct DebugStats {
    frame_times: RingBuffer<f64>,
    frame_count: u64,
    log_timer: f64,
}

impl DebugStats {
    pub fn new() -> Self {
        Self {
            frame_times: RingBuffer::new(FRAME_HISTORY_LEN),
            frame_count: 0,
            log_timer: 0.0,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Record a frame time. Every few seconds, logs frame stats, phase
    /// timings and the suspicion meter. Returns true when it logged.
    pub fn record_frame(&mut self, dt: f64, timers: &SystemTimers, suspicion_pct: f32) -> bool {
        self.frame_count += 1;
        self.frame_times.push(dt);
        self.log_timer += dt;

        if self.log_timer < LOG_INTERVAL {
            return false;
        }
        self.log_timer = 0.0;
        if let Some((min, avg, max)) = self.frame_times.stats() {
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | frames: {} | suspicion: {:.0}%",
                1.0 / avg.max(f64::EPSILON),
                avg * 1000.0,
                min * 1000.0,
                max * 1000.0,
                self.frame_count,
                suspicion_pct,
            );
        }
        log::debug!("tick phases: {} (total {:.1}us)", timers.summary(), timers.total_us());
        true
    }
}

impl Default for DebugStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_every_interval() {
        let mut stats = DebugStats::new();
        let timers = SystemTimers::new();
        let logged = (0..600)
            .filter(|_| stats.record_frame(1.0 / 60.0, &timers, 0.0))
            .count();
        assert_eq!(stats.frame_count(), 600);
        assert!((1..=2).contains(&logged));
    }
}
