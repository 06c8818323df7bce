use std::time::Duration;

/// Fixed-period tick source the engagement machine starts and stops.
///
/// `start` and `stop` are idempotent.
pub trait Clock {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Clock driven by the host event loop.
///
/// Running is owned by the machine; pausing is owned by the host (focus loss)
/// and only withholds ticks, so the machine's idle time is left untouched.
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    running: bool,
    paused: bool,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: false,
            paused: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the host should forward the next tick to the machine.
    pub fn should_tick(&self) -> bool {
        self.running && !self.paused
    }
}

impl Clock for TickClock {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
