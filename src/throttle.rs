use std::time::Duration;

/// Cooperative pause inserted at fixed counter intervals during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    pub every: u64,
    pub pause: Duration,
}

impl Throttle {
    pub const fn new(every: u64, pause: Duration) -> Self {
        Throttle { every, pause }
    }

    /// 1 ms every 1000 visited entries.
    pub const fn scan() -> Self {
        Throttle::new(1000, Duration::from_millis(1))
    }

    /// 5 ms every 100 deletions.
    pub const fn clean() -> Self {
        Throttle::new(100, Duration::from_millis(5))
    }

    pub const fn disabled() -> Self {
        Throttle::new(0, Duration::ZERO)
    }

    pub fn is_disabled(&self) -> bool {
        self.every == 0 || self.pause.is_zero()
    }

    /// Whether the counter, having just moved to `count`, lands on a pause point.
    pub fn due(&self, count: u64) -> bool {
        !self.is_disabled() && count > 0 && count % self.every == 0
    }

    pub fn tick(&self, count: u64) {
        if self.due(count) {
            std::thread::sleep(self.pause);
        }
    }
}
