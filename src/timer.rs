/// Gates logical updates to a fixed interval, independent of how often it is
/// polled.
#[derive(Debug, Default)]
pub struct Timer {
    last_fire: f64,
}

impl Timer {
    pub fn new() -> Self {
        Timer { last_fire: 0.0 }
    }

    /// Returns true, and records `now` as the last firing time, once at least
    /// `interval` seconds have passed since the previous firing.
    pub fn should_fire(&mut self, now: f64, interval: f64) -> bool {
        if now - self.last_fire >= interval {
            self.last_fire = now;
            true
        } else {
            false
        }
    }
}
