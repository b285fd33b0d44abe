use serde::{Deserialize, Serialize};

/// Delta-driven countdown. Every timed window in the simulation (cooldowns,
/// invulnerability, jump buffer, coyote time, respawn delays) is one of these,
/// decremented by the frame's elapsed time and clamped at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub remaining: f32,
}

impl Countdown {
    pub fn new(secs: f32) -> Self {
        Self {
            remaining: secs.max(0.0),
        }
    }

    /// An already-expired countdown.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    pub fn restart(&mut self, secs: f32) {
        self.remaining = secs.max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_expires() {
        let mut t = Countdown::new(0.5);
        assert!(t.is_running());
        t.tick(0.3);
        assert!(t.is_running());
        t.tick(0.3);
        assert!(t.is_expired());
        assert_eq!(t.remaining, 0.0, "Countdown must clamp at zero");
    }

    #[test]
    fn idle_is_expired() {
        assert!(Countdown::idle().is_expired());
    }

    #[test]
    fn negative_and_nan_dt_ignored() {
        let mut t = Countdown::new(1.0);
        t.tick(-1.0);
        t.tick(f32::NAN);
        assert_eq!(t.remaining, 1.0);
    }

    #[test]
    fn restart_and_clear() {
        let mut t = Countdown::idle();
        t.restart(2.0);
        assert_eq!(t.remaining, 2.0);
        t.clear();
        assert!(t.is_expired());
    }
}
