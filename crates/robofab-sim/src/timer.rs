/// Countdown that tracks how long a machine stays busy.
///
/// A fresh timer is idle and paused. [`restart`](Self::restart) makes it
/// busy; [`update`](Self::update) reports the moment it runs out, once, and
/// pauses it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyTimer {
    delay: u32,
    elapsed: u32,
    paused: bool,
}

impl BusyTimer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay: delay_ms,
            elapsed: delay_ms,
            paused: true,
        }
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn is_idle(&self) -> bool {
        self.elapsed >= self.delay
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Zero the progress and start counting.
    pub fn restart(&mut self) {
        self.elapsed = 0;
        self.paused = false;
    }

    /// Advance by `dt` milliseconds. Returns `true` on the update where the
    /// timer goes from busy to idle.
    pub fn update(&mut self, dt: u32) -> bool {
        if self.paused {
            return false;
        }
        if !self.is_idle() {
            self.elapsed = self.elapsed.saturating_add(dt);
        }
        if self.is_idle() {
            self.paused = true;
            return true;
        }
        false
    }

    /// Completion in percent, 0 to 100.
    pub fn progress(&self) -> u32 {
        if self.is_idle() || self.delay == 0 {
            return 100;
        }
        (u64::from(self.elapsed) * 100 / u64::from(self.delay)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_paused() {
        let mut t = BusyTimer::new(1000);
        assert!(t.is_idle());
        assert!(t.is_paused());
        assert_eq!(t.progress(), 100);
        assert!(!t.update(5000));
    }

    #[test]
    fn reports_busy_to_idle_once() {
        let mut t = BusyTimer::new(1000);
        t.restart();
        assert!(!t.is_idle());
        assert!(!t.update(400));
        assert_eq!(t.progress(), 40);
        assert!(!t.update(599));
        assert_eq!(t.progress(), 99);
        assert!(t.update(1));
        assert!(t.is_idle());
        assert!(t.is_paused());
        assert!(!t.update(1000));
    }

    #[test]
    fn overshoot_caps_progress() {
        let mut t = BusyTimer::new(500);
        t.restart();
        assert!(t.update(u32::MAX));
        assert_eq!(t.progress(), 100);
    }

    #[test]
    fn restart_mid_run_starts_over() {
        let mut t = BusyTimer::new(100);
        t.restart();
        t.update(90);
        t.restart();
        assert!(!t.update(90));
        assert!(t.update(10));
    }
}
