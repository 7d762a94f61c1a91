use crate::error::TimingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayConfig {
    pub interval_ms: u64,
    pub enabled: bool,
}

impl AutoplayConfig {
    pub fn new(interval_ms: u64) -> Result<Self, TimingError> {
        if interval_ms == 0 {
            return Err(TimingError::ZeroInterval);
        }
        Ok(Self {
            interval_ms,
            enabled: true,
        })
    }

    pub fn disabled() -> Self {
        Self {
            interval_ms: 0,
            enabled: false,
        }
    }
}

/// Repeating autoplay timer held as a single deadline.
///
/// Arming always replaces the previous deadline, so two timers can never be
/// live at once.
#[derive(Debug, Clone)]
pub struct AutoplayScheduler {
    config: AutoplayConfig,
    applicable: bool,
    due_ms: Option<u64>,
}

impl AutoplayScheduler {
    pub fn new(config: AutoplayConfig) -> Self {
        Self {
            config,
            applicable: false,
            due_ms: None,
        }
    }

    pub fn config(&self) -> AutoplayConfig {
        self.config
    }

    pub fn is_running(&self) -> bool {
        self.due_ms.is_some()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.due_ms
    }

    fn can_run(&self) -> bool {
        self.applicable && self.config.enabled && self.config.interval_ms > 0
    }

    /// Marks whether the carousel currently has enough items to rotate.
    pub fn set_applicable(&mut self, applicable: bool, now_ms: u64) {
        let was = self.applicable;
        self.applicable = applicable;
        if !applicable {
            self.stop();
        } else if !was {
            self.start(now_ms);
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        self.stop();
        if self.can_run() {
            self.due_ms = Some(now_ms + self.config.interval_ms);
        }
    }

    pub fn restart(&mut self, now_ms: u64) {
        self.start(now_ms);
    }

    pub fn stop(&mut self) {
        self.due_ms = None;
    }

    /// Returns true once per elapsed interval and re-arms the timer.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(due) = self.due_ms else {
            return false;
        };
        if now_ms < due {
            return false;
        }

        let mut next = due + self.config.interval_ms;
        if next <= now_ms {
            next = now_ms + self.config.interval_ms;
        }
        self.due_ms = Some(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(interval_ms: u64) -> AutoplayScheduler {
        let mut s = AutoplayScheduler::new(AutoplayConfig::new(interval_ms).unwrap());
        s.set_applicable(true, 0);
        s
    }

    #[test]
    fn fires_once_per_interval() {
        let mut s = scheduler(5_000);
        assert!(!s.poll(4_999));
        assert!(s.poll(5_000));
        assert!(!s.poll(5_001));
        assert_eq!(s.next_deadline(), Some(10_000));
        assert!(s.poll(10_000));
    }

    #[test]
    fn restart_pushes_deadline_out() {
        let mut s = scheduler(5_000);
        s.restart(3_000);
        assert_eq!(s.next_deadline(), Some(8_000));
        assert!(!s.poll(5_000));
        assert!(s.poll(8_000));
    }

    #[test]
    fn late_poll_does_not_burst() {
        let mut s = scheduler(1_000);
        assert!(s.poll(7_500));
        assert_eq!(s.next_deadline(), Some(8_500));
        assert!(!s.poll(7_600));
    }

    #[test]
    fn not_applicable_never_arms() {
        let mut s = AutoplayScheduler::new(AutoplayConfig::new(1_000).unwrap());
        s.start(0);
        assert!(!s.is_running());

        s.set_applicable(true, 0);
        assert!(s.is_running());
        s.set_applicable(false, 10);
        assert!(!s.is_running());
        assert!(!s.poll(5_000));
    }

    #[test]
    fn disabled_config_never_arms() {
        let mut s = AutoplayScheduler::new(AutoplayConfig::disabled());
        s.set_applicable(true, 0);
        assert!(!s.is_running());
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(AutoplayConfig::new(0), Err(TimingError::ZeroInterval));
    }
}
