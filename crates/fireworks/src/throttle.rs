//! Sliding-window limiter for bursts.

use std::collections::VecDeque;
use std::time::Duration;

/// Admits at most `max` events in any `window`-long span.
#[derive(Debug, Clone)]
pub struct BurstThrottle {
    window: Duration,
    max: usize,
    /// Timestamps of admitted events still inside the window, oldest first.
    admitted: VecDeque<Duration>,
    suppressed: u64,
}

impl BurstThrottle {
    pub fn new(window: Duration, max: usize) -> Self {
        Self {
            window,
            max,
            admitted: VecDeque::with_capacity(max),
            suppressed: 0,
        }
    }

    /// Record a request at `now` and report whether it may run.
    pub fn admit(&mut self, now: Duration) -> bool {
        while let Some(&oldest) = self.admitted.front() {
            if now.saturating_sub(oldest) >= self.window {
                self.admitted.pop_front();
            } else {
                break;
            }
        }
        if self.admitted.len() < self.max {
            self.admitted.push_back(now);
            true
        } else {
            self.suppressed += 1;
            false
        }
    }

    /// Requests rejected since creation.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn three_rapid_requests_admit_two() {
        let mut t = BurstThrottle::new(ms(200), 2);
        let results: Vec<bool> = [0, 40, 90].into_iter().map(|v| t.admit(ms(1000 + v))).collect();
        assert_eq!(results, vec![true, true, false]);
        assert_eq!(t.suppressed(), 1);
    }

    #[test]
    fn window_slides_past_old_admissions() {
        let mut t = BurstThrottle::new(ms(200), 2);
        assert!(t.admit(ms(0)));
        assert!(t.admit(ms(150)));
        assert!(!t.admit(ms(199)));
        // The first admission leaves the window at 200ms, the second at 350ms.
        assert!(t.admit(ms(200)));
        assert!(!t.admit(ms(300)));
        assert!(t.admit(ms(350)));
    }

    #[test]
    fn spaced_requests_are_never_suppressed() {
        let mut t = BurstThrottle::new(ms(200), 2);
        for i in 0..50 {
            assert!(t.admit(ms(i * 150)));
        }
        assert_eq!(t.suppressed(), 0);
    }

    #[test]
    fn zero_limit_rejects_everything() {
        let mut t = BurstThrottle::new(ms(200), 0);
        assert!(!t.admit(ms(0)));
        assert!(!t.admit(ms(10_000)));
    }
}
