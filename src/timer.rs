use std::time::{Duration, Instant};

/// Upper bound on fires reported by a single [`RepeatingTimer::poll`].
///
/// A frame that was asleep for hours should not race through the whole deck
/// on wake-up; surplus periods are dropped and the schedule realigned.
pub const MAX_CATCH_UP: u32 = 8;

/// Longest interval a timer accepts; longer requests are capped.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// A single repeating deadline driven by caller-supplied instants.
///
/// There is exactly one deadline slot, so re-arming always replaces the
/// previous schedule. The generation counter changes on every arm/disarm and
/// lets async owners discard wake-ups computed for a superseded schedule.
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Duration,
    deadline: Option<Instant>,
    generation: u64,
}

impl RepeatingTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.min(MAX_INTERVAL),
            deadline: None,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fresh schedule whose first fire is one interval after `now`.
    ///
    /// A deadline past the end of the clock leaves the timer disarmed.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = now.checked_add(self.interval);
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn disarm(&mut self) {
        if self.deadline.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Replace the interval, capped at [`MAX_INTERVAL`]. The current schedule
    /// is left alone; the owner decides whether to re-arm.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.min(MAX_INTERVAL);
    }

    /// Count fires due at `now` and move the deadline past `now`.
    ///
    /// The next deadline is computed from the previous one, not from `now`,
    /// so the cadence does not drift with late polls.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut deadline) = self.deadline else {
            return 0;
        };
        if self.interval.is_zero() {
            return 0;
        }
        let mut fired = 0;
        while deadline <= now {
            fired += 1;
            let Some(mut next) = deadline.checked_add(self.interval) else {
                self.disarm();
                return fired;
            };
            if fired == MAX_CATCH_UP && next <= now {
                let Some(realigned) = now.checked_add(self.interval) else {
                    self.disarm();
                    return fired;
                };
                next = realigned;
            }
            deadline = next;
            if fired == MAX_CATCH_UP {
                break;
            }
        }
        self.deadline = Some(deadline);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn fires_relative_to_previous_deadline() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::new(SEC);
        timer.arm(t0);
        assert_eq!(timer.poll(t0 + Duration::from_millis(999)), 0);
        assert_eq!(timer.poll(t0 + Duration::from_millis(1300)), 1);
        assert_eq!(timer.deadline(), Some(t0 + 2 * SEC));
        assert_eq!(timer.poll(t0 + 2 * SEC), 1);
    }

    #[test]
    fn unarmed_timer_never_fires() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::new(SEC);
        assert_eq!(timer.poll(t0 + 10 * SEC), 0);
        timer.arm(t0);
        timer.disarm();
        assert!(!timer.is_armed());
        assert_eq!(timer.poll(t0 + 10 * SEC), 0);
    }

    #[test]
    fn catch_up_is_bounded() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::new(SEC);
        timer.arm(t0);
        let late = t0 + 100 * SEC;
        assert_eq!(timer.poll(late), MAX_CATCH_UP);
        assert_eq!(timer.deadline(), Some(late + SEC));
    }

    #[test]
    fn rearm_and_disarm_bump_generation() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::new(SEC);
        let g0 = timer.generation();
        timer.arm(t0);
        let g1 = timer.generation();
        assert_ne!(g0, g1);
        timer.disarm();
        assert_ne!(timer.generation(), g1);
        let g2 = timer.generation();
        timer.disarm();
        assert_eq!(timer.generation(), g2);
    }

    #[test]
    fn interval_change_applies_on_next_arm() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::new(SEC);
        timer.arm(t0);
        let generation = timer.generation();
        timer.set_interval(3 * SEC);
        assert_eq!(timer.deadline(), Some(t0 + SEC));
        assert_eq!(timer.generation(), generation);
        timer.arm(t0 + SEC / 2);
        assert_eq!(timer.deadline(), Some(t0 + SEC / 2 + 3 * SEC));
    }

    #[test]
    fn huge_intervals_are_capped() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::new(Duration::MAX);
        assert_eq!(timer.interval(), MAX_INTERVAL);
        timer.arm(t0);
        assert_eq!(timer.deadline(), Some(t0 + MAX_INTERVAL));

        timer.set_interval(Duration::from_secs(u64::MAX));
        assert_eq!(timer.interval(), MAX_INTERVAL);
        timer.arm(t0);
        assert_eq!(timer.poll(t0 + MAX_INTERVAL), 1);
    }
}
