//! Recurring timers owned by a game session
//!
//! Timers are plain data: the session polls [`Timers::pop_due`] with the
//! current time and dispatches whatever has come due. Cancelling removes the
//! interval outright, so nothing can fire after the session lets go of it.

/// What a recurring timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One second off the round clock
    Countdown,
    /// Continuous motion step (~60 Hz)
    Frame,
    /// Spawn a target
    Spawn,
    /// Clear targets
    Hide,
    /// Sequence playback step
    Reveal,
}

#[derive(Debug, Clone)]
struct Interval {
    kind: TimerKind,
    period_ms: u64,
    next_due_ms: u64,
}

/// Set of recurring intervals
#[derive(Debug, Clone, Default)]
pub struct Timers {
    intervals: Vec<Interval>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a recurring timer; first fire is one period after `now_ms`.
    /// Re-arming an existing kind restarts its phase.
    pub fn arm(&mut self, kind: TimerKind, period_ms: u64, now_ms: u64) {
        let period_ms = period_ms.max(1);
        self.cancel(kind);
        self.intervals.push(Interval {
            kind,
            period_ms,
            next_due_ms: now_ms + period_ms,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.intervals.retain(|i| i.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.intervals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.intervals.iter().any(|i| i.kind == kind)
    }

    /// Take the earliest tick due at or before `now_ms`.
    ///
    /// Ties go to the timer armed first. The fired interval is rescheduled
    /// one period later.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<TimerKind> {
        let mut best: Option<usize> = None;
        for (i, interval) in self.intervals.iter().enumerate() {
            if interval.next_due_ms > now_ms {
                continue;
            }
            match best {
                Some(b) if self.intervals[b].next_due_ms <= interval.next_due_ms => {}
                _ => best = Some(i),
            }
        }

        let interval = &mut self.intervals[best?];
        interval.next_due_ms += interval.period_ms;
        Some(interval.kind)
    }

    /// Drop any backlog: overdue timers next fire one period after `now_ms`
    pub fn resync(&mut self, now_ms: u64) {
        for interval in &mut self.intervals {
            if interval.next_due_ms <= now_ms {
                interval.next_due_ms = now_ms + interval.period_ms;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut Timers, now: u64) -> Vec<TimerKind> {
        std::iter::from_fn(|| timers.pop_due(now)).collect()
    }

    #[test]
    fn test_nothing_due_before_first_period() {
        let mut timers = Timers::new();
        timers.arm(TimerKind::Countdown, 1000, 0);
        assert_eq!(timers.pop_due(999), None);
        assert_eq!(timers.pop_due(1000), Some(TimerKind::Countdown));
        assert_eq!(timers.pop_due(1000), None);
    }

    #[test]
    fn test_schedule_order_with_ties() {
        let mut timers = Timers::new();
        timers.arm(TimerKind::Spawn, 1000, 0);
        timers.arm(TimerKind::Hide, 2000, 0);
        timers.arm(TimerKind::Countdown, 1000, 0);

        assert_eq!(
            drain(&mut timers, 2000),
            [
                TimerKind::Spawn,
                TimerKind::Countdown,
                TimerKind::Spawn,
                TimerKind::Hide,
                TimerKind::Countdown,
            ]
        );
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        timers.arm(TimerKind::Frame, 16, 0);
        timers.arm(TimerKind::Countdown, 1000, 0);
        timers.cancel(TimerKind::Frame);
        assert_eq!(drain(&mut timers, 1000), [TimerKind::Countdown]);

        timers.cancel_all();
        assert!(timers.is_empty());
        assert_eq!(timers.pop_due(u64::MAX / 2), None);
    }

    #[test]
    fn test_resync_drops_backlog() {
        let mut timers = Timers::new();
        timers.arm(TimerKind::Countdown, 1000, 0);
        timers.resync(10_500);
        assert_eq!(timers.pop_due(11_000), None);
        assert_eq!(timers.pop_due(11_500), Some(TimerKind::Countdown));
    }

    #[test]
    fn test_rearm_restarts_phase() {
        let mut timers = Timers::new();
        timers.arm(TimerKind::Reveal, 500, 0);
        timers.arm(TimerKind::Reveal, 500, 300);
        assert_eq!(timers.pop_due(500), None);
        assert_eq!(timers.pop_due(800), Some(TimerKind::Reveal));
        assert!(timers.is_armed(TimerKind::Reveal));
    }
}
