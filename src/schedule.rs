//! Cooperative scheduler for the coarse timer and the per-frame callback.
//!
//! Time is logical: the owner feeds elapsed wall time through `advance` and
//! gets back due events one by one. Each kind has at most one interval
//! outstanding; starting it again replaces the old one. A stalled caller
//! gets at most one firing of each kind per `advance`, never a backlog.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    /// Coarse tick: countdown, spawning, time keeping.
    Timer,
    /// Display-rate tick: movement and rendering.
    Frame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    period: Duration,
    next: Duration,
}

impl Interval {
    fn starting_at(now: Duration, period: Duration) -> Self {
        Self {
            period,
            next: now + period,
        }
    }

    /// Schedule the following firing. Periods that fall inside the current
    /// advance are dropped rather than replayed in a burst.
    fn reschedule(&mut self, horizon: Duration) {
        self.next += self.period;
        if self.next <= horizon {
            self.next = horizon + self.period;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    now: Duration,
    /// Logical time `advance` is allowed to reach.
    horizon: Duration,
    timer: Option<Interval>,
    frame: Option<Interval>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_timer(&mut self, period: Duration) {
        self.timer = Some(Interval::starting_at(self.now, period));
    }

    pub fn start_frames(&mut self, period: Duration) {
        self.frame = Some(Interval::starting_at(self.now, period));
    }

    /// Drop both intervals. Nothing fires until one is started again.
    pub fn cancel(&mut self) {
        self.timer = None;
        self.frame = None;
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn frames_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.timer.is_none() && self.frame.is_none()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Allow time to move `dt` further. Drain events with `next_due`.
    pub fn advance(&mut self, dt: Duration) {
        self.horizon += dt;
    }

    /// Pop the earliest event due before the horizon, moving the clock to
    /// it. When nothing is due the clock jumps to the horizon.
    ///
    /// On a tie the timer fires before the frame.
    pub fn next_due(&mut self) -> Option<Due> {
        let timer = self.timer.map(|t| t.next).filter(|&t| t <= self.horizon);
        let frame = self.frame.map(|f| f.next).filter(|&f| f <= self.horizon);

        let due = match (timer, frame) {
            (Some(t), Some(f)) if f < t => Due::Frame,
            (Some(_), _) => Due::Timer,
            (None, Some(_)) => Due::Frame,
            (None, None) => {
                self.now = self.horizon;
                return None;
            }
        };

        let interval = match due {
            Due::Timer => self.timer.as_mut(),
            Due::Frame => self.frame.as_mut(),
        };
        if let Some(interval) = interval {
            self.now = interval.next;
            interval.reschedule(self.horizon);
        }
        Some(due)
    }
}
