use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Live one-second countdown owned by an interview.
///
/// There is no global timer: the owner holds at most one `Countdown` and
/// cancels it by dropping it. Each arm gets a fresh id so a stale handle can
/// never be mistaken for the live one.
#[derive(Debug)]
pub struct Countdown {
    id: u64,
    interval: Duration,
    next_due: Instant,
}

impl Countdown {
    pub fn arm(id: u64, now: Instant) -> Self {
        Self::with_interval(id, TICK_INTERVAL, now)
    }

    pub fn with_interval(id: u64, interval: Duration, now: Instant) -> Self {
        Self {
            id,
            interval,
            next_due: now + interval,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of whole intervals elapsed since the last poll; advances the schedule
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while now >= self.next_due {
            self.next_due += self.interval;
            due += 1;
        }
        due
    }
}
