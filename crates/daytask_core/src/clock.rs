use std::fmt;
use time::{OffsetDateTime, UtcOffset};

/// Ambient current-time source, injected so repositories and clocks
/// can be driven deterministically in tests.
pub trait TimeSource {
    fn now(&self) -> OffsetDateTime;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}

/// Wall-clock time in the local offset, falling back to UTC when the
/// local offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> OffsetDateTime {
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        OffsetDateTime::now_utc().to_offset(offset)
    }
}

/// The instant the calendar day containing `now` ends: the next local
/// midnight.
pub fn end_of_day(now: OffsetDateTime) -> OffsetDateTime {
    let next = now.date().next_day().unwrap_or(now.date());
    next.midnight().assume_offset(now.offset())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining { hours: u32, minutes: u8, seconds: u8 },
    DeadlineReached,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining {
                hours,
                minutes,
                seconds,
            } => write!(f, "{hours}h {minutes}m {seconds}s"),
            Self::DeadlineReached => write!(f, "Deadline reached!"),
        }
    }
}

/// Splits the time left before `deadline` into whole hours, minutes
/// and seconds by successive integer division of the millisecond
/// difference. At or past the deadline the terminal state is reported.
pub fn countdown(now: OffsetDateTime, deadline: OffsetDateTime) -> Countdown {
    let millis = (deadline - now).whole_milliseconds();
    if millis <= 0 {
        return Countdown::DeadlineReached;
    }

    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let seconds = (millis % 60_000) / 1_000;

    Countdown::Remaining {
        hours: hours as u32,
        minutes: minutes as u8,
        seconds: seconds as u8,
    }
}

/// Live countdown to the midnight ending the day the clock started.
/// The deadline is captured once; each poll compares it against the
/// current time, so past midnight the clock stays in the terminal
/// state until a new one is started for the new day.
pub struct DeadlineClock<T: TimeSource> {
    time: T,
    deadline: OffsetDateTime,
}

impl<T: TimeSource> DeadlineClock<T> {
    pub fn new(time: T) -> Self {
        let deadline = end_of_day(time.now());
        Self { time, deadline }
    }

    pub fn deadline(&self) -> OffsetDateTime {
        self.deadline
    }

    pub fn remaining(&self) -> Countdown {
        countdown(self.time.now(), self.deadline)
    }
}
