use std::cell::Cell;

/// Whole-second local time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
    second: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8, second: u8) -> Self {
        assert!(hour < 24, "hour out of range: {hour}");
        assert!(minute < 60, "minute out of range: {minute}");
        assert!(second < 60, "second out of range: {second}");

        Self {
            hour,
            minute,
            second,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

impl From<time::Time> for ClockTime {
    fn from(value: time::Time) -> Self {
        Self::new(value.hour(), value.minute(), value.second())
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

pub trait Clock {
    fn now(&self) -> ClockTime;
}

/// Wall clock in the host's local timezone.
///
/// Looking up the local offset fails on some platforms once the process has more than one
/// thread, so the offset found at construction is kept and reused whenever a later lookup fails.
#[derive(Debug)]
pub struct LocalClock {
    last_offset: Cell<time::UtcOffset>,
}

impl LocalClock {
    pub fn new() -> Self {
        let offset = time::UtcOffset::current_local_offset().unwrap_or_else(|error| {
            tracing::warn!(?error, "Could not determine local UTC offset, falling back to UTC");
            time::UtcOffset::UTC
        });
        tracing::debug!(%offset, "Using local UTC offset");

        Self {
            last_offset: Cell::new(offset),
        }
    }
}

impl Clock for LocalClock {
    fn now(&self) -> ClockTime {
        let now = match time::OffsetDateTime::now_local() {
            Ok(now) => {
                self.last_offset.set(now.offset());
                now
            }
            Err(error) => {
                tracing::trace!(?error, "Local offset lookup failed, reusing last known offset");
                time::OffsetDateTime::now_utc().to_offset(self.last_offset.get())
            }
        };

        ClockTime::from(now.time())
    }
}

/// Caches the most recent reading of a [`Clock`].
#[derive(Debug)]
pub struct TimeSource<C> {
    clock: C,
    now: ClockTime,
}

impl<C: Clock> TimeSource<C> {
    pub fn new(clock: C) -> Self {
        let now = clock.now();
        Self { clock, now }
    }

    pub fn update(&mut self) {
        self.now = self.clock.now();
    }

    pub fn time(&self) -> ClockTime {
        self.now
    }

    pub fn hour(&self) -> u8 {
        self.now.hour
    }

    pub fn minute(&self) -> u8 {
        self.now.minute
    }

    pub fn second(&self) -> u8 {
        self.now.second
    }
}

/// Time left until the wall clock reaches the next whole second.
pub fn until_next_second(now: time::OffsetDateTime) -> std::time::Duration {
    const NANOS_PER_SECOND: u32 = 1_000_000_000;

    std::time::Duration::from_nanos(u64::from(NANOS_PER_SECOND - now.nanosecond()))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::rc::Rc;

    use super::*;

    /// Clock whose reading is set from the outside.
    #[derive(Debug, Clone)]
    pub(crate) struct ManualClock(Rc<Cell<ClockTime>>);

    impl ManualClock {
        pub(crate) fn new(time: ClockTime) -> Self {
            Self(Rc::new(Cell::new(time)))
        }

        pub(crate) fn set(&self, time: ClockTime) {
            self.0.set(time);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> ClockTime {
            self.0.get()
        }
    }

    #[test]
    fn test_time_source_reads_clock_on_construction() {
        let source = TimeSource::new(ManualClock::new(ClockTime::new(13, 5, 42)));

        assert_eq!(source.hour(), 13);
        assert_eq!(source.minute(), 5);
        assert_eq!(source.second(), 42);
    }

    #[test]
    fn test_time_source_keeps_snapshot_until_update() {
        let clock = ManualClock::new(ClockTime::new(23, 59, 59));
        let mut source = TimeSource::new(clock.clone());

        clock.set(ClockTime::new(0, 0, 0));
        assert_eq!(source.time(), ClockTime::new(23, 59, 59));

        source.update();
        assert_eq!(source.time(), ClockTime::new(0, 0, 0));
    }

    #[test]
    fn test_clock_time_from_time() {
        let t = time::Time::from_hms(7, 8, 9).unwrap();
        assert_eq!(ClockTime::from(t), ClockTime::new(7, 8, 9));
    }

    #[test]
    fn test_clock_time_display() {
        assert_eq!(ClockTime::new(1, 2, 3).to_string(), "01:02:03");
    }

    #[test]
    #[should_panic(expected = "hour out of range")]
    fn test_clock_time_rejects_hour_24() {
        let _ = ClockTime::new(24, 0, 0);
    }

    #[test]
    fn test_local_clock_reads_valid_time() {
        let now = LocalClock::new().now();
        assert!(now.hour() < 24);
        assert!(now.minute() < 60);
        assert!(now.second() < 60);
    }

    #[test]
    fn test_until_next_second() {
        let on_boundary = time::OffsetDateTime::UNIX_EPOCH;
        assert_eq!(until_next_second(on_boundary), std::time::Duration::from_secs(1));

        let quarter_past = time::OffsetDateTime::UNIX_EPOCH
            .replace_nanosecond(250_000_000)
            .unwrap();
        assert_eq!(
            until_next_second(quarter_past),
            std::time::Duration::from_millis(750)
        );
    }
}
