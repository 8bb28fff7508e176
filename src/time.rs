//! RFC 4122 timestamps and the time source abstraction.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Error, Uuid, Version};

/// Number of 100-nanosecond intervals per second.
const TICKS_PER_SEC: i64 = 10_000_000;

/// Number of 100-nanosecond intervals between 1582-10-15 and 1970-01-01.
const G1582_TICKS: i64 = (2_440_587 - 2_299_160) * 86_400 * TICKS_PER_SEC;

const MAX_RFC_TICKS: i64 = (1 << 60) - 1;

const MAX_UNIX_TS_MS: u64 = (1 << 48) - 1;

/// Represents an RFC 4122 timestamp: the number of 100-nanosecond intervals since
/// 1582-10-15T00:00:00Z, the Gregorian calendar epoch.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Time(i64);

impl Time {
    /// Creates an object from a raw tick count.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Returns the raw tick count.
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Creates an object from a Unix timestamp. Sub-tick precision is truncated, and results
    /// beyond the range of `i64` ticks saturate. Generators reject such times.
    pub const fn from_unix(secs: i64, nanos: u32) -> Self {
        Self(
            secs.saturating_mul(TICKS_PER_SEC)
                .saturating_add((nanos / 100) as i64)
                .saturating_add(G1582_TICKS),
        )
    }

    /// Creates an object from a Unix timestamp in milliseconds. Saturates like
    /// [`from_unix()`](Self::from_unix).
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(10_000).saturating_add(G1582_TICKS))
    }

    /// Returns the time as seconds and nanoseconds since the Unix epoch. The nanosecond part is
    /// always in `0..1_000_000_000`, even for instants before 1970.
    pub const fn unix_time(self) -> (i64, i64) {
        let since_unix = self.0 as i128 - G1582_TICKS as i128;
        (
            since_unix.div_euclid(TICKS_PER_SEC as i128) as i64,
            since_unix.rem_euclid(TICKS_PER_SEC as i128) as i64 * 100,
        )
    }

    /// Returns the time as milliseconds since the Unix epoch.
    pub const fn unix_millis(self) -> i64 {
        (self.0 as i128 - G1582_TICKS as i128).div_euclid(10_000) as i64
    }

    /// Converts a system time, or returns `None` if it does not fit in `i64` ticks.
    pub fn checked_from_system_time(src: SystemTime) -> Option<Self> {
        let (d, sign) = match src.duration_since(UNIX_EPOCH) {
            Ok(d) => (d, 1),
            Err(err) => (err.duration(), -1),
        };
        i64::try_from(d.as_secs())
            .ok()?
            .checked_mul(TICKS_PER_SEC)?
            .checked_add((d.subsec_nanos() / 100) as i64)?
            .checked_mul(sign)?
            .checked_add(G1582_TICKS)
            .map(Self)
    }

    /// Returns the 60-bit tick value stored in time-based UUIDs, or an error if the time is
    /// before 1582-10-15 or too far in the future to fit.
    pub(crate) fn rfc_ticks(self) -> Result<u64, Error> {
        if (0..=MAX_RFC_TICKS).contains(&self.0) {
            Ok(self.0 as u64)
        } else {
            Err(Error::TimeOutOfRange(self))
        }
    }

    /// Returns the 48-bit Unix millisecond value stored in version 7 UUIDs, or an error if the
    /// time is before 1970 or too far in the future to fit.
    pub(crate) fn unix_ts_ms(self) -> Result<u64, Error> {
        u64::try_from(self.unix_millis())
            .ok()
            .filter(|ms| *ms <= MAX_UNIX_TS_MS)
            .ok_or(Error::TimeOutOfRange(self))
    }
}

impl From<SystemTime> for Time {
    /// Converts a system time, saturating at the bounds of `i64` ticks.
    fn from(src: SystemTime) -> Self {
        Self::checked_from_system_time(src).unwrap_or(if src < UNIX_EPOCH {
            Self(i64::MIN)
        } else {
            Self(i64::MAX)
        })
    }
}

impl From<Time> for SystemTime {
    fn from(src: Time) -> Self {
        let (secs, nanos) = src.unix_time();
        let nanos = Duration::from_nanos(nanos as u64);
        if secs >= 0 {
            UNIX_EPOCH + Duration::from_secs(secs as u64) + nanos
        } else {
            UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + nanos
        }
    }
}

/// A trait that defines the clock interface used by time-based generators.
pub trait TimeSource {
    /// Returns the current time.
    fn now(&self) -> Result<Time, Error>;
}

/// The default [`TimeSource`] that reads [`SystemTime::now()`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn now(&self) -> Result<Time, Error> {
        Time::checked_from_system_time(SystemTime::now())
            .ok_or_else(|| Error::ClockReadFailure("system time out of range".to_owned()))
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Result<Time, Error> {
        (**self).now()
    }
}

impl Uuid {
    /// Returns the generation time encoded in a time-based UUID, or `None` if the version field
    /// does not denote one.
    ///
    /// Versions 1 and 2 use the original field order, version 6 the reordered one, and version 7
    /// yields millisecond precision. DCE Security UUIDs overwrite `time_low` with the local id,
    /// so their times are only accurate to about seven minutes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfcuuid::Uuid;
    ///
    /// let uuid = "20616934-4ba2-11e7-8000-010203040506".parse::<Uuid>()?;
    /// assert_eq!(uuid.time().map(|t| t.unix_time()), Some((1_496_854_535, 812_946_000)));
    /// # Ok::<(), rfcuuid::Error>(())
    /// ```
    pub fn time(&self) -> Option<Time> {
        let b = self.as_bytes();
        let field = |range: std::ops::Range<usize>| {
            b[range].iter().fold(0i64, |acc, e| acc << 8 | *e as i64)
        };
        match self.version() {
            Version::MAC | Version::DCE => Some(Time(
                (field(6..8) & 0x0fff) << 48 | field(4..6) << 32 | field(0..4),
            )),
            Version::SORT_MAC => Some(Time(field(0..6) << 12 | (field(6..8) & 0x0fff))),
            Version::SORT_RAND => Some(Time::from_unix_millis(field(0..6))),
            _ => None,
        }
    }

    /// Returns the 14-bit clock sequence of a version 1, 2 or 6 UUID.
    pub fn clock_sequence(&self) -> Option<u16> {
        matches!(self.version(), Version::MAC | Version::DCE | Version::SORT_MAC)
            .then(|| u16::from_be_bytes([self.as_bytes()[8], self.as_bytes()[9]]) & 0x3fff)
    }

    /// Returns the 6-byte node id of a version 1, 2 or 6 UUID.
    pub fn node_id(&self) -> Option<[u8; 6]> {
        let mut node_id = [0u8; 6];
        node_id.copy_from_slice(&self.as_bytes()[10..]);
        matches!(self.version(), Version::MAC | Version::DCE | Version::SORT_MAC).then_some(node_id)
    }
}
