//! Sortable identifier generator and related types.

use std::fmt;

use crate::base62::{self, encode_padded};
use crate::id::{SortableId, SEGMENT_LEN, TIMESTAMP_LEN};
use crate::{Error, SegmentGenerator};

pub mod with_rand08;


/// The largest `unix_ts_ms` that fits in the eight-symbol timestamp segment (62^8 - 1).
pub const MAX_TIMESTAMP: u64 = 62u64.pow(TIMESTAMP_LEN as u32) - 1;

/// A trait that defines the minimum random number generator interface for [`SortableGenerator`].
///
/// Implementations must be cryptographically secure and must report failure instead of falling
/// back to a weaker source.
pub trait RandSource {
    /// Fills `dest` with random data.
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// A trait that defines the minimum system clock interface for [`SortableGenerator`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// The default [`TimeSource`] that reads the system clock.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> u64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_millis() as u64
    }
}

/// Represents a sortable identifier generator that remembers the last timestamp and random
/// segment and guarantees the monotonic order of identifiers generated within the same
/// millisecond.
///
/// Each call reads the clock and then takes one of two paths:
///
/// 1.  If the millisecond differs from the previous call (or there was none), a fresh random
///     segment is drawn.
/// 2.  If it is the same millisecond, the previous segment is incremented by one as a base-62
///     numeral. When all 62^8 values have been used up, the call fails with [`Error::Overflow`].
///
/// The generator is a plain value; it is the scope of guaranteed order. The following example
/// extends that scope across threads with Rust's standard synchronization mechanism.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use id62::SortableGenerator;
///
/// let g = sync::Arc::new(sync::Mutex::new(SortableGenerator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// A clock that moves backwards starts a fresh segment at the earlier timestamp, so identifiers
/// issued across a rollback are not ordered.
pub struct SortableGenerator<R, T = StdSystemTime> {
    timestamp: Option<u64>,
    segment: [u8; SEGMENT_LEN],
    segments: SegmentGenerator<R>,
    time_source: T,
}

impl<R: RandSource> SortableGenerator<R> {
    /// Creates a generator instance that reads the system clock.
    pub const fn new(rng: R) -> Self {
        Self::with_rand_and_time_sources(rng, StdSystemTime)
    }
}

impl<R: RandSource, T: TimeSource> SortableGenerator<R, T> {
    /// Creates a generator instance with specified random number and time sources.
    pub const fn with_rand_and_time_sources(rng: R, time_source: T) -> Self {
        Self {
            timestamp: None,
            segment: [base62::ZERO; SEGMENT_LEN],
            segments: SegmentGenerator::new(rng),
            time_source,
        }
    }

    /// Generates a new identifier from the current timestamp.
    ///
    /// See the [`SortableGenerator`] type documentation for the description.
    pub fn generate(&mut self) -> Result<SortableId, Error> {
        let unix_ts_ms = self.time_source.unix_ts_ms();
        self.generate_core(unix_ts_ms)
    }

    /// Generates a new identifier from the `unix_ts_ms` passed.
    ///
    /// The generator state is left unchanged when an error is returned.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is larger than [`MAX_TIMESTAMP`].
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> Result<SortableId, Error> {
        assert!(
            unix_ts_ms <= MAX_TIMESTAMP,
            "`unix_ts_ms` must fit in {} base-62 digits",
            TIMESTAMP_LEN
        );

        if self.timestamp == Some(unix_ts_ms) {
            if base62::increment(&mut self.segment).is_err() {
                tracing::warn!(unix_ts_ms, "random segment overflowed within one millisecond");
                return Err(Error::Overflow);
            }
        } else {
            let mut segment = [0u8; SEGMENT_LEN];
            self.segments.fill(&mut segment)?;
            self.timestamp = Some(unix_ts_ms);
            self.segment = segment;
        }

        Ok(SortableId::from_parts(encode_padded(unix_ts_ms), self.segment))
    }

    /// Generates a plain random ID of `length` symbols, sharing the random number source with the
    /// sortable identifiers.
    pub fn random_id(&mut self, length: usize) -> Result<String, Error> {
        self.segments.generate(length)
    }
}

impl<R: RandSource + Default, T: TimeSource + Default> Default for SortableGenerator<R, T> {
    fn default() -> Self {
        Self::with_rand_and_time_sources(R::default(), T::default())
    }
}

impl<R: fmt::Debug, T: fmt::Debug> fmt::Debug for SortableGenerator<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableGenerator")
            .field("timestamp", &self.timestamp)
            .field("segments", &self.segments)
            .field("time_source", &self.time_source)
            .finish_non_exhaustive()
    }
}

/// Supports operations as an infinite iterator that produces a new identifier for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use id62::SortableGenerator;
///
/// SortableGenerator::with_rand08(rand::rngs::OsRng)
///     .map(Result::unwrap)
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for SortableGenerator<R, T> {
    type Item = Result<SortableId, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for SortableGenerator<R, T> {}

#[cfg(test)]
mod tests_generate_core {
    use super::tests::{FailingRand, FrozenClock, ScriptedRand, ThreadGen};
    use super::{SortableGenerator, MAX_TIMESTAMP};
    use crate::{base62, Error};

    const TS: u64 = 0x0123_4567_89ab;

    /// Generates increasing identifiers within one millisecond
    #[test]
    fn generates_increasing_identifiers_within_one_millisecond() {
        let mut g: ThreadGen = Default::default();
        let mut prev = g.generate_core(TS).unwrap();
        assert_eq!(base62::decode(prev.timestamp_segment().as_bytes()), Some(TS));
        for _ in 0..100_000 {
            let curr = g.generate_core(TS).unwrap();
            assert!(prev < curr);
            assert!(prev.as_str() < curr.as_str());
            assert_eq!(prev.timestamp_segment(), curr.timestamp_segment());
            prev = curr;
        }
    }

    /// Generates increasing identifiers across advancing timestamps
    #[test]
    fn generates_increasing_identifiers_across_advancing_timestamps() {
        let mut g: ThreadGen = Default::default();
        let mut prev = g.generate_core(TS).unwrap();
        for i in 0..100_000u64 {
            let curr = g.generate_core(TS + i / 16).unwrap();
            assert!(prev < curr);
            prev = curr;
        }
        assert_eq!(prev.unix_ts_ms(), TS + 99_999 / 16);
    }

    /// Increments previous segment when clock is frozen
    #[test]
    fn increments_previous_segment_when_clock_is_frozen() {
        let mut g = SortableGenerator::with_rand_and_time_sources(
            ScriptedRand::new(&[3, 250, 70, 99]),
            FrozenClock(TS),
        );
        let first = g.generate().unwrap();
        let second = g.generate().unwrap();
        assert_eq!(first.random_segment(), "38b38b38");
        assert_eq!(second.random_segment(), "38b38b39");
        assert_eq!(first.timestamp_segment(), second.timestamp_segment());

        let mut expected: [u8; 8] = first.random_segment().as_bytes().try_into().unwrap();
        base62::increment(&mut expected).unwrap();
        assert_eq!(second.random_segment().as_bytes(), &expected);
    }

    /// Draws fresh segment when timestamp changes
    #[test]
    fn draws_fresh_segment_when_timestamp_changes() {
        let mut g = SortableGenerator::with_rand_and_time_sources(
            ScriptedRand::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            FrozenClock(TS),
        );
        assert_eq!(g.generate_core(TS).unwrap().random_segment(), "01234567");
        assert_eq!(g.generate_core(TS).unwrap().random_segment(), "01234568");
        assert_eq!(g.generate_core(TS + 1).unwrap().random_segment(), "89012345");
        assert_eq!(g.generate_core(TS).unwrap().random_segment(), "67890123");
    }

    /// Starts fresh segment at earlier timestamp after clock rollback
    #[test]
    fn starts_fresh_segment_at_earlier_timestamp_after_clock_rollback() {
        let mut g: ThreadGen = Default::default();
        let prev = g.generate_core(TS).unwrap();
        let curr = g.generate_core(TS - 1).unwrap();
        assert!(prev.timestamp_segment() > curr.timestamp_segment());
        assert_eq!(curr.unix_ts_ms(), TS - 1);
    }

    /// Returns overflow error when segment is exhausted
    #[test]
    fn returns_overflow_error_when_segment_is_exhausted() {
        let mut g = SortableGenerator::with_rand_and_time_sources(
            ScriptedRand::new(&[61]),
            FrozenClock(TS),
        );
        let last = g.generate_core(TS).unwrap();
        assert_eq!(last.random_segment(), "zzzzzzzz");
        assert!(matches!(g.generate_core(TS), Err(Error::Overflow)));
        assert!(matches!(g.generate_core(TS), Err(Error::Overflow)));

        let next = g.generate_core(TS + 1).unwrap();
        assert!(last < next);
    }

    /// Propagates random source failure without updating state
    #[test]
    fn propagates_random_source_failure_without_updating_state() {
        let mut g = SortableGenerator::with_rand_and_time_sources(FailingRand, FrozenClock(TS));
        assert!(matches!(g.generate(), Err(Error::RandSource(_))));
        assert!(matches!(g.generate(), Err(Error::RandSource(_))));
        assert_eq!(g.timestamp, None);
    }

    /// Encodes timestamp in fixed-width prefix
    #[test]
    fn encodes_timestamp_in_fixed_width_prefix() {
        let mut g: ThreadGen = Default::default();
        for ts in [0, 1, 61, 62, TS, MAX_TIMESTAMP] {
            let e = g.generate_core(ts).unwrap();
            assert_eq!(e.as_str().len(), 16);
            assert_eq!(e.timestamp_segment(), format!("{:0>8}", base62::encode(ts)));
            assert_eq!(e.unix_ts_ms(), ts);
        }
    }

    /// Panics if timestamp exceeds eight digits
    #[test]
    #[should_panic]
    fn panics_if_timestamp_exceeds_eight_digits() {
        let mut g: ThreadGen = Default::default();
        let _ = g.generate_core(MAX_TIMESTAMP + 1);
    }

    /// Shares random source with plain random IDs
    #[test]
    fn shares_random_source_with_plain_random_ids() {
        let mut g = SortableGenerator::with_rand_and_time_sources(
            ScriptedRand::new(&[10, 11, 12]),
            FrozenClock(TS),
        );
        assert_eq!(g.random_id(4).unwrap(), "ABCA");
        assert_eq!(g.generate().unwrap().random_segment(), "BCABCABC");
        assert!(matches!(g.random_id(0), Err(Error::InvalidLength)));
    }
}
