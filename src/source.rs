//! Random UUID generator that owns its random number generator.

use crate::rand_source::{os_rng, with_rand08::Adapter};
use crate::{must, Error, RandSource, StdSystemTime, Time, TimeSource, Uuid, Version};

/// Represents a random UUID generator holding its own random number generator.
///
/// This is useful when a task needs a random number generator of its own, e.g. a seeded one for
/// reproducible output, or one per thread to avoid contention. A source has no clock state: it
/// produces version 4 UUIDs and version 7 UUIDs whose random bits come from its generator.
///
/// # Examples
///
/// ```rust
/// use rand::SeedableRng;
/// use rfcuuid::UuidSource;
///
/// let mut a = UuidSource::with_rand08(rand_chacha::ChaCha8Rng::seed_from_u64(42));
/// let mut b = UuidSource::with_rand08(rand_chacha::ChaCha8Rng::seed_from_u64(42));
/// for _ in 0..4 {
///     assert_eq!(a.generate(), b.generate());
/// }
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct UuidSource<R = Adapter<rand::rngs::OsRng>> {
    rng: R,
}

impl<R: RandSource> UuidSource<R> {
    /// Creates a source object with a random number generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Replaces the random number generator.
    pub fn set_rand(&mut self, rng: R) {
        self.rng = rng;
    }

    /// Generates a version 4 UUID.
    pub fn new_random(&mut self) -> Result<Uuid, Error> {
        let mut bytes = [0u8; 16];
        self.rng.try_fill_bytes(&mut bytes)?;
        Ok(Uuid::tagged(bytes, Version::RANDOM))
    }

    /// Generates a version 4 UUID, panicking if the random number generator fails.
    pub fn generate(&mut self) -> Uuid {
        must(self.new_random())
    }

    /// Generates a version 7 UUID from the current time.
    pub fn new_v7(&mut self) -> Result<Uuid, Error> {
        self.new_v7_at(StdSystemTime.now()?)
    }

    /// Generates a version 7 UUID from a specified time. Fails if `at` is before 1970 or does not
    /// fit in the 48-bit millisecond field.
    pub fn new_v7_at(&mut self, at: Time) -> Result<Uuid, Error> {
        let unix_ts_ms = at.unix_ts_ms()?;
        let mut bytes = [0u8; 16];
        self.rng.try_fill_bytes(&mut bytes[6..])?;
        bytes[..6].copy_from_slice(&unix_ts_ms.to_be_bytes()[2..]);
        Ok(Uuid::tagged(bytes, Version::SORT_RAND))
    }
}

impl UuidSource {
    /// Creates a source object backed by the operating system's random number generator.
    pub fn os() -> Self {
        Self::new(os_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::UuidSource;
    use crate::{Error, ReaderSource, Time, Variant, Version};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Reproduces sequences from identical seeds
    #[test]
    fn reproduces_sequences_from_identical_seeds() {
        let mut a = UuidSource::with_rand08(ChaCha8Rng::seed_from_u64(123));
        let mut b = UuidSource::with_rand08(ChaCha8Rng::seed_from_u64(123));
        for _ in 0..1_000 {
            assert_eq!(a.new_random().unwrap(), b.new_random().unwrap());
        }

        let mut c = UuidSource::with_rand08(ChaCha8Rng::seed_from_u64(456));
        let mut d = UuidSource::with_rand08(ChaCha8Rng::seed_from_u64(789));
        for _ in 0..1_000 {
            assert_ne!(c.new_random().unwrap(), d.new_random().unwrap());
        }
    }

    /// Restarts sequence after replacing generator
    #[test]
    fn restarts_sequence_after_replacing_generator() {
        let mut a = UuidSource::with_rand08(ChaCha8Rng::seed_from_u64(123));
        let first = a.generate();
        a.generate();
        a.set_rand(crate::rand_source::with_rand08::Adapter(
            ChaCha8Rng::seed_from_u64(123),
        ));
        assert_eq!(a.generate(), first);
    }

    /// Sets version and variant bits
    #[test]
    fn sets_version_and_variant_bits() {
        let mut g = UuidSource::os();
        for _ in 0..10_000 {
            let e = g.new_random().unwrap();
            assert_eq!(e.version(), Version::RANDOM);
            assert_eq!(e.variant(), Variant::Rfc4122);
            let e = g.new_v7().unwrap();
            assert_eq!(e.version(), Version::SORT_RAND);
            assert_eq!(e.variant(), Variant::Rfc4122);
        }
    }

    /// Encodes timestamp of v7
    #[test]
    fn encodes_timestamp_of_v7() {
        let bytes: Vec<u8> = (0..10).collect();
        let mut g = UuidSource::new(ReaderSource(&bytes[..]));
        let e = g
            .new_v7_at(Time::from_unix_millis(0x0123_4567_89ab))
            .unwrap();
        assert_eq!(&e.encode() as &str, "01234567-89ab-7001-8203-040506070809");
        assert!(matches!(
            g.new_v7_at(Time::from_unix_millis(-1)),
            Err(Error::TimeOutOfRange(_))
        ));
        assert!(matches!(
            g.new_v7_at(Time::from_unix_millis(1 << 48)),
            Err(Error::TimeOutOfRange(_))
        ));
        assert!(matches!(
            g.new_v7_at(Time::from_unix_millis(0)),
            Err(Error::EntropySourceFailure(_))
        ));
    }

    /// Panics in infallible flavor on generator failure
    #[test]
    #[should_panic]
    fn panics_in_infallible_flavor_on_generator_failure() {
        UuidSource::new(ReaderSource(&[0u8; 15][..])).generate();
    }
}
