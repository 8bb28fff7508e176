//! Integration with `rand` (v0.8) crate.

use super::RandSource;
use crate::{Error, UuidSource};
use rand::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.0.try_fill_bytes(dest).map_err(Error::entropy)
    }
}

impl<T: RngCore> UuidSource<Adapter<T>> {
    /// Creates a source object with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rand::SeedableRng;
    /// use rfcuuid::UuidSource;
    ///
    /// let mut a = UuidSource::with_rand08(rand_chacha::ChaCha8Rng::seed_from_u64(123));
    /// let mut b = UuidSource::with_rand08(rand_chacha::ChaCha8Rng::seed_from_u64(123));
    /// assert_eq!(a.new_random()?, b.new_random()?);
    /// # Ok::<(), rfcuuid::Error>(())
    /// ```
    pub const fn with_rand08(rng: T) -> Self {
        Self::new(Adapter(rng))
    }
}
