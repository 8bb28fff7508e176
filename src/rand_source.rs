//! Random number generator interface and adapters.

use std::io;

use crate::Error;

pub mod with_rand08;

/// A trait that defines the minimum random number generator interface for the generators.
///
/// Unlike [`rand::RngCore::fill_bytes`], filling is fallible: a failure of the underlying source
/// is reported as [`Error::EntropySourceFailure`] and generators never return a partially filled
/// UUID.
pub trait RandSource {
    /// Fills `dest` entirely with random data or returns an error.
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error>;
}

impl<T: RandSource + ?Sized> RandSource for &mut T {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        (**self).try_fill_bytes(dest)
    }
}

impl<T: RandSource + ?Sized> RandSource for Box<T> {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        (**self).try_fill_bytes(dest)
    }
}

/// An adapter that implements [`RandSource`] for [`io::Read`] types, reading exactly as many
/// bytes as requested.
///
/// This is useful to replay fixed byte sequences in tests. Running out of data is an
/// [`Error::EntropySourceFailure`].
///
/// # Examples
///
/// ```rust
/// use rfcuuid::{ReaderSource, UuidSource};
///
/// let bytes: Vec<u8> = (0..16).collect();
/// let mut source = UuidSource::new(ReaderSource(&bytes[..]));
/// assert_eq!(
///     source.new_random()?.to_string(),
///     "00010203-0405-4607-8809-0a0b0c0d0e0f"
/// );
/// assert!(source.new_random().is_err());
/// # Ok::<(), rfcuuid::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ReaderSource<T>(/** The wrapped [`io::Read`] type. */ pub T);

impl<T: io::Read> RandSource for ReaderSource<T> {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.0.read_exact(dest).map_err(Error::entropy)
    }
}

/// Returns a [`RandSource`] backed by the operating system's random number generator.
pub fn os_rng() -> with_rand08::Adapter<rand::rngs::OsRng> {
    with_rand08::Adapter(rand::rngs::OsRng)
}
