//! Buffered random bytes for high-throughput generation.

use crate::{Error, RandSource};

const POOL_SIZE: usize = 16 * 16;

/// A buffer of random bytes handed out 16 at a time.
///
/// The pool is refilled in one read from the underlying source once every slice has been handed
/// out. Callers serialize access through the lock that owns the pool, so no two requests ever
/// receive overlapping bytes.
pub(crate) struct RandPool {
    buffer: Box<[u8; POOL_SIZE]>,
    pos: usize,
}

impl RandPool {
    pub fn new() -> Self {
        Self {
            buffer: Box::new([0u8; POOL_SIZE]),
            pos: POOL_SIZE,
        }
    }

    /// Copies the next unused 16 bytes into `dest`, refilling the pool from `rng` first if it is
    /// exhausted. A failed refill leaves the pool exhausted.
    pub fn fill16<R: RandSource + ?Sized>(
        &mut self,
        rng: &mut R,
        dest: &mut [u8; 16],
    ) -> Result<(), Error> {
        if self.pos == POOL_SIZE {
            rng.try_fill_bytes(&mut self.buffer[..])?;
            self.pos = 0;
        }
        dest.copy_from_slice(&self.buffer[self.pos..self.pos + 16]);
        self.pos += 16;
        Ok(())
    }
}
