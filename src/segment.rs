//! Uniform random base-62 strings drawn by rejection sampling.

use std::fmt;

use crate::base62::{ALPHABET, RADIX};
use crate::generator::{with_rand08, RandSource};
use crate::Error;

/// The length of plain random IDs when no other length is called for.
pub const DEFAULT_ID_LENGTH: usize = 16;

/// The number of random bytes drawn from the source per refill.
pub const BATCH_SIZE: usize = 40;

/// The largest byte value accepted; the 248..=255 tail is rejected to avoid modulo bias.
const ACCEPT_MAX: u8 = (RADIX * (256 / RADIX) - 1) as u8;

/// Produces strings of symbols distributed uniformly over [`ALPHABET`].
///
/// Random bytes are fetched from the [`RandSource`] in batches of [`BATCH_SIZE`] and consumed
/// through a cursor; a partially consumed batch carries over to the next call.
///
/// # Examples
///
/// ```rust
/// use id62::SegmentGenerator;
///
/// let mut g = SegmentGenerator::with_rand08(rand::rngs::OsRng);
/// let id = g.generate(12)?;
/// assert_eq!(id.len(), 12);
/// assert!(id.bytes().all(|e| e.is_ascii_alphanumeric()));
/// # Ok::<(), id62::Error>(())
/// ```
pub struct SegmentGenerator<R> {
    buffer: [u8; BATCH_SIZE],
    cursor: usize,

    /// The random number generator used by the generator.
    rng: R,
}

impl<R: RandSource> SegmentGenerator<R> {
    /// Creates a generator instance with an empty buffer.
    pub const fn new(rng: R) -> Self {
        Self {
            buffer: [0; BATCH_SIZE],
            cursor: BATCH_SIZE,
            rng,
        }
    }

    /// Returns a string of `length` random symbols.
    ///
    /// A zero `length` is rejected with [`Error::InvalidLength`] without consuming randomness.
    pub fn generate(&mut self, length: usize) -> Result<String, Error> {
        if length == 0 {
            return Err(Error::InvalidLength);
        }
        let mut dest = vec![0u8; length];
        self.fill(&mut dest)?;
        Ok(dest.into_iter().map(char::from).collect())
    }

    /// Overwrites every byte of `dest` with a random symbol.
    pub fn fill(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        for e in dest.iter_mut() {
            *e = loop {
                let byte = self.next_byte()?;
                if byte <= ACCEPT_MAX {
                    break ALPHABET[(byte as u64 % RADIX) as usize];
                }
            };
        }
        Ok(())
    }

    fn next_byte(&mut self) -> Result<u8, Error> {
        if self.cursor == BATCH_SIZE {
            if let Err(err) = self.rng.try_fill_bytes(&mut self.buffer) {
                tracing::error!(error = %err, "random number source failed");
                return Err(err.into());
            }
            self.cursor = 0;
        }
        let byte = self.buffer[self.cursor];
        self.cursor += 1;
        Ok(byte)
    }
}

impl<T: rand::RngCore> SegmentGenerator<with_rand08::Adapter<T>> {
    /// Creates a generator instance with a random number generator that implements
    /// [`RngCore`](rand::RngCore) from `rand` (v0.8) crate.
    pub const fn with_rand08(rng: T) -> Self {
        Self::new(with_rand08::Adapter(rng))
    }
}

impl<R: RandSource + Default> Default for SegmentGenerator<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: fmt::Debug> fmt::Debug for SegmentGenerator<R> {
    /// Omits the buffered bytes, which would reveal upcoming output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentGenerator")
            .field("remaining", &(BATCH_SIZE - self.cursor))
            .field("rng", &self.rng)
            .finish_non_exhaustive()
    }
}
