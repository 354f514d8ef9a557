//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Error, SortableGenerator, SortableId};
use inner::{GlobalGenInner, GlobalGenRng};

/// Returns the lock handle of process-wide global generator slot.
///
/// The slot is filled lazily so that a failure to seed from the operating system surfaces as an
/// [`Error`] rather than a panic.
fn lock_global_gen() -> sync::MutexGuard<'static, Option<GlobalGenInner>> {
    static G: sync::Mutex<Option<GlobalGenInner>> = sync::Mutex::new(None);
    // the slot holds a consistent generator even if a previous holder panicked
    G.lock().unwrap_or_else(sync::PoisonError::into_inner)
}

fn with_global_gen<T>(
    f: impl FnOnce(&mut SortableGenerator<GlobalGenRng>) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut slot = lock_global_gen();
    let g = GlobalGenInner::get_mut(&mut slot)?;
    f(g)
}

/// Generates a sortable identifier.
///
/// This function employs a global generator and guarantees the process-wide monotonic order of
/// identifiers generated within the same millisecond. On Unix, this function resets the generator
/// when the process ID changes (i.e., upon process forks) to prevent collisions across processes.
///
/// # Errors
///
/// Returns [`Error::Overflow`] if 62^8 identifiers have already been generated within the current
/// millisecond, or [`Error::RandSource`] if the operating system random number source fails.
///
/// # Examples
///
/// ```rust
/// let id = id62::create_sortable_id()?;
/// println!("{}", id); // e.g., "0SzIuK6H8Zq0pWfA"
/// assert_eq!(id.as_str().len(), 16);
///
/// let id_string: String = id62::create_sortable_id()?.into();
/// # Ok::<(), id62::Error>(())
/// ```
pub fn create_sortable_id() -> Result<SortableId, Error> {
    with_global_gen(|g| g.generate())
}

/// Generates a plain random ID of `length` symbols drawn uniformly from `0-9A-Za-z`.
///
/// [`DEFAULT_ID_LENGTH`](crate::DEFAULT_ID_LENGTH) is the customary length.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] if `length` is zero, or [`Error::RandSource`] if the operating
/// system random number source fails.
///
/// # Examples
///
/// ```rust
/// let id = id62::create_id(id62::DEFAULT_ID_LENGTH)?;
/// println!("{}", id); // e.g., "q3kTe0ZfJv8LwA1m"
/// assert_eq!(id.len(), 16);
///
/// assert!(id62::create_id(0).is_err());
/// # Ok::<(), id62::Error>(())
/// ```
pub fn create_id(length: usize) -> Result<String, Error> {
    if length == 0 {
        return Err(Error::InvalidLength);
    }
    with_global_gen(|g| g.random_id(length))
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha12Core;

    use crate::generator::RandSource;
    use crate::{Error, SortableGenerator};

    /// The random number generator of the global generator.
    ///
    /// The global generator employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to emulate the
    /// strategy used by [`rand::rngs::ThreadRng`].
    pub struct GlobalGenRng(ReseedingRng<ChaCha12Core, OsRng>);

    impl RandSource for GlobalGenRng {
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.0.try_fill_bytes(dest)
        }
    }

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: SortableGenerator<GlobalGenRng>,
    }

    impl GlobalGenInner {
        fn try_new() -> Result<Self, Error> {
            let core = ChaCha12Core::from_rng(OsRng)?;
            tracing::debug!("seeded global identifier generator");
            Ok(Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: SortableGenerator::new(GlobalGenRng(ReseedingRng::new(
                    core,
                    1024 * 64,
                    OsRng,
                ))),
            })
        }

        fn is_current(&self) -> bool {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                tracing::debug!(pid = self.pid, "process ID changed; resetting global generator");
                return false;
            }
            true
        }

        /// Returns a mutable reference to the generator in `slot`, creating one if the slot is
        /// empty or, on Unix, if the process ID has changed.
        pub fn get_mut(
            slot: &mut Option<Self>,
        ) -> Result<&mut SortableGenerator<GlobalGenRng>, Error> {
            let inner = match slot.take() {
                Some(inner) if inner.is_current() => inner,
                _ => Self::try_new()?,
            };
            Ok(&mut slot.insert(inner).generator)
        }
    }
}
