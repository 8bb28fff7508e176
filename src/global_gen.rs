//! Process-default context and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::{io, sync};

use parking_lot::Mutex;

use crate::{Context, Domain, Error, ReaderSource, StdSystemTime, Time, Uuid};
use inner::GlobalGenInner;
pub use inner::GlobalGenRng;

/// The type of the process-default context.
pub type DefaultContext = Context<GlobalGenRng, StdSystemTime>;

/// Returns the process-default context, creating one if none exists.
///
/// On Unix, the context is replaced when the process ID changes (i.e., upon process forks), so
/// that a child process does not repeat the clock sequence or random state of its parent. Any
/// node id, clock sequence or pool setting made before the fork does not carry over.
pub fn default_context() -> sync::Arc<DefaultContext> {
    static G: sync::OnceLock<Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default).lock().get()
}

/// Generates a version 1 UUID from the current time, the node id and the clock sequence.
///
/// If the node id has not been set, the first usable hardware address is used, or a random node
/// id if there is none. The clock sequence is seeded randomly on first use.
///
/// # Examples
///
/// ```rust
/// let uuid = rfcuuid::new_v1()?;
/// println!("{}", uuid); // e.g., "2a2f2e8a-8a59-11ef-9a0b-0242ac120002"
/// assert_eq!(uuid.version(), rfcuuid::Version::MAC);
/// # Ok::<(), rfcuuid::Error>(())
/// ```
pub fn new_v1() -> Result<Uuid, Error> {
    default_context().new_v1()
}

/// Generates a version 6 UUID from the current time.
pub fn new_v6() -> Result<Uuid, Error> {
    default_context().new_v6()
}

/// Generates a version 6 UUID from a specified time.
pub fn new_v6_at(at: Time) -> Result<Uuid, Error> {
    default_context().new_v6_at(at)
}

/// Generates a version 7 UUID from the current time.
///
/// # Examples
///
/// ```rust
/// let uuid = rfcuuid::new_v7()?;
/// println!("{}", uuid); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
/// # Ok::<(), rfcuuid::Error>(())
/// ```
pub fn new_v7() -> Result<Uuid, Error> {
    default_context().new_v7()
}

/// Generates a version 7 UUID from the current time, reading the random bits from `reader`.
pub fn new_v7_from_reader<T: io::Read>(reader: T) -> Result<Uuid, Error> {
    default_context().new_v7_from_source(&mut ReaderSource(reader))
}

/// Generates a version 4 UUID.
///
/// # Examples
///
/// ```rust
/// let uuid = rfcuuid::new_v4()?;
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// # Ok::<(), rfcuuid::Error>(())
/// ```
pub fn new_v4() -> Result<Uuid, Error> {
    default_context().new_v4()
}

/// Alias of [`new_v4()`].
pub fn new_random() -> Result<Uuid, Error> {
    new_v4()
}

/// Generates a DCE Security UUID for a domain and a local id.
pub fn new_dce_security(domain: Domain, id: u32) -> Result<Uuid, Error> {
    default_context().new_dce_security(domain, id)
}

/// Generates a DCE Security UUID for the real user id of the process.
#[cfg(unix)]
#[cfg_attr(docsrs, doc(cfg(unix)))]
pub fn new_dce_person() -> Result<Uuid, Error> {
    default_context().new_dce_person()
}

/// Generates a DCE Security UUID for the real group id of the process.
#[cfg(unix)]
#[cfg_attr(docsrs, doc(cfg(unix)))]
pub fn new_dce_group() -> Result<Uuid, Error> {
    default_context().new_dce_group()
}

/// Sets the node id of the default context. See [`Context::set_node_id()`].
pub fn set_node_id(id: &[u8]) -> bool {
    default_context().set_node_id(id)
}

/// Sets the node id of the default context from a hardware interface. See
/// [`Context::set_node_interface()`].
pub fn set_node_interface(name: &str) -> bool {
    default_context().set_node_interface(name)
}

/// Returns the interface name the default context's node id was read from, if any.
pub fn node_interface() -> Option<String> {
    default_context().node_interface()
}

/// Returns the node id of the default context, resolving it if necessary.
pub fn node_id() -> Result<[u8; 6], Error> {
    default_context().node_id()
}

/// Sets the clock sequence of the default context, or re-seeds it randomly if `seq` is `None`.
pub fn set_clock_sequence(seq: Option<u16>) -> Result<(), Error> {
    default_context().set_clock_sequence(seq)
}

/// Returns the clock sequence of the default context.
pub fn clock_sequence() -> Result<u16, Error> {
    default_context().clock_sequence()
}

/// Returns the current time and the clock sequence to use with it. See [`Context::get_time()`].
pub fn get_time() -> Result<(Time, u16), Error> {
    default_context().get_time(None)
}

/// Enables the random pool of the default context. See [`Context::enable_rand_pool()`].
pub fn enable_rand_pool() {
    default_context().enable_rand_pool()
}

/// Disables the random pool of the default context.
pub fn disable_rand_pool() {
    default_context().disable_rand_pool()
}

/// Generates a version 1 UUID, panicking on failure.
pub fn uuid1() -> Uuid {
    crate::must(new_v1())
}

/// Generates a version 4 UUID, panicking on failure.
///
/// # Examples
///
/// ```rust
/// let uuid = rfcuuid::uuid4();
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
pub fn uuid4() -> Uuid {
    crate::must(new_v4())
}

/// Generates a version 6 UUID, panicking on failure.
pub fn uuid6() -> Uuid {
    crate::must(new_v6())
}

/// Generates a version 7 UUID, panicking on failure.
///
/// # Examples
///
/// ```rust
/// let uuid_string: String = rfcuuid::uuid7().to_string();
/// assert_eq!(uuid_string.len(), 36);
/// ```
pub fn uuid7() -> Uuid {
    crate::must(new_v7())
}

mod inner {
    use std::sync::Arc;

    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha12Core;

    use super::DefaultContext;
    use crate::{Context, Error, RandSource, StdSystemTime};

    /// The random number generator of the default context.
    ///
    /// The default context employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to emulate the
    /// strategy used by [`rand::rngs::ThreadRng`]. The generator is seeded on first use, so that a
    /// seeding failure surfaces as an error from the generating call.
    #[derive(Debug, Default)]
    pub struct GlobalGenRng(Option<ReseedingRng<ChaCha12Core, OsRng>>);

    impl RandSource for GlobalGenRng {
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
            let rng = match self.0.take() {
                Some(rng) => rng,
                None => {
                    let core = ChaCha12Core::from_rng(OsRng).map_err(Error::entropy)?;
                    ReseedingRng::new(core, 1024 * 64, OsRng)
                }
            };
            self.0.insert(rng).try_fill_bytes(dest).map_err(Error::entropy)
        }
    }

    /// A thin wrapper to replace the context when the process ID changes (i.e., upon Unix forks).
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        context: Arc<DefaultContext>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                context: Arc::new(Context::new(GlobalGenRng::default(), StdSystemTime)),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a handle to the context, replacing it on Unix if the process ID has changed.
        pub fn get(&mut self) -> Arc<DefaultContext> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                log::debug!("process id changed; recreating default context");
                *self = Default::default();
            }
            Arc::clone(&self.context)
        }
    }
}

#[cfg(test)]
mod tests_v7 {
    use super::uuid7;
    use crate::{Time, Variant};

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| uuid7().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-7[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        for _ in 0..10_000 {
            let now = Time::from(std::time::SystemTime::now()).unix_millis();
            let ts = uuid7().time().unwrap().unix_millis();
            assert!((ts - now).abs() < 16);
        }
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let mut it = bins.iter_mut().rev();
                for c in e.chars().rev() {
                    if let Some(mut num) = c.to_digit(16) {
                        for _ in 0..4 {
                            *it.next().unwrap() += num & 1;
                            num >>= 1;
                        }
                    }
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], n, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in (52..64).chain(66..128) {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
        }
    }

    /// Reads random bits from given reader
    #[test]
    fn reads_random_bits_from_given_reader() {
        let e = super::new_v7_from_reader(&[0xffu8; 10][..]).unwrap();
        assert_eq!(e.variant(), Variant::Rfc4122);
        assert!(e.to_string().ends_with("-7fff-bfff-ffffffffffff"));
        assert!(super::new_v7_from_reader(&[0xffu8; 9][..]).is_err());
    }
}
