//! Generator context that owns the node id, clock sequence and random source.

use parking_lot::Mutex;

use crate::clock::ClockState;
use crate::node::{random_node_id, DefaultHardware, HardwareAddr, NodeOrigin};
use crate::pool::RandPool;
use crate::{Error, RandSource, StdSystemTime, Time, TimeSource, Uuid, Version};

/// Represents one identity domain of UUID generation: a node id, a clock sequence, the latest
/// timestamp observed, and the random number generator.
///
/// All time-based UUIDs generated through the same context are guaranteed not to share a
/// (timestamp, clock sequence, node id) triple, even under concurrent use from many threads, as
/// long as the clock sequence does not wrap around within one timestamp. Every method takes
/// `&self`; the context locks its state internally for the shortest possible time.
///
/// The free functions of this crate use a process-wide default context. Independent contexts are
/// useful to inject a deterministic random number generator or clock, or to keep identities
/// apart.
///
/// # Examples
///
/// ```rust
/// use rfcuuid::{rand_source, Context, NoHardware, StdSystemTime, Version};
///
/// let ctx = Context::with_hardware(rand_source::os_rng(), StdSystemTime, NoHardware);
/// let uuid = ctx.new_v6()?;
/// assert_eq!(uuid.version(), Version::SORT_MAC);
/// assert_eq!(uuid.node_id(), Some(ctx.node_id()?));
/// # Ok::<(), rfcuuid::Error>(())
/// ```
pub struct Context<R, T = StdSystemTime> {
    state: Mutex<ClockState>,
    entropy: Mutex<Entropy<R>>,
    clock: T,
    hardware: Box<dyn HardwareAddr + Send + Sync>,
}

struct Entropy<R> {
    rng: R,
    pool: Option<RandPool>,
}

impl<R: RandSource> Entropy<R> {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.rng.try_fill_bytes(dest)
    }

    fn fill16(&mut self, dest: &mut [u8; 16]) -> Result<(), Error> {
        match self.pool.as_mut() {
            Some(pool) => pool.fill16(&mut self.rng, dest),
            None => self.rng.try_fill_bytes(dest),
        }
    }
}

impl<R: RandSource, T: TimeSource> Context<R, T> {
    /// Creates a context that resolves its node id through the default hardware provider.
    pub fn new(rng: R, clock: T) -> Self {
        Self::with_hardware(rng, clock, DefaultHardware::default())
    }

    /// Creates a context with a specified hardware address provider.
    pub fn with_hardware<H>(rng: R, clock: T, hardware: H) -> Self
    where
        H: HardwareAddr + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(ClockState::new()),
            entropy: Mutex::new(Entropy { rng, pool: None }),
            clock,
            hardware: Box::new(hardware),
        }
    }

    /// Returns the node id, resolving it if it has not been set: the first usable hardware
    /// address is taken as reported, and if there is none a random node id with the multicast bit
    /// set is generated.
    ///
    /// An error is returned only if the random fallback fails to read the random source.
    pub fn node_id(&self) -> Result<[u8; 6], Error> {
        let mut state = self.state.lock();
        self.resolve_node(&mut state)
    }

    /// Returns where the node id came from, or `None` if it has not been resolved yet.
    pub fn node_origin(&self) -> Option<NodeOrigin> {
        self.state.lock().node().map(|(_, origin)| origin.clone())
    }

    /// Returns the name of the interface the node id was read from, if it was set through
    /// [`set_node_interface()`](Self::set_node_interface) with a name.
    pub fn node_interface(&self) -> Option<String> {
        match self.state.lock().node() {
            Some((_, NodeOrigin::Interface(name))) => Some(name.clone()),
            _ => None,
        }
    }

    /// Sets the node id to the first six bytes of `id`. Returns false, leaving the node id
    /// unchanged, if `id` is shorter than six bytes.
    pub fn set_node_id(&self, id: &[u8]) -> bool {
        let Some(src) = id.get(..6) else {
            return false;
        };
        let mut node_id = [0u8; 6];
        node_id.copy_from_slice(src);
        self.state.lock().set_node(node_id, NodeOrigin::User);
        true
    }

    /// Sets the node id to the hardware address of the interface `name`. If `name` is empty, the
    /// first usable interface is taken, or a random node id is generated if there is none.
    ///
    /// Returns false, leaving the node id unchanged, if no address could be assigned.
    pub fn set_node_interface(&self, name: &str) -> bool {
        let mut state = self.state.lock();
        if !name.is_empty() {
            return match self.hardware.by_name(name) {
                Some(node_id) => {
                    state.set_node(node_id, NodeOrigin::Interface(name.to_owned()));
                    true
                }
                None => false,
            };
        }

        if let Some(node_id) = self.hardware.first() {
            state.set_node(node_id, NodeOrigin::Hardware);
            return true;
        }
        match random_node_id(&mut self.entropy.lock().rng) {
            Ok(node_id) => {
                state.set_node(node_id, NodeOrigin::Random);
                true
            }
            Err(err) => {
                log::warn!("could not generate random node id: {}", err);
                false
            }
        }
    }

    /// Returns the current clock sequence, seeding it randomly if it has not been set.
    pub fn clock_sequence(&self) -> Result<u16, Error> {
        let mut state = self.state.lock();
        let seq = state.seed_clock_sequence(&mut self.entropy.lock().rng)?;
        Ok(seq)
    }

    /// Sets the clock sequence to the lower 14 bits of `seq`, or to a random value if `seq` is
    /// `None`.
    pub fn set_clock_sequence(&self, seq: Option<u16>) -> Result<(), Error> {
        let seq = match seq {
            Some(seq) => seq,
            None => {
                let mut b = [0u8; 2];
                self.entropy.lock().fill(&mut b)?;
                u16::from_be_bytes(b)
            }
        };
        self.state.lock().set_clock_sequence(seq);
        log::debug!("clock sequence set to {}", seq & 0x3fff);
        Ok(())
    }

    /// Makes random UUIDs draw their bytes from an internal pool of 256 bytes refilled in one
    /// read, which reduces the number of calls into the random number generator.
    pub fn enable_rand_pool(&self) {
        let mut entropy = self.entropy.lock();
        if entropy.pool.is_none() {
            entropy.pool = Some(RandPool::new());
        }
    }

    /// Disables the random pool and discards its unused bytes.
    pub fn disable_rand_pool(&self) {
        self.entropy.lock().pool = None;
    }

    /// Returns the current time (or `at` if given) together with the clock sequence to use for
    /// it, bumping the clock sequence if the time is not later than every time seen before.
    pub fn get_time(&self, at: Option<Time>) -> Result<(Time, u16), Error> {
        let mut state = self.state.lock();
        let (ticks, seq) = self.tick(&mut state, at)?;
        Ok((Time::from_ticks(ticks as i64), seq))
    }

    /// Generates a version 1 UUID from the current time.
    pub fn new_v1(&self) -> Result<Uuid, Error> {
        self.time_based(None, Uuid::from_fields_v1)
    }

    /// Generates a version 1 UUID from a specified time.
    ///
    /// The clock sequence logic applies relative to the latest time seen by this context, so
    /// repeated or back-dated times still produce distinct UUIDs.
    pub fn new_v1_at(&self, at: Time) -> Result<Uuid, Error> {
        self.time_based(Some(at), Uuid::from_fields_v1)
    }

    /// Generates a version 6 UUID from the current time.
    pub fn new_v6(&self) -> Result<Uuid, Error> {
        self.time_based(None, Uuid::from_fields_v6)
    }

    /// Generates a version 6 UUID from a specified time.
    pub fn new_v6_at(&self, at: Time) -> Result<Uuid, Error> {
        self.time_based(Some(at), Uuid::from_fields_v6)
    }

    /// Generates a version 7 UUID from the current time and the random number generator (or the
    /// random pool if enabled).
    pub fn new_v7(&self) -> Result<Uuid, Error> {
        self.new_v7_core(None)
    }

    /// Generates a version 7 UUID from a specified time.
    pub fn new_v7_at(&self, at: Time) -> Result<Uuid, Error> {
        self.new_v7_core(Some(at))
    }

    /// Generates a version 7 UUID from the current time, reading the 74 random bits from `src`
    /// instead of the context's random number generator.
    pub fn new_v7_from_source<S: RandSource + ?Sized>(&self, src: &mut S) -> Result<Uuid, Error> {
        let unix_ts_ms = self.unix_ts_ms(None)?;
        let mut bytes = [0u8; 16];
        src.try_fill_bytes(&mut bytes[6..])?;
        Ok(pack_v7(unix_ts_ms, &bytes))
    }

    /// Generates a version 4 UUID from the random number generator (or the random pool if
    /// enabled).
    pub fn new_v4(&self) -> Result<Uuid, Error> {
        let mut bytes = [0u8; 16];
        self.entropy.lock().fill16(&mut bytes)?;
        Ok(Uuid::tagged(bytes, Version::RANDOM))
    }

    fn new_v7_core(&self, at: Option<Time>) -> Result<Uuid, Error> {
        let unix_ts_ms = self.unix_ts_ms(at)?;
        let mut bytes = [0u8; 16];
        {
            let mut entropy = self.entropy.lock();
            if entropy.pool.is_some() {
                entropy.fill16(&mut bytes)?;
            } else {
                entropy.fill(&mut bytes[6..])?;
            }
        }
        Ok(pack_v7(unix_ts_ms, &bytes))
    }

    fn time_based(
        &self,
        at: Option<Time>,
        pack: fn(u64, u16, &[u8; 6]) -> Uuid,
    ) -> Result<Uuid, Error> {
        let mut state = self.state.lock();
        let node_id = self.resolve_node(&mut state)?;
        let (ticks, seq) = self.tick(&mut state, at)?;
        Ok(pack(ticks, seq, &node_id))
    }

    fn unix_ts_ms(&self, at: Option<Time>) -> Result<u64, Error> {
        let now = match at {
            Some(at) => at,
            None => self.clock.now()?,
        };
        let unix_ts_ms = now.unix_ts_ms()?;
        self.tick(&mut self.state.lock(), Some(now))?;
        Ok(unix_ts_ms)
    }

    fn resolve_node(&self, state: &mut ClockState) -> Result<[u8; 6], Error> {
        if let Some((node_id, _)) = state.node() {
            return Ok(*node_id);
        }
        if let Some(node_id) = self.hardware.first() {
            state.set_node(node_id, NodeOrigin::Hardware);
            return Ok(node_id);
        }
        let node_id = random_node_id(&mut self.entropy.lock().rng)?;
        state.set_node(node_id, NodeOrigin::Random);
        Ok(node_id)
    }

    fn tick(&self, state: &mut ClockState, at: Option<Time>) -> Result<(u64, u16), Error> {
        let now = match at {
            Some(at) => at,
            None => self.clock.now()?,
        };
        state.seed_clock_sequence(&mut self.entropy.lock().rng)?;
        state.advance(now)
    }
}

fn pack_v7(unix_ts_ms: u64, bytes: &[u8; 16]) -> Uuid {
    let rand_a = u16::from_be_bytes([bytes[6], bytes[7]]) & 0x0fff;
    let rand_b = bytes[8..]
        .iter()
        .fold(0u64, |acc, e| acc << 8 | *e as u64);
    Uuid::from_fields_v7(unix_ts_ms, rand_a, rand_b & ((1 << 62) - 1))
}
