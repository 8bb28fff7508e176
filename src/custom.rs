//! Version 1 UUIDs with caller-managed node ids.

use parking_lot::Mutex;
use rand::rngs::OsRng;

use crate::clock::ClockState;
use crate::node::checked_node_id;
use crate::rand_source::{os_rng, with_rand08::Adapter};
use crate::{Error, RandSource, StdSystemTime, Time, TimeSource, Uuid};

/// A version 1 generator bound to a caller-supplied node id.
///
/// This allows a single host to generate UUIDs under several distinct node ids at the same time
/// without touching the node id of any [`Context`](crate::Context). Each instance keeps its own
/// clock sequence and last-seen time under its own lock. The random source that seeds the clock
/// sequence and the clock read by [`new_uuid()`](Self::new_uuid) are injected at construction.
///
/// Node ids must have the multicast bit (the least significant bit of the first byte) set, so
/// that they cannot collide with UUIDs generated from real IEEE 802 addresses.
///
/// # Examples
///
/// ```rust
/// use rfcuuid::{CustomNodeId, Error};
///
/// let g = CustomNodeId::new(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab])?;
/// let uuid = g.new_uuid()?;
/// assert_eq!(uuid.node_id(), Some([0x01, 0x23, 0x45, 0x67, 0x89, 0xab]));
///
/// assert!(matches!(CustomNodeId::new(&[0x01, 0x02]), Err(Error::IncompleteId)));
/// assert!(matches!(CustomNodeId::new(&[0x02; 6]), Err(Error::InvalidFlag)));
/// # Ok::<(), rfcuuid::Error>(())
/// ```
#[derive(Debug)]
pub struct CustomNodeId<R = Adapter<OsRng>, T = StdSystemTime> {
    inner: Mutex<Inner<R>>,
    clock: T,
}

#[derive(Debug)]
struct Inner<R> {
    node_id: [u8; 6],
    state: ClockState,
    rng: R,
}

impl CustomNodeId {
    /// Creates a generator from the first six bytes of `id`, seeding its clock sequence from the
    /// operating system and reading the system clock.
    pub fn new(id: &[u8]) -> Result<Self, Error> {
        Self::with_sources(id, os_rng(), StdSystemTime)
    }
}

impl<R: RandSource, T: TimeSource> CustomNodeId<R, T> {
    /// Creates a generator from the first six bytes of `id` that seeds its clock sequence from
    /// `rng` and reads the current time from `clock`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfcuuid::{CustomNodeId, ReaderSource, StdSystemTime};
    ///
    /// let g = CustomNodeId::with_sources(
    ///     &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06],
    ///     ReaderSource(&[0x12, 0x34][..]),
    ///     StdSystemTime,
    /// )?;
    /// assert_eq!(g.new_uuid()?.clock_sequence(), Some(0x1234));
    /// # Ok::<(), rfcuuid::Error>(())
    /// ```
    pub fn with_sources(id: &[u8], rng: R, clock: T) -> Result<Self, Error> {
        Ok(Self {
            inner: Mutex::new(Inner {
                node_id: checked_node_id(id)?,
                state: ClockState::new(),
                rng,
            }),
            clock,
        })
    }

    /// Replaces the node id with the first six bytes of `id`. On error the node id is unchanged.
    pub fn set_node_id(&self, id: &[u8]) -> Result<(), Error> {
        let node_id = checked_node_id(id)?;
        self.inner.lock().node_id = node_id;
        log::debug!("custom node id set to {:02x?}", node_id);
        Ok(())
    }

    /// Returns a copy of the node id.
    pub fn node_id(&self) -> [u8; 6] {
        self.inner.lock().node_id
    }

    /// Generates a version 1 UUID from the current time.
    pub fn new_uuid(&self) -> Result<Uuid, Error> {
        self.new_uuid_at(self.clock.now()?)
    }

    /// Generates a version 1 UUID from a specified time.
    pub fn new_uuid_at(&self, at: Time) -> Result<Uuid, Error> {
        let mut inner = self.inner.lock();
        let Inner { node_id, state, rng } = &mut *inner;
        state.seed_clock_sequence(rng)?;
        let (ticks, seq) = state.advance(at)?;
        Ok(Uuid::from_fields_v1(ticks, seq, node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::CustomNodeId;
    use crate::{Error, ReaderSource, Time, TimeSource, Variant, Version};
    use std::collections::HashSet;

    const NODE_A: [u8; 6] = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab];
    const NODE_B: [u8; 6] = [0xff, 0xee, 0xdd, 0xcc, 0xbb, 0xaa];

    /// Rejects incomplete or unicast node ids
    #[test]
    fn rejects_incomplete_or_unicast_node_ids() {
        assert!(matches!(CustomNodeId::new(&[]), Err(Error::IncompleteId)));
        assert!(matches!(
            CustomNodeId::new(&NODE_A[..5]),
            Err(Error::IncompleteId)
        ));
        assert!(matches!(
            CustomNodeId::new(&[0x00, 1, 2, 3, 4, 5]),
            Err(Error::InvalidFlag)
        ));

        let g = CustomNodeId::new(&NODE_A).unwrap();
        assert!(matches!(g.set_node_id(&[0x01]), Err(Error::IncompleteId)));
        assert!(matches!(
            g.set_node_id(&[0xfe, 1, 2, 3, 4, 5]),
            Err(Error::InvalidFlag)
        ));
        assert_eq!(g.node_id(), NODE_A);
    }

    /// Embeds own node id
    #[test]
    fn embeds_own_node_id() {
        let g = CustomNodeId::new(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd]).unwrap();
        let e = g.new_uuid().unwrap();
        assert_eq!(e.version(), Version::MAC);
        assert_eq!(e.variant(), Variant::Rfc4122);
        assert_eq!(e.node_id(), Some(NODE_A));

        g.set_node_id(&NODE_B).unwrap();
        assert_eq!(g.node_id(), NODE_B);
        assert_eq!(g.new_uuid().unwrap().node_id(), Some(NODE_B));
    }

    /// Keeps independent clock state per instance
    #[test]
    fn keeps_independent_clock_state_per_instance() {
        let a = CustomNodeId::new(&NODE_A).unwrap();
        let b = CustomNodeId::new(&NODE_B).unwrap();
        let t = Time::from_unix(1_728_984_743, 0);

        let mut s = HashSet::new();
        for _ in 0..1_000 {
            s.insert(a.new_uuid_at(t).unwrap());
            s.insert(b.new_uuid_at(t).unwrap());
        }
        assert_eq!(s.len(), 2_000);
        assert!(s.iter().all(|e| e.time() == Some(t)));
    }

    struct FixedClock(Time);

    impl TimeSource for FixedClock {
        fn now(&self) -> Result<Time, Error> {
            Ok(self.0)
        }
    }

    /// Reproduces exact output from injected sources
    #[test]
    fn reproduces_exact_output_from_injected_sources() {
        let clock = FixedClock(Time::from_unix(1_496_854_535, 812_946_000));
        let rng = ReaderSource(&[0x12, 0x34][..]);
        let g = CustomNodeId::with_sources(&[1, 2, 3, 4, 5, 6], rng, clock).unwrap();
        assert_eq!(
            &g.new_uuid().unwrap().encode() as &str,
            "20616934-4ba2-11e7-9234-010203040506"
        );
        assert_eq!(
            &g.new_uuid().unwrap().encode() as &str,
            "20616934-4ba2-11e7-9235-010203040506"
        );

        let rng = ReaderSource(&[0u8; 0][..]);
        let g = CustomNodeId::with_sources(&NODE_A, rng, FixedClock(Time::from_ticks(1))).unwrap();
        assert!(matches!(g.new_uuid(), Err(Error::EntropySourceFailure(_))));

        let rng = ReaderSource(&[0u8; 2][..]);
        let g = CustomNodeId::with_sources(&NODE_A, rng, FixedClock(Time::from_ticks(-1))).unwrap();
        assert!(matches!(g.new_uuid(), Err(Error::TimeOutOfRange(_))));
    }
}
