//! Node id and clock sequence state shared by time-based generators.

use crate::{node::NodeOrigin, Error, RandSource, Time};

const MAX_CLOCK_SEQ: u16 = (1 << 14) - 1;

/// The per-identity state of time-based generation: node id, clock sequence, and the latest tick
/// value observed.
///
/// The state starts uninitialized. The owner resolves the node id and seeds the clock sequence on
/// first use, and every subsequent [`advance()`](Self::advance) either moves the last-seen tick
/// forward or bumps the clock sequence so that no (tick, clock sequence) pair repeats.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub(crate) struct ClockState {
    last_ticks: u64,
    clock_seq: u16,
    seeded: bool,
    node: Option<([u8; 6], NodeOrigin)>,
}

impl ClockState {
    pub const fn new() -> Self {
        Self {
            last_ticks: 0,
            clock_seq: 0,
            seeded: false,
            node: None,
        }
    }

    pub fn node(&self) -> Option<&([u8; 6], NodeOrigin)> {
        self.node.as_ref()
    }

    pub fn set_node(&mut self, node_id: [u8; 6], origin: NodeOrigin) {
        log::debug!("node id set to {:02x?} ({:?})", node_id, origin);
        self.node = Some((node_id, origin));
    }

    pub fn clock_sequence(&self) -> Option<u16> {
        self.seeded.then_some(self.clock_seq)
    }

    /// Sets the 14-bit clock sequence, discarding the upper bits of `seq`. Changing the value
    /// forgets the last-seen tick.
    pub fn set_clock_sequence(&mut self, seq: u16) {
        let seq = seq & MAX_CLOCK_SEQ;
        if !self.seeded || self.clock_seq != seq {
            self.last_ticks = 0;
        }
        self.clock_seq = seq;
        self.seeded = true;
    }

    /// Seeds the clock sequence from `rng` unless it is already set.
    pub fn seed_clock_sequence<R: RandSource + ?Sized>(&mut self, rng: &mut R) -> Result<u16, Error> {
        if let Some(seq) = self.clock_sequence() {
            return Ok(seq);
        }
        let mut b = [0u8; 2];
        rng.try_fill_bytes(&mut b)?;
        self.set_clock_sequence(u16::from_be_bytes(b));
        log::debug!("clock sequence seeded with {}", self.clock_seq);
        Ok(self.clock_seq)
    }

    /// Records a timestamp and returns it with the clock sequence to encode alongside it.
    ///
    /// If `now` is not later than every tick seen so far (a clock rollback, or several requests
    /// within one 100-nanosecond interval), the clock sequence is incremented modulo 2^14 and the
    /// last-seen tick is kept. Otherwise the last-seen tick advances to `now`.
    ///
    /// Fails without touching the state if `now` does not fit in a 60-bit timestamp. The owner
    /// seeds the clock sequence before the first call.
    pub fn advance(&mut self, now: Time) -> Result<(u64, u16), Error> {
        debug_assert!(self.seeded, "clock sequence not initialized");
        let ticks = now.rfc_ticks()?;
        if ticks > self.last_ticks {
            self.last_ticks = ticks;
        } else {
            self.clock_seq = (self.clock_seq + 1) & MAX_CLOCK_SEQ;
            log::trace!("clock sequence bumped to {} at tick {}", self.clock_seq, ticks);
        }
        Ok((ticks, self.clock_seq))
    }
}

#[cfg(test)]
mod tests {
    use super::ClockState;
    use crate::{Error, ReaderSource, Time};

    fn seeded(seq: u16) -> ClockState {
        let mut state = ClockState::new();
        state.set_clock_sequence(seq);
        state
    }

    /// Keeps clock sequence while time advances
    #[test]
    fn keeps_clock_sequence_while_time_advances() {
        let mut state = seeded(100);
        for i in 1..1_000 {
            assert_eq!(state.advance(Time::from_ticks(i)).unwrap(), (i as u64, 100));
        }
    }

    /// Bumps clock sequence on identical or regressing ticks
    #[test]
    fn bumps_clock_sequence_on_identical_or_regressing_ticks() {
        let mut state = seeded(100);
        assert_eq!(state.advance(Time::from_ticks(5_000)).unwrap(), (5_000, 100));
        assert_eq!(state.advance(Time::from_ticks(5_000)).unwrap(), (5_000, 101));
        assert_eq!(state.advance(Time::from_ticks(4_000)).unwrap(), (4_000, 102));
        // the last-seen tick never moves backwards
        assert_eq!(state.advance(Time::from_ticks(4_500)).unwrap(), (4_500, 103));
        assert_eq!(state.advance(Time::from_ticks(5_001)).unwrap(), (5_001, 103));
    }

    /// Wraps clock sequence at 14 bits
    #[test]
    fn wraps_clock_sequence_at_14_bits() {
        let mut state = seeded(0x3fff);
        state.advance(Time::from_ticks(10)).unwrap();
        assert_eq!(state.advance(Time::from_ticks(10)).unwrap(), (10, 0));
        assert_eq!(seeded(0xffff).clock_sequence(), Some(0x3fff));
    }

    /// Forgets last tick when clock sequence changes
    #[test]
    fn forgets_last_tick_when_clock_sequence_changes() {
        let mut state = seeded(1);
        state.advance(Time::from_ticks(10)).unwrap();
        state.set_clock_sequence(1);
        assert_eq!(state.advance(Time::from_ticks(10)).unwrap(), (10, 2));
        state.set_clock_sequence(7);
        assert_eq!(state.advance(Time::from_ticks(10)).unwrap(), (10, 7));
    }

    /// Refuses ticks outside 60 bits
    #[test]
    fn refuses_ticks_outside_60_bits() {
        let mut state = seeded(9);
        state.advance(Time::from_ticks(10)).unwrap();
        for e in [-5, 1 << 60, i64::MAX] {
            assert!(matches!(
                state.advance(Time::from_ticks(e)),
                Err(Error::TimeOutOfRange(_))
            ));
        }
        assert_eq!(state.advance(Time::from_ticks(11)).unwrap(), (11, 9));
    }

    /// Seeds clock sequence once from random source
    #[test]
    fn seeds_clock_sequence_once_from_random_source() {
        let mut state = ClockState::new();
        let mut rng = ReaderSource(&[0xff, 0xfe][..]);
        assert_eq!(state.seed_clock_sequence(&mut rng).unwrap(), 0x3ffe);
        assert_eq!(state.seed_clock_sequence(&mut rng).unwrap(), 0x3ffe);

        let mut state = ClockState::new();
        assert!(state.seed_clock_sequence(&mut rng).is_err());
        assert_eq!(state.clock_sequence(), None);
    }
}
