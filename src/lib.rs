//! RFC 4122 / RFC 9562 UUIDs: generation, parsing and inspection
//!
//! ```rust
//! let uuid = rfcuuid::uuid7();
//! println!("{}", uuid); // e.g. "01809424-3e59-7c05-9219-566f82fff672"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! ```
//!
//! This crate generates the following versions:
//!
//! | Version | Generator                                    | Contents                             |
//! | ------- | -------------------------------------------- | ------------------------------------ |
//! | 1       | [`new_v1()`], [`Context::new_v1()`]          | Gregorian time, clock seq, node id   |
//! | 2       | [`new_dce_security()`]                       | version 1 with a POSIX uid/gid       |
//! | 3       | [`new_md5()`]                                | MD5 of namespace and name            |
//! | 4       | [`new_v4()`], [`UuidSource::new_random()`]   | 122 random bits                      |
//! | 5       | [`new_sha1()`]                               | SHA-1 of namespace and name          |
//! | 6       | [`new_v6()`], [`Context::new_v6()`]          | version 1 fields in sortable order   |
//! | 7       | [`new_v7()`], [`Context::new_v7()`]          | Unix milliseconds and 74 random bits |
//!
//! # Field and bit layout of version 1 and 6
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |             time_low (v1) / time_high (v6)                    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           time_mid            |  ver  |  time_hi / time_low   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|         clock_seq         |             node              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                              node                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Time-based versions count 100-nanosecond intervals since 1582-10-15. Whenever a timestamp is
//! not later than the latest one seen by the same [`Context`] (several calls within one tick, or
//! a clock rollback), the 14-bit clock sequence is incremented instead, so the (timestamp, clock
//! sequence, node id) triple never repeats within a context.
//!
//! # Contexts
//!
//! The free functions share a process-wide [`Context`]. Construct your own to inject a random
//! number generator, a clock or a hardware address provider:
//!
//! ```rust
//! use rand::SeedableRng;
//! use rfcuuid::{Context, NoHardware, StdSystemTime, Time};
//!
//! let rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//! let ctx = Context::with_hardware(
//!     rfcuuid::with_rand08::Adapter(rng),
//!     StdSystemTime,
//!     NoHardware,
//! );
//! let t = Time::from_unix(1_728_984_743, 0);
//! let (a, b) = (ctx.new_v6_at(t)?, ctx.new_v6_at(t)?);
//! assert_ne!(a, b);
//! assert_eq!(a.time(), b.time());
//! # Ok::<(), rfcuuid::Error>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide default context and the free functions backed by it.
//! - `mac`: resolves node ids from hardware interface addresses through the `mac_address` crate.
//!
//! Optional features:
//!
//! - `serde`: enables serialization/deserialization of `Uuid` via serde.
//! - `uuid`: enables conversion from/to `Uuid` of the uuid crate.
//! - `cli`: builds the `rfcuuid` command-line tool.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{must, Error};

mod id;
pub use id::Uuid;

pub mod layout;
pub use layout::{Variant, Version};

mod marshal;

mod time;
pub use time::{StdSystemTime, Time, TimeSource};

pub mod rand_source;
pub use rand_source::{with_rand08, RandSource, ReaderSource};

mod pool;

mod clock;

mod node;
#[cfg(feature = "mac")]
pub use node::MacAddressProvider;
pub use node::{DefaultHardware, HardwareAddr, NoHardware, NodeOrigin};

mod context;
pub use context::Context;

mod dce;
pub use dce::Domain;

pub mod hash;
#[doc(inline)]
pub use hash::{new_md5, new_sha1, NAMESPACE_DNS, NAMESPACE_OID, NAMESPACE_URL, NAMESPACE_X500};

mod custom;
pub use custom::CustomNodeId;

mod source;
pub use source::UuidSource;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::*;
