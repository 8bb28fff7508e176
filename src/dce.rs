//! DCE Security (version 2) UUIDs.

use std::fmt;

use crate::{Context, Error, RandSource, TimeSource, Uuid, Version};

/// Represents the local domain field of a DCE Security UUID.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Domain(pub u8);

impl Domain {
    /// POSIX user id domain.
    pub const PERSON: Self = Self(0);
    /// POSIX group id domain.
    pub const GROUP: Self = Self(1);
    /// Organization domain.
    pub const ORG: Self = Self(2);
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PERSON => f.write_str("DOMAIN_PERSON"),
            Self::GROUP => f.write_str("DOMAIN_GROUP"),
            Self::ORG => f.write_str("DOMAIN_ORG"),
            Self(n) => write!(f, "DOMAIN_{}", n),
        }
    }
}

impl From<u8> for Domain {
    fn from(src: u8) -> Self {
        Self(src)
    }
}

impl Uuid {
    /// Returns the local domain of a version 2 UUID.
    pub fn domain(&self) -> Option<Domain> {
        (self.version() == Version::DCE).then(|| Domain(self.as_bytes()[9]))
    }

    /// Returns the 32-bit local id of a version 2 UUID.
    pub fn id(&self) -> Option<u32> {
        let b = self.as_bytes();
        (self.version() == Version::DCE).then(|| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

impl<R: RandSource, T: TimeSource> Context<R, T> {
    /// Generates a DCE Security UUID for a domain and a local id.
    ///
    /// The UUID starts as a version 1 UUID from the current time. The local id then replaces
    /// `time_low`, and the domain replaces the low byte of the clock sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfcuuid::{rand_source, Context, Domain, NoHardware, StdSystemTime};
    ///
    /// let ctx = Context::with_hardware(rand_source::os_rng(), StdSystemTime, NoHardware);
    /// let uuid = ctx.new_dce_security(Domain::ORG, 0xdeadbeef)?;
    /// assert_eq!(uuid.domain(), Some(Domain::ORG));
    /// assert_eq!(uuid.id(), Some(0xdeadbeef));
    /// assert!(uuid.to_string().starts_with("deadbeef-"));
    /// # Ok::<(), rfcuuid::Error>(())
    /// ```
    pub fn new_dce_security(&self, domain: Domain, id: u32) -> Result<Uuid, Error> {
        let mut bytes = self.new_v1()?.to_bytes();
        bytes[..4].copy_from_slice(&id.to_be_bytes());
        bytes[6] = (bytes[6] & 0x0f) | 0x20;
        bytes[9] = domain.0;
        Ok(Uuid::from_bytes(bytes))
    }

    /// Generates a DCE Security UUID in the person domain for the real user id of the process.
    #[cfg(unix)]
    #[cfg_attr(docsrs, doc(cfg(unix)))]
    pub fn new_dce_person(&self) -> Result<Uuid, Error> {
        self.new_dce_security(Domain::PERSON, nix::unistd::getuid().as_raw())
    }

    /// Generates a DCE Security UUID in the group domain for the real group id of the process.
    #[cfg(unix)]
    #[cfg_attr(docsrs, doc(cfg(unix)))]
    pub fn new_dce_group(&self) -> Result<Uuid, Error> {
        self.new_dce_security(Domain::GROUP, nix::unistd::getgid().as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::Domain;
    use crate::{rand_source::os_rng, Context, NoHardware, StdSystemTime, Uuid, Variant, Version};

    fn context() -> Context<crate::rand_source::with_rand08::Adapter<rand::rngs::OsRng>> {
        Context::with_hardware(os_rng(), StdSystemTime, NoHardware)
    }

    /// Embeds domain and id
    #[test]
    fn embeds_domain_and_id() {
        let ctx = context();
        for (domain, id) in [
            (Domain::PERSON, 0),
            (Domain::GROUP, 1_000),
            (Domain::ORG, 0xffff_ffff),
            (Domain(42), 0x1234_5678),
        ] {
            let e = ctx.new_dce_security(domain, id).unwrap();
            assert_eq!(e.version(), Version::DCE);
            assert_eq!(e.variant(), Variant::Rfc4122);
            assert_eq!(e.domain(), Some(domain));
            assert_eq!(e.id(), Some(id));
            assert_eq!(e.node_id(), Some(ctx.node_id().unwrap()));
            assert_eq!(&e.encode()[..8], format!("{:08x}", id));
        }
    }

    /// Returns none for other versions
    #[test]
    fn returns_none_for_other_versions() {
        let e = context().new_v1().unwrap();
        assert_eq!(e.domain(), None);
        assert_eq!(e.id(), None);
        assert_eq!(Uuid::NIL.domain(), None);
    }

    /// Uses process ids for person and group domains
    #[cfg(unix)]
    #[test]
    fn uses_process_ids_for_person_and_group_domains() {
        let ctx = context();
        let e = ctx.new_dce_person().unwrap();
        assert_eq!(e.domain(), Some(Domain::PERSON));
        assert_eq!(e.id(), Some(nix::unistd::getuid().as_raw()));
        let e = ctx.new_dce_group().unwrap();
        assert_eq!(e.domain(), Some(Domain::GROUP));
        assert_eq!(e.id(), Some(nix::unistd::getgid().as_raw()));
    }

    /// Formats domain names
    #[test]
    fn formats_domain_names() {
        assert_eq!(Domain::PERSON.to_string(), "DOMAIN_PERSON");
        assert_eq!(Domain::GROUP.to_string(), "DOMAIN_GROUP");
        assert_eq!(Domain::ORG.to_string(), "DOMAIN_ORG");
        assert_eq!(Domain::from(7).to_string(), "DOMAIN_7");
    }
}
