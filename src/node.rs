//! Node id providers.

use crate::{Error, RandSource};

/// Describes where the node id of a generator came from.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeOrigin {
    /// Supplied by the caller.
    User,
    /// Read from the first usable hardware interface.
    Hardware,
    /// Read from the named hardware interface.
    Interface(String),
    /// Generated randomly, with the multicast bit set.
    Random,
}

/// A trait that defines the hardware address lookup used to resolve node ids.
pub trait HardwareAddr {
    /// Returns the first usable 6-byte hardware address of the host, if any.
    fn first(&self) -> Option<[u8; 6]>;

    /// Returns the usable 6-byte hardware address of the interface named `name`, if any.
    fn by_name(&self, name: &str) -> Option<[u8; 6]>;
}

/// A [`HardwareAddr`] provider that never finds an address, making generators fall back to
/// random node ids.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct NoHardware;

impl HardwareAddr for NoHardware {
    fn first(&self) -> Option<[u8; 6]> {
        None
    }

    fn by_name(&self, _: &str) -> Option<[u8; 6]> {
        None
    }
}

/// A [`HardwareAddr`] provider backed by the `mac_address` crate.
#[cfg(feature = "mac")]
#[cfg_attr(docsrs, doc(cfg(feature = "mac")))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct MacAddressProvider;

#[cfg(feature = "mac")]
impl HardwareAddr for MacAddressProvider {
    fn first(&self) -> Option<[u8; 6]> {
        match mac_address::get_mac_address() {
            Ok(addr) => addr.map(|e| e.bytes()).filter(is_usable),
            Err(err) => {
                log::debug!("hardware address lookup failed: {}", err);
                None
            }
        }
    }

    fn by_name(&self, name: &str) -> Option<[u8; 6]> {
        match mac_address::mac_address_by_name(name) {
            Ok(addr) => addr.map(|e| e.bytes()).filter(is_usable),
            Err(err) => {
                log::debug!("hardware address lookup for {:?} failed: {}", name, err);
                None
            }
        }
    }
}

/// The hardware provider used unless another one is configured.
#[cfg(feature = "mac")]
pub type DefaultHardware = MacAddressProvider;

/// The hardware provider used unless another one is configured.
#[cfg(not(feature = "mac"))]
pub type DefaultHardware = NoHardware;

fn is_usable(addr: &[u8; 6]) -> bool {
    addr.iter().any(|e| *e != 0)
}

/// Generates a random node id with the multicast bit set, so that it cannot collide with an IEEE
/// 802 address of real hardware.
pub(crate) fn random_node_id<R: RandSource + ?Sized>(rng: &mut R) -> Result<[u8; 6], Error> {
    let mut node_id = [0u8; 6];
    rng.try_fill_bytes(&mut node_id)?;
    node_id[0] |= 0x01;
    Ok(node_id)
}

/// Validates a caller-supplied node id and returns its first six bytes.
pub(crate) fn checked_node_id(id: &[u8]) -> Result<[u8; 6], Error> {
    let Some(node_id) = id.get(..6) else {
        return Err(Error::IncompleteId);
    };
    if node_id[0] & 0x01 == 0 {
        return Err(Error::InvalidFlag);
    }
    let mut dst = [0u8; 6];
    dst.copy_from_slice(node_id);
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::{checked_node_id, random_node_id, HardwareAddr, NoHardware};
    use crate::{Error, ReaderSource};

    /// Sets multicast bit of random node ids
    #[test]
    fn sets_multicast_bit_of_random_node_ids() {
        let mut rng = ReaderSource(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0xfe][..]);
        assert_eq!(
            random_node_id(&mut rng).unwrap(),
            [0x01, 0x11, 0x22, 0x33, 0x44, 0x55]
        );
        assert!(random_node_id(&mut rng).is_err());

        let mut rng = crate::rand_source::os_rng();
        for _ in 0..1_000 {
            assert_eq!(random_node_id(&mut rng).unwrap()[0] & 0x01, 0x01);
        }
    }

    /// Validates custom node ids
    #[test]
    fn validates_custom_node_ids() {
        assert!(matches!(
            checked_node_id(&[0x01, 2, 3, 4, 5]),
            Err(Error::IncompleteId)
        ));
        assert!(matches!(checked_node_id(&[]), Err(Error::IncompleteId)));
        assert!(matches!(
            checked_node_id(&[0x02, 2, 3, 4, 5, 6]),
            Err(Error::InvalidFlag)
        ));
        assert_eq!(
            checked_node_id(&[0x03, 2, 3, 4, 5, 6, 7, 8]).unwrap(),
            [0x03, 2, 3, 4, 5, 6]
        );
    }

    /// Finds nothing without hardware
    #[test]
    fn finds_nothing_without_hardware() {
        assert_eq!(NoHardware.first(), None);
        assert_eq!(NoHardware.by_name("eth0"), None);
    }
}
