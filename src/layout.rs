//! Variant and version fields and their inspection on raw byte buffers.

use std::fmt;

/// Represents the variant field of a UUID, the top bits of byte 8.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Variant {
    /// The buffer inspected is not a 16-byte UUID.
    Invalid,
    /// The variant specified in RFC 4122 (`10xx`).
    Rfc4122,
    /// Reserved, NCS backward compatibility (`0xxx`).
    Reserved,
    /// Reserved, Microsoft Corporation backward compatibility (`110x`).
    Microsoft,
    /// Reserved for future definition (`111x`).
    Future,
}

impl Variant {
    /// Classifies the variant byte (byte 8) of a UUID.
    pub const fn from_byte(octet: u8) -> Self {
        if octet & 0xc0 == 0x80 {
            Self::Rfc4122
        } else if octet & 0xe0 == 0xc0 {
            Self::Microsoft
        } else if octet & 0xe0 == 0xe0 {
            Self::Future
        } else {
            Self::Reserved
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "INVALID",
            Self::Rfc4122 => "RFC4122",
            Self::Reserved => "RESERVED",
            Self::Microsoft => "MICROSOFT",
            Self::Future => "FUTURE",
        })
    }
}

/// Represents the 4-bit version field of a UUID, the high nibble of byte 6.
///
/// Any nibble value is representable; the named constants cover the versions this crate
/// generates.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Version(pub u8);

impl Version {
    /// Gregorian time and node id.
    pub const MAC: Self = Self(1);
    /// DCE Security.
    pub const DCE: Self = Self(2);
    /// Name-based with MD5.
    pub const MD5: Self = Self(3);
    /// Random.
    pub const RANDOM: Self = Self(4);
    /// Name-based with SHA-1.
    pub const SHA1: Self = Self(5);
    /// Reordered Gregorian time and node id.
    pub const SORT_MAC: Self = Self(6);
    /// Unix time in milliseconds and random.
    pub const SORT_RAND: Self = Self(7);

    /// Returns true if the version carries a timestamp this crate can decode.
    pub const fn is_time_based(self) -> bool {
        matches!(self.0, 1 | 2 | 6 | 7)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 15 {
            write!(f, "BAD_VERSION_{}", self.0)
        } else {
            write!(f, "VERSION_{}", self.0)
        }
    }
}

impl From<Version> for u8 {
    fn from(src: Version) -> Self {
        src.0
    }
}

/// Returns the variant of a UUID stored in a raw byte buffer, or [`Variant::Invalid`] if the
/// buffer is not exactly 16 bytes long.
///
/// # Examples
///
/// ```rust
/// use rfcuuid::{layout, Variant};
///
/// assert_eq!(layout::variant_of(&[0u8; 15]), Variant::Invalid);
/// assert_eq!(layout::variant_of(&[0x80u8; 16]), Variant::Rfc4122);
/// ```
pub fn variant_of(bytes: &[u8]) -> Variant {
    if bytes.len() != 16 {
        return Variant::Invalid;
    }
    Variant::from_byte(bytes[8])
}

/// Returns the version of a UUID stored in a raw byte buffer, or `None` if the buffer is not
/// exactly 16 bytes long.
pub fn version_of(bytes: &[u8]) -> Option<Version> {
    if bytes.len() != 16 {
        return None;
    }
    Some(Version(bytes[6] >> 4))
}
