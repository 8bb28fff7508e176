//! Text and binary marshaling hooks, plus optional `serde` and `uuid` integrations.

use fstr::FStr;

use crate::{Error, Uuid};

impl Uuid {
    /// Returns the canonical text form for text-based encodings. Unlike
    /// [`marshal_quoted()`](Self::marshal_quoted), the output is not quoted.
    pub fn marshal_text(&self) -> FStr<36> {
        self.encode()
    }

    /// Returns the canonical text form wrapped in double quotes, for encoders that write JSON
    /// string literals directly.
    pub fn marshal_quoted(&self) -> String {
        format!("\"{}\"", self.encode())
    }

    /// Decodes the canonical or URN text form. A canonical form wrapped in double quotes is also
    /// accepted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfcuuid::Uuid;
    ///
    /// let a = Uuid::unmarshal_text(b"f47ac10b-58cc-0372-8567-0e02b2c3d479")?;
    /// let b = Uuid::unmarshal_text(b"\"f47ac10b-58cc-0372-8567-0e02b2c3d479\"")?;
    /// let c = Uuid::unmarshal_text(b"urn:uuid:f47ac10b-58cc-0372-8567-0e02b2c3d479")?;
    /// assert_eq!(a, b);
    /// assert_eq!(a, c);
    /// assert!(Uuid::unmarshal_text(b"\"f47ac10b-58cc-0372-8567-0e02b2c3d4\"").is_err());
    /// # Ok::<(), rfcuuid::Error>(())
    /// ```
    pub fn unmarshal_text(src: &[u8]) -> Result<Self, Error> {
        match src {
            [b'"', inner @ .., b'"'] if inner.len() == 36 => Self::parse_bytes(inner),
            _ => Self::parse_bytes(src),
        }
    }

    /// Returns the 16-byte big-endian binary form.
    pub const fn marshal_binary(&self) -> [u8; 16] {
        *self.as_bytes()
    }

    /// Decodes the 16-byte big-endian binary form.
    pub fn unmarshal_binary(src: &[u8]) -> Result<Self, Error> {
        Self::from_slice(src)
    }

    /// Returns the binary form with `time_low`, `time_mid` and `time_hi_and_version` in
    /// little-endian byte order, as used by Microsoft GUID structures. The remaining eight bytes
    /// keep their order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfcuuid::Uuid;
    ///
    /// let uuid = "f47ac10b-58cc-0372-8567-0e02b2c3d479".parse::<Uuid>()?;
    /// assert_eq!(
    ///     uuid.to_bytes_le(),
    ///     [
    ///         0x0b, 0xc1, 0x7a, 0xf4, 0xcc, 0x58, 0x72, 0x03, 0x85, 0x67, 0x0e, 0x02, 0xb2, 0xc3,
    ///         0xd4, 0x79
    ///     ]
    /// );
    /// # Ok::<(), rfcuuid::Error>(())
    /// ```
    pub const fn to_bytes_le(&self) -> [u8; 16] {
        swap_fields(*self.as_bytes())
    }

    /// Decodes the binary form produced by [`to_bytes_le()`](Self::to_bytes_le).
    pub fn from_slice_le(src: &[u8]) -> Result<Self, Error> {
        Self::from_slice(src).map(|e| Self::from_bytes(swap_fields(e.to_bytes())))
    }

    /// Alias of [`to_bytes_le()`](Self::to_bytes_le).
    pub const fn marshal_binary_le(&self) -> [u8; 16] {
        self.to_bytes_le()
    }

    /// Alias of [`from_slice_le()`](Self::from_slice_le).
    pub fn unmarshal_binary_le(src: &[u8]) -> Result<Self, Error> {
        Self::from_slice_le(src)
    }
}

/// Reverses the byte order of the first three fields; the operation is its own inverse.
const fn swap_fields(b: [u8; 16]) -> [u8; 16] {
    [
        b[3], b[2], b[1], b[0], b[5], b[4], b[7], b[6], b[8], b[9], b[10], b[11], b[12], b[13],
        b[14], b[15],
    ]
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.to_bytes())
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self::from_bytes(src.into_bytes())
        }
    }

}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::Uuid;
    use serde::{de, Deserializer, Serializer};
    use std::fmt;

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.marshal_text())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Uuid::unmarshal_text(value.as_bytes()).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Uuid::unmarshal_binary(value).map_err(de::Error::custom)
        }
    }

}
