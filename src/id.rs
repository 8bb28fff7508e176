use std::{fmt, str};

use fstr::FStr;

use crate::{Error, Variant, Version};

/// Represents a Universally Unique IDentifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Creates an object from a 16-byte big-endian array.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns a copy of the underlying byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Creates an object from a 128-bit unsigned integer in big-endian order.
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    /// Creates an object from a byte slice that must be exactly 16 bytes long.
    pub fn from_slice(src: &[u8]) -> Result<Self, Error> {
        <[u8; 16]>::try_from(src)
            .map(Self)
            .map_err(|_| Error::InvalidLength(src.len()))
    }

    /// Creates a UUID byte array from UUIDv1 field values: a 60-bit count of 100-nanosecond
    /// intervals since 1582-10-15, a 14-bit clock sequence, and a 48-bit node id.
    ///
    /// # Panics
    ///
    /// Panics if `ticks` or `clock_seq` does not fit in its field.
    pub const fn from_fields_v1(ticks: u64, clock_seq: u16, node_id: &[u8; 6]) -> Self {
        if ticks >= 1 << 60 || clock_seq >= 1 << 14 {
            panic!("invalid field value");
        }

        Self([
            (ticks >> 24) as u8,
            (ticks >> 16) as u8,
            (ticks >> 8) as u8,
            ticks as u8,
            (ticks >> 40) as u8,
            (ticks >> 32) as u8,
            0x10 | (ticks >> 56) as u8,
            (ticks >> 48) as u8,
            0x80 | (clock_seq >> 8) as u8,
            clock_seq as u8,
            node_id[0],
            node_id[1],
            node_id[2],
            node_id[3],
            node_id[4],
            node_id[5],
        ])
    }

    /// Creates a UUID byte array from UUIDv6 field values. The fields are those of
    /// [`from_fields_v1()`](Self::from_fields_v1), but the timestamp is stored most significant
    /// bits first so that the byte order follows the generation time.
    ///
    /// # Panics
    ///
    /// Panics if `ticks` or `clock_seq` does not fit in its field.
    pub const fn from_fields_v6(ticks: u64, clock_seq: u16, node_id: &[u8; 6]) -> Self {
        if ticks >= 1 << 60 || clock_seq >= 1 << 14 {
            panic!("invalid field value");
        }

        Self([
            (ticks >> 52) as u8,
            (ticks >> 44) as u8,
            (ticks >> 36) as u8,
            (ticks >> 28) as u8,
            (ticks >> 20) as u8,
            (ticks >> 12) as u8,
            0x60 | ((ticks >> 8) & 0x0f) as u8,
            ticks as u8,
            0x80 | (clock_seq >> 8) as u8,
            clock_seq as u8,
            node_id[0],
            node_id[1],
            node_id[2],
            node_id[3],
            node_id[4],
            node_id[5],
        ])
    }

    /// Creates a UUID byte array from UUIDv7 field values.
    ///
    /// # Panics
    ///
    /// Panics if any argument does not fit in its field.
    pub const fn from_fields_v7(unix_ts_ms: u64, rand_a: u16, rand_b: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || rand_a >= 1 << 12 || rand_b >= 1 << 62 {
            panic!("invalid field value");
        }

        Self([
            (unix_ts_ms >> 40) as u8,
            (unix_ts_ms >> 32) as u8,
            (unix_ts_ms >> 24) as u8,
            (unix_ts_ms >> 16) as u8,
            (unix_ts_ms >> 8) as u8,
            unix_ts_ms as u8,
            0x70 | (rand_a >> 8) as u8,
            rand_a as u8,
            0x80 | (rand_b >> 56) as u8,
            (rand_b >> 48) as u8,
            (rand_b >> 40) as u8,
            (rand_b >> 32) as u8,
            (rand_b >> 24) as u8,
            (rand_b >> 16) as u8,
            (rand_b >> 8) as u8,
            rand_b as u8,
        ])
    }

    /// Overwrites the version nibble and the variant bits of `bytes`, keeping the other 122 bits.
    pub(crate) const fn tagged(mut bytes: [u8; 16], version: Version) -> Self {
        bytes[6] = (bytes[6] & 0x0f) | (version.0 << 4);
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(bytes)
    }

    /// Returns the variant field value. This is never [`Variant::Invalid`] for a `Uuid`.
    pub const fn variant(&self) -> Variant {
        Variant::from_byte(self.0[8])
    }

    /// Returns the version field value without checking whether the version is a known one.
    pub const fn version(&self) -> Version {
        Version(self.0[6] >> 4)
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfcuuid::Uuid;
    ///
    /// let x = "f47ac10b-58cc-0372-8567-0e02b2c3d479".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "f47ac10b-58cc-0372-8567-0e02b2c3d479");
    /// assert_eq!(format!("{}", y), "f47ac10b-58cc-0372-8567-0e02b2c3d479");
    /// # Ok::<(), rfcuuid::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for (i, e) in self.0.iter().enumerate() {
            if let (Some(hi), Some(lo)) = (buf_iter.next(), buf_iter.next()) {
                *hi = DIGITS[(e >> 4) as usize];
                *lo = DIGITS[(e & 15) as usize];
            }
            if i == 3 || i == 5 || i == 7 || i == 9 {
                if let Some(hyphen) = buf_iter.next() {
                    *hyphen = b'-';
                }
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: every byte written above is ASCII
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Returns the RFC 2141 URN form, `urn:uuid:xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
    pub fn urn(&self) -> String {
        format!("urn:uuid:{}", self.encode())
    }

    /// Creates an object from the 8-4-4-4-12 hexadecimal representation, optionally prefixed by
    /// `urn:uuid:`, read directly from a byte buffer.
    ///
    /// Hex digits are accepted in either case and the prefix is case-insensitive. Anything else,
    /// including surrounding whitespace and braces, is rejected.
    pub fn parse_bytes(src: &[u8]) -> Result<Self, Error> {
        const URN_PREFIX: &[u8] = b"urn:uuid:";
        const HEX_POSITIONS: [usize; 16] = [0, 2, 4, 6, 9, 11, 14, 16, 19, 21, 24, 26, 28, 30, 32, 34];

        let (offset, text) = match src.len() {
            36 => (0, src),
            45 if src[..9].eq_ignore_ascii_case(URN_PREFIX) => (9, &src[9..]),
            45 => return Err(Error::format("invalid urn prefix")),
            n => return Err(Error::format(format_args!("invalid length {}", n))),
        };

        for i in [8, 13, 18, 23] {
            if text[i] != b'-' {
                return Err(Error::format(format_args!(
                    "expected hyphen at position {}",
                    offset + i
                )));
            }
        }

        let mut dst = [0u8; 16];
        for (e, i) in dst.iter_mut().zip(HEX_POSITIONS) {
            match (hex_value(text[i]), hex_value(text[i + 1])) {
                (Some(hi), Some(lo)) => *e = (hi << 4) | lo,
                _ => {
                    return Err(Error::format(format_args!(
                        "invalid hex digit near position {}",
                        offset + i
                    )))
                }
            }
        }
        Ok(Self(dst))
    }
}

const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation or its URN form.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_bytes(src.as_bytes())
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl TryFrom<&str> for Uuid {
    type Error = Error;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}
