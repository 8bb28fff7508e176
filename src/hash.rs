//! Name-based (versions 3 and 5) UUIDs.

use digest::Digest;

use crate::{Uuid, Version};

/// Name space for fully-qualified domain names.
pub const NAMESPACE_DNS: Uuid = Uuid::from_u128(0x6ba7b810_9dad_11d1_80b4_00c04fd430c8);

/// Name space for URLs.
pub const NAMESPACE_URL: Uuid = Uuid::from_u128(0x6ba7b811_9dad_11d1_80b4_00c04fd430c8);

/// Name space for ISO object identifiers.
pub const NAMESPACE_OID: Uuid = Uuid::from_u128(0x6ba7b812_9dad_11d1_80b4_00c04fd430c8);

/// Name space for X.500 distinguished names in DER or text form.
pub const NAMESPACE_X500: Uuid = Uuid::from_u128(0x6ba7b814_9dad_11d1_80b4_00c04fd430c8);

/// Generates a name-based UUID from the digest of `namespace` followed by `name`, keeping the
/// first 16 bytes of the digest and setting the version and variant fields.
///
/// Every call is independent and deterministic, and the same inputs always produce the same UUID.
///
/// # Panics
///
/// Panics if the digest is shorter than 16 bytes.
pub fn new_hash<D: Digest>(namespace: &Uuid, name: &[u8], version: Version) -> Uuid {
    let digest = D::new()
        .chain_update(namespace.as_bytes())
        .chain_update(name)
        .finalize();
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::tagged(bytes, version)
}

/// Generates a version 3 UUID from an MD5 digest.
///
/// # Examples
///
/// ```rust
/// use rfcuuid::{new_md5, NAMESPACE_DNS};
///
/// let uuid = new_md5(&NAMESPACE_DNS, b"python.org");
/// assert_eq!(&uuid.encode() as &str, "6fa459ea-ee8a-3ca4-894e-db77e160355e");
/// ```
pub fn new_md5(namespace: &Uuid, name: &[u8]) -> Uuid {
    new_hash::<md5::Md5>(namespace, name, Version::MD5)
}

/// Generates a version 5 UUID from a SHA-1 digest.
///
/// # Examples
///
/// ```rust
/// use rfcuuid::{new_sha1, NAMESPACE_DNS};
///
/// let uuid = new_sha1(&NAMESPACE_DNS, b"python.org");
/// assert_eq!(&uuid.encode() as &str, "886313e1-3b8a-5372-9b90-0c9aee199e5d");
/// ```
pub fn new_sha1(namespace: &Uuid, name: &[u8]) -> Uuid {
    new_hash::<sha1::Sha1>(namespace, name, Version::SHA1)
}

/// Returns the predefined name space identified by `name` (`"@dns"`, `"@url"`, `"@oid"` or
/// `"@x500"`), or `None` if `name` names none of them.
pub fn namespace_by_name(name: &str) -> Option<Uuid> {
    match name {
        "@dns" => Some(NAMESPACE_DNS),
        "@url" => Some(NAMESPACE_URL),
        "@oid" => Some(NAMESPACE_OID),
        "@x500" => Some(NAMESPACE_X500),
        _ => None,
    }
}
