//! Error type shared by parsers, decoders and generators.

use std::{error, fmt};

use crate::Time;

/// Errors returned by UUID parsers, decoders and generators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The text or byte input does not match any recognized UUID encoding.
    #[error("invalid UUID format: {0}")]
    InvalidFormat(String),

    /// The binary input is not exactly 16 bytes long.
    #[error("invalid UUID length: got {0} bytes")]
    InvalidLength(usize),

    /// A custom node id is shorter than six bytes.
    #[error("given node id is missing data")]
    IncompleteId,

    /// A custom node id does not have the multicast bit set.
    #[error("multicast flag not set")]
    InvalidFlag,

    /// The random number generator failed to produce bytes.
    #[error("entropy source failure: {0}")]
    EntropySourceFailure(#[source] Box<dyn error::Error + Send + Sync>),

    /// A timestamp cannot be represented in the timestamp field of the requested version.
    #[error("time out of range: {0:?}")]
    TimeOutOfRange(Time),

    /// The time source failed to report the current time.
    #[error("clock read failure: {0}")]
    ClockReadFailure(String),
}

impl Error {
    pub(crate) fn format(details: impl fmt::Display) -> Self {
        Self::InvalidFormat(details.to_string())
    }

    pub(crate) fn entropy<E>(err: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self::EntropySourceFailure(err.into())
    }
}

/// Returns the value of a successful result or panics with the error message.
///
/// This is the "must succeed or abort" adapter for call sites that have already decided a failure
/// is unrecoverable in their context; every generator and parser in this crate returns a
/// [`Result`] and leaves the decision to the caller.
///
/// # Examples
///
/// ```rust
/// let uuid: rfcuuid::Uuid = rfcuuid::must("f47ac10b-58cc-0372-8567-0e02b2c3d479".parse());
/// assert_eq!(uuid.as_bytes()[0], 0xf4);
/// ```
///
/// # Panics
///
/// Panics if `result` is an error.
pub fn must<T>(result: Result<T, Error>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("rfcuuid: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::{must, Error};

    /// Names the error kind in messages
    #[test]
    fn names_the_error_kind_in_messages() {
        assert_eq!(
            Error::format("invalid length 35").to_string(),
            "invalid UUID format: invalid length 35"
        );
        assert_eq!(
            Error::InvalidLength(15).to_string(),
            "invalid UUID length: got 15 bytes"
        );
        assert_eq!(
            Error::IncompleteId.to_string(),
            "given node id is missing data"
        );
        assert_eq!(Error::InvalidFlag.to_string(), "multicast flag not set");
        assert!(Error::entropy("device gone")
            .to_string()
            .starts_with("entropy source failure"));
    }

    /// Keeps the entropy failure as error source
    #[test]
    fn keeps_the_entropy_failure_as_error_source() {
        use std::error::Error as _;
        let err = Error::entropy(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(err.source().is_some());
    }

    /// Passes through values and panics on errors
    #[test]
    fn passes_through_values_and_panics_on_errors() {
        assert_eq!(must(Ok::<_, Error>(42)), 42);
        let caught = std::panic::catch_unwind(|| must::<u8>(Err(Error::InvalidFlag)));
        assert!(caught.is_err());
    }
}
