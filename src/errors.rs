use crate::types::Type;
use thiserror::Error;

/// A type alias for results returned by the codec.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while encoding a query or decoding a response.
///
/// Every variant is fatal to the current encode or decode. A response with
/// no answers is not an error, it decodes to an empty list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A label or the whole name is too long to encode.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The response is shorter than the fixed 12 byte header.
    #[error("malformed header: message is {len} bytes, expected at least 12")]
    MalformedHeader { len: usize },

    /// A read would go past the end of the message.
    #[error("truncated message: reading {len} bytes at offset {offset} exceeds message length {size}")]
    TruncatedMessage {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Too many compression pointers were followed while reading a name.
    #[error("compression loop: gave up after {hops} pointer hops reading name at offset {offset}")]
    CompressionLoop { offset: usize, hops: usize },

    /// A record's data does not have the size its type requires.
    #[error("invalid {rtype} record length ({len}) expected {expected}")]
    RecordTooShort {
        rtype: Type,
        len: usize,
        expected: usize,
    },
}

/// Returns early with the given [`Error`] variant.
///
/// ```ignore
/// bail!(MalformedHeader { len: buf.len() });
/// ```
#[macro_export]
macro_rules! bail {
    ($kind:ident $($fields:tt)*) => {
        return Err($crate::Error::$kind $($fields)*)
    };
}
