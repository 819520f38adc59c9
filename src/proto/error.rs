use std::str::Utf8Error;
use thiserror::Error;

/// Failures surfaced by the AMLL codec.
///
/// The codec never recovers from these: a malformed buffer yields exactly one
/// error and no partially decoded message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// The two leading bytes do not name any of the known message kinds.
    #[error("unknown opcode: {0:#06x}")]
    UnknownOpcode(u16),

    /// A textual message kind (e.g. `"setMusicInfo"`) is not one of the known kinds.
    #[error("unknown message kind: {0}")]
    UnknownVariant(String),

    /// A fixed-width read, a string terminator or a vector element ran past the end.
    #[error("truncated input: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A NUL-terminated string is not valid UTF-8.
    #[error("invalid utf-8 string at offset {offset}: {source}")]
    InvalidEncoding {
        offset: usize,
        #[source]
        source: Utf8Error,
    },

    /// Strict decoding found bytes after the last payload field.
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
