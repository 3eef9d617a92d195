/*!
The error type shared by every decoding and construction path.

Every variant is terminal for the operation that produced it: the decoder
never returns a partially built item.
*/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The cursor could not supply the requested number of bytes.
    #[error("Not enough data for encoded value")]
    TruncatedInput,

    /// Additional information values 28, 29 and 30 are reserved.
    #[error("Invalid additional information value {0}")]
    InvalidAdditionalInformation(u8),

    /// Indefinite length was signalled on a major type that has no such form.
    #[error("Indefinite length is not allowed for major type {0}")]
    IndefiniteLengthNotAllowed(u8),

    /// A chunk inside an indefinite-length string is not a definite string of the same kind.
    #[error("Indefinite-length {0} contains an invalid {1} chunk")]
    InvalidChunkType(&'static str, &'static str),

    /// A break marker appeared outside of an indefinite-length container.
    #[error("Break marker with no enclosing indefinite-length item")]
    UnexpectedBreak,

    /// A tag handler rejected the item it annotates.
    #[error("Tag {tag} only accepts {expected}")]
    InvalidTagOperand { tag: u64, expected: &'static str },

    /// A simple-value constructor rejected its input.
    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),

    #[error("Unsupported major type {0}")]
    UnsupportedMajorType(u8),

    /// Nesting went deeper than the configured bound.
    #[error("Maximum nesting depth {0} exceeded")]
    MaxDepthExceeded(usize),

    #[error(transparent)]
    InvalidUtf8(#[from] core::str::Utf8Error),

    /// A value does not fit the requested native integer type.
    #[error("Value does not fit the target integer type")]
    Overflow,

    /// Bytes remain after the end of the decoded item.
    #[error("Additional data after the end of the item")]
    AdditionalData,

    #[error("Invalid number: {0}")]
    InvalidNumber(&'static str),

    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(std::io::Error),
}
