//! Codec error types

use thiserror::Error;

/// Errors raised by the queryable netstring codec
#[derive(Error, Debug)]
pub enum Error {
    /// Magic number missing or unknown; the stream must not be interpreted
    #[error("invalid magic number: expected 0xAACF, got {found:#06x}")]
    InvalidMagic {
        /// Found magic number
        found: u16,
    },

    /// Stream ended before a complete magic number or record
    #[error("truncated stream: need {needed} bytes, got {got}")]
    TruncatedStream {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Netstring length prefix is not a decimal number followed by a colon
    #[error("malformed length prefix at offset {at}")]
    MalformedLength {
        /// Stream offset of the offending record
        at: usize,
    },

    /// Record framing violates the netstring envelope
    #[error("malformed record at offset {at}: {reason}")]
    MalformedRecord {
        /// Stream offset of the offending record
        at: usize,
        /// What was wrong with the framing
        reason: &'static str,
    },

    /// Declared record length exceeds the accepted bound
    #[error("record too large: {size} bytes (max {max})")]
    RecordTooLarge {
        /// Declared record length
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Stored type tag does not match the requested target type
    #[error("type mismatch for field {id}: requested tag {expected:#04x}, stored tag {found:#04x}")]
    TypeMismatch {
        /// Field id
        id: u32,
        /// Tag implied by the read destination
        expected: u8,
        /// Tag stored in the record
        found: u8,
    },

    /// Payload length does not match the requested target type
    #[error("bad payload size for field {id}: expected {expected} bytes, got {got}")]
    PayloadSize {
        /// Field id
        id: u32,
        /// Size implied by the read destination
        expected: usize,
        /// Stored payload size
        got: usize,
    },

    /// String field payload is not valid UTF-8
    #[error("invalid UTF-8 in string field {id}")]
    InvalidUtf8 {
        /// Field id
        id: u32,
    },

    /// IO error while flushing or ingesting a stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
