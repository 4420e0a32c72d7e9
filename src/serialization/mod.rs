//! Queryable netstring codec (version 1)
//!
//! This module provides the wire format, the Visitor/Visitable traversal
//! contract, and the Serializer/Deserializer pair for QNP.

mod deserializer;
mod error;
mod serializer;
mod types;
mod visitor;

pub use deserializer::Deserializer;
pub use error::{Error, Result};
pub use serializer::Serializer;
pub use types::{FieldRef, TypeTag};
pub use visitor::{Visitable, Visitor};

/// Version-1 magic number, written in network byte order before any record
pub const MAGIC_NUMBER: u16 = 0xAACF;

/// Magic number size in bytes
pub const MAGIC_SIZE: usize = 2;

/// Bytes of a record occupied by the field id and the type tag
pub const RECORD_HEADER_SIZE: usize = 5;

/// Maximum accepted record length (16 MB); longer length prefixes are
/// rejected as corruption rather than silently truncated
pub const MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;

/// Encode a visitable message into a complete version-1 stream image
/// (magic number followed by one record per field).
///
/// The visitable is traversed once via [`Visitable::accept`]; traversal
/// order is the message's declaration order.
pub fn encode(visitable: &mut dyn Visitable) -> Vec<u8> {
    let mut serializer = Serializer::new();
    visitable.accept(&mut serializer);
    serializer.to_vec()
}

/// Decode a complete version-1 stream image into a visitable message.
///
/// Fields absent from the stream keep their prior values; per-field type
/// mismatches are logged and skipped.
///
/// # Errors
///
/// Returns an error if the magic number is missing or any record framing
/// is malformed. No field is populated in that case.
pub fn decode(bytes: &[u8], visitable: &mut dyn Visitable) -> Result<()> {
    let mut deserializer = Deserializer::from_slice(bytes)?;
    visitable.accept(&mut deserializer);
    Ok(())
}
