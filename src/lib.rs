//! QNP (Queryable Netstring Protocol) - reflective serialization and
//! container distribution for distributed components
//!
//! Message types expose their fields to visitors; the queryable netstring
//! codec turns a traversal into a self-describing, randomly-queryable byte
//! stream with an explicit format version marker, and recovers it again.
//! Containers wrap encoded payloads in timestamped envelopes, a conference
//! fans them out to subscribers, and a reflection bridge decodes payloads
//! whose concrete type is known only at runtime.
//!
//! # Quick Start
//!
//! ```rust
//! use qnp::{Deserializer, FieldRef, Serializer};
//!
//! // Encode two fields keyed by numeric id
//! let mut speed = 88.5f64;
//! let mut label = String::from("lap 3");
//! let mut serializer = Serializer::new();
//! serializer.write(1, FieldRef::Double(&mut speed));
//! serializer.write(2, FieldRef::Str(&mut label));
//! let bytes = serializer.to_vec();
//!
//! // Query them back in any order
//! let deserializer = Deserializer::from_slice(&bytes)?;
//! let mut restored_label = String::new();
//! let mut restored_speed = 0.0f64;
//! deserializer.read(2, FieldRef::Str(&mut restored_label))?;
//! deserializer.read(1, FieldRef::Double(&mut restored_speed))?;
//! assert_eq!(restored_label, "lap 3");
//! assert_eq!(restored_speed, 88.5);
//! # Ok::<(), qnp::Error>(())
//! ```
//!
//! # Features
//!
//! - **Queryable wire format** - any field is an O(1) lookup by id, no
//!   sequential decoding of preceding fields
//! - **Field-level schema evolution** - missing fields keep their prior
//!   values, unknown fields are skipped
//! - **Magic-number gate** - a corrupted stream is rejected before any
//!   field is interpreted
//! - **Runtime reflection** - containers decode into generic field maps
//!   without compiled type knowledge

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod conference;
pub mod data;
pub mod reflection;
pub mod serialization;

pub use conference::{Conference, ContainerListener};
pub use data::{Container, Timestamp};
pub use reflection::{AdapterRegistry, GenericField, GenericMessage, MessageMapper, Value};
pub use serialization::{
    Deserializer, Error, FieldRef, MAGIC_NUMBER, MAX_RECORD_SIZE, Result, Serializer, TypeTag,
    Visitable, Visitor, decode, encode,
};

/// Wire format version identified by [`MAGIC_NUMBER`]
pub const WIRE_VERSION: u8 = 1;
