//! Record encoder for the version-1 queryable netstring format
//!
//! Each written field becomes one netstring-framed record:
//!
//! ```text
//! <ASCII decimal total-length>:<u32 id BE><u8 type tag><payload>,
//! ```
//!
//! so a reader can skip any record without decoding its contents.

use std::io::Write;

use tracing::error;

use super::{FieldRef, MAGIC_NUMBER, MAX_RECORD_SIZE, TypeTag, Visitor};

/// Accumulating encoder; also a [`Visitor`] so a message can be encoded by
/// driving its `accept` over it.
#[derive(Debug, Default)]
pub struct Serializer {
    records: Vec<u8>,
}

impl Serializer {
    /// Create an empty serializer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record for the given field id.
    ///
    /// Repeated writes for the same id are all kept in stream order; a
    /// decoder will only index the first one. A field whose record would
    /// exceed [`MAX_RECORD_SIZE`] is not encoded at all (no decoder would
    /// accept it) and is logged as an error.
    pub fn write(&mut self, id: u32, field: FieldRef<'_>) {
        let tag = field.tag();
        match field {
            FieldRef::Bool(v) => self.push_record(id, tag, &[u8::from(*v)]),
            FieldRef::Char(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::UChar(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::Int8(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::Int16(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::Int32(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::Int64(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::UInt8(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::UInt16(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::UInt32(v) => self.push_record(id, tag, &v.to_be_bytes()),
            FieldRef::UInt64(v) => self.push_record(id, tag, &v.to_be_bytes()),
            // Floats are stored bit-exact, so NaN and the infinities survive
            FieldRef::Float(v) => self.push_record(id, tag, &v.to_bits().to_be_bytes()),
            FieldRef::Double(v) => self.push_record(id, tag, &v.to_bits().to_be_bytes()),
            FieldRef::Str(v) => {
                let mut payload = Vec::with_capacity(4 + v.len());
                payload.extend_from_slice(&(v.len() as u32).to_be_bytes());
                payload.extend_from_slice(v.as_bytes());
                self.push_record(id, tag, &payload);
            }
            FieldRef::Nested(v) => {
                // A nested message is a complete stream image of its own
                let mut child = Serializer::new();
                v.accept(&mut child);
                self.push_record(id, tag, &child.to_vec());
            }
            FieldRef::Array { data, element } => {
                let count = data.len() / element.fixed_size().unwrap_or(1);
                let mut payload = Vec::with_capacity(5 + data.len());
                payload.extend_from_slice(&(count as u32).to_be_bytes());
                payload.push(element.as_u8());
                payload.extend_from_slice(data);
                self.push_record(id, tag, &payload);
            }
            FieldRef::Buffer(v) => {
                let mut payload = Vec::with_capacity(5 + v.len());
                payload.extend_from_slice(&(v.len() as u32).to_be_bytes());
                payload.push(TypeTag::UChar.as_u8());
                payload.extend_from_slice(v);
                self.push_record(id, tag, &payload);
            }
        }
    }

    /// Flush the complete stream image (magic number followed by all
    /// accumulated records) to the sink.
    ///
    /// Idempotent: the accumulated records are not consumed, so a second
    /// call writes the same image again.
    pub fn get_serialized_data<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(&MAGIC_NUMBER.to_be_bytes())?;
        out.write_all(&self.records)
    }

    /// The complete stream image as an owned buffer
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(2 + self.records.len());
        image.extend_from_slice(&MAGIC_NUMBER.to_be_bytes());
        image.extend_from_slice(&self.records);
        image
    }

    fn push_record(&mut self, id: u32, tag: TypeTag, payload: &[u8]) {
        let total = 4 + 1 + payload.len();
        // Symmetric with the decode-side bound; dropping the whole record
        // also keeps every length prefix within u32 range
        if total > MAX_RECORD_SIZE {
            error!(id, size = total, max = MAX_RECORD_SIZE, "record exceeds maximum size, not encoded");
            return;
        }
        self.records.extend_from_slice(total.to_string().as_bytes());
        self.records.push(b':');
        self.records.extend_from_slice(&id.to_be_bytes());
        self.records.push(tag.as_u8());
        self.records.extend_from_slice(payload);
        self.records.push(b',');
    }
}

impl Visitor for Serializer {
    fn begin_visit(&mut self, _id: i32, _short_name: &str, _long_name: &str) {}

    fn end_visit(&mut self) {}

    fn visit(&mut self, id: u32, _long_name: &str, _short_name: &str, field: FieldRef<'_>) {
        self.write(id, field);
    }
}
