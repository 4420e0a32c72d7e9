//! Reflection bridge: decoding containers without compiled type knowledge
//!
//! A runtime registry maps payload data types to factories for their
//! visitable message types. Given a container, the bridge reconstructs the
//! typed payload and maps every visited field into a [`GenericMessage`],
//! an id/name-indexed value map usable by tooling that has no compiled
//! knowledge of the concrete type.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::data::Container;
use crate::serialization::{Deserializer, FieldRef, TypeTag, Visitable, Visitor};

/// Observed value of one visited field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Bool value
    Bool(bool),
    /// Signed character value
    Char(i8),
    /// Unsigned character value
    UChar(u8),
    /// 8-bit signed integer value
    Int8(i8),
    /// 16-bit signed integer value
    Int16(i16),
    /// 32-bit signed integer value
    Int32(i32),
    /// 64-bit signed integer value
    Int64(i64),
    /// 8-bit unsigned integer value
    UInt8(u8),
    /// 16-bit unsigned integer value
    UInt16(u16),
    /// 32-bit unsigned integer value
    UInt32(u32),
    /// 64-bit unsigned integer value
    UInt64(u64),
    /// 32-bit float value
    Float(f32),
    /// 64-bit float value
    Double(f64),
    /// String value
    Str(String),
    /// Nested message, mapped recursively
    Nested(Box<GenericMessage>),
    /// Fixed array or raw block, kept as raw element bytes
    Array {
        /// Element kind
        element: TypeTag,
        /// Raw element bytes
        data: Vec<u8>,
    },
}

/// One mapped field: identity plus observed value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericField {
    /// Numeric field id
    pub id: u32,
    /// Short field name
    pub short_name: String,
    /// Long field name (with package name)
    pub long_name: String,
    /// Observed value
    pub value: Value,
}

/// Id/name-indexed view of one decoded message.
///
/// Owned by the bridge invocation that produced it; introspection only,
/// not a vehicle for reconstructing the concrete type.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericMessage {
    id: i32,
    short_name: String,
    long_name: String,
    fields: Vec<GenericField>,
}

impl GenericMessage {
    /// Message type id, as reported by `begin_visit`
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }

    /// Short message name
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Long message name
    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Number of mapped fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no field was mapped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in visitation order
    pub fn fields(&self) -> impl Iterator<Item = &GenericField> {
        self.fields.iter()
    }

    /// Look up a field by id
    #[must_use]
    pub fn field(&self, id: u32) -> Option<&GenericField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Look up a field value by id
    #[must_use]
    pub fn value(&self, id: u32) -> Option<&Value> {
        self.field(id).map(|f| &f.value)
    }

    /// Look up a field by its long name
    #[must_use]
    pub fn field_by_long_name(&self, long_name: &str) -> Option<&GenericField> {
        self.fields.iter().find(|f| f.long_name == long_name)
    }
}

/// A [`Visitor`] recording every visited field into a [`GenericMessage`]
#[derive(Debug, Default)]
pub struct MessageMapper {
    message: GenericMessage,
}

impl MessageMapper {
    /// Create a mapper with an empty message
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mapped message
    #[must_use]
    pub fn into_message(self) -> GenericMessage {
        self.message
    }
}

impl Visitor for MessageMapper {
    fn begin_visit(&mut self, id: i32, short_name: &str, long_name: &str) {
        self.message.id = id;
        self.message.short_name = short_name.to_owned();
        self.message.long_name = long_name.to_owned();
    }

    fn end_visit(&mut self) {}

    fn visit(&mut self, id: u32, long_name: &str, short_name: &str, field: FieldRef<'_>) {
        let value = match field {
            FieldRef::Bool(v) => Value::Bool(*v),
            FieldRef::Char(v) => Value::Char(*v),
            FieldRef::UChar(v) => Value::UChar(*v),
            FieldRef::Int8(v) => Value::Int8(*v),
            FieldRef::Int16(v) => Value::Int16(*v),
            FieldRef::Int32(v) => Value::Int32(*v),
            FieldRef::Int64(v) => Value::Int64(*v),
            FieldRef::UInt8(v) => Value::UInt8(*v),
            FieldRef::UInt16(v) => Value::UInt16(*v),
            FieldRef::UInt32(v) => Value::UInt32(*v),
            FieldRef::UInt64(v) => Value::UInt64(*v),
            FieldRef::Float(v) => Value::Float(*v),
            FieldRef::Double(v) => Value::Double(*v),
            FieldRef::Str(v) => Value::Str(v.clone()),
            FieldRef::Nested(v) => {
                let mut nested = MessageMapper::new();
                v.accept(&mut nested);
                Value::Nested(Box::new(nested.into_message()))
            }
            FieldRef::Array { data, element } => Value::Array {
                element,
                data: data.to_vec(),
            },
            FieldRef::Buffer(v) => Value::Array {
                element: TypeTag::UChar,
                data: v.clone(),
            },
        };

        self.message.fields.push(GenericField {
            id,
            short_name: short_name.to_owned(),
            long_name: long_name.to_owned(),
            value,
        });
    }
}

type VisitableFactory = Box<dyn Fn() -> Box<dyn Visitable> + Send + Sync>;

/// Runtime table mapping container data types to visitable factories.
///
/// Populated once at process startup by whoever knows the generated message
/// types; the bridge itself is a plain table lookup.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<u32, VisitableFactory>,
}

impl AdapterRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory producing empty instances of the message type
    /// carried under the given container data type
    pub fn register<F>(&mut self, data_type: u32, factory: F)
    where
        F: Fn() -> Box<dyn Visitable> + Send + Sync + 'static,
    {
        self.adapters.insert(data_type, Box::new(factory));
    }

    /// True if the data type has a registered adapter
    #[must_use]
    pub fn contains(&self, data_type: u32) -> bool {
        self.adapters.contains_key(&data_type)
    }

    /// Number of registered adapters
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// True if no adapter is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Decode a container into a generic message.
    ///
    /// `None` is the explicit fallback for a data type with no registered
    /// adapter or a payload that fails to decode; the registry may simply
    /// not know every type used cluster-wide, so this is not an error and
    /// the bridge never panics.
    #[must_use]
    pub fn resolve(&self, container: &Container) -> Option<GenericMessage> {
        let Some(factory) = self.adapters.get(&container.data_type()) else {
            debug!(data_type = container.data_type(), "no adapter registered");
            return None;
        };

        let mut deserializer = match Deserializer::from_bytes(container.payload().clone()) {
            Ok(d) => d,
            Err(error) => {
                warn!(data_type = container.data_type(), %error, "container payload not decodable");
                return None;
            }
        };

        let mut instance = factory();
        instance.accept(&mut deserializer);

        let mut mapper = MessageMapper::new();
        instance.accept(&mut mapper);
        Some(mapper.into_message())
    }
}
