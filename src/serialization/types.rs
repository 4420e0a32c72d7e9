//! Wire type tags and the field dispatch payload

use std::fmt;

use super::Visitable;

/// Wire type tags for the closed primitive set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TypeTag {
    /// One byte, 0 or 1
    Bool = 0x01,
    /// Signed 8-bit character
    Char = 0x02,
    /// Unsigned 8-bit character
    UChar = 0x03,
    /// 8-bit signed integer
    Int8 = 0x04,
    /// 16-bit signed integer
    Int16 = 0x05,
    /// 32-bit signed integer
    Int32 = 0x06,
    /// 64-bit signed integer
    Int64 = 0x07,
    /// 8-bit unsigned integer
    UInt8 = 0x08,
    /// 16-bit unsigned integer
    UInt16 = 0x09,
    /// 32-bit unsigned integer
    UInt32 = 0x0A,
    /// 64-bit unsigned integer
    UInt64 = 0x0B,
    /// 32-bit floating point, stored bit-exact
    Float = 0x0C,
    /// 64-bit floating point, stored bit-exact
    Double = 0x0D,
    /// Length-prefixed UTF-8 string
    Str = 0x0E,
    /// Recursively framed nested message
    Nested = 0x0F,
    /// Fixed-size array: count + element tag + raw bytes
    Array = 0x10,
}

impl TypeTag {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Bool),
            0x02 => Some(Self::Char),
            0x03 => Some(Self::UChar),
            0x04 => Some(Self::Int8),
            0x05 => Some(Self::Int16),
            0x06 => Some(Self::Int32),
            0x07 => Some(Self::Int64),
            0x08 => Some(Self::UInt8),
            0x09 => Some(Self::UInt16),
            0x0A => Some(Self::UInt32),
            0x0B => Some(Self::UInt64),
            0x0C => Some(Self::Float),
            0x0D => Some(Self::Double),
            0x0E => Some(Self::Str),
            0x0F => Some(Self::Nested),
            0x10 => Some(Self::Array),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Encoded size of one value of this kind, for the fixed-width kinds
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Char | Self::UChar | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float => Some(4),
            Self::Int64 | Self::UInt64 | Self::Double => Some(8),
            Self::Str | Self::Nested | Self::Array => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "Bool",
            Self::Char => "Char",
            Self::UChar => "UChar",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Str => "Str",
            Self::Nested => "Nested",
            Self::Array => "Array",
        };
        write!(f, "{name}")
    }
}

/// Borrowed view of one message field, passed through [`super::Visitor::visit`].
///
/// Collapses the per-type callback set into a single sum type: a write-side
/// visitor reads through the reference, a read-side visitor assigns through
/// it. `Buffer` is the variable-length raw block; on the wire it shares the
/// `Array` tag with `UChar` elements.
pub enum FieldRef<'a> {
    /// Bool field
    Bool(&'a mut bool),
    /// Signed character field
    Char(&'a mut i8),
    /// Unsigned character field
    UChar(&'a mut u8),
    /// 8-bit signed integer field
    Int8(&'a mut i8),
    /// 16-bit signed integer field
    Int16(&'a mut i16),
    /// 32-bit signed integer field
    Int32(&'a mut i32),
    /// 64-bit signed integer field
    Int64(&'a mut i64),
    /// 8-bit unsigned integer field
    UInt8(&'a mut u8),
    /// 16-bit unsigned integer field
    UInt16(&'a mut u16),
    /// 32-bit unsigned integer field
    UInt32(&'a mut u32),
    /// 64-bit unsigned integer field
    UInt64(&'a mut u64),
    /// 32-bit float field
    Float(&'a mut f32),
    /// 64-bit float field
    Double(&'a mut f64),
    /// String field
    Str(&'a mut String),
    /// Nested message field
    Nested(&'a mut dyn Visitable),
    /// Fixed-size array of primitive elements
    Array {
        /// Raw element bytes; length must equal count times element size
        data: &'a mut [u8],
        /// Element kind
        element: TypeTag,
    },
    /// Variable-length raw byte block
    Buffer(&'a mut Vec<u8>),
}

impl FieldRef<'_> {
    /// Wire tag this field is stored under
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Bool(_) => TypeTag::Bool,
            Self::Char(_) => TypeTag::Char,
            Self::UChar(_) => TypeTag::UChar,
            Self::Int8(_) => TypeTag::Int8,
            Self::Int16(_) => TypeTag::Int16,
            Self::Int32(_) => TypeTag::Int32,
            Self::Int64(_) => TypeTag::Int64,
            Self::UInt8(_) => TypeTag::UInt8,
            Self::UInt16(_) => TypeTag::UInt16,
            Self::UInt32(_) => TypeTag::UInt32,
            Self::UInt64(_) => TypeTag::UInt64,
            Self::Float(_) => TypeTag::Float,
            Self::Double(_) => TypeTag::Double,
            Self::Str(_) => TypeTag::Str,
            Self::Nested(_) => TypeTag::Nested,
            Self::Array { .. } | Self::Buffer(_) => TypeTag::Array,
        }
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldRef::{}", self.tag())
    }
}
