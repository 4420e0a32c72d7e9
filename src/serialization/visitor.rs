//! Visitor / Visitable traversal contract
//!
//! A message type implements [`Visitable`] once; every codec facility
//! (serializer, deserializer, generic mappers) is a [`Visitor`] driven by
//! the same traversal.

use super::FieldRef;

/// A message type that can present its fields to a [`Visitor`].
///
/// Contract: `accept` calls [`Visitor::begin_visit`] exactly once before the
/// first field, presents every field exactly once in declaration order via
/// [`Visitor::visit`], then calls [`Visitor::end_visit`] exactly once. The
/// order is identical on every call; field ids never repeat within one
/// message. Fields are handed out as mutable references so a read-side
/// visitor can assign into them; a write-side visitor only reads through
/// them.
pub trait Visitable {
    /// Stable numeric identifier of this message type
    fn id(&self) -> i32;

    /// Short identifier of this message type
    fn short_name(&self) -> &'static str;

    /// Long identifier (with package name) of this message type
    fn long_name(&self) -> &'static str;

    /// Present all fields to the visitor, bracketed by begin/end
    fn accept(&mut self, visitor: &mut dyn Visitor);
}

/// The abstract sink of a traversal.
pub trait Visitor {
    /// Called once before the first field of a message
    fn begin_visit(&mut self, id: i32, short_name: &str, long_name: &str);

    /// Called once after the last field of a message
    fn end_visit(&mut self);

    /// Called once per field, in declaration order
    fn visit(&mut self, id: u32, long_name: &str, short_name: &str, field: FieldRef<'_>);
}
