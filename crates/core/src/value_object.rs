//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. An
/// [`ItemCode`](crate::ItemCode) is the canonical example in this workspace:
/// two codes normalized from `" b1000001"` and `"B1000001"` are the same code.
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
