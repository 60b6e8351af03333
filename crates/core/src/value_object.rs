//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**; they represent
/// concepts where identity doesn't matter. `AttributeCode`, `Prefix` and
/// `Suffix` are the canonical examples here: two prefixes built from the same
/// codes are the same prefix.
///
/// To "modify" a value object, construct a new one. Constructors validate, so
/// holding a value object means holding a well-formed value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
