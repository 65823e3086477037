//! Items used by code generated from `#[derive(Serial)]`.
//!
//! Not a public API; paths here may change without notice.

use crate::{Described, Enumerated, Grammar, Result};

pub use crate::{Accessor, EnumTableBuilder, MemberBuilder, RegistryError};

#[inline]
pub fn serialize_described<T: Described>(value: &T, grammar: &mut dyn Grammar) -> Result<()> {
    T::registry().serialize(value, grammar)
}

#[inline]
pub fn deserialize_described<T: Described>(value: &mut T, grammar: &mut dyn Grammar) -> Result<()> {
    T::registry().deserialize(value, grammar)
}

#[inline]
pub fn serialize_enumerated<T: Enumerated>(value: &T, grammar: &mut dyn Grammar) -> Result<()> {
    crate::registry::serialize_enum(value, grammar)
}

#[inline]
pub fn deserialize_enumerated<T: Enumerated>(value: &mut T, grammar: &mut dyn Grammar) -> Result<()> {
    crate::registry::deserialize_enum(value, grammar)
}
