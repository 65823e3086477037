//! Built-once type descriptions.
//!
//! - [`MemberRegistry`]: the field table of a struct, with flattened
//!   extensions.
//! - [`EnumTable`]: the name table of a fieldless enum.
//!
//! Both are built lazily on first use through [`Described::registry`] and
//! [`Enumerated::table`], and then stay read-only for the process lifetime.

mod accessor;
mod cell;
mod enum_table;
mod member;

pub(crate) use cell::REGISTRIES;

pub use accessor::Accessor;
pub use enum_table::{EnumTable, EnumTableBuilder, Enumerated, deserialize_enum, serialize_enum};
pub use member::{Described, ExtensionDescriptor, FieldDescriptor, MemberBuilder, MemberRegistry};
