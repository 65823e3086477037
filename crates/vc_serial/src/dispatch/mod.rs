//! Per-type dispatch.
//!
//! [`Serial`] is implemented for:
//!
//! - `bool`, `i8`-`i64`, `isize`, `u8`-`u64`, `usize`, `f32`, `f64`
//! - `String`
//! - `Vec<T>`, `VecDeque<T>`, `BTreeSet<T>`, `HashSet<T, S>`
//! - `BTreeMap<K, V>`, `HashMap<K, V, S>`
//! - `Option<T>`, `Box<T>`
//!
//! Structs and fieldless enums get it from `#[derive(Serial)]`, which routes
//! through [`Described`](crate::Described) and
//! [`Enumerated`](crate::Enumerated).

mod map;
mod num;
mod option;
mod seq;
mod string;

pub use map::{MAP_KEY, MAP_VALUE};

use crate::{Grammar, Result};

// -----------------------------------------------------------------------------
// Serial

/// A type that can be written to and read from any [`Grammar`].
///
/// Deserialization works in place: the destination is overwritten with what
/// the document holds. After an error the destination holds an unspecified
/// mix of old and new values.
///
/// Inside a struct scope the caller stages the member name with
/// [`Grammar::name`] before calling either method.
pub trait Serial {
    /// Writes `self` at the current position.
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()>;

    /// Reads the node at the current position into `self`.
    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()>;

    /// `true` if maps keyed by this type are written as struct scopes with
    /// one named member per entry instead of key/value pairs.
    #[doc(hidden)]
    const MEMBER_NAME_KEY: bool = false;

    /// The member name this value is written under as a map key.
    #[doc(hidden)]
    #[inline]
    fn to_member_name(&self) -> Option<&str> {
        None
    }

    /// Inverse of [`to_member_name`](Serial::to_member_name).
    #[doc(hidden)]
    #[inline]
    fn from_member_name(_name: &str) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

impl<T: Serial + ?Sized> Serial for Box<T> {
    #[inline]
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        (**self).serialize(grammar)
    }

    #[inline]
    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        (**self).deserialize(grammar)
    }
}
