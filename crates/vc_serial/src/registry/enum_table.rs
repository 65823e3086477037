use core::fmt;

use tracing::debug;

use crate::hash::NameMap;
use crate::registry::REGISTRIES;
use crate::{Grammar, RegistryError, Result, SerialError, Value};

// -----------------------------------------------------------------------------
// EnumTableBuilder

/// Collects the `name <-> value` pairs of an enum.
#[derive(Debug)]
pub struct EnumTableBuilder<T> {
    type_name: &'static str,
    entries: Vec<(&'static str, T)>,
}

impl<T: PartialEq + 'static> EnumTableBuilder<T> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            type_name: core::any::type_name::<T>(),
            entries: Vec::new(),
        }
    }

    /// Registers `value` under `name`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is taken or `value` already has a name; the table must
    /// stay bijective.
    pub fn variant(&mut self, name: &'static str, value: T) -> Result<&mut Self, RegistryError> {
        for (existing, other) in &self.entries {
            if *existing == name {
                return Err(RegistryError::DuplicateEnumName {
                    type_name: self.type_name,
                    name,
                });
            }
            if *other == value {
                return Err(RegistryError::DuplicateEnumValue {
                    type_name: self.type_name,
                    name,
                    existing: *existing,
                });
            }
        }
        self.entries.push((name, value));
        Ok(self)
    }

    /// Freezes the pairs into a table.
    pub fn finish(self) -> EnumTable<T> {
        let mut index = NameMap::with_capacity_and_hasher(self.entries.len(), Default::default());
        for (i, (name, _)) in self.entries.iter().enumerate() {
            index.insert(*name, i);
        }

        EnumTable {
            type_name: self.type_name,
            entries: self.entries,
            index,
        }
    }
}

impl<T: PartialEq + 'static> Default for EnumTableBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// EnumTable

/// The bijective name table of an enum, built once per type.
pub struct EnumTable<T> {
    type_name: &'static str,
    entries: Vec<(&'static str, T)>,
    index: NameMap<usize>,
}

impl<T: Enumerated> EnumTable<T> {
    /// Runs `T::describe` on a fresh builder.
    pub fn build() -> Result<Self, RegistryError> {
        let mut builder = EnumTableBuilder::new();
        T::describe(&mut builder)?;
        let table = builder.finish();

        debug!(type_name = table.type_name, variants = table.len(), "built enum table");
        Ok(table)
    }
}

impl<T: PartialEq> EnumTable<T> {
    /// The registered name of `value`.
    pub fn name_of(&self, value: &T) -> Option<&'static str> {
        self.entries
            .iter()
            .find_map(|(name, v)| (v == value).then_some(*name))
    }

    /// The value registered under `name`.
    pub fn value_of(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Number of registered values.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full path of the enum type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl<T: fmt::Debug> fmt::Debug for EnumTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(n, v)| (n, v)))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Enumerated

/// An enum serialized as one of a fixed set of names.
///
/// Implemented by `#[derive(Serial)]` on fieldless enums.
///
/// # Examples
///
/// ```
/// use vc_serial::{EnumTableBuilder, Enumerated, RegistryError};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Level { Low, High }
///
/// impl Enumerated for Level {
///     fn describe(t: &mut EnumTableBuilder<Self>) -> Result<(), RegistryError> {
///         t.variant("low", Level::Low)?.variant("high", Level::High)?;
///         Ok(())
///     }
/// }
///
/// assert_eq!(Level::table().name_of(&Level::High), Some("high"));
/// assert_eq!(Level::table().value_of("low"), Some(&Level::Low));
/// ```
pub trait Enumerated: Clone + PartialEq + Send + Sync + 'static {
    /// Registers every `name <-> value` pair.
    fn describe(table: &mut EnumTableBuilder<Self>) -> Result<(), RegistryError>;

    /// The table of `Self`, built on first use.
    ///
    /// # Panics
    ///
    /// Panics if [`describe`](Enumerated::describe) fails.
    fn table() -> &'static EnumTable<Self> {
        REGISTRIES.get_or_build(|| match EnumTable::build() {
            Ok(table) => table,
            Err(err) => panic!("invalid enum table: {err}"),
        })
    }
}

/// Writes `value` as its registered name.
pub fn serialize_enum<T: Enumerated>(value: &T, grammar: &mut dyn Grammar) -> Result<()> {
    let table = T::table();
    let name = table.name_of(value).ok_or(RegistryError::UnnamedEnumValue {
        type_name: table.type_name,
    })?;
    grammar.write_value(Value::Str(name.to_owned()))
}

/// Reads a registered name into `dest`.
pub fn deserialize_enum<T: Enumerated>(dest: &mut T, grammar: &mut dyn Grammar) -> Result<()> {
    let table = T::table();
    match grammar.read_value()? {
        Value::Str(name) => match table.value_of(name.as_str()) {
            Some(value) => {
                *dest = value.clone();
                Ok(())
            }
            None => Err(SerialError::shape(
                grammar.path(),
                format!("`{name}` is not a name of `{}`", table.type_name),
            )),
        },
        other => Err(SerialError::shape(
            grammar.path(),
            format!("expected a name of `{}`, found {} value", table.type_name, other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::EnumTableBuilder;
    use crate::RegistryError;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Color {
        Red,
        Green,
    }

    #[test]
    fn table_is_bijective() {
        let mut t = EnumTableBuilder::new();
        t.variant("red", Color::Red).unwrap();

        let err = t.variant("red", Color::Green).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEnumName { name: "red", .. }));

        let err = t.variant("crimson", Color::Red).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateEnumValue { name: "crimson", existing: "red", .. }
        ));

        t.variant("green", Color::Green).unwrap();
        let table = t.finish();
        assert_eq!(table.names().collect::<Vec<_>>(), ["red", "green"]);
        assert_eq!(table.name_of(&Color::Green), Some("green"));
        assert_eq!(table.value_of("blue"), None);
    }
}
