//! Whole-document entry points.
//!
//! [`write_root`] and [`read_root`] work with any [`Grammar`]; the
//! `to_*`/`from_*` helpers pick a bundled backend.

use crate::{Described, Grammar, Result, Serial};

#[cfg(feature = "json")]
use crate::JsonSerializer;
#[cfg(feature = "xml")]
use crate::XmlSerializer;

// -----------------------------------------------------------------------------
// Generic

/// Writes `value` as the document root and returns the dumped text.
pub fn write_root<T: Serial + ?Sized>(value: &T, grammar: &mut dyn Grammar) -> Result<String> {
    value.serialize(grammar)?;
    grammar.dump()
}

/// Loads `text` and reads the document root into `dest`.
pub fn read_root<T: Serial + ?Sized>(dest: &mut T, grammar: &mut dyn Grammar, text: &str) -> Result<()> {
    grammar.set_raw_input(text)?;
    dest.deserialize(grammar)
}

/// Writes only the named fields of `value` as the document root.
pub fn write_root_fields<T: Described>(value: &T, grammar: &mut dyn Grammar, fields: &[&str]) -> Result<String> {
    T::registry().serialize_fields(value, grammar, fields)?;
    grammar.dump()
}

/// Loads `text` and reads only the named fields into `dest`.
pub fn read_root_fields<T: Described>(
    dest: &mut T,
    grammar: &mut dyn Grammar,
    text: &str,
    fields: &[&str],
) -> Result<()> {
    grammar.set_raw_input(text)?;
    T::registry().deserialize_fields(dest, grammar, fields)
}

// -----------------------------------------------------------------------------
// JSON

/// Writes `value` as pretty JSON.
#[cfg(feature = "json")]
pub fn to_json<T: Serial + ?Sized>(value: &T) -> Result<String> {
    write_root(value, &mut JsonSerializer::new())
}

/// Reads a `T` from JSON, starting from `T::default()`.
#[cfg(feature = "json")]
pub fn from_json<T: Serial + Default>(text: &str) -> Result<T> {
    let mut value = T::default();
    read_root(&mut value, &mut JsonSerializer::new(), text)?;
    Ok(value)
}

/// Writes the named fields of `value` as pretty JSON.
#[cfg(feature = "json")]
pub fn to_json_fields<T: Described>(value: &T, fields: &[&str]) -> Result<String> {
    write_root_fields(value, &mut JsonSerializer::new(), fields)
}

/// Reads the named fields from JSON; every other field keeps its default.
#[cfg(feature = "json")]
pub fn from_json_fields<T: Described + Default>(text: &str, fields: &[&str]) -> Result<T> {
    let mut value = T::default();
    read_root_fields(&mut value, &mut JsonSerializer::new(), text, fields)?;
    Ok(value)
}

// -----------------------------------------------------------------------------
// XML

/// Writes `value` as indented XML under a `root` element.
///
/// The XML engine must be running, see [`xml::startup`](crate::xml::startup).
#[cfg(feature = "xml")]
pub fn to_xml<T: Serial + ?Sized>(value: &T) -> Result<String> {
    write_root(value, &mut XmlSerializer::new()?)
}

/// Reads a `T` from XML, starting from `T::default()`.
#[cfg(feature = "xml")]
pub fn from_xml<T: Serial + Default>(text: &str) -> Result<T> {
    let mut value = T::default();
    read_root(&mut value, &mut XmlSerializer::new()?, text)?;
    Ok(value)
}

/// Writes the named fields of `value` as XML.
#[cfg(feature = "xml")]
pub fn to_xml_fields<T: Described>(value: &T, fields: &[&str]) -> Result<String> {
    write_root_fields(value, &mut XmlSerializer::new()?, fields)
}

/// Reads the named fields from XML; every other field keeps its default.
#[cfg(feature = "xml")]
pub fn from_xml_fields<T: Described + Default>(text: &str, fields: &[&str]) -> Result<T> {
    let mut value = T::default();
    read_root_fields(&mut value, &mut XmlSerializer::new()?, text, fields)?;
    Ok(value)
}
