//! A type-driven serialization engine.
//!
//! Types describe their members once (usually through
//! [`#[derive(Serial)]`](derive::Serial)) and can then be written to and read
//! from any backend implementing the [`Grammar`]: the bundled JSON and XML
//! backends, or a custom one.
//!
//! # Overview
//!
//! - [`Value`]: the tagged primitive transported between dispatch and backend.
//! - [`Serial`]: per-type dispatch (primitives, strings, sequences, maps,
//!   optionals, enums and structs).
//! - [`MemberRegistry`]: the built-once field table of a struct, with
//!   flattened extensions and selective (de)serialization.
//! - [`EnumTable`]: the bijective name table of a fieldless enum.
//! - [`Grammar`]: the operation set every backend implements.
//! - [`FrameStack`]: scope bookkeeping shared by the backends.
//!
//! # Examples
//!
//! ```
//! use vc_serial::derive::Serial;
//!
//! #[derive(Serial, Default, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     #[serial(rename = "tag")]
//!     label: Option<String>,
//! }
//!
//! let text = vc_serial::to_json(&Point { x: 1, y: -2, label: None }).unwrap();
//! let back: Point = vc_serial::from_json(&text).unwrap();
//! assert_eq!(back, Point { x: 1, y: -2, label: None });
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits `::vc_serial::...` paths, which must also resolve
// inside this crate's own tests.
extern crate self as vc_serial;

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod error;
mod frame;
mod grammar;
mod hash;
mod value;

pub mod backend;
pub mod dispatch;
pub mod registry;

#[cfg(all(debug_assertions, feature = "debug"))]
mod type_stack;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::{read_root, read_root_fields, write_root, write_root_fields};
pub use error::{RegistryError, Result, SerialError};
pub use frame::{Frame, FrameStack, Slot};
pub use grammar::{Grammar, ScopeKind};
pub use value::{Value, ValueKind};

pub use dispatch::Serial;
pub use registry::{Accessor, Described, EnumTable, EnumTableBuilder, Enumerated};
pub use registry::{FieldDescriptor, MemberBuilder, MemberRegistry};

#[cfg(feature = "json")]
pub use backend::json::{JsonSerializer, JsonStyle};
#[cfg(feature = "json")]
pub use codec::{from_json, from_json_fields, to_json, to_json_fields};

#[cfg(feature = "xml")]
pub use backend::xml::{self, XmlEngineError, XmlSerializer};
#[cfg(feature = "xml")]
pub use codec::{from_xml, from_xml_fields, to_xml, to_xml_fields};

#[cfg(feature = "derive")]
pub use vc_serial_derive as derive;
