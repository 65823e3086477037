//! See [`Serial`](derive_serial).

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static SERIAL_ATTRIBUTE_NAME: &str = "serial";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Serial Derivation
///
/// `#[derive(Serial)]` implements `Serial` plus one description trait:
///
/// - `Described` for structs with named fields. Fields are registered in
///   declaration order.
/// - `Enumerated` for enums whose variants carry no data. Such enums must
///   also implement `Clone` and `PartialEq`.
///
/// Tuple structs, unit structs, unions and enums with data are rejected.
///
/// ## Field Attributes
///
/// ### Rename
///
/// The document name defaults to the field name.
///
/// ```rust, ignore
/// #[derive(Serial, Default)]
/// struct Foo {
///     #[serial(rename = "fooBar")]
///     foo_bar: u32,
/// }
/// ```
///
/// ### Skip
///
/// A skipped field is never written, and keeps its value on read.
///
/// ```rust, ignore
/// #[derive(Serial, Default)]
/// struct Foo {
///     id: u32,
///     #[serial(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// ### Extend
///
/// Flattens every field of another described type into this one. The field
/// type must itself derive `Serial` (or implement `Described`). An optional
/// label names the extension; it defaults to the field name.
///
/// ```rust, ignore
/// #[derive(Serial, Default)]
/// struct Base { a: i32 }
///
/// #[derive(Serial, Default)]
/// struct Derived {
///     #[serial(extend)]
///     base: Base,
///     b: i32,
/// }
/// // Written as `{ "a": .., "b": .. }`.
/// ```
///
/// ## Variant Attributes
///
/// `#[serial(rename = "...")]` sets the name a variant is written as; it
/// defaults to the variant identifier.
///
/// ```rust, ignore
/// #[derive(Serial, Clone, PartialEq, Default)]
/// enum Mode {
///     #[default]
///     #[serial(rename = "fast")]
///     Fast,
///     Slow,
/// }
/// ```
#[proc_macro_derive(Serial, attributes(serial))]
pub fn derive_serial(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    impls::match_serial_impls(&ast)
}
