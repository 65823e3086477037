//! Provide some tools for parsing token stream.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod serial_derive;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::FieldMode;
pub(crate) use serial_derive::{SerialDerive, SerialEnum, SerialStruct};
