//! Concrete [`Grammar`](crate::Grammar) implementations.
//!
//! - [`json`]: `serde_json` document tree.
//! - [`xml`]: owned element tree parsed and written with `quick-xml`.
//!
//! Both keep their scope state in a [`FrameStack`](crate::FrameStack) whose
//! frames own the node they address.

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "xml")]
pub mod xml;
