use core::fmt;

use crate::{Result, Value};

// -----------------------------------------------------------------------------
// ScopeKind

/// The two kinds of scope a backend tree is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Named members.
    Struct,
    /// Ordered, unnamed members.
    Array,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.write_str("struct"),
            Self::Array => f.write_str("array"),
        }
    }
}

// -----------------------------------------------------------------------------
// Grammar

/// The operation set every backend implements.
///
/// Dispatch code only ever talks to a backend through this trait, which keeps
/// the [`Serial`](crate::Serial) implementations format-agnostic.
///
/// # Call order
///
/// - Inside a [`ScopeKind::Struct`] scope, [`name`](Grammar::name) must stage
///   the member name before each scope-open or primitive transfer.
/// - Inside a [`ScopeKind::Array`] scope, members are positional and a staged
///   name is ignored.
/// - The first [`begin_write`](Grammar::begin_write) with no enclosing scope
///   creates the document root.
///
/// An instance holds the state of one write pass or one read pass; it is not
/// meant to be shared between threads.
pub trait Grammar {
    /// Stages the member name for the next scope-open or primitive transfer.
    fn name(&mut self, name: &str);

    /// Opens a scope for writing.
    fn begin_write(&mut self, kind: ScopeKind) -> Result<()>;

    /// Closes the innermost write scope.
    fn end_write(&mut self) -> Result<()>;

    /// Writes one primitive at the staged name or next array position.
    fn write_value(&mut self, value: Value) -> Result<()>;

    /// Opens a scope for reading and returns its member count.
    ///
    /// Raises a shape error if the node is not of `kind` and a null-node
    /// signal if it is absent or null.
    fn begin_read(&mut self, kind: ScopeKind) -> Result<usize>;

    /// Closes the innermost read scope.
    fn end_read(&mut self) -> Result<()>;

    /// Reads one primitive at the staged name or next array position.
    fn read_value(&mut self) -> Result<Value>;

    /// Member names of the innermost struct scope, in document order.
    fn node_keys(&self) -> Result<Vec<String>>;

    /// Current scope nesting depth.
    fn depth(&self) -> usize;

    /// Closes read scopes until [`depth`](Grammar::depth) equals `depth` and
    /// drops any staged name.
    fn unwind(&mut self, depth: usize);

    /// Diagnostic path of the node addressed last.
    fn path(&self) -> String;

    /// Renders the whole document as text.
    fn dump(&self) -> Result<String>;

    /// Replaces the document with parsed `text` and resets all scope state.
    fn set_raw_input(&mut self, text: &str) -> Result<()>;
}
