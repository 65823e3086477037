use core::fmt::Display;

use thiserror::Error;

/// Shorthand result used across the engine.
pub type Result<T, E = SerialError> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// RegistryError

/// Misuse of a [`MemberRegistry`] or [`EnumTable`] description.
///
/// These are logic errors in the code describing a type. They are meant to be
/// caught during development, not recovered from at runtime.
///
/// [`MemberRegistry`]: crate::MemberRegistry
/// [`EnumTable`]: crate::EnumTable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two descriptors of one type share an external name.
    #[error("duplicate field `{field}` in `{type_name}`")]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },
    /// Two descriptors of one type address the same storage location.
    #[error("field `{field}` of `{type_name}` reuses accessor `{accessor}`")]
    DuplicateAccessor {
        type_name: &'static str,
        field: &'static str,
        accessor: String,
    },
    /// Two variants of one enum share a name.
    #[error("duplicate enum name `{name}` in `{type_name}`")]
    DuplicateEnumName {
        type_name: &'static str,
        name: &'static str,
    },
    /// One enum value was registered under two names.
    #[error("enum value named `{name}` in `{type_name}` is already registered as `{existing}`")]
    DuplicateEnumValue {
        type_name: &'static str,
        name: &'static str,
        existing: &'static str,
    },
    /// A selective call named a field the registry does not know.
    #[error("field `{field}` is not registered in `{type_name}`")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },
    /// An enum value has no registered name.
    #[error("a value of `{type_name}` has no registered name")]
    UnnamedEnumValue { type_name: &'static str },
}

// -----------------------------------------------------------------------------
// SerialError

/// Every failure raised while writing or reading a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerialError {
    /// The document does not have the shape the type expects.
    #[error("shape error at `{path}`: {reason}")]
    Shape { path: String, reason: String },
    /// The addressed node is absent or explicitly null.
    #[error("node `{path}` is missing or null")]
    NullNode { path: String },
    /// Grammar operations were issued out of order.
    #[error("grammar misuse at `{path}`: {reason}")]
    Grammar { path: String, reason: String },
    /// The type description itself is wrong.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The XML engine lifecycle was violated.
    #[cfg(feature = "xml")]
    #[error(transparent)]
    XmlEngine(#[from] crate::backend::xml::XmlEngineError),
}

impl SerialError {
    /// Creates a [`SerialError::Shape`].
    ///
    /// In debug builds with the `debug` feature, the reason is suffixed with
    /// the stack of struct types currently being processed.
    pub fn shape(path: impl Into<String>, reason: impl Display) -> Self {
        #[cfg(all(debug_assertions, feature = "debug"))]
        let reason = crate::type_stack::annotate(reason);
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        let reason = reason.to_string();

        Self::Shape {
            path: path.into(),
            reason,
        }
    }

    /// Creates a [`SerialError::NullNode`].
    #[inline]
    pub fn null_node(path: impl Into<String>) -> Self {
        Self::NullNode { path: path.into() }
    }

    /// Creates a [`SerialError::Grammar`].
    #[inline]
    pub fn grammar(path: impl Into<String>, reason: impl Display) -> Self {
        Self::Grammar {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for [`SerialError::Shape`].
    #[inline]
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }

    /// Returns `true` for [`SerialError::NullNode`].
    #[inline]
    pub fn is_null_node(&self) -> bool {
        matches!(self, Self::NullNode { .. })
    }

    /// The diagnostic path carried by the error, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Shape { path, .. } | Self::NullNode { path } | Self::Grammar { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}
