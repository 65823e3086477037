use std::path::PathBuf;

use thiserror::Error;
use vc_serial::SerialError;

/// Errors raised by a [`Settings`](crate::Settings) store.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The text is neither a JSON object nor an XML document.
    #[error("cannot tell the settings format from the first character")]
    UnknownFormat,
    /// A slot with the same name is already registered.
    #[error("settings slot `{0}` is already registered")]
    DuplicateSlot(String),
    /// Writing or reading the document failed.
    #[error(transparent)]
    Serial(#[from] SerialError),
    /// The settings file could not be read or written.
    #[error("settings file `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias of this crate.
pub type Result<T, E = SettingsError> = core::result::Result<T, E>;
