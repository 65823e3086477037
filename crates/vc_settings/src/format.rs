use core::fmt;

use vc_serial::{Grammar, JsonSerializer, XmlSerializer};

use crate::Result;

/// Document formats a settings store reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// Guesses the format from the first non-whitespace character.
    ///
    /// `{` means JSON and `<` means XML; anything else is unknown.
    pub fn sniff(text: &str) -> Option<Self> {
        match text.trim_start().chars().next()? {
            '{' => Some(Self::Json),
            '<' => Some(Self::Xml),
            _ => None,
        }
    }

    /// A fresh backend for this format.
    ///
    /// XML requires a running engine, see [`vc_serial::xml::startup`].
    pub(crate) fn grammar(self) -> Result<Box<dyn Grammar>> {
        Ok(match self {
            Self::Json => Box::new(JsonSerializer::new()),
            Self::Xml => Box::new(XmlSerializer::new()?),
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Xml => f.write_str("xml"),
        }
    }
}
