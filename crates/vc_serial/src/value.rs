use core::fmt;

// -----------------------------------------------------------------------------
// ValueKind

/// Runtime type identity of a [`Value`].
///
/// The lowercase names double as the XML `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    UInt,
    Float,
    Str,
}

impl ValueKind {
    /// The tag written to the XML `type` attribute.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Str => "string",
        }
    }

    /// Inverse of [`ValueKind::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "uint" => Some(Self::UInt),
            "float" => Some(Self::Float),
            "string" => Some(Self::Str),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// -----------------------------------------------------------------------------
// Value

/// A type-erased primitive carrying its own [`ValueKind`].
///
/// Every primitive is widened to one of these five before it reaches a
/// backend, and narrowed again (with range checks) on the way back.
///
/// # Examples
///
/// ```
/// use vc_serial::{Value, ValueKind};
///
/// let v = Value::from_text(ValueKind::Int, "-42").unwrap();
/// assert_eq!(v, Value::Int(-42));
/// assert_eq!(v.to_text(), "-42");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Returns the runtime kind.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::UInt(_) => ValueKind::UInt,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
        }
    }

    /// Base-10 text for integers, shortest round-trip text for floats and
    /// `true`/`false` for booleans.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Str(v) => v.clone(),
        }
    }

    /// Parses `text` as a value of `kind`.
    ///
    /// Numeric and boolean text is trimmed first; string text is kept as is.
    pub fn from_text(kind: ValueKind, text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        let parsed = match kind {
            ValueKind::Bool => match trimmed {
                "true" => Some(Self::Bool(true)),
                "false" => Some(Self::Bool(false)),
                _ => None,
            },
            ValueKind::Int => trimmed.parse().ok().map(Self::Int),
            ValueKind::UInt => trimmed.parse().ok().map(Self::UInt),
            ValueKind::Float => trimmed.parse().ok().map(Self::Float),
            ValueKind::Str => Some(Self::Str(text.to_owned())),
        };

        parsed.ok_or_else(|| format!("`{text}` is not a valid {kind} value"))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(v) => write!(f, "{v:?}"),
            other => f.write_str(&other.to_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Value, ValueKind};

    #[test]
    fn tags_round_trip() {
        for kind in [
            ValueKind::Bool,
            ValueKind::Int,
            ValueKind::UInt,
            ValueKind::Float,
            ValueKind::Str,
        ] {
            assert_eq!(ValueKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ValueKind::from_tag("double"), None);
    }

    #[test]
    fn text_parsing() {
        assert_eq!(Value::from_text(ValueKind::Bool, " true "), Ok(Value::Bool(true)));
        assert_eq!(
            Value::from_text(ValueKind::UInt, "18446744073709551615"),
            Ok(Value::UInt(u64::MAX))
        );
        assert_eq!(Value::from_text(ValueKind::Str, " x "), Ok(Value::Str(" x ".into())));
        assert!(Value::from_text(ValueKind::UInt, "-1").is_err());
        assert!(Value::from_text(ValueKind::Bool, "1").is_err());
        assert!(Value::from_text(ValueKind::Int, "").is_err());
    }

    #[test]
    fn float_text_parses_back_to_same_double() {
        let v = 0.1_f64 + 0.2_f64;
        let text = Value::Float(v).to_text();
        assert_eq!(Value::from_text(ValueKind::Float, &text), Ok(Value::Float(v)));
    }
}
