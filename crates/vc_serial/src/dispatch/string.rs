use crate::{Grammar, Result, Serial, SerialError, Value};

impl Serial for String {
    #[inline]
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        grammar.write_value(Value::Str(self.clone()))
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        match grammar.read_value()? {
            Value::Str(v) => {
                *self = v;
                Ok(())
            }
            other => Err(SerialError::shape(
                grammar.path(),
                format!("expected a string, found {} value", other.kind()),
            )),
        }
    }

    const MEMBER_NAME_KEY: bool = true;

    #[inline]
    fn to_member_name(&self) -> Option<&str> {
        Some(self)
    }

    #[inline]
    fn from_member_name(name: &str) -> Option<Self> {
        Some(name.to_owned())
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use crate::dispatch::testing::{read, write};

    #[test]
    fn strings_escape_and_return() {
        let s = String::from("a \"quoted\" line\nwith ünïcode");
        assert_eq!(read::<String>(&write(&s).unwrap()), Ok(s));
    }

    #[test]
    fn numbers_are_not_strings() {
        assert!(read::<String>("12").unwrap_err().is_shape());
    }
}
