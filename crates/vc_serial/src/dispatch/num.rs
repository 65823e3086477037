use crate::{Grammar, Result, Serial, SerialError, Value};

// -----------------------------------------------------------------------------
// Helpers

fn read_integer(grammar: &mut dyn Grammar, type_name: &str) -> Result<i128> {
    match grammar.read_value()? {
        Value::Int(v) => Ok(v as i128),
        Value::UInt(v) => Ok(v as i128),
        other => Err(SerialError::shape(
            grammar.path(),
            format!("expected an integer for {type_name}, found {} value", other.kind()),
        )),
    }
}

fn out_of_range(grammar: &dyn Grammar, value: i128, min: i128, max: i128, type_name: &str) -> SerialError {
    let reason = if value < 0 && min == 0 {
        format!("value {value} is negative for unsigned {type_name}")
    } else if value > max {
        format!("value {value} exceeds maximum {max} of {type_name}")
    } else {
        format!("value {value} is below minimum {min} of {type_name}")
    };
    SerialError::shape(grammar.path(), reason)
}

fn read_float(grammar: &mut dyn Grammar, type_name: &str) -> Result<f64> {
    match grammar.read_value()? {
        Value::Float(v) => Ok(v),
        Value::Int(v) => Ok(v as f64),
        Value::UInt(v) => Ok(v as f64),
        other => Err(SerialError::shape(
            grammar.path(),
            format!("expected a number for {type_name}, found {} value", other.kind()),
        )),
    }
}

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_integer {
    ($variant:ident as $wide:ty => $($ty:ty),+ $(,)?) => {$(
        impl Serial for $ty {
            #[inline]
            fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
                grammar.write_value(Value::$variant(*self as $wide))
            }

            fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
                let name = ::core::stringify!($ty);
                let wide = read_integer(grammar, name)?;
                *self = <$ty>::try_from(wide).map_err(|_| {
                    out_of_range(grammar, wide, <$ty>::MIN as i128, <$ty>::MAX as i128, name)
                })?;
                Ok(())
            }
        }
    )+};
}

impl_integer!(Int as i64 => i8, i16, i32, i64, isize);
impl_integer!(UInt as u64 => u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Floats

impl Serial for f64 {
    #[inline]
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        grammar.write_value(Value::Float(*self))
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        *self = read_float(grammar, "f64")?;
        Ok(())
    }
}

impl Serial for f32 {
    #[inline]
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        grammar.write_value(Value::Float(*self as f64))
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        let wide = read_float(grammar, "f32")?;
        if wide.is_finite() && wide.abs() > f32::MAX as f64 {
            return Err(SerialError::shape(
                grammar.path(),
                format!("value {wide} exceeds the range of f32"),
            ));
        }
        *self = wide as f32;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Bool

impl Serial for bool {
    #[inline]
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        grammar.write_value(Value::Bool(*self))
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        match grammar.read_value()? {
            Value::Bool(v) => {
                *self = v;
                Ok(())
            }
            other => Err(SerialError::shape(
                grammar.path(),
                format!("expected a bool, found {} value", other.kind()),
            )),
        }
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use rstest::rstest;

    use crate::dispatch::testing::{read, write};

    #[rstest]
    #[case("4096", "exceeds maximum 127 of i8")]
    #[case("-4096", "below minimum -128 of i8")]
    fn i8_range_is_enforced(#[case] text: &str, #[case] message: &str) {
        let err = read::<i8>(text).unwrap_err();
        assert!(err.is_shape());
        assert!(err.to_string().contains(message), "{err}");
    }

    #[rstest]
    #[case::u8("4096")]
    #[case::negative("-1")]
    fn u8_range_is_enforced(#[case] text: &str) {
        assert!(read::<u8>(text).unwrap_err().is_shape());
    }

    #[test]
    fn negative_into_unsigned_names_the_sign() {
        let err = read::<u64>("-1").unwrap_err();
        assert!(err.to_string().contains("negative for unsigned u64"));
    }

    #[test]
    fn integer_extremes_survive() {
        assert_eq!(read::<i64>(&write(&i64::MIN).unwrap()), Ok(i64::MIN));
        assert_eq!(read::<u64>(&write(&u64::MAX).unwrap()), Ok(u64::MAX));
        assert_eq!(read::<usize>("7"), Ok(7));
    }

    #[test]
    fn integers_reject_floats_and_strings() {
        assert!(read::<i32>("1.5").unwrap_err().is_shape());
        assert!(read::<i32>("\"1\"").unwrap_err().is_shape());
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(read::<f64>("3"), Ok(3.0));
        assert_eq!(read::<f64>("-3"), Ok(-3.0));
        assert!(read::<f32>("1e300").unwrap_err().is_shape());
        assert_eq!(read::<f32>(&write(&0.1_f32).unwrap()), Ok(0.1_f32));
    }

    #[test]
    fn bool_is_strict() {
        assert_eq!(read::<bool>("true"), Ok(true));
        assert!(read::<bool>("1").unwrap_err().is_shape());
    }
}
