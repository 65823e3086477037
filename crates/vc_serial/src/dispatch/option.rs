use tracing::debug;

use crate::{Grammar, Result, Serial, SerialError};

/// Outcome of probing an optional node.
enum Presence<T> {
    Present(T),
    /// The node is missing or null.
    Absent,
    /// The node exists but does not have the expected shape.
    Malformed(SerialError),
}

impl<T: Serial + Default> Presence<T> {
    fn probe(grammar: &mut dyn Grammar) -> Result<Self> {
        let depth = grammar.depth();
        let mut value = T::default();

        match value.deserialize(grammar) {
            Ok(()) => Ok(Self::Present(value)),
            Err(err) => {
                grammar.unwind(depth);
                match err {
                    SerialError::NullNode { .. } => Ok(Self::Absent),
                    err @ SerialError::Shape { .. } => Ok(Self::Malformed(err)),
                    other => Err(other),
                }
            }
        }
    }
}

impl<T: Serial + Default> Serial for Option<T> {
    /// Writes nothing when `None`.
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        match self {
            Some(value) => value.serialize(grammar),
            None => Ok(()),
        }
    }

    /// Reads `None` when the node is absent, null or malformed.
    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        *self = match Presence::<T>::probe(grammar)? {
            Presence::Present(value) => Some(value),
            Presence::Absent => None,
            Presence::Malformed(err) => {
                debug!(error = %err, "malformed optional read as absent");
                None
            }
        };
        Ok(())
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use std::collections::BTreeMap;

    use crate::dispatch::testing::{read, write};

    #[test]
    fn none_writes_nothing_inside_a_map() {
        let mut m = BTreeMap::new();
        m.insert("a".to_owned(), Some(1_u8));
        m.insert("b".to_owned(), None);
        assert_eq!(write(&m).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn null_and_malformed_read_as_none() {
        let m: BTreeMap<String, Option<u8>> = read(r#"{"a":null,"b":"x","c":300,"d":4}"#).unwrap();
        assert_eq!(m["a"], None);
        assert_eq!(m["b"], None);
        assert_eq!(m["c"], None);
        assert_eq!(m["d"], Some(4));
    }

    #[test]
    fn malformed_nested_scope_unwinds() {
        let v: Vec<Option<Vec<u8>>> = read("[[1,\"x\"],[2]]").unwrap();
        assert_eq!(v, [None, Some(vec![2])]);
    }
}
