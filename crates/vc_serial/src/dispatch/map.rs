use std::collections::{BTreeMap, HashMap};

use core::hash::{BuildHasher, Hash};

use crate::{Grammar, Result, ScopeKind, Serial, SerialError};

/// Member name of the key inside a map entry written as a pair.
pub const MAP_KEY: &str = "__mapKey__";
/// Member name of the value inside a map entry written as a pair.
pub const MAP_VALUE: &str = "__mapValue__";

// -----------------------------------------------------------------------------
// Helpers

fn serialize_entries<'a, K, V, I>(entries: I, grammar: &mut dyn Grammar) -> Result<()>
where
    K: Serial + 'a,
    V: Serial + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    if K::MEMBER_NAME_KEY {
        grammar.begin_write(ScopeKind::Struct)?;
        for (key, value) in entries {
            let Some(name) = key.to_member_name() else {
                return Err(SerialError::grammar(grammar.path(), "map key has no member name"));
            };
            grammar.name(name);
            value.serialize(grammar)?;
        }
        grammar.end_write()
    } else {
        grammar.begin_write(ScopeKind::Array)?;
        for (key, value) in entries {
            grammar.begin_write(ScopeKind::Struct)?;
            grammar.name(MAP_KEY);
            key.serialize(grammar)?;
            grammar.name(MAP_VALUE);
            value.serialize(grammar)?;
            grammar.end_write()?;
        }
        grammar.end_write()
    }
}

fn deserialize_entries<K, V, P>(grammar: &mut dyn Grammar, mut insert: P) -> Result<()>
where
    K: Serial + Default,
    V: Serial + Default,
    P: FnMut(K, V),
{
    if K::MEMBER_NAME_KEY {
        grammar.begin_read(ScopeKind::Struct)?;
        for name in grammar.node_keys()? {
            let Some(key) = K::from_member_name(&name) else {
                return Err(SerialError::shape(
                    grammar.path(),
                    format!("`{name}` is not a valid map key"),
                ));
            };
            let mut value = V::default();
            grammar.name(&name);
            value.deserialize(grammar).map_err(|err| match err {
                SerialError::NullNode { path } => {
                    SerialError::shape(path, format!("map entry `{name}` is null"))
                }
                other => other,
            })?;
            insert(key, value);
        }
        grammar.end_read()
    } else {
        let len = grammar.begin_read(ScopeKind::Array)?;
        for _ in 0..len {
            grammar.begin_read(ScopeKind::Struct)?;
            let mut key = K::default();
            let mut value = V::default();
            grammar.name(MAP_KEY);
            key.deserialize(grammar)?;
            grammar.name(MAP_VALUE);
            value.deserialize(grammar)?;
            grammar.end_read()?;
            insert(key, value);
        }
        grammar.end_read()
    }
}

// -----------------------------------------------------------------------------
// Impls

/// Maps whose keys are member names (strings, enums) are written as one
/// object keyed by those names; other maps are written as an array of
/// key/value pairs.
///
/// With the XML backend every key becomes an element name, so a key such as
/// `"1"`, `"a b"` or `""` fails to write with a shape error. The JSON backend
/// accepts any string key.
impl<K, V> Serial for BTreeMap<K, V>
where
    K: Serial + Default + Ord,
    V: Serial + Default,
{
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        serialize_entries(self, grammar)
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        self.clear();
        deserialize_entries(grammar, |k, v| {
            self.insert(k, v);
        })
    }
}

impl<K, V, S> Serial for HashMap<K, V, S>
where
    K: Serial + Default + Eq + Hash,
    V: Serial + Default,
    S: BuildHasher + Default,
{
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        serialize_entries(self, grammar)
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        self.clear();
        deserialize_entries(grammar, |k, v| {
            self.insert(k, v);
        })
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use crate::dispatch::testing::{read, write};

    #[test]
    fn string_keys_become_members() {
        let mut m = BTreeMap::new();
        m.insert("b".to_owned(), 2_i32);
        m.insert("a".to_owned(), 1);
        assert_eq!(write(&m).unwrap(), r#"{"a":1,"b":2}"#);
        assert_eq!(read::<BTreeMap<String, i32>>(r#"{"b":2,"a":1}"#), Ok(m));
    }

    #[test]
    fn other_keys_become_pairs() {
        let mut m = BTreeMap::new();
        m.insert(7_u32, "x".to_owned());
        assert_eq!(write(&m).unwrap(), r#"[{"__mapKey__":7,"__mapValue__":"x"}]"#);
        assert_eq!(read::<BTreeMap<u32, String>>(&write(&m).unwrap()), Ok(m));
    }

    #[test]
    fn hash_map_round_trip() {
        let mut m = HashMap::new();
        m.insert(-1_i64, vec![true]);
        m.insert(2, vec![]);
        assert_eq!(read::<HashMap<i64, Vec<bool>>>(&write(&m).unwrap()), Ok(m));
    }

    #[test]
    fn null_string_keyed_entry_is_a_shape_error() {
        let err = read::<BTreeMap<String, i32>>(r#"{"a":null}"#).unwrap_err();
        assert!(err.is_shape());
        assert!(err.to_string().contains("map entry `a`"));
    }

    #[test]
    fn pair_without_key_is_rejected() {
        let err = read::<BTreeMap<u8, u8>>(r#"[{"__mapValue__":1}]"#).unwrap_err();
        assert!(err.is_null_node());
    }
}
