use std::collections::{BTreeSet, HashSet, VecDeque};

use core::hash::{BuildHasher, Hash};

use crate::{Grammar, Result, ScopeKind, Serial};

// -----------------------------------------------------------------------------
// Helpers

fn serialize_items<'a, T, I>(items: I, grammar: &mut dyn Grammar) -> Result<()>
where
    T: Serial + 'a,
    I: IntoIterator<Item = &'a T>,
{
    grammar.begin_write(ScopeKind::Array)?;
    for item in items {
        item.serialize(grammar)?;
    }
    grammar.end_write()
}

/// Opens an array scope and hands `len` freshly read items to `push`.
fn deserialize_items<T, P>(grammar: &mut dyn Grammar, mut push: P) -> Result<()>
where
    T: Serial + Default,
    P: FnMut(T),
{
    let len = grammar.begin_read(ScopeKind::Array)?;
    for _ in 0..len {
        let mut item = T::default();
        item.deserialize(grammar)?;
        push(item);
    }
    grammar.end_read()
}

// -----------------------------------------------------------------------------
// Impls

impl<T: Serial + Default> Serial for Vec<T> {
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        serialize_items(self, grammar)
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        self.clear();
        deserialize_items(grammar, |item| self.push(item))
    }
}

impl<T: Serial + Default> Serial for VecDeque<T> {
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        serialize_items(self, grammar)
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        self.clear();
        deserialize_items(grammar, |item| self.push_back(item))
    }
}

impl<T: Serial + Default + Ord> Serial for BTreeSet<T> {
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        serialize_items(self, grammar)
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        self.clear();
        deserialize_items(grammar, |item| {
            self.insert(item);
        })
    }
}

impl<T, S> Serial for HashSet<T, S>
where
    T: Serial + Default + Eq + Hash,
    S: BuildHasher + Default,
{
    fn serialize(&self, grammar: &mut dyn Grammar) -> Result<()> {
        serialize_items(self, grammar)
    }

    fn deserialize(&mut self, grammar: &mut dyn Grammar) -> Result<()> {
        self.clear();
        deserialize_items(grammar, |item| {
            self.insert(item);
        })
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use crate::dispatch::testing::{read, write};

    #[test]
    fn sequences_keep_order() {
        let v = vec![3_i32, -1, 2];
        assert_eq!(write(&v).unwrap(), "[3,-1,2]");
        assert_eq!(read::<Vec<i32>>("[3,-1,2]"), Ok(v));

        let d: VecDeque<u8> = [1, 2].into();
        assert_eq!(read::<VecDeque<u8>>(&write(&d).unwrap()), Ok(d));
    }

    #[test]
    fn sets_deduplicate() {
        let s: BTreeSet<String> = read("[\"b\",\"a\",\"b\"]").unwrap();
        assert_eq!(s.into_iter().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn nested_sequences() {
        let v = vec![vec![1_u16], vec![], vec![2, 3]];
        assert_eq!(read::<Vec<Vec<u16>>>(&write(&v).unwrap()), Ok(v));
    }

    #[test]
    fn object_is_not_a_sequence() {
        assert!(read::<Vec<i32>>("{}").unwrap_err().is_shape());
    }
}
