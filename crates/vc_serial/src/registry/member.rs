use core::fmt;

use tracing::debug;

use crate::hash::NameMap;
use crate::registry::{Accessor, REGISTRIES};
use crate::{Grammar, RegistryError, Result, ScopeKind, Serial, SerialError};

type WriteFn<T> = Box<dyn Fn(&T, &mut dyn Grammar) -> Result<()> + Send + Sync>;
type ReadFn<T> = Box<dyn Fn(&mut T, &mut dyn Grammar) -> Result<()> + Send + Sync>;

// -----------------------------------------------------------------------------
// FieldDescriptor

/// One registered field of `T`: its external name, its storage key and the
/// type-erased transfer functions.
///
/// The transfer functions do not stage the name; the registry does that
/// before calling them.
pub struct FieldDescriptor<T> {
    name: &'static str,
    accessor_key: String,
    write: WriteFn<T>,
    read: ReadFn<T>,
}

impl<T: 'static> FieldDescriptor<T> {
    fn direct<F: Serial + 'static>(name: &'static str, accessor: Accessor<T, F>) -> Self {
        let accessor_key = accessor.key().to_owned();
        let (get, get_mut) = accessor.into_parts();
        Self {
            name,
            accessor_key,
            write: Box::new(move |owner: &T, grammar: &mut dyn Grammar| get(owner).serialize(grammar)),
            read: Box::new(move |owner: &mut T, grammar: &mut dyn Grammar| {
                get_mut(owner).deserialize(grammar)
            }),
        }
    }

    fn flattened<B: Described>(
        base: &'static FieldDescriptor<B>,
        accessor: Accessor<T, B>,
    ) -> Self {
        let accessor_key = format!("{}.{}", accessor.key(), base.accessor_key);
        let (get, get_mut) = accessor.into_parts();
        Self {
            name: base.name,
            accessor_key,
            write: Box::new(move |owner: &T, grammar: &mut dyn Grammar| (base.write)(get(owner), grammar)),
            read: Box::new(move |owner: &mut T, grammar: &mut dyn Grammar| {
                (base.read)(get_mut(owner), grammar)
            }),
        }
    }
}

impl<T> FieldDescriptor<T> {
    /// The external (document) name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The storage key, e.g. `"a"` or `"base.a"` for a flattened field.
    #[inline]
    pub fn accessor_key(&self) -> &str {
        &self.accessor_key
    }

    /// Writes this field of `owner` at the name staged on `grammar`.
    #[inline]
    pub fn write_to(&self, owner: &T, grammar: &mut dyn Grammar) -> Result<()> {
        (self.write)(owner, grammar)
    }

    /// Reads this field of `owner` from the name staged on `grammar`.
    #[inline]
    pub fn read_from(&self, owner: &mut T, grammar: &mut dyn Grammar) -> Result<()> {
        (self.read)(owner, grammar)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("accessor_key", &self.accessor_key)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ExtensionDescriptor

/// Records that a type flattens in every field of another described type.
#[derive(Debug, Clone)]
pub struct ExtensionDescriptor {
    label: &'static str,
    type_name: &'static str,
    fields: Vec<&'static str>,
}

impl ExtensionDescriptor {
    /// The label given to [`MemberBuilder::extend`].
    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Full path of the extended type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Names contributed to the extending type, in the base's order.
    #[inline]
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }
}

// -----------------------------------------------------------------------------
// MemberBuilder

/// Collects the field and extension descriptors of `T`.
///
/// Passed to [`Described::describe`]. Every call validates immediately, so a
/// bad description fails at the line that introduced the problem.
pub struct MemberBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    extensions: Vec<ExtensionDescriptor>,
}

impl<T> fmt::Debug for MemberBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberBuilder")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("extensions", &self.extensions)
            .finish()
    }
}

impl<T: 'static> MemberBuilder<T> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            type_name: core::any::type_name::<T>(),
            fields: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Registers one field under `name`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateField`] if `name` is taken.
    /// - [`RegistryError::DuplicateAccessor`] if another field already
    ///   addresses the same storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_serial::{MemberBuilder, RegistryError, accessor};
    ///
    /// struct Foo { a: u8 }
    ///
    /// let mut b = MemberBuilder::<Foo>::new();
    /// b.define("a", accessor!(Foo, a)).unwrap();
    /// let err = b.define("a", accessor!(Foo, a)).unwrap_err();
    /// assert!(matches!(err, RegistryError::DuplicateField { field: "a", .. }));
    /// ```
    pub fn define<F: Serial + 'static>(
        &mut self,
        name: &'static str,
        accessor: Accessor<T, F>,
    ) -> Result<&mut Self, RegistryError> {
        self.push(FieldDescriptor::direct(name, accessor))?;
        Ok(self)
    }

    /// Flattens every field of `B` into this scope, in `B`'s order.
    ///
    /// `B`'s registry is built first if needed. On error nothing from `B` is
    /// added.
    pub fn extend<B: Described>(
        &mut self,
        label: &'static str,
        accessor: Accessor<T, B>,
    ) -> Result<&mut Self, RegistryError> {
        let base = B::registry();
        let mut pending = Vec::with_capacity(base.len());

        for field in base.fields() {
            let field = FieldDescriptor::flattened(field, accessor);
            self.check(&field, &pending)?;
            pending.push(field);
        }

        self.extensions.push(ExtensionDescriptor {
            label,
            type_name: base.type_name(),
            fields: pending.iter().map(|field| field.name).collect(),
        });
        self.fields.append(&mut pending);
        Ok(self)
    }

    fn push(&mut self, field: FieldDescriptor<T>) -> Result<(), RegistryError> {
        self.check(&field, &[])?;
        self.fields.push(field);
        Ok(())
    }

    /// Rejects `field` if its name or accessor collides with an accepted
    /// field or one of `pending`.
    fn check(
        &self,
        field: &FieldDescriptor<T>,
        pending: &[FieldDescriptor<T>],
    ) -> Result<(), RegistryError> {
        for existing in self.fields.iter().chain(pending) {
            if existing.name == field.name {
                return Err(RegistryError::DuplicateField {
                    type_name: self.type_name,
                    field: field.name,
                });
            }
            if keys_overlap(&existing.accessor_key, &field.accessor_key) {
                return Err(RegistryError::DuplicateAccessor {
                    type_name: self.type_name,
                    field: field.name,
                    accessor: field.accessor_key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Freezes the descriptors into a registry.
    pub fn finish(self) -> MemberRegistry<T> {
        let mut index = NameMap::with_capacity_and_hasher(self.fields.len(), Default::default());
        for (i, field) in self.fields.iter().enumerate() {
            index.insert(field.name, i);
        }

        MemberRegistry {
            type_name: self.type_name,
            fields: self.fields,
            extensions: self.extensions,
            index,
        }
    }
}

impl<T: 'static> Default for MemberBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// `a` and `a.b` address overlapping storage, `a` and `ab` do not.
fn keys_overlap(a: &str, b: &str) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    match long.strip_prefix(short) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

// -----------------------------------------------------------------------------
// MemberRegistry

/// The built-once field table of a struct type.
///
/// Obtained through [`Described::registry`]. Fields are kept in registration
/// order, which is also the document order on write.
pub struct MemberRegistry<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    extensions: Vec<ExtensionDescriptor>,
    index: NameMap<usize>,
}

impl<T: Described> MemberRegistry<T> {
    /// Runs `T::describe` on a fresh builder.
    pub fn build() -> Result<Self, RegistryError> {
        let mut builder = MemberBuilder::new();
        T::describe(&mut builder)?;
        let registry = builder.finish();

        debug!(
            type_name = registry.type_name,
            fields = registry.fields.len(),
            extensions = registry.extensions.len(),
            "built member registry"
        );
        Ok(registry)
    }
}

impl<T> MemberRegistry<T> {
    /// Full path of the described type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of fields, flattened ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the type has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in registration order.
    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Every descriptor in registration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Looks a descriptor up by external name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// The extensions, in the order they were registered.
    #[inline]
    pub fn extensions(&self) -> &[ExtensionDescriptor] {
        &self.extensions
    }

    /// Writes every field inside one struct scope.
    pub fn serialize(&self, owner: &T, grammar: &mut dyn Grammar) -> Result<()> {
        #[cfg(all(debug_assertions, feature = "debug"))]
        let _guard = crate::type_stack::TypeStackGuard::push(self.type_name);

        grammar.begin_write(ScopeKind::Struct)?;
        for field in &self.fields {
            grammar.name(field.name);
            field.write_to(owner, grammar)?;
        }
        grammar.end_write()
    }

    /// Writes only the named fields, in registration order, inside one struct
    /// scope.
    ///
    /// Every name is checked before anything is written.
    pub fn serialize_fields(&self, owner: &T, grammar: &mut dyn Grammar, names: &[&str]) -> Result<()> {
        let selected = self.select(names)?;

        #[cfg(all(debug_assertions, feature = "debug"))]
        let _guard = crate::type_stack::TypeStackGuard::push(self.type_name);

        grammar.begin_write(ScopeKind::Struct)?;
        for field in self.selected_fields(&selected) {
            grammar.name(field.name);
            field.write_to(owner, grammar)?;
        }
        grammar.end_write()
    }

    /// Reads every field from one struct scope.
    pub fn deserialize(&self, owner: &mut T, grammar: &mut dyn Grammar) -> Result<()> {
        #[cfg(all(debug_assertions, feature = "debug"))]
        let _guard = crate::type_stack::TypeStackGuard::push(self.type_name);

        grammar.begin_read(ScopeKind::Struct)?;
        for field in &self.fields {
            self.read_field(field, owner, grammar)?;
        }
        grammar.end_read()
    }

    /// Reads only the named fields; the others keep their current value.
    pub fn deserialize_fields(&self, owner: &mut T, grammar: &mut dyn Grammar, names: &[&str]) -> Result<()> {
        let selected = self.select(names)?;

        #[cfg(all(debug_assertions, feature = "debug"))]
        let _guard = crate::type_stack::TypeStackGuard::push(self.type_name);

        grammar.begin_read(ScopeKind::Struct)?;
        for field in self.selected_fields(&selected) {
            self.read_field(field, owner, grammar)?;
        }
        grammar.end_read()
    }

    fn read_field(&self, field: &FieldDescriptor<T>, owner: &mut T, grammar: &mut dyn Grammar) -> Result<()> {
        grammar.name(field.name);
        field.read_from(owner, grammar).map_err(|err| match err {
            SerialError::NullNode { path } => SerialError::shape(
                path,
                format!("required field `{}` is missing or null", field.name),
            ),
            other => other,
        })
    }

    fn select(&self, names: &[&str]) -> Result<Vec<bool>, RegistryError> {
        let mut selected = vec![false; self.fields.len()];
        for &name in names {
            match self.index.get(name) {
                Some(&i) => selected[i] = true,
                None => {
                    return Err(RegistryError::UnknownField {
                        type_name: self.type_name,
                        field: name.to_owned(),
                    });
                }
            }
        }
        Ok(selected)
    }

    fn selected_fields<'a>(&'a self, selected: &'a [bool]) -> impl Iterator<Item = &'a FieldDescriptor<T>> + 'a {
        self.fields
            .iter()
            .zip(selected)
            .filter_map(|(field, &keep)| keep.then_some(field))
    }
}

impl<T> fmt::Debug for MemberRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberRegistry")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("extensions", &self.extensions)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Described

/// A struct type with a member registry.
///
/// Usually implemented by `#[derive(Serial)]`, which also forwards
/// [`Serial`] to the registry.
///
/// # Examples
///
/// ```
/// use vc_serial::{Described, Grammar, MemberBuilder, RegistryError, Serial, accessor};
///
/// #[derive(Default)]
/// struct Foo { a: i32, b: String }
///
/// impl Described for Foo {
///     fn describe(m: &mut MemberBuilder<Self>) -> Result<(), RegistryError> {
///         m.define("a", accessor!(Foo, a))?
///             .define("b", accessor!(Foo, b))?;
///         Ok(())
///     }
/// }
///
/// impl Serial for Foo {
///     fn serialize(&self, g: &mut dyn Grammar) -> vc_serial::Result<()> {
///         Self::registry().serialize(self, g)
///     }
///     fn deserialize(&mut self, g: &mut dyn Grammar) -> vc_serial::Result<()> {
///         Self::registry().deserialize(self, g)
///     }
/// }
///
/// assert_eq!(Foo::registry().field_names().collect::<Vec<_>>(), ["a", "b"]);
/// ```
pub trait Described: Sized + 'static {
    /// Registers the fields of `Self`.
    fn describe(members: &mut MemberBuilder<Self>) -> Result<(), RegistryError>;

    /// The registry of `Self`, built on first use.
    ///
    /// # Panics
    ///
    /// Panics if [`describe`](Described::describe) fails.
    fn registry() -> &'static MemberRegistry<Self> {
        REGISTRIES.get_or_build(|| match MemberRegistry::build() {
            Ok(registry) => registry,
            Err(err) => panic!("invalid member registry: {err}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::keys_overlap;
    use crate::{Described, MemberBuilder, RegistryError, accessor};

    #[derive(Default)]
    struct Base {
        a: i32,
        b: i32,
    }

    impl Described for Base {
        fn describe(m: &mut MemberBuilder<Self>) -> Result<(), RegistryError> {
            m.define("a", accessor!(Base, a))?.define("b", accessor!(Base, b))?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Derived {
        base: Base,
        c: String,
    }

    impl Described for Derived {
        fn describe(m: &mut MemberBuilder<Self>) -> Result<(), RegistryError> {
            m.extend("Base", accessor!(Derived, base))?
                .define("c", accessor!(Derived, c))?;
            Ok(())
        }
    }

    #[test]
    fn extension_flattens_in_base_order() {
        let reg = Derived::registry();
        assert_eq!(reg.field_names().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(reg.field("b").map(|f| f.accessor_key()), Some("base.b"));
        assert_eq!(reg.extensions().len(), 1);
        assert_eq!(reg.extensions()[0].label(), "Base");
        assert_eq!(reg.extensions()[0].fields(), ["a", "b"]);
        assert!(core::ptr::eq(reg, Derived::registry()));
    }

    #[test]
    fn same_field_twice_is_rejected() {
        let mut m = MemberBuilder::<Base>::new();
        m.define("a", accessor!(Base, a)).unwrap();
        let err = m.define("a", accessor!(Base, b)).unwrap_err();
        assert!(err.to_string().contains("`a`"));

        let err = m.define("alias", accessor!(Base, a)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateAccessor { field: "alias", .. }));
    }

    #[test]
    fn flattened_names_collide_with_direct_names() {
        let mut m = MemberBuilder::<Derived>::new();
        m.define("b", accessor!(Derived, c)).unwrap();
        let err = m.extend("Base", accessor!(Derived, base)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateField { field: "b", .. }));

        // `a` came before the clash and must not have been kept.
        let reg = m.finish();
        assert_eq!(reg.field_names().collect::<Vec<_>>(), ["b"]);
        assert!(reg.extensions().is_empty());
    }

    #[test]
    fn whole_and_flattened_storage_overlap() {
        assert!(keys_overlap("base", "base.a"));
        assert!(keys_overlap("a", "a"));
        assert!(!keys_overlap("a", "ab"));
        assert!(!keys_overlap("base.a", "base.b"));
    }
}
