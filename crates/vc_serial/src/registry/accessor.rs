use core::fmt;

// -----------------------------------------------------------------------------
// Accessor

/// A typed reference to where a field lives inside its owner.
///
/// The pair of function pointers replaces a raw field offset. The `key`
/// identifies the storage location (the Rust field path), which is how a
/// [`MemberBuilder`](crate::MemberBuilder) detects two names bound to the
/// same field.
///
/// Usually created with [`accessor!`](crate::accessor).
pub struct Accessor<T, F> {
    key: &'static str,
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> Accessor<T, F> {
    /// Creates an accessor from a key and a getter/setter pair.
    #[inline]
    pub const fn new(key: &'static str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Self { key, get, get_mut }
    }

    /// The storage key, e.g. `"position"`.
    #[inline]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Borrows the field.
    #[inline]
    pub fn get<'a>(&self, owner: &'a T) -> &'a F {
        (self.get)(owner)
    }

    /// Mutably borrows the field.
    #[inline]
    pub fn get_mut<'a>(&self, owner: &'a mut T) -> &'a mut F {
        (self.get_mut)(owner)
    }

    #[inline]
    pub(crate) fn into_parts(self) -> (fn(&T) -> &F, fn(&mut T) -> &mut F) {
        (self.get, self.get_mut)
    }
}

impl<T, F> Clone for Accessor<T, F> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F> Copy for Accessor<T, F> {}

impl<T, F> fmt::Debug for Accessor<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Accessor").field(&self.key).finish()
    }
}

/// Builds an [`Accessor`] for a field of `$owner`.
///
/// # Examples
///
/// ```
/// use vc_serial::{Accessor, accessor};
///
/// struct Foo { a: u8, b: String }
///
/// let acc: Accessor<Foo, String> = accessor!(Foo, b);
/// let foo = Foo { a: 1, b: "x".into() };
/// assert_eq!(acc.get(&foo), "x");
/// assert_eq!(acc.key(), "b");
/// ```
#[macro_export]
macro_rules! accessor {
    ($owner:ty, $field:tt) => {
        $crate::Accessor::<$owner, _>::new(
            ::core::stringify!($field),
            |owner: &$owner| &owner.$field,
            |owner: &mut $owner| &mut owner.$field,
        )
    };
}
