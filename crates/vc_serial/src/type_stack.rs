//! Thread-local stack of the struct types currently being written or read.
//!
//! Only compiled with the `debug` feature in debug builds. Shape errors use it
//! to say *which* nested type rejected the document.

use core::cell::RefCell;
use core::fmt::{self, Display, Formatter};

std::thread_local! {
    static TYPE_STACK: RefCell<TypeStack> = const { RefCell::new(TypeStack::new()) };
}

#[derive(Default)]
struct TypeStack {
    stack: Vec<&'static str>,
}

impl TypeStack {
    const fn new() -> Self {
        Self { stack: Vec::new() }
    }
}

impl Display for TypeStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut iter = self.stack.iter();

        if let Some(first) = iter.next() {
            write!(f, "`{first}`")?;
        }

        for name in iter {
            write!(f, " -> `{name}`")?;
        }

        Ok(())
    }
}

/// Pops its entry when dropped, so early returns through `?` stay balanced.
pub(crate) struct TypeStackGuard(());

impl TypeStackGuard {
    pub(crate) fn push(type_name: &'static str) -> Self {
        TYPE_STACK.with_borrow_mut(|s| s.stack.push(type_name));
        Self(())
    }
}

impl Drop for TypeStackGuard {
    fn drop(&mut self) {
        TYPE_STACK.with_borrow_mut(|s| s.stack.pop());
    }
}

pub(crate) fn annotate(reason: impl Display) -> String {
    TYPE_STACK.with_borrow(|s| {
        if s.stack.is_empty() {
            reason.to_string()
        } else {
            format!("{reason} (types: {s})")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{TypeStackGuard, annotate};

    #[test]
    fn guard_is_balanced() {
        assert_eq!(annotate("boom"), "boom");
        {
            let _outer = TypeStackGuard::push("Outer");
            let _inner = TypeStackGuard::push("Inner");
            assert_eq!(annotate("boom"), "boom (types: `Outer` -> `Inner`)");
        }
        assert_eq!(annotate("boom"), "boom");
    }
}
