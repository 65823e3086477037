//! Process-wide storage for lazily built registries.
//!
//! [`MemberRegistry`] and [`EnumTable`] values are built on first use and
//! then live, read-only, for the rest of the process. The cell is keyed by the
//! [`TypeId`] of the stored value, so one static can serve every type,
//! including every instantiation of a generic type.
//!
//! Each key owns its own [`OnceLock`]. The map lock is only held while the
//! slot is looked up or inserted, never while a registry is being built, so a
//! registry that pulls in another type's registry (through
//! [`MemberBuilder::extend`]) does not deadlock, and racing first uses from
//! several threads still build each registry exactly once.
//!
//! [`MemberRegistry`]: crate::MemberRegistry
//! [`EnumTable`]: crate::EnumTable
//! [`MemberBuilder::extend`]: crate::MemberBuilder::extend

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::hash::{TypeIdHashState, TypeIdMap};

type Entry = OnceLock<&'static (dyn Any + Send + Sync)>;

pub(crate) struct RegistryCell(RwLock<TypeIdMap<&'static Entry>>);

impl RegistryCell {
    pub(crate) const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::with_hasher(TypeIdHashState)))
    }

    /// Returns the value stored for `T`, building it with `build` on first use.
    pub(crate) fn get_or_build<T: Any + Send + Sync>(&self, build: impl FnOnce() -> T) -> &'static T {
        let entry = self.entry(TypeId::of::<T>());
        let value: &'static (dyn Any + Send + Sync) = *entry.get_or_init(|| {
            let leaked: &'static T = Box::leak(Box::new(build()));
            leaked as &'static (dyn Any + Send + Sync)
        });

        value
            .downcast_ref::<T>()
            .expect("registry entries are keyed by the `TypeId` of their value")
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn entry(&self, type_id: TypeId) -> &'static Entry {
        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();

        if let Some(entry) = found {
            return entry;
        }

        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *map.entry(type_id).or_insert_with(|| {
            let entry: &'static Entry = Box::leak(Box::new(OnceLock::new()));
            entry
        })
    }
}

/// The single cell behind every `registry()` and `table()` accessor.
pub(crate) static REGISTRIES: RegistryCell = RegistryCell::new();

#[cfg(test)]
mod tests {
    use super::RegistryCell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn builds_once_per_type() {
        static CELL: RegistryCell = RegistryCell::new();
        static BUILDS: AtomicUsize = AtomicUsize::new(0);

        let a: &'static u32 = CELL.get_or_build(|| {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            7_u32
        });
        let b: &'static u32 = CELL.get_or_build(|| {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            8_u32
        });
        let s: &'static String = CELL.get_or_build(|| "x".to_owned());

        assert!(core::ptr::eq(a, b));
        assert_eq!(*b, 7);
        assert_eq!(s, "x");
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn racing_first_use_builds_once() {
        static CELL: RegistryCell = RegistryCell::new();
        static BUILDS: AtomicUsize = AtomicUsize::new(0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    let v: &'static u64 = CELL.get_or_build(|| {
                        BUILDS.fetch_add(1, Ordering::SeqCst);
                        std::thread::yield_now();
                        42_u64
                    });
                    v as *const u64 as usize
                })
            })
            .collect();

        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    }
}
