use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use vc_serial::{Grammar, Result, Serial};

// -----------------------------------------------------------------------------
// SlotKey

/// Typed handle to a registered slot.
///
/// Only meaningful for the [`Settings`](crate::Settings) that returned it.
pub struct SlotKey<T> {
    pub(crate) index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SlotKey<T> {
    pub(crate) const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for SlotKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlotKey<T> {}

impl<T> fmt::Debug for SlotKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotKey").field(&self.index).finish()
    }
}

// -----------------------------------------------------------------------------
// Slot

/// Bound shared by every value a slot may hold.
pub(crate) trait SlotValue: Serial + Clone + Send + Sync + 'static {}

impl<T: Serial + Clone + Send + Sync + 'static> SlotValue for T {}

/// A slot with its value type erased.
pub(crate) trait ErasedSlot: Send + Sync {
    fn name(&self) -> &str;

    fn write(&self, grammar: &mut dyn Grammar) -> Result<()>;

    /// Reads the member at the staged name into a copy of this slot.
    fn stage(&self, grammar: &mut dyn Grammar) -> Result<Box<dyn ErasedSlot>>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub(crate) struct Slot<T> {
    pub(crate) name: String,
    pub(crate) value: T,
    pub(crate) default: T,
}

impl<T: SlotValue> Slot<T> {
    pub(crate) fn new(name: String, default: T) -> Self {
        Self {
            name,
            value: default.clone(),
            default,
        }
    }
}

impl<T: SlotValue> ErasedSlot for Slot<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, grammar: &mut dyn Grammar) -> Result<()> {
        grammar.name(&self.name);
        self.value.serialize(grammar)
    }

    fn stage(&self, grammar: &mut dyn Grammar) -> Result<Box<dyn ErasedSlot>> {
        let mut value = self.value.clone();
        grammar.name(&self.name);
        value.deserialize(grammar)?;
        Ok(Box::new(Self {
            name: self.name.clone(),
            value,
            default: self.default.clone(),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
