use std::fs;
use std::path::Path;

use tracing::{debug, info};
use vc_serial::{Grammar, ScopeKind, Serial};

use crate::slot::{ErasedSlot, Slot, SlotKey, SlotValue};
use crate::{Format, Result, SettingsError};

// -----------------------------------------------------------------------------
// LoadReport

/// Outcome of a successful [`Settings::load_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Format the text was read as.
    pub format: Format,
    /// Slots read from the document, in registration order.
    pub applied: Vec<String>,
    /// Slots absent or null in the document; they keep their value.
    pub missing: Vec<String>,
    /// Document members that match no slot, in document order.
    pub unknown: Vec<String>,
}

// -----------------------------------------------------------------------------
// Settings

/// A store of named settings slots.
///
/// Slots are written as the members of one root struct, in registration
/// order. Loading is all-or-nothing: if any present slot fails to read, no
/// slot changes.
#[derive(Default)]
pub struct Settings {
    slots: Vec<Box<dyn ErasedSlot>>,
}

impl Settings {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slot named `name` holding `default`.
    pub fn register<T>(&mut self, name: impl Into<String>, default: T) -> Result<SlotKey<T>>
    where
        T: Serial + Clone + Send + Sync + 'static,
    {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(SettingsError::DuplicateSlot(name));
        }

        debug!(slot = %name, ty = core::any::type_name::<T>(), "settings slot registered");
        self.slots.push(Box::new(Slot::new(name, default)));
        Ok(SlotKey::new(self.slots.len() - 1))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name() == name)
    }

    fn slot<T: SlotValue>(&self, key: SlotKey<T>) -> Option<&Slot<T>> {
        self.slots.get(key.index)?.as_any().downcast_ref()
    }

    fn slot_mut<T: SlotValue>(&mut self, key: SlotKey<T>) -> Option<&mut Slot<T>> {
        self.slots.get_mut(key.index)?.as_any_mut().downcast_mut()
    }

    /// Current value of a slot.
    ///
    /// Returns `None` if `key` was issued by another store.
    pub fn get<T>(&self, key: SlotKey<T>) -> Option<&T>
    where
        T: Serial + Clone + Send + Sync + 'static,
    {
        self.slot(key).map(|slot| &slot.value)
    }

    /// Replaces the value of a slot and returns the previous one.
    ///
    /// Returns `None`, leaving `value` unused, if `key` was issued by another
    /// store.
    pub fn set<T>(&mut self, key: SlotKey<T>, value: T) -> Option<T>
    where
        T: Serial + Clone + Send + Sync + 'static,
    {
        self.slot_mut(key)
            .map(|slot| core::mem::replace(&mut slot.value, value))
    }

    /// Restores the registered default of a slot and returns the previous value.
    pub fn reset<T>(&mut self, key: SlotKey<T>) -> Option<T>
    where
        T: Serial + Clone + Send + Sync + 'static,
    {
        self.slot_mut(key).map(|slot| {
            let default = slot.default.clone();
            core::mem::replace(&mut slot.value, default)
        })
    }

    /// Slot names in registration order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.name())
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Renders every slot as one document.
    pub fn to_string(&self, format: Format) -> Result<String> {
        let mut grammar = format.grammar()?;
        grammar.begin_write(ScopeKind::Struct)?;
        for slot in &self.slots {
            slot.write(grammar.as_mut())?;
        }
        grammar.end_write()?;

        let text = grammar.dump()?;
        debug!(%format, slots = self.slots.len(), "settings rendered");
        Ok(text)
    }

    /// Loads slot values from `text`, detecting the format.
    ///
    /// A slot whose member is absent or null keeps its value. On error every
    /// slot keeps its value.
    pub fn load_str(&mut self, text: &str) -> Result<LoadReport> {
        let format = Format::sniff(text).ok_or(SettingsError::UnknownFormat)?;
        let mut grammar = open_root(format, text)?;
        let keys = grammar.node_keys()?;

        let mut staged = Vec::new();
        let mut missing = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if !keys.iter().any(|key| key == slot.name()) {
                missing.push(slot.name().to_owned());
                continue;
            }
            match slot.stage(grammar.as_mut()) {
                Ok(read) => staged.push((index, read)),
                Err(err) if err.is_null_node() => missing.push(slot.name().to_owned()),
                Err(err) => return Err(err.into()),
            }
        }
        grammar.end_read()?;

        let unknown = keys
            .into_iter()
            .filter(|key| self.position(key).is_none())
            .collect();

        let mut applied = Vec::with_capacity(staged.len());
        for (index, read) in staged {
            applied.push(read.name().to_owned());
            self.slots[index] = read;
        }

        let report = LoadReport {
            format,
            applied,
            missing,
            unknown,
        };
        info!(
            %format,
            applied = report.applied.len(),
            missing = report.missing.len(),
            unknown = report.unknown.len(),
            "settings loaded",
        );
        Ok(report)
    }

    /// Member names present at the root of `text`, in document order.
    pub fn configured_keys(text: &str) -> Result<Vec<String>> {
        let format = Format::sniff(text).ok_or(SettingsError::UnknownFormat)?;
        let grammar = open_root(format, text)?;
        Ok(grammar.node_keys()?)
    }

    /// Reads the file at `path` and [loads](Settings::load_str) it.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_owned(),
            source,
        })?;
        self.load_str(&text)
    }

    /// Writes every slot to the file at `path`.
    pub fn save_path(&self, path: impl AsRef<Path>, format: Format) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_string(format)?;
        fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_owned(),
            source,
        })?;
        info!(path = %path.display(), %format, "settings saved");
        Ok(())
    }
}

/// Parses `text` and opens its root struct.
fn open_root(format: Format, text: &str) -> Result<Box<dyn Grammar>> {
    let mut grammar = format.grammar()?;
    grammar.set_raw_input(text)?;
    grammar.begin_read(ScopeKind::Struct)?;
    Ok(grammar)
}

impl core::fmt::Debug for Settings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.slot_names()).finish()
    }
}
