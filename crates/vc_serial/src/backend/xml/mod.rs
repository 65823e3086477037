//! XML backend.
//!
//! - Primitive leaves carry `type="bool|int|uint|float|string"`.
//! - Array elements are wrapped in `___containerEntry___`.
//! - Struct members are child elements named after the member.
//!
//! The engine has an explicit lifecycle: call [`startup`] once before the
//! first [`XmlSerializer::new`] and [`shutdown`] once after the last
//! serializer is dropped.
//!
//! # Examples
//!
//! ```
//! use vc_serial::{Grammar, Serial, XmlSerializer, xml};
//!
//! # let _ = xml::startup();
//! let mut g = XmlSerializer::new().unwrap().with_indent(0);
//! vec![true].serialize(&mut g).unwrap();
//! assert_eq!(
//!     g.dump().unwrap(),
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?><root>\
//!      <___containerEntry___ type=\"bool\">true</___containerEntry___></root>",
//! );
//! ```

mod engine;
mod node;

use core::mem;

pub use engine::{XmlEngineError, is_running, live_instances, shutdown, startup};
pub use node::Element;

use engine::EngineLease;
use node::{TYPE_ATTR, is_xml_name};

use crate::{Frame, FrameStack, Grammar, Result, ScopeKind, SerialError, Slot, Value, ValueKind};

/// Tag of every array element.
pub const CONTAINER_ENTRY: &str = "___containerEntry___";

/// Root element name used unless [`XmlSerializer::with_root_name`] is given.
pub const DEFAULT_ROOT_NAME: &str = "root";

// -----------------------------------------------------------------------------
// XmlSerializer

/// A [`Grammar`] over one XML document.
///
/// Member names and string map keys become element names, so they must be
/// valid XML names. Writing a map keyed by `"1"`, `"a b"` or `""` fails with a
/// shape error, where the JSON backend would accept it.
#[derive(Debug)]
pub struct XmlSerializer {
    root: Option<Element>,
    frames: FrameStack<Element>,
    root_name: String,
    indent: usize,
    _lease: EngineLease,
}

impl XmlSerializer {
    /// Creates an empty serializer.
    ///
    /// # Errors
    ///
    /// [`SerialError::XmlEngine`] if the engine is not running.
    pub fn new() -> Result<Self> {
        Ok(Self {
            root: None,
            frames: FrameStack::new(),
            root_name: DEFAULT_ROOT_NAME.to_owned(),
            indent: 2,
            _lease: EngineLease::acquire()?,
        })
    }

    /// Sets the name of the root element written by this serializer.
    ///
    /// Any root name is accepted on read.
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Sets the indentation width of `dump`; `0` writes one line.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// The document tree, if one was written or loaded.
    pub fn document(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    fn check_loaded(&self) -> Result<()> {
        if self.frames.is_empty() && self.root.is_none() {
            return Err(SerialError::grammar("/", "no document to read"));
        }
        Ok(())
    }

    fn element_name(&self, slot: &Slot) -> Result<String> {
        let name = match slot {
            Slot::Root => self.root_name.as_str(),
            Slot::Member(name) => name.as_str(),
            Slot::Index(_) => CONTAINER_ENTRY,
        };
        if !is_xml_name(name) {
            return Err(SerialError::shape(
                self.frames.path(),
                format!("`{name}` is not a valid XML element name"),
            ));
        }
        Ok(name.to_owned())
    }

    // Puts a finished write node in its parent.
    fn attach(&mut self, slot: &Slot, element: Element) -> Result<()> {
        match (slot, self.frames.top_mut()) {
            (Slot::Root, _) => {
                self.root = Some(element);
                Ok(())
            }
            (_, Some(parent)) => {
                parent.node.children.push(element);
                Ok(())
            }
            (_, None) => Err(SerialError::grammar(self.frames.path(), "no enclosing scope")),
        }
    }

    // Position and element addressed by `slot` inside the top frame.
    fn child(&self, slot: &Slot) -> Result<Option<(usize, &Element)>> {
        let parent = match (slot, self.frames.top()) {
            (Slot::Root, _) => return Ok(self.root.as_ref().map(|root| (0, root))),
            (_, Some(parent)) => &parent.node,
            (_, None) => return Ok(None),
        };

        match slot {
            Slot::Member(name) => Ok(parent.position(name).map(|i| (i, &parent.children[i]))),
            Slot::Index(index) => match parent.children.get(*index) {
                Some(entry) if entry.name == CONTAINER_ENTRY => Ok(Some((*index, entry))),
                Some(other) => Err(SerialError::shape(
                    self.frames.path(),
                    format!("array child `<{}>` is not a `{CONTAINER_ENTRY}`", other.name),
                )),
                None => Ok(None),
            },
            Slot::Root => Ok(None),
        }
    }

    fn restore(&mut self, frame: Frame<Element>) {
        if frame.slot == Slot::Root {
            self.root = Some(frame.node);
            return;
        }
        if let Some(place) = self
            .frames
            .top_mut()
            .and_then(|parent| parent.node.children.get_mut(frame.position))
        {
            *place = frame.node;
        }
    }
}

fn check_scope(kind: ScopeKind, element: &Element, path: impl FnOnce() -> String) -> Result<()> {
    let reason = if let Some(tag) = element.type_tag() {
        format!("expected {kind}, found `{tag}` leaf")
    } else if !element.text.trim().is_empty() {
        format!("expected {kind}, found text")
    } else {
        let stray = match kind {
            ScopeKind::Struct => element.children.iter().find(|c| c.name == CONTAINER_ENTRY),
            ScopeKind::Array => element.children.iter().find(|c| c.name != CONTAINER_ENTRY),
        };
        match (kind, stray) {
            (_, None) => return Ok(()),
            (ScopeKind::Struct, Some(_)) => format!("expected struct, found `{CONTAINER_ENTRY}` children"),
            (ScopeKind::Array, Some(child)) => {
                format!("array child `<{}>` is not a `{CONTAINER_ENTRY}`", child.name)
            }
        }
    };
    Err(SerialError::shape(path(), reason))
}

fn leaf_value(element: &Element, path: impl Fn() -> String) -> Result<Value> {
    if !element.children.is_empty() {
        return Err(SerialError::shape(
            path(),
            format!("expected a primitive, found `<{}>` with child elements", element.name),
        ));
    }
    let Some(tag) = element.type_tag() else {
        return Err(SerialError::shape(
            path(),
            format!("`<{}>` has no `{TYPE_ATTR}` attribute", element.name),
        ));
    };
    let Some(kind) = ValueKind::from_tag(tag) else {
        return Err(SerialError::shape(path(), format!("unknown type tag `{tag}`")));
    };
    Value::from_text(kind, &element.text).map_err(|reason| SerialError::shape(path(), reason))
}

impl Grammar for XmlSerializer {
    fn name(&mut self, name: &str) {
        self.frames.stage(name);
    }

    fn begin_write(&mut self, kind: ScopeKind) -> Result<()> {
        let slot = self.frames.next_write_slot()?;
        let element = Element::new(self.element_name(&slot)?);
        self.frames.push(Frame::new(kind, element, slot));
        Ok(())
    }

    fn end_write(&mut self) -> Result<()> {
        match self.frames.pop() {
            Some(frame) => self.attach(&frame.slot, frame.node),
            None => Err(SerialError::grammar("/", "end_write without an open scope")),
        }
    }

    fn write_value(&mut self, value: Value) -> Result<()> {
        let slot = self.frames.next_write_slot()?;
        let mut element = Element::new(self.element_name(&slot)?);
        element
            .attrs
            .push((TYPE_ATTR.to_owned(), value.kind().tag().to_owned()));
        element.text = value.to_text();
        self.attach(&slot, element)
    }

    fn begin_read(&mut self, kind: ScopeKind) -> Result<usize> {
        self.check_loaded()?;
        let slot = self.frames.next_read_slot()?;

        let Some((position, element)) = self.child(&slot)? else {
            return Err(SerialError::null_node(self.frames.path()));
        };
        check_scope(kind, element, || self.frames.path())?;
        let len = element.children.len();

        let node = match &slot {
            Slot::Root => self.root.take().unwrap_or_default(),
            _ => self
                .frames
                .top_mut()
                .and_then(|parent| parent.node.children.get_mut(position))
                .map(mem::take)
                .unwrap_or_default(),
        };
        self.frames.push(
            Frame::new(kind, node, slot)
                .with_len(len)
                .with_position(position),
        );
        Ok(len)
    }

    fn end_read(&mut self) -> Result<()> {
        match self.frames.pop() {
            Some(frame) => {
                self.restore(frame);
                Ok(())
            }
            None => Err(SerialError::grammar("/", "end_read without an open scope")),
        }
    }

    fn read_value(&mut self) -> Result<Value> {
        self.check_loaded()?;
        let slot = self.frames.next_read_slot()?;

        match self.child(&slot)? {
            Some((_, element)) => leaf_value(element, || self.frames.path()),
            None => Err(SerialError::null_node(self.frames.path())),
        }
    }

    fn node_keys(&self) -> Result<Vec<String>> {
        match self.frames.top() {
            Some(frame) if frame.kind == ScopeKind::Struct => {
                let mut keys: Vec<String> = Vec::with_capacity(frame.node.children.len());
                for child in &frame.node.children {
                    if !keys.contains(&child.name) {
                        keys.push(child.name.clone());
                    }
                }
                Ok(keys)
            }
            _ => Err(SerialError::grammar(
                self.frames.path(),
                "node keys requested outside of a struct scope",
            )),
        }
    }

    fn depth(&self) -> usize {
        self.frames.depth()
    }

    fn unwind(&mut self, depth: usize) {
        while self.frames.depth() > depth {
            if let Some(frame) = self.frames.pop() {
                self.restore(frame);
            }
        }
        self.frames.clear_pending();
    }

    fn path(&self) -> String {
        self.frames.path()
    }

    fn dump(&self) -> Result<String> {
        if !self.frames.is_empty() {
            return Err(SerialError::grammar(
                self.frames.path(),
                format!("{} scope(s) still open", self.frames.depth()),
            ));
        }
        let Some(root) = &self.root else {
            return Err(SerialError::grammar("/", "nothing was written"));
        };
        node::write(root, self.indent).map_err(|err| SerialError::grammar("/", err))
    }

    fn set_raw_input(&mut self, text: &str) -> Result<()> {
        self.frames.clear();
        self.root = None;
        let root = node::parse(text)
            .map_err(|err| SerialError::shape("/", format!("malformed XML: {err}")))?;
        self.root = Some(root);
        Ok(())
    }
}
