//! JSON backend.
//!
//! Struct scopes are objects, array scopes are arrays and primitives are
//! literals. A member that is absent or `null` reads as a null node.

use core::mem;

use serde_json::{Map, Number, Value as Json};

use crate::{Frame, FrameStack, Grammar, Result, ScopeKind, SerialError, Slot, Value};

// -----------------------------------------------------------------------------
// JsonStyle

/// Layout used by [`JsonSerializer`]'s `dump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Two-space indentation.
    #[default]
    Pretty,
    /// No whitespace.
    Compact,
}

// -----------------------------------------------------------------------------
// JsonSerializer

/// A [`Grammar`] over one JSON document.
///
/// # Examples
///
/// ```
/// use vc_serial::{Grammar, JsonSerializer, JsonStyle, Serial};
///
/// let mut g = JsonSerializer::new().with_style(JsonStyle::Compact);
/// vec![1_u8, 2].serialize(&mut g).unwrap();
/// assert_eq!(g.dump().unwrap(), "[1,2]");
/// ```
#[derive(Debug, Default)]
pub struct JsonSerializer {
    root: Option<Json>,
    frames: FrameStack<Json>,
    style: JsonStyle,
}

impl JsonSerializer {
    /// Creates an empty serializer with [`JsonStyle::Pretty`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dump layout.
    pub fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    /// The document tree, if one was written or loaded.
    pub fn document(&self) -> Option<&Json> {
        self.root.as_ref()
    }

    // Child addressed by `slot` inside the top frame, or the root.
    fn lookup(&self, slot: &Slot) -> Option<&Json> {
        match (slot, self.frames.top()) {
            (Slot::Root, _) => self.root.as_ref(),
            (Slot::Member(name), Some(parent)) => parent.node.get(name.as_str()),
            (Slot::Index(index), Some(parent)) => parent.node.get(*index),
            (_, None) => None,
        }
    }

    fn lookup_mut(&mut self, slot: &Slot) -> Option<&mut Json> {
        match (slot, self.frames.top_mut()) {
            (Slot::Root, _) => self.root.as_mut(),
            (Slot::Member(name), Some(parent)) => parent.node.get_mut(name.as_str()),
            (Slot::Index(index), Some(parent)) => parent.node.get_mut(*index),
            (_, None) => None,
        }
    }

    // Puts a finished write node in its parent.
    fn attach(&mut self, slot: Slot, node: Json) -> Result<()> {
        let path = self.frames.path();
        match (slot, self.frames.top_mut()) {
            (Slot::Root, _) => {
                self.root = Some(node);
                Ok(())
            }
            (Slot::Member(name), Some(parent)) => match &mut parent.node {
                Json::Object(map) => {
                    map.insert(name, node);
                    Ok(())
                }
                _ => Err(SerialError::grammar(path, "named member outside of a struct scope")),
            },
            (Slot::Index(_), Some(parent)) => match &mut parent.node {
                Json::Array(items) => {
                    items.push(node);
                    Ok(())
                }
                _ => Err(SerialError::grammar(path, "array element outside of an array scope")),
            },
            (_, None) => Err(SerialError::grammar(path, "no enclosing scope")),
        }
    }

    // Puts a read node back where `begin_read` took it from.
    fn restore(&mut self, frame: Frame<Json>) {
        match self.lookup_mut(&frame.slot) {
            Some(place) => *place = frame.node,
            None => {
                if frame.slot == Slot::Root {
                    self.root = Some(frame.node);
                }
            }
        }
    }

    fn check_loaded(&self) -> Result<()> {
        if self.frames.is_empty() && self.root.is_none() {
            return Err(SerialError::grammar("/", "no document to read"));
        }
        Ok(())
    }
}

fn kind_of(node: &Json) -> &'static str {
    match node {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "struct",
    }
}

fn to_json(value: Value, path: impl FnOnce() -> String) -> Result<Json> {
    Ok(match value {
        Value::Bool(v) => Json::Bool(v),
        Value::Int(v) => Json::Number(v.into()),
        Value::UInt(v) => Json::Number(v.into()),
        Value::Float(v) => match Number::from_f64(v) {
            Some(n) => Json::Number(n),
            None => {
                return Err(SerialError::shape(
                    path(),
                    format!("non-finite float {v} cannot be written as JSON"),
                ));
            }
        },
        Value::Str(v) => Json::String(v),
    })
}

fn from_number(n: &Number) -> Option<Value> {
    if let Some(v) = n.as_u64() {
        return Some(Value::UInt(v));
    }
    if let Some(v) = n.as_i64() {
        return Some(Value::Int(v));
    }
    n.as_f64().map(Value::Float)
}

impl Grammar for JsonSerializer {
    fn name(&mut self, name: &str) {
        self.frames.stage(name);
    }

    fn begin_write(&mut self, kind: ScopeKind) -> Result<()> {
        let slot = self.frames.next_write_slot()?;
        let node = match kind {
            ScopeKind::Struct => Json::Object(Map::new()),
            ScopeKind::Array => Json::Array(Vec::new()),
        };
        self.frames.push(Frame::new(kind, node, slot));
        Ok(())
    }

    fn end_write(&mut self) -> Result<()> {
        match self.frames.pop() {
            Some(frame) => self.attach(frame.slot, frame.node),
            None => Err(SerialError::grammar("/", "end_write without an open scope")),
        }
    }

    fn write_value(&mut self, value: Value) -> Result<()> {
        let slot = self.frames.next_write_slot()?;
        let node = to_json(value, || self.frames.path())?;
        self.attach(slot, node)
    }

    fn begin_read(&mut self, kind: ScopeKind) -> Result<usize> {
        self.check_loaded()?;
        let slot = self.frames.next_read_slot()?;

        let len = match (kind, self.lookup(&slot)) {
            (_, None | Some(Json::Null)) => return Err(SerialError::null_node(self.frames.path())),
            (ScopeKind::Struct, Some(Json::Object(map))) => map.len(),
            (ScopeKind::Array, Some(Json::Array(items))) => items.len(),
            (_, Some(other)) => {
                return Err(SerialError::shape(
                    self.frames.path(),
                    format!("expected {kind}, found {}", kind_of(other)),
                ));
            }
        };

        let node = match &slot {
            Slot::Root => self.root.take().unwrap_or_default(),
            _ => self.lookup_mut(&slot).map(mem::take).unwrap_or_default(),
        };
        self.frames.push(Frame::new(kind, node, slot).with_len(len));
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

        let found = match self.lookup(&slot) {
            None | Some(Json::Null) => return Err(SerialError::null_node(self.frames.path())),
            Some(Json::Bool(v)) => Some(Value::Bool(*v)),
            Some(Json::Number(n)) => from_number(n),
            Some(Json::String(s)) => Some(Value::Str(s.clone())),
            Some(other) => {
                return Err(SerialError::shape(
                    self.frames.path(),
                    format!("expected a primitive, found {}", kind_of(other)),
                ));
            }
        };

        found.ok_or_else(|| SerialError::shape(self.frames.path(), "unrepresentable number"))
    }

    fn node_keys(&self) -> Result<Vec<String>> {
        match self.frames.top() {
            Some(Frame {
                node: Json::Object(map),
                ..
            }) => Ok(map.keys().cloned().collect()),
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

        let text = match self.style {
            JsonStyle::Pretty => serde_json::to_string_pretty(root),
            JsonStyle::Compact => serde_json::to_string(root),
        };
        text.map_err(|err| SerialError::grammar("/", err))
    }

    fn set_raw_input(&mut self, text: &str) -> Result<()> {
        self.frames.clear();
        self.root = None;
        let root: Json = serde_json::from_str(text)
            .map_err(|err| SerialError::shape("/", format!("malformed JSON: {err}")))?;
        self.root = Some(root);
        Ok(())
    }
}
