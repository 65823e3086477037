use core::fmt::Write;

use crate::{Result, ScopeKind, SerialError};

// -----------------------------------------------------------------------------
// Slot

/// Where a node sits relative to its parent scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The document root.
    Root,
    /// A named member of a struct scope.
    Member(String),
    /// A position inside an array scope.
    Index(usize),
}

impl Slot {
    fn write_label(&self, out: &mut String) {
        match self {
            Self::Root => {}
            Self::Member(name) => {
                out.push('/');
                out.push_str(name);
            }
            Self::Index(index) => {
                let _ = write!(out, "/[{index}]");
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Frame

/// One open scope.
///
/// A frame owns the backend node it addresses. Backends move a child out of
/// its parent when the scope opens and put it back when the scope closes.
#[derive(Debug)]
pub struct Frame<N> {
    /// Struct or array.
    pub kind: ScopeKind,
    /// The node this scope reads from or writes into.
    pub node: N,
    /// Next array position; unused for struct scopes.
    pub cursor: usize,
    /// Member count reported when the scope was opened for reading.
    pub len: usize,
    /// Where the node lives in its parent.
    pub slot: Slot,
    /// Backend-specific position of the node in its parent.
    pub position: usize,
}

impl<N> Frame<N> {
    /// Creates a frame with a zero cursor.
    pub fn new(kind: ScopeKind, node: N, slot: Slot) -> Self {
        Self {
            kind,
            node,
            cursor: 0,
            len: 0,
            slot,
            position: 0,
        }
    }

    /// Sets the member count.
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Sets the backend-specific position.
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

// -----------------------------------------------------------------------------
// FrameStack

/// Per-call scope state shared by the backends.
///
/// The depth of the stack always equals the current scope nesting depth, and
/// the top frame is the scope the next operation affects.
#[derive(Debug)]
pub struct FrameStack<N> {
    frames: Vec<Frame<N>>,
    pending: Option<String>,
    // Slot resolved inside the top frame but not pushed as a frame itself.
    current: Option<Slot>,
}

impl<N> Default for FrameStack<N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<N> FrameStack<N> {
    /// Creates an empty stack.
    pub const fn new() -> Self {
        Self {
            frames: Vec::new(),
            pending: None,
            current: None,
        }
    }

    /// Stages the member name for the next slot.
    pub fn stage(&mut self, name: &str) {
        self.pending = Some(name.to_owned());
    }

    /// Drops the staged name, if any.
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Number of open scopes.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no scope is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The innermost scope.
    #[inline]
    pub fn top(&self) -> Option<&Frame<N>> {
        self.frames.last()
    }

    /// The innermost scope, mutably.
    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut Frame<N>> {
        self.frames.last_mut()
    }

    /// Opens a scope.
    pub fn push(&mut self, frame: Frame<N>) {
        self.current = None;
        self.frames.push(frame);
    }

    /// Closes the innermost scope.
    pub fn pop(&mut self) -> Option<Frame<N>> {
        self.current = None;
        self.pending = None;
        self.frames.pop()
    }

    /// Drops every frame and the staged name.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.pending = None;
        self.current = None;
    }

    /// Resolves where the next written node goes.
    ///
    /// Array scopes append; struct scopes consume the staged name.
    pub fn next_write_slot(&mut self) -> Result<Slot> {
        let array_index = match self.frames.last_mut() {
            Some(frame) if frame.kind == ScopeKind::Array => {
                let index = frame.cursor;
                frame.cursor += 1;
                frame.len = frame.cursor;
                Some(index)
            }
            _ => None,
        };

        let slot = match array_index {
            Some(index) => {
                self.pending = None;
                Slot::Index(index)
            }
            None if self.frames.is_empty() => {
                self.pending = None;
                Slot::Root
            }
            None => self.take_member()?,
        };

        self.current = Some(slot.clone());
        Ok(slot)
    }

    /// Resolves which node the next read addresses.
    ///
    /// Array scopes advance the cursor and fail once it runs past the count
    /// reported when the scope was opened.
    pub fn next_read_slot(&mut self) -> Result<Slot> {
        let slot = match self.frames.last().map(|f| (f.kind, f.cursor, f.len)) {
            None => {
                self.pending = None;
                Slot::Root
            }
            Some((ScopeKind::Array, index, len)) => {
                self.pending = None;
                if index >= len {
                    return Err(SerialError::shape(
                        self.path(),
                        format!("array cursor {index} ran past {len} element(s)"),
                    ));
                }
                if let Some(frame) = self.frames.last_mut() {
                    frame.cursor += 1;
                }
                Slot::Index(index)
            }
            Some((ScopeKind::Struct, ..)) => self.take_member()?,
        };

        self.current = Some(slot.clone());
        Ok(slot)
    }

    fn take_member(&mut self) -> Result<Slot> {
        match self.pending.take() {
            Some(name) => Ok(Slot::Member(name)),
            None => Err(SerialError::grammar(self.path(), "no member name staged")),
        }
    }

    /// Renders `/member/[index]/...` for the node addressed last.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for frame in &self.frames {
            frame.slot.write_label(&mut out);
        }
        if let Some(slot) = &self.current {
            slot.write_label(&mut out);
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameStack, Slot};
    use crate::ScopeKind;

    #[test]
    fn struct_scope_needs_a_name() {
        let mut stack = FrameStack::<()>::new();
        assert_eq!(stack.next_write_slot(), Ok(Slot::Root));
        stack.push(Frame::new(ScopeKind::Struct, (), Slot::Root));

        let err = stack.next_write_slot().unwrap_err();
        assert!(err.to_string().contains("no member name staged"));

        stack.stage("a");
        assert_eq!(stack.next_write_slot(), Ok(Slot::Member("a".into())));
        assert_eq!(stack.path(), "/a");
    }

    #[test]
    fn array_cursor_is_bounded_on_read() {
        let mut stack = FrameStack::<()>::new();
        stack.push(Frame::new(ScopeKind::Array, (), Slot::Member("xs".into())).with_len(2));

        stack.stage("ignored");
        assert_eq!(stack.next_read_slot(), Ok(Slot::Index(0)));
        assert_eq!(stack.next_read_slot(), Ok(Slot::Index(1)));
        assert_eq!(stack.path(), "/xs/[1]");

        let err = stack.next_read_slot().unwrap_err();
        assert!(err.is_shape());
        assert!(err.to_string().contains("ran past 2"));
    }

    #[test]
    fn depth_tracks_nesting() {
        let mut stack = FrameStack::<u8>::new();
        assert!(stack.is_empty());
        stack.push(Frame::new(ScopeKind::Struct, 1, Slot::Root));
        stack.push(Frame::new(ScopeKind::Array, 2, Slot::Member("a".into())));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop().map(|f| f.node), Some(2));
        assert_eq!(stack.top().map(|f| f.node), Some(1));
        stack.clear();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.path(), "/");
    }
}
