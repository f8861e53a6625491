//! Per-object buffers used while reading.
//!
//! Everything between an object's `Begin` and its matching `End` is
//! collected into a [`Frame`] before any class loader runs. Loaders then
//! pull out the fields they own, by name, in whatever order they like.
//! A nested object gets a frame of its own on top of the [`FrameStack`].
//! When its `End` is met it is constructed and handed to the frame below,
//! so a frame only ever holds scalars and finished objects.

use crate::Scalar;

/// A buffered field value.
#[derive(Debug)]
pub(crate) enum Payload<T> {
    Scalar(Scalar),
    Object(T),
}

impl<T> Payload<T> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Payload::Scalar(_) => "a value",
            Payload::Object(_) => "an object",
        }
    }
}

/// One `name = ...` entry awaiting consumption. The payload is taken out
/// when a loader consumes it.
#[derive(Debug)]
pub(crate) struct PendingValue<T> {
    pub(crate) name: String,
    /// Class of the `IsA` section the entry appeared in
    pub(crate) section: Option<String>,
    payload: Option<Payload<T>>,
}

impl<T> PendingValue<T> {
    pub(crate) fn is_consumed(&self) -> bool {
        self.payload.is_none()
    }
}

/// The buffered contents of one object.
#[derive(Debug)]
pub(crate) struct Frame<T> {
    /// Class named by `Begin`
    pub(crate) class: String,
    /// Field of the enclosing object this one is the value of; `None` at
    /// top level
    pub(crate) field: Option<String>,
    /// Class of the most recent `IsA`, if any
    pub(crate) section: Option<String>,
    /// Every class named by an `IsA`, in order
    pub(crate) sections: Vec<String>,
    /// Class whose loader is currently running
    pub(crate) window: Option<String>,
    values: Vec<PendingValue<T>>,
    pub(crate) ended: bool,
}

impl<T> Frame<T> {
    pub(crate) fn new(class: impl Into<String>) -> Self {
        Frame {
            class: class.into(),
            field: None,
            section: None,
            sections: Vec::new(),
            window: None,
            values: Vec::new(),
            ended: false,
        }
    }

    /// A frame for an object announced by `field =` in the enclosing frame.
    pub(crate) fn nested(class: impl Into<String>, field: String) -> Self {
        Frame {
            field: Some(field),
            ..Frame::new(class)
        }
    }

    pub(crate) fn open_section(&mut self, class: &str) {
        self.section = Some(class.to_string());
        self.sections.push(class.to_string());
    }

    pub(crate) fn push_scalar(&mut self, name: String, value: Scalar) {
        self.push(name, Payload::Scalar(value));
    }

    pub(crate) fn push_object(&mut self, name: String, object: T) {
        self.push(name, Payload::Object(object));
    }

    fn push(&mut self, name: String, payload: Payload<T>) {
        self.values.push(PendingValue {
            name,
            section: self.section.clone(),
            payload: Some(payload),
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    fn visible(&self, entry: &PendingValue<T>, name: &str) -> bool {
        if entry.is_consumed() || !entry.name.eq_ignore_ascii_case(name) {
            return false;
        }
        match (&self.window, &entry.section) {
            (Some(window), Some(section)) => window == section,
            _ => true,
        }
    }

    /// Returns `true` if [`take`](Self::take) would find an entry.
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|entry| self.visible(entry, name))
    }

    /// Consumes the first unconsumed entry called `name`.
    ///
    /// Names match case-insensitively. While a class window is open, only
    /// entries from that class's section (or from before any `IsA`) match.
    pub(crate) fn take(&mut self, name: &str) -> Option<Payload<T>> {
        let index = self
            .values
            .iter()
            .position(|entry| self.visible(entry, name))?;
        self.values[index].payload.take()
    }

    /// Removes and returns every entry nobody consumed, in wire order.
    pub(crate) fn leftovers(&mut self) -> Vec<PendingValue<T>> {
        let mut leftovers = Vec::new();
        for entry in self.values.drain(..) {
            if !entry.is_consumed() {
                leftovers.push(entry);
            }
        }
        leftovers
    }
}

/// The frames of every object currently open, outermost first.
#[derive(Debug)]
pub(crate) struct FrameStack<T> {
    frames: Vec<Frame<T>>,
}

impl<T> FrameStack<T> {
    pub(crate) fn new() -> Self {
        FrameStack { frames: Vec::new() }
    }

    pub(crate) fn push(&mut self, frame: Frame<T>) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) -> Option<Frame<T>> {
        self.frames.pop()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame<T>> {
        self.frames.last_mut()
    }

    /// Nesting depth of the innermost open object. The top-level object is
    /// at depth 0.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }
}
