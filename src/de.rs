//! Reading objects.
//!
//! Reading one object happens in two phases:
//!
//! 1. **Drain.** After `Begin`, every item up to the matching `End` is
//!    buffered in a frame. A `name =` line must be followed by a nested
//!    `Begin`, which pushes a new frame; when that object ends it is
//!    loaded and its finished value buffered under `name` in the frame
//!    below. Frames live on an explicit stack, so nesting depth is bounded
//!    only by memory.
//! 2. **Load.** The object model's loader for each class in the ancestor
//!    chain runs in turn, base first, pulling its own fields out of the
//!    frame through a [`Load`]. Whatever nobody consumed is then reported.
//!
//! Problems with individual values never abort a read. A field that does
//! not convert to the requested type yields the caller's default plus a
//! [`Severity::Error`] warning; unknown fields yield [`Severity::Warning`]
//! warnings, or [`Error::Unconsumed`] when the channel is strict.
//! Malformed structure always aborts the read, and everything built so far
//! is dropped.

use crate::frame::{Frame, FrameStack, Payload};
use crate::io::LineReader;
use crate::warning::WarningLog;
use crate::{parse_line, Attributes, Error, Item, Persist, Result, Scalar, Severity};

/// Gives a class loader access to the fields of the object being read.
///
/// Every `read_*` method consumes the first matching field that has not
/// been consumed yet, so repeated reads of a duplicated name return the
/// duplicates in the order they were written. Names match
/// case-insensitively. A missing field silently yields the default.
///
/// # Examples
///
/// ```rust
/// use objchan::{Dump, Field, Load, Persist, Result};
///
/// #[derive(Debug, PartialEq)]
/// struct Pair(i64, String);
///
/// impl Persist for Pair {
///     fn class_name(&self) -> &'static str { "Pair" }
///     fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
///         const CHAIN: &[&str] = &["Pair"];
///         (class == "Pair").then_some(CHAIN)
///     }
///     fn dump<'a>(&'a self, _: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
///         dump.scalar(Field::new("Left", self.0))?;
///         dump.scalar(Field::new("Right", self.1.as_str()))
///     }
///     fn load(_: &str, _: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
///         let left = load.read::<i64>("left", -1);
///         let right = load.read_string("RIGHT").unwrap_or_default();
///         Ok(Pair(left, right))
///     }
/// }
///
/// let pair: Option<Pair> = objchan::from_str("Begin Pair\nLeft = 4\nRight = \"r\"\nEnd Pair").unwrap();
/// assert_eq!(pair, Some(Pair(4, "r".to_string())));
/// ```
pub struct Load<'a, T> {
    frame: &'a mut Frame<T>,
    log: &'a mut WarningLog,
}

impl<'a, T> Load<'a, T> {
    /// The class whose fields are currently being read: the open class
    /// window, or the object's own class when no window is open.
    #[must_use]
    pub fn class(&self) -> &str {
        self.frame.window.as_deref().unwrap_or(&self.frame.class)
    }

    /// The most-derived class of the object being read.
    #[must_use]
    pub fn object_class(&self) -> &str {
        &self.frame.class
    }

    /// Restricts subsequent reads to fields written in `class`'s `IsA`
    /// section (and fields written before any `IsA`).
    pub fn begin_class(&mut self, class: &str) {
        self.frame.window = Some(class.to_string());
    }

    /// Lifts the restriction set by [`begin_class`](Self::begin_class).
    pub fn end_class(&mut self) {
        self.frame.window = None;
    }

    /// Returns `true` if an unconsumed field called `name` is available.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.frame.contains(name)
    }

    /// Records a warning against the current class.
    pub fn warn(&mut self, severity: Severity, message: impl Into<String>) {
        let class = self.class().to_string();
        self.log.add(severity, &class, message);
    }

    /// Reads a scalar field, converting it to `V`.
    ///
    /// Returns `default` if the field is absent. If it is present but does
    /// not convert, or holds an object, an error-severity warning is
    /// recorded and `default` is returned.
    pub fn read<V>(&mut self, name: &str, default: V) -> V
    where
        V: for<'s> TryFrom<&'s Scalar, Error = Error>,
    {
        match self.frame.take(name) {
            None => default,
            Some(Payload::Scalar(scalar)) => match V::try_from(&scalar) {
                Ok(value) => value,
                Err(err) => {
                    let detail = match err {
                        Error::Custom(msg) => msg,
                        other => other.to_string(),
                    };
                    self.warn(
                        Severity::Error,
                        format!("invalid value for \"{}\" ({}); default used", name, detail),
                    );
                    default
                }
            },
            Some(payload) => {
                self.mismatch(name, &payload, "a value");
                default
            }
        }
    }

    pub fn read_int(&mut self, name: &str, default: i64) -> i64 {
        self.read(name, default)
    }

    pub fn read_double(&mut self, name: &str, default: f64) -> f64 {
        self.read(name, default)
    }

    /// Reads a string field. `None` if absent or not a scalar.
    pub fn read_string(&mut self, name: &str) -> Option<String> {
        match self.frame.take(name)? {
            Payload::Scalar(scalar) => Some(scalar.text().to_string()),
            payload => {
                self.mismatch(name, &payload, "a value");
                None
            }
        }
    }

    /// Takes ownership of a nested object field. `None` if absent or not an
    /// object.
    pub fn read_object(&mut self, name: &str) -> Option<T> {
        match self.frame.take(name)? {
            Payload::Object(object) => Some(object),
            payload => {
                self.mismatch(name, &payload, "an object");
                None
            }
        }
    }

    fn mismatch(&mut self, name: &str, found: &Payload<T>, expected: &str) {
        self.warn(
            Severity::Error,
            format!(
                "expected {} for \"{}\" but found {}; default used",
                expected,
                name,
                found.kind()
            ),
        );
    }
}

/// Reads items from a line reader and builds objects from them.
pub(crate) struct Reader<'a, 'io> {
    lines: &'a mut LineReader<'io>,
    attrs: &'a Attributes,
    log: &'a mut WarningLog,
}

impl<'a, 'io> Reader<'a, 'io> {
    pub(crate) fn new(
        lines: &'a mut LineReader<'io>,
        attrs: &'a Attributes,
        log: &'a mut WarningLog,
    ) -> Self {
        Reader { lines, attrs, log }
    }

    /// Reads the next line that is channel syntax, discarding foreign lines
    /// in skip mode. `None` at end of input.
    fn next_item(&mut self) -> Result<Option<(Item, String)>> {
        while let Some(line) = self.lines.next_line()? {
            if let Some(item) = parse_line(&line) {
                return Ok(Some((item, line)));
            }
            self.foreign(&line, "unrecognised line")?;
        }
        Ok(None)
    }

    /// Like [`next_item`](Self::next_item), also skipping blanks and
    /// comments.
    fn next_significant(&mut self) -> Result<Option<(Item, String)>> {
        while let Some((item, line)) = self.next_item()? {
            if !item.is_insignificant() {
                return Ok(Some((item, line)));
            }
        }
        Ok(None)
    }

    /// Discards a line in skip mode, or fails with a syntax error.
    fn foreign(&mut self, line: &str, msg: &str) -> Result<()> {
        let number = self.lines.line();
        if !self.attrs.skip() {
            return Err(Error::syntax(number, msg, line));
        }
        tracing::trace!(line = number, "skipped foreign line");
        self.log
            .add(Severity::Info, "", format!("skipped line {}: {}", number, line.trim()));
        Ok(())
    }

    /// Reads the next top-level object, or `None` at end of input.
    pub(crate) fn read_top<T: Persist>(&mut self) -> Result<Option<T>> {
        while let Some((item, line)) = self.next_significant()? {
            match item {
                Item::Begin { class, .. } => {
                    let start = self.lines.line();
                    let object = self.read_object::<T>(class)?;
                    tracing::debug!(
                        lines = self.lines.line() + 1 - start,
                        warnings = self.log.len(),
                        "read object"
                    );
                    return Ok(Some(object));
                }
                Item::End { class } if !self.attrs.skip() => {
                    return Err(Error::unmatched_end(self.lines.line(), &class));
                }
                _ => self.foreign(&line, "expected Begin")?,
            }
        }
        Ok(None)
    }

    /// Reads the object whose `Begin` has just been consumed, together with
    /// everything nested in it.
    fn read_object<T: Persist>(&mut self, class: String) -> Result<T> {
        let mut stack = FrameStack::new();
        tracing::debug!(%class, depth = 0, "reading object");
        stack.push(Frame::new(class));

        loop {
            let next = self.next_significant()?;
            let frame = top(&mut stack)?;
            let Some((item, line)) = next else {
                return Err(Error::unexpected_eof(self.lines.line(), &frame.class));
            };
            match item {
                Item::IsA { class: section, .. } => frame.open_section(&section),
                Item::Assign { name, value, .. } => frame.push_scalar(name, value),
                Item::ObjectFollows { name, .. } => {
                    let parent = frame.class.clone();
                    let nested = match self.next_significant()? {
                        Some((Item::Begin { class: nested, .. }, _)) => nested,
                        Some((_, line)) => {
                            return Err(Error::syntax(
                                self.lines.line(),
                                &format!("expected Begin for the value of \"{}\"", name),
                                &line,
                            ))
                        }
                        None => return Err(Error::unexpected_eof(self.lines.line(), &parent)),
                    };
                    stack.push(Frame::nested(nested, name));
                    let depth = stack.depth();
                    if let Some(frame) = stack.top_mut() {
                        tracing::debug!(class = %frame.class, depth, "reading object");
                    }
                }
                Item::Begin { .. } => {
                    return Err(Error::syntax(
                        self.lines.line(),
                        "nested Begin without a preceding \"name =\"",
                        &line,
                    ))
                }
                Item::End { class: found } => {
                    if found != frame.class {
                        return Err(Error::mismatched_end(
                            self.lines.line(),
                            &frame.class,
                            &found,
                        ));
                    }
                    frame.ended = true;
                    let depth = stack.depth();
                    let mut finished = stack
                        .pop()
                        .ok_or_else(|| Error::custom("no object is open"))?;
                    let object = construct(&mut finished, self.log, self.attrs.strict())?;
                    tracing::debug!(class = %finished.class, depth, "closed object");
                    match (finished.field, stack.top_mut()) {
                        (_, None) => return Ok(object),
                        (Some(field), Some(parent)) => parent.push_object(field, object),
                        (None, Some(_)) => return Err(Error::custom("nested object has no field")),
                    }
                }
                Item::Blank | Item::Comment(_) => {}
            }
        }
    }
}

fn top<T>(stack: &mut FrameStack<T>) -> Result<&mut Frame<T>> {
    stack
        .top_mut()
        .ok_or_else(|| Error::custom("no object is open"))
}

/// Runs the loader chain over a fully drained frame.
fn construct<T: Persist>(frame: &mut Frame<T>, log: &mut WarningLog, strict: bool) -> Result<T> {
    let class = frame.class.clone();
    let chain = T::ancestry_of(&class).ok_or_else(|| Error::unknown_class(&class))?;

    for section in &frame.sections {
        if !chain.iter().any(|ancestor| ancestor == section) {
            log.add(
                Severity::Warning,
                &class,
                format!("\"IsA {}\" does not name an ancestor of {}", section, class),
            );
        }
    }

    let fields = frame.len();
    let mut load = Load { frame, log };
    let mut partial = None;
    for ancestor in chain {
        load.begin_class(ancestor);
        let built = T::load(ancestor, partial.take(), &mut load)?;
        load.end_class();
        partial = Some(built);
    }
    let object = partial.ok_or_else(|| Error::unknown_class(&class))?;

    let leftovers = load.frame.leftovers();
    tracing::trace!(
        %class,
        fields,
        ended = load.frame.ended,
        leftovers = leftovers.len(),
        "loaded object"
    );
    if leftovers.is_empty() {
        return Ok(object);
    }
    let names: Vec<String> = leftovers.into_iter().map(|entry| entry.name).collect();
    if strict {
        return Err(Error::unconsumed(&class, names));
    }
    for name in names {
        load.log.add(
            Severity::Warning,
            &class,
            format!("unexpected field \"{}\" was ignored", name),
        );
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::StrSource;
    use crate::{Dump, ReportLevel, Warnings};

    /// Two classes: `Cell` (base, field `V`) and `Wrap` (derived, object
    /// field `Inner`).
    #[derive(Debug, PartialEq)]
    enum Shape {
        Cell { v: i64 },
        Wrap { v: i64, inner: Option<Box<Shape>> },
    }

    impl Persist for Shape {
        fn class_name(&self) -> &'static str {
            match self {
                Shape::Cell { .. } => "Cell",
                Shape::Wrap { .. } => "Wrap",
            }
        }

        fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
            const CELL: &[&str] = &["Cell"];
            const WRAP: &[&str] = &["Cell", "Wrap"];
            match class {
                "Cell" => Some(CELL),
                "Wrap" => Some(WRAP),
                _ => None,
            }
        }

        fn dump<'a>(&'a self, _class: &str, _dump: &mut Dump<'a, Self>) -> Result<()> {
            Ok(())
        }

        fn load(class: &str, partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
            match (class, partial) {
                ("Cell", _) => {
                    let v = load.read_int("V", 0);
                    if v < 0 {
                        let msg = format!("negative value in a {}", load.object_class());
                        load.warn(Severity::Warning, msg);
                    }
                    Ok(Shape::Cell { v })
                }
                ("Wrap", Some(Shape::Cell { v })) => Ok(Shape::Wrap {
                    v,
                    inner: load.read_object("Inner").map(Box::new),
                }),
                _ => Err(Error::custom("bad chain")),
            }
        }
    }

    fn read(text: &str, attrs: Attributes) -> (Result<Option<Shape>>, Warnings) {
        let mut lines = LineReader::new(StrSource::new(text));
        let mut log = WarningLog::new(attrs.report_level());
        let result = Reader::new(&mut lines, &attrs, &mut log).read_top::<Shape>();
        (result, log.finish())
    }

    #[test]
    fn test_nested_object() {
        let text = "Begin Wrap\nIsA Cell\nV = 1\nIsA Wrap\nInner =\n  Begin Cell\n  IsA Cell\n  V = 2\n  End Cell\nEnd Wrap\n";
        let (result, warnings) = read(text, Attributes::new());
        assert_eq!(
            result.unwrap(),
            Some(Shape::Wrap {
                v: 1,
                inner: Some(Box::new(Shape::Cell { v: 2 }))
            })
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bad_value_uses_default() {
        let (result, warnings) = read("Begin Cell\nV = twelve\nEnd Cell", Attributes::new());
        assert_eq!(result.unwrap(), Some(Shape::Cell { v: 0 }));
        assert_eq!(warnings.len(), 1);
        let warning = warnings.get(1).unwrap();
        assert_eq!(warning.severity, Severity::Error);
        assert_eq!(warning.class, "Cell");
        assert!(warning.message.contains("\"V\""));
    }

    #[test]
    fn test_kind_mismatch_is_consumed() {
        let text = "Begin Cell\nV =\nBegin Cell\nEnd Cell\nEnd Cell";
        let (result, warnings) = read(text, Attributes::new().with_strict(true));
        assert_eq!(result.unwrap(), Some(Shape::Cell { v: 0 }));
        assert_eq!(warnings.len(), 1);
        assert!(warnings.messages()[0].contains("found an object"));
    }

    #[test]
    fn test_stray_isa_warns() {
        let (result, warnings) = read("Begin Cell\nIsA Other\nEnd Cell", Attributes::new());
        assert!(result.unwrap().is_some());
        assert!(warnings.messages()[0].contains("IsA Other"));
    }

    #[test]
    fn test_begin_without_name() {
        let (result, _) = read("Begin Wrap\nBegin Cell\nEnd Cell\nEnd Wrap", Attributes::new());
        assert!(matches!(result, Err(Error::Syntax { line: 2, .. })));
    }

    #[test]
    fn test_object_follows_needs_begin() {
        let (result, _) = read("Begin Wrap\nInner =\nV = 1\nEnd Wrap", Attributes::new());
        assert!(matches!(result, Err(Error::Syntax { line: 3, .. })));
    }

    #[test]
    fn test_unknown_class() {
        let (result, _) = read("Begin Circle\nEnd Circle", Attributes::new());
        assert!(matches!(result, Err(Error::UnknownClass { .. })));
    }

    #[test]
    fn test_eof_inside_nested_object() {
        let (result, _) = read("Begin Wrap\nInner =\nBegin Cell\nV = 1", Attributes::new());
        match result {
            Err(Error::UnexpectedEof { line, class }) => {
                assert_eq!(line, 4);
                assert_eq!(class, "Cell");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_skipped_lines_are_info() {
        let attrs = Attributes::new()
            .with_skip(true)
            .with_report_level(ReportLevel::All);
        let (result, warnings) = read("garbage\nBegin Cell\n!!\nEnd Cell", attrs);
        assert!(result.unwrap().is_some());
        assert_eq!(warnings.len(), 2);
        assert!(warnings.values().all(|w| w.severity == Severity::Info));
    }

    #[test]
    fn test_loader_warning_names_window_class() {
        let text = "Begin Wrap\nIsA Cell\nV = -1\nIsA Wrap\nEnd Wrap";
        let (result, warnings) = read(text, Attributes::new());
        assert_eq!(result.unwrap(), Some(Shape::Wrap { v: -1, inner: None }));
        assert_eq!(warnings.len(), 1);
        let warning = warnings.get(1).unwrap();
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.class, "Cell");
        assert_eq!(warning.message, "negative value in a Wrap");
    }
}
