//! Writing objects.
//!
//! An object is written as a `Begin` line, one `IsA` section per class in
//! its ancestor chain (base first), and an `End` line. Within a section,
//! each class writes its own fields through a [`Dump`]:
//!
//! ```text
//! Begin Foo
//! IsA Base
//! N = 3
//! IsA Foo
//! Label = "x"
//! End Foo
//! ```
//!
//! A field is described by a [`Field`]: its name and value, whether the
//! value differs from the class default (`set`), whether showing the
//! default is useful to a reader (`helpful`), and an optional comment.
//! Fields at their default are omitted, or written commented out, depending
//! on the channel's `Full` and `Comment` attributes:
//!
//! | `set` | `helpful` | `Full = -1` | `Full = 0`    | `Full = 1`    |
//! |-------|-----------|-------------|---------------|---------------|
//! | yes   | any       | written     | written       | written       |
//! | no    | yes       | omitted     | commented out | commented out |
//! | no    | no        | omitted     | omitted       | commented out |
//!
//! Nothing is ever commented out while `Comment` is off.
//!
//! ## Examples
//!
//! ```rust
//! use objchan::{Field, Value};
//!
//! let field = Field::new("Indent", 3).set(false).helpful(true).comment("Spaces per level");
//! assert_eq!(field.name(), "Indent");
//! assert_eq!(Value::from(*field.value()), Value::Int(3));
//! ```

use crate::io::LineWriter;
use crate::item::{is_class_name, is_identifier};
use crate::{Attributes, Error, Full, Item, Persist, Result, Scalar, Value};

/// One field to be written.
#[derive(Debug, Clone)]
pub struct Field<'n, V> {
    name: &'n str,
    value: V,
    set: bool,
    helpful: bool,
    comment: Option<&'n str>,
}

impl<'n, V> Field<'n, V> {
    /// A field that is set, not marked helpful, and has no comment.
    pub fn new(name: &'n str, value: V) -> Self {
        Field {
            name,
            value,
            set: true,
            helpful: false,
            comment: None,
        }
    }

    /// Whether the value differs from the class default.
    #[must_use]
    pub fn set(mut self, set: bool) -> Self {
        self.set = set;
        self
    }

    /// Whether the default value is worth showing at normal verbosity.
    #[must_use]
    pub fn helpful(mut self, helpful: bool) -> Self {
        self.helpful = helpful;
        self
    }

    /// A comment written after the value. It must fit on one line.
    #[must_use]
    pub fn comment(mut self, comment: &'n str) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

/// Output of one object: finished lines, and nested objects still to be
/// expanded in place.
enum Piece<'a, T> {
    Line(String),
    Object {
        object: &'a T,
        depth: usize,
        commented_out: bool,
    },
}

/// Writes the fields of one class section.
///
/// Handed to [`Persist::dump`] once per class in the ancestor chain. Nested
/// objects are not written on the spot; they are expanded after their
/// parent's section, so nesting depth is limited only by memory.
pub struct Dump<'a, T> {
    attrs: &'a Attributes,
    depth: usize,
    commented_out: bool,
    pieces: Vec<Piece<'a, T>>,
}

impl<'a, T: Persist> Dump<'a, T> {
    /// Nesting depth of the object being written. Top-level objects are at
    /// depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        self.attrs
    }

    /// Writes a scalar field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for a name that is not an
    /// identifier, or a string or comment containing a line break.
    pub fn scalar<V: Into<Value>>(&mut self, field: Field<'_, V>) -> Result<()> {
        check_field_name(field.name)?;
        check_comment(field.comment)?;
        let value: Value = field.value.into();
        value.validate()?;

        let Some(commented_out) = self.placement(field.set, field.helpful) else {
            return Ok(());
        };
        let item = Item::Assign {
            name: field.name.to_string(),
            value: Scalar::from(&value),
            comment: self.field_comment(field.comment, field.set),
        };
        self.emit(&item, commented_out);
        Ok(())
    }

    /// Writes a field whose value is a nested object, as `name =` followed
    /// by the object's own `Begin ... End` block one level deeper.
    ///
    /// The nested object belongs to the same family as its parent, since it
    /// is read back through the same [`Persist`] implementation.
    ///
    /// # Errors
    ///
    /// As [`scalar`](Self::scalar). Problems with the nested object itself
    /// surface from the enclosing write.
    pub fn object(&mut self, field: Field<'_, &'a T>) -> Result<()> {
        check_field_name(field.name)?;
        check_comment(field.comment)?;
        let Some(commented_out) = self.placement(field.set, field.helpful) else {
            return Ok(());
        };
        let item = Item::ObjectFollows {
            name: field.name.to_string(),
            comment: self.field_comment(field.comment, field.set),
        };
        self.emit(&item, commented_out);
        self.pieces.push(Piece::Object {
            object: field.value,
            depth: self.depth + 1,
            commented_out,
        });
        Ok(())
    }

    /// Decides whether a field is written, and if so whether commented out.
    fn placement(&self, set: bool, helpful: bool) -> Option<bool> {
        if set {
            return Some(self.commented_out);
        }
        if !self.attrs.comment() {
            return None;
        }
        match self.attrs.full() {
            Full::Verbose => Some(true),
            Full::Normal if helpful => Some(true),
            _ => None,
        }
    }

    fn field_comment(&self, comment: Option<&str>, set: bool) -> Option<String> {
        if !self.attrs.comment() {
            return None;
        }
        if !set && self.attrs.full() == Full::Verbose {
            return Some(match comment {
                Some(text) => format!("{} (default)", text),
                None => "(default)".to_string(),
            });
        }
        comment.map(str::to_string)
    }

    fn emit(&mut self, item: &Item, commented_out: bool) {
        let line = item.render(self.attrs.indent(), self.depth, commented_out);
        self.pieces.push(Piece::Line(line));
    }
}

fn check_field_name(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(Error::unsupported_value(&format!(
            "\"{}\" is not a valid field name",
            name
        )))
    }
}

fn check_comment(comment: Option<&str>) -> Result<()> {
    match comment {
        Some(text) if text.contains(['\n', '\r']) => Err(Error::unsupported_value(&format!(
            "comment {:?} contains a line break",
            text
        ))),
        _ => Ok(()),
    }
}

fn check_class_name(class: &str) -> Result<()> {
    if is_class_name(class) {
        Ok(())
    } else {
        Err(Error::unsupported_value(&format!(
            "\"{}\" is not a valid class name",
            class
        )))
    }
}

fn class_comment<T: Persist>(attrs: &Attributes, class: &str) -> Result<Option<String>> {
    let comment = T::class_comment(class);
    check_comment(comment)?;
    if attrs.comment() && attrs.full() != Full::Terse {
        Ok(comment.map(str::to_string))
    } else {
        Ok(None)
    }
}

/// Runs every dump step of one object, leaving its nested objects
/// unexpanded.
fn expand<'a, T: Persist>(
    object: &'a T,
    attrs: &'a Attributes,
    depth: usize,
    commented_out: bool,
) -> Result<Vec<Piece<'a, T>>> {
    let class = object.class_name();
    check_class_name(class)?;
    let chain = T::ancestry_of(class).ok_or_else(|| Error::unknown_class(class))?;
    tracing::debug!(%class, depth, "writing object");

    let mut dump = Dump {
        attrs,
        depth,
        commented_out,
        pieces: Vec::new(),
    };
    dump.emit(
        &Item::Begin {
            class: class.to_string(),
            comment: class_comment::<T>(attrs, class)?,
        },
        commented_out,
    );
    for ancestor in chain {
        check_class_name(ancestor)?;
        dump.emit(
            &Item::IsA {
                class: ancestor.to_string(),
                comment: class_comment::<T>(attrs, ancestor)?,
            },
            commented_out,
        );
        object.dump(ancestor, &mut dump)?;
    }
    dump.emit(
        &Item::End {
            class: class.to_string(),
        },
        commented_out,
    );
    Ok(dump.pieces)
}

/// Writes one top-level object and everything nested in it, then flushes
/// the sink.
///
/// Nested objects are expanded from an explicit work stack rather than by
/// recursion.
pub(crate) fn write_top<T: Persist>(
    writer: &mut LineWriter<'_>,
    attrs: &Attributes,
    object: &T,
) -> Result<()> {
    let start = writer.lines();
    let mut pending = vec![expand(object, attrs, 0, false)?.into_iter()];
    let mut deepest = 0;
    while let Some(pieces) = pending.last_mut() {
        match pieces.next() {
            Some(Piece::Line(line)) => writer.put_line(&line)?,
            Some(Piece::Object {
                object,
                depth,
                commented_out,
            }) => {
                deepest = deepest.max(depth);
                pending.push(expand(object, attrs, depth, commented_out)?.into_iter());
            }
            None => {
                pending.pop();
            }
        }
    }
    writer.flush()?;
    tracing::debug!(
        class = object.class_name(),
        lines = writer.lines() - start,
        depth = deepest,
        "wrote object"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Load;

    /// A class with one helpful field and one plain field, both optional.
    #[derive(Debug, PartialEq)]
    struct Sample {
        a: i64,
        b: f64,
        text: String,
    }

    impl Persist for Sample {
        fn class_name(&self) -> &'static str {
            "Sample"
        }

        fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
            const CHAIN: &[&str] = &["Sample"];
            (class == "Sample").then_some(CHAIN)
        }

        fn class_comment(_class: &str) -> Option<&'static str> {
            Some("A sample")
        }

        fn dump<'a>(&'a self, _class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
            dump.scalar(
                Field::new("A", self.a)
                    .set(self.a != 0)
                    .helpful(true)
                    .comment("First"),
            )?;
            dump.scalar(Field::new("B", self.b).set(self.b != 0.0))?;
            dump.scalar(Field::new("Text", self.text.as_str()))
        }

        fn load(_class: &str, _partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
            Ok(Sample {
                a: load.read_int("A", 0),
                b: load.read_double("B", 0.0),
                text: load.read_string("Text").unwrap_or_default(),
            })
        }
    }

    fn render(sample: &Sample, attrs: Attributes) -> Vec<String> {
        let mut out = Vec::new();
        {
            let mut writer = LineWriter::new(&mut out);
            write_top(&mut writer, &attrs, sample).unwrap();
        }
        out
    }

    fn defaults() -> Sample {
        Sample {
            a: 0,
            b: 0.0,
            text: "t".into(),
        }
    }

    #[test]
    fn test_defaults_omitted_without_comments() {
        let lines = render(&defaults(), Attributes::new().with_comment(false));
        assert_eq!(
            lines,
            vec!["Begin Sample", "IsA Sample", "Text = \"t\"", "End Sample"]
        );
    }

    #[test]
    fn test_helpful_default_commented_out() {
        let lines = render(&defaults(), Attributes::new());
        assert!(lines[0].starts_with("Begin Sample"));
        assert!(lines[0].ends_with("# A sample"));
        assert!(lines[2].starts_with("#A = 0"));
        assert!(lines[2].ends_with("# First"));
        assert!(!lines.iter().any(|l| l.contains("B =")));
    }

    #[test]
    fn test_verbose_marks_defaults() {
        let lines = render(&defaults(), Attributes::new().with_full(Full::Verbose));
        assert!(lines[2].ends_with("# First (default)"));
        assert!(lines[3].starts_with("#B = 0.0"));
        assert!(lines[3].ends_with("# (default)"));
    }

    #[test]
    fn test_terse_drops_class_comments() {
        let lines = render(&defaults(), Attributes::new().with_full(Full::Terse));
        assert_eq!(lines[0], "Begin Sample");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_set_values_indented() {
        let sample = Sample {
            a: 5,
            b: 0.5,
            text: "q\"q".into(),
        };
        let lines = render(&sample, Attributes::new().with_comment(false));
        assert_eq!(
            lines,
            vec![
                "Begin Sample",
                "IsA Sample",
                "A = 5",
                "B = 0.5",
                "Text = \"q\"\"q\"",
                "End Sample"
            ]
        );
    }

    #[test]
    fn test_rejects_line_breaks() {
        let sample = Sample {
            a: 1,
            b: 0.0,
            text: "two\nlines".into(),
        };
        let mut writer = LineWriter::new(crate::io::NullSink);
        let err = write_top(&mut writer, &Attributes::new(), &sample).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue(_)));
    }

    #[test]
    fn test_field_builder() {
        let field = Field::new("X", 1.5).set(false).helpful(true).comment("c");
        assert_eq!(field.name(), "X");
        assert_eq!(*field.value(), 1.5);
        assert!(!field.set);
        assert!(field.helpful);
        assert_eq!(field.comment, Some("c"));
    }

    /// `Plain` writes one field with the given comment. `Odd` has a class
    /// comment spanning two lines.
    enum Noted {
        Plain(&'static str),
        Odd,
    }

    impl Persist for Noted {
        fn class_name(&self) -> &'static str {
            match self {
                Noted::Plain(_) => "Plain",
                Noted::Odd => "Odd",
            }
        }

        fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
            const PLAIN: &[&str] = &["Plain"];
            const ODD: &[&str] = &["Odd"];
            match class {
                "Plain" => Some(PLAIN),
                "Odd" => Some(ODD),
                _ => None,
            }
        }

        fn class_comment(class: &str) -> Option<&'static str> {
            (class == "Odd").then_some("first\nsecond")
        }

        fn dump<'a>(&'a self, _class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
            match self {
                Noted::Plain(comment) => dump.scalar(Field::new("N", 3).comment(comment)),
                Noted::Odd => Ok(()),
            }
        }

        fn load(_class: &str, _partial: Option<Self>, _load: &mut Load<'_, Self>) -> Result<Self> {
            Ok(Noted::Odd)
        }
    }

    #[test]
    fn test_rejects_multiline_comments() {
        let mut writer = LineWriter::new(crate::io::NullSink);
        let attrs = Attributes::new();
        for noted in [
            Noted::Plain("first line\nsecond line"),
            Noted::Plain("carriage\r"),
            Noted::Odd,
        ] {
            let err = write_top(&mut writer, &attrs, &noted).unwrap_err();
            assert!(matches!(err, Error::UnsupportedValue(_)));
        }
        assert_eq!(writer.lines(), 0);

        // Rejected even while comments are not being written
        let quiet = Attributes::new().with_comment(false);
        assert!(write_top(&mut writer, &quiet, &Noted::Odd).is_err());
        assert!(write_top(&mut writer, &quiet, &Noted::Plain("fine")).is_ok());
    }
}
