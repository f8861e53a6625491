//! # objchan
//!
//! A line-oriented text channel for writing polymorphic object graphs and
//! reading them back.
//!
//! ## What is a channel?
//!
//! A channel turns objects into plain text and back. The text names the
//! class of every object and groups each object's fields by the class in
//! its ancestor chain that declares them, so a reader can rebuild an object
//! without knowing its concrete class in advance:
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
//! ## Key Features
//!
//! - **Polymorphic**: each object carries its class; loaders run base
//!   class first, each taking only the fields it owns
//! - **Nested objects**: a field can hold a complete object, to any depth
//! - **Tolerant**: unknown fields and bad values become warnings, not
//!   failures, unless the channel is strict
//! - **Embeddable**: in skip mode, channel text can be mixed with unrelated
//!   text
//! - **Pluggable transport**: read from and write to strings, readers,
//!   writers, files or closures, one line at a time
//! - **Exact numbers**: doubles are written with enough digits to read back
//!   bit for bit
//!
//! ## Quick Start
//!
//! Implement [`Persist`] for the family of classes to be carried, usually
//! an enum with one variant per concrete class:
//!
//! ```rust
//! use objchan::{from_str, to_string_with_attributes, Attributes};
//! use objchan::{Dump, Field, Load, Persist, Result};
//!
//! #[derive(Debug, PartialEq)]
//! enum Shape {
//!     Circle { id: i64, radius: f64 },
//!     Label { id: i64, text: String },
//! }
//!
//! impl Persist for Shape {
//!     fn class_name(&self) -> &'static str {
//!         match self {
//!             Shape::Circle { .. } => "Circle",
//!             Shape::Label { .. } => "Label",
//!         }
//!     }
//!
//!     fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
//!         const CIRCLE: &[&str] = &["Shape", "Circle"];
//!         const LABEL: &[&str] = &["Shape", "Label"];
//!         match class {
//!             "Circle" => Some(CIRCLE),
//!             "Label" => Some(LABEL),
//!             _ => None,
//!         }
//!     }
//!
//!     fn dump<'a>(&'a self, class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
//!         match (class, self) {
//!             ("Shape", Shape::Circle { id, .. } | Shape::Label { id, .. }) => {
//!                 dump.scalar(Field::new("Id", *id))
//!             }
//!             ("Circle", Shape::Circle { radius, .. }) => dump.scalar(Field::new("Radius", *radius)),
//!             ("Label", Shape::Label { text, .. }) => dump.scalar(Field::new("Text", text)),
//!             _ => Ok(()),
//!         }
//!     }
//!
//!     fn load(class: &str, partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
//!         let id = match partial {
//!             Some(Shape::Circle { id, .. } | Shape::Label { id, .. }) => id,
//!             None => load.read_int("Id", 0),
//!         };
//!         Ok(match class {
//!             "Circle" => Shape::Circle { id, radius: load.read_double("Radius", 1.0) },
//!             "Label" => Shape::Label { id, text: load.read_string("Text").unwrap_or_default() },
//!             // The base class only carries the id
//!             _ => Shape::Circle { id, radius: 1.0 },
//!         })
//!     }
//! }
//!
//! let shape = Shape::Label { id: 7, text: "hello".to_string() };
//! let text = to_string_with_attributes(&shape, Attributes::new().with_comment(false)).unwrap();
//! assert_eq!(text, "Begin Label\nIsA Shape\nId = 7\nIsA Label\nText = \"hello\"\nEnd Label\n");
//!
//! let back: Option<Shape> = from_str(&text).unwrap();
//! assert_eq!(back, Some(shape));
//! ```
//!
//! ### Channels
//!
//! For several objects, warnings, or non-default settings, use a
//! [`Channel`] directly:
//!
//! ```rust
//! use objchan::io::StrSource;
//! use objchan::Channel;
//! # use objchan::{Dump, Field, Load, Persist, Result};
//! # #[derive(Debug)]
//! # struct Note;
//! # impl Persist for Note {
//! #     fn class_name(&self) -> &'static str { "Note" }
//! #     fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
//! #         const CHAIN: &[&str] = &["Note"];
//! #         (class == "Note").then_some(CHAIN)
//! #     }
//! #     fn dump<'a>(&'a self, _: &str, _: &mut Dump<'a, Self>) -> Result<()> { Ok(()) }
//! #     fn load(_: &str, _: Option<Self>, _: &mut Load<'_, Self>) -> Result<Self> { Ok(Note) }
//! # }
//!
//! let text = "some log output\nBegin Note\nEnd Note\nmore output\nBegin Note\nEnd Note\n";
//! let mut channel = Channel::from_source(StrSource::new(text));
//! channel.set("Skip=1").unwrap();
//! let notes: Vec<Note> = channel.read_all().unwrap();
//! assert_eq!(notes.len(), 2);
//! ```
//!
//! ## Warnings and errors
//!
//! Recoverable problems found while reading are collected as
//! [`Warning`]s, available from [`Channel::warnings`] after each read.
//! Malformed text and, in strict mode, unknown fields are [`Error`]s that
//! fail the read; the channel stays usable afterwards.
//!
//! ## Logging
//!
//! The crate logs through [`tracing`](https://docs.rs/tracing): object
//! boundaries and file bindings at `debug`, skipped lines and leftover
//! fields at `trace`. Nothing is printed unless a subscriber is installed.
//!
//! ## Format
//!
//! See the [`format`] module for the complete text format.

pub mod channel;
pub mod de;
pub mod error;
pub mod format;
pub mod io;
pub mod item;
#[macro_use]
mod macros;
pub mod options;
pub mod persist;
pub mod ser;
pub mod value;
pub mod warning;

mod frame;

pub use channel::Channel;
pub use de::Load;
pub use error::{Error, Result};
pub use item::{parse_line, Item};
pub use options::{Attributes, Full, ReportLevel};
pub use persist::Persist;
pub use ser::{Dump, Field};
pub use value::{Scalar, Value};
pub use warning::{Severity, Warning, Warnings};

use crate::io::{ReaderSource, StrSource, WriterSink};
use std::io::{BufReader, Read, Write};

/// Writes one object to a string, with default attributes.
///
/// # Examples
///
/// ```rust
/// # use objchan::{Dump, Field, Load, Persist, Result};
/// # struct Unit;
/// # impl Persist for Unit {
/// #     fn class_name(&self) -> &'static str { "Unit" }
/// #     fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
/// #         const CHAIN: &[&str] = &["Unit"];
/// #         (class == "Unit").then_some(CHAIN)
/// #     }
/// #     fn dump<'a>(&'a self, _: &str, _: &mut Dump<'a, Self>) -> Result<()> { Ok(()) }
/// #     fn load(_: &str, _: Option<Self>, _: &mut Load<'_, Self>) -> Result<Self> { Ok(Unit) }
/// # }
/// let text = objchan::to_string(&Unit).unwrap();
/// assert_eq!(text, "Begin Unit\nIsA Unit\nEnd Unit\n");
/// ```
///
/// # Errors
///
/// Returns an error if the object cannot be written (an unknown class, an
/// invalid name, or a string containing a line break).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T: Persist>(object: &T) -> Result<String> {
    to_string_with_attributes(object, Attributes::default())
}

/// Writes one object to a string, with the given attributes.
///
/// File attributes are ignored.
///
/// # Errors
///
/// As [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_attributes<T: Persist>(object: &T, attrs: Attributes) -> Result<String> {
    let mut out = String::new();
    let mut attrs = attrs;
    attrs.clear_sink_file();
    {
        let mut channel = Channel::from_sink(&mut out).with_attributes(attrs);
        channel.write(object)?;
    }
    Ok(out)
}

/// Writes one object to an I/O stream.
///
/// # Errors
///
/// As [`to_string`], plus [`Error::Io`] if writing to the stream fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W: Write, T: Persist>(writer: W, object: &T) -> Result<()> {
    Channel::from_sink(WriterSink::new(writer)).write(object)
}

/// Reads the first object from a string, with default attributes.
///
/// Returns `Ok(None)` if the text contains no object. Warnings are
/// discarded; use a [`Channel`] to inspect them.
///
/// # Errors
///
/// Returns an error if the text is malformed or names an unknown class.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T: Persist>(s: &str) -> Result<Option<T>> {
    from_str_with_attributes(s, Attributes::default())
}

/// Reads the first object from a string, with the given attributes.
///
/// File attributes are ignored.
///
/// # Errors
///
/// As [`from_str`], plus unconsumed fields when `Strict` is set.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_attributes<T: Persist>(s: &str, attrs: Attributes) -> Result<Option<T>> {
    let mut attrs = attrs;
    attrs.clear_source_file();
    Channel::from_source(StrSource::new(s))
        .with_attributes(attrs)
        .read()
}

/// Reads the first object from an I/O stream.
///
/// # Errors
///
/// As [`from_str`], plus [`Error::Io`] if reading from the stream fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: Read, T: Persist>(reader: R) -> Result<Option<T>> {
    Channel::from_source(ReaderSource::new(BufReader::new(reader))).read()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        a: i64,
        b: String,
    }

    impl Persist for Pair {
        fn class_name(&self) -> &'static str {
            "Pair"
        }

        fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
            const CHAIN: &[&str] = &["Pair"];
            (class == "Pair").then_some(CHAIN)
        }

        fn dump<'a>(&'a self, _class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
            dump.scalar(Field::new("A", self.a))?;
            dump.scalar(Field::new("B", &self.b))
        }

        fn load(_class: &str, _partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
            Ok(Pair {
                a: load.read_int("A", 0),
                b: load.read_string("B").unwrap_or_default(),
            })
        }
    }

    #[test]
    fn test_to_string_and_back() {
        let pair = Pair {
            a: -3,
            b: "x # y".into(),
        };
        let text = to_string(&pair).unwrap();
        assert_eq!(text, "Begin Pair\nIsA Pair\nA = -3\nB = \"x # y\"\nEnd Pair\n");
        assert_eq!(from_str::<Pair>(&text).unwrap(), Some(pair));
    }

    #[test]
    fn test_writer_and_reader() {
        let pair = Pair {
            a: 1,
            b: String::new(),
        };
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &pair).unwrap();
        let back: Option<Pair> = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(back, Some(pair));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(from_str::<Pair>("").unwrap(), None);
        assert_eq!(from_str::<Pair>("\n  # only a comment\n").unwrap(), None);
    }

    #[test]
    fn test_attributes_apply() {
        let pair = Pair { a: 2, b: "b".into() };
        let text =
            to_string_with_attributes(&pair, Attributes::new().with_indent(8)).unwrap();
        // Top-level items are never indented
        assert!(text.lines().all(|line| !line.starts_with(' ')));
        let strict = Attributes::new().with_strict(true);
        let err = from_str_with_attributes::<Pair>("Begin Pair\nC = 1\nEnd Pair", strict)
            .unwrap_err();
        assert!(matches!(err, Error::Unconsumed { .. }));
    }
}
