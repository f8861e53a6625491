//! Error types for channel reads and writes.
//!
//! Errors fall into a small number of categories:
//!
//! - **Structural errors**: the text is not a well-formed sequence of
//!   `Begin`/`IsA`/`End` blocks (bad syntax, mismatched or unmatched `End`,
//!   input ending inside an object). These abort the current read.
//! - **Semantic errors**: fields left unconsumed by every class in an
//!   object's ancestor chain while the channel is in strict mode.
//! - **Model errors**: a class the object model does not know about, or a
//!   failure raised by a class loader or dumper itself.
//! - **I/O errors**: failures reported by the bound line source or sink.
//!
//! Recoverable problems (unknown fields outside strict mode, values that do
//! not parse as the requested type) are never errors. They are collected as
//! [`Warning`](crate::Warning)s instead.
//!
//! ## Examples
//!
//! ```rust
//! use objchan::Error;
//!
//! let err = Error::syntax(4, "unrecognized line", "Begn Frame");
//! assert!(err.to_string().contains("line 4"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents every way a channel read or write can fail.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The line source or sink reported an I/O failure
    #[error("IO error: {0}")]
    Io(String),

    /// A line that is not channel syntax, or an item in the wrong place
    #[error("Syntax error at line {line}: {msg}\n{context}")]
    Syntax {
        line: usize,
        msg: String,
        context: String,
    },

    /// An `End` item naming a different class than the open `Begin`
    #[error("Mismatched End at line {line}: expected \"End {expected}\", found \"End {found}\"")]
    MismatchedEnd {
        line: usize,
        expected: String,
        found: String,
    },

    /// An `End` item with no object open
    #[error("Unexpected \"End {class}\" at line {line}: no object is being read")]
    UnmatchedEnd { line: usize, class: String },

    /// Input ran out before the open object was closed
    #[error("Unexpected end of input after line {line}: \"Begin {class}\" was never closed")]
    UnexpectedEof { line: usize, class: String },

    /// The object model has no ancestor chain for this class
    #[error("Unknown class \"{class}\"")]
    UnknownClass { class: String },

    /// Fields nobody consumed, reported while strict mode is on
    #[error("Unexpected data in {class} object: {}", names.join(", "))]
    Unconsumed { class: String, names: Vec<String> },

    /// A value that cannot be represented in channel text
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Unknown attribute name or unparsable attribute value
    #[error("Invalid attribute: {0}")]
    Attribute(String),

    /// Custom error raised by an object model
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error for the given input line.
    ///
    /// `context` is the offending line as it was read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objchan::Error;
    ///
    /// let err = Error::syntax(10, "expected Begin", "N = 3");
    /// assert!(err.to_string().contains("expected Begin"));
    /// ```
    pub fn syntax(line: usize, msg: &str, context: &str) -> Self {
        Error::Syntax {
            line,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    pub fn mismatched_end(line: usize, expected: &str, found: &str) -> Self {
        Error::MismatchedEnd {
            line,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn unmatched_end(line: usize, class: &str) -> Self {
        Error::UnmatchedEnd {
            line,
            class: class.to_string(),
        }
    }

    pub fn unexpected_eof(line: usize, class: &str) -> Self {
        Error::UnexpectedEof {
            line,
            class: class.to_string(),
        }
    }

    pub fn unknown_class(class: &str) -> Self {
        Error::UnknownClass {
            class: class.to_string(),
        }
    }

    /// Creates the strict-mode error for fields no class consumed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objchan::Error;
    ///
    /// let err = Error::unconsumed("Foo", vec!["Colour".to_string()]);
    /// assert!(err.to_string().contains("Colour"));
    /// ```
    pub fn unconsumed(class: &str, names: Vec<String>) -> Self {
        Error::Unconsumed {
            class: class.to_string(),
            names,
        }
    }

    pub fn unsupported_value(msg: &str) -> Self {
        Error::UnsupportedValue(msg.to_string())
    }

    pub fn attribute(msg: &str) -> Self {
        Error::Attribute(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// Object models use this to abort a read or write from inside
    /// [`Persist::load`](crate::Persist::load) or
    /// [`Persist::dump`](crate::Persist::dump).
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for source or sink failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors caused by malformed channel text.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::Syntax { .. }
                | Error::MismatchedEnd { .. }
                | Error::UnmatchedEnd { .. }
                | Error::UnexpectedEof { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
