//! Channel text format
//!
//! This module documents the text format read and written by
//! [`Channel`](crate::Channel).
//!
//! # Overview
//!
//! Channel text is line-oriented. Each line is one item, and an object is
//! a run of items framed by `Begin` and `End`. The text carries the class
//! of every object, so a reader can reconstruct an object without knowing
//! its concrete class in advance.
//!
//! ```text
//! Begin Node                      # A node in a tree
//! IsA Base                        # Common base class
//! N = 3
//! IsA Node
//! Label = "root"
//! Child =
//!    Begin Node
//!    IsA Base
//!    N = 4
//!    IsA Node
//!    End Node
//! End Node
//! ```
//!
//! # Items
//!
//! | Item | Syntax | Meaning |
//! |------|--------|---------|
//! | Begin | `Begin <class>` | opens an object of the named most-derived class |
//! | IsA | `IsA <class>` | the fields that follow belong to this ancestor class |
//! | Value | `<name> = <value>` | a scalar field |
//! | Object | `<name> =` | a field whose value is the object that follows |
//! | End | `End <class>` | closes the object; must name the same class as its `Begin` |
//! | Comment | `# text` | ignored |
//! | Blank | | ignored |
//!
//! **Rules**:
//! - Keywords (`Begin`, `IsA`, `End`) are case-insensitive and take exactly
//!   one class name. Class names are case-sensitive and may contain any
//!   characters except whitespace, `#`, `=` and `"`.
//! - Field names match `[A-Za-z_][A-Za-z0-9_]*` and are looked up
//!   case-insensitively when read.
//! - Leading and trailing whitespace is ignored. Indentation is written for
//!   readability (`Indent` spaces per nesting level; an object's items sit
//!   at the level of its `Begin`) but never used for structure.
//! - `#` outside a quoted string starts a comment that runs to the end of
//!   the line.
//! - An `Object` line must be followed, ignoring blanks and comments, by
//!   the `Begin` of the nested object. A `Begin` anywhere else inside an
//!   object is an error.
//!
//! ## Sections
//!
//! An object's fields are grouped by the class that declares them. Each
//! class in the ancestor chain, most-base first, contributes an `IsA`
//! line followed by its own fields. The most-derived class has an `IsA`
//! section too. The implicit root class of every chain is never written.
//!
//! When reading, a class only sees the fields in its own section, plus
//! any fields that appear before the first `IsA`. Text without any `IsA`
//! lines is therefore still readable.
//!
//! ## Values
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Integer | decimal, optional `-` | `N = -42` |
//! | Double | shortest exact decimal, `NaN`, `inf`, `-inf` | `X = 0.1`, `Y = 1e-7` |
//! | String | double-quoted, `"` written as `""` | `Label = "say ""hi"""` |
//!
//! Doubles are written with as many digits as needed to read back the same
//! value bit for bit. Booleans are written as the integers `0` and `1`.
//! Strings may contain `#` and `=` but not line breaks.
//!
//! ## Comments and defaults
//!
//! When the `Comment` attribute is on, the writer adds comments and may
//! show fields that are at their default value as commented-out lines:
//!
//! ```text
//! Begin Gauge                     # A measuring instrument
//! IsA Base                        # Common base class
//! #N = 0                          # Number of items (default)
//! ```
//!
//! Commented-out lines read back as comments, so they never affect the
//! object. How much is shown depends on `Full` (`-1`, `0` or `1`).
//!
//! # Reading
//!
//! - A read skips blank and comment lines up to the next `Begin`. Reaching
//!   the end of the input there is not an error; it means there are no
//!   more objects.
//! - The end of input inside an object, an `End` naming the wrong class,
//!   and an `End` with no open object are errors.
//! - With `Skip` on, lines that are not channel syntax, and stray items
//!   between objects, are discarded. This lets channel text be embedded in
//!   other text.
//! - Fields that no class consumes produce a warning, or an error when
//!   `Strict` is on.
//! - A field whose value does not convert to the type a class asks for is
//!   replaced by the class's default, with an error-severity warning.
//!
//! # Limitations
//!
//! - **No schema**: the text names classes and fields but does not describe
//!   them; the object model supplies all meaning.
//! - **No evolution** beyond unknown fields becoming warnings.
//! - **Single-line values**: strings cannot contain line breaks.

// This module contains only documentation; no implementation code
