//! The boundary between a channel and the objects it carries.
//!
//! A channel knows nothing about concrete classes. Everything class-specific
//! comes from an implementation of [`Persist`], normally on an enum with one
//! variant per concrete class:
//!
//! - the class name of a value and the ancestor chain of a class name,
//!   which drive the `IsA` sections on write and the loader sequence on read;
//! - one `dump` step per class, writing that class's own fields;
//! - one `load` step per class, reading that class's own fields and
//!   refining the partially built value handed up from its base class.
//!
//! The implicit root class is never part of a chain and gets no `IsA`.
//!
//! # Examples
//!
//! ```rust
//! use objchan::{Dump, Field, Load, Persist, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! impl Persist for Counter {
//!     fn class_name(&self) -> &'static str {
//!         "Counter"
//!     }
//!
//!     fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
//!         const CHAIN: &[&str] = &["Counter"];
//!         (class == "Counter").then_some(CHAIN)
//!     }
//!
//!     fn dump<'a>(&'a self, _class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
//!         dump.scalar(Field::new("Count", self.count).set(self.count != 0))
//!     }
//!
//!     fn load(_class: &str, _partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
//!         Ok(Counter { count: load.read_int("Count", 0) })
//!     }
//! }
//!
//! let text = objchan::to_string(&Counter { count: 7 }).unwrap();
//! assert!(text.contains("Count = 7"));
//! let back: Option<Counter> = objchan::from_str(&text).unwrap();
//! assert_eq!(back, Some(Counter { count: 7 }));
//! ```

use crate::{Dump, Load, Result};

/// A closed family of classes that can be written to and read from a
/// channel.
pub trait Persist: Sized {
    /// The most-derived class of this value.
    fn class_name(&self) -> &'static str;

    /// The ancestor chain of `class`, most-base first and ending with
    /// `class` itself. `None` for classes the model does not know.
    fn ancestry_of(class: &str) -> Option<&'static [&'static str]>;

    /// Short description written as a comment after `Begin` and `IsA`.
    fn class_comment(_class: &str) -> Option<&'static str> {
        None
    }

    /// Writes the fields that `class` itself declares.
    ///
    /// Called once per class in the ancestor chain, base first.
    fn dump<'a>(&'a self, class: &str, dump: &mut Dump<'a, Self>) -> Result<()>;

    /// Reads the fields that `class` itself declares.
    ///
    /// Called once per class in the ancestor chain of the object being
    /// read, base first. `partial` is what the previous call returned, or
    /// `None` for the most-base class. Returning an error aborts the read.
    fn load(class: &str, partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self>;
}
