//! Scalar values as they appear on the wire.
//!
//! Two types cover the two directions:
//!
//! - [`Value`] is what an object model hands to the writer: a signed
//!   integer, a double, or a string. Its [`Display`](std::fmt::Display)
//!   form is exactly what gets written after `name = `.
//! - [`Scalar`] is what the reader buffers: the raw text of a value plus
//!   whether it was quoted. Conversion to a Rust type happens lazily, when a
//!   class loader asks for the field, through `TryFrom<&Scalar>`.
//!
//! ## Wire forms
//!
//! | Value            | Written as      |
//! |------------------|-----------------|
//! | `Int(-42)`       | `-42`           |
//! | `Double(1.5)`    | `1.5`           |
//! | `Double(3.0)`    | `3.0`           |
//! | `Double(1e-7)`   | `1e-7`          |
//! | `Str("say \"hi\"")` | `"say ""hi"""` |
//!
//! Doubles use the shortest representation that parses back to the same
//! bits, so every finite double round-trips exactly. `NaN` and the
//! infinities are written as `NaN`, `inf` and `-inf`.
//!
//! ## Examples
//!
//! ```rust
//! use objchan::{Scalar, Value};
//!
//! assert_eq!(Value::from(3).to_string(), "3");
//! assert_eq!(Value::from("x").to_string(), "\"x\"");
//!
//! let scalar = Scalar::unquoted("0.1");
//! let n: f64 = f64::try_from(&scalar).unwrap();
//! assert_eq!(n, 0.1);
//! ```

use crate::{Error, Result};
use std::fmt;

/// A scalar field value to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed decimal integer
    Int(i64),
    /// Double precision number
    Double(f64),
    /// Text, always written quoted
    Str(String),
}

impl Value {
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[must_use]
    pub const fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Checks that the value can be written on a single line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for strings containing a line
    /// break.
    pub fn validate(&self) -> Result<()> {
        match self {
            Value::Str(s) if s.contains(['\n', '\r']) => Err(Error::unsupported_value(
                &format!("string {:?} contains a line break", s),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{:?}", d),
            Value::Str(s) => write_quoted(f, s),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for (i, part) in s.split('"').enumerate() {
        if i > 0 {
            f.write_str("\"\"")?;
        }
        f.write_str(part)?;
    }
    f.write_str("\"")
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

/// The raw text of a value read from the wire.
///
/// Quoted values have their quotes removed and doubled quotes collapsed.
/// Unquoted values are kept as written, minus surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    text: String,
    quoted: bool,
}

impl Scalar {
    /// A scalar that was written without quotes, such as a number.
    pub fn unquoted(text: impl Into<String>) -> Self {
        Scalar {
            text: text.into(),
            quoted: false,
        }
    }

    /// A scalar that was written as a quoted string.
    pub fn quoted(text: impl Into<String>) -> Self {
        Scalar {
            text: text.into(),
            quoted: true,
        }
    }

    /// The value text, with any quoting removed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }

    fn numeric_text(&self, expected: &str) -> Result<&str> {
        if self.quoted {
            Err(Error::custom(format!(
                "expected {}, found string \"{}\"",
                expected, self.text
            )))
        } else {
            Ok(&self.text)
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write_quoted(f, &self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

impl From<&Value> for Scalar {
    fn from(value: &Value) -> Self {
        match value {
            Value::Str(s) => Scalar::quoted(s.clone()),
            other => Scalar::unquoted(other.to_string()),
        }
    }
}

// TryFrom implementations used by class loaders to coerce buffered text
impl TryFrom<&Scalar> for i64 {
    type Error = Error;

    fn try_from(scalar: &Scalar) -> Result<Self> {
        let text = scalar.numeric_text("an integer")?;
        text.parse::<i64>()
            .map_err(|_| Error::custom(format!("expected an integer, found \"{}\"", text)))
    }
}

impl TryFrom<&Scalar> for i32 {
    type Error = Error;

    fn try_from(scalar: &Scalar) -> Result<Self> {
        let wide = i64::try_from(scalar)?;
        i32::try_from(wide).map_err(|_| Error::custom(format!("integer {} is out of range", wide)))
    }
}

impl TryFrom<&Scalar> for u32 {
    type Error = Error;

    fn try_from(scalar: &Scalar) -> Result<Self> {
        let wide = i64::try_from(scalar)?;
        u32::try_from(wide).map_err(|_| Error::custom(format!("integer {} is out of range", wide)))
    }
}

impl TryFrom<&Scalar> for f64 {
    type Error = Error;

    fn try_from(scalar: &Scalar) -> Result<Self> {
        let text = scalar.numeric_text("a number")?;
        text.parse::<f64>()
            .map_err(|_| Error::custom(format!("expected a number, found \"{}\"", text)))
    }
}

impl TryFrom<&Scalar> for bool {
    type Error = Error;

    fn try_from(scalar: &Scalar) -> Result<Self> {
        let text = scalar.numeric_text("a boolean")?;
        if text.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Ok(false);
        }
        text.parse::<i64>()
            .map(|v| v != 0)
            .map_err(|_| Error::custom(format!("expected a boolean, found \"{}\"", text)))
    }
}

impl TryFrom<&Scalar> for String {
    type Error = Error;

    fn try_from(scalar: &Scalar) -> Result<Self> {
        Ok(scalar.text.clone())
    }
}
