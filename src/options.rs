//! Channel attributes.
//!
//! [`Attributes`] is the configuration of a [`Channel`](crate::Channel). It
//! holds the settings that shape the text a channel writes and how tolerant
//! it is when reading:
//!
//! | Attribute     | Type            | Default   | Effect |
//! |---------------|-----------------|-----------|--------|
//! | `Comment`     | bool            | `true`    | include comments in output |
//! | `Full`        | [`Full`]        | `0`       | how much non-essential output to write |
//! | `Skip`        | bool            | `false`   | discard foreign text while reading |
//! | `Strict`      | bool            | `false`   | unconsumed fields are errors, not warnings |
//! | `Indent`      | usize           | `3`       | spaces per nesting level in output |
//! | `ReportLevel` | [`ReportLevel`] | `2`       | which warnings are retained |
//! | `SourceFile`  | string          | unset     | file read instead of the bound source |
//! | `SinkFile`    | string          | unset     | file written instead of the bound sink |
//!
//! Every attribute can be read (falling back to its default), set, cleared
//! back to the default, and tested for whether it was set explicitly.
//! Attributes can also be addressed by name, which is how settings strings
//! such as `"Comment=0, Indent=2"` are applied.
//!
//! ## Examples
//!
//! ```rust
//! use objchan::{Attributes, Full};
//!
//! let mut attrs = Attributes::new().with_indent(2).with_full(Full::Verbose);
//! assert_eq!(attrs.indent(), 2);
//!
//! attrs.apply("Comment=0, Strict=1").unwrap();
//! assert!(!attrs.comment());
//! assert!(attrs.strict());
//!
//! attrs.clear_attrib("strict").unwrap();
//! assert!(!attrs.test_strict());
//! ```

use crate::{Error, Result, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount of non-essential information included in written output.
///
/// Stored and parsed as the integers `-1`, `0` and `+1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Full {
    /// Suppress all non-essential output
    Terse,
    /// A modest amount of helpful output
    #[default]
    Normal,
    /// Everything, including fields still at their default values
    Verbose,
}

impl Full {
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Full::Terse => -1,
            Full::Normal => 0,
            Full::Verbose => 1,
        }
    }
}

impl From<Full> for i8 {
    fn from(full: Full) -> Self {
        full.as_i8()
    }
}

impl TryFrom<i8> for Full {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self> {
        match value {
            -1 => Ok(Full::Terse),
            0 => Ok(Full::Normal),
            1 => Ok(Full::Verbose),
            other => Err(Error::attribute(&format!(
                "Full must be -1, 0 or 1, found {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Full {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// Severity floor for warnings kept during a read.
///
/// A warning is retained when its [`Severity`] is at or below the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ReportLevel {
    /// Keep nothing
    None,
    /// Keep only conditions that may make the object unusable
    Errors,
    /// Keep errors and ordinary warnings
    #[default]
    Warnings,
    /// Keep everything, including informational notes
    All,
}

impl ReportLevel {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            ReportLevel::None => 0,
            ReportLevel::Errors => 1,
            ReportLevel::Warnings => 2,
            ReportLevel::All => 3,
        }
    }

    /// Returns `true` if a warning of this severity should be kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objchan::{ReportLevel, Severity};
    ///
    /// assert!(ReportLevel::Warnings.retains(Severity::Error));
    /// assert!(!ReportLevel::Warnings.retains(Severity::Info));
    /// assert!(!ReportLevel::None.retains(Severity::Error));
    /// ```
    #[inline]
    #[must_use]
    pub const fn retains(self, severity: Severity) -> bool {
        severity.as_u8() <= self.as_u8()
    }
}

impl From<ReportLevel> for u8 {
    fn from(level: ReportLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for ReportLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ReportLevel::None),
            1 => Ok(ReportLevel::Errors),
            2 => Ok(ReportLevel::Warnings),
            3 => Ok(ReportLevel::All),
            other => Err(Error::attribute(&format!(
                "ReportLevel must be between 0 and 3, found {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// The settings of a channel.
///
/// Unset attributes report their documented default. Attributes never
/// validate against each other; each one only affects future reads and
/// writes.
///
/// # Examples
///
/// ```rust
/// use objchan::{Attributes, ReportLevel};
///
/// // Everything at its default
/// let attrs = Attributes::new();
/// assert!(attrs.comment());
/// assert_eq!(attrs.indent(), 3);
///
/// // Builder style
/// let attrs = Attributes::new()
///     .with_skip(true)
///     .with_report_level(ReportLevel::All);
/// assert!(attrs.test_skip());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    full: Option<Full>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indent: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_level: Option<ReportLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sink_file: Option<String>,
}

/// Attribute names accepted by the string-keyed accessors.
pub const ATTRIBUTE_NAMES: [&str; 8] = [
    "Comment",
    "Full",
    "Skip",
    "Strict",
    "Indent",
    "ReportLevel",
    "SourceFile",
    "SinkFile",
];

impl Attributes {
    /// Creates a set of attributes with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    attribute! {
        /// Whether comments are included in written output. Default `true`.
        comment: bool = true;
        set_comment, clear_comment, test_comment, with_comment
    }

    attribute! {
        /// How much non-essential output to write. Default [`Full::Normal`].
        full: Full = Full::Normal;
        set_full, clear_full, test_full, with_full
    }

    attribute! {
        /// Whether foreign text interleaved with objects is discarded on
        /// read. Default `false`.
        skip: bool = false;
        set_skip, clear_skip, test_skip, with_skip
    }

    attribute! {
        /// Whether unconsumed fields fail the read. Default `false`.
        strict: bool = false;
        set_strict, clear_strict, test_strict, with_strict
    }

    attribute! {
        /// Spaces per nesting level in written output. Default `3`.
        indent: usize = 3;
        set_indent, clear_indent, test_indent, with_indent
    }

    attribute! {
        /// Which warnings are retained during a read. Default
        /// [`ReportLevel::Warnings`].
        report_level: ReportLevel = ReportLevel::Warnings;
        set_report_level, clear_report_level, test_report_level, with_report_level
    }

    /// Path of the file read in place of the bound source, if any.
    #[must_use]
    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    pub fn set_source_file(&mut self, path: impl Into<String>) {
        self.source_file = Some(path.into());
    }

    pub fn clear_source_file(&mut self) {
        self.source_file = None;
    }

    #[must_use]
    pub fn test_source_file(&self) -> bool {
        self.source_file.is_some()
    }

    /// Path of the file written in place of the bound sink, if any.
    #[must_use]
    pub fn sink_file(&self) -> Option<&str> {
        self.sink_file.as_deref()
    }

    pub fn set_sink_file(&mut self, path: impl Into<String>) {
        self.sink_file = Some(path.into());
    }

    pub fn clear_sink_file(&mut self) {
        self.sink_file = None;
    }

    #[must_use]
    pub fn test_sink_file(&self) -> bool {
        self.sink_file.is_some()
    }

    /// Returns the formatted value of the named attribute.
    ///
    /// Names are matched case-insensitively. Unset file attributes format
    /// as an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attribute`] for an unknown name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objchan::Attributes;
    ///
    /// let attrs = Attributes::new();
    /// assert_eq!(attrs.get_attrib("indent").unwrap(), "3");
    /// assert_eq!(attrs.get_attrib("Comment").unwrap(), "1");
    /// ```
    pub fn get_attrib(&self, name: &str) -> Result<String> {
        Ok(match canonical_name(name)? {
            "Comment" => format_bool(self.comment()),
            "Full" => self.full().to_string(),
            "Skip" => format_bool(self.skip()),
            "Strict" => format_bool(self.strict()),
            "Indent" => self.indent().to_string(),
            "ReportLevel" => self.report_level().to_string(),
            "SourceFile" => self.source_file().unwrap_or_default().to_string(),
            _ => self.sink_file().unwrap_or_default().to_string(),
        })
    }

    /// Sets the named attribute from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attribute`] for an unknown name or a value that
    /// does not parse for that attribute.
    pub fn set_attrib(&mut self, name: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match canonical_name(name)? {
            "Comment" => self.set_comment(parse_bool("Comment", value)?),
            "Full" => {
                let level = parse_int::<i8>("Full", value)?;
                self.set_full(Full::try_from(level)?);
            }
            "Skip" => self.set_skip(parse_bool("Skip", value)?),
            "Strict" => self.set_strict(parse_bool("Strict", value)?),
            "Indent" => self.set_indent(parse_int::<usize>("Indent", value)?),
            "ReportLevel" => {
                let level = parse_int::<u8>("ReportLevel", value)?;
                self.set_report_level(ReportLevel::try_from(level)?);
            }
            "SourceFile" => self.set_source_file(value),
            _ => self.set_sink_file(value),
        }
        Ok(())
    }

    /// Reverts the named attribute to its default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attribute`] for an unknown name.
    pub fn clear_attrib(&mut self, name: &str) -> Result<()> {
        match canonical_name(name)? {
            "Comment" => self.clear_comment(),
            "Full" => self.clear_full(),
            "Skip" => self.clear_skip(),
            "Strict" => self.clear_strict(),
            "Indent" => self.clear_indent(),
            "ReportLevel" => self.clear_report_level(),
            "SourceFile" => self.clear_source_file(),
            _ => self.clear_sink_file(),
        }
        Ok(())
    }

    /// Returns `true` if the named attribute has been set explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attribute`] for an unknown name.
    pub fn test_attrib(&self, name: &str) -> Result<bool> {
        Ok(match canonical_name(name)? {
            "Comment" => self.test_comment(),
            "Full" => self.test_full(),
            "Skip" => self.test_skip(),
            "Strict" => self.test_strict(),
            "Indent" => self.test_indent(),
            "ReportLevel" => self.test_report_level(),
            "SourceFile" => self.test_source_file(),
            _ => self.test_sink_file(),
        })
    }

    /// Applies a comma-separated list of `Name=value` settings.
    ///
    /// Settings are applied left to right; on error, the settings before
    /// the failing one stay applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attribute`] for a malformed setting, an unknown
    /// name, or an invalid value.
    pub fn apply(&mut self, settings: &str) -> Result<()> {
        for (name, value) in parse_settings(settings)? {
            self.set_attrib(name, value)?;
        }
        Ok(())
    }
}

/// Splits a settings string into `(name, value)` pairs.
pub(crate) fn parse_settings(settings: &str) -> Result<Vec<(&str, &str)>> {
    settings
        .split(',')
        .map(str::trim)
        .filter(|setting| !setting.is_empty())
        .map(|setting| {
            setting
                .split_once('=')
                .map(|(name, value)| (name.trim(), value.trim()))
                .ok_or_else(|| {
                    Error::attribute(&format!("expected Name=value, found \"{}\"", setting))
                })
        })
        .collect()
}

/// Maps a case-insensitive attribute name to its canonical spelling.
pub(crate) fn canonical_name(name: &str) -> Result<&'static str> {
    let name = name.trim();
    ATTRIBUTE_NAMES
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::attribute(&format!("unknown attribute \"{}\"", name)))
}

fn format_bool(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    value
        .parse::<i64>()
        .map(|v| v != 0)
        .map_err(|_| Error::attribute(&format!("{} expects a boolean, found \"{}\"", name, value)))
}

fn parse_int<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| Error::attribute(&format!("{} expects an integer, found \"{}\"", name, value)))
}
