//! Warnings raised while reading.
//!
//! A read that finds something questionable but recoverable (a field no
//! class consumed, a value of the wrong type, foreign text skipped over)
//! records a [`Warning`] instead of failing. After the read returns, the
//! warnings are available from [`Channel::warnings`](crate::Channel::warnings)
//! as a [`Warnings`] map keyed by a 1-based sequence id, in the order they
//! were raised.
//!
//! Which warnings are kept at all is decided when they are raised, by the
//! channel's [`ReportLevel`](crate::ReportLevel).
//!
//! ## Examples
//!
//! ```rust
//! use objchan::{Severity, Warning, Warnings};
//!
//! let warnings: Warnings = vec![
//!     Warning::new(Severity::Warning, "Foo", "unknown field \"Colour\""),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(warnings.len(), 1);
//! assert_eq!(warnings.get(1).map(|w| w.class.as_str()), Some("Foo"));
//! ```

use crate::ReportLevel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a warning is. Lower is more serious.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// The object may be unusable, such as a field value that could not be
    /// converted and was replaced by its default
    Error,
    /// Ordinary problems, such as fields no class consumed
    Warning,
    /// Notes, such as foreign lines discarded in skip mode
    Info,
}

impl Severity {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// One recorded warning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub severity: Severity,
    /// The class whose data was being read when the warning was raised
    pub class: String,
    pub message: String,
}

impl Warning {
    pub fn new(severity: Severity, class: impl Into<String>, message: impl Into<String>) -> Self {
        Warning {
            severity,
            class: class.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_empty() {
            write!(f, "{}: {}", self.severity, self.message)
        } else {
            write!(f, "{} ({}): {}", self.severity, self.class, self.message)
        }
    }
}

/// The warnings of one completed read, keyed by sequence id.
///
/// Ids start at 1 and follow the order the warnings were raised in.
///
/// # Examples
///
/// ```rust
/// use objchan::Warnings;
///
/// let warnings = Warnings::new();
/// assert!(warnings.is_empty());
/// assert!(warnings.messages().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Warnings(IndexMap<u32, Warning>);

impl Warnings {
    #[must_use]
    pub fn new() -> Self {
        Warnings(IndexMap::new())
    }

    /// Returns the warning with the given sequence id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Warning> {
        self.0.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, u32, Warning> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, u32, Warning> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, u32, Warning> {
        self.0.iter()
    }

    /// The message text of every warning, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.0.values().map(|w| w.message.as_str()).collect()
    }

    fn push(&mut self, warning: Warning) {
        let id = self.0.len() as u32 + 1;
        self.0.insert(id, warning);
    }
}

impl IntoIterator for Warnings {
    type Item = (u32, Warning);
    type IntoIter = indexmap::map::IntoIter<u32, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = (&'a u32, &'a Warning);
    type IntoIter = indexmap::map::Iter<'a, u32, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Warning> for Warnings {
    fn from_iter<T: IntoIterator<Item = Warning>>(iter: T) -> Self {
        let mut warnings = Warnings::new();
        for warning in iter {
            warnings.push(warning);
        }
        warnings
    }
}

/// Append-only collector used during a single read.
#[derive(Debug)]
pub(crate) struct WarningLog {
    level: ReportLevel,
    warnings: Warnings,
}

impl WarningLog {
    pub(crate) fn new(level: ReportLevel) -> Self {
        WarningLog {
            level,
            warnings: Warnings::new(),
        }
    }

    /// Records a warning if the report level lets it through.
    pub(crate) fn add(&mut self, severity: Severity, class: &str, message: impl Into<String>) {
        if self.level.retains(severity) {
            self.warnings.push(Warning::new(severity, class, message));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.warnings.len()
    }

    pub(crate) fn finish(self) -> Warnings {
        self.warnings
    }
}
