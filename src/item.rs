//! Classified lines of channel text.
//!
//! Every line of channel text is one [`Item`]. [`parse_line`] classifies a
//! raw input line and [`Item::render`] turns an item back into a line.
//! Indentation is produced on output but never looked at on input; the
//! structure of the text is carried entirely by the `Begin`/`End` keywords
//! and the `name =` lines that announce nested objects.
//!
//! ```text
//! Begin Foo                       # comment on the class
//! IsA Base
//! N = 3
//! Child =
//!    Begin Foo
//!    End Foo
//! End Foo
//! ```

use crate::Scalar;

/// Column at which trailing comments start, when the line is short enough.
const COMMENT_COLUMN: usize = 32;

/// One classified line.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Empty or whitespace-only line
    Blank,
    /// Full-line comment, without the leading `#`
    Comment(String),
    /// `Begin <class>` opens an object
    Begin {
        class: String,
        comment: Option<String>,
    },
    /// `IsA <class>` starts the section holding one class's fields
    IsA {
        class: String,
        comment: Option<String>,
    },
    /// `End <class>` closes an object
    End { class: String },
    /// `<name> = <value>`
    Assign {
        name: String,
        value: Scalar,
        comment: Option<String>,
    },
    /// `<name> =` with nothing after it; the value is the object that
    /// follows
    ObjectFollows {
        name: String,
        comment: Option<String>,
    },
}

impl Item {
    /// Returns `true` for lines that carry no data.
    #[must_use]
    pub fn is_insignificant(&self) -> bool {
        matches!(self, Item::Blank | Item::Comment(_))
    }

    /// Renders the item as a line of output.
    ///
    /// The body is indented by `depth * indent` spaces. A trailing comment
    /// starts at column 32, or two spaces after the body if that is
    /// further. A commented-out line is prefixed with `#` ahead of the
    /// indentation, so it reads back as a [`Item::Comment`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objchan::{Item, Scalar};
    ///
    /// let item = Item::Assign {
    ///     name: "N".to_string(),
    ///     value: Scalar::unquoted("3"),
    ///     comment: None,
    /// };
    /// assert_eq!(item.render(3, 1, false), "   N = 3");
    /// assert_eq!(item.render(3, 1, true), "#   N = 3");
    /// ```
    #[must_use]
    pub fn render(&self, indent: usize, depth: usize, commented_out: bool) -> String {
        let mut line = String::new();
        if commented_out {
            line.push('#');
        }
        if !matches!(self, Item::Blank) {
            line.push_str(&" ".repeat(indent * depth));
        }

        let comment = match self {
            Item::Blank => None,
            Item::Comment(text) => {
                line.push('#');
                if !text.is_empty() {
                    line.push(' ');
                    line.push_str(text);
                }
                None
            }
            Item::Begin { class, comment } => {
                line.push_str("Begin ");
                line.push_str(class);
                comment.as_deref()
            }
            Item::IsA { class, comment } => {
                line.push_str("IsA ");
                line.push_str(class);
                comment.as_deref()
            }
            Item::End { class } => {
                line.push_str("End ");
                line.push_str(class);
                None
            }
            Item::Assign {
                name,
                value,
                comment,
            } => {
                line.push_str(name);
                line.push_str(" = ");
                line.push_str(&value.to_string());
                comment.as_deref()
            }
            Item::ObjectFollows { name, comment } => {
                line.push_str(name);
                line.push_str(" =");
                comment.as_deref()
            }
        };

        if let Some(comment) = comment {
            let pad = COMMENT_COLUMN.saturating_sub(line.chars().count()).max(2);
            line.push_str(&" ".repeat(pad));
            line.push_str("# ");
            line.push_str(comment);
        }
        line
    }
}

/// Classifies one line of input.
///
/// Returns `None` when the line is not channel syntax: an unknown keyword,
/// a keyword without exactly one class name, an unterminated string, or
/// text after a closing quote. Keywords are case-insensitive.
///
/// # Examples
///
/// ```rust
/// use objchan::{parse_line, Item, Scalar};
///
/// assert_eq!(
///     parse_line("  begin Foo  # a comment"),
///     Some(Item::Begin { class: "Foo".into(), comment: Some("a comment".into()) })
/// );
/// assert_eq!(
///     parse_line("Label = \"a \"\"b\"\" # c\""),
///     Some(Item::Assign {
///         name: "Label".into(),
///         value: Scalar::quoted("a \"b\" # c"),
///         comment: None,
///     })
/// );
/// assert_eq!(parse_line("hello world"), None);
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<Item> {
    let line = line.trim();
    if line.is_empty() {
        return Some(Item::Blank);
    }
    if let Some(text) = line.strip_prefix('#') {
        return Some(Item::Comment(text.trim().to_string()));
    }
    // An assignment is tried first so that fields named like keywords
    // (`End = 3`) still parse.
    if let Some(item) = parse_assignment(line) {
        return item;
    }
    parse_keyword(line)
}

/// `Some(None)` means the line is an assignment but malformed.
fn parse_assignment(line: &str) -> Option<Option<Item>> {
    let name_len = identifier_len(line);
    if name_len == 0 {
        return None;
    }
    let (name, rest) = line.split_at(name_len);
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let name = name.to_string();

    if rest.is_empty() || rest.starts_with('#') {
        return Some(Some(Item::ObjectFollows {
            name,
            comment: trailing_comment(rest),
        }));
    }

    if let Some(quoted) = rest.strip_prefix('"') {
        let (text, after) = match split_quoted(quoted) {
            Some(parts) => parts,
            None => return Some(None),
        };
        let after = after.trim_start();
        if !after.is_empty() && !after.starts_with('#') {
            return Some(None);
        }
        return Some(Some(Item::Assign {
            name,
            value: Scalar::quoted(text),
            comment: trailing_comment(after),
        }));
    }

    let (value, comment) = match rest.split_once('#') {
        Some((value, comment)) => (value, comment_text(comment)),
        None => (rest, None),
    };
    Some(Some(Item::Assign {
        name,
        value: Scalar::unquoted(value.trim()),
        comment,
    }))
}

fn parse_keyword(line: &str) -> Option<Item> {
    let (body, comment) = match line.split_once('#') {
        Some((body, comment)) => (body, comment_text(comment)),
        None => (line, None),
    };
    let mut tokens = body.split_whitespace();
    let keyword = tokens.next()?;
    let class = tokens.next()?;
    if tokens.next().is_some() || !is_class_name(class) {
        return None;
    }
    let class = class.to_string();

    if keyword.eq_ignore_ascii_case("begin") {
        Some(Item::Begin { class, comment })
    } else if keyword.eq_ignore_ascii_case("isa") {
        Some(Item::IsA { class, comment })
    } else if keyword.eq_ignore_ascii_case("end") {
        Some(Item::End { class })
    } else {
        None
    }
}

/// Splits the text after an opening quote into the unescaped string and
/// whatever follows the closing quote.
fn split_quoted(s: &str) -> Option<(String, &str)> {
    let mut text = String::new();
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '"' {
            if let Some((_, '"')) = chars.peek() {
                chars.next();
                text.push('"');
            } else {
                return Some((text, &s[i + 1..]));
            }
        } else {
            text.push(c);
        }
    }
    None
}

/// Text of a `# comment` suffix; `None` when absent or empty.
fn trailing_comment(s: &str) -> Option<String> {
    s.strip_prefix('#').and_then(comment_text)
}

fn comment_text(s: &str) -> Option<String> {
    let text = s.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn identifier_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(s.len(), |(i, _)| i)
}

/// Returns `true` if `name` can be written as a field name.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && identifier_len(name) == name.len()
}

/// Returns `true` if `class` can be written as a class name.
#[must_use]
pub fn is_class_name(class: &str) -> bool {
    !class.is_empty()
        && !class
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '=' | '"'))
}
