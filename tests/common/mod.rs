//! Object model shared by the integration tests.
//!
//! Class tree (the implicit root is not listed):
//!
//! ```text
//! Base            N: integer
//! ├── Foo         Label: string
//! ├── Gauge       Reading: double
//! └── Node        Child: nested object
//! ```
#![allow(dead_code)]

use objchan::{Dump, Error, Field, Load, Persist, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Base { n: i64 },
    Foo { n: i64, label: String },
    Gauge { n: i64, reading: f64 },
    Node { n: i64, child: Option<Box<Model>> },
}

const BASE: &[&str] = &["Base"];
const FOO: &[&str] = &["Base", "Foo"];
const GAUGE: &[&str] = &["Base", "Gauge"];
const NODE: &[&str] = &["Base", "Node"];

impl Model {
    pub fn n(&self) -> i64 {
        match self {
            Model::Base { n }
            | Model::Foo { n, .. }
            | Model::Gauge { n, .. }
            | Model::Node { n, .. } => *n,
        }
    }

    pub fn foo(n: i64, label: &str) -> Self {
        Model::Foo {
            n,
            label: label.to_string(),
        }
    }

    pub fn gauge(reading: f64) -> Self {
        Model::Gauge { n: 0, reading }
    }

    /// A chain of `depth` nested nodes ending in a `Foo`. Node `i` has
    /// `N = i`, counting from the outside.
    pub fn chain(depth: usize) -> Self {
        let mut model = Model::foo(depth as i64, "leaf");
        for i in (0..depth).rev() {
            model = Model::Node {
                n: i as i64,
                child: Some(Box::new(model)),
            };
        }
        model
    }

    /// Takes a chain of nodes apart one level at a time, returning its depth
    /// and innermost object. Very deep chains would overflow the stack in
    /// the recursive drop and comparison code.
    pub fn unwind(mut self) -> (usize, Model) {
        let mut depth = 0;
        loop {
            self = match self {
                Model::Node {
                    child: Some(child), ..
                } => *child,
                leaf => return (depth, leaf),
            };
            depth += 1;
        }
    }

    /// Number of objects nested below this one.
    pub fn depth(&self) -> usize {
        match self {
            Model::Node {
                child: Some(child), ..
            } => 1 + child.depth(),
            _ => 0,
        }
    }
}

fn base_n(class: &str, partial: Option<Model>) -> Result<i64> {
    match partial {
        Some(Model::Base { n }) => Ok(n),
        other => Err(Error::custom(format!(
            "{} loader expected a Base, got {:?}",
            class, other
        ))),
    }
}

impl Persist for Model {
    fn class_name(&self) -> &'static str {
        match self {
            Model::Base { .. } => "Base",
            Model::Foo { .. } => "Foo",
            Model::Gauge { .. } => "Gauge",
            Model::Node { .. } => "Node",
        }
    }

    fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
        match class {
            "Base" => Some(BASE),
            "Foo" => Some(FOO),
            "Gauge" => Some(GAUGE),
            "Node" => Some(NODE),
            _ => None,
        }
    }

    fn class_comment(class: &str) -> Option<&'static str> {
        match class {
            "Base" => Some("Common base class"),
            "Foo" => Some("A labelled item"),
            "Gauge" => Some("A measuring instrument"),
            "Node" => Some("A node in a tree"),
            _ => None,
        }
    }

    fn dump<'a>(&'a self, class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
        match (class, self) {
            ("Base", model) => {
                let n = model.n();
                dump.scalar(
                    Field::new("N", n)
                        .set(n != 0)
                        .helpful(true)
                        .comment("Number of items"),
                )
            }
            ("Foo", Model::Foo { label, .. }) => dump.scalar(
                Field::new("Label", label.as_str())
                    .set(!label.is_empty())
                    .comment("Text label"),
            ),
            ("Gauge", Model::Gauge { reading, .. }) => dump.scalar(
                Field::new("Reading", *reading)
                    .set(reading.to_bits() != 0)
                    .comment("Last reading"),
            ),
            ("Node", Model::Node { child, .. }) => match child {
                Some(child) => dump.object(Field::new("Child", &**child).comment("Child node")),
                None => Ok(()),
            },
            (class, model) => Err(Error::custom(format!(
                "{} is not a class of {:?}",
                class, model
            ))),
        }
    }

    fn load(class: &str, partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
        match class {
            "Base" => Ok(Model::Base {
                n: load.read_int("N", 0),
            }),
            "Foo" => Ok(Model::Foo {
                n: base_n(class, partial)?,
                label: load.read_string("Label").unwrap_or_default(),
            }),
            "Gauge" => Ok(Model::Gauge {
                n: base_n(class, partial)?,
                reading: load.read_double("Reading", 0.0),
            }),
            "Node" => Ok(Model::Node {
                n: base_n(class, partial)?,
                child: load.read_object("Child").map(Box::new),
            }),
            other => Err(Error::unknown_class(other)),
        }
    }
}

/// Drops trailing comments and comment-only lines, leaving the structural
/// content of channel text.
pub fn structure(text: &str) -> Vec<objchan::Item> {
    use objchan::Item;

    text.lines()
        .filter_map(objchan::parse_line)
        .filter(|item| !item.is_insignificant())
        .map(|item| match item {
            Item::Begin { class, .. } => Item::Begin {
                class,
                comment: None,
            },
            Item::IsA { class, .. } => Item::IsA {
                class,
                comment: None,
            },
            Item::Assign { name, value, .. } => Item::Assign {
                name,
                value,
                comment: None,
            },
            Item::ObjectFollows { name, .. } => Item::ObjectFollows {
                name,
                comment: None,
            },
            other => other,
        })
        .collect()
}
