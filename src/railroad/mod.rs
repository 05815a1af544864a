//! Railroad diagram components.
//!
//! Every node computes its size once, at construction, from the already known
//! sizes of its children. `Component::format` then places the node at a point
//! and returns the drawn markup.

use std::fmt;

use serde::Serialize;

mod alternating_sequence;
mod attributes;
mod choice;
mod comment;
mod diagram;
mod element;
mod group;
mod horizontal_choice;
mod multiple_choice;
mod optional_sequence;
mod options;
mod path;
mod repetition;
mod sequence;
mod skip;
mod stack;
mod start;
pub mod style;
mod terminal;
mod vertical_sequence;

pub use alternating_sequence::AlternatingSequence;
pub use attributes::{Attributes, escape_value, is_valid_name};
pub use choice::{Choice, Optional, validate_normal};
pub use comment::Comment;
pub use diagram::{Diagram, Padding};
pub use element::{Children, Document, Element, SVG_NS, XLINK_NS, escape_text};
pub use group::Group;
pub use horizontal_choice::HorizontalChoice;
pub use multiple_choice::{ChoiceType, MultipleChoice};
pub use optional_sequence::OptionalSequence;
pub use options::{Alignment, Options};
pub use path::{Cardinal, Compass, Path, Spin};
pub use repetition::{OneOrMore, ZeroOrMore};
pub use sequence::Sequence;
pub use skip::Skip;
pub use stack::Stack;
pub use start::{End, Start, TerminusStyle};
pub use terminal::{NonTerminal, Terminal};
pub use vertical_sequence::VerticalSequence;

/// Size of a node relative to its entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub width: f64,
    /// Vertical drop from the entry line to the exit line.
    pub height: f64,
    /// Extent above the entry line.
    pub up: f64,
    /// Extent below the exit line.
    pub down: f64,
    /// Whether sequence neighbours need a 10 unit connector on each side.
    pub needs_space: bool,
}

/// Diagram endpoints recognized by `Diagram` when deciding whether to add
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminus {
    Start(TerminusStyle),
    End(TerminusStyle),
}

pub trait Component: fmt::Debug {
    /// Stable name of the node type, e.g. `"one-or-more"`.
    fn kind(&self) -> &'static str;

    fn metrics(&self) -> Metrics;

    /// Draws the node with its entry point at `(x, y)` inside a slot of the
    /// given width.
    fn format(&self, x: f64, y: f64, width: f64) -> Element;

    /// Direct child nodes, in drawing order.
    fn children(&self) -> Vec<&dyn Component> {
        Vec::new()
    }

    fn terminus(&self) -> Option<Terminus> {
        None
    }
}

pub type Node = Box<dyn Component>;

/// Anything accepted where a diagram node is expected. Text becomes a
/// `Terminal`.
#[derive(Debug)]
pub enum Item {
    Node(Node),
    Text(String),
}

impl Item {
    pub fn into_node(self, options: &Options) -> Node {
        match self {
            Item::Node(node) => node,
            Item::Text(text) => Box::new(Terminal::new(text, options)),
        }
    }
}

impl From<Node> for Item {
    fn from(node: Node) -> Self {
        Item::Node(node)
    }
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Item::Text(text.to_string())
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Item::Text(text)
    }
}

macro_rules! impl_item_from {
    ($($component:ty),* $(,)?) => {
        $(
            impl From<$component> for Item {
                fn from(component: $component) -> Self {
                    Item::Node(Box::new(component))
                }
            }
        )*
    };
}

impl_item_from!(
    AlternatingSequence,
    Choice,
    Comment,
    End,
    Group,
    HorizontalChoice,
    MultipleChoice,
    NonTerminal,
    OneOrMore,
    Optional,
    OptionalSequence,
    Sequence,
    Skip,
    Stack,
    Start,
    Terminal,
    VerticalSequence,
    ZeroOrMore,
);

pub(crate) fn wrap_items<I>(items: I, options: &Options) -> Vec<Node>
where
    I: IntoIterator,
    I::Item: Into<Item>,
{
    items
        .into_iter()
        .map(|item| item.into().into_node(options))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaps {
    pub left: f64,
    pub right: f64,
}

/// Splits the spare room of a slot around a node. The difference is not
/// clamped, so an oversized node overflows on both sides.
pub fn determine_gaps(outer: f64, inner: f64, options: &Options) -> Gaps {
    let diff = outer - inner;
    match options.internal_alignment {
        Alignment::Left => Gaps {
            left: 0.0,
            right: diff,
        },
        Alignment::Right => Gaps {
            left: diff,
            right: 0.0,
        },
        Alignment::Center => Gaps {
            left: diff / 2.0,
            right: diff / 2.0,
        },
    }
}

/// Pre-order traversal: a node, then each child subtree left to right.
pub struct Walk<'a> {
    stack: Vec<&'a dyn Component>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a dyn Component;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

impl<'a> Walk<'a> {
    pub(crate) fn over(nodes: &'a [Node]) -> Self {
        Walk {
            stack: nodes.iter().rev().map(|node| node.as_ref()).collect(),
        }
    }
}

pub fn walk(node: &dyn Component) -> Walk<'_> {
    Walk { stack: vec![node] }
}

/// Formats a number the way JavaScript prints it: `10` rather than `10.0`,
/// no negative zero.
pub(crate) fn fmt_num(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(value).to_string()
}

/// Records sizes on the element when `debug` is on.
pub(crate) fn debug_attributes(
    attributes: &mut Attributes,
    options: &Options,
    updown: &[f64],
    kind: &'static str,
) {
    if !options.debug {
        return;
    }
    let updown: Vec<String> = updown.iter().map(|v| fmt_num(*v)).collect();
    attributes.set("data-updown", updown.join(" "));
    attributes.set("data-type", kind);
}

pub(crate) fn numeric_attributes(pairs: &[(&'static str, f64)]) -> Attributes {
    let mut attributes = Attributes::new();
    for (name, value) in pairs {
        attributes.set(name, fmt_num(*value));
    }
    attributes
}

pub(crate) fn text_length(text: &str) -> f64 {
    text.chars().count() as f64
}

/// Opening element of a node, before any drawing is added.
pub(crate) fn container(tag: &str, attributes: &Attributes) -> Element {
    Element::with_attributes(tag, attributes.clone())
}
