//! Diagrams described as JSON trees.
//!
//! ```json
//! {"type": "diagram", "items": [
//!     {"type": "choice", "normal": 1, "items": ["a", {"type": "skip"}]}
//! ]}
//! ```
//!
//! Bare strings stand for terminals. A top-level array is read as the items
//! of a simple diagram, and any other node is wrapped in one.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::railroad::{
    AlternatingSequence, Attributes, ChoiceType, Choice, Comment, Diagram, End, Group,
    HorizontalChoice, MultipleChoice, Node, NonTerminal, OneOrMore, Optional, OptionalSequence,
    Options, Sequence, Skip, Stack, Start, Terminal, TerminusStyle, VerticalSequence, ZeroOrMore,
    validate_normal,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Node(Box<NodeDescription>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeDescription {
    Diagram {
        items: Vec<Description>,
        #[serde(default)]
        complex: bool,
    },
    Terminal {
        text: String,
        href: Option<String>,
        title: Option<String>,
    },
    NonTerminal {
        text: String,
        href: Option<String>,
        title: Option<String>,
    },
    Comment {
        text: String,
        href: Option<String>,
        title: Option<String>,
    },
    Skip,
    Start {
        style: Option<String>,
        label: Option<String>,
    },
    End {
        style: Option<String>,
    },
    Sequence {
        items: Vec<Description>,
    },
    Stack {
        items: Vec<Description>,
    },
    OptionalSequence {
        items: Vec<Description>,
    },
    AlternatingSequence {
        items: Vec<Description>,
    },
    VerticalSequence {
        items: Vec<Description>,
    },
    HorizontalChoice {
        items: Vec<Description>,
    },
    Choice {
        #[serde(default)]
        normal: f64,
        items: Vec<Description>,
    },
    MultipleChoice {
        #[serde(default)]
        normal: f64,
        #[serde(rename = "choiceType")]
        choice_type: Option<String>,
        items: Vec<Description>,
    },
    Optional {
        item: Description,
        #[serde(default)]
        skip: bool,
    },
    OneOrMore {
        item: Description,
        separator: Option<Description>,
    },
    ZeroOrMore {
        item: Description,
        separator: Option<Description>,
    },
    Group {
        item: Description,
        label: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TopLevel {
    Items(Vec<Description>),
    One(Description),
}

/// Builds a diagram from its JSON description.
pub fn diagram_from_json(json: &str, options: &Options) -> Result<Diagram> {
    let top: TopLevel =
        serde_json::from_str(json).map_err(|err| Error::Description(err.to_string()))?;
    match top {
        TopLevel::Items(items) => Ok(Diagram::new(build_all(&items, options)?, options)),
        TopLevel::One(description) => description.into_diagram(options),
    }
}

impl Description {
    pub fn into_diagram(self, options: &Options) -> Result<Diagram> {
        let Description::Node(node) = &self else {
            return Ok(Diagram::new(vec![self.build(options)?], options));
        };
        match node.as_ref() {
            NodeDescription::Diagram { items, complex: true } => {
                Ok(Diagram::complex(build_all(items, options)?, options))
            }
            NodeDescription::Diagram { items, .. } => {
                Ok(Diagram::new(build_all(items, options)?, options))
            }
            other => Ok(Diagram::new(vec![other.build(options)?], options)),
        }
    }

    pub fn build(&self, options: &Options) -> Result<Node> {
        match self {
            Description::Text(text) => Ok(Box::new(Terminal::new(text.as_str(), options))),
            Description::Node(node) => node.build(options),
        }
    }
}

impl NodeDescription {
    pub fn build(&self, options: &Options) -> Result<Node> {
        let o = options;
        Ok(match self {
            NodeDescription::Diagram { .. } => {
                return Err(Error::Description(
                    "a diagram can only appear at the top level".to_string(),
                ));
            }
            NodeDescription::Terminal { text, href, title } => Box::new(Terminal::with_attributes(
                text.as_str(),
                link_attributes(href, title)?,
                o,
            )),
            NodeDescription::NonTerminal { text, href, title } => Box::new(
                NonTerminal::with_attributes(text.as_str(), link_attributes(href, title)?, o),
            ),
            NodeDescription::Comment { text, href, title } => {
                let mut comment = Comment::new(text.as_str(), o);
                if let Some(href) = href {
                    comment = comment.with_href(href.as_str());
                }
                if let Some(title) = title {
                    comment = comment.with_title(title.as_str());
                }
                Box::new(comment)
            }
            NodeDescription::Skip => Box::new(Skip::new(o)),
            NodeDescription::Start { style, label } => {
                Box::new(Start::new(terminus_style(style)?, label.as_deref(), o))
            }
            NodeDescription::End { style } => Box::new(End::new(terminus_style(style)?, o)),
            NodeDescription::Sequence { items } => Box::new(Sequence::new(build_all(items, o)?, o)),
            NodeDescription::Stack { items } => Box::new(Stack::new(build_all(items, o)?, o)?),
            NodeDescription::OptionalSequence { items } => {
                Box::new(OptionalSequence::new(build_all(items, o)?, o)?)
            }
            NodeDescription::AlternatingSequence { items } => {
                Box::new(AlternatingSequence::new(build_all(items, o)?, o)?)
            }
            NodeDescription::VerticalSequence { items } => {
                Box::new(VerticalSequence::new(build_all(items, o)?, o)?)
            }
            NodeDescription::HorizontalChoice { items } => {
                Box::new(HorizontalChoice::new(build_all(items, o)?, o)?)
            }
            NodeDescription::Choice { normal, items } => {
                let normal = validate_normal(*normal, items.len())?;
                Box::new(Choice::new(normal, build_all(items, o)?, o)?)
            }
            NodeDescription::MultipleChoice {
                normal,
                choice_type,
                items,
            } => {
                let normal = validate_normal(*normal, items.len())?;
                let choice_type: ChoiceType = match choice_type {
                    Some(name) => name.parse()?,
                    None => ChoiceType::default(),
                };
                Box::new(MultipleChoice::new(normal, choice_type, build_all(items, o)?, o)?)
            }
            NodeDescription::Optional { item, skip } => {
                Box::new(Optional::new(item.build(o)?, *skip, o))
            }
            NodeDescription::OneOrMore { item, separator } => Box::new(OneOrMore::new(
                item.build(o)?,
                separator.as_ref().map(|s| s.build(o)).transpose()?.map(Into::into),
                o,
            )),
            NodeDescription::ZeroOrMore { item, separator } => Box::new(ZeroOrMore::new(
                item.build(o)?,
                separator.as_ref().map(|s| s.build(o)).transpose()?.map(Into::into),
                o,
            )),
            NodeDescription::Group { item, label } => {
                Box::new(Group::new(item.build(o)?, label.as_deref(), o))
            }
        })
    }
}

fn build_all(items: &[Description], options: &Options) -> Result<Vec<Node>> {
    items.iter().map(|item| item.build(options)).collect()
}

fn link_attributes(href: &Option<String>, title: &Option<String>) -> Result<Attributes> {
    let pairs = [("href", href), ("title", title)];
    Attributes::from_pairs(
        pairs
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|value| (name, value.as_str()))),
    )
}

fn terminus_style(style: &Option<String>) -> Result<TerminusStyle> {
    match style {
        Some(name) => name.parse().map_err(Error::Description),
        None => Ok(TerminusStyle::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kinds(json: &str) -> Vec<&'static str> {
        let diagram = diagram_from_json(json, &Options::default()).unwrap();
        diagram.walk().map(|node| node.kind()).collect()
    }

    #[test]
    fn bare_strings_are_terminals() {
        assert_eq!(kinds(r#"["a", "b"]"#), ["start", "terminal", "terminal", "end"]);
    }

    #[test]
    fn reads_nested_nodes() {
        let json = r#"{"type": "diagram", "items": [
            {"type": "choice", "normal": 1, "items": [
                {"type": "non-terminal", "text": "expr"},
                {"type": "skip"}
            ]},
            {"type": "zero-or-more", "item": "x", "separator": {"type": "comment", "text": "sep"}}
        ]}"#;
        assert_eq!(
            kinds(json),
            [
                "start",
                "choice",
                "non-terminal",
                "skip",
                "zero-or-more",
                "skip",
                "one-or-more",
                "terminal",
                "comment",
                "end"
            ]
        );
    }

    #[test]
    fn complex_diagrams_keep_their_markers() {
        let diagram = diagram_from_json(
            r#"{"type": "diagram", "complex": true, "items": ["a"]}"#,
            &Options::default(),
        )
        .unwrap();
        assert!(diagram.to_string().contains("h 20 m 0 -10 v 20"));
    }

    #[test]
    fn single_nodes_get_wrapped() {
        assert_eq!(
            kinds(r#"{"type": "group", "item": "a", "label": "g"}"#),
            ["start", "group", "terminal", "comment", "end"]
        );
    }

    #[test]
    fn links_become_attributes() {
        let diagram = diagram_from_json(
            r##"[{"type": "terminal", "text": "a", "href": "#a", "title": "first"}]"##,
            &Options::default(),
        )
        .unwrap();
        let svg = diagram.to_string();
        assert!(svg.contains("<a xlink:href=\"#a\">"));
        assert!(svg.contains("<title>first</title>"));
    }

    #[test]
    fn rejects_fractional_normal() {
        let err = diagram_from_json(
            r#"{"type": "choice", "normal": 0.5, "items": ["a", "b"]}"#,
            &Options::default(),
        )
        .unwrap_err();
        assert_eq!(err, Error::NonIntegerNormal(0.5));
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn rejects_normal_out_of_range() {
        let err = diagram_from_json(
            r#"{"type": "choice", "normal": 2, "items": ["a", "b"]}"#,
            &Options::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn rejects_unknown_choice_type() {
        let err = diagram_from_json(
            r#"{"type": "multiple-choice", "choiceType": "some", "items": ["a", "b"]}"#,
            &Options::default(),
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidChoiceType("some".to_string()));
    }

    #[test]
    fn item_counts_are_checked() {
        let err = diagram_from_json(
            r#"{"type": "alternating-sequence", "items": ["a"]}"#,
            &Options::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn malformed_json_is_a_description_error() {
        let err = diagram_from_json(r#"{"type": "wormhole"}"#, &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(matches!(err, Error::Description(_)));
    }
}
