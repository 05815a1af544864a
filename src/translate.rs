use tracing::debug;

use crate::ast::{Expr, Rule};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::railroad::{
    Choice, Comment, Diagram, Node, NonTerminal, Optional, Options, Sequence, Stack,
    Start, Terminal, TerminusStyle, ZeroOrMore,
};

/// Turns grammar expressions into diagram nodes.
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    options: &'a Options,
    wrap_width: Option<f64>,
}

impl<'a> Translator<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            wrap_width: None,
        }
    }

    pub fn with_wrap_width(mut self, wrap_width: Option<f64>) -> Self {
        self.wrap_width = wrap_width.filter(|width| *width > 0.0);
        self
    }

    pub fn expr(&self, expr: &Expr) -> Result<Node> {
        let o = self.options;
        Ok(match expr {
            Expr::Identifier(name) => Box::new(NonTerminal::new(name.as_str(), o)),
            Expr::Terminal(text) => Box::new(Terminal::new(text.as_str(), o)),
            Expr::Special(text) => Box::new(Comment::new(text.as_str(), o)),
            Expr::Group(inner) => self.expr(inner)?,
            Expr::Repetition(inner) => Box::new(ZeroOrMore::new(self.expr(inner)?, None, o)),
            Expr::Optional(inner) => Box::new(Optional::new(self.expr(inner)?, false, o)),
            Expr::Choice(..) => {
                let mut branches = Vec::new();
                flatten_choice(expr, &mut branches);
                let items = branches
                    .into_iter()
                    .map(|branch| self.expr(branch))
                    .collect::<Result<Vec<_>>>()?;
                Box::new(Choice::new(0, items, o)?)
            }
            Expr::Sequence(..) => {
                let mut parts = Vec::new();
                flatten_sequence(expr, &mut parts);
                let items = parts
                    .into_iter()
                    .map(|part| self.expr(part))
                    .collect::<Result<Vec<_>>>()?;
                self.sequence(items)?
            }
        })
    }

    /// A single row, or rows stacked under each other once the row would
    /// run past the wrap width.
    fn sequence(&self, items: Vec<Node>) -> Result<Node> {
        let o = self.options;
        let Some(limit) = self.wrap_width else {
            return Ok(Box::new(Sequence::new(items, o)));
        };

        let mut rows: Vec<Vec<Node>> = Vec::new();
        let mut row: Vec<Node> = Vec::new();
        let mut row_width = 0.0;
        for item in items {
            let m = item.metrics();
            let width = m.width + if m.needs_space { 20.0 } else { 0.0 };
            if !row.is_empty() && row_width + width > limit {
                rows.push(std::mem::take(&mut row));
                row_width = 0.0;
            }
            row_width += width;
            row.push(item);
        }
        rows.push(row);

        if rows.len() == 1 {
            let row = rows.pop().unwrap_or_default();
            return Ok(Box::new(Sequence::new(row, o)));
        }
        let rows: Vec<Node> = rows
            .into_iter()
            .map(|row| Box::new(Sequence::new(row, o)) as Node)
            .collect();
        Ok(Box::new(Stack::new(rows, o)?))
    }
}

fn flatten_choice<'e>(expr: &'e Expr, out: &mut Vec<&'e Expr>) {
    match expr {
        Expr::Choice(left, right) => {
            flatten_choice(left, out);
            flatten_choice(right, out);
        }
        other => out.push(other),
    }
}

fn flatten_sequence<'e>(expr: &'e Expr, out: &mut Vec<&'e Expr>) {
    match expr {
        Expr::Sequence(left, right) => {
            flatten_sequence(left, out);
            flatten_sequence(right, out);
        }
        other => out.push(other),
    }
}

/// One diagram per rule, its start marker labelled with the rule name when
/// `label_rules` is set.
pub fn rule_diagram(rule: &Rule, options: &Options, render: &RenderConfig) -> Result<Diagram> {
    let body = Translator::new(options)
        .with_wrap_width(render.wrap_width)
        .expr(&rule.rhs)?;
    let style = if render.complex {
        TerminusStyle::Complex
    } else {
        TerminusStyle::Simple
    };
    let label = render.label_rules.then_some(rule.identifier.as_str());
    let start: Node = Box::new(Start::new(style, label, options));
    let items = vec![start, body];
    let diagram = if render.complex {
        Diagram::complex(items, options)
    } else {
        Diagram::new(items, options)
    };
    debug!(
        rule = %rule.identifier,
        width = diagram.metrics().width,
        nodes = diagram.walk().count(),
        "translated rule"
    );
    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn kinds(source: &str, render: &RenderConfig) -> Vec<&'static str> {
        let grammar = parse(source).unwrap();
        let diagram = rule_diagram(&grammar.rules[0], &Options::default(), render).unwrap();
        diagram.walk().map(|node| node.kind()).collect()
    }

    #[test]
    fn maps_each_expression() {
        let options = Options::default();
        let translator = Translator::new(&options);
        let node = translator.expr(&Expr::Identifier("digit".into())).unwrap();
        assert_eq!(node.kind(), "non-terminal");
        let node = translator.expr(&Expr::Special("any".into())).unwrap();
        assert_eq!(node.kind(), "comment");
        let node = translator
            .expr(&Expr::Group(Box::new(Expr::Terminal("x".into()))))
            .unwrap();
        assert_eq!(node.kind(), "terminal");
        let node = translator
            .expr(&Expr::Repetition(Box::new(Expr::Terminal("x".into()))))
            .unwrap();
        assert_eq!(node.kind(), "zero-or-more");
        let node = translator
            .expr(&Expr::Optional(Box::new(Expr::Terminal("x".into()))))
            .unwrap();
        assert_eq!(node.kind(), "optional");
    }

    #[test]
    fn flattens_binary_chains() {
        let render = RenderConfig::default();
        assert_eq!(
            kinds("digit = \"0\" | \"1\" | \"2\";", &render),
            ["start", "choice", "terminal", "terminal", "terminal", "end"]
        );
        assert_eq!(
            kinds("pair = a , b , c;", &render),
            ["start", "sequence", "non-terminal", "non-terminal", "non-terminal", "end"]
        );
    }

    #[test]
    fn groups_are_not_flattened() {
        let render = RenderConfig::default();
        assert_eq!(
            kinds("x = a | ( b | c );", &render),
            ["start", "choice", "non-terminal", "choice", "non-terminal", "non-terminal", "end"]
        );
    }

    #[test]
    fn labels_the_start_with_the_rule_name() {
        let grammar = parse("digit = \"0\";").unwrap();
        let options = Options::default();
        let diagram = rule_diagram(&grammar.rules[0], &options, &RenderConfig::default()).unwrap();
        // "digit" is 5 chars: 5 * 8.5 + 10
        assert_eq!(diagram.items()[0].metrics().width, 52.5);
        assert!(diagram.to_string().contains(">digit</text>"));

        let render = RenderConfig {
            label_rules: false,
            ..RenderConfig::default()
        };
        let diagram = rule_diagram(&grammar.rules[0], &options, &render).unwrap();
        assert_eq!(diagram.items()[0].metrics().width, 20.0);
    }

    #[test]
    fn complex_rules_use_single_ticks() {
        let grammar = parse("digit = \"0\";").unwrap();
        let render = RenderConfig {
            complex: true,
            label_rules: false,
            ..RenderConfig::default()
        };
        let diagram = rule_diagram(&grammar.rules[0], &Options::default(), &render).unwrap();
        let svg = diagram.to_string();
        assert!(svg.contains("h 20 m 0 -10 v 20"));
        assert!(!svg.contains("m -10 -10 v 20"));
    }

    #[test]
    fn wraps_long_sequences_into_rows() {
        let render = RenderConfig {
            wrap_width: Some(100.0),
            ..RenderConfig::default()
        };
        // each terminal is 28.5 wide plus 20 of spacing
        assert_eq!(
            kinds("x = \"a\", \"b\", \"c\", \"d\";", &render),
            [
                "start", "stack", "sequence", "terminal", "terminal", "sequence", "terminal",
                "terminal", "end"
            ]
        );
        let render = RenderConfig {
            wrap_width: Some(1000.0),
            ..RenderConfig::default()
        };
        assert_eq!(kinds("x = \"a\", \"b\";", &render)[1], "sequence");
    }
}
