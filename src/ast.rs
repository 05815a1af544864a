use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grammar {
    pub rules: Vec<Rule>,
}

impl Grammar {
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.identifier == name)
    }

    pub fn to_dictionary(&self) -> Value {
        let rules: Vec<Value> = self.rules.iter().map(Rule::to_dictionary).collect();
        json!({ "type": "Grammar", "rules": rules })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub identifier: String,
    pub rhs: Expr,
}

impl Rule {
    pub fn new(identifier: impl Into<String>, rhs: Expr) -> Self {
        Self {
            identifier: identifier.into(),
            rhs,
        }
    }

    pub fn to_dictionary(&self) -> Value {
        json!({
            "type": "Rule",
            "identifier": { "type": "Identifier", "value": self.identifier },
            "rhs": self.rhs.to_dictionary(),
        })
    }
}

/// Right-hand side of a rule. `Choice` and `Sequence` are binary and nest
/// to the left, as parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    Terminal(String),
    Special(String),
    Group(Box<Expr>),
    Repetition(Box<Expr>),
    Optional(Box<Expr>),
    Choice(Box<Expr>, Box<Expr>),
    Sequence(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Identifier(_) => "Identifier",
            Expr::Terminal(_) => "Terminal",
            Expr::Special(_) => "Special",
            Expr::Group(_) => "Group",
            Expr::Repetition(_) => "Repetition",
            Expr::Optional(_) => "Optional",
            Expr::Choice(..) => "Choice",
            Expr::Sequence(..) => "Sequence",
        }
    }

    pub fn choice(left: Expr, right: Expr) -> Self {
        Expr::Choice(Box::new(left), Box::new(right))
    }

    pub fn sequence(left: Expr, right: Expr) -> Self {
        Expr::Sequence(Box::new(left), Box::new(right))
    }

    /// Plain `{type, ...}` projection, handy for structural comparisons.
    pub fn to_dictionary(&self) -> Value {
        let kind = self.kind();
        match self {
            Expr::Identifier(value) | Expr::Terminal(value) | Expr::Special(value) => {
                json!({ "type": kind, "value": value })
            }
            Expr::Group(inner) | Expr::Repetition(inner) | Expr::Optional(inner) => {
                json!({ "type": kind, "value": inner.to_dictionary() })
            }
            Expr::Choice(left, right) | Expr::Sequence(left, right) => json!({
                "type": kind,
                "left": left.to_dictionary(),
                "right": right.to_dictionary(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_projection() {
        let rule = Rule::new(
            "binary",
            Expr::choice(Expr::Terminal("0".into()), Expr::Terminal("1".into())),
        );
        assert_eq!(
            rule.to_dictionary(),
            json!({
                "type": "Rule",
                "identifier": { "type": "Identifier", "value": "binary" },
                "rhs": {
                    "type": "Choice",
                    "left": { "type": "Terminal", "value": "0" },
                    "right": { "type": "Terminal", "value": "1" },
                },
            })
        );
    }

    #[test]
    fn wrappers_nest_their_value() {
        let expr = Expr::Repetition(Box::new(Expr::Identifier("rule".into())));
        assert_eq!(
            expr.to_dictionary(),
            json!({ "type": "Repetition", "value": { "type": "Identifier", "value": "rule" } })
        );
    }

    #[test]
    fn finds_rules_by_name() {
        let grammar = Grammar {
            rules: vec![Rule::new("zero", Expr::Terminal("0".into()))],
        };
        assert!(grammar.rule("zero").is_some());
        assert!(grammar.rule("one").is_none());
        assert_eq!(grammar.to_dictionary()["rules"][0]["rhs"]["value"], "0");
    }
}
