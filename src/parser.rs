use tracing::debug;

use crate::ast::{Expr, Grammar, Rule};
use crate::error::{Error, Result};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// Parses EBNF source into a grammar.
///
/// ```text
/// grammar  = { rule } ;
/// rule     = identifier , "=" , choice , ( ";" | "." ) ;
/// choice   = sequence , { "|" , sequence } ;
/// sequence = rhs , { "," , rhs } ;
/// rhs      = group | repetition | optional | special | identifier | terminal ;
/// ```
pub fn parse(source: &str) -> Result<Grammar> {
    Parser::new(source)?.grammar()
}

/// Recursive-descent parser with a single token of lookahead.
#[derive(Debug)]
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    lookahead: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self> {
        let mut tokenizer = Tokenizer::new(source);
        let lookahead = tokenizer.next_token()?;
        Ok(Self {
            tokenizer,
            lookahead,
        })
    }

    pub fn grammar(&mut self) -> Result<Grammar> {
        let mut rules = Vec::new();
        while self.lookahead.is_some() {
            rules.push(self.rule()?);
        }
        debug!(rules = rules.len(), "parsed grammar");
        Ok(Grammar { rules })
    }

    pub fn rule(&mut self) -> Result<Rule> {
        let identifier = self.eat(TokenKind::Identifier)?.value;
        self.eat(TokenKind::Equals)?;
        let rhs = self.choice()?;
        if self.peek() == Some(TokenKind::Period) {
            self.eat(TokenKind::Period)?;
        } else {
            self.eat(TokenKind::Semicolon)?;
        }
        Ok(Rule { identifier, rhs })
    }

    pub fn choice(&mut self) -> Result<Expr> {
        let mut left = self.sequence()?;
        while self.peek() == Some(TokenKind::Pipe) {
            self.eat(TokenKind::Pipe)?;
            let right = self.sequence()?;
            left = Expr::choice(left, right);
        }
        Ok(left)
    }

    pub fn sequence(&mut self) -> Result<Expr> {
        let mut left = self.rhs()?;
        while self.peek() == Some(TokenKind::Comma) {
            self.eat(TokenKind::Comma)?;
            let right = self.rhs()?;
            left = Expr::sequence(left, right);
        }
        Ok(left)
    }

    pub fn rhs(&mut self) -> Result<Expr> {
        let Some(token) = &self.lookahead else {
            return Err(self.error("Unexpected end of input in a right hand side value".to_string()));
        };
        match token.kind {
            TokenKind::OpenParen => {
                let inner = self.enclosed(TokenKind::OpenParen, TokenKind::CloseParen)?;
                Ok(Expr::Group(Box::new(inner)))
            }
            TokenKind::OpenBrace => {
                let inner = self.enclosed(TokenKind::OpenBrace, TokenKind::CloseBrace)?;
                Ok(Expr::Repetition(Box::new(inner)))
            }
            TokenKind::OpenBracket => {
                let inner = self.enclosed(TokenKind::OpenBracket, TokenKind::CloseBracket)?;
                Ok(Expr::Optional(Box::new(inner)))
            }
            TokenKind::Special => Ok(Expr::Special(self.eat(TokenKind::Special)?.value)),
            TokenKind::Identifier => Ok(Expr::Identifier(self.eat(TokenKind::Identifier)?.value)),
            TokenKind::Terminal => Ok(Expr::Terminal(self.eat(TokenKind::Terminal)?.value)),
            other => Err(Error::Syntax {
                message: format!("Unexpected {other} found in a right hand side value"),
                line: token.line,
                column: token.column,
            }),
        }
    }

    fn enclosed(&mut self, open: TokenKind, close: TokenKind) -> Result<Expr> {
        self.eat(open)?;
        let inner = self.choice()?;
        self.eat(close)?;
        Ok(inner)
    }

    /// Consumes the lookahead if it has the expected kind.
    pub fn eat(&mut self, kind: TokenKind) -> Result<Token> {
        let Some(token) = self.lookahead.take() else {
            return Err(self.error(format!(
                "Unexpected end of input when a {kind} was expected"
            )));
        };
        if token.kind != kind {
            let err = Error::Syntax {
                message: format!("Unexpected {} when a {kind} was expected", token.kind),
                line: token.line,
                column: token.column,
            };
            self.lookahead = Some(token);
            return Err(err);
        }
        self.lookahead = self.tokenizer.next_token()?;
        Ok(token)
    }

    fn peek(&self) -> Option<TokenKind> {
        self.lookahead.as_ref().map(|token| token.kind)
    }

    fn error(&self, message: String) -> Error {
        Error::Syntax {
            message,
            line: self.tokenizer.line(),
            column: self.tokenizer.column(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn rhs_of(source: &str) -> Expr {
        parse(source).unwrap().rules.remove(0).rhs
    }

    #[test]
    fn parses_a_simple_grammar() {
        let grammar = parse("zero = \"0\";").unwrap();
        assert_eq!(
            grammar.to_dictionary(),
            json!({
                "type": "Grammar",
                "rules": [{
                    "type": "Rule",
                    "identifier": { "type": "Identifier", "value": "zero" },
                    "rhs": { "type": "Terminal", "value": "0" },
                }],
            })
        );
    }

    #[test]
    fn parses_several_rules() {
        let grammar = parse("\n  zero = \"0\";\n  one minus one = zero.\n").unwrap();
        assert_eq!(grammar.rules.len(), 2);
        assert_eq!(grammar.rules[1].identifier, "one minus one");
        assert_eq!(grammar.rules[1].rhs, Expr::Identifier("zero".into()));
    }

    #[test]
    fn empty_source_is_an_empty_grammar() {
        assert!(parse("  (* nothing *) ").unwrap().rules.is_empty());
    }

    #[test]
    fn sequences_nest_to_the_left() {
        let rhs = rhs_of("group = \"(\" , rhs , \")\";");
        assert_eq!(
            rhs.to_dictionary(),
            json!({
                "type": "Sequence",
                "left": {
                    "type": "Sequence",
                    "left": { "type": "Terminal", "value": "(" },
                    "right": { "type": "Identifier", "value": "rhs" },
                },
                "right": { "type": "Terminal", "value": ")" },
            })
        );
    }

    #[test]
    fn choice_binds_looser_than_sequence() {
        let rhs = rhs_of("x = \"a\" , \"b\" | \"c\";");
        assert_eq!(rhs.kind(), "Choice");
        let Expr::Choice(left, right) = rhs else {
            unreachable!()
        };
        assert_eq!(left.kind(), "Sequence");
        assert_eq!(*right, Expr::Terminal("c".into()));
    }

    #[test]
    fn parses_binary_choice() {
        let rhs = rhs_of("binary = \"0\" | \"1\";");
        assert_eq!(
            rhs,
            Expr::choice(Expr::Terminal("0".into()), Expr::Terminal("1".into()))
        );
    }

    #[test]
    fn parses_wrapped_right_hand_sides() {
        let group = rhs_of("sequence or choice = ( rhs , \"|\" , rhs ) | ( rhs , \",\" , rhs );");
        let Expr::Choice(first, _) = group else {
            unreachable!()
        };
        assert_eq!(first.kind(), "Group");

        let repetition = rhs_of("grammar = { rule };");
        assert_eq!(repetition, Expr::Repetition(Box::new(Expr::Identifier("rule".into()))));

        let optional = rhs_of("phone = [ prefix ], number;");
        let Expr::Sequence(first, _) = optional else {
            unreachable!()
        };
        assert_eq!(*first, Expr::Optional(Box::new(Expr::Identifier("prefix".into()))));

        let special = rhs_of("zero = ? one minus one ?;");
        assert_eq!(special, Expr::Special("one minus one".into()));
    }

    #[test]
    fn missing_terminator_at_end_of_input() {
        let err = parse("zero = \"0\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(
            err.to_string(),
            "Unexpected end of input when a ; was expected at line 1, column 11"
        );
    }

    #[test]
    fn eating_past_the_end_fails() {
        let mut parser = Parser::new("zero = \"0\";").unwrap();
        parser.grammar().unwrap();
        assert!(matches!(parser.eat(TokenKind::Identifier), Err(Error::Syntax { .. })));
    }

    #[test]
    fn wrong_token_reports_its_position() {
        let err = parse("a = \"x\";\nb = ;").unwrap_err();
        assert_eq!(
            err,
            Error::Syntax {
                message: "Unexpected ; found in a right hand side value".to_string(),
                line: 2,
                column: 5,
            }
        );
        let err = parse("a \"x\";").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected terminal when a = was expected at line 1, column 3");
    }
}
