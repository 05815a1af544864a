use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Terminal,
    Special,
    Equals,
    Comma,
    Pipe,
    Semicolon,
    Period,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Terminal => "terminal",
            TokenKind::Special => "special",
            TokenKind::Equals => "=",
            TokenKind::Comma => ",",
            TokenKind::Pipe => "|",
            TokenKind::Semicolon => ";",
            TokenKind::Period => ".",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Token text with quotes and `?` delimiters removed.
    pub value: String,
    pub line: usize,
    pub column: usize,
}

/// Ordered lexical rules; the first one matching at the cursor wins. Rules
/// without a kind are skipped.
static RULES: Lazy<Vec<(Regex, Option<TokenKind>)>> = Lazy::new(|| {
    let rule = |pattern: &str, kind: Option<TokenKind>| (Regex::new(pattern).unwrap(), kind);
    vec![
        rule(r"^\s+", None),
        rule(r"^\(\*(?s:.*?)\*\)", None),
        rule(r"^[a-zA-Z]+([a-zA-Z0-9 ]+[a-zA-Z0-9])?", Some(TokenKind::Identifier)),
        rule(r#"^"[^"]*""#, Some(TokenKind::Terminal)),
        rule(r"^'[^']*'", Some(TokenKind::Terminal)),
        rule(r"^\?[^?]*\?", Some(TokenKind::Special)),
        rule(r"^=", Some(TokenKind::Equals)),
        rule(r"^,", Some(TokenKind::Comma)),
        rule(r"^\|", Some(TokenKind::Pipe)),
        rule(r"^;", Some(TokenKind::Semicolon)),
        rule(r"^\.", Some(TokenKind::Period)),
        rule(r"^\(", Some(TokenKind::OpenParen)),
        rule(r"^\)", Some(TokenKind::CloseParen)),
        rule(r"^\[", Some(TokenKind::OpenBracket)),
        rule(r"^\]", Some(TokenKind::CloseBracket)),
        rule(r"^\{", Some(TokenKind::OpenBrace)),
        rule(r"^\}", Some(TokenKind::CloseBrace)),
    ]
});

/// Splits EBNF source into tokens, tracking 1-based line and column.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn finished(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Next significant token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let source = self.source;
        'scan: while !self.finished() {
            let head = &source[self.position..];
            for (pattern, kind) in RULES.iter() {
                let Some(found) = pattern.find(head) else {
                    continue;
                };
                let (line, column) = (self.line, self.column);
                self.advance(found.len());
                let Some(kind) = *kind else {
                    continue 'scan;
                };
                let value = token_value(kind, found.as_str());
                trace!(kind = kind.name(), value = %value, line, column, "token");
                return Ok(Some(Token {
                    kind,
                    value,
                    line,
                    column,
                }));
            }
            let unexpected = head.chars().next().unwrap_or_default();
            return Err(Error::Syntax {
                message: format!("Unexpected token: \"{unexpected}\""),
                line: self.line,
                column: self.column,
            });
        }
        Ok(None)
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.source[self.position..self.position + len];
        for ch in consumed.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += len;
    }
}

fn token_value(kind: TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Terminal => text[1..text.len() - 1].to_string(),
        TokenKind::Special => text[1..text.len() - 1].trim().to_string(),
        _ => text.to_string(),
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
