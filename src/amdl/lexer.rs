//! AMDL tokenizer

use crate::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Automaton,
    State,
    Alphabet,
    True,
    False,
    Epsilon,

    // Symbols
    LBrace,
    RBrace,
    LParen,
    RParen,
    Colon,
    Comma,
    Arrow,
    Dash,

    // Literals
    Identifier,
    String,
    Number,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Automaton => "AUTOMATON",
            TokenKind::State => "STATE",
            TokenKind::Alphabet => "ALPHABET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Epsilon => "EPSILON",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Arrow => "ARROW",
            TokenKind::Dash => "DASH",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

/// Tokenize AMDL source; the result always ends with an `Eof` token
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}

struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            match (self.peek(), self.peek_next()) {
                (None, _) => break,
                (Some('/'), Some('/')) => self.skip_line_comment(),
                (Some('/'), Some('*')) => self.skip_block_comment(),
                _ => tokens.push(self.next_token()?),
            }
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            value: String::new(),
            line: self.line,
            column: self.column,
        });
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        let Some(c) = self.peek() else {
            return Err(Error::amdl("Unexpected end of input", line, column));
        };

        let single = match c {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ':' => Some(TokenKind::Colon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            self.advance();
            return Ok(token(kind, c.to_string(), line, column));
        }

        if c == '-' {
            self.advance();
            if self.peek() == Some('>') {
                self.advance();
                return Ok(token(TokenKind::Arrow, "->".to_string(), line, column));
            }
            return Ok(token(TokenKind::Dash, "-".to_string(), line, column));
        }

        if c == '"' {
            return self.read_string(line, column);
        }

        if c.is_ascii_digit() {
            let value = self.take_while(|c| c.is_ascii_digit() || c == '.');
            return Ok(token(TokenKind::Number, value, line, column));
        }

        if is_identifier_char(c) {
            let value = self.take_while(|c| is_identifier_char(c) || c.is_ascii_digit());
            return Ok(token(keyword(&value), value, line, column));
        }

        Err(Error::amdl(
            format!("Unexpected character '{}'", c),
            line,
            column,
        ))
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<Token> {
        // Opening quote
        self.advance();
        let mut value = String::new();

        loop {
            match self.peek() {
                None => return Err(Error::amdl("Unterminated string", line, column)),
                Some('"') => break,
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some(other) => value.push(other),
                        None => return Err(Error::amdl("Unterminated string", line, column)),
                    }
                    self.advance();
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        // Closing quote
        self.advance();
        Ok(token(TokenKind::String, value, line, column))
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek().filter(|&c| accept(c)) {
            value.push(c);
            self.advance();
        }
        value
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(c) = self.peek() {
            if c == '*' && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        if self.peek() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }
}

fn token(kind: TokenKind, value: String, line: usize, column: usize) -> Token {
    Token {
        kind,
        value,
        line,
        column,
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == 'ε'
}

fn keyword(value: &str) -> TokenKind {
    match value.to_lowercase().as_str() {
        "automaton" => TokenKind::Automaton,
        "state" => TokenKind::State,
        "alphabet" => TokenKind::Alphabet,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "epsilon" | "ε" => TokenKind::Epsilon,
        _ => TokenKind::Identifier,
    }
}
