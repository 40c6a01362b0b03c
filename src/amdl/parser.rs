//! AMDL parser
//!
//! Recursive descent over the token stream, producing the syntax tree that
//! [`super::build`] turns into a graph.

use super::lexer::{self, Token, TokenKind};
use crate::automaton::EPSILON;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct AutomatonNode {
    pub name: String,
    /// `key: value` pairs in declaration order
    pub metadata: Vec<(String, String)>,
    pub alphabet: Vec<String>,
    pub states: Vec<StateNode>,
    pub transitions: Vec<TransitionNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateNode {
    pub id: String,
    pub initial: bool,
    pub accepting: bool,
    pub position: Option<(f64, f64)>,
    pub label: Option<String>,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionNode {
    pub from: String,
    pub to: String,
    pub symbols: Vec<String>,
    pub line: usize,
    pub column: usize,
}

/// Parse AMDL source into its syntax tree
pub fn parse(input: &str) -> Result<AutomatonNode> {
    let tokens = lexer::tokenize(input)?;
    let mut parser = Parser { tokens, current: 0 };
    let automaton = parser.parse_automaton()?;
    parser.expect(TokenKind::Eof)?;
    Ok(automaton)
}

struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    fn parse_automaton(&mut self) -> Result<AutomatonNode> {
        self.expect(TokenKind::Automaton)?;
        let name = self.expect(TokenKind::String)?.value;
        self.expect(TokenKind::LBrace)?;

        let mut node = AutomatonNode {
            name,
            metadata: Vec::new(),
            alphabet: Vec::new(),
            states: Vec::new(),
            transitions: Vec::new(),
        };

        while !self.check(TokenKind::RBrace) {
            match (self.peek().kind, self.peek_next_kind()) {
                (TokenKind::Identifier, Some(TokenKind::Colon)) => {
                    node.metadata.push(self.parse_metadata()?);
                }
                (TokenKind::Alphabet, _) => {
                    node.alphabet.extend(self.parse_alphabet()?);
                }
                (TokenKind::State, _) => {
                    node.states.push(self.parse_state()?);
                }
                (TokenKind::Identifier, _) => {
                    node.transitions.push(self.parse_transition()?);
                }
                _ => return Err(self.error("Unexpected token")),
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(node)
    }

    fn parse_metadata(&mut self) -> Result<(String, String)> {
        let key = self.expect(TokenKind::Identifier)?.value;
        self.expect(TokenKind::Colon)?;

        match self.peek().kind {
            TokenKind::String | TokenKind::Number | TokenKind::Identifier => {
                Ok((key, self.advance().value))
            }
            _ => Err(self.error("Expected string, number, or identifier for metadata value")),
        }
    }

    fn parse_alphabet(&mut self) -> Result<Vec<String>> {
        self.expect(TokenKind::Alphabet)?;
        self.expect(TokenKind::Colon)?;
        self.parse_symbol_list()
    }

    fn parse_state(&mut self) -> Result<StateNode> {
        let start = self.expect(TokenKind::State)?;
        let id = self.expect(TokenKind::Identifier)?.value;
        self.expect(TokenKind::LBrace)?;

        let mut state = StateNode {
            id,
            initial: false,
            accepting: false,
            position: None,
            label: None,
            line: start.line,
            column: start.column,
        };

        while !self.check(TokenKind::RBrace) {
            let property = self.expect(TokenKind::Identifier)?;
            self.expect(TokenKind::Colon)?;

            match property.value.as_str() {
                "initial" => state.initial = self.parse_boolean()?,
                "accepting" => state.accepting = self.parse_boolean()?,
                "position" => state.position = Some(self.parse_position()?),
                "label" => state.label = Some(self.expect(TokenKind::String)?.value),
                other => {
                    return Err(Error::amdl(
                        format!("Unknown state property: {}", other),
                        property.line,
                        property.column,
                    ));
                }
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(state)
    }

    fn parse_transition(&mut self) -> Result<TransitionNode> {
        let from = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Dash)?;
        let symbols = self.parse_symbol_list()?;
        self.expect(TokenKind::Arrow)?;
        let to = self.expect(TokenKind::Identifier)?.value;

        Ok(TransitionNode {
            from: from.value,
            to,
            symbols,
            line: from.line,
            column: from.column,
        })
    }

    fn parse_symbol_list(&mut self) -> Result<Vec<String>> {
        let mut symbols = vec![self.parse_symbol()?];
        while self.check(TokenKind::Comma) {
            self.advance();
            symbols.push(self.parse_symbol()?);
        }
        Ok(symbols)
    }

    fn parse_symbol(&mut self) -> Result<String> {
        match self.peek().kind {
            TokenKind::Identifier | TokenKind::Number => Ok(self.advance().value),
            TokenKind::Epsilon => {
                self.advance();
                Ok(EPSILON.to_string())
            }
            _ => Err(self.error("Expected symbol (identifier, epsilon, or number)")),
        }
    }

    fn parse_boolean(&mut self) -> Result<bool> {
        match self.peek().kind {
            TokenKind::True => {
                self.advance();
                Ok(true)
            }
            TokenKind::False => {
                self.advance();
                Ok(false)
            }
            _ => Err(self.error("Expected boolean (true or false)")),
        }
    }

    fn parse_position(&mut self) -> Result<(f64, f64)> {
        self.expect(TokenKind::LParen)?;
        let x = self.parse_number()?;
        self.expect(TokenKind::Comma)?;
        let y = self.parse_number()?;
        self.expect(TokenKind::RParen)?;
        Ok((x, y))
    }

    fn parse_number(&mut self) -> Result<f64> {
        let token = self.expect(TokenKind::Number)?;
        token.value.parse().map_err(|_| {
            Error::amdl(
                format!("Invalid number '{}'", token.value),
                token.line,
                token.column,
            )
        })
    }

    // Helper methods

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn peek(&self) -> &Token {
        // The stream always ends with Eof, and Eof is never consumed past
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn peek_next_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.current + 1).map(|t| t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.current += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if !self.check(kind) {
            return Err(self.error(&format!("Expected {}, got {}", kind, self.peek().kind)));
        }
        Ok(self.advance())
    }

    fn error(&self, message: &str) -> Error {
        let token = self.peek();
        Error::amdl(message, token.line, token.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARITY: &str = r#"
        automaton "Parity" {
            author: "someone"
            version: 2
            alphabet: a, b

            state even { initial: true accepting: true position: (100, 200) }
            state odd { label: "Odd" }

            even - a -> odd
            odd - a -> even
            even - b, epsilon -> even
        }
    "#;

    #[test]
    fn test_parse_full_document() {
        let ast = parse(PARITY).unwrap();
        assert_eq!(ast.name, "Parity");
        assert_eq!(
            ast.metadata,
            vec![
                ("author".to_string(), "someone".to_string()),
                ("version".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(ast.alphabet, vec!["a", "b"]);
        assert_eq!(ast.states.len(), 2);

        let even = &ast.states[0];
        assert!(even.initial && even.accepting);
        assert_eq!(even.position, Some((100.0, 200.0)));
        assert_eq!(ast.states[1].label.as_deref(), Some("Odd"));

        assert_eq!(ast.transitions.len(), 3);
        assert_eq!(ast.transitions[2].symbols, vec!["b", "ε"]);
        assert_eq!(ast.transitions[2].line, 12);
    }

    #[test]
    fn test_numeric_symbols() {
        let ast = parse("automaton \"bits\" { q0 - 0, 1 -> q0 }").unwrap();
        assert_eq!(ast.transitions[0].symbols, vec!["0", "1"]);
    }

    #[test]
    fn test_expected_token_error() {
        let err = parse("automaton Parity {}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 1, Column 11: Expected STRING, got IDENTIFIER"
        );
    }

    #[test]
    fn test_unknown_state_property() {
        let err = parse("automaton \"x\" {\n state q0 { colour: true }\n}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 2, Column 13: Unknown state property: colour"
        );
    }

    #[test]
    fn test_bad_boolean_and_eof() {
        let err = parse("automaton \"x\" { state q0 { initial: 1 } }").unwrap_err();
        assert!(err.to_string().contains("Expected boolean (true or false)"));

        let err = parse("automaton \"x\" { q0 - a ->").unwrap_err();
        assert!(err.to_string().contains("Expected IDENTIFIER, got EOF"));

        let err = parse("automaton \"x\" {} trailing").unwrap_err();
        assert!(err.to_string().contains("Expected EOF, got IDENTIFIER"));
    }
}
